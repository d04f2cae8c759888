//! Arena-indexed self-balancing AVL tree engine.
//!
//! Maintains a height-balanced binary search tree of unique keys and a
//! family of read-only queries (min/max, depth, path, predecessor and
//! successor, range scan, traversals, mirror, deep copy, validity audit,
//! node counts).
//!
//! Instead of owned pointers, all "pointers" are `Option<u32>` indices
//! into a `Vec`-backed arena owned by the [`AvlSet`] value; rotations are
//! pure index rewiring and a node's slot is stable for its lifetime.
//! Slots vacated by deletion are recycled through a free list.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`AvlNode`], [`TraverseOrder`], [`PathTrace`] |
//! [`util`]  | rotations, insert/remove cores, [`InvariantError`] auditor |
//! [`query`] | lookups, order queries, counts, traversals, mirror/copy |
//! [`set`]   | the [`AvlSet`] wrapper |
//!
//! # Example
//!
//! ```
//! use avl_forest::AvlSet;
//!
//! let mut set = AvlSet::<i32>::new();
//! for k in [50, 25, 75, 10, 30] {
//!     set.add(k);
//! }
//! assert!(set.has(&30));
//! assert_eq!(set.min_key(), Some(&10));
//!
//! let keys: Vec<i32> = set.iter().map(|i| *set.key(i)).collect();
//! assert_eq!(keys, vec![10, 25, 30, 50, 75]);
//!
//! set.del(&25);
//! assert!(set.is_valid_avl());
//! ```

pub mod query;
pub mod set;
pub mod types;
pub mod util;

pub use set::{AvlSet, InOrderIter};
pub use types::{AvlNode, PathTrace, TraverseOrder};
pub use util::InvariantError;
