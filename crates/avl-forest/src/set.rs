//! The [`AvlSet`] wrapper: owns the arena and exposes the public API.

use std::fmt::Debug;

use crate::query;
use crate::types::{AvlNode, PathTrace, TraverseOrder};
use crate::util::{self, InvariantError};

fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Height-balanced ordered set of unique keys.
///
/// Nodes live in an arena of stable `u32` slots; deleted slots are
/// recycled through a free list. All `&mut self` operations leave the
/// tree satisfying the AVL invariant (balance factor in `{-1, 0, 1}` at
/// every node), except [`mirror`](AvlSet::mirror), which deliberately
/// produces the descending reflection.
pub struct AvlSet<K, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: Vec<AvlNode<K>>,
    free: Vec<u32>,
    root: Option<u32>,
    len: usize,
    comparator: C,
}

impl<K> AvlSet<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K> Default for AvlSet<K, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> AvlSet<K, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    fn alloc(&mut self, key: K) -> u32 {
        match self.free.pop() {
            Some(i) => {
                self.arena[i as usize] = AvlNode::new(key);
                i
            }
            None => {
                self.arena.push(AvlNode::new(key));
                (self.arena.len() - 1) as u32
            }
        }
    }

    /// Insert `key`, returning its slot index.
    ///
    /// Idempotent: inserting a key that is already present changes
    /// nothing and returns the existing slot.
    pub fn add(&mut self, key: K) -> u32 {
        if let Some(i) = query::find(&self.arena, self.root, &key, &self.comparator) {
            return i;
        }
        let n = self.alloc(key);
        self.root = Some(util::insert(&mut self.arena, self.root, n, &self.comparator));
        self.len += 1;
        n
    }

    /// Remove `key`. Returns false (and changes nothing) if absent.
    pub fn del(&mut self, key: &K) -> bool {
        let (root, removed) = util::remove(
            &mut self.arena,
            &mut self.free,
            self.root,
            key,
            &self.comparator,
        );
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn find(&self, key: &K) -> Option<u32> {
        query::find(&self.arena, self.root, key, &self.comparator)
    }

    pub fn has(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Read the key stored in a slot returned by another operation.
    pub fn key(&self, idx: u32) -> &K {
        &self.arena[idx as usize].k
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total arena slots, live or free.
    pub fn slots(&self) -> usize {
        self.arena.len()
    }

    /// Stored height of the root, 0 for the empty tree.
    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root) as usize
    }

    /// Total node count, computed by traversal (never a mutated counter).
    pub fn count_nodes(&self) -> usize {
        query::count_nodes(&self.arena, self.root)
    }

    pub fn count_leaves(&self) -> usize {
        query::count_leaves(&self.arena, self.root)
    }

    pub fn count_internal(&self) -> usize {
        query::count_internal(&self.arena, self.root)
    }

    pub fn first(&self) -> Option<u32> {
        query::min(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        query::max(&self.arena, self.root)
    }

    pub fn min_key(&self) -> Option<&K> {
        self.first().map(|i| &self.arena[i as usize].k)
    }

    pub fn max_key(&self) -> Option<&K> {
        self.last().map(|i| &self.arena[i as usize].k)
    }

    /// Edge count from the root to `key`, `None` if absent.
    pub fn depth_of(&self, key: &K) -> Option<usize> {
        query::depth_of(&self.arena, self.root, key, &self.comparator)
    }

    /// The descent path toward `key`; see [`PathTrace`].
    pub fn path_to(&self, key: &K) -> PathTrace {
        query::path_to(&self.arena, self.root, key, &self.comparator)
    }

    /// Largest key strictly less than `key`; `key` itself need not be
    /// present.
    pub fn predecessor(&self, key: &K) -> Option<u32> {
        query::predecessor(&self.arena, self.root, key, &self.comparator)
    }

    /// Smallest key strictly greater than `key`; `key` itself need not be
    /// present.
    pub fn successor(&self, key: &K) -> Option<u32> {
        query::successor(&self.arena, self.root, key, &self.comparator)
    }

    /// Ascending slot indices with `lo <= k <= hi`.
    pub fn range(&self, lo: &K, hi: &K) -> Vec<u32> {
        let mut out = Vec::new();
        query::range(&self.arena, self.root, lo, hi, &self.comparator, &mut out);
        out
    }

    pub fn traverse(&self, order: TraverseOrder) -> Vec<u32> {
        let mut out = Vec::new();
        match order {
            TraverseOrder::InOrder => query::in_order(&self.arena, self.root, &mut out),
            TraverseOrder::PreOrder => query::pre_order(&self.arena, self.root, &mut out),
            TraverseOrder::PostOrder => query::post_order(&self.arena, self.root, &mut out),
            TraverseOrder::LevelOrder => query::level_order(&self.arena, self.root, &mut out),
        }
        out
    }

    /// In-order iterator over slot indices. Restartable: each call starts
    /// a fresh pass.
    pub fn iter(&self) -> InOrderIter<'_, K> {
        InOrderIter::new(&self.arena, self.root)
    }

    pub fn for_each<F: FnMut(u32, &K)>(&self, mut f: F) {
        for i in self.iter() {
            f(i, &self.arena[i as usize].k);
        }
    }

    /// Balance audit independent of the stored heights.
    pub fn is_valid_avl(&self) -> bool {
        query::is_balanced(&self.arena, self.root)
    }

    /// Full structural audit: heights, balance, ordering, link liveness.
    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        util::assert_avl_tree(&self.arena, self.root, &self.free, &self.comparator)
    }

    /// Swap left and right at every node, in place.
    ///
    /// Afterwards the tree reads descending and comparator-driven lookups
    /// are meaningless until it is mirrored back.
    pub fn mirror(&mut self) {
        query::mirror(&mut self.arena, self.root);
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }
}

impl<K, C> AvlSet<K, C>
where
    K: Debug,
    C: Fn(&K, &K) -> i32,
{
    /// Debug dump of the whole tree.
    pub fn print(&self) -> String {
        util::print(&self.arena, self.root, "")
    }
}

impl<K, C> Clone for AvlSet<K, C>
where
    K: Clone,
    C: Fn(&K, &K) -> i32 + Clone,
{
    /// Deep structural copy with independent ownership.
    ///
    /// The clone's arena is compact: free slots of the original are not
    /// carried over.
    fn clone(&self) -> Self {
        let mut arena = Vec::with_capacity(self.len);
        let root = query::copy(&self.arena, self.root, &mut arena);
        Self {
            arena,
            free: Vec::new(),
            root,
            len: self.len,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, C> Extend<K> for AvlSet<K, C>
where
    C: Fn(&K, &K) -> i32,
{
    /// Bulk load: repeated single-key insertion, no atomicity across the
    /// batch.
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K: PartialOrd> FromIterator<K> for AvlSet<K, fn(&K, &K) -> i32> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// In-order traversal by explicit stack (the arena has no parent links).
pub struct InOrderIter<'a, K> {
    arena: &'a [AvlNode<K>],
    stack: Vec<u32>,
}

impl<'a, K> InOrderIter<'a, K> {
    fn new(arena: &'a [AvlNode<K>], root: Option<u32>) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut node: Option<u32>) {
        while let Some(i) = node {
            self.stack.push(i);
            node = self.arena[i as usize].l;
        }
    }
}

impl<K> Iterator for InOrderIter<'_, K> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let i = self.stack.pop()?;
        self.push_left(self.arena[i as usize].r);
        Some(i)
    }
}
