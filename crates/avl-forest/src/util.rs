//! Balancing core: rotations, insertion, removal, invariant auditor.
//!
//! All functions are free functions over the arena and work with indices.
//! Mutating entry points return the new subtree root; the caller rewires
//! its link (or the tree root) to the returned index.

use std::fmt::Debug;

use thiserror::Error;

use crate::query;
use crate::types::AvlNode;

/// A structural invariant violated somewhere in the arena.
///
/// Produced only by [`assert_avl_tree`]; no public tree operation returns
/// these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("link to missing or freed slot {index}")]
    BrokenLink { index: u32 },
    #[error("slot {index} stores height {stored} but subtree height is {computed}")]
    HeightMismatch {
        index: u32,
        stored: u32,
        computed: u32,
    },
    #[error("slot {index} has balance factor {balance}")]
    BalanceViolated { index: u32, balance: i32 },
    #[error("keys out of order between slots {prev} and {next}")]
    OrderViolated { prev: u32, next: u32 },
}

/// Height of an optional subtree; an absent subtree contributes 0.
#[inline]
pub fn height<K>(arena: &[AvlNode<K>], node: Option<u32>) -> u32 {
    node.map(|i| arena[i as usize].height).unwrap_or(0)
}

#[inline]
fn update_height<K>(arena: &mut [AvlNode<K>], i: u32) {
    let l = height(arena, arena[i as usize].l);
    let r = height(arena, arena[i as usize].r);
    arena[i as usize].height = 1 + l.max(r);
}

/// Balance factor `height(l) - height(r)` from the stored heights.
#[inline]
pub fn balance_of<K>(arena: &[AvlNode<K>], i: u32) -> i32 {
    let l = height(arena, arena[i as usize].l) as i32;
    let r = height(arena, arena[i as usize].r) as i32;
    l - r
}

/// Pivot `y` down to the right. `y`'s left child becomes the subtree root;
/// heights are recomputed child-before-parent.
fn rotate_right<K>(arena: &mut [AvlNode<K>], y: u32) -> u32 {
    let x = arena[y as usize]
        .l
        .expect("rotate_right requires a left child");
    let t2 = arena[x as usize].r;
    arena[x as usize].r = Some(y);
    arena[y as usize].l = t2;
    update_height(arena, y);
    update_height(arena, x);
    x
}

/// Pivot `x` down to the left. Symmetric to [`rotate_right`].
fn rotate_left<K>(arena: &mut [AvlNode<K>], x: u32) -> u32 {
    let y = arena[x as usize]
        .r
        .expect("rotate_left requires a right child");
    let t2 = arena[y as usize].l;
    arena[y as usize].l = Some(x);
    arena[x as usize].r = t2;
    update_height(arena, x);
    update_height(arena, y);
    y
}

/// Link the already-allocated leaf `n` into the subtree at `node` and
/// rebalance on the way back up.
///
/// The four rotation cases are classified by comparing the inserted key
/// against the unbalanced node's child key, which distinguishes the
/// single- from the double-rotation form. At most one (possibly
/// composite) rotation happens per insertion.
///
/// The caller has already ruled out a duplicate key.
pub fn insert<K, C>(arena: &mut [AvlNode<K>], node: Option<u32>, n: u32, comparator: &C) -> u32
where
    C: Fn(&K, &K) -> i32,
{
    let Some(curr) = node else {
        return n;
    };

    let cmp = comparator(&arena[n as usize].k, &arena[curr as usize].k);
    if cmp < 0 {
        let child = arena[curr as usize].l;
        let nl = insert(arena, child, n, comparator);
        arena[curr as usize].l = Some(nl);
    } else {
        let child = arena[curr as usize].r;
        let nr = insert(arena, child, n, comparator);
        arena[curr as usize].r = Some(nr);
    }

    update_height(arena, curr);
    let balance = balance_of(arena, curr);

    if balance > 1 {
        let l = arena[curr as usize]
            .l
            .expect("left-heavy node has a left child");
        if comparator(&arena[n as usize].k, &arena[l as usize].k) < 0 {
            return rotate_right(arena, curr);
        }
        let nl = rotate_left(arena, l);
        arena[curr as usize].l = Some(nl);
        return rotate_right(arena, curr);
    }
    if balance < -1 {
        let r = arena[curr as usize]
            .r
            .expect("right-heavy node has a right child");
        if comparator(&arena[n as usize].k, &arena[r as usize].k) > 0 {
            return rotate_left(arena, curr);
        }
        let nr = rotate_right(arena, r);
        arena[curr as usize].r = Some(nr);
        return rotate_left(arena, curr);
    }

    curr
}

/// Re-apply the rotation cases at `i` after one of its subtrees shrank.
///
/// Unlike insertion, the case split keys on the child's own balance
/// factor, with ties broken toward the single-rotation form.
fn rebalance_shrunk<K>(arena: &mut [AvlNode<K>], i: u32) -> u32 {
    let balance = balance_of(arena, i);
    if balance > 1 {
        let l = arena[i as usize]
            .l
            .expect("left-heavy node has a left child");
        if balance_of(arena, l) >= 0 {
            return rotate_right(arena, i);
        }
        let nl = rotate_left(arena, l);
        arena[i as usize].l = Some(nl);
        return rotate_right(arena, i);
    }
    if balance < -1 {
        let r = arena[i as usize]
            .r
            .expect("right-heavy node has a right child");
        if balance_of(arena, r) <= 0 {
            return rotate_left(arena, i);
        }
        let nr = rotate_right(arena, r);
        arena[i as usize].r = Some(nr);
        return rotate_left(arena, i);
    }
    i
}

/// Detach the leftmost node of the subtree at `node`, rebalancing the
/// remainder on the way back up.
///
/// Returns `(remaining subtree, detached index)`. The detached node keeps
/// its slot but is fully unlinked.
fn detach_min<K>(arena: &mut [AvlNode<K>], node: u32) -> (Option<u32>, u32) {
    match arena[node as usize].l {
        None => {
            let r = arena[node as usize].r;
            arena[node as usize].r = None;
            (r, node)
        }
        Some(l) => {
            let (nl, min) = detach_min(arena, l);
            arena[node as usize].l = nl;
            update_height(arena, node);
            (Some(rebalance_shrunk(arena, node)), min)
        }
    }
}

/// Remove `key` from the subtree at `node`, pushing the vacated slot onto
/// `free`. A missing key is a no-op.
///
/// Returns `(new subtree root, whether a node was removed)`. Removal may
/// rebalance at several ancestors, so every level on the unwind path
/// re-checks its balance.
pub fn remove<K, C>(
    arena: &mut [AvlNode<K>],
    free: &mut Vec<u32>,
    node: Option<u32>,
    key: &K,
    comparator: &C,
) -> (Option<u32>, bool)
where
    C: Fn(&K, &K) -> i32,
{
    let Some(curr) = node else {
        return (None, false);
    };

    let cmp = comparator(key, &arena[curr as usize].k);
    let (kept, removed) = if cmp < 0 {
        let child = arena[curr as usize].l;
        let (nl, removed) = remove(arena, free, child, key, comparator);
        arena[curr as usize].l = nl;
        (curr, removed)
    } else if cmp > 0 {
        let child = arena[curr as usize].r;
        let (nr, removed) = remove(arena, free, child, key, comparator);
        arena[curr as usize].r = nr;
        (curr, removed)
    } else {
        let l = arena[curr as usize].l;
        let r = arena[curr as usize].r;
        match (l, r) {
            (None, None) => {
                free.push(curr);
                return (None, true);
            }
            (Some(c), None) | (None, Some(c)) => {
                free.push(curr);
                return (Some(c), true);
            }
            (Some(l), Some(r)) => {
                // Transplant the in-order successor into this position.
                let (nr, succ) = detach_min(arena, r);
                arena[succ as usize].l = Some(l);
                arena[succ as usize].r = nr;
                free.push(curr);
                (succ, true)
            }
        }
    };

    update_height(arena, kept);
    (Some(rebalance_shrunk(arena, kept)), removed)
}

/// Full structural audit of the tree rooted at `root`.
///
/// Recomputes every subtree height from the links and checks that stored
/// heights match, every balance factor is in `{-1, 0, 1}`, all reachable
/// links point at live in-bounds slots, and the in-order key sequence is
/// strictly ascending.
pub fn assert_avl_tree<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    free: &[u32],
    comparator: &C,
) -> Result<(), InvariantError>
where
    C: Fn(&K, &K) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };

    let mut freed = vec![false; arena.len()];
    for &i in free {
        if i as usize >= arena.len() {
            return Err(InvariantError::BrokenLink { index: i });
        }
        freed[i as usize] = true;
    }

    fn check<K>(
        arena: &[AvlNode<K>],
        freed: &[bool],
        i: u32,
    ) -> Result<u32, InvariantError> {
        let idx = i as usize;
        if idx >= arena.len() || freed[idx] {
            return Err(InvariantError::BrokenLink { index: i });
        }
        let lh = match arena[idx].l {
            Some(l) => check(arena, freed, l)?,
            None => 0,
        };
        let rh = match arena[idx].r {
            Some(r) => check(arena, freed, r)?,
            None => 0,
        };
        let computed = 1 + lh.max(rh);
        if arena[idx].height != computed {
            return Err(InvariantError::HeightMismatch {
                index: i,
                stored: arena[idx].height,
                computed,
            });
        }
        let balance = lh as i32 - rh as i32;
        if !(-1..=1).contains(&balance) {
            return Err(InvariantError::BalanceViolated { index: i, balance });
        }
        Ok(computed)
    }

    check(arena, &freed, root)?;

    let mut seq = Vec::new();
    query::in_order(arena, Some(root), &mut seq);
    for pair in seq.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if comparator(&arena[prev as usize].k, &arena[next as usize].k) >= 0 {
            return Err(InvariantError::OrderViolated { prev, next });
        }
    }

    Ok(())
}

/// Debug printer for a subtree.
pub fn print<K>(arena: &[AvlNode<K>], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print(arena, n.l, &format!("{tab}  "));
            let right = print(arena, n.r, &format!("{tab}  "));
            format!(
                "Node[{i}] [h={}] {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height, n.k
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &i32, b: &i32) -> i32 {
        a - b
    }

    fn leaf(arena: &mut Vec<AvlNode<i32>>, k: i32) -> u32 {
        arena.push(AvlNode::new(k));
        (arena.len() - 1) as u32
    }

    #[test]
    fn rotate_right_rewires_links_and_heights() {
        // 30 -> 20 -> 10 chain, heights fixed up by hand.
        let mut arena = Vec::new();
        let a = leaf(&mut arena, 30);
        let b = leaf(&mut arena, 20);
        let c = leaf(&mut arena, 10);
        arena[a as usize].l = Some(b);
        arena[b as usize].l = Some(c);
        arena[b as usize].height = 2;
        arena[a as usize].height = 3;

        let root = rotate_right(&mut arena, a);
        assert_eq!(root, b);
        assert_eq!(arena[b as usize].l, Some(c));
        assert_eq!(arena[b as usize].r, Some(a));
        assert_eq!(arena[a as usize].l, None);
        assert_eq!(arena[b as usize].height, 2);
        assert_eq!(arena[a as usize].height, 1);
    }

    #[test]
    fn insert_ascending_triggers_left_rotation() {
        let mut arena = Vec::new();
        let mut root = None;
        for k in [10, 20, 30] {
            let n = leaf(&mut arena, k);
            root = Some(insert(&mut arena, root, n, &cmp));
        }
        let r = root.unwrap();
        assert_eq!(arena[r as usize].k, 20);
        assert_eq!(arena[r as usize].height, 2);
        assert_avl_tree(&arena, root, &[], &cmp).unwrap();
    }

    #[test]
    fn remove_rebalances_on_tie() {
        // Deleting 30 leaves the root with balance 2 and a left child of
        // balance 0: the tie must take the single-rotation form.
        let mut arena = Vec::new();
        let mut root = None;
        for k in [20, 10, 30, 5, 15] {
            let n = leaf(&mut arena, k);
            root = Some(insert(&mut arena, root, n, &cmp));
        }
        let mut freelist = Vec::new();
        let (root, removed) = remove(&mut arena, &mut freelist, root, &30, &cmp);
        assert!(removed);
        let r = root.unwrap();
        assert_eq!(arena[r as usize].k, 10);
        assert_avl_tree(&arena, root, &freelist, &cmp).unwrap();
    }
}
