//! Read-only scans over the arena: lookups, order queries, counts,
//! traversals, and the structural utilities (`mirror`, `copy`).
//!
//! Everything here takes the arena by shared reference except [`mirror`],
//! which swaps links in place.

use std::collections::VecDeque;

use crate::types::{AvlNode, PathTrace};

/// Locate `key` in the subtree at `root`.
pub fn find<K, C>(arena: &[AvlNode<K>], root: Option<u32>, key: &K, comparator: &C) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, &arena[i as usize].k);
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 {
            arena[i as usize].l
        } else {
            arena[i as usize].r
        };
    }
    None
}

/// Leftmost node of the subtree.
pub fn min<K>(arena: &[AvlNode<K>], node: Option<u32>) -> Option<u32> {
    let mut curr = node?;
    while let Some(l) = arena[curr as usize].l {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node of the subtree.
pub fn max<K>(arena: &[AvlNode<K>], node: Option<u32>) -> Option<u32> {
    let mut curr = node?;
    while let Some(r) = arena[curr as usize].r {
        curr = r;
    }
    Some(curr)
}

/// Edge count from `root` down to `key`, `None` if absent.
pub fn depth_of<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<usize>
where
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    let mut depth = 0;
    while let Some(i) = curr {
        let cmp = comparator(key, &arena[i as usize].k);
        if cmp == 0 {
            return Some(depth);
        }
        depth += 1;
        curr = if cmp < 0 {
            arena[i as usize].l
        } else {
            arena[i as usize].r
        };
    }
    None
}

/// Node indices visited while descending toward `key`.
///
/// On a miss the trace ends at the node where descent ran out of links;
/// `found` tells the two apart.
pub fn path_to<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> PathTrace
where
    C: Fn(&K, &K) -> i32,
{
    let mut nodes = Vec::new();
    let mut curr = root;
    while let Some(i) = curr {
        nodes.push(i);
        let cmp = comparator(key, &arena[i as usize].k);
        if cmp == 0 {
            return PathTrace { nodes, found: true };
        }
        curr = if cmp < 0 {
            arena[i as usize].l
        } else {
            arena[i as usize].r
        };
    }
    PathTrace {
        nodes,
        found: false,
    }
}

/// Largest key strictly less than `key`, whether or not `key` is present.
pub fn predecessor<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut best = None;
    let mut curr = root;
    while let Some(i) = curr {
        if comparator(key, &arena[i as usize].k) > 0 {
            best = Some(i);
            curr = arena[i as usize].r;
        } else {
            curr = arena[i as usize].l;
        }
    }
    best
}

/// Smallest key strictly greater than `key`, whether or not `key` is
/// present.
pub fn successor<K, C>(
    arena: &[AvlNode<K>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut best = None;
    let mut curr = root;
    while let Some(i) = curr {
        if comparator(key, &arena[i as usize].k) < 0 {
            best = Some(i);
            curr = arena[i as usize].l;
        } else {
            curr = arena[i as usize].r;
        }
    }
    best
}

/// Append the indices with `lo <= k <= hi` to `out` in ascending order.
///
/// Subtrees provably outside the range are never entered.
pub fn range<K, C>(
    arena: &[AvlNode<K>],
    node: Option<u32>,
    lo: &K,
    hi: &K,
    comparator: &C,
    out: &mut Vec<u32>,
) where
    C: Fn(&K, &K) -> i32,
{
    let Some(i) = node else {
        return;
    };
    if comparator(&arena[i as usize].k, lo) > 0 {
        range(arena, arena[i as usize].l, lo, hi, comparator, out);
    }
    if comparator(&arena[i as usize].k, lo) >= 0 && comparator(&arena[i as usize].k, hi) <= 0 {
        out.push(i);
    }
    if comparator(&arena[i as usize].k, hi) < 0 {
        range(arena, arena[i as usize].r, lo, hi, comparator, out);
    }
}

pub fn count_nodes<K>(arena: &[AvlNode<K>], node: Option<u32>) -> usize {
    let Some(i) = node else {
        return 0;
    };
    1 + count_nodes(arena, arena[i as usize].l) + count_nodes(arena, arena[i as usize].r)
}

pub fn count_leaves<K>(arena: &[AvlNode<K>], node: Option<u32>) -> usize {
    let Some(i) = node else {
        return 0;
    };
    let n = &arena[i as usize];
    if n.l.is_none() && n.r.is_none() {
        return 1;
    }
    count_leaves(arena, n.l) + count_leaves(arena, n.r)
}

pub fn count_internal<K>(arena: &[AvlNode<K>], node: Option<u32>) -> usize {
    let Some(i) = node else {
        return 0;
    };
    let n = &arena[i as usize];
    if n.l.is_none() && n.r.is_none() {
        return 0;
    }
    1 + count_internal(arena, n.l) + count_internal(arena, n.r)
}

/// Subtree height recomputed from the links, ignoring the stored `height`
/// fields.
pub fn measured_height<K>(arena: &[AvlNode<K>], node: Option<u32>) -> u32 {
    let Some(i) = node else {
        return 0;
    };
    let l = measured_height(arena, arena[i as usize].l);
    let r = measured_height(arena, arena[i as usize].r);
    1 + l.max(r)
}

/// External balance auditor: every node's recomputed balance factor must
/// lie in `{-1, 0, 1}`. Independent of the tree's own height bookkeeping.
pub fn is_balanced<K>(arena: &[AvlNode<K>], node: Option<u32>) -> bool {
    let Some(i) = node else {
        return true;
    };
    let l = arena[i as usize].l;
    let r = arena[i as usize].r;
    let balance = measured_height(arena, l) as i32 - measured_height(arena, r) as i32;
    (-1..=1).contains(&balance) && is_balanced(arena, l) && is_balanced(arena, r)
}

/// Swap left and right links at every node, in place.
///
/// The result reads in descending order; it is no longer a valid
/// ascending BST until mirrored back.
pub fn mirror<K>(arena: &mut [AvlNode<K>], node: Option<u32>) {
    let Some(i) = node else {
        return;
    };
    let idx = i as usize;
    let l = arena[idx].l;
    let r = arena[idx].r;
    arena[idx].l = r;
    arena[idx].r = l;
    mirror(arena, l);
    mirror(arena, r);
}

/// Deep-copy the subtree into `dst`, preserving keys and heights.
///
/// The copy is compact: `dst` receives exactly the live nodes, so a
/// fragmented arena loses its free slots in the clone.
pub fn copy<K: Clone>(
    src: &[AvlNode<K>],
    node: Option<u32>,
    dst: &mut Vec<AvlNode<K>>,
) -> Option<u32> {
    let i = node?;
    let (k, l0, r0, h) = {
        let n = &src[i as usize];
        (n.k.clone(), n.l, n.r, n.height)
    };
    let l = copy(src, l0, dst);
    let r = copy(src, r0, dst);
    dst.push(AvlNode {
        k,
        l,
        r,
        height: h,
    });
    Some((dst.len() - 1) as u32)
}

pub fn in_order<K>(arena: &[AvlNode<K>], node: Option<u32>, out: &mut Vec<u32>) {
    let Some(i) = node else {
        return;
    };
    in_order(arena, arena[i as usize].l, out);
    out.push(i);
    in_order(arena, arena[i as usize].r, out);
}

pub fn pre_order<K>(arena: &[AvlNode<K>], node: Option<u32>, out: &mut Vec<u32>) {
    let Some(i) = node else {
        return;
    };
    out.push(i);
    pre_order(arena, arena[i as usize].l, out);
    pre_order(arena, arena[i as usize].r, out);
}

pub fn post_order<K>(arena: &[AvlNode<K>], node: Option<u32>, out: &mut Vec<u32>) {
    let Some(i) = node else {
        return;
    };
    post_order(arena, arena[i as usize].l, out);
    post_order(arena, arena[i as usize].r, out);
    out.push(i);
}

/// Breadth-first order, siblings left-to-right through a FIFO queue.
pub fn level_order<K>(arena: &[AvlNode<K>], root: Option<u32>, out: &mut Vec<u32>) {
    let Some(root) = root else {
        return;
    };
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(i) = queue.pop_front() {
        out.push(i);
        if let Some(l) = arena[i as usize].l {
            queue.push_back(l);
        }
        if let Some(r) = arena[i as usize].r {
            queue.push_back(r);
        }
    }
}
