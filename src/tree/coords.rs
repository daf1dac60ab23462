//! Pure nested-set arithmetic.
//!
//! Every structural change to a tree table is expressed here as a mapping
//! from old coordinate values to new ones. The store turns each mapping into
//! one `UPDATE ... SET lft = CASE ..., rght = CASE ...` statement, so these
//! functions are the executable definition of what those statements do.

use std::collections::{HashMap, HashSet};

/// The `[lft, rght]` range of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub lft: i64,
    pub rght: i64,
}

impl Span {
    pub fn new(lft: i64, rght: i64) -> Self {
        Self { lft, rght }
    }

    /// Number of coordinate values the subtree occupies (twice its size)
    pub fn width(&self) -> i64 {
        self.rght - self.lft + 1
    }

    /// True when `x` is this node or lies inside its subtree
    pub fn contains(&self, x: i64) -> bool {
        self.lft <= x && x <= self.rght
    }

    /// Strict descendant test for another node's span
    pub fn encloses(&self, other: &Span) -> bool {
        self.lft < other.lft && other.rght < self.rght
    }
}

/// Opening room for a new node at coordinate `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub at: i64,
    pub width: i64,
}

impl Gap {
    /// Room for a single leaf
    pub fn leaf(at: i64) -> Self {
        Self { at, width: 2 }
    }

    pub fn map(&self, value: i64) -> i64 {
        if value >= self.at {
            value + self.width
        } else {
            value
        }
    }

    /// Coordinates the inserted leaf takes once the gap is open
    pub fn leaf_span(&self) -> Span {
        Span::new(self.at, self.at + 1)
    }
}

/// Moving a subtree so that it starts at coordinate `at` (measured before
/// the move). Values outside `[lo, hi]` are untouched; inside, the subtree
/// and the block it jumps over swap places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub subtree: Span,
    pub at: i64,
}

impl Rotation {
    /// `at` must not fall strictly inside the subtree
    pub fn new(subtree: Span, at: i64) -> Self {
        debug_assert!(!(subtree.lft < at && at <= subtree.rght));
        Self { subtree, at }
    }

    pub fn is_identity(&self) -> bool {
        self.at == self.subtree.lft || self.at == self.subtree.rght + 1
    }

    /// Inclusive range of values the rotation can change
    pub fn affected(&self) -> (i64, i64) {
        if self.at > self.subtree.rght {
            (self.subtree.lft, self.at - 1)
        } else {
            (self.at, self.subtree.rght)
        }
    }

    /// Shift applied to values inside the moved subtree
    pub fn subtree_offset(&self) -> i64 {
        if self.at > self.subtree.rght {
            self.at - self.subtree.rght - 1
        } else {
            self.at - self.subtree.lft
        }
    }

    /// Shift applied to the values the subtree jumps over
    pub fn others_offset(&self) -> i64 {
        if self.at > self.subtree.rght {
            -self.subtree.width()
        } else {
            self.subtree.width()
        }
    }

    pub fn map(&self, value: i64) -> i64 {
        let (lo, hi) = self.affected();
        if value < lo || value > hi {
            value
        } else if self.subtree.contains(value) {
            value + self.subtree_offset()
        } else {
            value + self.others_offset()
        }
    }

    /// Where the subtree root ends up
    pub fn moved_span(&self) -> Span {
        Span::new(
            self.map(self.subtree.lft),
            self.map(self.subtree.rght),
        )
    }
}

/// Closing the hole left by a deleted subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compaction {
    pub removed: Span,
}

impl Compaction {
    pub fn map(&self, value: i64) -> i64 {
        if value > self.removed.rght {
            value - self.removed.width()
        } else {
            value
        }
    }
}

/// One node as laid out by [`rebuild`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub lft: i64,
    pub rght: i64,
    pub depth: i64,
}

impl Placed {
    pub fn span(&self) -> Span {
        Span::new(self.lft, self.rght)
    }
}

/// Lays out a forest from parent links alone.
///
/// Siblings keep the order in which they appear in `entries`. Entries whose
/// parent is unknown, or that are cut off from every root by a parent cycle,
/// are placed as roots. Output is in pre-order.
pub fn rebuild(entries: &[(i64, Option<i64>)]) -> Vec<Placed> {
    let known: HashSet<i64> = entries.iter().map(|(id, _)| *id).collect();
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut roots = Vec::new();
    for (id, parent) in entries {
        match parent {
            Some(p) if known.contains(p) && p != id => children.entry(*p).or_default().push(*id),
            _ => roots.push(*id),
        }
    }

    let mut out: Vec<Placed> = Vec::with_capacity(entries.len());
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(entries.len());
    let mut counter = 1;

    let mut place = |root: i64, parent: Option<i64>, out: &mut Vec<Placed>, index: &mut HashMap<i64, usize>| {
        // (node, parent, depth, leaving)
        let mut stack = vec![(root, parent, 0_i64, false)];
        while let Some((id, parent_id, depth, leaving)) = stack.pop() {
            if leaving {
                if let Some(&i) = index.get(&id) {
                    out[i].rght = counter;
                    counter += 1;
                }
                continue;
            }
            if index.contains_key(&id) {
                continue;
            }
            index.insert(id, out.len());
            out.push(Placed {
                id,
                parent_id,
                lft: counter,
                rght: 0,
                depth,
            });
            counter += 1;
            stack.push((id, parent_id, depth, true));
            if let Some(kids) = children.get(&id) {
                for kid in kids.iter().rev() {
                    stack.push((*kid, Some(id), depth + 1, false));
                }
            }
        }
    };

    for root in &roots {
        place(*root, None, &mut out, &mut index);
    }
    // members of parent cycles never hang below a root
    for (id, _) in entries {
        if !index.contains_key(id) {
            place(*id, None, &mut out, &mut index);
        }
    }
    out
}

/// Index of the first sibling that sorts after `key`, given siblings in
/// coordinate order. `None` means the new node goes last.
pub fn sorted_slot<K: Ord>(sibling_keys: &[K], key: &K) -> Option<usize> {
    sibling_keys.iter().position(|k| k > key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 [1,8] > 2 [2,5] > 3 [3,4]; 1 > 4 [6,7]; 5 [9,10]
    fn sample() -> Vec<Placed> {
        rebuild(&[(1, None), (2, Some(1)), (3, Some(2)), (4, Some(1)), (5, None)])
    }

    fn span_of(nodes: &[Placed], id: i64) -> Span {
        nodes.iter().find(|n| n.id == id).unwrap().span()
    }

    #[test]
    fn rebuild_lays_out_preorder() {
        let nodes = sample();
        let ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(span_of(&nodes, 1), Span::new(1, 8));
        assert_eq!(span_of(&nodes, 3), Span::new(3, 4));
        assert_eq!(span_of(&nodes, 5), Span::new(9, 10));
        assert_eq!(nodes.iter().find(|n| n.id == 3).unwrap().depth, 2);
    }

    #[test]
    fn rebuild_repairs_orphans_and_cycles() {
        let nodes = rebuild(&[(1, Some(99)), (2, Some(3)), (3, Some(2))]);
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| n.rght > n.lft));
        assert_eq!(nodes[0].parent_id, None);
    }

    #[test]
    fn gap_shifts_everything_at_or_after_position() {
        let gap = Gap::leaf(6);
        assert_eq!(gap.map(5), 5);
        assert_eq!(gap.map(6), 8);
        assert_eq!(gap.map(8), 10);
        assert_eq!(gap.leaf_span(), Span::new(6, 7));
    }

    #[test]
    fn rotation_right_swaps_subtree_with_following_block() {
        // move node 2 ([2,5]) to after node 4 inside node 1: at = 8 (node 1's rght)
        let rot = Rotation::new(Span::new(2, 5), 8);
        assert_eq!(rot.affected(), (2, 7));
        assert_eq!(rot.map(6), 2);
        assert_eq!(rot.map(7), 3);
        assert_eq!(rot.moved_span(), Span::new(4, 7));
        assert_eq!(rot.map(8), 8);
        assert_eq!(rot.map(1), 1);
    }

    #[test]
    fn rotation_left_swaps_subtree_with_preceding_block() {
        // move node 5 ([9,10]) to be first child of node 1: at = 2
        let rot = Rotation::new(Span::new(9, 10), 2);
        assert_eq!(rot.moved_span(), Span::new(2, 3));
        assert_eq!(rot.map(2), 4);
        assert_eq!(rot.map(8), 10);
        assert_eq!(rot.map(1), 1);
    }

    #[test]
    fn rotation_to_own_boundary_is_identity() {
        assert!(Rotation::new(Span::new(2, 5), 2).is_identity());
        assert!(Rotation::new(Span::new(2, 5), 6).is_identity());
        assert!(!Rotation::new(Span::new(2, 5), 9).is_identity());
        let rot = Rotation::new(Span::new(2, 5), 6);
        assert!((1..=10).all(|v| rot.map(v) == v));
    }

    #[test]
    fn compaction_closes_removed_range() {
        let c = Compaction {
            removed: Span::new(2, 5),
        };
        assert_eq!(c.map(1), 1);
        assert_eq!(c.map(6), 2);
        assert_eq!(c.map(8), 4);
    }

    #[test]
    fn span_containment() {
        let s = Span::new(2, 5);
        assert!(s.contains(2) && s.contains(5));
        assert!(!s.contains(6));
        assert!(s.encloses(&Span::new(3, 4)));
        assert!(!s.encloses(&s));
    }

    #[test]
    fn sorted_slot_finds_first_greater_key() {
        let keys = vec![("a", 1), ("c", 2), ("c", 5)];
        assert_eq!(sorted_slot(&keys, &("b", 9)), Some(1));
        assert_eq!(sorted_slot(&keys, &("c", 3)), Some(2));
        assert_eq!(sorted_slot(&keys, &("d", 0)), None);
    }
}
