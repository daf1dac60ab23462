//! Nested-set arithmetic checked against parent links on random forests.

use std::collections::{BTreeSet, HashMap};

use kitti_api::tree::coords::{rebuild, Compaction, Gap, Placed, Rotation, Span};
use proptest::prelude::*;

/// Forests of up to 40 nodes; node `i` may only hang below an earlier node
fn forest() -> impl Strategy<Value = Vec<(i64, Option<i64>)>> {
    prop::collection::vec((any::<bool>(), any::<u32>()), 1..40).prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, (attached, pick))| {
                let id = i as i64 + 1;
                let parent = (attached && i > 0).then(|| (pick as i64 % i as i64) + 1);
                (id, parent)
            })
            .collect()
    })
}

fn by_id(nodes: &[Placed]) -> HashMap<i64, Placed> {
    nodes.iter().map(|n| (n.id, *n)).collect()
}

/// Descendants by walking parent links
fn linked_descendants(entries: &[(i64, Option<i64>)], of: i64) -> BTreeSet<i64> {
    let parents: HashMap<i64, Option<i64>> = entries.iter().copied().collect();
    entries
        .iter()
        .filter(|(id, _)| {
            let mut cursor = parents[id];
            while let Some(p) = cursor {
                if p == of {
                    return true;
                }
                cursor = parents[&p];
            }
            false
        })
        .map(|(id, _)| *id)
        .collect()
}

/// Descendants by coordinate containment
fn spanned_descendants(nodes: &[Placed], of: i64) -> BTreeSet<i64> {
    let span = by_id(nodes)[&of].span();
    nodes
        .iter()
        .filter(|n| span.encloses(&n.span()))
        .map(|n| n.id)
        .collect()
}

fn coords(nodes: &[Placed]) -> Vec<(i64, i64, i64)> {
    let mut out: Vec<_> = nodes.iter().map(|n| (n.id, n.lft, n.rght)).collect();
    out.sort_unstable();
    out
}

proptest! {
    #[test]
    fn coordinates_cover_one_to_twice_the_size(entries in forest()) {
        let nodes = rebuild(&entries);
        let mut values: Vec<i64> = nodes.iter().flat_map(|n| [n.lft, n.rght]).collect();
        values.sort_unstable();
        let expected: Vec<i64> = (1..=2 * entries.len() as i64).collect();
        prop_assert_eq!(values, expected);
    }

    #[test]
    fn containment_matches_parent_links(entries in forest()) {
        let nodes = rebuild(&entries);
        for (id, _) in &entries {
            prop_assert_eq!(spanned_descendants(&nodes, *id), linked_descendants(&entries, *id));
        }
    }

    #[test]
    fn depth_counts_ancestors(entries in forest()) {
        let nodes = rebuild(&entries);
        for node in &nodes {
            let ancestors = nodes.iter().filter(|a| a.span().encloses(&node.span())).count();
            prop_assert_eq!(node.depth, ancestors as i64);
        }
    }

    #[test]
    fn sibling_order_does_not_change_subtrees(entries in forest()) {
        let reversed: Vec<_> = entries.iter().rev().copied().collect();
        let a = rebuild(&entries);
        let b = rebuild(&reversed);
        for (id, _) in &entries {
            prop_assert_eq!(spanned_descendants(&a, *id), spanned_descendants(&b, *id));
        }
    }

    #[test]
    fn rebuild_of_own_layout_is_stable(entries in forest()) {
        let first = rebuild(&entries);
        let relaid: Vec<_> = first.iter().map(|n| (n.id, n.parent_id)).collect();
        prop_assert_eq!(rebuild(&relaid), first);
    }

    #[test]
    fn compaction_equals_rebuild_without_subtree(entries in forest(), pick in any::<prop::sample::Index>()) {
        let nodes = rebuild(&entries);
        let victim = nodes[pick.index(nodes.len())];
        let gone = linked_descendants(&entries, victim.id);
        let compaction = Compaction { removed: victim.span() };

        let compacted: Vec<Placed> = nodes
            .iter()
            .filter(|n| n.id != victim.id && !gone.contains(&n.id))
            .map(|n| Placed { lft: compaction.map(n.lft), rght: compaction.map(n.rght), ..*n })
            .collect();
        let remaining: Vec<_> = entries
            .iter()
            .filter(|(id, _)| *id != victim.id && !gone.contains(id))
            .copied()
            .collect();

        prop_assert_eq!(coords(&compacted), coords(&rebuild(&remaining)));
    }

    #[test]
    fn leaf_gap_equals_rebuild_with_last_child(entries in forest(), pick in any::<prop::sample::Index>()) {
        let nodes = rebuild(&entries);
        let parent = nodes[pick.index(nodes.len())];
        let gap = Gap::leaf(parent.rght);
        let new_id = entries.len() as i64 + 1;

        let mut grown: Vec<Placed> = nodes
            .iter()
            .map(|n| Placed { lft: gap.map(n.lft), rght: gap.map(n.rght), ..*n })
            .collect();
        let leaf = gap.leaf_span();
        grown.push(Placed { id: new_id, parent_id: Some(parent.id), lft: leaf.lft, rght: leaf.rght, depth: parent.depth + 1 });

        let mut extended = entries.clone();
        extended.push((new_id, Some(parent.id)));
        prop_assert_eq!(coords(&grown), coords(&rebuild(&extended)));
    }

    #[test]
    fn rotation_moves_subtree_intact(entries in forest(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let nodes = rebuild(&entries);
        let moved = nodes[a.index(nodes.len())];
        // any boundary outside the moved subtree is a legal target
        let targets: Vec<i64> = (1..=2 * nodes.len() as i64 + 1)
            .filter(|x| !(moved.lft < *x && *x <= moved.rght))
            .collect();
        let rotation = Rotation::new(moved.span(), targets[b.index(targets.len())]);

        let mut values: Vec<i64> = nodes
            .iter()
            .flat_map(|n| [rotation.map(n.lft), rotation.map(n.rght)])
            .collect();
        values.sort_unstable();
        let expected: Vec<i64> = (1..=2 * nodes.len() as i64).collect();
        prop_assert_eq!(values, expected);

        let shifted: HashMap<i64, Span> = nodes
            .iter()
            .map(|n| (n.id, Span::new(rotation.map(n.lft), rotation.map(n.rght))))
            .collect();
        let root = rotation.moved_span();
        prop_assert_eq!(root.width(), moved.span().width());
        for id in linked_descendants(&entries, moved.id) {
            prop_assert!(root.encloses(&shifted[&id]));
            let before = by_id(&nodes)[&id].span();
            prop_assert_eq!(shifted[&id].lft - before.lft, rotation.subtree_offset());
        }
    }
}
