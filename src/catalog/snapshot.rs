use std::collections::{BTreeMap, BTreeSet, HashSet};

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QuerySelect};

use super::{CategorySubtype, ItemKind};
use crate::entities::catalog_item;

/// The attributes the catalog rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogNode {
    pub id: i64,
    pub kind: ItemKind,
    pub subtype: Option<CategorySubtype>,
    pub parent_id: Option<i64>,
    pub depth: i64,
}

/// In-memory copy of the catalog tree shape.
///
/// Services load it inside their transaction, apply the change they are
/// about to make, and validate the result before writing anything. Depths are
/// always derived from parent links, so a simulated reparent immediately
/// shows the depths the subtree will end up with.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    nodes: BTreeMap<i64, CatalogNode>,
    children: BTreeMap<i64, BTreeSet<i64>>,
}

impl CatalogSnapshot {
    pub fn from_nodes(nodes: impl IntoIterator<Item = CatalogNode>) -> Self {
        let mut snapshot = Self::default();
        for node in nodes {
            snapshot.link(node);
        }
        let roots: Vec<i64> = snapshot
            .nodes
            .values()
            .filter(|n| snapshot.parent_of(n).is_none())
            .map(|n| n.id)
            .collect();
        for root in roots {
            snapshot.refresh_depths(root);
        }
        snapshot
    }

    pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let rows: Vec<(i64, ItemKind, Option<CategorySubtype>, Option<i64>)> =
            catalog_item::Entity::find()
                .select_only()
                .column(catalog_item::Column::Id)
                .column(catalog_item::Column::Kind)
                .column(catalog_item::Column::CategorySubtype)
                .column(catalog_item::Column::ParentId)
                .into_tuple()
                .all(db)
                .await?;

        Ok(Self::from_nodes(rows.into_iter().map(
            |(id, kind, subtype, parent_id)| CatalogNode {
                id,
                kind,
                subtype,
                parent_id,
                depth: 0,
            },
        )))
    }

    fn link(&mut self, node: CatalogNode) {
        if let Some(previous) = self.nodes.insert(node.id, node) {
            if let Some(old_parent) = previous.parent_id {
                if let Some(siblings) = self.children.get_mut(&old_parent) {
                    siblings.remove(&node.id);
                }
            }
        }
        if let Some(parent) = node.parent_id {
            self.children.entry(parent).or_default().insert(node.id);
        }
    }

    fn refresh_depths(&mut self, id: i64) {
        let start = match self.nodes.get(&id) {
            Some(node) => self.parent_of(node).map(|p| p.depth + 1).unwrap_or(0),
            None => return,
        };
        let mut seen = HashSet::new();
        let mut stack = vec![(id, start)];
        while let Some((current, depth)) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(&current) {
                node.depth = depth;
            }
            for child in self.children_ids(current) {
                stack.push((child, depth + 1));
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&CatalogNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, node: &CatalogNode) -> Option<&CatalogNode> {
        node.parent_id.and_then(|p| self.nodes.get(&p))
    }

    pub fn children_ids(&self, id: i64) -> Vec<i64> {
        self.children
            .get(&id)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, id: i64) -> bool {
        self.children.get(&id).map(|c| !c.is_empty()).unwrap_or(false)
    }

    /// `id` followed by all of its descendants
    pub fn subtree_ids(&self, id: i64) -> Vec<i64> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            for child in self.children_ids(current).into_iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Inserts or replaces a node; depths below it are recomputed
    pub fn upsert(&mut self, node: CatalogNode) {
        let id = node.id;
        self.link(node);
        self.refresh_depths(id);
    }

    /// Simulates moving `id` (with its subtree) under `parent_id`
    pub fn reparent(&mut self, id: i64, parent_id: Option<i64>) {
        if let Some(node) = self.nodes.get(&id).copied() {
            self.upsert(CatalogNode { parent_id, ..node });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, kind: ItemKind, parent_id: Option<i64>) -> CatalogNode {
        CatalogNode {
            id,
            kind,
            subtype: None,
            parent_id,
            depth: 0,
        }
    }

    #[test]
    fn depths_follow_parent_links() {
        let snap = CatalogSnapshot::from_nodes(vec![
            node(3, ItemKind::Product, Some(2)),
            node(2, ItemKind::Category, Some(1)),
            node(1, ItemKind::Category, None),
        ]);
        assert_eq!(snap.get(1).unwrap().depth, 0);
        assert_eq!(snap.get(3).unwrap().depth, 2);
        assert_eq!(snap.subtree_ids(1), vec![1, 2, 3]);
        assert!(snap.has_children(2));
        assert!(!snap.has_children(3));
    }

    #[test]
    fn reparent_moves_children_index_and_depths() {
        let mut snap = CatalogSnapshot::from_nodes(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, Some(1)),
            node(3, ItemKind::Product, Some(2)),
            node(4, ItemKind::Category, None),
        ]);
        snap.reparent(2, Some(4));
        assert!(!snap.has_children(1));
        assert_eq!(snap.children_ids(4), vec![2]);
        assert_eq!(snap.get(3).unwrap().depth, 2);

        snap.reparent(2, None);
        assert_eq!(snap.get(2).unwrap().depth, 0);
        assert_eq!(snap.get(3).unwrap().depth, 1);
    }

    #[test]
    fn unknown_ids_are_empty() {
        let snap = CatalogSnapshot::default();
        assert!(snap.is_empty());
        assert!(snap.subtree_ids(9).is_empty());
        assert!(snap.get(9).is_none());
    }
}
