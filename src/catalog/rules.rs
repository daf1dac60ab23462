//! Structural rules of the category/product tree.
//!
//! Each rule is a standalone predicate over a node and the snapshot it lives
//! in. [`validate`] runs them in a fixed order and reports the first
//! violation. None of them touch storage.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::snapshot::{CatalogNode, CatalogSnapshot};

/// Deepest level a category may be attached under (root categories are 0).
pub const MAX_CATEGORY_PARENT_DEPTH: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    #[error("Products cannot have children")]
    IllegalChildren,

    #[error("Categories can only have 1 level of children")]
    TooDeep,

    #[error("Product parent must be a category")]
    InvalidParent,

    #[error("Category type can only be set for categories")]
    MisplacedSubtype,
}

impl RuleViolation {
    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::IllegalChildren => "illegal_children",
            RuleViolation::TooDeep => "too_deep",
            RuleViolation::InvalidParent => "invalid_parent",
            RuleViolation::MisplacedSubtype => "misplaced_subtype",
        }
    }
}

fn fail_if(violated: bool, violation: RuleViolation) -> Result<(), RuleViolation> {
    if violated {
        Err(violation)
    } else {
        Ok(())
    }
}

/// A product is always a leaf
pub fn check_product_is_leaf(
    node: &CatalogNode,
    snapshot: &CatalogSnapshot,
) -> Result<(), RuleViolation> {
    fail_if(
        node.kind.is_product() && snapshot.has_children(node.id),
        RuleViolation::IllegalChildren,
    )
}

/// Categories nest one level: a category may not hang below a sub-category
pub fn check_category_depth(
    node: &CatalogNode,
    snapshot: &CatalogSnapshot,
) -> Result<(), RuleViolation> {
    let too_deep = node.kind.is_category()
        && snapshot
            .parent_of(node)
            .map(|p| p.kind.is_category() && p.depth > MAX_CATEGORY_PARENT_DEPTH)
            .unwrap_or(false);
    fail_if(too_deep, RuleViolation::TooDeep)
}

/// A product can only be filed under a category
pub fn check_product_parent(
    node: &CatalogNode,
    snapshot: &CatalogSnapshot,
) -> Result<(), RuleViolation> {
    let wrong_parent = node.kind.is_product()
        && snapshot
            .parent_of(node)
            .map(|p| !p.kind.is_category())
            .unwrap_or(false);
    fail_if(wrong_parent, RuleViolation::InvalidParent)
}

/// Subtypes describe categories only
pub fn check_subtype_placement(node: &CatalogNode) -> Result<(), RuleViolation> {
    fail_if(
        !node.kind.is_category() && node.subtype.is_some(),
        RuleViolation::MisplacedSubtype,
    )
}

/// Runs every rule against `node` as it appears in `snapshot`.
pub fn validate(node: &CatalogNode, snapshot: &CatalogSnapshot) -> Result<(), RuleViolation> {
    check_product_is_leaf(node, snapshot)?;
    check_category_depth(node, snapshot)?;
    check_product_parent(node, snapshot)?;
    check_subtype_placement(node)
}

/// Validates the prospective state after `changed` was written: the node
/// itself, every node of its subtree, then its parent.
pub fn validate_change(changed: i64, snapshot: &CatalogSnapshot) -> Result<(), RuleViolation> {
    for id in snapshot.subtree_ids(changed) {
        if let Some(node) = snapshot.get(id) {
            validate(node, snapshot)?;
        }
    }
    if let Some(parent) = snapshot.get(changed).and_then(|n| snapshot.parent_of(n)) {
        validate(parent, snapshot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategorySubtype, ItemKind};
    use rstest::rstest;

    fn node(id: i64, kind: ItemKind, parent_id: Option<i64>) -> CatalogNode {
        CatalogNode {
            id,
            kind,
            subtype: None,
            parent_id,
            depth: 0,
        }
    }

    fn tree(nodes: Vec<CatalogNode>) -> CatalogSnapshot {
        CatalogSnapshot::from_nodes(nodes)
    }

    #[test]
    fn product_with_child_is_rejected() {
        let snap = tree(vec![
            node(1, ItemKind::Product, None),
            node(2, ItemKind::Product, Some(1)),
        ]);
        let product = snap.get(1).unwrap();
        assert_eq!(
            check_product_is_leaf(product, &snap),
            Err(RuleViolation::IllegalChildren)
        );
        assert_eq!(validate(product, &snap), Err(RuleViolation::IllegalChildren));
    }

    #[test]
    fn category_under_sub_category_is_too_deep() {
        let snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, Some(1)),
            node(3, ItemKind::Category, Some(2)),
        ]);
        assert_eq!(snap.get(3).unwrap().depth, 2);
        assert_eq!(
            check_category_depth(snap.get(3).unwrap(), &snap),
            Err(RuleViolation::TooDeep)
        );
        assert_eq!(check_category_depth(snap.get(2).unwrap(), &snap), Ok(()));
    }

    #[test]
    fn product_may_sit_under_sub_category() {
        let snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, Some(1)),
            node(3, ItemKind::Product, Some(2)),
        ]);
        assert_eq!(validate(snap.get(3).unwrap(), &snap), Ok(()));
    }

    #[test]
    fn product_under_product_has_invalid_parent() {
        let snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Product, Some(1)),
            node(3, ItemKind::Product, Some(2)),
        ]);
        assert_eq!(
            check_product_parent(snap.get(3).unwrap(), &snap),
            Err(RuleViolation::InvalidParent)
        );
    }

    #[test]
    fn subtype_on_product_is_misplaced() {
        let mut product = node(1, ItemKind::Product, None);
        product.subtype = Some(CategorySubtype::Type2);
        assert_eq!(
            check_subtype_placement(&product),
            Err(RuleViolation::MisplacedSubtype)
        );
        let mut category = node(2, ItemKind::Category, None);
        category.subtype = Some(CategorySubtype::Type2);
        assert_eq!(check_subtype_placement(&category), Ok(()));
    }

    #[rstest]
    #[case(ItemKind::Category, None, Ok(()))]
    #[case(ItemKind::Category, Some(1), Ok(()))]
    #[case(ItemKind::Category, Some(2), Err(RuleViolation::TooDeep))]
    #[case(ItemKind::Category, Some(3), Ok(()))]
    #[case(ItemKind::Product, Some(1), Ok(()))]
    #[case(ItemKind::Product, Some(2), Ok(()))]
    #[case(ItemKind::Product, Some(3), Err(RuleViolation::InvalidParent))]
    fn attaching_a_new_leaf(
        #[case] kind: ItemKind,
        #[case] parent: Option<i64>,
        #[case] expected: Result<(), RuleViolation>,
    ) {
        // 1 root category, 2 sub-category, 3 product under 1
        let mut snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, Some(1)),
            node(3, ItemKind::Product, Some(1)),
        ]);
        snap.upsert(node(10, kind, parent));
        assert_eq!(validate(snap.get(10).unwrap(), &snap), expected);
    }

    #[test]
    fn validate_change_checks_the_new_parent() {
        let mut snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Product, Some(1)),
        ]);
        snap.upsert(node(3, ItemKind::Category, Some(2)));
        assert_eq!(validate_change(3, &snap), Err(RuleViolation::IllegalChildren));
    }

    #[test]
    fn validate_change_checks_moved_descendants() {
        // moving category 2 (with child category 3) below root category 4
        let mut snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, None),
            node(3, ItemKind::Product, Some(2)),
            node(4, ItemKind::Category, Some(1)),
            node(5, ItemKind::Category, None),
            node(6, ItemKind::Category, Some(5)),
        ]);
        assert_eq!(validate_change(2, &snap), Ok(()));
        snap.reparent(5, Some(1));
        assert_eq!(snap.get(6).unwrap().depth, 2);
        assert_eq!(validate_change(5, &snap), Err(RuleViolation::TooDeep));
    }

    #[test]
    fn validation_is_idempotent() {
        let snap = tree(vec![
            node(1, ItemKind::Category, None),
            node(2, ItemKind::Category, Some(1)),
            node(3, ItemKind::Category, Some(2)),
        ]);
        let n = snap.get(3).unwrap();
        assert_eq!(validate(n, &snap), validate(n, &snap));
        assert_eq!(validate_change(1, &snap), validate_change(1, &snap));
    }
}
