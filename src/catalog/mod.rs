//! Category/product catalog domain: node kinds, the structural rules of the
//! catalog tree and the in-memory snapshot they are checked against.

pub mod kind;
pub mod rules;
pub mod snapshot;

pub use kind::{CategorySubtype, ItemKind};
pub use rules::{validate, validate_change, RuleViolation};
pub use snapshot::{CatalogNode, CatalogSnapshot};

use crate::tree::{NestedSetStore, OrderingKey, TreeTable};

/// Catalog items: siblings ordered by their default-language title
pub const CATALOG_TREE: TreeTable = TreeTable {
    name: "catalog_items",
    ordering: OrderingKey::Column("title_tr"),
};

pub const fn catalog_store() -> NestedSetStore {
    NestedSetStore::new(CATALOG_TREE)
}
