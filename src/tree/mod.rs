//! Ordered hierarchies stored as nested sets.
//!
//! Each tree table carries `parent_id`, `lft`, `rght` and `depth`. All rows
//! of a table share one coordinate space, so the roots form an ordered forest
//! and a node's subtree is every row whose `lft` lies in `[lft, rght]`.

pub mod coords;
pub mod store;

use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use coords::Span;
pub use store::{NestedSetStore, NodeCoords, Placement};

/// How siblings of a tree are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingKey {
    /// Sorted by a text column, ties broken by id
    Column(&'static str),
    /// Insertion (id) order
    Insertion,
}

/// A tree table and its sibling ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeTable {
    pub name: &'static str,
    pub ordering: OrderingKey,
}

/// Where a node goes among its new siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Follow the table's ordering key
    #[default]
    Sorted,
    FirstChild,
    LastChild,
    Before(i64),
    After(i64),
}

/// Attempt to place a node under itself or one of its descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move node {node} under {target}, which is inside its own subtree")]
pub struct CycleError {
    pub node: i64,
    pub target: i64,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("tree node {0} not found")]
    NodeNotFound(i64),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
