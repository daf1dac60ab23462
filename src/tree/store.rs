use sea_orm::{
    sea_query::{Alias, CaseStatement, Cond, Expr, Func, Order, Query, SelectStatement, SimpleExpr},
    ConnectionTrait, DbErr, FromQueryResult, StatementBuilder,
};
use tracing::{debug, instrument};

use super::coords::{self, Compaction, Gap, Rotation, Span};
use super::{CycleError, OrderingKey, Position, TreeError, TreeTable};

const ID: &str = "id";
const PARENT: &str = "parent_id";
const LFT: &str = "lft";
const RGHT: &str = "rght";
const DEPTH: &str = "depth";
const SORT_KEY: &str = "sort_key";

fn ident(name: &str) -> Alias {
    Alias::new(name)
}

fn col(name: &str) -> Expr {
    Expr::col(ident(name))
}

/// Tree coordinates of one stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct NodeCoords {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub lft: i64,
    pub rght: i64,
    pub depth: i64,
}

impl NodeCoords {
    pub fn span(&self) -> Span {
        Span::new(self.lft, self.rght)
    }

    pub fn is_leaf(&self) -> bool {
        self.rght == self.lft + 1
    }
}

/// Coordinates a new row must be inserted with after [`NestedSetStore::prepare_insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent_id: Option<i64>,
    pub lft: i64,
    pub rght: i64,
    pub depth: i64,
}

#[derive(Debug, FromQueryResult)]
struct SiblingRow {
    id: i64,
    lft: i64,
    sort_key: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct MaxRght {
    max_rght: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct LinkRow {
    id: i64,
    parent_id: Option<i64>,
    sort_key: Option<String>,
}

/// Sibling order for title-ordered trees: case-folded key, ties by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey(Option<String>, i64);

impl SortKey {
    fn new(key: Option<&str>, id: i64) -> Self {
        SortKey(key.map(str::to_lowercase), id)
    }
}

/// Nested-set operations over one tree table.
///
/// Every method takes the connection to run on, so callers pass their open
/// transaction and each coordinate recompute stays inside it as a single
/// statement.
#[derive(Debug, Clone, Copy)]
pub struct NestedSetStore {
    table: TreeTable,
}

impl NestedSetStore {
    pub const fn new(table: TreeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TreeTable {
        &self.table
    }

    fn select_coords(&self) -> SelectStatement {
        Query::select()
            .columns([ident(ID), ident(PARENT), ident(LFT), ident(RGHT), ident(DEPTH)])
            .from(ident(self.table.name))
            .to_owned()
    }

    async fn fetch<C: ConnectionTrait>(
        &self,
        db: &C,
        stmt: &SelectStatement,
    ) -> Result<Vec<NodeCoords>, DbErr> {
        NodeCoords::find_by_statement(db.get_database_backend().build(stmt))
            .all(db)
            .await
    }

    async fn exec<C: ConnectionTrait, S: StatementBuilder>(
        &self,
        db: &C,
        stmt: &S,
    ) -> Result<u64, DbErr> {
        let result = db.execute(db.get_database_backend().build(stmt)).await?;
        Ok(result.rows_affected())
    }

    /// Loads one node's coordinates
    pub async fn node<C: ConnectionTrait>(&self, db: &C, id: i64) -> Result<NodeCoords, TreeError> {
        let stmt = self
            .select_coords()
            .and_where(col(ID).eq(id))
            .to_owned();
        let stmt = db.get_database_backend().build(&stmt);
        NodeCoords::find_by_statement(stmt)
            .one(db)
            .await?
            .ok_or(TreeError::NodeNotFound(id))
    }

    async fn max_rght<C: ConnectionTrait>(&self, db: &C) -> Result<i64, DbErr> {
        let stmt = Query::select()
            .expr_as(Func::max(col(RGHT)), ident("max_rght"))
            .from(ident(self.table.name))
            .to_owned();
        let row = MaxRght::find_by_statement(db.get_database_backend().build(&stmt))
            .one(db)
            .await?;
        Ok(row.and_then(|r| r.max_rght).unwrap_or(0))
    }

    fn parent_filter(parent_id: Option<i64>) -> SimpleExpr {
        match parent_id {
            Some(p) => col(PARENT).eq(p),
            None => col(PARENT).is_null(),
        }
    }

    fn sort_key_expr(&self) -> SimpleExpr {
        match self.table.ordering {
            OrderingKey::Column(name) => col(name).into(),
            OrderingKey::Insertion => Expr::val(Option::<String>::None).into(),
        }
    }

    fn key_for(&self, sort_key: Option<&str>, id: i64) -> SortKey {
        match self.table.ordering {
            OrderingKey::Column(_) => SortKey::new(sort_key, id),
            OrderingKey::Insertion => SortKey(None, id),
        }
    }

    /// Coordinate right after the last child of `parent` (or the last root)
    async fn end_of<C: ConnectionTrait>(
        &self,
        db: &C,
        parent: Option<&NodeCoords>,
    ) -> Result<i64, DbErr> {
        match parent {
            Some(p) => Ok(p.rght),
            None => Ok(self.max_rght(db).await? + 1),
        }
    }

    /// Coordinate at which a node (or moved subtree) starts, evaluated on the
    /// current state. `moving` is excluded from sibling lookups.
    async fn insertion_point<C: ConnectionTrait>(
        &self,
        db: &C,
        parent: Option<&NodeCoords>,
        position: Position,
        sort_key: Option<&str>,
        moving: Option<&NodeCoords>,
    ) -> Result<i64, TreeError> {
        let parent_id = parent.map(|p| p.id);

        match position {
            Position::FirstChild => Ok(parent.map(|p| p.lft + 1).unwrap_or(1)),
            Position::LastChild => Ok(self.end_of(db, parent).await?),
            Position::Before(sibling_id) | Position::After(sibling_id) => {
                let sibling = self.node(db, sibling_id).await?;
                if sibling.parent_id != parent_id || Some(sibling.id) == moving.map(|m| m.id) {
                    return Err(TreeError::InvalidPosition(format!(
                        "node {} is not a sibling at the requested parent",
                        sibling_id
                    )));
                }
                Ok(match position {
                    Position::Before(_) => sibling.lft,
                    _ => sibling.rght + 1,
                })
            }
            Position::Sorted => {
                let mut stmt = Query::select()
                    .columns([ident(ID), ident(LFT)])
                    .expr_as(self.sort_key_expr(), ident(SORT_KEY))
                    .from(ident(self.table.name))
                    .and_where(Self::parent_filter(parent_id))
                    .order_by(ident(LFT), Order::Asc)
                    .to_owned();
                if let Some(m) = moving {
                    stmt.and_where(col(ID).ne(m.id));
                }
                let siblings = SiblingRow::find_by_statement(db.get_database_backend().build(&stmt))
                    .all(db)
                    .await?;
                let keys: Vec<SortKey> = siblings
                    .iter()
                    .map(|s| self.key_for(s.sort_key.as_deref(), s.id))
                    .collect();
                let key = self.key_for(sort_key, moving.map(|m| m.id).unwrap_or(i64::MAX));
                match coords::sorted_slot(&keys, &key) {
                    Some(i) => Ok(siblings[i].lft),
                    None => Ok(self.end_of(db, parent).await?),
                }
            }
        }
    }

    /// Opens a two-wide gap where the new node belongs and returns the
    /// coordinates the caller must insert the row with.
    #[instrument(skip(self, db, sort_key), fields(table = self.table.name))]
    pub async fn prepare_insert<C: ConnectionTrait>(
        &self,
        db: &C,
        parent_id: Option<i64>,
        position: Position,
        sort_key: Option<&str>,
    ) -> Result<Placement, TreeError> {
        let parent = match parent_id {
            Some(id) => Some(self.node(db, id).await?),
            None => None,
        };
        let at = self
            .insertion_point(db, parent.as_ref(), position, sort_key, None)
            .await?;
        let gap = Gap::leaf(at);

        let stmt = Query::update()
            .table(ident(self.table.name))
            .value(ident(LFT), Self::gap_case(LFT, gap))
            .value(ident(RGHT), Self::gap_case(RGHT, gap))
            .and_where(col(RGHT).gte(gap.at))
            .to_owned();
        let shifted = self.exec(db, &stmt).await?;
        debug!(at = gap.at, shifted, "opened gap");

        let span = gap.leaf_span();
        Ok(Placement {
            parent_id,
            lft: span.lft,
            rght: span.rght,
            depth: parent.map(|p| p.depth + 1).unwrap_or(0),
        })
    }

    fn gap_case(column: &str, gap: Gap) -> SimpleExpr {
        Expr::case(col(column).gte(gap.at), col(column).add(gap.width))
            .finally(col(column))
            .into()
    }

    fn rotation_case(column: &str, rot: &Rotation) -> SimpleExpr {
        let (lo, hi) = rot.affected();
        Expr::case(
            col(column).between(rot.subtree.lft, rot.subtree.rght),
            col(column).add(rot.subtree_offset()),
        )
        .case(col(column).between(lo, hi), col(column).add(rot.others_offset()))
        .finally(col(column))
        .into()
    }

    /// Re-parents a node with its whole subtree.
    ///
    /// Fails with [`CycleError`] before touching anything when the new
    /// parent is the node itself or one of its descendants.
    #[instrument(skip(self, db, sort_key), fields(table = self.table.name))]
    pub async fn move_subtree<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i64,
        new_parent_id: Option<i64>,
        position: Position,
        sort_key: Option<&str>,
    ) -> Result<NodeCoords, TreeError> {
        let node = self.node(db, id).await?;
        let parent = match new_parent_id {
            Some(pid) => Some(self.node(db, pid).await?),
            None => None,
        };
        if let Some(p) = &parent {
            if node.span().contains(p.lft) {
                return Err(CycleError {
                    node: node.id,
                    target: p.id,
                }
                .into());
            }
        }

        let at = self
            .insertion_point(db, parent.as_ref(), position, sort_key, Some(&node))
            .await?;
        let rotation = Rotation::new(node.span(), at);
        let depth_delta = parent.map(|p| p.depth + 1).unwrap_or(0) - node.depth;

        if rotation.is_identity() && node.parent_id == new_parent_id && depth_delta == 0 {
            return Ok(node);
        }

        let (lo, hi) = rotation.affected();
        let stmt = Query::update()
            .table(ident(self.table.name))
            .value(ident(LFT), Self::rotation_case(LFT, &rotation))
            .value(ident(RGHT), Self::rotation_case(RGHT, &rotation))
            .value(
                ident(DEPTH),
                Expr::case(
                    col(LFT).between(node.lft, node.rght),
                    col(DEPTH).add(depth_delta),
                )
                .finally(col(DEPTH)),
            )
            .value(
                ident(PARENT),
                Expr::case(col(ID).eq(node.id), new_parent_id).finally(col(PARENT)),
            )
            .cond_where(
                Cond::any()
                    .add(col(LFT).between(lo, hi))
                    .add(col(RGHT).between(lo, hi))
                    .add(col(ID).eq(node.id)),
            )
            .to_owned();
        let touched = self.exec(db, &stmt).await?;
        debug!(from = node.lft, at, touched, "moved subtree");

        self.node(db, id).await
    }

    /// Direct children (or the roots) in sibling order
    pub async fn children_of<C: ConnectionTrait>(
        &self,
        db: &C,
        parent_id: Option<i64>,
    ) -> Result<Vec<NodeCoords>, TreeError> {
        let stmt = self
            .select_coords()
            .and_where(Self::parent_filter(parent_id))
            .order_by(ident(LFT), Order::Asc)
            .to_owned();
        Ok(self.fetch(db, &stmt).await?)
    }

    /// Range predicate selecting a node's subtree, usable as an entity filter
    pub fn subtree_filter(&self, node: &NodeCoords, include_self: bool) -> SimpleExpr {
        let qualified = |column: &str| Expr::col((ident(self.table.name), ident(column)));
        if include_self {
            qualified(LFT).between(node.lft, node.rght)
        } else {
            qualified(LFT)
                .gt(node.lft)
                .and(qualified(RGHT).lt(node.rght))
        }
    }

    /// Whole subtree in pre-order via one range predicate
    pub async fn descendants_of<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i64,
        include_self: bool,
    ) -> Result<Vec<NodeCoords>, TreeError> {
        let node = self.node(db, id).await?;
        let stmt = self
            .select_coords()
            .and_where(self.subtree_filter(&node, include_self))
            .order_by(ident(LFT), Order::Asc)
            .to_owned();
        Ok(self.fetch(db, &stmt).await?)
    }

    /// Ancestors from the root down to the direct parent
    pub async fn ancestors_of<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i64,
    ) -> Result<Vec<NodeCoords>, TreeError> {
        let node = self.node(db, id).await?;
        let stmt = self
            .select_coords()
            .and_where(col(LFT).lt(node.lft))
            .and_where(col(RGHT).gt(node.rght))
            .order_by(ident(LFT), Order::Asc)
            .to_owned();
        Ok(self.fetch(db, &stmt).await?)
    }

    /// Every node of the table in pre-order
    pub async fn snapshot<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<NodeCoords>, TreeError> {
        let stmt = self
            .select_coords()
            .order_by(ident(LFT), Order::Asc)
            .to_owned();
        Ok(self.fetch(db, &stmt).await?)
    }

    /// Deletes a node and its descendants, then closes the gap with one
    /// compaction statement. Returns the removed ids in pre-order.
    #[instrument(skip(self, db), fields(table = self.table.name))]
    pub async fn delete_subtree<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i64,
    ) -> Result<Vec<i64>, TreeError> {
        let node = self.node(db, id).await?;
        let removed: Vec<i64> = self
            .descendants_of(db, id, true)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();

        let delete = Query::delete()
            .from_table(ident(self.table.name))
            .and_where(col(LFT).between(node.lft, node.rght))
            .to_owned();
        self.exec(db, &delete).await?;

        let compaction = Compaction {
            removed: node.span(),
        };
        let width = compaction.removed.width();
        let close = |column: &str| -> SimpleExpr {
            Expr::case(
                col(column).gt(compaction.removed.rght),
                col(column).sub(width),
            )
            .finally(col(column))
            .into()
        };
        let update = Query::update()
            .table(ident(self.table.name))
            .value(ident(LFT), close(LFT))
            .value(ident(RGHT), close(RGHT))
            .and_where(col(RGHT).gt(compaction.removed.rght))
            .to_owned();
        let shifted = self.exec(db, &update).await?;
        debug!(removed = removed.len(), shifted, "deleted subtree");

        Ok(removed)
    }

    /// Recomputes every coordinate from `parent_id` and the ordering key.
    #[instrument(skip(self, db), fields(table = self.table.name))]
    pub async fn rebuild<C: ConnectionTrait>(&self, db: &C) -> Result<usize, TreeError> {
        let stmt = Query::select()
            .columns([ident(ID), ident(PARENT)])
            .expr_as(self.sort_key_expr(), ident(SORT_KEY))
            .from(ident(self.table.name))
            .to_owned();
        let mut rows = LinkRow::find_by_statement(db.get_database_backend().build(&stmt))
            .all(db)
            .await?;
        if rows.is_empty() {
            return Ok(0);
        }
        rows.sort_by_cached_key(|r| self.key_for(r.sort_key.as_deref(), r.id));

        let links: Vec<(i64, Option<i64>)> = rows.iter().map(|r| (r.id, r.parent_id)).collect();
        let placed = coords::rebuild(&links);

        let mut lft = CaseStatement::new();
        let mut rght = CaseStatement::new();
        let mut depth = CaseStatement::new();
        let mut parent = CaseStatement::new();
        for p in &placed {
            lft = lft.case(col(ID).eq(p.id), p.lft);
            rght = rght.case(col(ID).eq(p.id), p.rght);
            depth = depth.case(col(ID).eq(p.id), p.depth);
            parent = parent.case(col(ID).eq(p.id), p.parent_id);
        }
        let update = Query::update()
            .table(ident(self.table.name))
            .value(ident(LFT), lft.finally(col(LFT)))
            .value(ident(RGHT), rght.finally(col(RGHT)))
            .value(ident(DEPTH), depth.finally(col(DEPTH)))
            .value(ident(PARENT), parent.finally(col(PARENT)))
            .to_owned();
        self.exec(db, &update).await?;

        Ok(placed.len())
    }
}
