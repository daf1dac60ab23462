use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    sea_query::{Cond, Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::owned::{self, OwnedEntry};
use super::{apply_optional, apply_slots, require_present, require_text, Page, WriteMode};
use crate::catalog::{
    catalog_store, validate_change, CatalogNode, CatalogSnapshot, CategorySubtype, ItemKind,
};
use crate::entities::{catalog_item, generic_section, item_image};
use crate::errors::ServiceError;
use crate::i18n::{nullable, normalize, Language, LocalizedInput, Translated};
use crate::tree::{CycleError, NodeCoords, Position};

/// Id the snapshot gives a node that is about to be inserted
const PENDING_ID: i64 = 0;

/// Sort orders accepted by the catalog list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum ItemOrdering {
    #[default]
    #[strum(serialize = "lft")]
    Lft,
    #[strum(serialize = "-lft")]
    LftDesc,
    #[strum(serialize = "level")]
    Level,
    #[strum(serialize = "-level")]
    LevelDesc,
    #[strum(serialize = "id")]
    Id,
    #[strum(serialize = "-id")]
    IdDesc,
}

impl ItemOrdering {
    /// Unknown values fall back to tree order
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .and_then(|p| ItemOrdering::from_str(p.trim()).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring over every title and description slot
    pub search: Option<String>,
    pub subtype: Option<CategorySubtype>,
    pub depth: Option<i64>,
    pub parent_id: Option<i64>,
    pub ordering: ItemOrdering,
}

/// One image of an item. Entries with an `id` keep that row.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageInput {
    pub id: Option<i64>,
    pub image: String,
}

/// Create/update payload shared by categories and products.
///
/// `title` and `description` arrive as flat keys routed by the request
/// language or as explicit `_tr` / `_en` keys.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<CategorySubtype>)]
    pub category_subtype: Option<Option<CategorySubtype>>,
    /// Replaces the image list when present
    pub images: Option<Vec<ImageInput>>,
    /// Where to put the item among its siblings; title order by default
    pub position: Option<Position>,
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

struct ImageEntry {
    id: Option<i64>,
    image: String,
    position: i32,
}

impl OwnedEntry for ImageEntry {
    type Entity = item_image::Entity;
    type ActiveModel = item_image::ActiveModel;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn id_column() -> item_image::Column {
        item_image::Column::Id
    }

    fn owner_column() -> item_image::Column {
        item_image::Column::ItemId
    }

    fn model_id(model: &item_image::Model) -> i64 {
        model.id
    }

    fn apply(&self, model: &mut item_image::ActiveModel, owner_id: i64, _lang: Language) {
        model.item_id = Set(owner_id);
        model.image = Set(self.image.clone());
        model.position = Set(self.position);
    }
}

fn image_entries(images: &[ImageInput]) -> Result<Vec<ImageEntry>, ServiceError> {
    images
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let image = normalize(Some(input.image.clone()))
                .ok_or_else(|| ServiceError::invalid_field("images", "Image path may not be blank"))?;
            Ok(ImageEntry {
                id: input.id,
                image,
                position: index as i32,
            })
        })
        .collect()
}

fn resource(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Category => "Category",
        ItemKind::Product => "Product",
    }
}

fn coords_of(model: &catalog_item::Model) -> NodeCoords {
    NodeCoords {
        id: model.id,
        parent_id: model.parent_id,
        lft: model.lft,
        rght: model.rght,
        depth: model.depth,
    }
}

/// Categories and products: one nested-set tree with kind rules
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find<C: ConnectionTrait>(
        db: &C,
        kind: ItemKind,
        id: i64,
    ) -> Result<catalog_item::Model, ServiceError> {
        catalog_item::Entity::find_by_id(id)
            .filter(catalog_item::Column::Kind.eq(kind))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(resource(kind), id))
    }

    /// Loads models in the order of `ids`
    async fn load_ordered<C: ConnectionTrait>(
        db: &C,
        ids: &[i64],
    ) -> Result<Vec<catalog_item::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rank: HashMap<i64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut models = catalog_item::Entity::find()
            .filter(catalog_item::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?;
        models.sort_by_key(|m| rank.get(&m.id).copied().unwrap_or(usize::MAX));
        Ok(models)
    }

    /// Fails before any write when `parent_id` is the node or below it
    async fn ensure_acyclic<C: ConnectionTrait>(
        db: &C,
        id: i64,
        parent_id: Option<i64>,
    ) -> Result<(), ServiceError> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        let store = catalog_store();
        let node = store.node(db, id).await?;
        let parent = store.node(db, parent_id).await?;
        if node.span().contains(parent.lft) {
            return Err(CycleError {
                node: id,
                target: parent_id,
            }
            .into());
        }
        Ok(())
    }

    /// Simulates the change on a snapshot and runs the catalog rules
    async fn check_rules<C: ConnectionTrait>(db: &C, node: CatalogNode) -> Result<(), ServiceError> {
        let mut snapshot = CatalogSnapshot::load(db).await?;
        if let Some(parent_id) = node.parent_id {
            if snapshot.get(parent_id).is_none() {
                return Err(ServiceError::invalid_field(
                    "parent_id",
                    format!("Catalog item with ID {} not found", parent_id),
                ));
            }
        }
        snapshot.upsert(node);
        validate_change(node.id, &snapshot)?;
        Ok(())
    }

    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        kind: ItemKind,
        filter: &ItemFilter,
        page: Page,
    ) -> Result<(Vec<catalog_item::Model>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = catalog_item::Entity::find().filter(catalog_item::Column::Kind.eq(kind));

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let mut any = Cond::any();
            for column in [
                catalog_item::Column::TitleTr,
                catalog_item::Column::TitleEn,
                catalog_item::Column::DescriptionTr,
                catalog_item::Column::DescriptionEn,
            ] {
                let like = LikeExpr::new(pattern.clone()).escape('\\');
                any = any.add(Expr::expr(Func::lower(Expr::col(column))).like(like));
            }
            query = query.filter(any);
        }
        if let Some(subtype) = filter.subtype {
            query = query.filter(catalog_item::Column::CategorySubtype.eq(subtype));
        }
        if let Some(depth) = filter.depth {
            query = query.filter(catalog_item::Column::Depth.eq(depth));
        }
        if let Some(parent_id) = filter.parent_id {
            query = query.filter(catalog_item::Column::ParentId.eq(parent_id));
        }
        query = match filter.ordering {
            ItemOrdering::Lft => query.order_by_asc(catalog_item::Column::Lft),
            ItemOrdering::LftDesc => query.order_by_desc(catalog_item::Column::Lft),
            ItemOrdering::Level => query
                .order_by_asc(catalog_item::Column::Depth)
                .order_by_asc(catalog_item::Column::Lft),
            ItemOrdering::LevelDesc => query
                .order_by_desc(catalog_item::Column::Depth)
                .order_by_asc(catalog_item::Column::Lft),
            ItemOrdering::Id => query.order_by_asc(catalog_item::Column::Id),
            ItemOrdering::IdDesc => query.order_by_desc(catalog_item::Column::Id),
        };

        let total = query.clone().count(db).await?;
        let items = query
            .offset(page.offset())
            .limit(page.per_page)
            .all(db)
            .await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, kind: ItemKind, id: i64) -> Result<catalog_item::Model, ServiceError> {
        Self::find(&*self.db, kind, id).await
    }

    /// Everything below the given nodes, in pre-order
    pub async fn subtrees(
        &self,
        roots: &[catalog_item::Model],
    ) -> Result<Vec<catalog_item::Model>, ServiceError> {
        if roots.is_empty() {
            return Ok(Vec::new());
        }
        let store = catalog_store();
        let any = roots.iter().fold(Cond::any(), |cond, root| {
            cond.add(store.subtree_filter(&coords_of(root), false))
        });
        Ok(catalog_item::Entity::find()
            .filter(any)
            .order_by_asc(catalog_item::Column::Lft)
            .all(&*self.db)
            .await?)
    }

    /// Number of direct product children per category id
    pub async fn products_count(&self, ids: &[i64]) -> Result<HashMap<i64, u64>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Option<i64>, i64)> = catalog_item::Entity::find()
            .select_only()
            .column(catalog_item::Column::ParentId)
            .column_as(catalog_item::Column::Id.count(), "products_count")
            .filter(catalog_item::Column::Kind.eq(ItemKind::Product))
            .filter(catalog_item::Column::ParentId.is_in(ids.to_vec()))
            .group_by(catalog_item::Column::ParentId)
            .into_tuple()
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(parent, count)| parent.map(|p| (p, count.max(0) as u64)))
            .collect())
    }

    /// Images per item id, in display order
    pub async fn images_of(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, Vec<item_image::Model>>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let images = item_image::Entity::find()
            .filter(item_image::Column::ItemId.is_in(ids.to_vec()))
            .order_by_asc(item_image::Column::Position)
            .order_by_asc(item_image::Column::Id)
            .all(&*self.db)
            .await?;
        let mut by_item: HashMap<i64, Vec<item_image::Model>> = HashMap::new();
        for image in images {
            by_item.entry(image.item_id).or_default().push(image);
        }
        Ok(by_item)
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        kind: ItemKind,
        input: ItemInput,
        lang: Language,
    ) -> Result<catalog_item::Model, ServiceError> {
        let title = input
            .localized
            .route("title", lang)
            .applied_to(Translated::default());
        require_text("title", &title)?;
        let description = input
            .localized
            .route("description", lang)
            .applied_to(Translated::default());
        let parent_id = input.parent_id.flatten();
        let subtype = input.category_subtype.flatten();
        let images = image_entries(input.images.as_deref().unwrap_or_default())?;

        let txn = self.db.begin().await?;
        Self::check_rules(
            &txn,
            CatalogNode {
                id: PENDING_ID,
                kind,
                subtype,
                parent_id,
                depth: 0,
            },
        )
        .await?;

        let placement = catalog_store()
            .prepare_insert(
                &txn,
                parent_id,
                input.position.unwrap_or_default(),
                title.tr.as_deref(),
            )
            .await?;
        let now = Utc::now();
        let (title_tr, title_en) = title.into_slots();
        let (description_tr, description_en) = description.into_slots();
        let model = catalog_item::ActiveModel {
            kind: Set(kind),
            title_tr: Set(title_tr),
            title_en: Set(title_en),
            description_tr: Set(description_tr),
            description_en: Set(description_en),
            icon: Set(normalize(input.icon.flatten())),
            category_subtype: Set(subtype),
            parent_id: Set(placement.parent_id),
            lft: Set(placement.lft),
            rght: Set(placement.rght),
            depth: Set(placement.depth),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !images.is_empty() {
            owned::sync(&txn, "images", model.id, &images, lang).await?;
        }
        txn.commit().await?;

        info!(id = model.id, parent_id = ?model.parent_id, "catalog item created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        kind: ItemKind,
        id: i64,
        input: ItemInput,
        lang: Language,
        mode: WriteMode,
    ) -> Result<catalog_item::Model, ServiceError> {
        let title_patch = input.localized.route("title", lang);
        require_present(mode, "title", !title_patch.is_empty())?;
        let description_patch = input.localized.route("description", lang);
        let images = match &input.images {
            Some(images) => Some(image_entries(images)?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let current = Self::find(&txn, kind, id).await?;

        let title = title_patch.applied_to(Translated::new(
            current.title_tr.clone(),
            current.title_en.clone(),
        ));
        require_text("title", &title)?;
        let parent_id = input.parent_id.unwrap_or(current.parent_id);
        let subtype = input
            .category_subtype
            .unwrap_or(current.category_subtype);

        if parent_id != current.parent_id {
            Self::ensure_acyclic(&txn, id, parent_id).await?;
        }
        Self::check_rules(
            &txn,
            CatalogNode {
                id,
                kind,
                subtype,
                parent_id,
                depth: current.depth,
            },
        )
        .await?;

        let reposition = parent_id != current.parent_id
            || title.tr != current.title_tr
            || input.position.is_some();

        let mut active = current.into_active_model();
        apply_slots(&title_patch, &mut active.title_tr, &mut active.title_en);
        apply_slots(
            &description_patch,
            &mut active.description_tr,
            &mut active.description_en,
        );
        apply_optional(&input.icon, &mut active.icon);
        active.category_subtype = Set(subtype);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        if reposition {
            catalog_store()
                .move_subtree(
                    &txn,
                    id,
                    parent_id,
                    input.position.unwrap_or_default(),
                    title.tr.as_deref(),
                )
                .await?;
        }
        if let Some(images) = images {
            owned::sync(&txn, "images", id, &images, lang).await?;
        }

        let model = Self::find(&txn, kind, id).await?;
        txn.commit().await?;
        info!(id, reposition, "catalog item updated");
        Ok(model)
    }

    /// Re-parents an item with its subtree
    #[instrument(skip(self))]
    pub async fn move_item(
        &self,
        kind: ItemKind,
        id: i64,
        parent_id: Option<i64>,
        position: Position,
    ) -> Result<catalog_item::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let current = Self::find(&txn, kind, id).await?;
        Self::ensure_acyclic(&txn, id, parent_id).await?;
        Self::check_rules(
            &txn,
            CatalogNode {
                id,
                kind,
                subtype: current.category_subtype,
                parent_id,
                depth: current.depth,
            },
        )
        .await?;

        catalog_store()
            .move_subtree(&txn, id, parent_id, position, current.title_tr.as_deref())
            .await?;
        let mut active = current.into_active_model();
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        let model = Self::find(&txn, kind, id).await?;
        txn.commit().await?;
        info!(id, parent_id = ?parent_id, "catalog item moved");
        Ok(model)
    }

    /// Turns a product into a category or a category into a product
    #[instrument(skip(self))]
    pub async fn convert(
        &self,
        from: ItemKind,
        id: i64,
    ) -> Result<catalog_item::Model, ServiceError> {
        let to = match from {
            ItemKind::Category => ItemKind::Product,
            ItemKind::Product => ItemKind::Category,
        };
        let txn = self.db.begin().await?;
        let current = Self::find(&txn, from, id).await?;
        Self::check_rules(
            &txn,
            CatalogNode {
                id,
                kind: to,
                subtype: current.category_subtype,
                parent_id: current.parent_id,
                depth: current.depth,
            },
        )
        .await?;

        let mut active = current.into_active_model();
        active.kind = Set(to);
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;
        txn.commit().await?;
        info!(id, to = %to, "catalog item converted");
        Ok(model)
    }

    /// Deletes the item, its subtree and their images. Featured-product
    /// references to any removed item are cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: ItemKind, id: i64) -> Result<Vec<i64>, ServiceError> {
        let txn = self.db.begin().await?;
        Self::find(&txn, kind, id).await?;
        let store = catalog_store();
        let ids: Vec<i64> = store
            .descendants_of(&txn, id, true)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();

        item_image::Entity::delete_many()
            .filter(item_image::Column::ItemId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        for column in [
            generic_section::Column::Product1Id,
            generic_section::Column::Product2Id,
            generic_section::Column::Product3Id,
        ] {
            generic_section::Entity::update_many()
                .col_expr(column, Expr::value(Option::<i64>::None))
                .filter(column.is_in(ids.clone()))
                .exec(&txn)
                .await?;
        }
        let removed = store.delete_subtree(&txn, id).await?;
        txn.commit().await?;

        info!(id, removed = removed.len(), "catalog subtree deleted");
        Ok(removed)
    }

    pub async fn children(
        &self,
        kind: ItemKind,
        id: i64,
    ) -> Result<Vec<catalog_item::Model>, ServiceError> {
        let db = &*self.db;
        Self::find(db, kind, id).await?;
        let ids: Vec<i64> = catalog_store()
            .children_of(db, Some(id))
            .await?
            .iter()
            .map(|n| n.id)
            .collect();
        Self::load_ordered(db, &ids).await
    }

    pub async fn descendants(
        &self,
        kind: ItemKind,
        id: i64,
    ) -> Result<Vec<catalog_item::Model>, ServiceError> {
        let db = &*self.db;
        Self::find(db, kind, id).await?;
        let ids: Vec<i64> = catalog_store()
            .descendants_of(db, id, false)
            .await?
            .iter()
            .map(|n| n.id)
            .collect();
        Self::load_ordered(db, &ids).await
    }

    /// Root first, direct parent last
    pub async fn ancestors(
        &self,
        kind: ItemKind,
        id: i64,
    ) -> Result<Vec<catalog_item::Model>, ServiceError> {
        let db = &*self.db;
        Self::find(db, kind, id).await?;
        let ids: Vec<i64> = catalog_store()
            .ancestors_of(db, id)
            .await?
            .iter()
            .map(|n| n.id)
            .collect();
        Self::load_ordered(db, &ids).await
    }

    /// Recomputes catalog coordinates from parent links
    pub async fn rebuild_tree(&self) -> Result<usize, ServiceError> {
        let txn = self.db.begin().await?;
        let placed = catalog_store().rebuild(&txn).await?;
        txn.commit().await?;
        info!(placed, "catalog tree rebuilt");
        Ok(placed)
    }
}

/// Escapes `LIKE` wildcards so a search term only matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c:\d"), r"c:\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn ordering_param_is_lenient() {
        assert_eq!(ItemOrdering::from_param(Some("-level")), ItemOrdering::LevelDesc);
        assert_eq!(ItemOrdering::from_param(Some("id")), ItemOrdering::Id);
        assert_eq!(ItemOrdering::from_param(Some("title")), ItemOrdering::Lft);
        assert_eq!(ItemOrdering::from_param(None), ItemOrdering::Lft);
    }

    #[test]
    fn image_entries_take_payload_positions() {
        let entries = image_entries(&[
            ImageInput {
                id: Some(4),
                image: "a.png".into(),
            },
            ImageInput {
                id: None,
                image: "b.png".into(),
            },
        ])
        .unwrap();
        assert_eq!(entries[0].position, 0);
        assert_eq!(entries[1].position, 1);
        assert_eq!(entries[1].id, None);
    }

    #[test]
    fn blank_image_paths_are_rejected() {
        let err = image_entries(&[ImageInput {
            id: None,
            image: " ".into(),
        }]);
        assert!(matches!(err, Err(ServiceError::FieldValidation(_))));
    }
}
