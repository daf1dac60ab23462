use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{apply_slots, require_present, require_text, Page, WriteMode};
use crate::entities::slider;
use crate::errors::ServiceError;
use crate::i18n::{nullable, Language, LocalizedInput, Translated};
use crate::tree::{NestedSetStore, OrderingKey, Position, TreeTable};

/// Sliders keep the order they were added in
pub const SLIDER_TREE: TreeTable = TreeTable {
    name: "sliders",
    ordering: OrderingKey::Insertion,
};

const fn slider_store() -> NestedSetStore {
    NestedSetStore::new(SLIDER_TREE)
}

/// `title` and `image` are bilingual: flat keys follow the request language
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SliderInput {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,
    pub position: Option<Position>,
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

#[derive(Clone)]
pub struct SliderService {
    db: Arc<DatabaseConnection>,
}

impl SliderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find<C: ConnectionTrait>(db: &C, id: i64) -> Result<slider::Model, ServiceError> {
        slider::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slider", id))
    }

    /// Sliders in tree order
    pub async fn list(&self, page: Page) -> Result<(Vec<slider::Model>, u64), ServiceError> {
        let db = &*self.db;
        let query = slider::Entity::find().order_by_asc(slider::Column::Lft);
        let total = query.clone().count(db).await?;
        let sliders = query
            .offset(page.offset())
            .limit(page.per_page)
            .all(db)
            .await?;
        Ok((sliders, total))
    }

    pub async fn get(&self, id: i64) -> Result<slider::Model, ServiceError> {
        Self::find(&*self.db, id).await
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: SliderInput,
        lang: Language,
    ) -> Result<slider::Model, ServiceError> {
        let image = input
            .localized
            .route("image", lang)
            .applied_to(Translated::default());
        require_text("image", &image)?;
        let title = input
            .localized
            .route("title", lang)
            .applied_to(Translated::default());
        let parent_id = input.parent_id.flatten();

        let txn = self.db.begin().await?;
        if let Some(parent_id) = parent_id {
            Self::find(&txn, parent_id).await?;
        }
        let placement = slider_store()
            .prepare_insert(&txn, parent_id, input.position.unwrap_or_default(), None)
            .await?;
        let (title_tr, title_en) = title.into_slots();
        let (image_tr, image_en) = image.into_slots();
        let model = slider::ActiveModel {
            title_tr: Set(title_tr),
            title_en: Set(title_en),
            image_tr: Set(image_tr),
            image_en: Set(image_en),
            parent_id: Set(placement.parent_id),
            lft: Set(placement.lft),
            rght: Set(placement.rght),
            depth: Set(placement.depth),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(id = model.id, "slider created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: SliderInput,
        lang: Language,
        mode: WriteMode,
    ) -> Result<slider::Model, ServiceError> {
        let image_patch = input.localized.route("image", lang);
        require_present(mode, "image", !image_patch.is_empty())?;
        let title_patch = input.localized.route("title", lang);

        let txn = self.db.begin().await?;
        let current = Self::find(&txn, id).await?;
        let image = image_patch.applied_to(Translated::new(
            current.image_tr.clone(),
            current.image_en.clone(),
        ));
        require_text("image", &image)?;
        let parent_id = input.parent_id.unwrap_or(current.parent_id);
        let reposition = parent_id != current.parent_id || input.position.is_some();

        let mut active = current.into_active_model();
        apply_slots(&image_patch, &mut active.image_tr, &mut active.image_en);
        apply_slots(&title_patch, &mut active.title_tr, &mut active.title_en);
        active.update(&txn).await?;

        if reposition {
            slider_store()
                .move_subtree(&txn, id, parent_id, input.position.unwrap_or_default(), None)
                .await?;
        }
        let model = Self::find(&txn, id).await?;
        txn.commit().await?;
        info!(id, reposition, "slider updated");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn move_slider(
        &self,
        id: i64,
        parent_id: Option<i64>,
        position: Position,
    ) -> Result<slider::Model, ServiceError> {
        let txn = self.db.begin().await?;
        slider_store()
            .move_subtree(&txn, id, parent_id, position, None)
            .await?;
        let model = Self::find(&txn, id).await?;
        txn.commit().await?;
        Ok(model)
    }

    /// Deletes the slider and any sliders nested under it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Vec<i64>, ServiceError> {
        let txn = self.db.begin().await?;
        Self::find(&txn, id).await?;
        let removed = slider_store().delete_subtree(&txn, id).await?;
        txn.commit().await?;
        info!(id, removed = removed.len(), "slider deleted");
        Ok(removed)
    }

    /// Recomputes slider coordinates from parent links
    pub async fn rebuild_tree(&self) -> Result<usize, ServiceError> {
        let txn = self.db.begin().await?;
        let placed = slider_store().rebuild(&txn).await?;
        txn.commit().await?;
        info!(placed, "slider tree rebuilt");
        Ok(placed)
    }
}
