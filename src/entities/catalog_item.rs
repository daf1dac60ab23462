use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{CategorySubtype, ItemKind};
use crate::i18n::Translated;

/// A node of the catalog tree: either a category or a product
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: ItemKind,
    pub title_tr: Option<String>,
    pub title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    pub icon: Option<String>,
    pub category_subtype: Option<CategorySubtype>,
    pub parent_id: Option<i64>,
    pub lft: i64,
    pub rght: i64,
    pub depth: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn title(&self) -> Translated<&str> {
        Translated::of(&self.title_tr, &self.title_en)
    }

    pub fn description(&self) -> Translated<&str> {
        Translated::of(&self.description_tr, &self.description_en)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,

    #[sea_orm(has_many = "super::item_image::Entity")]
    Images,
}

impl Related<super::item_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
