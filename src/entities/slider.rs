use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Home page banner; sliders form their own tree ordered by insertion
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sliders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title_tr: Option<String>,
    pub title_en: Option<String>,
    pub image_tr: Option<String>,
    pub image_en: Option<String>,
    pub parent_id: Option<i64>,
    pub lft: i64,
    pub rght: i64,
    pub depth: i64,
    pub created_at: DateTime<Utc>,
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
}

impl ActiveModelBehavior for ActiveModel {}
