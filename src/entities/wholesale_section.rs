use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wholesale page block
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wholesale_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub title_tr: Option<String>,
    pub title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub info_text_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub info_text_en: Option<String>,
    pub image: Option<String>,
    pub button_top_title: Option<String>,
    pub button_top_text_tr: Option<String>,
    pub button_top_text_en: Option<String>,
    pub button_top_url: Option<String>,
    pub button_bottom_title: Option<String>,
    pub button_bottom_text_tr: Option<String>,
    pub button_bottom_text_en: Option<String>,
    pub button_bottom_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site_settings::Entity",
        from = "Column::SiteId",
        to = "super::site_settings::Column::Id",
        on_delete = "Cascade"
    )]
    Site,
}

impl Related<super::site_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
