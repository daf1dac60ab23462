use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-page SEO title and description
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_metas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub page: String,
    pub meta_title_tr: Option<String>,
    pub meta_title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description_en: Option<String>,
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
