use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listed by `sort_order`, then id
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faq_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub question_tr: Option<String>,
    pub question_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_en: Option<String>,
    pub sort_order: i32,
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
