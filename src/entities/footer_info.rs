use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Footer block; at most one per site
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "footer_infos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub logo: Option<String>,
    pub footer_text_tr: Option<String>,
    pub footer_text_en: Option<String>,
    pub social_text_tr: Option<String>,
    pub social_text_en: Option<String>,
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
