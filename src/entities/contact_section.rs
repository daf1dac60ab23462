use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact page block owning addresses and mail addresses
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_sections")]
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
    #[sea_orm(has_many = "super::contact_address::Entity")]
    Addresses,
    #[sea_orm(has_many = "super::contact_mail::Entity")]
    Mails,
}

impl Related<super::site_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<super::contact_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::contact_mail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
