use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum OurStorySectionType {
    #[sea_orm(string_value = "big_story")]
    BigStory,
    #[sea_orm(string_value = "all_over")]
    AllOver,
    #[sea_orm(string_value = "power_of_a_group")]
    PowerOfAGroup,
    #[sea_orm(string_value = "what_do_we_produce")]
    WhatDoWeProduce,
    #[sea_orm(string_value = "best_selling_accessories")]
    BestSellingAccessories,
    #[sea_orm(string_value = "health_and_quality")]
    HealthAndQuality,
    #[sea_orm(string_value = "safe_facilities")]
    SafeFacilities,
    #[sea_orm(string_value = "harmless_materials")]
    HarmlessMaterials,
    #[sea_orm(string_value = "growing_safely")]
    GrowingSafely,
    #[sea_orm(string_value = "kitti_products")]
    KittiProducts,
}

/// "Our story" page section
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "our_story_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub section_type: OurStorySectionType,
    pub name_tr: Option<String>,
    pub name_en: Option<String>,
    pub subtitle_tr: Option<String>,
    pub subtitle_en: Option<String>,
    pub title_tr: Option<String>,
    pub title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_en: Option<String>,
    pub image: Option<String>,
    pub mobile_image: Option<String>,
    pub subimage: Option<String>,
    pub button_text_tr: Option<String>,
    pub button_text_en: Option<String>,
    pub button_url: Option<String>,
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
