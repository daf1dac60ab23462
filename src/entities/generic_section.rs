use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    #[sea_orm(string_value = "whats_kitty")]
    WhatsKitty,
    #[sea_orm(string_value = "favorites_of_season")]
    FavoritesOfSeason,
    #[sea_orm(string_value = "who_are_we")]
    WhoAreWe,
    #[sea_orm(string_value = "from_the_workshop")]
    FromTheWorkshop,
    #[sea_orm(string_value = "its_story")]
    ItsStory,
    #[sea_orm(string_value = "production_capacity")]
    ProductionCapacity,
    #[default]
    #[sea_orm(string_value = "generic")]
    Generic,
}

/// Home page section. `product_*_id` pick up to three featured catalog items.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "generic_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_id: i64,
    pub section_type: SectionType,
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
    pub button_text_left_tr: Option<String>,
    pub button_text_left_en: Option<String>,
    pub button_url_left: Option<String>,
    pub button_text_right_tr: Option<String>,
    pub button_text_right_en: Option<String>,
    pub button_url_right: Option<String>,
    pub product_1_id: Option<i64>,
    pub product_2_id: Option<i64>,
    pub product_3_id: Option<i64>,
}

impl Model {
    pub fn featured_product_ids(&self) -> Vec<i64> {
        [self.product_1_id, self.product_2_id, self.product_3_id]
            .into_iter()
            .flatten()
            .collect()
    }
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
