use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// What a catalog tree node is
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "product")]
    Product,
}

impl ItemKind {
    pub fn is_category(self) -> bool {
        matches!(self, ItemKind::Category)
    }

    pub fn is_product(self) -> bool {
        matches!(self, ItemKind::Product)
    }
}

/// Presentation variant of a category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategorySubtype {
    #[sea_orm(string_value = "type1")]
    Type1,
    #[sea_orm(string_value = "type2")]
    Type2,
    #[sea_orm(string_value = "type3")]
    Type3,
    #[sea_orm(string_value = "type4")]
    Type4,
}
