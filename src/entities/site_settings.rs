use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Root of the site configuration; every page block hangs off one of these
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub site_title_tr: Option<String>,
    pub site_title_en: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub site_description_tr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub site_description_en: Option<String>,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub head_tracking_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body_tracking_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_item::Entity")]
    MenuItems,
    #[sea_orm(has_many = "super::header::Entity")]
    Headers,
    #[sea_orm(has_many = "super::generic_section::Entity")]
    Sections,
    #[sea_orm(has_many = "super::our_story_section::Entity")]
    OurStorySections,
    #[sea_orm(has_many = "super::contact_section::Entity")]
    ContactSections,
    #[sea_orm(has_many = "super::wholesale_section::Entity")]
    WholesaleSections,
    #[sea_orm(has_many = "super::footer_policy::Entity")]
    FooterPolicies,
    #[sea_orm(has_many = "super::social_media_link::Entity")]
    SocialLinks,
    #[sea_orm(has_one = "super::footer_info::Entity")]
    FooterInfo,
    #[sea_orm(has_many = "super::faq_item::Entity")]
    FaqItems,
    #[sea_orm(has_many = "super::page_meta::Entity")]
    PageMetas,
}

macro_rules! owned_by_site {
    ($($module:ident => $variant:ident),* $(,)?) => {
        $(
            impl Related<super::$module::Entity> for Entity {
                fn to() -> RelationDef {
                    Relation::$variant.def()
                }
            }
        )*
    };
}

owned_by_site! {
    menu_item => MenuItems,
    header => Headers,
    generic_section => Sections,
    our_story_section => OurStorySections,
    contact_section => ContactSections,
    wholesale_section => WholesaleSections,
    footer_policy => FooterPolicies,
    social_media_link => SocialLinks,
    footer_info => FooterInfo,
    faq_item => FaqItems,
    page_meta => PageMetas,
}

impl ActiveModelBehavior for ActiveModel {}
