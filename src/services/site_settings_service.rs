//! Site configuration and the page blocks it owns.
//!
//! One write payload carries the settings record plus any of its owned
//! collections. Each collection present in the payload is synchronised by id
//! (see [`super::owned`]); collections left out are not touched. The footer
//! block is a single optional row.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::owned::{self, OwnedEntry};
use super::{apply_optional, apply_slots, require_present, require_text, Page, WriteMode};
use crate::catalog::ItemKind;
use crate::entities::{
    catalog_item, contact_address, contact_mail, contact_section, faq_item, footer_info,
    footer_policy, generic_section, header, menu_item, our_story_section, page_meta,
    site_settings, social_media_link, wholesale_section, OurStorySectionType, SectionType,
};
use crate::errors::ServiceError;
use crate::i18n::{nullable, Language, LocalizedInput, Translated};

pub const DEFAULT_FOOTER_TEXT: &str = "kitti.com.tr © 2025 - Tüm hakları saklıdır.";
pub const DEFAULT_SOCIAL_TEXT: &str = "Yenilikleri Kaçırmayın;";

/// Writes the `<field>_tr` / `<field>_en` pair of an active model
macro_rules! slots {
    ($model:ident, $localized:expr, $lang:expr, $($field:ident => ($tr:ident, $en:ident)),+ $(,)?) => {
        $(
            apply_slots(
                &$localized.route(stringify!($field), $lang),
                &mut $model.$tr,
                &mut $model.$en,
            );
        )+
    };
}

/// Implements [`OwnedEntry`] for a payload entry; `$apply` fills the row
macro_rules! owned_entry {
    ($input:ty => $module:ident, $owner:ident / $owner_field:ident, $apply:expr) => {
        impl OwnedEntry for $input {
            type Entity = $module::Entity;
            type ActiveModel = $module::ActiveModel;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn id_column() -> $module::Column {
                $module::Column::Id
            }

            fn owner_column() -> $module::Column {
                $module::Column::$owner
            }

            fn model_id(model: &$module::Model) -> i64 {
                model.id
            }

            fn apply(&self, model: &mut $module::ActiveModel, owner_id: i64, lang: Language) {
                model.$owner_field = Set(owner_id);
                let fill: fn(&Self, &mut $module::ActiveModel, Language) = $apply;
                fill(self, model, lang);
            }
        }
    };
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MenuItemInput {
    pub id: Option<i64>,
    pub href: String,
    /// `text`, `text_tr`, `text_en`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(MenuItemInput => menu_item, SiteId / site_id, |input, model, lang| {
    model.href = Set(input.href.clone());
    slots!(model, input.localized, lang, text => (text_tr, text_en));
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HeaderInput {
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    /// `title`, `description` and their slot keys
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(HeaderInput => header, SiteId / site_id, |input, model, lang| {
    apply_optional(&input.image, &mut model.image);
    slots!(model, input.localized, lang,
        title => (title_tr, title_en),
        description => (description_tr, description_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SectionInput {
    pub id: Option<i64>,
    /// `generic` when a new section leaves it out
    pub section_type: Option<SectionType>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub mobile_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_url_left: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_url_right: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub product_1_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub product_2_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub product_3_id: Option<Option<i64>>,
    /// `name`, `subtitle`, `title`, `description`, `button_text_left`,
    /// `button_text_right` and their slot keys
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

impl SectionInput {
    fn product_refs(&self) -> impl Iterator<Item = i64> + '_ {
        [self.product_1_id, self.product_2_id, self.product_3_id]
            .into_iter()
            .flatten()
            .flatten()
    }
}

fn set_ref(value: Option<Option<i64>>, column: &mut ActiveValue<Option<i64>>) {
    if let Some(value) = value {
        *column = Set(value);
    }
}

owned_entry!(SectionInput => generic_section, SiteId / site_id, |input, model, lang| {
    match input.section_type {
        Some(section_type) => model.section_type = Set(section_type),
        None if model.section_type.is_not_set() => {
            model.section_type = Set(SectionType::default())
        }
        None => {}
    }
    apply_optional(&input.image, &mut model.image);
    apply_optional(&input.mobile_image, &mut model.mobile_image);
    apply_optional(&input.button_url_left, &mut model.button_url_left);
    apply_optional(&input.button_url_right, &mut model.button_url_right);
    set_ref(input.product_1_id, &mut model.product_1_id);
    set_ref(input.product_2_id, &mut model.product_2_id);
    set_ref(input.product_3_id, &mut model.product_3_id);
    slots!(model, input.localized, lang,
        name => (name_tr, name_en),
        subtitle => (subtitle_tr, subtitle_en),
        title => (title_tr, title_en),
        description => (description_tr, description_en),
        button_text_left => (button_text_left_tr, button_text_left_en),
        button_text_right => (button_text_right_tr, button_text_right_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OurStorySectionInput {
    pub id: Option<i64>,
    pub section_type: OurStorySectionType,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub mobile_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub subimage: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_url: Option<Option<String>>,
    /// `name`, `subtitle`, `title`, `description`, `button_text`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(OurStorySectionInput => our_story_section, SiteId / site_id, |input, model, lang| {
    model.section_type = Set(input.section_type);
    apply_optional(&input.image, &mut model.image);
    apply_optional(&input.mobile_image, &mut model.mobile_image);
    apply_optional(&input.subimage, &mut model.subimage);
    apply_optional(&input.button_url, &mut model.button_url);
    slots!(model, input.localized, lang,
        name => (name_tr, name_en),
        subtitle => (subtitle_tr, subtitle_en),
        title => (title_tr, title_en),
        description => (description_tr, description_en),
        button_text => (button_text_tr, button_text_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactAddressInput {
    pub id: Option<i64>,
    pub tel: String,
    pub tel_wp: String,
    /// `title`, `description`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(ContactAddressInput => contact_address, ContactSectionId / contact_section_id, |input, model, lang| {
    model.tel = Set(input.tel.clone());
    model.tel_wp = Set(input.tel_wp.clone());
    slots!(model, input.localized, lang,
        title => (title_tr, title_en),
        description => (description_tr, description_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactMailInput {
    pub id: Option<i64>,
    pub mail: String,
}

owned_entry!(ContactMailInput => contact_mail, ContactSectionId / contact_section_id, |input, model, _lang| {
    model.mail = Set(input.mail.trim().to_string());
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactSectionInput {
    pub id: Option<i64>,
    pub addresses: Option<Vec<ContactAddressInput>>,
    pub mails: Option<Vec<ContactMailInput>>,
    /// `title`, `description`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(ContactSectionInput => contact_section, SiteId / site_id, |input, model, lang| {
    slots!(model, input.localized, lang,
        title => (title_tr, title_en),
        description => (description_tr, description_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WholesaleSectionInput {
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_top_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_top_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_bottom_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub button_bottom_url: Option<Option<String>>,
    /// `title`, `description`, `info_text`, `button_top_text`,
    /// `button_bottom_text`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(WholesaleSectionInput => wholesale_section, SiteId / site_id, |input, model, lang| {
    apply_optional(&input.image, &mut model.image);
    apply_optional(&input.button_top_title, &mut model.button_top_title);
    apply_optional(&input.button_top_url, &mut model.button_top_url);
    apply_optional(&input.button_bottom_title, &mut model.button_bottom_title);
    apply_optional(&input.button_bottom_url, &mut model.button_bottom_url);
    slots!(model, input.localized, lang,
        title => (title_tr, title_en),
        description => (description_tr, description_en),
        info_text => (info_text_tr, info_text_en),
        button_top_text => (button_top_text_tr, button_top_text_en),
        button_bottom_text => (button_bottom_text_tr, button_bottom_text_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FooterPolicyInput {
    pub id: Option<i64>,
    /// `title`, `description`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(FooterPolicyInput => footer_policy, SiteId / site_id, |input, model, lang| {
    slots!(model, input.localized, lang,
        title => (title_tr, title_en),
        description => (description_tr, description_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SocialMediaLinkInput {
    pub id: Option<i64>,
    pub icon: String,
    pub url: String,
}

owned_entry!(SocialMediaLinkInput => social_media_link, SiteId / site_id, |input, model, _lang| {
    model.icon = Set(input.icon.clone());
    model.url = Set(input.url.clone());
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FaqItemInput {
    pub id: Option<i64>,
    pub sort_order: Option<i32>,
    /// `question`, `answer`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(FaqItemInput => faq_item, SiteId / site_id, |input, model, lang| {
    match input.sort_order {
        Some(order) => model.sort_order = Set(order),
        None if model.sort_order.is_not_set() => model.sort_order = Set(0),
        None => {}
    }
    slots!(model, input.localized, lang,
        question => (question_tr, question_en),
        answer => (answer_tr, answer_en),
    );
});

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageMetaInput {
    pub id: Option<i64>,
    /// Page key, e.g. `home`
    pub page: String,
    /// `meta_title`, `meta_description`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

owned_entry!(PageMetaInput => page_meta, SiteId / site_id, |input, model, lang| {
    model.page = Set(input.page.trim().to_string());
    slots!(model, input.localized, lang,
        meta_title => (meta_title_tr, meta_title_en),
        meta_description => (meta_description_tr, meta_description_en),
    );
});

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FooterInfoInput {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub logo: Option<Option<String>>,
    /// `footer_text`, `social_text`
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

/// Settings record plus any owned collections to replace
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SiteSettingsInput {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub logo: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub favicon: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub head_tracking_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub body_tracking_code: Option<Option<String>>,
    pub menu_items: Option<Vec<MenuItemInput>>,
    pub headers: Option<Vec<HeaderInput>>,
    pub sections: Option<Vec<SectionInput>>,
    pub our_story_sections: Option<Vec<OurStorySectionInput>>,
    pub contact_sections: Option<Vec<ContactSectionInput>>,
    pub wholesale_sections: Option<Vec<WholesaleSectionInput>>,
    pub footer_policies: Option<Vec<FooterPolicyInput>>,
    pub social_media_links: Option<Vec<SocialMediaLinkInput>>,
    /// `null` removes the footer block
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<FooterInfoInput>)]
    pub footer_info: Option<Option<FooterInfoInput>>,
    pub faq_items: Option<Vec<FaqItemInput>>,
    pub page_metas: Option<Vec<PageMetaInput>>,
    /// `site_title`, `site_description` and their slot keys
    #[serde(flatten)]
    pub localized: LocalizedInput,
}

/// A contact block with its addresses and mail addresses
#[derive(Debug, Clone)]
pub struct ContactBlock {
    pub section: contact_section::Model,
    pub addresses: Vec<contact_address::Model>,
    pub mails: Vec<contact_mail::Model>,
}

/// A settings record with everything it owns
#[derive(Debug, Clone)]
pub struct SiteBundle {
    pub site: site_settings::Model,
    pub menu_items: Vec<menu_item::Model>,
    pub headers: Vec<header::Model>,
    pub sections: Vec<generic_section::Model>,
    pub our_story_sections: Vec<our_story_section::Model>,
    pub contact_sections: Vec<ContactBlock>,
    pub wholesale_sections: Vec<wholesale_section::Model>,
    pub footer_policies: Vec<footer_policy::Model>,
    pub social_media_links: Vec<social_media_link::Model>,
    pub footer_info: Option<footer_info::Model>,
    pub faq_items: Vec<faq_item::Model>,
    pub page_metas: Vec<page_meta::Model>,
}

fn check_mails(sections: &[ContactSectionInput]) -> Result<(), ServiceError> {
    let invalid = sections
        .iter()
        .flat_map(|s| s.mails.iter().flatten())
        .find(|m| !validator::validate_email(m.mail.trim()));
    match invalid {
        Some(mail) => Err(ServiceError::invalid_field(
            "contact_sections",
            format!("'{}' is not a valid e-mail address", mail.mail),
        )),
        None => Ok(()),
    }
}

/// Featured products must exist and be products
async fn check_product_refs<C: ConnectionTrait>(
    db: &C,
    sections: &[SectionInput],
) -> Result<(), ServiceError> {
    let mut wanted: Vec<i64> = sections.iter().flat_map(SectionInput::product_refs).collect();
    wanted.sort_unstable();
    wanted.dedup();
    if wanted.is_empty() {
        return Ok(());
    }
    let found: Vec<i64> = catalog_item::Entity::find()
        .filter(catalog_item::Column::Id.is_in(wanted.clone()))
        .filter(catalog_item::Column::Kind.eq(ItemKind::Product))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    match wanted.into_iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(ServiceError::invalid_field(
            "sections",
            format!("Product with ID {} not found", missing),
        )),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct SiteSettingsService {
    db: Arc<DatabaseConnection>,
}

impl SiteSettingsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find<C: ConnectionTrait>(db: &C, id: i64) -> Result<site_settings::Model, ServiceError> {
        site_settings::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Site settings", id))
    }

    async fn bundle<C: ConnectionTrait>(
        db: &C,
        site: site_settings::Model,
    ) -> Result<SiteBundle, DbErr> {
        let id = site.id;
        let contact_sections = contact_section::Entity::find()
            .filter(contact_section::Column::SiteId.eq(id))
            .order_by_asc(contact_section::Column::Id)
            .all(db)
            .await?;
        let section_ids: Vec<i64> = contact_sections.iter().map(|s| s.id).collect();
        let mut addresses: HashMap<i64, Vec<contact_address::Model>> = HashMap::new();
        for address in contact_address::Entity::find()
            .filter(contact_address::Column::ContactSectionId.is_in(section_ids.clone()))
            .order_by_asc(contact_address::Column::Id)
            .all(db)
            .await?
        {
            addresses.entry(address.contact_section_id).or_default().push(address);
        }
        let mut mails: HashMap<i64, Vec<contact_mail::Model>> = HashMap::new();
        for mail in contact_mail::Entity::find()
            .filter(contact_mail::Column::ContactSectionId.is_in(section_ids))
            .order_by_asc(contact_mail::Column::Id)
            .all(db)
            .await?
        {
            mails.entry(mail.contact_section_id).or_default().push(mail);
        }
        let contact_sections = contact_sections
            .into_iter()
            .map(|section| ContactBlock {
                addresses: addresses.remove(&section.id).unwrap_or_default(),
                mails: mails.remove(&section.id).unwrap_or_default(),
                section,
            })
            .collect();

        Ok(SiteBundle {
            menu_items: menu_item::Entity::find()
                .filter(menu_item::Column::SiteId.eq(id))
                .order_by_asc(menu_item::Column::Id)
                .all(db)
                .await?,
            headers: header::Entity::find()
                .filter(header::Column::SiteId.eq(id))
                .order_by_asc(header::Column::Id)
                .all(db)
                .await?,
            sections: generic_section::Entity::find()
                .filter(generic_section::Column::SiteId.eq(id))
                .order_by_asc(generic_section::Column::Id)
                .all(db)
                .await?,
            our_story_sections: our_story_section::Entity::find()
                .filter(our_story_section::Column::SiteId.eq(id))
                .order_by_asc(our_story_section::Column::Id)
                .all(db)
                .await?,
            contact_sections,
            wholesale_sections: wholesale_section::Entity::find()
                .filter(wholesale_section::Column::SiteId.eq(id))
                .order_by_asc(wholesale_section::Column::Id)
                .all(db)
                .await?,
            footer_policies: footer_policy::Entity::find()
                .filter(footer_policy::Column::SiteId.eq(id))
                .order_by_asc(footer_policy::Column::Id)
                .all(db)
                .await?,
            social_media_links: social_media_link::Entity::find()
                .filter(social_media_link::Column::SiteId.eq(id))
                .order_by_asc(social_media_link::Column::Id)
                .all(db)
                .await?,
            footer_info: footer_info::Entity::find()
                .filter(footer_info::Column::SiteId.eq(id))
                .one(db)
                .await?,
            faq_items: faq_item::Entity::find()
                .filter(faq_item::Column::SiteId.eq(id))
                .order_by_asc(faq_item::Column::SortOrder)
                .order_by_asc(faq_item::Column::Id)
                .all(db)
                .await?,
            page_metas: page_meta::Entity::find()
                .filter(page_meta::Column::SiteId.eq(id))
                .order_by_asc(page_meta::Column::Id)
                .all(db)
                .await?,
            site,
        })
    }

    pub async fn list(&self, page: Page) -> Result<(Vec<SiteBundle>, u64), ServiceError> {
        let db = &*self.db;
        let query = site_settings::Entity::find().order_by_asc(site_settings::Column::Id);
        let total = query.clone().count(db).await?;
        let sites = query
            .offset(page.offset())
            .limit(page.per_page)
            .all(db)
            .await?;
        let mut bundles = Vec::with_capacity(sites.len());
        for site in sites {
            bundles.push(Self::bundle(db, site).await?);
        }
        Ok((bundles, total))
    }

    pub async fn get(&self, id: i64) -> Result<SiteBundle, ServiceError> {
        let db = &*self.db;
        let site = Self::find(db, id).await?;
        Ok(Self::bundle(db, site).await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: SiteSettingsInput,
        lang: Language,
    ) -> Result<SiteBundle, ServiceError> {
        let site_title = input
            .localized
            .route("site_title", lang)
            .applied_to(Translated::default());
        require_text("site_title", &site_title)?;

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let mut active = site_settings::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Self::fill(&mut active, &input, lang);
        let site = active.insert(&txn).await?;
        Self::write_collections(&txn, site.id, &input, lang).await?;
        let bundle = Self::bundle(&txn, site).await?;
        txn.commit().await?;

        info!(id = bundle.site.id, "site settings created");
        Ok(bundle)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: SiteSettingsInput,
        lang: Language,
        mode: WriteMode,
    ) -> Result<SiteBundle, ServiceError> {
        let title_patch = input.localized.route("site_title", lang);
        require_present(mode, "site_title", !title_patch.is_empty())?;

        let txn = self.db.begin().await?;
        let current = Self::find(&txn, id).await?;
        let site_title = title_patch.applied_to(Translated::new(
            current.site_title_tr.clone(),
            current.site_title_en.clone(),
        ));
        require_text("site_title", &site_title)?;

        let mut active = current.into_active_model();
        Self::fill(&mut active, &input, lang);
        active.updated_at = Set(Utc::now());
        let site = active.update(&txn).await?;
        Self::write_collections(&txn, id, &input, lang).await?;
        let bundle = Self::bundle(&txn, site).await?;
        txn.commit().await?;

        info!(id, "site settings updated");
        Ok(bundle)
    }

    /// Deletes the settings record; owned rows go with it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        Self::find(&txn, id).await?;
        site_settings::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        info!(id, "site settings deleted");
        Ok(())
    }

    fn fill(active: &mut site_settings::ActiveModel, input: &SiteSettingsInput, lang: Language) {
        slots!(active, input.localized, lang,
            site_title => (site_title_tr, site_title_en),
            site_description => (site_description_tr, site_description_en),
        );
        apply_optional(&input.logo, &mut active.logo);
        apply_optional(&input.favicon, &mut active.favicon);
        apply_optional(&input.head_tracking_code, &mut active.head_tracking_code);
        apply_optional(&input.body_tracking_code, &mut active.body_tracking_code);
    }

    async fn write_collections<C: ConnectionTrait>(
        db: &C,
        site_id: i64,
        input: &SiteSettingsInput,
        lang: Language,
    ) -> Result<(), ServiceError> {
        if let Some(entries) = &input.menu_items {
            owned::sync(db, "menu_items", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.headers {
            owned::sync(db, "headers", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.sections {
            check_product_refs(db, entries).await?;
            owned::sync(db, "sections", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.our_story_sections {
            owned::sync(db, "our_story_sections", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.contact_sections {
            check_mails(entries)?;
            let ids = owned::sync(db, "contact_sections", site_id, entries, lang).await?;
            for (section_id, entry) in ids.into_iter().zip(entries) {
                if let Some(addresses) = &entry.addresses {
                    owned::sync(db, "addresses", section_id, addresses, lang).await?;
                }
                if let Some(mails) = &entry.mails {
                    owned::sync(db, "mails", section_id, mails, lang).await?;
                }
            }
        }
        if let Some(entries) = &input.wholesale_sections {
            owned::sync(db, "wholesale_sections", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.footer_policies {
            owned::sync(db, "footer_policies", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.social_media_links {
            owned::sync(db, "social_media_links", site_id, entries, lang).await?;
        }
        if let Some(footer) = &input.footer_info {
            Self::write_footer(db, site_id, footer.as_ref(), lang).await?;
        }
        if let Some(entries) = &input.faq_items {
            owned::sync(db, "faq_items", site_id, entries, lang).await?;
        }
        if let Some(entries) = &input.page_metas {
            owned::sync(db, "page_metas", site_id, entries, lang).await?;
        }
        Ok(())
    }

    /// Upserts the single footer row, or removes it for `None`
    async fn write_footer<C: ConnectionTrait>(
        db: &C,
        site_id: i64,
        footer: Option<&FooterInfoInput>,
        lang: Language,
    ) -> Result<(), ServiceError> {
        let existing = footer_info::Entity::find()
            .filter(footer_info::Column::SiteId.eq(site_id))
            .one(db)
            .await?;
        let Some(footer) = footer else {
            footer_info::Entity::delete_many()
                .filter(footer_info::Column::SiteId.eq(site_id))
                .exec(db)
                .await?;
            return Ok(());
        };

        let mut active = match existing {
            Some(model) => model.into_active_model(),
            None => footer_info::ActiveModel {
                site_id: Set(site_id),
                footer_text_tr: Set(Some(DEFAULT_FOOTER_TEXT.to_string())),
                social_text_tr: Set(Some(DEFAULT_SOCIAL_TEXT.to_string())),
                ..Default::default()
            },
        };
        apply_optional(&footer.logo, &mut active.logo);
        slots!(active, footer.localized, lang,
            footer_text => (footer_text_tr, footer_text_en),
            social_text => (social_text_tr, social_text_en),
        );
        active.save(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::NotSet;
    use serde_json::json;

    #[test]
    fn new_sections_default_to_generic_type() {
        let input: SectionInput = serde_json::from_value(json!({"title": "Favoriler"})).unwrap();
        let mut model = <generic_section::ActiveModel as Default>::default();
        input.apply(&mut model, 3, Language::Tr);
        assert_eq!(model.section_type, Set(SectionType::Generic));
        assert_eq!(model.site_id, Set(3));
        assert_eq!(model.title_tr, Set(Some("Favoriler".to_string())));
        assert_eq!(model.title_en, NotSet);
    }

    #[test]
    fn entries_route_flat_keys_by_language() {
        let input: MenuItemInput =
            serde_json::from_value(json!({"href": "/about", "text": "About"})).unwrap();
        let mut model = <menu_item::ActiveModel as Default>::default();
        input.apply(&mut model, 1, Language::En);
        assert_eq!(model.text_en, Set(Some("About".to_string())));
        assert_eq!(model.text_tr, NotSet);
    }

    #[test]
    fn faq_sort_order_defaults_to_zero_on_insert() {
        let input: FaqItemInput = serde_json::from_value(json!({"question": "?"})).unwrap();
        let mut model = <faq_item::ActiveModel as Default>::default();
        input.apply(&mut model, 1, Language::Tr);
        assert_eq!(model.sort_order, Set(0));
    }

    #[test]
    fn section_product_refs_skip_nulls() {
        let input: SectionInput = serde_json::from_value(
            json!({"product_1_id": 4, "product_2_id": null, "product_3_id": 9}),
        )
        .unwrap();
        assert_eq!(input.product_refs().collect::<Vec<_>>(), vec![4, 9]);
    }

    #[test]
    fn invalid_contact_mail_is_rejected() {
        let sections: Vec<ContactSectionInput> = serde_json::from_value(json!([
            {"title": "Merkez", "mails": [{"mail": "info@kitti.com.tr"}, {"mail": "nope"}]}
        ]))
        .unwrap();
        assert!(check_mails(&sections).is_err());
        assert!(check_mails(&sections[..0]).is_ok());
    }

    #[test]
    fn footer_info_null_is_distinct_from_missing() {
        let missing: SiteSettingsInput = serde_json::from_value(json!({})).unwrap();
        assert!(missing.footer_info.is_none());
        let cleared: SiteSettingsInput =
            serde_json::from_value(json!({"footer_info": null})).unwrap();
        assert!(matches!(cleared.footer_info, Some(None)));
    }
}
