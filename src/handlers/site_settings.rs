use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::{created, paginated, Created, LangParam, PaginationParams};
use crate::{
    entities::{
        contact_address, contact_mail, faq_item, footer_info, footer_policy, generic_section,
        header, menu_item, our_story_section, page_meta, social_media_link, wholesale_section,
        OurStorySectionType, SectionType,
    },
    errors::ServiceError,
    i18n::{Localizer, RequestContext},
    services::{
        site_settings_service::{ContactBlock, SiteBundle, SiteSettingsInput},
        WriteMode,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemView {
    pub id: i64,
    pub text: Option<String>,
    pub href: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HeaderView {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionView {
    pub id: i64,
    pub section_type: SectionType,
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub mobile_image: Option<String>,
    pub button_text_left: Option<String>,
    pub button_url_left: Option<String>,
    pub button_text_right: Option<String>,
    pub button_url_right: Option<String>,
    pub product_1_id: Option<i64>,
    pub product_2_id: Option<i64>,
    pub product_3_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OurStorySectionView {
    pub id: i64,
    pub section_type: OurStorySectionType,
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub mobile_image: Option<String>,
    pub subimage: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactAddressView {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tel: String,
    pub tel_wp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactMailView {
    pub id: i64,
    pub mail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactSectionView {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub addresses: Vec<ContactAddressView>,
    pub mails: Vec<ContactMailView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WholesaleSectionView {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub info_text: Option<String>,
    pub image: Option<String>,
    pub button_top_title: Option<String>,
    pub button_top_text: Option<String>,
    pub button_top_url: Option<String>,
    pub button_bottom_title: Option<String>,
    pub button_bottom_text: Option<String>,
    pub button_bottom_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FooterPolicyView {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SocialMediaLinkView {
    pub id: i64,
    pub icon: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FooterInfoView {
    pub id: i64,
    pub logo: Option<String>,
    pub footer_text: Option<String>,
    pub social_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FaqItemView {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageMetaView {
    pub id: i64,
    pub page: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Site configuration with every owned block, resolved for one language
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteSettingsView {
    pub id: i64,
    pub site_title: Option<String>,
    pub site_description: Option<String>,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    pub head_tracking_code: Option<String>,
    pub body_tracking_code: Option<String>,
    pub menu_items: Vec<MenuItemView>,
    pub headers: Vec<HeaderView>,
    pub sections: Vec<SectionView>,
    pub our_story_sections: Vec<OurStorySectionView>,
    pub contact_sections: Vec<ContactSectionView>,
    pub wholesale_sections: Vec<WholesaleSectionView>,
    pub footer_policies: Vec<FooterPolicyView>,
    pub social_media_links: Vec<SocialMediaLinkView>,
    pub footer_info: Option<FooterInfoView>,
    pub faq_items: Vec<FaqItemView>,
    pub page_metas: Vec<PageMetaView>,
}

fn menu_item_view(m: &menu_item::Model, loc: &Localizer) -> MenuItemView {
    MenuItemView {
        id: m.id,
        text: loc.text(&m.text_tr, &m.text_en),
        href: m.href.clone(),
    }
}

fn header_view(m: &header::Model, loc: &Localizer) -> HeaderView {
    HeaderView {
        id: m.id,
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
        image: loc.file(&m.image),
    }
}

fn section_view(m: &generic_section::Model, loc: &Localizer) -> SectionView {
    SectionView {
        id: m.id,
        section_type: m.section_type,
        name: loc.text(&m.name_tr, &m.name_en),
        subtitle: loc.text(&m.subtitle_tr, &m.subtitle_en),
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
        image: loc.file(&m.image),
        mobile_image: loc.file(&m.mobile_image),
        button_text_left: loc.text(&m.button_text_left_tr, &m.button_text_left_en),
        button_url_left: m.button_url_left.clone(),
        button_text_right: loc.text(&m.button_text_right_tr, &m.button_text_right_en),
        button_url_right: m.button_url_right.clone(),
        product_1_id: m.product_1_id,
        product_2_id: m.product_2_id,
        product_3_id: m.product_3_id,
    }
}

fn our_story_view(m: &our_story_section::Model, loc: &Localizer) -> OurStorySectionView {
    OurStorySectionView {
        id: m.id,
        section_type: m.section_type,
        name: loc.text(&m.name_tr, &m.name_en),
        subtitle: loc.text(&m.subtitle_tr, &m.subtitle_en),
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
        image: loc.file(&m.image),
        mobile_image: loc.file(&m.mobile_image),
        subimage: loc.file(&m.subimage),
        button_text: loc.text(&m.button_text_tr, &m.button_text_en),
        button_url: m.button_url.clone(),
    }
}

fn address_view(m: &contact_address::Model, loc: &Localizer) -> ContactAddressView {
    ContactAddressView {
        id: m.id,
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
        tel: m.tel.clone(),
        tel_wp: m.tel_wp.clone(),
    }
}

fn mail_view(m: &contact_mail::Model) -> ContactMailView {
    ContactMailView {
        id: m.id,
        mail: m.mail.clone(),
    }
}

fn contact_view(block: &ContactBlock, loc: &Localizer) -> ContactSectionView {
    let section = &block.section;
    ContactSectionView {
        id: section.id,
        title: loc.text(&section.title_tr, &section.title_en),
        description: loc.text(&section.description_tr, &section.description_en),
        addresses: block.addresses.iter().map(|a| address_view(a, loc)).collect(),
        mails: block.mails.iter().map(mail_view).collect(),
    }
}

fn wholesale_view(m: &wholesale_section::Model, loc: &Localizer) -> WholesaleSectionView {
    WholesaleSectionView {
        id: m.id,
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
        info_text: loc.text(&m.info_text_tr, &m.info_text_en),
        image: loc.file(&m.image),
        button_top_title: m.button_top_title.clone(),
        button_top_text: loc.text(&m.button_top_text_tr, &m.button_top_text_en),
        button_top_url: m.button_top_url.clone(),
        button_bottom_title: m.button_bottom_title.clone(),
        button_bottom_text: loc.text(&m.button_bottom_text_tr, &m.button_bottom_text_en),
        button_bottom_url: m.button_bottom_url.clone(),
    }
}

fn policy_view(m: &footer_policy::Model, loc: &Localizer) -> FooterPolicyView {
    FooterPolicyView {
        id: m.id,
        title: loc.text(&m.title_tr, &m.title_en),
        description: loc.text(&m.description_tr, &m.description_en),
    }
}

fn social_view(m: &social_media_link::Model, loc: &Localizer) -> SocialMediaLinkView {
    SocialMediaLinkView {
        id: m.id,
        icon: loc.file(&Some(m.icon.clone())),
        url: m.url.clone(),
    }
}

fn footer_view(m: &footer_info::Model, loc: &Localizer) -> FooterInfoView {
    FooterInfoView {
        id: m.id,
        logo: loc.file(&m.logo),
        footer_text: loc.text(&m.footer_text_tr, &m.footer_text_en),
        social_text: loc.text(&m.social_text_tr, &m.social_text_en),
    }
}

fn faq_view(m: &faq_item::Model, loc: &Localizer) -> FaqItemView {
    FaqItemView {
        id: m.id,
        question: loc.text(&m.question_tr, &m.question_en),
        answer: loc.text(&m.answer_tr, &m.answer_en),
        sort_order: m.sort_order,
    }
}

fn page_meta_view(m: &page_meta::Model, loc: &Localizer) -> PageMetaView {
    PageMetaView {
        id: m.id,
        page: m.page.clone(),
        meta_title: loc.text(&m.meta_title_tr, &m.meta_title_en),
        meta_description: loc.text(&m.meta_description_tr, &m.meta_description_en),
    }
}

impl SiteSettingsView {
    pub fn new(bundle: &SiteBundle, loc: &Localizer) -> Self {
        let site = &bundle.site;
        Self {
            id: site.id,
            site_title: loc.text(&site.site_title_tr, &site.site_title_en),
            site_description: loc.text(&site.site_description_tr, &site.site_description_en),
            logo: loc.file(&site.logo),
            favicon: loc.file(&site.favicon),
            head_tracking_code: site.head_tracking_code.clone(),
            body_tracking_code: site.body_tracking_code.clone(),
            menu_items: bundle.menu_items.iter().map(|m| menu_item_view(m, loc)).collect(),
            headers: bundle.headers.iter().map(|m| header_view(m, loc)).collect(),
            sections: bundle.sections.iter().map(|m| section_view(m, loc)).collect(),
            our_story_sections: bundle
                .our_story_sections
                .iter()
                .map(|m| our_story_view(m, loc))
                .collect(),
            contact_sections: bundle
                .contact_sections
                .iter()
                .map(|b| contact_view(b, loc))
                .collect(),
            wholesale_sections: bundle
                .wholesale_sections
                .iter()
                .map(|m| wholesale_view(m, loc))
                .collect(),
            footer_policies: bundle
                .footer_policies
                .iter()
                .map(|m| policy_view(m, loc))
                .collect(),
            social_media_links: bundle
                .social_media_links
                .iter()
                .map(|m| social_view(m, loc))
                .collect(),
            footer_info: bundle.footer_info.as_ref().map(|m| footer_view(m, loc)),
            faq_items: bundle.faq_items.iter().map(|m| faq_view(m, loc)).collect(),
            page_metas: bundle.page_metas.iter().map(|m| page_meta_view(m, loc)).collect(),
        }
    }
}

pub fn site_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_site_settings).post(create_site_settings))
        .route(
            "/:id",
            get(get_site_settings)
                .put(replace_site_settings)
                .patch(patch_site_settings)
                .delete(delete_site_settings),
        )
}

#[utoipa::path(
    get,
    path = "/api/site-settings",
    params(PaginationParams, LangParam),
    responses(
        (status = 200, description = "Site settings listed", body = ApiResponse<PaginatedResponse<SiteSettingsView>>)
    ),
    tag = "site-settings"
)]
pub async fn list_site_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<SiteSettingsView>> {
    let page = params.resolve(&state.config);
    let (bundles, total) = state.services.site_settings.list(page).await?;
    let loc = ctx.localizer(&state.config);
    let items = bundles
        .iter()
        .map(|b| SiteSettingsView::new(b, &loc))
        .collect();
    Ok(Json(ApiResponse::success(paginated(items, total, page))))
}

#[utoipa::path(
    get,
    path = "/api/site-settings/:id",
    params(("id" = i64, Path, description = "Site settings ID"), LangParam),
    responses(
        (status = 200, description = "Site settings fetched", body = ApiResponse<SiteSettingsView>),
        (status = 404, description = "Site settings not found", body = crate::errors::ErrorResponse)
    ),
    tag = "site-settings"
)]
pub async fn get_site_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<SiteSettingsView> {
    let bundle = state.services.site_settings.get(id).await?;
    let loc = ctx.localizer(&state.config);
    Ok(Json(ApiResponse::success(SiteSettingsView::new(&bundle, &loc))))
}

#[utoipa::path(
    post,
    path = "/api/site-settings",
    params(LangParam),
    request_body = SiteSettingsInput,
    responses(
        (status = 201, description = "Site settings created", body = ApiResponse<SiteSettingsView>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "site-settings"
)]
pub async fn create_site_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<SiteSettingsInput>,
) -> Result<Created<SiteSettingsView>, ServiceError> {
    let bundle = state
        .services
        .site_settings
        .create(payload, ctx.lang)
        .await?;
    let loc = ctx.localizer(&state.config);
    Ok(created(SiteSettingsView::new(&bundle, &loc)))
}

async fn write_site_settings(
    state: AppState,
    ctx: RequestContext,
    id: i64,
    payload: SiteSettingsInput,
    mode: WriteMode,
) -> ApiResult<SiteSettingsView> {
    let bundle = state
        .services
        .site_settings
        .update(id, payload, ctx.lang, mode)
        .await?;
    let loc = ctx.localizer(&state.config);
    Ok(Json(ApiResponse::success(SiteSettingsView::new(&bundle, &loc))))
}

#[utoipa::path(
    put,
    path = "/api/site-settings/:id",
    params(("id" = i64, Path, description = "Site settings ID"), LangParam),
    request_body = SiteSettingsInput,
    responses(
        (status = 200, description = "Site settings replaced", body = ApiResponse<SiteSettingsView>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Site settings not found", body = crate::errors::ErrorResponse)
    ),
    tag = "site-settings"
)]
pub async fn replace_site_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<SiteSettingsInput>,
) -> ApiResult<SiteSettingsView> {
    write_site_settings(state, ctx, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/site-settings/:id",
    params(("id" = i64, Path, description = "Site settings ID"), LangParam),
    request_body = SiteSettingsInput,
    responses(
        (status = 200, description = "Site settings updated", body = ApiResponse<SiteSettingsView>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Site settings not found", body = crate::errors::ErrorResponse)
    ),
    tag = "site-settings"
)]
pub async fn patch_site_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<SiteSettingsInput>,
) -> ApiResult<SiteSettingsView> {
    write_site_settings(state, ctx, id, payload, WriteMode::Merge).await
}

#[utoipa::path(
    delete,
    path = "/api/site-settings/:id",
    params(("id" = i64, Path, description = "Site settings ID")),
    responses(
        (status = 204, description = "Site settings and owned blocks deleted"),
        (status = 404, description = "Site settings not found", body = crate::errors::ErrorResponse)
    ),
    tag = "site-settings"
)]
pub async fn delete_site_settings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.services.site_settings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
