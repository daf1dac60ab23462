use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/api/docs/swagger";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kitti API",
        version = "1.0.0",
        description = r#"
# Kitti catalog and site content API

Categories and products form one ordered tree; sliders form another. Site
settings carry every page block of the marketing site.

## Languages

Every endpoint accepts `lang=tr|en` (default `tr`). Bilingual fields are
returned in the requested language and fall back to Turkish when no
translation is stored. On writes a flat key such as `title` goes to the
requested language; `title_tr` / `title_en` address a language directly.

## Pagination

List endpoints take `page` (default 1) and `per_page` (default 20, max 100).

## Errors

Failures return `{error, message, code, fields?, request_id, timestamp}`.
Tree rule violations use the codes `illegal_children`, `too_deep`,
`invalid_parent`, `misplaced_subtype` and `cycle`.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "categories", description = "Category tree"),
        (name = "products", description = "Products in the category tree"),
        (name = "sliders", description = "Home page sliders"),
        (name = "site-settings", description = "Site configuration and page blocks"),
        (name = "contact", description = "Contact form")
    ),
    paths(
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::replace_category,
        crate::handlers::categories::patch_category,
        crate::handlers::categories::delete_category,
        crate::handlers::categories::move_category,
        crate::handlers::categories::convert_category,
        crate::handlers::categories::category_children,
        crate::handlers::categories::category_descendants,
        crate::handlers::categories::category_ancestors,

        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::replace_product,
        crate::handlers::products::patch_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::move_product,
        crate::handlers::products::convert_product,

        crate::handlers::sliders::list_sliders,
        crate::handlers::sliders::get_slider,
        crate::handlers::sliders::create_slider,
        crate::handlers::sliders::replace_slider,
        crate::handlers::sliders::patch_slider,
        crate::handlers::sliders::delete_slider,
        crate::handlers::sliders::move_slider,

        crate::handlers::site_settings::list_site_settings,
        crate::handlers::site_settings::get_site_settings,
        crate::handlers::site_settings::create_site_settings,
        crate::handlers::site_settings::replace_site_settings,
        crate::handlers::site_settings::patch_site_settings,
        crate::handlers::site_settings::delete_site_settings,

        crate::handlers::contact::submit_contact_form,
    ),
    components(
        schemas(
            crate::tree::Position,
            crate::catalog::ItemKind,
            crate::catalog::CategorySubtype,
            crate::entities::SectionType,
            crate::entities::OurStorySectionType,
            crate::handlers::common::MoveRequest,
            crate::handlers::items::ItemView,
            crate::handlers::items::ImageView,
            crate::services::catalog_service::ItemInput,
            crate::services::catalog_service::ImageInput,
            crate::handlers::sliders::SliderView,
            crate::services::slider_service::SliderInput,
            crate::handlers::site_settings::SiteSettingsView,
            crate::services::site_settings_service::SiteSettingsInput,
            crate::handlers::contact::ContactEntryView,
            crate::services::contact_service::ContactSubmission,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from(OPENAPI_JSON_PATH).try_it_out_enabled(true))
}
