use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::{created, paginated, Created, LangParam, MoveRequest, PaginationParams};
use super::items::{ItemView, ItemViews};
use crate::{
    catalog::ItemKind,
    entities::catalog_item,
    errors::ServiceError,
    i18n::RequestContext,
    services::{
        catalog_service::{ItemFilter, ItemInput, ItemOrdering},
        WriteMode,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches any language variant of title or description
    pub search: Option<String>,
    /// Parent category ID
    pub category: Option<i64>,
    /// `lft`, `-lft`, `id` or `-id`
    pub ordering: Option<String>,
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/:id/move", post(move_product))
        .route("/:id/convert", post(convert_product))
}

async fn render(
    state: &AppState,
    ctx: &RequestContext,
    model: catalog_item::Model,
) -> Result<ItemView, ServiceError> {
    let loc = ctx.localizer(&state.config);
    let models = [model];
    let views = ItemViews::load(&state.services.catalog, &loc, &models).await?;
    Ok(views.view(&models[0]))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery, LangParam),
    responses(
        (status = 200, description = "Products listed", body = ApiResponse<PaginatedResponse<ItemView>>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<ItemView>> {
    let page = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve(&state.config);
    let ordering = match ItemOrdering::from_param(query.ordering.as_deref()) {
        ItemOrdering::Level | ItemOrdering::LevelDesc => ItemOrdering::Lft,
        other => other,
    };
    let filter = ItemFilter {
        search: query.search,
        parent_id: query.category,
        ordering,
        ..Default::default()
    };

    let catalog = &state.services.catalog;
    let (models, total) = catalog.list(ItemKind::Product, &filter, page).await?;
    let loc = ctx.localizer(&state.config);
    let items = ItemViews::load(catalog, &loc, &models).await?.views(&models);
    Ok(Json(ApiResponse::success(paginated(items, total, page))))
}

#[utoipa::path(
    get,
    path = "/api/products/:id",
    params(("id" = i64, Path, description = "Product ID"), LangParam),
    responses(
        (status = 200, description = "Product fetched", body = ApiResponse<ItemView>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<ItemView> {
    let model = state.services.catalog.get(ItemKind::Product, id).await?;
    Ok(Json(ApiResponse::success(render(&state, &ctx, model).await?)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    params(LangParam),
    request_body = ItemInput,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<ItemInput>,
) -> Result<Created<ItemView>, ServiceError> {
    let model = state
        .services
        .catalog
        .create(ItemKind::Product, payload, ctx.lang)
        .await?;
    Ok(created(render(&state, &ctx, model).await?))
}

async fn write_product(
    state: AppState,
    ctx: RequestContext,
    id: i64,
    payload: ItemInput,
    mode: WriteMode,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .update(ItemKind::Product, id, payload, ctx.lang, mode)
        .await?;
    Ok(Json(ApiResponse::success(render(&state, &ctx, model).await?)))
}

#[utoipa::path(
    put,
    path = "/api/products/:id",
    params(("id" = i64, Path, description = "Product ID"), LangParam),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Product replaced", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn replace_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<ItemInput>,
) -> ApiResult<ItemView> {
    write_product(state, ctx, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/products/:id",
    params(("id" = i64, Path, description = "Product ID"), LangParam),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn patch_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<ItemInput>,
) -> ApiResult<ItemView> {
    write_product(state, ctx, id, payload, WriteMode::Merge).await
}

#[utoipa::path(
    delete,
    path = "/api/products/:id",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product and its images deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .catalog
        .delete(ItemKind::Product, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/products/:id/move",
    params(("id" = i64, Path, description = "Product ID"), LangParam),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Product moved", body = ApiResponse<ItemView>),
        (status = 400, description = "Tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn move_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .move_item(ItemKind::Product, id, payload.parent_id, payload.position)
        .await?;
    Ok(Json(ApiResponse::success(render(&state, &ctx, model).await?)))
}

#[utoipa::path(
    post,
    path = "/api/products/:id/convert",
    params(("id" = i64, Path, description = "Product ID"), LangParam),
    responses(
        (status = 200, description = "Product turned into a category", body = ApiResponse<ItemView>),
        (status = 400, description = "Tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn convert_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .convert(ItemKind::Product, id)
        .await?;
    Ok(Json(ApiResponse::success(render(&state, &ctx, model).await?)))
}
