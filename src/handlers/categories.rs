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
    catalog::{CategorySubtype, ItemKind},
    entities::catalog_item,
    errors::ServiceError,
    i18n::{Localizer, RequestContext},
    services::{
        catalog_service::{ItemFilter, ItemInput, ItemOrdering},
        WriteMode,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches any language variant of title or description
    pub search: Option<String>,
    /// Tree depth; 0 (root categories) when omitted
    pub level: Option<i64>,
    #[param(value_type = Option<CategorySubtype>)]
    pub category_subtype: Option<CategorySubtype>,
    /// `lft`, `-lft`, `level`, `-level`, `id` or `-id`
    pub ordering: Option<String>,
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(replace_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .route("/:id/move", post(move_category))
        .route("/:id/convert", post(convert_category))
        .route("/:id/children", get(category_children))
        .route("/:id/descendants", get(category_descendants))
        .route("/:id/ancestors", get(category_ancestors))
}

fn localizer(state: &AppState, ctx: &RequestContext) -> Localizer {
    ctx.localizer(&state.config)
}

/// Renders one category with its whole subtree nested below it
async fn category_tree(
    state: &AppState,
    loc: &Localizer,
    model: catalog_item::Model,
) -> Result<ItemView, ServiceError> {
    let catalog = &state.services.catalog;
    let subtree = catalog.subtrees(std::slice::from_ref(&model)).await?;
    let mut all = subtree.clone();
    all.push(model.clone());
    let views = ItemViews::load(catalog, loc, &all).await?;
    Ok(views.tree(&model, &subtree))
}

async fn flat_views(
    state: &AppState,
    loc: &Localizer,
    models: Vec<catalog_item::Model>,
) -> Result<Vec<ItemView>, ServiceError> {
    let views = ItemViews::load(&state.services.catalog, loc, &models).await?;
    Ok(views.views(&models))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(CategoryListQuery, LangParam),
    responses(
        (status = 200, description = "Root categories with sub-categories and products nested", body = ApiResponse<PaginatedResponse<ItemView>>)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<CategoryListQuery>,
) -> ApiResult<PaginatedResponse<ItemView>> {
    let page = PaginationParams {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve(&state.config);
    let filter = ItemFilter {
        search: query.search,
        subtype: query.category_subtype,
        depth: Some(query.level.unwrap_or(0)),
        parent_id: None,
        ordering: ItemOrdering::from_param(query.ordering.as_deref()),
    };

    let catalog = &state.services.catalog;
    let (roots, total) = catalog.list(ItemKind::Category, &filter, page).await?;
    let subtree = catalog.subtrees(&roots).await?;
    let mut all = roots.clone();
    all.extend(subtree.iter().cloned());

    let loc = localizer(&state, &ctx);
    let views = ItemViews::load(catalog, &loc, &all).await?;
    let items = roots
        .iter()
        .map(|root| {
            let below: Vec<catalog_item::Model> = subtree
                .iter()
                .filter(|n| n.lft > root.lft && n.rght < root.rght)
                .cloned()
                .collect();
            views.tree(root, &below)
        })
        .collect();

    Ok(Json(ApiResponse::success(paginated(items, total, page))))
}

#[utoipa::path(
    get,
    path = "/api/categories/:id",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    responses(
        (status = 200, description = "Category with its subtree", body = ApiResponse<ItemView>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<ItemView> {
    let model = state.services.catalog.get(ItemKind::Category, id).await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        category_tree(&state, &loc, model).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    params(LangParam),
    request_body = ItemInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<ItemInput>,
) -> Result<Created<ItemView>, ServiceError> {
    let model = state
        .services
        .catalog
        .create(ItemKind::Category, payload, ctx.lang)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(created(category_tree(&state, &loc, model).await?))
}

async fn write_category(
    state: AppState,
    ctx: RequestContext,
    id: i64,
    payload: ItemInput,
    mode: WriteMode,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .update(ItemKind::Category, id, payload, ctx.lang, mode)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        category_tree(&state, &loc, model).await?,
    )))
}

#[utoipa::path(
    put,
    path = "/api/categories/:id",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Category replaced", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn replace_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<ItemInput>,
) -> ApiResult<ItemView> {
    write_category(state, ctx, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/categories/:id",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<ItemView>),
        (status = 400, description = "Invalid payload or tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn patch_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<ItemInput>,
) -> ApiResult<ItemView> {
    write_category(state, ctx, id, payload, WriteMode::Merge).await
}

#[utoipa::path(
    delete,
    path = "/api/categories/:id",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category, its subtree and their images deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .catalog
        .delete(ItemKind::Category, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/categories/:id/move",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Category moved with its subtree", body = ApiResponse<ItemView>),
        (status = 400, description = "Cycle or tree rule violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn move_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .move_item(ItemKind::Category, id, payload.parent_id, payload.position)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        category_tree(&state, &loc, model).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/categories/:id/convert",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    responses(
        (status = 200, description = "Category turned into a product", body = ApiResponse<ItemView>),
        (status = 400, description = "The category still has children or a subtype", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn convert_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<ItemView> {
    let model = state
        .services
        .catalog
        .convert(ItemKind::Category, id)
        .await?;
    let loc = localizer(&state, &ctx);
    let models = [model];
    let views = ItemViews::load(&state.services.catalog, &loc, &models).await?;
    Ok(Json(ApiResponse::success(views.view(&models[0]))))
}

#[utoipa::path(
    get,
    path = "/api/categories/:id/children",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    responses(
        (status = 200, description = "Direct children in tree order", body = ApiResponse<Vec<ItemView>>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn category_children(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Vec<ItemView>> {
    let models = state
        .services
        .catalog
        .children(ItemKind::Category, id)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        flat_views(&state, &loc, models).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/:id/descendants",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    responses(
        (status = 200, description = "Every node below the category, pre-order", body = ApiResponse<Vec<ItemView>>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn category_descendants(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Vec<ItemView>> {
    let models = state
        .services
        .catalog
        .descendants(ItemKind::Category, id)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        flat_views(&state, &loc, models).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/:id/ancestors",
    params(("id" = i64, Path, description = "Category ID"), LangParam),
    responses(
        (status = 200, description = "Ancestors, root first", body = ApiResponse<Vec<ItemView>>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn category_ancestors(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Vec<ItemView>> {
    let models = state
        .services
        .catalog
        .ancestors(ItemKind::Category, id)
        .await?;
    let loc = localizer(&state, &ctx);
    Ok(Json(ApiResponse::success(
        flat_views(&state, &loc, models).await?,
    )))
}
