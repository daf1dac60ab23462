use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::{created, paginated, Created, LangParam, MoveRequest, PaginationParams};
use crate::{
    entities::slider,
    errors::ServiceError,
    i18n::{Localizer, RequestContext},
    services::{slider_service::SliderInput, WriteMode},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "title": "Yeni sezon",
    "image": "https://kitti.com.tr/media/sliders/new-season-tr.jpg",
    "parent_id": null,
    "level": 0,
    "lft": 1,
    "rght": 2
}))]
pub struct SliderView {
    pub id: i64,
    pub title: Option<String>,
    /// Image for the request language, falling back to the Turkish one
    pub image: Option<String>,
    pub parent_id: Option<i64>,
    pub level: i64,
    pub lft: i64,
    pub rght: i64,
    pub created_at: DateTime<Utc>,
}

impl SliderView {
    fn new(model: &slider::Model, loc: &Localizer) -> Self {
        Self {
            id: model.id,
            title: loc.text(&model.title_tr, &model.title_en),
            image: loc.file_slots(&model.image_tr, &model.image_en),
            parent_id: model.parent_id,
            level: model.depth,
            lft: model.lft,
            rght: model.rght,
            created_at: model.created_at,
        }
    }
}

pub fn slider_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sliders).post(create_slider))
        .route(
            "/:id",
            get(get_slider)
                .put(replace_slider)
                .patch(patch_slider)
                .delete(delete_slider),
        )
        .route("/:id/move", post(move_slider))
}

#[utoipa::path(
    get,
    path = "/api/sliders",
    params(PaginationParams, LangParam),
    responses(
        (status = 200, description = "Sliders in tree order", body = ApiResponse<PaginatedResponse<SliderView>>)
    ),
    tag = "sliders"
)]
pub async fn list_sliders(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<SliderView>> {
    let page = params.resolve(&state.config);
    let (models, total) = state.services.sliders.list(page).await?;
    let loc = ctx.localizer(&state.config);
    let items = models.iter().map(|m| SliderView::new(m, &loc)).collect();
    Ok(Json(ApiResponse::success(paginated(items, total, page))))
}

#[utoipa::path(
    get,
    path = "/api/sliders/:id",
    params(("id" = i64, Path, description = "Slider ID"), LangParam),
    responses(
        (status = 200, description = "Slider fetched", body = ApiResponse<SliderView>),
        (status = 404, description = "Slider not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn get_slider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<SliderView> {
    let model = state.services.sliders.get(id).await?;
    let loc = ctx.localizer(&state.config);
    Ok(Json(ApiResponse::success(SliderView::new(&model, &loc))))
}

#[utoipa::path(
    post,
    path = "/api/sliders",
    params(LangParam),
    request_body = SliderInput,
    responses(
        (status = 201, description = "Slider created", body = ApiResponse<SliderView>),
        (status = 400, description = "Image missing or invalid parent", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn create_slider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<SliderInput>,
) -> Result<Created<SliderView>, ServiceError> {
    let model = state.services.sliders.create(payload, ctx.lang).await?;
    let loc = ctx.localizer(&state.config);
    Ok(created(SliderView::new(&model, &loc)))
}

async fn write_slider(
    state: AppState,
    ctx: RequestContext,
    id: i64,
    payload: SliderInput,
    mode: WriteMode,
) -> ApiResult<SliderView> {
    let model = state
        .services
        .sliders
        .update(id, payload, ctx.lang, mode)
        .await?;
    let loc = ctx.localizer(&state.config);
    Ok(Json(ApiResponse::success(SliderView::new(&model, &loc))))
}

#[utoipa::path(
    put,
    path = "/api/sliders/:id",
    params(("id" = i64, Path, description = "Slider ID"), LangParam),
    request_body = SliderInput,
    responses(
        (status = 200, description = "Slider replaced", body = ApiResponse<SliderView>),
        (status = 400, description = "Image missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "Slider not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn replace_slider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<SliderInput>,
) -> ApiResult<SliderView> {
    write_slider(state, ctx, id, payload, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/sliders/:id",
    params(("id" = i64, Path, description = "Slider ID"), LangParam),
    request_body = SliderInput,
    responses(
        (status = 200, description = "Slider updated", body = ApiResponse<SliderView>),
        (status = 404, description = "Slider not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn patch_slider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<SliderInput>,
) -> ApiResult<SliderView> {
    write_slider(state, ctx, id, payload, WriteMode::Merge).await
}

#[utoipa::path(
    delete,
    path = "/api/sliders/:id",
    params(("id" = i64, Path, description = "Slider ID")),
    responses(
        (status = 204, description = "Slider and nested sliders deleted"),
        (status = 404, description = "Slider not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn delete_slider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.services.sliders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sliders/:id/move",
    params(("id" = i64, Path, description = "Slider ID"), LangParam),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Slider moved", body = ApiResponse<SliderView>),
        (status = 400, description = "Target lies inside the slider's subtree", body = crate::errors::ErrorResponse),
        (status = 404, description = "Slider not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sliders"
)]
pub async fn move_slider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> ApiResult<SliderView> {
    let model = state
        .services
        .sliders
        .move_slider(id, payload.parent_id, payload.position)
        .await?;
    let loc = ctx.localizer(&state.config);
    Ok(Json(ApiResponse::success(SliderView::new(&model, &loc))))
}
