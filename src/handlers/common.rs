use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::AppConfig;
use crate::services::Page;
use crate::tree::Position;
use crate::{ApiResponse, PaginatedResponse};

/// `201 Created` with the standard envelope
pub type Created<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Response language; unknown codes fall back to Turkish
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LangParam {
    #[param(example = "en")]
    pub lang: Option<String>,
}

/// Pagination parameters for list operations
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<u64>,
    /// Defaults to 20, capped at the configured maximum
    pub per_page: Option<u64>,
}

impl PaginationParams {
    pub fn resolve(&self, config: &AppConfig) -> Page {
        Page::new(self.page.unwrap_or(1), config.page_size(self.per_page))
    }
}

pub fn paginated<T>(items: Vec<T>, total: u64, page: Page) -> PaginatedResponse<T> {
    PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
        total_pages: total.div_ceil(page.per_page),
    }
}

/// Body of the `/move` endpoints
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({"parent_id": 3, "position": {"after": 7}}))]
pub struct MoveRequest {
    /// New parent; `null` makes the node a root
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub position: Position,
}
