use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::element_sets::StoredElementSet;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no element set for {0}")]
    NotFound(String),

    #[error("database error")]
    Database(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Element set query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Latest element set of every tracked object
pub async fn current_element_sets_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<StoredElementSet>>, ApiError> {
    let sets = StoredElementSet::find_current(&state.db_pool).await?;
    Ok(Json(sets))
}

pub async fn element_set_by_catalog_number_handler(
    Extension(state): Extension<AppState>,
    Path(catalog_number): Path<i32>,
) -> Result<Json<StoredElementSet>, ApiError> {
    StoredElementSet::find_latest_by_catalog_number(catalog_number, &state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("catalog number {}", catalog_number)))
}

pub async fn element_set_by_name_handler(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StoredElementSet>, ApiError> {
    StoredElementSet::find_latest_by_name(&name, &state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("object {:?}", name)))
}
