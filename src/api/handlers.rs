use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ChangeImageRequest, ChangeImageResponse},
    services::{catalog::SnapshotCatalog, resolver},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Describes the image change endpoint
pub async fn change_image_info() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "Alice Image Change API",
        "endpoint": "/api/image/change"
    }))
}

/// Picks a different image for the display's current context
pub async fn change_image(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ChangeImageRequest>, JsonRejection>,
) -> AppResult<Json<ChangeImageResponse>> {
    let Json(request) =
        payload.map_err(|e| AppError::InvalidContext(format!("Invalid JSON: {}", e.body_text())))?;
    let context = request.into_context(&state.defaults)?;

    tracing::info!(
        request_id = %request_id,
        weather = ?context.weather,
        time_period = ?context.time_period,
        exclude_id = ?context.exclude_id,
        "Processing image change request"
    );

    let catalog = SnapshotCatalog::new(state.catalog.as_ref());
    let found = resolver::find_candidates(&catalog, &context)
        .await
        .inspect_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                catalog = state.catalog.name(),
                error = %e,
                "Image resolution failed"
            );
        })?;

    let selected = found.and_then(|set| {
        let image = set.choose(&mut rand::rng())?.clone();
        Some((image, set.match_info()))
    });

    let response = match selected {
        Some((image, match_info)) => {
            tracing::info!(
                request_id = %request_id,
                image_id = %image.id,
                stage = ?match_info.stage,
                candidates = match_info.candidates,
                "Alternative image selected"
            );
            ChangeImageResponse::found(&image, match_info)
        }
        None => {
            tracing::info!(request_id = %request_id, "No alternative image found");
            ChangeImageResponse::not_found()
        }
    };

    Ok(Json(response))
}
