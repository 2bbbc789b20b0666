//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId, infrastructure::dto::http::RoomDetailDto, ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room = match RoomId::try_from(room_id) {
        Ok(room) => room,
        Err(e) => {
            tracing::warn!("Invalid room id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.get_room_detail_usecase.execute(room).await {
        // Domain Model から DTO への変換
        Ok(detail) => Ok(Json(RoomDetailDto::from(&detail))),
        Err(e) => {
            tracing::error!("Failed to get room detail: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
