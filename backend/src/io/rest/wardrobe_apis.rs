//! # REST API for Wardrobes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error_status;
use super::mappers::WardrobeMapper;
use crate::AppState;
use shared::{CreateWardrobeRequest, UpdateWardrobeRequest};

pub async fn create_wardrobe(
    State(state): State<AppState>,
    Json(request): Json<CreateWardrobeRequest>,
) -> impl IntoResponse {
    info!("POST /api/wardrobes - request: {:?}", request);

    match state.wardrobe_service.create_wardrobe(request).await {
        Ok(wardrobe) => (StatusCode::CREATED, Json(WardrobeMapper::to_dto(wardrobe))).into_response(),
        Err(e) => {
            error!("Failed to create wardrobe: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn get_wardrobe(State(state): State<AppState>, Path(wardrobe_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/wardrobes/{}", wardrobe_id);

    match state.wardrobe_service.get_wardrobe(wardrobe_id).await {
        Ok(Some(wardrobe)) => (StatusCode::OK, Json(WardrobeMapper::to_dto(wardrobe))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Wardrobe not found").into_response(),
        Err(e) => {
            error!("Failed to get wardrobe: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving wardrobe").into_response()
        }
    }
}

pub async fn list_wardrobes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/wardrobes");

    match state.wardrobe_service.list_wardrobes().await {
        Ok(wardrobes) => (StatusCode::OK, Json(WardrobeMapper::to_wardrobe_list_dto(wardrobes))).into_response(),
        Err(e) => {
            error!("Failed to list wardrobes: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing wardrobes").into_response()
        }
    }
}

pub async fn update_wardrobe(
    State(state): State<AppState>,
    Path(wardrobe_id): Path<i64>,
    Json(request): Json<UpdateWardrobeRequest>,
) -> impl IntoResponse {
    info!("PUT /api/wardrobes/{} - request: {:?}", wardrobe_id, request);

    match state.wardrobe_service.update_wardrobe(wardrobe_id, request).await {
        Ok(wardrobe) => (StatusCode::OK, Json(WardrobeMapper::to_dto(wardrobe))).into_response(),
        Err(e) => {
            error!("Failed to update wardrobe: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a wardrobe; its items go with it
pub async fn delete_wardrobe(State(state): State<AppState>, Path(wardrobe_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/wardrobes/{}", wardrobe_id);

    match state.wardrobe_service.delete_wardrobe(wardrobe_id).await {
        Ok(()) => {
            state.refresh_catalog().await;
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to delete wardrobe: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
