//! # REST API for Shoes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error_status;
use super::mappers::ShoesMapper;
use crate::AppState;
use shared::{CreateShoesRequest, ShoesFilter, UpdateShoesRequest};

pub async fn create_shoes(
    State(state): State<AppState>,
    Json(request): Json<CreateShoesRequest>,
) -> impl IntoResponse {
    info!("POST /api/shoes - request: {:?}", request);

    match state.shoes_service.create_shoes(request).await {
        Ok(item) => (StatusCode::CREATED, Json(ShoesMapper::to_dto(item))).into_response(),
        Err(e) => {
            error!("Failed to create shoes: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn get_shoes(State(state): State<AppState>, Path(item_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/shoes/{}", item_id);

    match state.shoes_service.get_shoes(item_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(ShoesMapper::to_dto(item))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Shoes not found").into_response(),
        Err(e) => {
            error!("Failed to get shoes: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving shoes").into_response()
        }
    }
}

pub async fn list_shoes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/shoes");

    match state.shoes_service.list_shoes().await {
        Ok(items) => (StatusCode::OK, Json(ShoesMapper::to_shoes_list_dto(items))).into_response(),
        Err(e) => {
            error!("Failed to list shoes: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing shoes").into_response()
        }
    }
}

pub async fn update_shoes(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(request): Json<UpdateShoesRequest>,
) -> impl IntoResponse {
    info!("PUT /api/shoes/{} - request: {:?}", item_id, request);

    match state.shoes_service.update_shoes(item_id, request).await {
        Ok(item) => (StatusCode::OK, Json(ShoesMapper::to_dto(item))).into_response(),
        Err(e) => {
            error!("Failed to update shoes: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn delete_shoes(State(state): State<AppState>, Path(item_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/shoes/{}", item_id);

    match state.shoes_service.delete_shoes(item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete shoes: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn search_shoes(State(state): State<AppState>, Json(filter): Json<ShoesFilter>) -> impl IntoResponse {
    info!("POST /api/shoes/search - filter: {:?}", filter);

    match state.shoes_service.search(&filter).await {
        Ok(items) => (StatusCode::OK, Json(ShoesMapper::to_shoes_list_dto(items))).into_response(),
        Err(e) => {
            error!("Failed to search shoes: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error searching shoes").into_response()
        }
    }
}
