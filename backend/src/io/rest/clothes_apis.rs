//! # REST API for Clothing Items

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error_status;
use super::mappers::ClothesMapper;
use crate::AppState;
use shared::{ClothesFilter, CreateClothesRequest, UpdateClothesRequest};

pub async fn create_clothes(
    State(state): State<AppState>,
    Json(request): Json<CreateClothesRequest>,
) -> impl IntoResponse {
    info!("POST /api/clothes - request: {:?}", request);

    match state.clothes_service.create_clothes(request).await {
        Ok(item) => (StatusCode::CREATED, Json(ClothesMapper::to_dto(item))).into_response(),
        Err(e) => {
            error!("Failed to create clothing item: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn get_clothes(State(state): State<AppState>, Path(item_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/clothes/{}", item_id);

    match state.clothes_service.get_clothes(item_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(ClothesMapper::to_dto(item))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Clothing item not found").into_response(),
        Err(e) => {
            error!("Failed to get clothing item: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving clothing item").into_response()
        }
    }
}

pub async fn list_clothes(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/clothes");

    match state.clothes_service.list_clothes().await {
        Ok(items) => (StatusCode::OK, Json(ClothesMapper::to_clothes_list_dto(items))).into_response(),
        Err(e) => {
            error!("Failed to list clothing items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing clothing items").into_response()
        }
    }
}

pub async fn update_clothes(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(request): Json<UpdateClothesRequest>,
) -> impl IntoResponse {
    info!("PUT /api/clothes/{} - request: {:?}", item_id, request);

    match state.clothes_service.update_clothes(item_id, request).await {
        Ok(item) => (StatusCode::OK, Json(ClothesMapper::to_dto(item))).into_response(),
        Err(e) => {
            error!("Failed to update clothing item: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn delete_clothes(State(state): State<AppState>, Path(item_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/clothes/{}", item_id);

    match state.clothes_service.delete_clothes(item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete clothing item: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

pub async fn search_clothes(
    State(state): State<AppState>,
    Json(filter): Json<ClothesFilter>,
) -> impl IntoResponse {
    info!("POST /api/clothes/search - filter: {:?}", filter);

    match state.clothes_service.search(&filter).await {
        Ok(items) => (StatusCode::OK, Json(ClothesMapper::to_clothes_list_dto(items))).into_response(),
        Err(e) => {
            error!("Failed to search clothing items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error searching clothing items").into_response()
        }
    }
}
