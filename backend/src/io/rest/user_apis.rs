//! # REST API for User Management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error_status;
use super::mappers::UserMapper;
use crate::AppState;
use shared::{ActiveUserResponse, CreateUserRequest, UpdateUserRequest};

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    match state.user_service.create_user(request).await {
        Ok(user) => (StatusCode::CREATED, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to create user: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Get a user by ID
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/users/{}", user_id);

    match state.user_service.get_user(user_id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => {
            error!("Failed to get user: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving user").into_response()
        }
    }
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/users");

    match state.user_service.list_users().await {
        Ok(users) => (StatusCode::OK, Json(UserMapper::to_user_list_dto(users))).into_response(),
        Err(e) => {
            error!("Failed to list users: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing users").into_response()
        }
    }
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{} - request: {:?}", user_id, request);

    match state.user_service.update_user(user_id, request).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to update user: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a user along with their items
pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/users/{}", user_id);

    match state.user_service.delete_user(user_id).await {
        Ok(()) => {
            state.refresh_catalog().await;
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to delete user: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Make a user the active session user
pub async fn activate_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> impl IntoResponse {
    info!("POST /api/users/{}/activate", user_id);

    match state.user_service.set_active_user(user_id).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => {
            error!("Failed to set active user: {:#}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Get the active session user
pub async fn get_active_user(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/users/active");

    match state.user_service.active_user().await {
        Ok(user) => {
            let response = ActiveUserResponse {
                active_user: user.map(UserMapper::to_dto),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to get active user: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving active user").into_response()
        }
    }
}
