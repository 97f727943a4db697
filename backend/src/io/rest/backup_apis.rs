//! # REST API for Backup and Restore
//!
//! Restore is a two-step exchange: `/backup/analyze` decodes an archive and
//! keeps it in the app state, `/backup/restore` then applies a selection to
//! that archive. Backup creation runs in the background and is followed
//! through `/backup/status`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::backup::FileHandle;
use crate::AppState;
use shared::{BackupPathRequest, RestoreRequest};

fn already_running() -> axum::response::Response {
    warn!("Rejected backup request: another operation is running");
    (StatusCode::CONFLICT, "A backup operation is already running").into_response()
}

/// Start writing a backup archive to the given path
pub async fn create_backup(
    State(state): State<AppState>,
    Json(request): Json<BackupPathRequest>,
) -> impl IntoResponse {
    info!("POST /api/backup/create - path: {}", request.path);

    match state
        .backup_service
        .spawn_create_backup(Arc::new(FileHandle::new(&request.path)))
    {
        Ok(_) => (StatusCode::ACCEPTED, "Backup started").into_response(),
        Err(e) if e.is_already_running() => already_running(),
        Err(e) => {
            error!("Failed to start backup: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_message()).into_response()
        }
    }
}

/// Decode an archive and describe its contents
pub async fn analyze_backup(
    State(state): State<AppState>,
    Json(request): Json<BackupPathRequest>,
) -> impl IntoResponse {
    info!("POST /api/backup/analyze - path: {}", request.path);

    let mut pending = state.pending_restore.lock().await;

    let source = Arc::new(FileHandle::new(&request.path));
    match state.backup_service.analyze_backup(source).await {
        Ok(analyzed) => {
            let summary = analyzed.summary.clone();
            *pending = Some(analyzed);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) if e.is_already_running() => already_running(),
        Err(e) => {
            // The new analysis cleared the staged images of any earlier one
            *pending = None;
            error!("Failed to analyze backup: {:#}", e);
            let status = if e.is_malformed_archive() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.user_message()).into_response()
        }
    }
}

/// Restore the selected users from the last analyzed archive
pub async fn restore_backup(
    State(state): State<AppState>,
    Json(request): Json<RestoreRequest>,
) -> impl IntoResponse {
    info!("POST /api/backup/restore - request: {:?}", request);

    if request.selected_user_ids.is_empty() {
        return (StatusCode::BAD_REQUEST, "Select at least one user to restore").into_response();
    }

    let mut pending = state.pending_restore.lock().await;
    // Keep the analysis for a later attempt while a backup is being written
    if pending.is_some() && state.backup_service.status().is_running() {
        return already_running();
    }
    let Some(analyzed) = pending.take() else {
        return (StatusCode::CONFLICT, "Analyze a backup before restoring").into_response();
    };
    drop(pending);

    let result = state.backup_service.restore_selected_data(analyzed, request).await;
    state.refresh_catalog().await;

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) if e.is_already_running() => already_running(),
        Err(e) => {
            error!("Failed to restore backup: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_message()).into_response()
        }
    }
}

/// Status of the latest backup operation
pub async fn get_backup_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.backup_service.status()))
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::storage::{DbConnection, EntityStore, ImageStore};
    use crate::{create_router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use shared::{BackupStatus, BackupSummary, RestoreSummary};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn setup_test() -> (TempDir, AppState, Router) {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::for_data_dir(temp_dir.path());
        let db = DbConnection::init_test().await.unwrap();
        let images = ImageStore::new(&config.images_dir).unwrap();
        let state = AppState::new(EntityStore::sqlite(db), images, &config).await.unwrap();
        let router = create_router(state.clone());
        (temp_dir, state, router)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn wait_until_finished(state: &AppState) -> BackupStatus {
        let mut status = state.backup_service.subscribe_status();
        let finished = status
            .wait_for(|s| matches!(s, BackupStatus::Succeeded { .. } | BackupStatus::Failed { .. }))
            .await
            .unwrap();
        finished.clone()
    }

    #[tokio::test]
    async fn test_backup_delete_and_restore_over_http() {
        let (temp_dir, state, router) = setup_test().await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/users",
            json!({"name": "Ana", "gender": "female", "birthday": "1991-02-03"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let user: Value = serde_json::from_slice(&body).unwrap();
        let user_id = user["userId"].as_i64().unwrap();

        let (status, body) = send(&router, Method::POST, "/api/wardrobes", json!({"name": "Hall"})).await;
        assert_eq!(status, StatusCode::CREATED);
        let wardrobe_id = serde_json::from_slice::<Value>(&body).unwrap()["wardrobeId"].as_i64().unwrap();

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/clothes",
            json!({"name": "Coat", "category": "outerwear", "season": "winter",
                   "wardrobe_id": wardrobe_id, "user_id": user_id}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let archive = temp_dir.path().join("exports/backup.zip");
        let (status, _) = send(
            &router,
            Method::POST,
            "/api/backup/create",
            json!({"path": archive.to_string_lossy()}),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(matches!(wait_until_finished(&state).await, BackupStatus::Succeeded { .. }));

        let (status, _) = send(&router, Method::DELETE, &format!("/api/users/{}", user_id), json!({})).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.clothes_service.subscribe().borrow().is_empty());

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/backup/analyze",
            json!({"path": archive.to_string_lossy()}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let summary: BackupSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.users_count, 1);
        assert_eq!(summary.users[0].birthday, "1991-02-03");

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/backup/restore",
            json!({"selected_user_ids": [user_id], "include_clothes": true,
                   "include_shoes": true, "include_wardrobes": false}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let restored: RestoreSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(restored.users_count, 1);
        assert_eq!(restored.clothes_count, 1);
        assert_eq!(restored.active_user_id, Some(user_id));
        assert_eq!(state.clothes_service.subscribe().borrow().len(), 1);

        let (status, body) = send(&router, Method::GET, "/api/users/active", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let active: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(active["active_user"]["name"], "Ana");
    }

    #[tokio::test]
    async fn test_back_to_back_creates_start_one_backup() {
        let (temp_dir, state, router) = setup_test().await;
        let archive = temp_dir.path().join("exports/backup.zip");
        let body = json!({"path": archive.to_string_lossy()});

        let (first, _) = send(&router, Method::POST, "/api/backup/create", body.clone()).await;
        let (second, _) = send(&router, Method::POST, "/api/backup/create", body).await;

        assert_eq!([first, second], [StatusCode::ACCEPTED, StatusCode::CONFLICT]);
        assert!(matches!(wait_until_finished(&state).await, BackupStatus::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_restore_requires_analysis_and_selection() {
        let (_temp_dir, _state, router) = setup_test().await;

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/backup/restore",
            json!({"selected_user_ids": [], "include_clothes": true,
                   "include_shoes": true, "include_wardrobes": true}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &router,
            Method::POST,
            "/api/backup/restore",
            json!({"selected_user_ids": [1], "include_clothes": true,
                   "include_shoes": true, "include_wardrobes": true}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_archive() {
        let (temp_dir, state, router) = setup_test().await;
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "not a backup").unwrap();

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/backup/analyze",
            json!({"path": path.to_string_lossy()}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(String::from_utf8(body).unwrap(), "Invalid backup file");
        assert!(state.pending_restore.lock().await.is_none());

        let (status, body) = send(&router, Method::GET, "/api/backup/status", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let reported: BackupStatus = serde_json::from_slice(&body).unwrap();
        assert_eq!(reported.error_message(), Some("Invalid backup file"));
    }
}
