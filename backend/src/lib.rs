//! # Wardrobe Tracker Backend
//!
//! Non-UI logic of the wardrobe tracker: catalog of users, wardrobes,
//! clothing items and shoes, plus portable backup archives with selective
//! restore.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, DTO mappers)
//!     ↓
//! Domain Layer (services, session, backup subsystem)
//!     ↓
//! Storage Layer (SQLite repositories, image directories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{
    AnalyzedBackup, BackupService, ClothesService, SessionContext, ShoesService, UserService,
    WardrobeService,
};
use crate::storage::{DbConnection, EntityStore, ImageStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub wardrobe_service: WardrobeService,
    pub clothes_service: ClothesService,
    pub shoes_service: ShoesService,
    pub backup_service: BackupService,
    pub session: SessionContext,
    /// Archive analyzed by the last `/backup/analyze`, waiting for a restore selection
    pub pending_restore: Arc<Mutex<Option<AnalyzedBackup>>>,
}

impl AppState {
    pub async fn new(store: EntityStore, images: ImageStore, config: &AppConfig) -> Result<Self> {
        let session = SessionContext::load(store.users.as_ref()).await?;

        let state = Self {
            user_service: UserService::new(&store, session.clone()),
            wardrobe_service: WardrobeService::new(&store),
            clothes_service: ClothesService::new(store.clone()),
            shoes_service: ShoesService::new(store.clone()),
            backup_service: BackupService::new(
                store,
                images,
                config.staging_dir.clone(),
                session.clone(),
            ),
            session,
            pending_restore: Arc::new(Mutex::new(None)),
        };
        state.refresh_catalog().await;
        Ok(state)
    }

    /// Republish the item lists after changes the item services did not make
    /// themselves (cascading deletes, restores)
    pub async fn refresh_catalog(&self) {
        if let Err(e) = self.clothes_service.refresh().await {
            warn!("Failed to refresh clothing items: {:#}", e);
        }
        if let Err(e) = self.shoes_service.refresh().await {
            warn!("Failed to refresh shoes: {:#}", e);
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    config.ensure_directories()?;

    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up image storage at {:?}", config.images_dir);
    let images = ImageStore::new(&config.images_dir)?;

    info!("Setting up application state");
    AppState::new(EntityStore::sqlite(db), images, config).await
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/users", get(io::list_users).post(io::create_user))
        .route("/users/active", get(io::get_active_user))
        .route(
            "/users/:id",
            get(io::get_user).put(io::update_user).delete(io::delete_user),
        )
        .route("/users/:id/activate", post(io::activate_user))
        .route("/wardrobes", get(io::list_wardrobes).post(io::create_wardrobe))
        .route(
            "/wardrobes/:id",
            get(io::get_wardrobe).put(io::update_wardrobe).delete(io::delete_wardrobe),
        )
        .route("/clothes", get(io::list_clothes).post(io::create_clothes))
        .route("/clothes/search", post(io::search_clothes))
        .route(
            "/clothes/:id",
            get(io::get_clothes).put(io::update_clothes).delete(io::delete_clothes),
        )
        .route("/shoes", get(io::list_shoes).post(io::create_shoes))
        .route("/shoes/search", post(io::search_shoes))
        .route(
            "/shoes/:id",
            get(io::get_shoes).put(io::update_shoes).delete(io::delete_shoes),
        )
        .route("/backup/create", post(io::create_backup))
        .route("/backup/analyze", post(io::analyze_backup))
        .route("/backup/restore", post(io::restore_backup))
        .route("/backup/status", get(io::get_backup_status));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
