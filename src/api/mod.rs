mod handlers;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::settings::Settings;
use crate::trello::{TrelloClient, DEFAULT_BASE_URL};
use crate::upload::{Pacing, UploadMonitor, UploadSlot};
use crate::workspace::Workspace;

/// Shared state of the studio server.
///
/// The workspace is the single interactive context; handlers lock it only
/// for synchronous work and never across an await.
#[derive(Clone)]
pub struct AppState {
    workspace: Arc<Mutex<Workspace>>,
    settings: Settings,
    uploads: UploadSlot,
    monitor: UploadMonitor,
    trello_base_url: String,
    pacing: Pacing,
}

impl AppState {
    pub fn new(workspace: Workspace, settings: Settings) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            settings,
            uploads: UploadSlot::new(),
            monitor: UploadMonitor::new(),
            trello_base_url: DEFAULT_BASE_URL.to_string(),
            pacing: Pacing::default(),
        }
    }

    /// Point remote calls at another Trello-compatible endpoint.
    pub fn with_trello_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.trello_base_url = base_url.into();
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn monitor(&self) -> &UploadMonitor {
        &self.monitor
    }

    pub fn uploads(&self) -> &UploadSlot {
        &self.uploads
    }

    fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock().expect("workspace lock poisoned")
    }

    /// Client carrying the credentials currently stored in settings.
    fn trello_client(&self) -> TrelloClient {
        TrelloClient::with_base_url(&self.trello_base_url, self.settings.credentials())
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Documents
        .route("/documents/load", post(handlers::load_document))
        .route("/documents/save", post(handlers::save_document))
        .route("/documents/current", get(handlers::current_document))
        // Nodes
        .route("/nodes", get(handlers::list_nodes))
        .route("/nodes/{id}/position", put(handlers::move_node))
        // Canvas
        .route("/canvas", get(handlers::get_canvas))
        .route("/canvas/events", post(handlers::dispatch_event))
        .route("/canvas/sensitivity", put(handlers::set_sensitivity))
        // Uploads
        .route("/uploads", post(handlers::start_upload))
        .route("/uploads/status", get(handlers::upload_status))
        // Credentials
        .route("/credentials/verify", get(handlers::verify_credentials))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
