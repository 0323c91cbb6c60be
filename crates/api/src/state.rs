use std::sync::Arc;

use tokio::sync::RwLock;

use huma_assistant::ChatModel;
use huma_core::contact::ContactChannel;
use huma_db::{ObjectStorage, ProjectStore, ProjectTable};

use crate::config::ServerConfig;
use crate::forms::FormController;
use crate::map_layer::MapLayer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Current project list.
    pub store: Arc<ProjectStore>,
    /// Marker layer re-rendered on every store change.
    pub map: Arc<RwLock<MapLayer>>,
    /// Drafts, staged media and submission.
    pub forms: Arc<FormController>,
    /// `None` when no API key is configured.
    pub assistant: Option<Arc<dyn ChatModel>>,
    pub contact: ContactChannel,
}

impl AppState {
    /// Wire the state from its collaborators.
    pub fn new(
        config: ServerConfig,
        table: Arc<dyn ProjectTable>,
        storage: Arc<dyn ObjectStorage>,
        assistant: Option<Arc<dyn ChatModel>>,
    ) -> Self {
        let store = Arc::new(ProjectStore::new(Arc::clone(&table)));
        let forms = Arc::new(FormController::new(
            table,
            storage,
            Arc::clone(&store),
            assistant.clone(),
        ));
        let contact = ContactChannel::new(&config.contact_phone);

        Self {
            config: Arc::new(config),
            store,
            map: Arc::new(RwLock::new(MapLayer::new())),
            forms,
            assistant,
            contact,
        }
    }
}
