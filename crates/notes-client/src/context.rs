//! Application context shared by every screen.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::notes::NoteStore;
use crate::session::SessionManager;
use crate::token_store::{FileTokenStore, TokenStore};

/// The session manager and note store, wired to one API client.
///
/// Cloning is cheap; every clone refers to the same session and cache.
#[derive(Clone)]
pub struct AppContext {
    /// Authentication state.
    session: Arc<SessionManager>,
    /// Cached notes of the signed-in user.
    notes: Arc<NoteStore>,
}

impl AppContext {
    /// Wire a context around an existing client and token store.
    pub fn new(api: ApiClient, token_store: Arc<dyn TokenStore>) -> Self {
        let session = Arc::new(SessionManager::new(api.clone(), token_store));
        let notes = Arc::new(NoteStore::new(api, Arc::clone(&session)));
        Self { session, notes }
    }

    /// Build a context that persists its token in the configured file.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let api = ApiClient::from_config(config)?;
        let token_store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_path));
        Ok(Self::new(api, token_store))
    }

    /// Get a reference to the session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Get a reference to the note store.
    pub fn notes(&self) -> &Arc<NoteStore> {
        &self.notes
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
