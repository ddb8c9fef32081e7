//! Note store: the cached note list and its CRUD operations.
//!
//! The in-memory list is a cache of server state. Create and delete are
//! followed by a full reload instead of a local patch; update patches the
//! matching entry in place and leaves its timestamps alone until the next
//! reload.
//!
//! Every operation needs the session token. A 401 from the API signs the
//! session out before the error is returned.

use std::sync::Arc;

use notes_core::{Note, NoteId, filter_notes};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, ApiReply, Empty};
use crate::session::SessionManager;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct NoteRequest<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct NotesPayload {
    #[serde(default)]
    notes: Option<Vec<Note>>,
}

#[derive(Debug, Default)]
struct NoteState {
    notes: Vec<Note>,
    is_loading: bool,
    is_updating: bool,
}

// ============================================================================
// Store
// ============================================================================

/// Owns the cached note list for the signed-in user.
pub struct NoteStore {
    api: ApiClient,
    session: Arc<SessionManager>,
    state: RwLock<NoteState>,
}

impl NoteStore {
    pub fn new(api: ApiClient, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            state: RwLock::new(NoteState::default()),
        }
    }

    /// The session this store reads its token from.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The cached list, in server order.
    pub async fn notes(&self) -> Vec<Note> {
        self.state.read().await.notes.clone()
    }

    /// Notes matching `query`, newest first.
    pub async fn display_notes(&self, query: &str) -> Vec<Note> {
        filter_notes(&self.state.read().await.notes, query)
    }

    pub async fn find(&self, id: &NoteId) -> Option<Note> {
        self.state
            .read()
            .await
            .notes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn is_updating(&self) -> bool {
        self.state.read().await.is_updating
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Replace the cached list with the server's.
    ///
    /// On failure the cached list is left as it was.
    pub async fn load_notes(&self) -> ClientResult<()> {
        let token = self.require_token().await?;

        self.state.write().await.is_loading = true;
        let result = self.fetch_notes(&token).await;
        self.state.write().await.is_loading = false;
        result
    }

    async fn fetch_notes(&self, token: &str) -> ClientResult<()> {
        let reply = self
            .api
            .get::<NotesPayload>(&["note"], Some(token))
            .await?;
        self.ensure_authorized(&reply).await?;

        if !reply.success {
            return Err(ClientError::Rejected(reply.message_or("Failed to load notes")));
        }

        let notes = reply.payload.notes.unwrap_or_default();
        tracing::debug!(count = notes.len(), "Notes loaded");
        self.state.write().await.notes = notes;
        Ok(())
    }

    /// Create a note, then reload the list.
    pub async fn new_note(&self, title: &str, content: &str) -> ClientResult<()> {
        let token = self.require_token().await?;

        let reply = self
            .api
            .post::<_, Empty>(&["note"], &NoteRequest { title, content }, Some(&token))
            .await?;
        self.ensure_authorized(&reply).await?;

        if !reply.success {
            return Err(ClientError::Rejected(reply.message_or("Failed to create note")));
        }

        tracing::info!("Note created");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Delete one or more notes in a single request, then reload the list.
    ///
    /// Returns the confirmation message to show.
    pub async fn delete_notes(&self, ids: &[NoteId]) -> ClientResult<String> {
        if ids.is_empty() {
            return Err(ClientError::InvalidInput("No notes selected".to_string()));
        }
        let token = self.require_token().await?;

        let joined = ids.iter().map(NoteId::as_str).collect::<Vec<_>>().join(",");
        let reply = self
            .api
            .delete::<Empty>(&["note", joined.as_str()], Some(&token))
            .await?;
        self.ensure_authorized(&reply).await?;

        if !reply.success {
            return Err(ClientError::Rejected(reply.message_or("Failed to delete note")));
        }

        tracing::info!(count = ids.len(), "Notes deleted");
        self.refresh_after_mutation().await;

        let message = if ids.len() > 1 {
            "Notes deleted"
        } else {
            "Note deleted"
        };
        Ok(message.to_string())
    }

    /// Update a note and patch the cached copy's title and content.
    ///
    /// `is_updating` is set for the duration of the call.
    pub async fn update_note(&self, id: &NoteId, title: &str, content: &str) -> ClientResult<()> {
        let token = self.require_token().await?;

        self.state.write().await.is_updating = true;
        let result = self.put_note(&token, id, title, content).await;
        self.state.write().await.is_updating = false;
        result
    }

    async fn put_note(&self, token: &str, id: &NoteId, title: &str, content: &str) -> ClientResult<()> {
        let reply = self
            .api
            .put::<_, Empty>(&["note", id.as_str()], &NoteRequest { title, content }, Some(token))
            .await?;
        self.ensure_authorized(&reply).await?;

        if !reply.success {
            return Err(ClientError::Rejected(reply.message_or("Failed to update note")));
        }

        let mut state = self.state.write().await;
        if let Some(note) = state.notes.iter_mut().find(|n| &n.id == id) {
            note.title = title.to_string();
            note.content = content.to_string();
        }
        tracing::info!(note_id = %id, "Note updated");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    async fn require_token(&self) -> ClientResult<String> {
        self.session.token().await.ok_or(ClientError::NoSession)
    }

    async fn ensure_authorized<T>(&self, reply: &ApiReply<T>) -> ClientResult<()> {
        if reply.is_unauthorized() {
            self.session.force_sign_out().await;
            return Err(ClientError::Unauthorized);
        }
        Ok(())
    }

    /// The mutation already succeeded; a failed reload only leaves the cache stale.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.load_notes().await {
            tracing::warn!(error = %e, "Reload after mutation failed");
        }
    }
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
