//! Session manager: token lifecycle and the signed-in user.
//!
//! One [`SessionManager`] exists per process and is shared by `Arc` with the
//! note store and the screens. Every change to the in-memory token is written
//! through to the [`TokenStore`] so the two only diverge in the sign-in window
//! between persisting a fresh token and fetching its user.

use std::sync::Arc;

use notes_core::{User, is_valid_email};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, Empty};
use crate::token_store::TokenStore;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct UserPayload {
    #[serde(default)]
    user: Option<User>,
}

// ============================================================================
// State
// ============================================================================

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// No usable token.
    Unauthenticated,
    /// A request that may change the session is in flight.
    Validating,
    /// Token and user are both known.
    Authenticated,
}

/// Snapshot of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Session {
    /// A token without a user (failed user fetch after sign-in) counts as
    /// unauthenticated even though note requests can still use the token.
    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Validating
        } else if self.token.is_some() && self.user.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

// ============================================================================
// Manager
// ============================================================================

/// Owns authentication state and talks to the auth endpoints.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: RwLock<Session>,
}

impl SessionManager {
    /// Create a manager in the `Unauthenticated` state.
    ///
    /// Call [`SessionManager::bootstrap`] to pick up a persisted token.
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(Session::default()),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn status(&self) -> AuthStatus {
        self.state.read().await.status()
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }

    async fn clear_state(&self) {
        let mut state = self.state.write().await;
        state.token = None;
        state.user = None;
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Restore the session from the persisted token.
    ///
    /// A token the API rejects is erased. When the API cannot be reached the
    /// token is kept for the next start and the transport error is returned.
    pub async fn bootstrap(&self) -> ClientResult<AuthStatus> {
        self.set_loading(true).await;
        let result = self.restore().await;
        self.set_loading(false).await;
        result
    }

    async fn restore(&self) -> ClientResult<AuthStatus> {
        let Some(token) = self.store.load()? else {
            tracing::debug!("No persisted session token");
            self.clear_state().await;
            return Ok(AuthStatus::Unauthenticated);
        };

        match self.get_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                let mut state = self.state.write().await;
                state.token = Some(token);
                state.user = Some(user);
                Ok(AuthStatus::Authenticated)
            }
            Err(e) if e.is_transport() => {
                tracing::warn!(error = %e, "Could not validate persisted token");
                Err(e)
            }
            Err(e) => {
                tracing::info!(reason = %e, "Persisted token rejected, discarding it");
                self.clear_state().await;
                self.store.erase()?;
                Ok(AuthStatus::Unauthenticated)
            }
        }
    }

    /// Exchange credentials for a token and load the matching user.
    ///
    /// The token is persisted before the user fetch. If that fetch fails for
    /// any reason the token stays persisted and in memory, no user is set, and
    /// the failure is reported as [`ClientError::AuthRejected`].
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<String> {
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::InvalidInput(
                "Please fill in all fields".to_string(),
            ));
        }
        if !is_valid_email(email) {
            return Err(ClientError::InvalidEmail);
        }

        self.set_loading(true).await;
        let result = self.login(email, password).await;
        self.set_loading(false).await;
        result
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let reply = self
            .api
            .post::<_, LoginPayload>(&["login"], &LoginRequest { email, password }, None)
            .await?;

        if !reply.success {
            return Err(ClientError::AuthRejected(reply.message_or("Login failed")));
        }

        let token = reply
            .payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::MalformedResponse("login response has no token".to_string()))?;

        self.store.save(&token)?;
        {
            let mut state = self.state.write().await;
            state.token = Some(token.clone());
            state.user = None;
        }

        let user = self.get_user(&token).await.map_err(|e| {
            tracing::warn!(error = %e, "User fetch after sign-in failed");
            ClientError::AuthRejected(e.user_message())
        })?;

        tracing::info!(user_id = %user.id, "Signed in");
        self.state.write().await.user = Some(user);

        Ok(format!("Successfully logged in with token: {token}"))
    }

    /// Create an account. Field rules are left to the form and the API.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> ClientResult<String> {
        self.set_loading(true).await;
        let result = self
            .api
            .post::<_, Empty>(&["signup"], &SignUpRequest { name, email, password }, None)
            .await;
        self.set_loading(false).await;

        let reply = result?;
        if reply.success {
            tracing::info!("Account created");
            Ok(reply.message_or("Account created"))
        } else {
            Err(ClientError::AuthRejected(reply.message_or("Sign up failed")))
        }
    }

    /// Erase the persisted token, notify the API, and clear the session.
    ///
    /// The API notification is best-effort. In-memory state is cleared even
    /// when erasing the persisted token fails; that failure is returned.
    pub async fn sign_out(&self) -> ClientResult<()> {
        let token = self.token().await;
        let erased = self.store.erase();

        if let Some(token) = token.as_deref() {
            match self
                .api
                .post::<_, Empty>(&["logout"], &Empty {}, Some(token))
                .await
            {
                Ok(reply) if !reply.success => {
                    tracing::warn!(status = reply.status.as_u16(), "Logout not acknowledged by API");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Logout notification failed"),
            }
        }

        self.clear_state().await;
        tracing::info!("Signed out");

        erased.map_err(ClientError::from)
    }

    /// Sign out after the API refused the token. Errors are only logged.
    pub async fn force_sign_out(&self) {
        tracing::warn!("API rejected the session token, signing out");
        if let Err(e) = self.sign_out().await {
            tracing::warn!(error = %e, "Forced sign-out could not erase the persisted token");
        }
    }

    /// Fetch the user a token belongs to.
    pub async fn get_user(&self, token: &str) -> ClientResult<User> {
        if token.is_empty() {
            return Err(ClientError::MissingToken);
        }

        let reply = self
            .api
            .post::<_, UserPayload>(&["user"], &Empty {}, Some(token))
            .await?;

        if !reply.success {
            return Err(ClientError::Rejected(reply.message_or("Failed to fetch user")));
        }

        reply
            .payload
            .user
            .ok_or_else(|| ClientError::MalformedResponse("user response has no user".to_string()))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("api", &self.api.base_url().as_str())
            .finish_non_exhaustive()
    }
}
