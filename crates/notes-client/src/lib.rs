//! notes-client: session and note synchronization for the notes API
//!
//! This crate provides:
//! - A shared HTTP client that reads the API's `{success, message}` envelope
//! - Session management: sign-in, sign-up, sign-out and token bootstrap
//! - A note store caching the signed-in user's notes
//! - Persistent storage for the session token
//!
//! # Architecture
//!
//! [`SessionManager`] owns the token and current user. [`NoteStore`] borrows
//! the token for each request and asks the session manager to sign out when
//! the API answers 401. Both share one [`ApiClient`]; [`AppContext`] wires
//! them together.
//!
//! # Usage
//!
//! ```rust,ignore
//! use notes_client::{AppContext, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let ctx = AppContext::from_config(&config)?;
//!
//! ctx.session().bootstrap().await?;
//! ctx.notes().load_notes().await?;
//! for note in ctx.notes().display_notes("").await {
//!     println!("{}", note.title);
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod notes;
pub mod session;
pub mod token_store;

pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, ApiReply};
pub use notes::NoteStore;
pub use session::{AuthStatus, Session, SessionManager};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};

// Re-export dependent crates
pub use notes_core;
