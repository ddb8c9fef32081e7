//! notes-core: data model for the notes client
//!
//! This crate provides:
//! - [`Note`], [`NoteId`] and [`User`] in the API's wire format
//! - Display ordering and search filtering of the cached note list
//! - The form validation rules applied before calling the API
//!
//! It performs no I/O; the HTTP side lives in `notes-client`.

pub mod types;
pub mod validation;

pub use types::{Note, NoteId, PREVIEW_CHARS, User, filter_notes, sort_for_display};
pub use validation::{NoteForm, ValidationError, is_valid_email};
