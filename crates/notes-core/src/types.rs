//! Core data types for the notes client.
//!
//! These mirror the JSON documents exchanged with the notes API:
//!
//! - A [`Note`] is owned by the server; the client only holds a cached copy
//! - A [`User`] is the account behind the current session token
//!
//! Field names follow the API's wire format (`_id`, `createdAt`, `updatedAt`)
//! through serde renames so the Rust side keeps snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of content characters shown in a list row before truncation.
pub const PREVIEW_CHARS: usize = 100;

// ============================================================================
// ID Types
// ============================================================================

/// Server-assigned identifier of a note.
///
/// The API hands out opaque string ids; the client never generates or parses
/// them, it only echoes them back in update and delete requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps a server-issued id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// User
// ============================================================================

/// The account the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

// ============================================================================
// Note
// ============================================================================

/// A note as returned by `GET /note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// The timestamp shown next to a note and used for ordering:
    /// whichever of creation and last update is later.
    #[must_use]
    pub fn display_timestamp(&self) -> DateTime<Utc> {
        self.created_at.max(self.updated_at)
    }

    /// Content truncated to `limit` characters.
    ///
    /// Longer content gets a `"... N more"` suffix where `N` counts the
    /// characters cut off.
    #[must_use]
    pub fn preview(&self, limit: usize) -> String {
        let total = self.content.chars().count();
        if total <= limit {
            return self.content.clone();
        }

        let head: String = self.content.chars().take(limit).collect();
        format!("{}... {} more", head, total - limit)
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// An empty query matches every note.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

// ============================================================================
// Display ordering
// ============================================================================

/// Sorts notes newest-first by [`Note::display_timestamp`].
///
/// Ties fall back to id order so repeated renders of the same list agree.
pub fn sort_for_display(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.display_timestamp()
            .cmp(&a.display_timestamp())
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Returns the notes matching `query`, in display order.
#[must_use]
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let mut visible: Vec<Note> = notes.iter().filter(|n| n.matches(query)).cloned().collect();
    sort_for_display(&mut visible);
    visible
}
