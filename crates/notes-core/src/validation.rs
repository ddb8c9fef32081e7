//! Field validation applied by the screens before anything reaches the API.
//!
//! The server does not enforce these rules; they exist so obviously bad input
//! is rejected locally with a message the user can act on.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 ]*$").expect("valid title regex"));

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MIN_CHARS: usize = 3;
pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 20;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Form field the message refers to.
    pub field: &'static str,
    /// Message shown to the user.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Which note form is being submitted. The edit form is stricter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteForm {
    Create,
    Edit,
}

/// Whether `email` has the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates the title and content of a note form.
pub fn validate_note(title: &str, content: &str, form: NoteForm) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    if !TITLE_RE.is_match(title) {
        return Err(ValidationError::new(
            "title",
            "Title can only contain letters and numbers",
        ));
    }
    if content.is_empty() {
        return Err(ValidationError::new("content", "Content is required"));
    }

    if form == NoteForm::Edit {
        let title_len = title.chars().count();
        if title_len < TITLE_MIN_CHARS {
            return Err(ValidationError::new("title", "Title is too short"));
        }
        if title_len > TITLE_MAX_CHARS {
            return Err(ValidationError::new("title", "Title is too long"));
        }
        if content.chars().count() < CONTENT_MIN_CHARS {
            return Err(ValidationError::new("content", "Content is too short"));
        }
    }

    Ok(())
}

/// Validates the sign-in form.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email_field(email)?;
    validate_password(password)
}

/// Validates the sign-up form.
pub fn validate_sign_up(name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    let name_len = name.chars().count();
    if name_len == 0 {
        return Err(ValidationError::new("name", "Name is required"));
    }
    if name_len < NAME_MIN_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("Name must be at least {NAME_MIN_CHARS} characters"),
        ));
    }
    if name_len > NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("Name cannot exceed {NAME_MAX_CHARS} characters"),
        ));
    }
    validate_email_field(email)?;
    validate_password(password)
}

fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::new("email", "Email is not valid"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(ValidationError::new("password", "Password is required"));
    }
    if len < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters"),
        ));
    }
    if len > PASSWORD_MAX_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("Password cannot exceed {PASSWORD_MAX_CHARS} characters"),
        ));
    }
    Ok(())
}
