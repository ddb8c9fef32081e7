//! Command implementations for the notes CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod profile;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

use anyhow::{Context, Result, anyhow};
use notes_client::notes_core::User;
use notes_client::{AppContext, AuthStatus};
use serde::Serialize;

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Restore the persisted session, failing if nobody is signed in.
pub async fn require_session(ctx: &AppContext) -> Result<User> {
    let status = ctx.session().bootstrap().await?;
    if status != AuthStatus::Authenticated {
        return Err(anyhow!("not signed in, run `notes sign-in` first"));
    }
    ctx.session()
        .current_user()
        .await
        .ok_or_else(|| anyhow!("not signed in, run `notes sign-in` first"))
}

/// Resolve a content argument: `-` reads stdin, `@path` reads a file.
pub fn resolve_content(raw: String) -> Result<String> {
    if raw == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = raw.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("reading {path}"))
    } else {
        Ok(raw)
    }
}

/// Format a timestamp the way note rows show it, e.g. `05 Mar 2024 14:30`.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%d %b %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "05 Mar 2024 14:30");
    }

    #[test]
    fn plain_content_passes_through() {
        assert_eq!(resolve_content("hello".to_string()).unwrap(), "hello");
    }

    #[test]
    fn content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.txt");
        std::fs::write(&path, "from file").unwrap();

        let resolved = resolve_content(format!("@{}", path.display())).unwrap();
        assert_eq!(resolved, "from file");
    }
}
