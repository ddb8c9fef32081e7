//! EDIT command - Update an existing note.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::validation::{self, NoteForm};
use notes_client::notes_core::{Note, NoteId};
use serde::Serialize;

use super::{HumanReadable, format_timestamp, output, require_session, resolve_content};

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// ID of the note to edit
    pub id: NoteId,

    /// New title (defaults to the current one)
    #[arg(short, long)]
    pub title: Option<String>,

    /// New content (use @filename to read from file, or - for stdin; defaults to the current one)
    #[arg(short, long)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditNoteOutput {
    pub note: Note,
}

impl HumanReadable for EditNoteOutput {
    fn print_human(&self) {
        println!("{}", "Note updated!".green().bold());
        println!();
        println!("  {} {}", "ID:".cyan(), self.note.id);
        println!("  {} {}", "Title:".cyan(), self.note.title);
        println!(
            "  {} {}",
            "Last saved:".cyan(),
            format_timestamp(&self.note.display_timestamp())
        );
        println!();
        println!("{}", self.note.content);
    }
}

/// Execute the edit command.
pub async fn execute(ctx: &AppContext, human: bool, args: EditArgs) -> Result<()> {
    require_session(ctx).await?;
    ctx.notes().load_notes().await?;

    let current = ctx
        .notes()
        .find(&args.id)
        .await
        .ok_or_else(|| anyhow!("Note not found"))?;

    let title = args.title.unwrap_or(current.title);
    let content = match args.content {
        Some(raw) => resolve_content(raw)?,
        None => current.content,
    };
    validation::validate_note(&title, &content, NoteForm::Edit)?;

    ctx.notes().update_note(&args.id, &title, &content).await?;

    let note = ctx
        .notes()
        .find(&args.id)
        .await
        .ok_or_else(|| anyhow!("Note not found"))?;
    output(&EditNoteOutput { note }, human)
}
