//! CREATE command - Create a new note.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::validation::{self, NoteForm};
use serde::Serialize;

use super::{HumanReadable, output, require_session, resolve_content};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Title (letters, digits and spaces only)
    #[arg(short, long)]
    pub title: String,

    /// Content of the note (use @filename to read from file, or - for stdin)
    #[arg(short, long)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CreateNoteOutput {
    pub created: bool,
    pub message: String,
    pub total_notes: usize,
}

impl HumanReadable for CreateNoteOutput {
    fn print_human(&self) {
        println!("{}", self.message.green().bold());
        println!("  {} {}", "Notes:".cyan(), self.total_notes);
    }
}

/// Execute the create command.
pub async fn execute(ctx: &AppContext, human: bool, args: CreateArgs) -> Result<()> {
    let content = resolve_content(args.content)?;
    validation::validate_note(&args.title, &content, NoteForm::Create)?;

    require_session(ctx).await?;
    ctx.notes().new_note(&args.title, &content).await?;

    let response = CreateNoteOutput {
        created: true,
        message: "Note created successfully".to_string(),
        total_notes: ctx.notes().notes().await.len(),
    };
    output(&response, human)
}
