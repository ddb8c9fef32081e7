//! LIST command - Show notes, newest first.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::{Note, PREVIEW_CHARS};
use serde::Serialize;

use super::{HumanReadable, format_timestamp, output, require_session};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only show notes whose title or content contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,
}

/// Notes as displayed in the list.
#[derive(Debug, Serialize)]
pub struct ListNotesOutput {
    pub notes: Vec<Note>,
    pub total: usize,
    #[serde(skip)]
    pub search: String,
}

impl HumanReadable for ListNotesOutput {
    fn print_human(&self) {
        println!("{}", "Notes".green().bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.notes.is_empty() {
            if self.search.is_empty() {
                println!("  {}", "(No notes yet, create one with `notes create`)".dimmed());
            } else {
                println!("  {}", format!("(No notes match \"{}\")", self.search).dimmed());
            }
            return;
        }

        for note in &self.notes {
            println!("  {}", note.title.bold());
            println!("    {}", note.preview(PREVIEW_CHARS));
            println!(
                "    {} {}   {} {}",
                "ID:".cyan(),
                note.id,
                "Date:".cyan(),
                format_timestamp(&note.display_timestamp())
            );
            println!();
        }

        println!("  {} {}", "Total:".cyan(), self.total);
    }
}

/// Execute the list command.
pub async fn execute(ctx: &AppContext, human: bool, args: ListArgs) -> Result<()> {
    require_session(ctx).await?;
    ctx.notes().load_notes().await?;

    let notes = ctx.notes().display_notes(&args.search).await;
    let response = ListNotesOutput {
        total: notes.len(),
        notes,
        search: args.search,
    };

    output(&response, human)
}
