//! DELETE command - Delete one or more notes.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::NoteId;
use serde::Serialize;

use super::{HumanReadable, output, require_session};

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// IDs of the notes to delete
    #[arg(required = true)]
    pub ids: Vec<NoteId>,

    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteNotesOutput {
    pub deleted: Vec<NoteId>,
    pub message: String,
}

impl HumanReadable for DeleteNotesOutput {
    fn print_human(&self) {
        println!("{}", self.message.green().bold());
        println!();
        for id in &self.deleted {
            println!("  - {}", id);
        }
    }
}

/// Execute the delete command.
pub async fn execute(ctx: &AppContext, human: bool, args: DeleteArgs) -> Result<()> {
    // Confirmation prompt for interactive use
    if human && !args.yes {
        let noun = if args.ids.len() > 1 { "notes" } else { "note" };
        eprint!(
            "{} Delete {} {}? [y/N] ",
            "Warning:".yellow().bold(),
            args.ids.len(),
            noun
        );

        use std::io::Write;
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    require_session(ctx).await?;
    let message = ctx.notes().delete_notes(&args.ids).await?;

    let response = DeleteNotesOutput {
        deleted: args.ids,
        message,
    };
    output(&response, human)
}
