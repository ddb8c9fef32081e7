//! PROFILE command - Show the signed-in account.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::User;
use serde::Serialize;

use super::{HumanReadable, output, require_session};

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {}

#[derive(Debug, Serialize)]
pub struct ProfileOutput {
    pub user: User,
}

impl HumanReadable for ProfileOutput {
    fn print_human(&self) {
        println!("{}", "Profile".green().bold());
        println!("{}", "=".repeat(40));
        println!("  {} {}", "Name:".cyan(), self.user.name);
        println!("  {} {}", "Email:".cyan(), self.user.email);
        println!("  {} {}", "ID:".cyan(), self.user.id);
    }
}

/// Execute the profile command.
pub async fn execute(ctx: &AppContext, human: bool, _args: ProfileArgs) -> Result<()> {
    let user = require_session(ctx).await?;
    output(&ProfileOutput { user }, human)
}
