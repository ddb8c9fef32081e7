//! SIGN-UP command - Create an account.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::validation;
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the sign-up command.
#[derive(Args)]
pub struct SignUpArgs {
    /// Display name (2-50 characters)
    #[arg(short, long)]
    pub name: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password (6-20 characters)
    #[arg(short, long, env = "NOTES_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Result of a sign-up.
#[derive(Debug, Serialize)]
pub struct SignUpOutput {
    pub created: bool,
    pub message: String,
}

impl HumanReadable for SignUpOutput {
    fn print_human(&self) {
        println!("{}", "Account created!".green().bold());
        println!("  {}", self.message);
        println!();
        println!("  {}", "Sign in with `notes sign-in`".dimmed());
    }
}

/// Execute the sign-up command.
pub async fn execute(ctx: &AppContext, human: bool, args: SignUpArgs) -> Result<()> {
    validation::validate_sign_up(&args.name, &args.email, &args.password)?;

    let message = ctx
        .session()
        .sign_up(&args.name, &args.email, &args.password)
        .await?;

    output(
        &SignUpOutput {
            created: true,
            message,
        },
        human,
    )
}
