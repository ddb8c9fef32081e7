//! SIGN-IN command - Exchange credentials for a session token.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use notes_client::notes_core::{User, validation};
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the sign-in command.
#[derive(Args)]
pub struct SignInArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "NOTES_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Result of a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInOutput {
    pub signed_in: bool,
    pub user: Option<User>,
}

impl HumanReadable for SignInOutput {
    fn print_human(&self) {
        println!("{}", "Signed in!".green().bold());
        if let Some(user) = &self.user {
            println!();
            println!("  {} {}", "Name:".cyan(), user.name);
            println!("  {} {}", "Email:".cyan(), user.email);
        }
    }
}

/// Execute the sign-in command.
pub async fn execute(ctx: &AppContext, human: bool, args: SignInArgs) -> Result<()> {
    validation::validate_sign_in(&args.email, &args.password)?;

    ctx.session().sign_in(&args.email, &args.password).await?;

    let response = SignInOutput {
        signed_in: true,
        user: ctx.session().current_user().await,
    };
    output(&response, human)
}
