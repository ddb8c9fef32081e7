//! SIGN-OUT command - End the current session.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_client::AppContext;
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the sign-out command.
#[derive(Args)]
pub struct SignOutArgs {}

#[derive(Debug, Serialize)]
pub struct SignOutOutput {
    pub signed_out: bool,
}

impl HumanReadable for SignOutOutput {
    fn print_human(&self) {
        println!("{}", "Signed out.".green().bold());
    }
}

/// Execute the sign-out command.
pub async fn execute(ctx: &AppContext, human: bool, _args: SignOutArgs) -> Result<()> {
    // Load the token so the API can be told about the sign-out. Without a
    // reachable API the local token is still erased.
    if let Err(e) = ctx.session().bootstrap().await {
        tracing::warn!(error = %e, "Could not restore session before signing out");
    }

    ctx.session().sign_out().await?;

    output(&SignOutOutput { signed_out: true }, human)
}
