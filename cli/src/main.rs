//! Command-line interface for the notes service.
//!
//! This CLI tool provides commands for every screen of the notes app:
//! - sign-in / sign-up / sign-out: Manage the session
//! - profile: Show the signed-in account
//! - list: Show notes, newest first, optionally filtered
//! - create: Create a new note
//! - edit: Update an existing note
//! - delete: Delete one or more notes
//!
//! Configuration via environment:
//! - NOTES_API_URL: Base URL of the notes API
//! - NOTES_TOKEN_PATH: Where the session token is persisted
//! - NOTES_LOG_LEVEL: Log level for stderr diagnostics (default: warn)

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notes_client::{AppContext, ClientConfig, ClientError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{
    create::CreateArgs, delete::DeleteArgs, edit::EditArgs, list::ListArgs,
    profile::ProfileArgs, sign_in::SignInArgs, sign_out::SignOutArgs, sign_up::SignUpArgs,
};

/// Notes CLI
///
/// Sign in once, then list, create, edit and delete notes. Output is JSON
/// unless --human is given.
#[derive(Parser)]
#[command(name = "notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Notes API base URL
    #[arg(long, env = "NOTES_API_URL", global = true)]
    url: Option<String>,

    /// File holding the session token
    #[arg(long, env = "NOTES_TOKEN_PATH", global = true)]
    token_file: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(long, env = "NOTES_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    SignIn(SignInArgs),

    /// Create an account
    SignUp(SignUpArgs),

    /// Sign out and forget the session token
    SignOut(SignOutArgs),

    /// Show the signed-in account
    Profile(ProfileArgs),

    /// List notes, newest first
    List(ListArgs),

    /// Create a new note
    Create(CreateArgs),

    /// Edit an existing note
    Edit(EditArgs),

    /// Delete one or more notes
    Delete(DeleteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    let config = match ClientConfig::from_lookup(|name| match name {
        "NOTES_API_URL" => cli.url.clone(),
        "NOTES_TOKEN_PATH" => cli.token_file.as_ref().map(|p| p.display().to_string()),
        "NOTES_LOG_LEVEL" => Some(cli.log_level.clone()),
        other => std::env::var(other).ok(),
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "Configuration loaded");

    let ctx = match AppContext::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::SignIn(args) => commands::sign_in::execute(&ctx, cli.human, args).await,
        Commands::SignUp(args) => commands::sign_up::execute(&ctx, cli.human, args).await,
        Commands::SignOut(args) => commands::sign_out::execute(&ctx, cli.human, args).await,
        Commands::Profile(args) => commands::profile::execute(&ctx, cli.human, args).await,
        Commands::List(args) => commands::list::execute(&ctx, cli.human, args).await,
        Commands::Create(args) => commands::create::execute(&ctx, cli.human, args).await,
        Commands::Edit(args) => commands::edit::execute(&ctx, cli.human, args).await,
        Commands::Delete(args) => commands::delete::execute(&ctx, cli.human, args).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        let message = match e.downcast_ref::<ClientError>() {
            Some(client_error) => client_error.user_message(),
            None => e.to_string(),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber on stderr so stdout stays parseable.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
