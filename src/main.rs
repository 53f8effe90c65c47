mod chart;
mod cli;
mod client;
mod collection;
mod commands;
mod config;
mod error;
mod feed;
mod output;
mod resources;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, HookCommands};
use client::JulythonClient;
use config::Config;
use error::Result;
use types::GroupKind;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

/// Logs go to stderr so tables and JSON on stdout stay clean
fn init_tracing(verbose: bool) {
    let default = if verbose { "julython=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Set global output format
    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "julython", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let client = JulythonClient::from_config(&config);

            match command {
                Commands::Commits(args) => {
                    commands::commits::list(&client, &config, args).await?;
                }
                Commands::Boards { limit } => {
                    commands::boards::list(&client, &config, limit).await?;
                }
                Commands::Repos { all } => {
                    commands::repos::list(&client, all).await?;
                }
                Commands::Hooks { action } => match action {
                    HookCommands::List { repo } => {
                        commands::hooks::list(&client, &repo).await?;
                    }
                    HookCommands::Add { repo } => {
                        commands::hooks::add(&client, &repo).await?;
                    }
                    HookCommands::Test { repo, hook_id } => {
                        commands::hooks::test(&client, &repo, hook_id).await?;
                    }
                },
                Commands::Badges { user } => {
                    commands::badges::list(&client, &user).await?;
                }
                Commands::Locations(args) => {
                    commands::groups::list(&client, &config, GroupKind::Location, args).await?;
                }
                Commands::Teams(args) => {
                    commands::groups::list(&client, &config, GroupKind::Team, args).await?;
                }
                Commands::Profile(args) => {
                    commands::profile::show(&client, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
