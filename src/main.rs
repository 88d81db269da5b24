//! User API - Application entry point
//!
//! CLI-based entry point that dispatches to the serve and migrate commands.

use clap::Parser;

use user_api::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    utils::logging::{init_tracing, with_bootstrap_logging},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match with_bootstrap_logging(Config::from_env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging, cli.verbose);
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
