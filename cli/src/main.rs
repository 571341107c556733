//! Tracking Services console: terminal front end
//!
//! ```sh
//! # Interactive session (default)
//! tracking-console
//!
//! # One-shot commands
//! tracking-console login admin --password 'Secret#123'
//! tracking-console open /tasks
//! tracking-console task add --resource 3 --assignee 7 --description "Check endpoint"
//!
//! # Validate config and exit
//! tracking-console --check
//! ```

mod commands;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use tracking_console::config::CONFIG_PATH_ENV;
use tracking_console::{default_config_path, init_tracing, AppConfig, Console};

use commands::Action;

/// Administrative console for the Tracking Services backend.
#[derive(Parser, Debug)]
#[command(
    name = "tracking-console",
    version,
    about = "Manage companies, users, services, monitoring checks and tasks",
    long_about = "Tracking Services console. Runs an interactive shell when no command \
                  is given.\n\nDefault config: ~/.config/tracking-console/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Override the backend base URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session reading commands from stdin
    Shell,
    #[command(flatten)]
    Action(Action),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(url) = cli.api_url {
        info!("CLI override: api_url = {}", url);
        config.api.base_url = url;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Backend     : {}", config.api.base_url);
        println!(
            "   Token       : {}",
            if config.session.persist {
                config.session.token_file.display().to_string()
            } else {
                "in memory".to_string()
            }
        );
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let console = Console::new(config);
    let mut shell = console.shell();

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run::interactive(&mut shell).await?,
        Command::Action(action) => {
            let ok = run::run(&mut shell, action).await;
            shell.close();
            if !ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
