//! Process bootstrap: logging and wiring of store, client, cache and shell.

use std::sync::Arc;

use tracing::info;

use crate::application::ConsoleApi;
use crate::config::{AppConfig, SessionConfig};
use crate::infrastructure::{FileTokenStore, HttpClient, MemoryTokenStore, SharedTokenStore};
use crate::interfaces::console::Shell;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. Output goes to stderr so
/// rendered pages on stdout stay clean.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

pub fn token_store(session: &SessionConfig) -> SharedTokenStore {
    if session.persist {
        Arc::new(FileTokenStore::new(session.token_file.clone()))
    } else {
        Arc::new(MemoryTokenStore::new())
    }
}

/// One console session: configuration plus the shared API handle
pub struct Console {
    config: AppConfig,
    api: ConsoleApi,
}

impl Console {
    pub fn new(config: AppConfig) -> Self {
        let tokens = token_store(&config.session);
        let client = HttpClient::new(config.api.base_url.clone(), tokens);
        info!(
            base_url = %client.base_url(),
            persist_token = config.session.persist,
            "Console initialised"
        );
        Self {
            api: ConsoleApi::from_client(client),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &ConsoleApi {
        &self.api
    }

    /// A navigation shell sharing this console's session and cache
    pub fn shell(&self) -> Shell {
        Shell::new(self.api.clone())
    }
}
