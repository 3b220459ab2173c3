pub mod chat;
pub mod config;
pub mod console;
pub mod models;
pub mod safety;
pub mod state;

// Re-export the module entry point
pub use state::HmpiModule;

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::HmpiConfig;
use crate::models::error::Result;

/// Initialize logging to stderr, honouring `RUST_LOG`
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hmpi=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Console entry point; the first argument optionally names a config file
pub async fn run() -> Result<()> {
    init_logging();

    tracing::info!("Starting HMPI console");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = HmpiConfig::load(config_path.as_deref())?;
    let module = HmpiModule::new(config)?;

    console::run_console(module).await
}
