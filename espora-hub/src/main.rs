//! Espora Hub entry point.

use espora_hub::commands::{self, Command};
use espora_hub::config::HubConfig;
use espora_hub::error::HubError;
use espora_hub::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), HubError> {
    let invocation = commands::parse_args(std::env::args().skip(1))?;
    let config = HubConfig::load(invocation.config_path)?;
    init_tracing(&config.log)?;
    tracing::debug!(store = %config.store_path.display(), "Configuration loaded");

    let mut out = std::io::stdout();
    match invocation.command {
        Command::Watch => commands::watch(&config, &mut out).await,
        command => commands::execute(&command, &config, &mut out),
    }
}
