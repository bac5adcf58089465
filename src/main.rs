//! Buildsage — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (TOML + env overrides)
//!   3. Init logger at configured level
//!   4. Wire the Azure client and analyzer
//!   5. Serve HTTP until ctrl-c

use tracing::{info, warn};

use buildsage::agent::{Analyzer, LogSource};
use buildsage::azure::client::AzureDevOpsClient;
use buildsage::error::AppError;
use buildsage::llm::ProviderKind;
use buildsage::server::{self, AppState};
use buildsage::{config, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.server.log_level)?;

    let default_provider = ProviderKind::parse(&config.llm.default_provider)
        .map_err(|e| AppError::Config(format!("[llm] default: {e}")))?;

    info!(
        bind = %config.server.bind,
        default_provider = default_provider.name(),
        "config loaded"
    );

    if config.azure_pat.is_none() {
        warn!("AZURE_DEVOPS_PAT is not set; log retrieval will fail with an auth error");
    }
    let pat = config.azure_pat.as_deref().unwrap_or_default();
    let azure = AzureDevOpsClient::new(
        pat,
        config.azure.api_version.as_str(),
        config.azure.timeout_seconds,
    )?;

    let analyzer = Analyzer::new(
        LogSource::Azure(azure),
        config.llm.clone(),
        config.keys.clone(),
        default_provider,
    );

    server::run(&config.server.bind, AppState { analyzer }).await
}
