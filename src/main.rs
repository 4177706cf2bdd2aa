use anyhow::Result;
use stellarsep_site::config::Config;
use stellarsep_site::i18n::{Catalog, CatalogValidator};
use stellarsep_site::server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stellarsep_site=info".parse()?),
        )
        .init();

    info!("Starting StellarSep site");

    // Load configuration from environment
    let config = Config::from_env()?;

    // A broken catalog degrades to fallback strings, so report and continue
    let report = CatalogValidator::validate(Catalog::global());
    for problem in report.errors.iter().chain(report.warnings.iter()) {
        warn!("Translation catalog: {}", problem);
    }

    server::serve(config).await
}
