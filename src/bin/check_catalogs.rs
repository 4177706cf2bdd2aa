//! Catalog check binary - validates translation tables against the canonical one
//!
//! Usage:
//!   cargo run --bin catalog-check                   # Check the embedded catalog
//!   cargo run --bin catalog-check -- locales        # Check en.json/ar.json in a directory
//!
//! Exits with a non-zero status when any table is missing keys or uses a
//! different placeholder set than the canonical table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use stellarsep_site::i18n::{Catalog, CatalogValidator, LocaleRegistry};
use tracing::{info, warn};

/// Load `<code>.json` for every registered locale from `dir`.
fn load_directory(dir: &Path) -> Result<Catalog> {
    let mut sources = Vec::new();
    for locale in LocaleRegistry::get().list_all() {
        let path = dir.join(format!("{}.json", locale.code));
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        sources.push((locale.code, text));
    }

    let borrowed: Vec<(&str, &str)> = sources
        .iter()
        .map(|(code, text)| (*code, text.as_str()))
        .collect();
    Catalog::from_sources(&borrowed)
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_check=info".parse()?),
        )
        .init();

    let owned;
    let catalog = match std::env::args().nth(1) {
        Some(dir) => {
            info!("Checking catalog files in {}", dir);
            owned = load_directory(Path::new(&dir))?;
            &owned
        }
        None => {
            info!("Checking embedded catalog");
            Catalog::global()
        }
    };

    for code in catalog.table_codes() {
        info!("[{}] {} keys", code, catalog.keys(code).len());
    }

    let report = CatalogValidator::validate(catalog);
    for warning in &report.warnings {
        warn!("{}", warning);
    }
    for error in &report.errors {
        eprintln!("error: {}", error);
    }

    if report.has_errors() {
        anyhow::bail!("{} catalog error(s) found", report.errors.len());
    }

    info!("Catalog is consistent");
    Ok(())
}
