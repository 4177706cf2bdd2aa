//! HTTP client for the record store.
//!
//! The store exposes two read-only collections (`/software`, `/startups`)
//! and a lead sink (`/leads`). No retries: a failure surfaces once and the
//! caller decides what to show.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::leads::LeadRequest;
use crate::listings::{ListingKind, ListingRecord};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.backend_url, config.backend_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full collection for `kind`.
    ///
    /// Items that are not JSON objects are skipped with a warning. Missing
    /// or oddly typed optional fields never fail the load.
    pub async fn load_records(
        &self,
        kind: ListingKind,
    ) -> std::result::Result<Vec<ListingRecord>, BackendError> {
        let endpoint = kind.endpoint();
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Loading {} records from {}", kind.as_str(), url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let items: Vec<Value> = response.json().await.map_err(|e| BackendError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let total = items.len();
        let records: Vec<ListingRecord> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match ListingRecord::from_value(kind, item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping {} record #{}: {}", kind.as_str(), index, e);
                    None
                }
            })
            .collect();

        debug!("Loaded {}/{} {} records", records.len(), total, kind.as_str());
        Ok(records)
    }

    /// Append one lead to the store.
    pub async fn submit_lead(&self, lead: &LeadRequest) -> std::result::Result<(), BackendError> {
        let endpoint = "/leads";
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .json(lead)
            .send()
            .await
            .map_err(|source| BackendError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        Ok(())
    }
}
