//! Property existence lookup.
//!
//! The property service owns property records; this module is the narrow
//! read-only seam the core uses to validate a property id at rental
//! creation. Nothing else about a property is ever read here.

use std::time::Duration;
use thiserror::Error;

use crate::config::PropertiesConfig;

/// Error contacting the property service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("property service unreachable: {0}")]
    Unreachable(String),
}

/// Read-only property existence check.
///
/// `AllowAll` is used when no property service is configured (stand-alone
/// deployments and tests); every id is then accepted.
pub enum PropertyDirectory {
    Http {
        base_url: String,
        client: reqwest::Client,
    },
    AllowAll,
}

impl PropertyDirectory {
    pub fn from_config(config: &PropertiesConfig) -> Self {
        match &config.base_url {
            Some(base_url) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.request_timeout_secs))
                    .build()
                    .unwrap_or_default();
                tracing::info!(base_url = %base_url, "Property lookups enabled");
                PropertyDirectory::Http {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    client,
                }
            }
            None => {
                tracing::info!("No property service configured, accepting all property ids");
                PropertyDirectory::AllowAll
            }
        }
    }

    /// Whether a property with this id exists.
    pub async fn exists(&self, property_id: u64) -> Result<bool, DirectoryError> {
        match self {
            PropertyDirectory::AllowAll => Ok(true),
            PropertyDirectory::Http { base_url, client } => {
                let url = format!("{}/api/properties/{}", base_url, property_id);
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;
                let status = response.status();
                if status.is_success() {
                    Ok(true)
                } else if status == reqwest::StatusCode::NOT_FOUND {
                    Ok(false)
                } else {
                    Err(DirectoryError::Unreachable(format!(
                        "unexpected status {} from {}",
                        status, url
                    )))
                }
            }
        }
    }
}
