#![forbid(unsafe_code)]

//! Error taxonomy for channel resolution and shorts discovery.

use thiserror::Error;

use crate::candidate::VideoCandidate;

/// Failures surfaced by the catalog client and the services behind it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The reference could not be mapped to any channel identifier.
    #[error("no channel found for {0:?}")]
    NotFound(String),

    /// The catalog service rejected or failed a request. Auth, quota, bad
    /// queries and 5xx responses all land here; callers decide on retries.
    #[error("catalog request to {endpoint} failed{}: {message}", .status.map(|code| format!(" with status {code}")).unwrap_or_default())]
    Upstream {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("invalid cutoff date {0:?}, expected YYYY-MM-DD")]
    InvalidCutoff(String),
}

impl CatalogError {
    pub fn not_found<S: Into<String>>(reference: S) -> Self {
        CatalogError::NotFound(reference.into())
    }

    pub fn upstream<E, M>(endpoint: E, status: Option<u16>, message: M) -> Self
    where
        E: Into<String>,
        M: Into<String>,
    {
        CatalogError::Upstream {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// A discovery run that stopped on a failed page.
///
/// Pages fetched before the failure are not rolled back: `collected` holds
/// every candidate gathered so far, in catalog order.
#[derive(Debug, Error)]
#[error("shorts discovery stopped after {} candidate(s): {source}", .collected.len())]
pub struct DiscoveryInterrupted {
    pub collected: Vec<VideoCandidate>,
    #[source]
    pub source: CatalogError,
}

impl DiscoveryInterrupted {
    pub fn into_parts(self) -> (Vec<VideoCandidate>, CatalogError) {
        (self.collected, self.source)
    }
}
