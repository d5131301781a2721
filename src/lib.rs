// BioGuard - TLS diagnostic service for patient/disease genetic matching
// Global clippy configuration

#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::suspicious)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]

// Allow some pedantic lints that don't add value
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

pub mod bio;
pub mod body;
pub mod config;
pub mod controller;
pub mod integrity;
pub mod model;
pub mod router;
pub mod service;
pub mod store;
pub mod transport;

use thiserror::Error;

/// Flat tagged-variant error taxonomy. Every fallible operation in the
/// pipeline surfaces one of these; controllers map each variant to the
/// `[TCP][<code>][<category>]` response prefix in `controller`.
#[derive(Error, Debug)]
pub enum BioGuardError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl BioGuardError {
    /// HTTP-flavored status code used in the `[TCP][<code>][...]` response prefix.
    pub fn status_code(&self) -> u16 {
        match self {
            BioGuardError::MalformedRequest(_) => 400,
            BioGuardError::InvalidFormat(_) => 400,
            BioGuardError::Validation(_) => 400,
            BioGuardError::NotFound(_) => 404,
            BioGuardError::RouteNotFound(_) => 404,
            BioGuardError::Conflict(_) => 409,
            BioGuardError::CorruptedData(_) => 500,
            BioGuardError::Persistence(_) => 500,
            BioGuardError::Unexpected(_) => 500,
        }
    }

    /// Category token used in the `[TCP][<code>][<category>]` response prefix.
    pub fn category(&self) -> &'static str {
        match self {
            BioGuardError::MalformedRequest(_) => "MalformedRequest",
            BioGuardError::InvalidFormat(_) => "InvalidFormat",
            BioGuardError::Validation(_) => "ValidationError",
            BioGuardError::NotFound(_) => "NotFound",
            BioGuardError::RouteNotFound(_) => "RouteNotFound",
            BioGuardError::Conflict(_) => "Conflict",
            BioGuardError::CorruptedData(_) | BioGuardError::Persistence(_) => "InternalError",
            BioGuardError::Unexpected(_) => "InternalError",
        }
    }

    /// The message surfaced to the client. `CorruptedData` and `Persistence`
    /// never leak their detail over the wire (spec.md §7); everything else
    /// surfaces its own message.
    pub fn to_client_message(&self) -> String {
        match self {
            BioGuardError::CorruptedData(_) | BioGuardError::Persistence(_) => {
                "Error interno del servidor".to_string()
            }
            BioGuardError::Unexpected(_) => "Error interno del servidor".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for BioGuardError {
    fn from(e: std::io::Error) -> Self {
        BioGuardError::Persistence(e.to_string())
    }
}

impl From<csv::Error> for BioGuardError {
    fn from(e: csv::Error) -> Self {
        BioGuardError::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BioGuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let e = BioGuardError::Conflict("duplicate".into());
        assert_eq!(e.status_code(), 409);
        assert_eq!(e.category(), "Conflict");
    }

    #[test]
    fn corrupted_data_never_leaks_detail() {
        let e = BioGuardError::CorruptedData("file /etc/shadow truncated".into());
        assert_eq!(e.to_client_message(), "Error interno del servidor");
        assert!(!e.to_client_message().contains("shadow"));
    }

    #[test]
    fn persistence_never_leaks_detail() {
        let e = BioGuardError::Persistence("disk full at /var/data".into());
        assert_eq!(e.to_client_message(), "Error interno del servidor");
    }
}
