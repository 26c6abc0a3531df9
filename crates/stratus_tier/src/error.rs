// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The closed failure taxonomy shared by every tier.

use recoverable::{Recovery, RecoveryInfo};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Any failure that a tier, or the orchestration over the tiers, can surface
/// to a caller.
///
/// The set is deliberately closed and small so that callers can branch on
/// the cause of a failure. Use [`recoverable::Recovery`] to distinguish
/// retryable conditions from permanent ones without matching variants.
///
/// Cache expiration is *not* part of this taxonomy: an expired entry is
/// evicted by the cache tier and observed by callers as a plain miss.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Every consulted tier was exhausted without producing a value.
    #[error("no value found for the requested key")]
    NotFound,

    /// A tier returned content that could not be decoded into the model.
    #[error("tier returned malformed or undecodable content")]
    InvalidData(#[source] BoxError),

    /// The remote tier's pre-flight check failed, the transport could not
    /// connect, or the request deadline elapsed.
    #[error("remote tier is unreachable")]
    NetworkUnavailable {
        /// The underlying transport failure, when one was observed.
        #[source]
        source: Option<BoxError>,
    },

    /// The remote tier was reachable but reported a server-side failure.
    #[error("remote service reported a server-side failure")]
    ServiceUnavailable {
        /// The protocol status code reported by the remote endpoint, if any.
        status: Option<u16>,
    },

    /// The persistence tier failed with an I/O error.
    #[error("persistence tier I/O failure")]
    Storage(#[source] BoxError),

    /// The operation requires a remote tier but none was configured.
    #[error("no remote tier is configured")]
    NotConfigured,
}

impl Error {
    /// Creates an [`Error::InvalidData`] wrapping the decode failure.
    pub fn invalid_data(source: impl Into<BoxError>) -> Self {
        Self::InvalidData(source.into())
    }

    /// Creates an [`Error::NetworkUnavailable`] with no underlying cause,
    /// as produced by a failed pre-flight check.
    #[must_use]
    pub fn network_unavailable() -> Self {
        Self::NetworkUnavailable { source: None }
    }

    /// Creates an [`Error::NetworkUnavailable`] wrapping a transport failure.
    pub fn network_error(source: impl Into<BoxError>) -> Self {
        Self::NetworkUnavailable {
            source: Some(source.into()),
        }
    }

    /// Creates an [`Error::ServiceUnavailable`] with the given status code.
    #[must_use]
    pub fn service_unavailable(status: u16) -> Self {
        Self::ServiceUnavailable {
            status: Some(status),
        }
    }

    /// Creates an [`Error::Storage`] wrapping the persistence failure.
    pub fn storage(source: impl Into<BoxError>) -> Self {
        Self::Storage(source.into())
    }
}

/// Persistence collaborators fail with I/O errors; fold them into the
/// taxonomy so tier adapters can use `?`.
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(Box::new(error))
    }
}

impl Recovery for Error {
    fn recovery(&self) -> RecoveryInfo {
        match self {
            Self::Storage(_) | Self::ServiceUnavailable { .. } => RecoveryInfo::retry(),
            Self::NetworkUnavailable { .. } => RecoveryInfo::unavailable(),
            Self::NotFound | Self::InvalidData(_) | Self::NotConfigured => RecoveryInfo::never(),
        }
    }
}

/// A specialized [`Result`] type for tier operations.
pub type Result<T> = std::result::Result<T, Error>;
