// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! The network-transport collaborator contract.

use thiserror::Error;

/// The contract a network transport must satisfy.
///
/// A transport fetches the raw transfer-format record for a key; converting
/// that record into the domain model is the adapter's job, not the
/// transport's. The reachability probe must be cheap and free of side
/// effects; strategies consult it before every fetch.
pub trait Transport<K>: Send + Sync {
    /// The raw transfer-format record produced by the endpoint.
    type Record: Send;

    /// Fetches the raw record for the key.
    fn fetch(&self, key: &K) -> impl Future<Output = Result<Self::Record, TransportError>> + Send;

    /// Reports whether the endpoint is currently reachable.
    fn is_reachable(&self) -> impl Future<Output = bool> + Send;
}

/// A transport-level failure, prior to classification into the shared
/// taxonomy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The endpoint could not be reached at all.
    #[error("could not reach the remote endpoint")]
    Connect(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transport's own deadline elapsed before a response arrived.
    #[error("request deadline elapsed")]
    TimedOut,

    /// The endpoint responded with a failure status.
    #[error("remote endpoint returned status {status}")]
    Status {
        /// The protocol status code.
        status: u16,
    },
}

impl TransportError {
    /// Creates a [`TransportError::Connect`] wrapping the connection failure.
    pub fn connect(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Connect(source.into())
    }
}
