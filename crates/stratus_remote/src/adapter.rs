// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Adapts a network transport into the remote tier contract.

use std::time::Duration;

use tick::{Clock, FutureExt as _};

use stratus_tier::{Error, RemoteTier, Result};

use crate::transport::{Transport, TransportError};

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A remote tier backed by a [`Transport`] collaborator.
///
/// The adapter owns the three concerns the transport does not:
///
/// - a per-request timeout, enforced here so the orchestrator never needs a
///   second timeout layer
/// - classification of transport failures into the shared taxonomy
/// - mapping the raw transfer record into the domain model via [`TryFrom`];
///   a failed conversion classifies as [`Error::InvalidData`]
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use stratus_remote::RemoteStore;
/// use tick::Clock;
///
/// # fn build<T>(transport: T, clock: Clock) -> RemoteStore<T> {
/// RemoteStore::new(transport, clock).timeout(Duration::from_secs(5))
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RemoteStore<T> {
    transport: T,
    clock: Clock,
    timeout: Duration,
}

impl<T> RemoteStore<T> {
    /// Creates a remote tier over the given transport with the default
    /// request timeout.
    pub fn new(transport: T, clock: Clock) -> Self {
        Self {
            transport,
            clock,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a reference to the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Classifies a transport failure into the shared taxonomy.
///
/// A 404 means the endpoint answered and has no record: that is the
/// orchestrator's `NotFound`, not a service failure. Timeouts classify with
/// connectivity loss: in both cases the transport failed to complete, and
/// callers should treat them alike.
fn classify(error: TransportError) -> Error {
    match error {
        TransportError::Connect(source) => Error::network_error(source),
        TransportError::TimedOut => Error::network_unavailable(),
        TransportError::Status { status: 404 } => Error::NotFound,
        TransportError::Status { status } => Error::service_unavailable(status),
    }
}

impl<K, V, T> RemoteTier<K, V> for RemoteStore<T>
where
    K: Send + Sync,
    T: Transport<K>,
    V: TryFrom<T::Record> + Send + Sync,
    <V as TryFrom<T::Record>>::Error: std::error::Error + Send + Sync + 'static,
{
    async fn fetch(&self, key: &K) -> Result<V> {
        let record = match self.transport.fetch(key).timeout(&self.clock, self.timeout).await {
            // The adapter's deadline elapsed before the transport answered.
            Err(_elapsed) => return Err(classify(TransportError::TimedOut)),
            Ok(outcome) => outcome.map_err(classify)?,
        };

        V::try_from(record).map_err(Error::invalid_data)
    }

    async fn is_available(&self) -> bool {
        self.transport.is_reachable().await
    }
}
