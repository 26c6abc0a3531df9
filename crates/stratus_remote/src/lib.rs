// Copyright (c) The Stratus Project Authors.
// Licensed under the MIT License.

//! Remote tier adapter for the stratus multi-tier repository.
//!
//! The network itself is an external collaborator reached through the
//! [`Transport`] trait, which returns a raw transfer record. [`RemoteStore`]
//! adapts a transport into a [`stratus_tier::RemoteTier`]: it enforces a
//! per-request timeout, classifies transport failures into the shared error
//! taxonomy, and maps the transfer record to the model via [`TryFrom`].

mod adapter;
mod transport;

#[doc(inline)]
pub use adapter::{DEFAULT_TIMEOUT, RemoteStore};
#[doc(inline)]
pub use transport::{Transport, TransportError};
