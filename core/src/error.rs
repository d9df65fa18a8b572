//! Error types for the Flapjack API client.
//!
//! # Design
//! Validation and address problems are caught before anything reaches the
//! network. Transport errors come from the HTTP collaborator and are passed
//! through untouched, so callers can tell "the service said no" (a `false`
//! from a write operation) from "the request never completed".
//!
//! A non-success status on a write operation is not an error at all.

use thiserror::Error;

use crate::address::AddressError;
use crate::validation::ValidationError;

/// Errors returned by `Diner` operations.
#[derive(Debug, Error)]
pub enum DinerError {
    /// Call arguments failed one or more validation rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configured base address could not be parsed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The HTTP collaborator failed, or returned a body that is not JSON.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A JSON request body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures raised by a `Transport` or while decoding its response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, timeout, unreadable body and the like.
    #[error("transport error: {0}")]
    Request(String),

    /// The response body is not valid JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}
