//! Blocking client for the Flapjack monitoring API.
//!
//! # Overview
//! Each operation validates its arguments, assembles a request (path, query
//! string, URI, body), sends it through a [`Transport`] and unwraps the
//! response: read operations return the decoded JSON, write operations a
//! success flag.
//!
//! # Design
//! - Validation, address resolution and request building are pure; only the
//!   transport does I/O. [`Diner::prepare`] stops before the transport, for
//!   hosts that run requests themselves.
//! - Endpoints are data ([`endpoint`]), so every operation goes through one
//!   pipeline.
//! - [`Config`] is immutable and shared, so concurrent calls see the same
//!   base address and default rules.
//!
//! ```no_run
//! use flapjack_diner::{Config, Diner, Options};
//!
//! let diner = Diner::new(Config::new("http://localhost:3081"));
//! let status = diner.status("web01", Some("PING"))?;
//! let acked = diner.acknowledge("web01", "PING", Options::new().with("summary", "on it"))?;
//! # Ok::<(), flapjack_diner::DinerError>(())
//! ```

pub mod address;
pub mod args;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod validation;
pub mod value;

pub use address::{AddressError, ResolvedAddress};
pub use args::{CallArguments, Options, PathArgs};
pub use client::Diner;
pub use config::Config;
pub use endpoint::Endpoint;
pub use error::{DinerError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use response::{Mode, Outcome, SUCCESS_STATUS_CODES};
pub use validation::{Check, Location, Rule, ValidationError, Violation};
pub use value::Value;
