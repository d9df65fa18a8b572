//! Client configuration.
//!
//! A `Config` is built once, before the first call, and is immutable after
//! that. `Diner` holds it behind an `Arc`, so clones of a client and calls
//! from several threads all see the same base address and default rules.

use std::time::Duration;

use crate::endpoint::default_rules;
use crate::error::DinerError;
use crate::validation::Rule;

/// Environment variable read by [`Config::from_env`].
pub const BASE_URI_ENV: &str = "FLAPJACK_DINER_BASE_URI";

#[derive(Debug, Clone)]
pub struct Config {
    base_address: String,
    default_rules: Vec<Rule>,
    timeout: Option<Duration>,
}

impl Config {
    /// Configuration for `base_address` with the global default rules.
    ///
    /// The address is parsed on every call, so a malformed one shows up as
    /// `DinerError::Address` from the operations rather than here.
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            default_rules: default_rules(),
            timeout: None,
        }
    }

    pub fn from_env() -> Result<Self, DinerError> {
        std::env::var(BASE_URI_ENV)
            .map(Self::new)
            .map_err(|e| DinerError::Config(format!("{BASE_URI_ENV}: {e}")))
    }

    /// Appends a rule checked on every call, after the built-in defaults.
    pub fn with_default_rule(mut self, rule: Rule) -> Self {
        self.default_rules.push(rule);
        self
    }

    /// Global timeout for the bundled `UreqTransport`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    pub fn default_rules(&self) -> &[Rule] {
        &self.default_rules
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
