//! Base-address parsing.
//!
//! The configured base address may be a bare host, `host:port`, or carry an
//! `http://` / `https://` scheme. Anything after the optional port (a path,
//! a trailing slash) is ignored.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static BASE_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(https?)://)?([a-z0-9][a-z0-9.\-]*[a-z0-9])(?::(\d+))?")
        .expect("base address pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("no host found in base address '{0}'")]
    MissingHost(String),

    #[error("invalid port '{port}' in base address '{address}'")]
    InvalidPort { address: String, port: String },
}

/// Scheme, host and port the requests of one call go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl ResolvedAddress {
    pub fn default_port(scheme: &str) -> u16 {
        if scheme == "https" {
            443
        } else {
            80
        }
    }
}

/// Renders `scheme://host`, plus `:port` when it differs from the scheme's
/// default.
impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if self.port != Self::default_port(&self.scheme) {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}

pub fn resolve(base_address: &str) -> Result<ResolvedAddress, AddressError> {
    let captures = BASE_ADDRESS
        .captures(base_address.trim())
        .ok_or_else(|| AddressError::MissingHost(base_address.to_string()))?;

    let scheme = captures
        .get(1)
        .map_or_else(|| "http".to_string(), |m| m.as_str().to_ascii_lowercase());
    let host = captures[2].to_string();
    let port = match captures.get(3) {
        Some(m) => m.as_str().parse().map_err(|_| AddressError::InvalidPort {
            address: base_address.to_string(),
            port: m.as_str().to_string(),
        })?,
        None => ResolvedAddress::default_port(&scheme),
    };

    Ok(ResolvedAddress { scheme, host, port })
}
