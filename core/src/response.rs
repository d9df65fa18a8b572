//! Turning transport responses into results.
//!
//! Read operations return whatever JSON the service sent, and "nothing" when
//! it sent nothing. Write operations only report whether the status code is
//! one of [`SUCCESS_STATUS_CODES`]; a failing status is a `false`, not an
//! error.

use serde_json::Value as Json;

use crate::error::TransportError;
use crate::http::HttpResponse;

pub const SUCCESS_STATUS_CODES: [u16; 2] = [200, 204];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Decoded body of a read operation; `None` when there was no body.
    Payload(Option<Json>),
    /// Whether a write operation succeeded.
    Success(bool),
}

impl Outcome {
    pub fn into_payload(self) -> Option<Json> {
        match self {
            Outcome::Payload(payload) => payload,
            Outcome::Success(_) => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        match self {
            Outcome::Success(ok) => *ok,
            Outcome::Payload(_) => true,
        }
    }
}

pub fn unwrap(response: Option<&HttpResponse>, mode: Mode) -> Result<Outcome, TransportError> {
    match mode {
        Mode::Read => {
            let Some(body) = response.map(|r| r.body.trim()).filter(|b| !b.is_empty()) else {
                return Ok(Outcome::Payload(None));
            };
            serde_json::from_str(body)
                .map(|json| Outcome::Payload(Some(json)))
                .map_err(|e| TransportError::MalformedBody(e.to_string()))
        }
        Mode::Write => Ok(Outcome::Success(
            response.is_some_and(|r| SUCCESS_STATUS_CODES.contains(&r.status)),
        )),
    }
}
