//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. The request builder produces an
//! `HttpRequest` without touching the network; a `Transport` executes it and
//! hands back an `HttpResponse`. `UreqTransport` is the bundled blocking
//! implementation, but any closure with the right signature works too, so a
//! host that owns its own HTTP stack can keep doing the I/O itself.

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared HTTP request.
///
/// Built by `Diner::prepare`. Nothing in it needs further interpretation: the
/// URI already carries scheme, host, port, path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Executes prepared requests.
///
/// `Ok(None)` means the transport completed without producing a response;
/// read operations treat that as "no data", write operations as failure.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<Option<HttpResponse>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<Option<HttpResponse>, TransportError>,
{
    fn send(&self, request: &HttpRequest) -> Result<Option<HttpResponse>, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured so 4xx/5xx statuses come back as data rather than
/// `Err`; interpreting status codes is the response unwrapper's job.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<Option<HttpResponse>, TransportError> {
        let uri = request.uri.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(uri);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (HttpMethod::Delete, _) => {
                let mut builder = self.agent.delete(uri);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            (method, body) => {
                let mut builder = match method {
                    HttpMethod::Put => self.agent.put(uri),
                    _ => self.agent.post(uri),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = match response.body_mut().read_to_string() {
            Ok(body) => body,
            Err(e) => {
                warn!(status, error = %e, "failed to read response body");
                return Err(TransportError::Request(e.to_string()));
            }
        };

        Ok(Some(HttpResponse {
            status,
            headers,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn closures_act_as_transports() {
        let transport = |req: &HttpRequest| -> Result<Option<HttpResponse>, TransportError> {
            Ok(Some(HttpResponse::new(200, req.uri.clone())))
        };
        let req = HttpRequest {
            method: HttpMethod::Get,
            uri: "http://localhost/entities".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let resp = transport.send(&req).unwrap().unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "http://localhost/entities");
    }
}
