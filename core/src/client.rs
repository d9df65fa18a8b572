//! The Flapjack API client.
//!
//! # Design
//! Every public operation runs the same pipeline: validate the arguments
//! against the global defaults plus the endpoint's own rules, resolve the
//! base address, build the request, hand it to the transport and unwrap the
//! response. Validation and address errors stop the call before the
//! transport is touched. Transport errors are returned as they are; nothing
//! is retried.
//!
//! `prepare` exposes the first half of the pipeline on its own, for callers
//! that want to execute requests themselves.
//!
//! Entity, check and contact identifiers go into the path verbatim. Names
//! that are not URI-safe, such as a check called `HTTP Port 80`, must be
//! percent-encoded by the caller (`HTTP%20Port%2080`); otherwise the
//! transport rejects the URI.

use std::sync::Arc;

use serde_json::Value as Json;
use tracing::{debug, info};

use crate::address;
use crate::args::{CallArguments, Options, PathArgs};
use crate::config::Config;
use crate::endpoint::{self, Endpoint};
use crate::error::DinerError;
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::request;
use crate::response::{self, Outcome};
use crate::validation;
use crate::value::Value;

/// Longest response body prefix written to the log.
const LOGGED_BODY_LIMIT: usize = 300;

/// Blocking client for the Flapjack REST API.
#[derive(Debug, Clone)]
pub struct Diner<T = UreqTransport> {
    config: Arc<Config>,
    transport: T,
}

impl Diner<UreqTransport> {
    pub fn new(config: Config) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Diner<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates `args` for `endpoint` and builds the request, without
    /// sending it.
    pub fn prepare(
        &self,
        endpoint: &Endpoint,
        args: &CallArguments,
        payload: Option<&Json>,
    ) -> Result<HttpRequest, DinerError> {
        let endpoint_rules = endpoint.rules();
        let rules = self.config.default_rules().iter().chain(&endpoint_rules);
        if let Err(e) = validation::validate(args, rules) {
            debug!(operation = endpoint.name, error = %e, "arguments rejected");
            return Err(e.into());
        }

        let resolved = address::resolve(self.config.base_address())?;
        Ok(request::build(endpoint, args, &resolved, payload)?)
    }

    /// Runs the full pipeline for `endpoint`.
    pub fn perform(
        &self,
        endpoint: &Endpoint,
        args: &CallArguments,
        payload: Option<&Json>,
    ) -> Result<Outcome, DinerError> {
        let request = self.prepare(endpoint, args, payload)?;

        info!(method = %request.method, uri = %request.uri, "sending request");
        if let Some(body) = &request.body {
            debug!(body = %body, "request body");
        }

        let reply = self.transport.send(&request)?;
        match &reply {
            Some(r) => info!(
                status = r.status,
                body = truncated(&r.body),
                "response code {}",
                r.status
            ),
            None => info!("no response"),
        }

        Ok(response::unwrap(reply.as_ref(), endpoint.mode)?)
    }

    fn read(&self, endpoint: &Endpoint, path: PathArgs, query: Options) -> Result<Option<Json>, DinerError> {
        let outcome = self.perform(endpoint, &CallArguments::new(path, query), None)?;
        Ok(outcome.into_payload())
    }

    fn write(
        &self,
        endpoint: &Endpoint,
        path: PathArgs,
        query: Options,
        payload: Option<&Json>,
    ) -> Result<bool, DinerError> {
        let outcome = self.perform(endpoint, &CallArguments::new(path, query), payload)?;
        Ok(outcome.succeeded())
    }

    pub fn entities(&self) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::ENTITIES, PathArgs::new(), Options::new())
    }

    pub fn checks(&self, entity: &str) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::CHECKS, PathArgs::new().field("entity", entity), Options::new())
    }

    /// `entity` and `check` are used as path segments without encoding.
    pub fn status(&self, entity: &str, check: Option<&str>) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::STATUS, entity_check(entity, check), Options::new())
    }

    /// Acknowledges a failing check. Typical options: `summary`, `duration`.
    pub fn acknowledge(&self, entity: &str, check: &str, options: Options) -> Result<bool, DinerError> {
        self.write(&endpoint::ACKNOWLEDGE, entity_check(entity, Some(check)), options, None)
    }

    pub fn test_notifications(&self, entity: &str, check: &str, options: Options) -> Result<bool, DinerError> {
        self.write(&endpoint::TEST_NOTIFICATIONS, entity_check(entity, Some(check)), options, None)
    }

    /// Requires `start_time` and an integer `duration` in seconds.
    pub fn create_scheduled_maintenance(
        &self,
        entity: &str,
        check: &str,
        options: Options,
    ) -> Result<bool, DinerError> {
        self.write(
            &endpoint::CREATE_SCHEDULED_MAINTENANCE,
            entity_check(entity, Some(check)),
            options,
            None,
        )
    }

    /// Removes the scheduled maintenance starting at `start_time`.
    pub fn delete_scheduled_maintenance(
        &self,
        entity: &str,
        check: &str,
        start_time: impl Into<Value>,
    ) -> Result<bool, DinerError> {
        self.write(
            &endpoint::DELETE_SCHEDULED_MAINTENANCE,
            entity_check(entity, Some(check)),
            Options::new().with("start_time", start_time),
            None,
        )
    }

    pub fn scheduled_maintenances(
        &self,
        entity: &str,
        check: Option<&str>,
        options: Options,
    ) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::SCHEDULED_MAINTENANCES, entity_check(entity, check), options)
    }

    pub fn unscheduled_maintenances(
        &self,
        entity: &str,
        check: Option<&str>,
        options: Options,
    ) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::UNSCHEDULED_MAINTENANCES, entity_check(entity, check), options)
    }

    pub fn outages(&self, entity: &str, check: Option<&str>, options: Options) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::OUTAGES, entity_check(entity, check), options)
    }

    pub fn downtime(&self, entity: &str, check: Option<&str>, options: Options) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::DOWNTIME, entity_check(entity, check), options)
    }

    pub fn contacts(&self) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::CONTACTS, PathArgs::new(), Options::new())
    }

    /// Creates contacts from their JSON representations.
    pub fn create_contacts(&self, contacts: &[Json]) -> Result<bool, DinerError> {
        let payload = serde_json::json!({ "contacts": contacts });
        self.write(&endpoint::CREATE_CONTACTS, PathArgs::new(), Options::new(), Some(&payload))
    }

    pub fn contact_timezone(&self, contact_id: &str) -> Result<Option<Json>, DinerError> {
        self.read(&endpoint::CONTACT_TIMEZONE, contact_path(contact_id), Options::new())
    }

    pub fn contact_set_timezone(&self, contact_id: &str, timezone: &str) -> Result<bool, DinerError> {
        self.write(
            &endpoint::CONTACT_SET_TIMEZONE,
            contact_path(contact_id),
            Options::new().with("timezone", timezone),
            None,
        )
    }
}

fn entity_check(entity: &str, check: Option<&str>) -> PathArgs {
    PathArgs::new().field("entity", entity).optional("check", check)
}

fn contact_path(contact_id: &str) -> PathArgs {
    PathArgs::new().field("contact_id", contact_id)
}

fn truncated(body: &str) -> &str {
    match body.char_indices().nth(LOGGED_BODY_LIMIT) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
