//! The Flapjack endpoints this client knows how to call.
//!
//! Each operation is described once, as data: the action that forms the first
//! path segment, an optional trailing segment, the HTTP method, how the body
//! is encoded, how the response is read, and any validation rules beyond the
//! global defaults.

use crate::http::HttpMethod;
use crate::response::Mode;
use crate::validation::Rule;

/// How the request body is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// No body; the query mapping goes into the URI.
    None,
    /// The encoded query mapping is sent as a form body.
    Form,
    /// A JSON body: an explicit payload, or else the query mapping as an
    /// object of strings.
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub name: &'static str,
    pub action: &'static str,
    /// Segment appended after the path fields, e.g. `timezone`.
    pub suffix: Option<&'static str>,
    pub method: HttpMethod,
    pub body: BodyKind,
    pub mode: Mode,
    rules: fn() -> Vec<Rule>,
}

impl Endpoint {
    const fn read(name: &'static str, action: &'static str) -> Self {
        Self {
            name,
            action,
            suffix: None,
            method: HttpMethod::Get,
            body: BodyKind::None,
            mode: Mode::Read,
            rules: Vec::new,
        }
    }

    const fn write(name: &'static str, action: &'static str, method: HttpMethod, body: BodyKind) -> Self {
        Self {
            name,
            action,
            suffix: None,
            method,
            body,
            mode: Mode::Write,
            rules: Vec::new,
        }
    }

    const fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    const fn with_rules(mut self, rules: fn() -> Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Rules layered on top of the global defaults for this endpoint.
    pub fn rules(&self) -> Vec<Rule> {
        (self.rules)()
    }
}

pub const ENTITIES: Endpoint = Endpoint::read("entities", "entities");
pub const CHECKS: Endpoint = Endpoint::read("checks", "checks");
pub const STATUS: Endpoint = Endpoint::read("status", "status");

pub const ACKNOWLEDGE: Endpoint =
    Endpoint::write("acknowledge", "acknowledgements", HttpMethod::Post, BodyKind::Form);
pub const TEST_NOTIFICATIONS: Endpoint =
    Endpoint::write("test_notifications", "test_notifications", HttpMethod::Post, BodyKind::Form);

pub const CREATE_SCHEDULED_MAINTENANCE: Endpoint = Endpoint::write(
    "create_scheduled_maintenance",
    "scheduled_maintenances",
    HttpMethod::Post,
    BodyKind::Form,
)
.with_rules(|| {
    vec![
        Rule::path(["entity", "check"]).required(),
        Rule::query(["start_time"]).required(),
        Rule::query(["duration"]).required().integer(),
    ]
});

pub const DELETE_SCHEDULED_MAINTENANCE: Endpoint = Endpoint::write(
    "delete_scheduled_maintenance",
    "scheduled_maintenances",
    HttpMethod::Delete,
    BodyKind::None,
)
.with_rules(|| {
    vec![
        Rule::path(["entity", "check"]).required(),
        Rule::query(["start_time"]).required(),
    ]
});

pub const SCHEDULED_MAINTENANCES: Endpoint =
    Endpoint::read("scheduled_maintenances", "scheduled_maintenances");
pub const UNSCHEDULED_MAINTENANCES: Endpoint =
    Endpoint::read("unscheduled_maintenances", "unscheduled_maintenances");
pub const OUTAGES: Endpoint = Endpoint::read("outages", "outages");
pub const DOWNTIME: Endpoint = Endpoint::read("downtime", "downtime");

pub const CONTACTS: Endpoint = Endpoint::read("contacts", "contacts");
pub const CREATE_CONTACTS: Endpoint =
    Endpoint::write("create_contacts", "contacts", HttpMethod::Post, BodyKind::Json);

pub const CONTACT_TIMEZONE: Endpoint = Endpoint::read("contact_timezone", "contacts")
    .with_suffix("timezone")
    .with_rules(|| vec![Rule::path(["contact_id"]).required()]);

pub const CONTACT_SET_TIMEZONE: Endpoint =
    Endpoint::write("contact_set_timezone", "contacts", HttpMethod::Put, BodyKind::Json)
        .with_suffix("timezone")
        .with_rules(|| {
            vec![
                Rule::path(["contact_id"]).required(),
                Rule::query(["timezone"]).required(),
            ]
        });

/// Global rules installed by `Config::new`.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::path(["entity"]).required(),
        Rule::query(["start_time", "end_time"]).time(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Check, Location};

    #[test]
    fn read_endpoints_use_get_without_body() {
        for endpoint in [ENTITIES, CHECKS, STATUS, OUTAGES, DOWNTIME, CONTACTS, CONTACT_TIMEZONE] {
            assert_eq!(endpoint.method, HttpMethod::Get, "{}", endpoint.name);
            assert_eq!(endpoint.body, BodyKind::None, "{}", endpoint.name);
            assert_eq!(endpoint.mode, Mode::Read, "{}", endpoint.name);
        }
    }

    #[test]
    fn scheduled_maintenance_requires_integer_duration() {
        let rules = CREATE_SCHEDULED_MAINTENANCE.rules();
        let duration = rules
            .iter()
            .find(|r| r.location() == Location::Query && r.fields() == ["duration"])
            .unwrap();
        assert_eq!(duration.checks(), &[Check::Required, Check::Integer]);
    }

    #[test]
    fn timezone_endpoints_share_the_contacts_shape() {
        assert_eq!(CONTACT_TIMEZONE.action, "contacts");
        assert_eq!(CONTACT_SET_TIMEZONE.suffix, Some("timezone"));
        assert_eq!(CONTACT_SET_TIMEZONE.method, HttpMethod::Put);
    }
}
