//! Argument validation.
//!
//! # Design
//! A `Rule` names a location (path or query), an ordered list of fields and
//! the checks to run on each of them. `validate` runs every rule in order and
//! collects every violation, so a caller sees the whole problem set in one
//! error instead of fixing arguments one at a time. A (location, field,
//! check) pair is reported at most once, even when several rules repeat it.
//!
//! Rules are plain values. The effective rule list for a call is the global
//! defaults followed by the endpoint's own rules; nothing is ever removed.

use std::fmt;

use crate::args::CallArguments;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path => f.write_str("path"),
            Location::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Field must be present and non-empty.
    Required,
    /// Field, when present, must be a point in time.
    TimeRange,
    /// Field, when present, must be a whole number.
    Integer,
}

/// One validation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    location: Location,
    fields: Vec<&'static str>,
    checks: Vec<Check>,
}

impl Rule {
    pub fn path(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new(Location::Path, fields)
    }

    pub fn query(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new(Location::Query, fields)
    }

    fn new(location: Location, fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            location,
            fields: fields.into_iter().collect(),
            checks: Vec::new(),
        }
    }

    pub fn required(self) -> Self {
        self.check(Check::Required)
    }

    pub fn time(self) -> Self {
        self.check(Check::TimeRange)
    }

    pub fn integer(self) -> Self {
        self.check(Check::Integer)
    }

    fn check(mut self, check: Check) -> Self {
        if !self.checks.contains(&check) {
            self.checks.push(check);
        }
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// A single failed (field, check) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub location: Location,
    pub field: String,
    pub check: Check,
    /// Rendered offending value; `None` when the field was missing.
    pub value: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.check, &self.value) {
            (Check::Required, _) => {
                write!(f, "{} field '{}' is required", self.location, self.field)
            }
            (Check::TimeRange, Some(value)) => write!(
                f,
                "{} field '{}' should be a point in time, got '{value}'",
                self.location, self.field
            ),
            (Check::Integer, Some(value)) => write!(
                f,
                "{} field '{}' should be an integer, got '{value}'",
                self.location, self.field
            ),
            (check, None) => write!(f, "{} field '{}' failed {check:?}", self.location, self.field),
        }
    }
}

/// Every violation found while validating one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether `field` failed `check`.
    pub fn has(&self, field: &str, check: Check) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.check == check)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid arguments: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Checks `args` against `rules`, in order.
pub fn validate<'a>(
    args: &CallArguments,
    rules: impl IntoIterator<Item = &'a Rule>,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    for rule in rules {
        for &field in &rule.fields {
            // Path rules only apply to fields that are part of this shape.
            if rule.location == Location::Path && !args.path.declares(field) {
                continue;
            }
            let value = match rule.location {
                Location::Path => args.path.get(field),
                Location::Query => args.query.get(field),
            };
            for &check in &rule.checks {
                let seen = violations.iter().any(|v: &Violation| {
                    v.location == rule.location && v.field == field && v.check == check
                });
                if !seen && !passes(check, value) {
                    violations.push(Violation {
                        location: rule.location,
                        field: field.to_string(),
                        check,
                        value: value.map(Value::format),
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn passes(check: Check, value: Option<&Value>) -> bool {
    match (check, value) {
        (Check::Required, Some(value)) => !value.is_empty(),
        (Check::Required, None) => false,
        (Check::TimeRange, Some(value)) => value.as_timestamp().is_some(),
        (Check::Integer, Some(value)) => value.as_integer().is_some(),
        (Check::TimeRange | Check::Integer, None) => true,
    }
}
