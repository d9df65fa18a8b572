//! Call arguments: path fields and the query mapping.

use crate::value::Value;

/// Named path fields in the endpoint's fixed order.
///
/// The list is the endpoint's path shape. A field declared with `None` is
/// part of the shape but absent from this call; it is skipped when the path
/// is built and reported by `Required` rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    fields: Vec<(&'static str, Option<Value>)>,
}

impl PathArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((name, Some(value.into())));
        self
    }

    pub fn optional<V: Into<Value>>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.fields.push((name, value.map(Into::into)));
        self
    }

    /// `None` both for absent values and for fields outside the shape.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| *field == name)
    }

    /// Present values in shape order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().filter_map(|(_, value)| value.as_ref())
    }
}

/// Query options, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

/// Everything a single operation is called with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArguments {
    pub path: PathArgs,
    pub query: Options,
}

impl CallArguments {
    pub fn new(path: PathArgs, query: Options) -> Self {
        Self { path, query }
    }
}
