// catalog-sorter/src/record.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One catalog entry (item, familiar, relic). Key order is kept as loaded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Result of looking a key up on a [`Record`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field<'a> {
    Present(&'a Value),
    Absent,
}

impl<'a> Field<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Field::Present(v) => v.as_str(),
            Field::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool { matches!(self, Field::Absent) }
}

impl fmt::Display for Field<'_> {
    /// Strings print bare, other values as JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Present(Value::String(s)) => f.write_str(s),
            Field::Present(v) => write!(f, "{v}"),
            Field::Absent => f.write_str("<missing>"),
        }
    }
}

impl Record {
    pub const NAME: &'static str = "name";
    pub const LABEL: &'static str = "label";
    pub const IMAGE: &'static str = "image";
    pub const WIKI_LINK: &'static str = "wikiLink";

    pub fn new(map: Map<String, Value>) -> Self { Self(map) }

    pub fn field(&self, key: &str) -> Field<'_> {
        match self.0.get(key) {
            Some(v) => Field::Present(v),
            None => Field::Absent,
        }
    }

    pub fn name(&self) -> Field<'_> { self.field(Self::NAME) }
    pub fn label(&self) -> Field<'_> { self.field(Self::LABEL) }
    pub fn image(&self) -> Field<'_> { self.field(Self::IMAGE) }

    /// Sets `key`, keeping its position if it already exists. Returns the old value.
    pub fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> { &self.0 }
    pub fn into_value(self) -> Value { Value::Object(self.0) }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}
