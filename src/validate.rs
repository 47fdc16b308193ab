// catalog-sorter/src/validate.rs

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::catalog::Catalog;
use crate::record::{Field, Record};

pub const DEFAULT_ACCEPTED_DOMAIN: &str = "https://i.imgur.com";

/// How an `image` URL is matched against the accepted list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// URL must start with an accepted entry.
    #[default]
    Prefix,
    /// URL must contain an accepted entry anywhere.
    Contains,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPolicy {
    pub mode: MatchMode,
    pub accepted: Vec<String>,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self { mode: MatchMode::Prefix, accepted: vec![DEFAULT_ACCEPTED_DOMAIN.to_string()] }
    }
}

impl DomainPolicy {
    pub fn new(mode: MatchMode, accepted: Vec<String>) -> Self { Self { mode, accepted } }

    /// An empty accepted list disables the check.
    pub fn is_enabled(&self) -> bool { !self.accepted.is_empty() }

    pub fn accepts(&self, image: &str) -> bool {
        match self.mode {
            MatchMode::Prefix => self.accepted.iter().any(|d| image.starts_with(d.as_str())),
            MatchMode::Contains => self.accepted.iter().any(|d| image.contains(d.as_str())),
        }
    }
}

/// A non-fatal anomaly. Reported, never corrected.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    DuplicateLabel { index: usize, record: Value },
    InvalidDomain { index: usize, line: String },
    Schema { index: usize, message: String },
}

impl Finding {
    pub fn index(&self) -> usize {
        match self {
            Finding::DuplicateLabel { index, .. }
            | Finding::InvalidDomain { index, .. }
            | Finding::Schema { index, .. } => *index,
        }
    }
}

/// Label equality for collisions: objects ignore key order and numbers
/// compare by value, so `1` meets `1.0` while `"1"` and `1` stay apart.
fn same_label(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => same_number(x, y),
        (Value::Array(x), Value::Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(a, b)| same_label(a, b)),
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| same_label(v, w)))
        }
        _ => a == b,
    }
}

fn same_number(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    let fractional = |n: &Number| n.to_string().contains(['.', 'e', 'E']);
    if !fractional(x) && !fractional(y) {
        // integers past 64 bits compare by their digits
        return x == y;
    }
    x.as_f64().zip(y.as_f64()).is_some_and(|(a, b)| a == b)
}

/// Later records whose label equals an earlier one. Absent labels all collide.
fn duplicates(catalog: &Catalog) -> impl Iterator<Item = (usize, &Record)> {
    let mut strings = HashSet::new();
    let mut others: Vec<&Value> = Vec::new();
    let mut absent_seen = false;
    catalog.iter().enumerate().filter(move |&(_, r)| match r.label() {
        Field::Present(Value::String(s)) => !strings.insert(s.as_str()),
        Field::Present(v) => {
            if others.iter().any(|o| same_label(o, v)) {
                true
            } else {
                others.push(v);
                false
            }
        }
        Field::Absent => std::mem::replace(&mut absent_seen, true),
    })
}

/// Records whose label was already used by an earlier record, in order.
/// The first holder of a label is never reported.
pub fn find_duplicate_labels(catalog: &Catalog) -> Vec<&Record> {
    duplicates(catalog).map(|(_, r)| r).collect()
}

fn domain_line(record: &Record) -> String {
    let label = match record.label() {
        Field::Absent => "<missing label>".to_string(),
        f => f.to_string(),
    };
    let image = match record.image() {
        Field::Absent => "<missing image>".to_string(),
        f => f.to_string(),
    };
    format!("{label} - {image}")
}

fn invalid_domains(catalog: &Catalog, policy: &DomainPolicy) -> Vec<(usize, String)> {
    if !policy.is_enabled() {
        return Vec::new();
    }
    catalog
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.image().as_str().is_some_and(|img| policy.accepts(img)))
        .map(|(i, r)| (i, domain_line(r)))
        .collect()
}

/// `"<label> - <image>"` for every record whose image the policy rejects.
/// A missing or non-string `image` counts as rejected.
pub fn find_invalid_domains(catalog: &Catalog, policy: &DomainPolicy) -> Vec<String> {
    invalid_domains(catalog, policy).into_iter().map(|(_, line)| line).collect()
}

/// Runs both detectors and logs each hit.
pub fn validate(catalog: &Catalog, policy: &DomainPolicy) -> Vec<Finding> {
    let mut out = Vec::new();
    for (index, record) in duplicates(catalog) {
        debug!(index, label = %record.label(), "duplicate label");
        out.push(Finding::DuplicateLabel { index, record: record.clone().into_value() });
    }
    for (index, line) in invalid_domains(catalog, policy) {
        debug!(index, %line, "image outside accepted domains");
        out.push(Finding::InvalidDomain { index, line });
    }
    out
}
