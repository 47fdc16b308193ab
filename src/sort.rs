// catalog-sorter/src/sort.rs

use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::record::{Field, Record};

/// Sort key of one record; every record needs a string `name`.
fn name_key(index: usize, record: &Record) -> Result<&str> {
    match record.name() {
        Field::Present(Value::String(s)) => Ok(s.as_str()),
        Field::Present(other) => Err(CatalogError::InvalidField {
            index,
            field: Record::NAME,
            found: json_kind(other).to_string(),
        }),
        Field::Absent => Err(CatalogError::MissingField { index, field: Record::NAME }),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fails on the first record without a usable name, before anything moves.
pub fn check_names(catalog: &Catalog) -> Result<()> {
    for (i, r) in catalog.iter().enumerate() {
        name_key(i, r)?;
    }
    Ok(())
}

/// Stable ascending sort by `name` (code-point order, case-sensitive).
pub fn sort_by_name(catalog: Catalog) -> Result<Catalog> {
    check_names(&catalog)?;
    let mut keyed: Vec<(String, Record)> = catalog
        .into_records()
        .into_iter()
        .map(|r| (r.name().as_str().unwrap_or_default().to_owned(), r))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Catalog::from_records(keyed.into_iter().map(|(_, r)| r).collect()))
}

/// True when names are already non-decreasing.
pub fn is_sorted_by_name(catalog: &Catalog) -> Result<bool> {
    let mut prev: Option<&str> = None;
    for (i, r) in catalog.iter().enumerate() {
        let name = name_key(i, r)?;
        if prev.is_some_and(|p| p > name) {
            return Ok(false);
        }
        prev = Some(name);
    }
    Ok(true)
}
