// catalog-sorter/src/schema.rs

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::validate::Finding;

const ENTITY_SCHEMA: &str = include_str!("../schemas/entity.schema.json");

/// Compiled entity schema; build once per run.
pub struct EntitySchema {
    validator: jsonschema::Validator,
}

impl EntitySchema {
    pub fn new() -> Result<Self> {
        let schema: serde_json::Value = serde_json::from_str(ENTITY_SCHEMA)?;
        let validator = jsonschema::validator_for(&schema).map_err(|e| CatalogError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// One finding per schema violation, in record order.
    pub fn check(&self, catalog: &Catalog) -> Vec<Finding> {
        let mut out = Vec::new();
        for (index, record) in catalog.iter().enumerate() {
            let value = record.clone().into_value();
            for e in self.validator.iter_errors(&value) {
                let message = e.to_string();
                debug!(index, %message, "record does not match entity schema");
                out.push(Finding::Schema { index, message });
            }
        }
        out
    }
}
