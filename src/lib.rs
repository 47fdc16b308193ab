pub mod error;
pub mod record;
pub mod catalog;
pub mod sort;
pub mod validate;
pub mod schema;
pub mod links;
pub mod discover;
pub mod config;
pub mod transform;

pub use error::{CatalogError, Result};
pub use record::{Field, Record};
pub use catalog::{Catalog, IndentStyle};
pub use sort::{sort_by_name, is_sorted_by_name};
pub use validate::{find_duplicate_labels, find_invalid_domains, DomainPolicy, Finding, MatchMode};
pub use schema::EntitySchema;
pub use config::{CatalogJob, Config, ConfigPaths, Preset, Settings};
pub use transform::{Mode, TransformReport};
