// catalog-sorter/src/links.rs

use serde_json::Value;
use tracing::debug;

use crate::catalog::Catalog;
use crate::record::Record;

pub const DEFAULT_WIKI_BASE: &str = "https://runescape.wiki/w/";

/// `base` + name with spaces turned into underscores.
pub fn wiki_link(base: &str, name: &str) -> String {
    format!("{base}{}", name.replace(' ', "_"))
}

/// Sets `wikiLink` from `name` on every record that has a string name.
/// Existing links are kept unless `overwrite`. Returns how many records changed.
pub fn fill_wiki_links(catalog: &mut Catalog, base: &str, overwrite: bool) -> usize {
    let mut changed = 0;
    for record in catalog.records_mut() {
        let Some(name) = record.name().as_str() else { continue };
        if !overwrite && !record.field(Record::WIKI_LINK).is_absent() {
            continue;
        }
        let link = Value::String(wiki_link(base, name));
        if record.set(Record::WIKI_LINK, link.clone()).as_ref() != Some(&link) {
            changed += 1;
        }
    }
    debug!(changed, "filled wiki links");
    changed
}
