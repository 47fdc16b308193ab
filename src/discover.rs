// catalog-sorter/src/discover.rs

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverConfig {
    pub root: PathBuf,
    /// Matched against paths relative to `root`.
    pub patterns: Vec<String>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("src/data"), patterns: vec!["sorted_*.json".into()] }
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("invalid glob: {}", p))?);
    }
    Ok(b.build()?)
}

/// Every file under `base.join(cfg.root)` matching a pattern, sorted by path.
pub fn discover(base: &Path, cfg: &DiscoverConfig) -> Result<Vec<PathBuf>> {
    let root = base.join(&cfg.root);
    if !root.is_dir() {
        debug!(root = %root.display(), "discovery root missing; nothing found");
        return Ok(Vec::new());
    }
    let set = build_globset(&cfg.patterns)?;
    let mut found = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if !entry.file_type().is_file() { continue; }
        let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        if set.is_match(rel) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    debug!(root = %root.display(), count = found.len(), "discovered catalogs");
    Ok(found)
}
