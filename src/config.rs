// catalog-sorter/src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Component, Path, PathBuf}};
use tracing::debug;

use crate::catalog::IndentStyle;
use crate::discover::{discover, DiscoverConfig};
use crate::validate::{DomainPolicy, MatchMode, DEFAULT_ACCEPTED_DOMAIN};

pub const WORKSPACE_CONFIG: &str = "catalog-sorter.toml";

/// Config is merged: built-in -> user -> workspace -> --config file -> CLI flags
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub defaults: Settings,
    #[serde(rename = "catalog")]
    pub catalogs: Vec<CatalogEntry>,
    pub discover: Option<DiscoverConfig>,
}

/// Job settings. Every field is optional so layers only override what they name.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub indent: Option<IndentStyle>,
    pub ensure_ascii: Option<bool>,
    pub validate: Option<bool>,
    pub schema: Option<bool>,
    pub domain_match: Option<MatchMode>,
    pub accepted_domains: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub settings: Settings,
}

/// Fully resolved work item for one catalog file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogJob {
    pub path: PathBuf,
    pub indent: IndentStyle,
    /// Escape non-ASCII text as `\uXXXX` when writing.
    pub ensure_ascii: bool,
    pub validate: bool,
    pub schema: bool,
    pub policy: DomainPolicy,
}

/// The three historical catalogs of the planner's data directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    Items,
    Familiars,
    Relics,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Items, Preset::Familiars, Preset::Relics];

    pub fn entry(self) -> CatalogEntry {
        let (file, validate) = match self {
            Preset::Items => ("sorted_items.json", true),
            Preset::Familiars => ("sorted_familiars.json", false),
            Preset::Relics => ("sorted_relics.json", false),
        };
        CatalogEntry {
            path: Path::new("src").join("data").join(file),
            settings: Settings {
                indent: Some(IndentStyle::Pretty),
                validate: Some(validate),
                ..Default::default()
            },
        }
    }
}

impl Settings {
    /// Fields set in `b` win.
    pub fn overlay(&mut self, b: &Settings) {
        if b.indent.is_some() { self.indent = b.indent; }
        if b.ensure_ascii.is_some() { self.ensure_ascii = b.ensure_ascii; }
        if b.validate.is_some() { self.validate = b.validate; }
        if b.schema.is_some() { self.schema = b.schema; }
        if b.domain_match.is_some() { self.domain_match = b.domain_match; }
        if b.accepted_domains.is_some() { self.accepted_domains = b.accepted_domains.clone(); }
    }

    fn resolve(&self, path: PathBuf) -> CatalogJob {
        CatalogJob {
            path,
            indent: self.indent.unwrap_or_default(),
            ensure_ascii: self.ensure_ascii.unwrap_or(true),
            validate: self.validate.unwrap_or(true),
            schema: self.schema.unwrap_or(false),
            policy: DomainPolicy::new(
                self.domain_match.unwrap_or_default(),
                self.accepted_domains
                    .clone()
                    .unwrap_or_else(|| vec![DEFAULT_ACCEPTED_DOMAIN.to_string()]),
            ),
        }
    }
}

fn merge(a: &mut Config, b: &Config) {
    a.defaults.overlay(&b.defaults);
    if !b.catalogs.is_empty() { a.catalogs = b.catalogs.clone(); }
    if b.discover.is_some() { a.discover = b.discover.clone(); }
}

/// Where each config layer lives. Missing layer files are skipped.
#[derive(Clone, Debug, Default)]
pub struct ConfigPaths {
    pub user: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    /// Must exist when given.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    pub fn standard(workspace_root: &Path, explicit: Option<PathBuf>) -> Self {
        let user = ProjectDirs::from("org", "catalog-sorter", "catalog-sorter")
            .map(|p| p.config_dir().join("config.toml"));
        Self { user, workspace: Some(workspace_root.join(WORKSPACE_CONFIG)), explicit }
    }
}

fn read_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

impl Config {
    pub fn load(paths: &ConfigPaths) -> Result<Self> {
        let mut merged = Config::default();
        for p in [&paths.user, &paths.workspace].into_iter().flatten() {
            if p.is_file() {
                debug!(path = %p.display(), "config layer");
                merge(&mut merged, &read_file(p)?);
            }
        }
        if let Some(p) = &paths.explicit {
            debug!(path = %p.display(), "explicit config");
            merge(&mut merged, &read_file(p)?);
        }
        Ok(merged)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse config toml")
    }

    fn job(&self, entry: &CatalogEntry, base: &Path, cli: &Settings) -> CatalogJob {
        let mut s = self.defaults.clone();
        s.overlay(&entry.settings);
        s.overlay(cli);
        s.resolve(normalize(&base.join(&entry.path)))
    }

    /// Jobs for explicit paths and presets; when both are empty, the configured
    /// catalogs plus discovered files, falling back to every preset.
    /// `cli` overrides any per-catalog setting. Paths resolve against `base`.
    pub fn jobs(&self, base: &Path, paths: &[PathBuf], presets: &[Preset], cli: &Settings) -> Result<Vec<CatalogJob>> {
        let mut entries: Vec<CatalogEntry> = paths
            .iter()
            .map(|p| CatalogEntry { path: p.clone(), settings: Settings::default() })
            .chain(presets.iter().map(|p| p.entry()))
            .collect();

        if entries.is_empty() {
            entries.extend(self.catalogs.iter().cloned());
            if let Some(d) = &self.discover {
                for path in discover(base, d)? {
                    entries.push(CatalogEntry { path, settings: Settings::default() });
                }
            }
            if entries.is_empty() {
                entries.extend(Preset::ALL.iter().map(|p| p.entry()));
            }
        }

        let mut jobs: Vec<CatalogJob> = Vec::with_capacity(entries.len());
        let mut seen: Vec<PathBuf> = Vec::with_capacity(entries.len());
        for e in &entries {
            let job = self.job(e, base, cli);
            // first mention of a file wins, however it was spelled
            let key = fs::canonicalize(&job.path).unwrap_or_else(|_| job.path.clone());
            if !seen.contains(&key) {
                seen.push(key);
                jobs.push(job);
            }
        }
        Ok(jobs)
    }
}

/// Drops `.` components; `..` is kept since it may cross a symlink.
fn normalize(path: &Path) -> PathBuf {
    let out: PathBuf = path.components().filter(|c| !matches!(c, Component::CurDir)).collect();
    if out.as_os_str().is_empty() { PathBuf::from(".") } else { out }
}
