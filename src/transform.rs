// catalog-sorter/src/transform.rs

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, info_span};

use crate::catalog::Catalog;
use crate::config::CatalogJob;
use crate::error::Result;
use crate::links::fill_wiki_links;
use crate::schema::EntitySchema;
use crate::sort::{is_sorted_by_name, sort_by_name};
use crate::validate::{validate, Finding};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Load, validate, sort, write.
    #[default]
    Write,
    /// Same as `Write` without touching the file.
    DryRun,
    /// Validate and verify order only.
    Check,
}

#[derive(Clone, Debug, Serialize)]
pub struct TransformReport {
    pub path: PathBuf,
    pub records: usize,
    pub findings: Vec<Finding>,
    /// Whether sorting changed the order (for `Check`: whether the file is unsorted).
    pub reordered: bool,
    pub written: bool,
}

impl TransformReport {
    pub fn is_clean(&self) -> bool { self.findings.is_empty() && !self.reordered }
}

/// Runs the detectors the job enables. Findings never fail the run; only a
/// schema that does not compile does.
pub fn findings(catalog: &Catalog, job: &CatalogJob, schema: Option<&EntitySchema>) -> Result<Vec<Finding>> {
    let mut out = Vec::new();
    if job.validate {
        out.extend(validate(catalog, &job.policy));
    }
    if job.schema {
        match schema {
            Some(s) => out.extend(s.check(catalog)),
            None => out.extend(EntitySchema::new()?.check(catalog)),
        }
    }
    Ok(out)
}

/// A loaded catalog together with what the detectors found in it.
#[derive(Clone, Debug)]
pub struct Inspected {
    pub catalog: Catalog,
    pub findings: Vec<Finding>,
}

/// Load and validate one catalog. Findings are available here even when the
/// later sort fails.
pub fn inspect(job: &CatalogJob, schema: Option<&EntitySchema>) -> Result<Inspected> {
    let _span = info_span!("catalog", path = %job.path.display()).entered();

    let catalog = Catalog::load(&job.path)?;
    info!(records = catalog.len(), "loaded");

    let findings = findings(&catalog, job, schema)?;
    if !findings.is_empty() {
        info!(count = findings.len(), "validation findings");
    }
    Ok(Inspected { catalog, findings })
}

/// Sort and store an inspected catalog, or only verify its order in `Check`.
pub fn finish(job: &CatalogJob, inspected: Inspected, mode: Mode) -> Result<TransformReport> {
    let _span = info_span!("catalog", path = %job.path.display()).entered();
    let Inspected { catalog, findings } = inspected;
    let records = catalog.len();

    if mode == Mode::Check {
        let reordered = !is_sorted_by_name(&catalog)?;
        return Ok(TransformReport { path: job.path.clone(), records, findings, reordered, written: false });
    }

    let before = catalog.clone();
    let sorted = sort_by_name(catalog)?;
    let reordered = sorted != before;
    info!(reordered, "sorted");

    let written = mode == Mode::Write;
    if written {
        sorted.store(&job.path, job.indent, job.ensure_ascii)?;
        info!(indent = ?job.indent, "written");
    }
    Ok(TransformReport { path: job.path.clone(), records, findings, reordered, written })
}

/// Load -> validate -> sort -> store for one catalog. A shared compiled
/// `schema` may be passed in to avoid recompiling it per job.
pub fn run(job: &CatalogJob, mode: Mode, schema: Option<&EntitySchema>) -> Result<TransformReport> {
    finish(job, inspect(job, schema)?, mode)
}

/// Backfills `wikiLink` and rewrites the catalog. Returns the number of records changed.
pub fn run_links(job: &CatalogJob, base: &str, overwrite: bool, dry_run: bool) -> Result<usize> {
    let _span = info_span!("links", path = %job.path.display()).entered();
    let mut catalog = Catalog::load(&job.path)?;
    let changed = fill_wiki_links(&mut catalog, base, overwrite);
    if changed > 0 && !dry_run {
        catalog.store(&job.path, job.indent, job.ensure_ascii)?;
    }
    info!(changed, dry_run, "wiki links");
    Ok(changed)
}
