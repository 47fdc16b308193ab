// catalog-sorter/src/main.rs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use catalog_sorter::{
    config::{Config, ConfigPaths, Preset, Settings},
    links::DEFAULT_WIKI_BASE,
    schema::EntitySchema,
    transform::{self, Mode, TransformReport},
    validate::Finding,
    CatalogJob, IndentStyle, MatchMode,
};

#[derive(Parser)]
#[command(name = "catalog-sorter", version, about = "Validate and sort JSON catalog files by name")]
struct Cli {
    /// Extra config file, applied over user and workspace config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Workspace root; catalog paths and catalog-sorter.toml resolve against it
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,
    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Print a machine-readable JSON report
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate, sort by name and rewrite each catalog
    Sort {
        #[command(flatten)]
        select: Selection,
        #[command(flatten)]
        opts: JobArgs,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate and verify order; exit 1 on findings or unsorted files
    Check {
        #[command(flatten)]
        select: Selection,
        #[command(flatten)]
        opts: JobArgs,
    },
    /// Fill `wikiLink` from each record's name
    Links {
        #[command(flatten)]
        select: Selection,
        #[arg(long, default_value = DEFAULT_WIKI_BASE)]
        base: String,
        /// Replace existing links too
        #[arg(long)]
        overwrite: bool,
        #[arg(long, value_enum)]
        indent: Option<IndentStyle>,
        /// Write non-ASCII text as UTF-8 instead of `\uXXXX` escapes
        #[arg(long)]
        utf8: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct Selection {
    /// Catalog files; defaults to configured catalogs, then the built-in presets
    paths: Vec<PathBuf>,
    #[arg(long, value_enum)]
    preset: Vec<Preset>,
}

#[derive(Args)]
struct JobArgs {
    #[arg(long, value_enum)]
    indent: Option<IndentStyle>,
    /// Write non-ASCII text as UTF-8 instead of `\uXXXX` escapes
    #[arg(long)]
    utf8: bool,
    /// Skip duplicate-label and image-domain checks
    #[arg(long)]
    no_validate: bool,
    /// Also check every record against the entity schema
    #[arg(long)]
    schema: bool,
    #[arg(long = "match", value_enum)]
    domain_match: Option<MatchMode>,
    /// Accepted image domain; repeat for several
    #[arg(long = "accept")]
    accepted_domains: Vec<String>,
}

impl JobArgs {
    fn settings(&self) -> Settings {
        Settings {
            indent: self.indent,
            ensure_ascii: self.utf8.then_some(false),
            validate: self.no_validate.then_some(false),
            schema: self.schema.then_some(true),
            domain_match: self.domain_match,
            accepted_domains: (!self.accepted_domains.is_empty()).then(|| self.accepted_domains.clone()),
        }
    }
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&ConfigPaths::standard(&cli.dir, cli.config.clone()))?;
    debug!(?config, "merged config");

    match &cli.cmd {
        Cmd::Sort { select, opts, dry_run } => {
            let jobs = config.jobs(&cli.dir, &select.paths, &select.preset, &opts.settings())?;
            let mode = if *dry_run { Mode::DryRun } else { Mode::Write };
            let reports = run_all(&cli, &jobs, mode)?;
            print_json(&cli, &reports, true)?;
        }
        Cmd::Check { select, opts } => {
            let jobs = config.jobs(&cli.dir, &select.paths, &select.preset, &opts.settings())?;
            let reports = run_all(&cli, &jobs, Mode::Check)?;
            let ok = reports.iter().all(TransformReport::is_clean);
            print_json(&cli, &reports, ok)?;
            if !ok {
                std::process::exit(1);
            }
        }
        Cmd::Links { select, base, overwrite, indent, utf8, dry_run } => {
            let cli_settings = Settings { indent: *indent, ensure_ascii: utf8.then_some(false), ..Default::default() };
            let jobs = config.jobs(&cli.dir, &select.paths, &select.preset, &cli_settings)?;
            let mut changed = Vec::with_capacity(jobs.len());
            for job in &jobs {
                let n = transform::run_links(job, base, *overwrite, *dry_run)
                    .with_context(|| format!("catalog {}", job.path.display()))?;
                changed.push(LinkReport { path: job.path.clone(), changed: n });
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&JsonOut { ok: true, data: &changed })?);
            } else {
                for r in &changed {
                    println!("{}: {} wiki link(s) {}", r.path.display(), r.changed, if *dry_run { "would change" } else { "updated" });
                }
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct LinkReport {
    path: PathBuf,
    changed: usize,
}

/// Runs every job in order. Console output for a catalog is printed as soon
/// as it is known, so findings are visible even when a later step fails.
fn run_all(cli: &Cli, jobs: &[CatalogJob], mode: Mode) -> Result<Vec<TransformReport>> {
    let schema = if jobs.iter().any(|j| j.schema) { Some(EntitySchema::new()?) } else { None };
    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        let inspected = transform::inspect(job, schema.as_ref())
            .with_context(|| format!("catalog {}", job.path.display()))?;
        if !cli.json {
            print_findings(job, &inspected.findings);
        }
        let report = transform::finish(job, inspected, mode)
            .with_context(|| format!("catalog {}", job.path.display()))?;
        if !cli.json {
            print_status(&report);
        }
        reports.push(report);
    }
    Ok(reports)
}

fn print_json(cli: &Cli, reports: &[TransformReport], ok: bool) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data: reports })?);
    }
    Ok(())
}

fn print_status(r: &TransformReport) {
    let status = match (r.written, r.reordered) {
        (true, true) => "sorted",
        (true, false) => "already sorted, rewritten",
        (false, true) => "not sorted",
        (false, false) => "already sorted",
    };
    println!("{}: {} records, {}", r.path.display(), r.records, status);
}

fn print_findings(job: &CatalogJob, findings: &[Finding]) {
    let dups: Vec<_> = findings.iter().filter_map(|f| match f {
        Finding::DuplicateLabel { record, .. } => Some(record),
        _ => None,
    }).collect();
    if !dups.is_empty() {
        println!("The following objects have duplicate labels:");
        for r in dups { println!("{r}"); }
    }

    let domains: Vec<_> = findings.iter().filter_map(|f| match f {
        Finding::InvalidDomain { line, .. } => Some(line),
        _ => None,
    }).collect();
    if !domains.is_empty() {
        println!("The following objects have invalid domains (valid domains = {}):", job.policy.accepted.join(", "));
        for l in domains { println!("{l}"); }
    }

    let schema: Vec<_> = findings.iter().filter_map(|f| match f {
        Finding::Schema { index, message } => Some((index, message)),
        _ => None,
    }).collect();
    if !schema.is_empty() {
        println!("The following objects do not match the entity schema:");
        for (i, m) in schema { println!("#{i}: {m}"); }
    }
}
