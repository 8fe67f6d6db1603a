//! excisor CLI - removes extracted declarations from a monolithic script.
//!
//! With no flags it reads `excisor.toml` (if present) from the working
//! directory, harvests declaration names from the module directory, removes
//! those declarations from the source file, writes a backup, and prints a
//! removal report. Names that cannot be found are reported, not fatal;
//! names that are not identifiers are skipped with a warning.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use excisor_core::{
    discover_modules, init_structured_logging, load_config, load_config_file, print_json,
    print_plain, render_name_list, DeclarationName, ExciseOptions, Excisor, ExcisorConfig,
    NameSet, RunOutcome,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Structural declaration excisor for monolithic scripts")]
pub struct Cli {
    /// Configuration file (defaults to ./excisor.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source file to rewrite
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Module file to harvest names from (repeatable)
    #[arg(long = "module", value_name = "PATH")]
    modules: Vec<PathBuf>,

    /// Directory of module files to harvest names from
    #[arg(long, value_name = "DIR")]
    module_dir: Option<PathBuf>,

    /// Declaration name to remove (repeatable); skips harvesting.
    /// Names that are not identifiers are skipped with a warning
    #[arg(long = "name", value_name = "NAME")]
    names: Vec<String>,

    /// Also remove `const UPPER_SNAKE = { ... };` objects
    #[arg(long)]
    constants: bool,

    /// Bound on comment lines absorbed above each declaration
    #[arg(long, value_name = "LINES")]
    comment_lookback: Option<usize>,

    /// Replace each removed declaration with this text (`{name}` expands)
    #[arg(long, value_name = "TEMPLATE")]
    tombstone: Option<String>,

    /// Collapse runs of blank lines left by removals
    #[arg(long)]
    collapse_blank_lines: bool,

    /// Do not write a backup copy before overwriting the source
    #[arg(long)]
    no_backup: bool,

    /// Report what would be removed without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Write the harvested name listing to this file
    #[arg(long, value_name = "FILE")]
    names_out: Option<PathBuf>,
}

/// Loads the configuration, falling back to defaults on any problem.
fn load_settings(cli: &Cli) -> ExcisorConfig {
    let loaded = match &cli.config {
        Some(path) => load_config_file(path).map(Some),
        None => load_config(Path::new(".")),
    };
    match loaded {
        Ok(Some(cfg)) => cfg,
        Ok(None) => ExcisorConfig::default(),
        Err(e) => {
            eprintln!("[WARN] config load failed: {:#}", e);
            ExcisorConfig::default()
        }
    }
}

/// Literal names from the command line, else from the config; `None` when
/// neither supplies any, so names are harvested from modules instead.
///
/// Names that are not identifiers are skipped with a warning.
fn resolve_names(cli: &Cli, cfg: &ExcisorConfig) -> Option<NameSet> {
    let raw: Vec<String> = if !cli.names.is_empty() {
        cli.names.clone()
    } else {
        cfg.names.clone().unwrap_or_default()
    };
    if raw.is_empty() {
        return None;
    }
    let names = raw
        .into_iter()
        .filter_map(|name| match DeclarationName::new(name) {
            Ok(valid) => Some(valid),
            Err(e) => {
                eprintln!("[WARN] skipping {}", e);
                None
            }
        })
        .collect();
    Some(names)
}

/// Module files to harvest: explicit lists win over directory discovery.
fn resolve_modules(cli: &Cli, cfg: &ExcisorConfig) -> Result<Vec<PathBuf>> {
    if !cli.modules.is_empty() {
        return Ok(cli.modules.clone());
    }
    if let Some(modules) = cfg.modules.as_ref().filter(|m| !m.is_empty()) {
        return Ok(modules.clone());
    }
    let dir = cli
        .module_dir
        .clone()
        .unwrap_or_else(|| cfg.module_dir_path());
    discover_modules(&dir, &cfg.module_filter())
}

/// Command-line flags layered over the `[excise]` table.
fn resolve_options(cli: &Cli, cfg: &ExcisorConfig) -> ExciseOptions {
    let mut opts = cfg.excise_config().to_options();
    opts.remove_constants |= cli.constants;
    opts.collapse_blank_lines |= cli.collapse_blank_lines;
    if cli.comment_lookback.is_some() {
        opts.comment_lookback = cli.comment_lookback;
    }
    if cli.tombstone.is_some() {
        opts.tombstone = cli.tombstone.clone();
    }
    opts
}

fn resolve_backup(cli: &Cli, cfg: &ExcisorConfig) -> Option<String> {
    if cli.no_backup {
        None
    } else {
        cfg.excise_config().backup_suffix()
    }
}

fn print_run_summary(outcome: &RunOutcome, dry_run: bool) {
    if let Some(harvest) = &outcome.harvest {
        let missing: Vec<_> = harvest.missing().collect();
        println!(
            "Modules: {} scanned, {} missing",
            harvest.modules.len() - missing.len(),
            missing.len()
        );
        for path in missing {
            println!("  - missing: {}", path.display());
        }
    }
    if dry_run {
        println!("[DRY-RUN] Source left unchanged.");
    } else if outcome.written {
        if let Some(backup) = &outcome.backup {
            println!("Backup: {}", backup.display());
        }
    } else {
        println!("Nothing removed; source left unchanged.");
    }
    println!();
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] excisor internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    // Structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let cfg = load_settings(&cli);

    let source = cli.source.clone().unwrap_or_else(|| cfg.source_path());
    let names = resolve_names(&cli, &cfg);
    let modules = match names {
        None => resolve_modules(&cli, &cfg)?,
        Some(_) => Vec::new(),
    };
    let json = cli.json || cfg.wants_json();

    let outcome = Excisor::new(&source)
        .names(names.unwrap_or_default())
        .modules(modules)
        .options(resolve_options(&cli, &cfg))
        .backup(resolve_backup(&cli, &cfg))
        .dry_run(cli.dry_run)
        .run()
        .with_context(|| format!("Excision of {} failed", source.display()))?;

    let names_out = cli
        .names_out
        .clone()
        .or_else(|| cfg.output.as_ref().and_then(|o| o.names_out.clone()));
    if let (Some(path), Some(harvest)) = (names_out, &outcome.harvest) {
        fs::write(&path, render_name_list(harvest))
            .with_context(|| format!("Failed to write name list: {}", path.display()))?;
        if !json {
            println!("Name list saved to: {}", path.display());
        }
    }

    if json {
        print_json(&outcome.report);
    } else {
        print_run_summary(&outcome, cli.dry_run);
        print_plain(&outcome.report);
    }

    Ok(())
}
