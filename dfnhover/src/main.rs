//! dfnhover — generate hover data from MODFLOW 6 definition files.
//!
//! `dfnhover -o src/providers data/dfn` writes `hover_keyword.json`,
//! `hover_block.json` and `vocab.json` for one definition directory. Given
//! several directories (one per format version), each gets its own pass
//! and its own output subdirectory.

use anyhow::{Context, Result};
use clap::Parser;
use dfnhover::render::{json, Artifact};
use dfnhover::{Pass, PassConfig};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "dfnhover",
    about = "Generate keyword and block hover data from MODFLOW 6 definition files"
)]
struct Cli {
    /// Definition directories, one per format version
    #[arg(default_value = "data/dfn")]
    dirs: Vec<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// File name of the shared definitions file
    #[arg(long, default_value = "common.dfn")]
    common: String,

    /// Name prefix of developer-only options, excluded from output
    #[arg(long, default_value = "dev_")]
    dev_prefix: String,

    /// Do not write hover_block.json
    #[arg(long)]
    no_blocks: bool,

    /// Do not write hover_keyword.json
    #[arg(long)]
    no_keywords: bool,

    /// Do not write vocab.json
    #[arg(long)]
    no_vocab: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let out_dirs = output_dirs(&cli.output, &cli.dirs)?;
    let mut failed = 0;
    for (dir, out_dir) in cli.dirs.iter().zip(&out_dirs) {
        failed += run_pass(&cli, dir, out_dir)?;
    }

    if failed > 0 {
        anyhow::bail!("{} definition file(s) could not be processed", failed);
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Output directory for each input. A single input writes into `output`;
/// several inputs each get the shortest trailing path that tells them
/// apart, so `6.4/dfn` and `6.5/dfn` land in `output/6.4/dfn` and
/// `output/6.5/dfn`.
fn output_dirs(output: &Path, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if dirs.len() < 2 {
        return Ok(vec![output.to_path_buf(); dirs.len()]);
    }

    let mut names: Vec<Vec<OsString>> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let resolved = fs::canonicalize(dir)
            .or_else(|_| std::path::absolute(dir))
            .with_context(|| format!("failed to resolve {}", dir.display()))?;
        names.push(
            resolved
                .components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_os_string()),
                    _ => None,
                })
                .collect(),
        );
    }

    let depth = names.iter().map(Vec::len).max().unwrap_or(0);
    for keep in 1..=depth.max(1) {
        let suffixes: Vec<PathBuf> = names
            .iter()
            .map(|parts| parts[parts.len().saturating_sub(keep)..].iter().collect())
            .collect();
        let distinct: HashSet<&PathBuf> = suffixes.iter().collect();
        if distinct.len() == suffixes.len() {
            return Ok(suffixes.iter().map(|s| output.join(s)).collect());
        }
    }
    anyhow::bail!("definition directories resolve to the same path; each may be given only once")
}

/// Run one pass and write its artifacts. Returns the number of failed files.
fn run_pass(cli: &Cli, dir: &Path, out_dir: &Path) -> Result<usize> {
    let mut pass = Pass::new(PassConfig {
        dfn_dir: dir.to_path_buf(),
        common_file: cli.common.clone(),
        dev_prefix: cli.dev_prefix.clone(),
    });
    let report = pass
        .run()
        .with_context(|| format!("failed to process {}", dir.display()))?;

    if report.keywords.is_empty() && report.blocks.is_empty() && report.failures.is_empty() {
        eprintln!("warning: no definition files in {}", dir.display());
    }

    let failed = report.failures.len();
    for (path, err) in report.failures {
        eprintln!("warning: skipping {}: {:#}", path.display(), anyhow::Error::new(err));
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    if !cli.no_keywords {
        write_artifact(out_dir, &report.keywords)?;
    }
    if !cli.no_blocks {
        write_artifact(out_dir, &report.blocks)?;
    }
    if !cli.no_vocab {
        write_artifact(out_dir, &report.vocab)?;
    }
    Ok(failed)
}

fn write_artifact<A: Artifact>(out_dir: &Path, artifact: &A) -> Result<()> {
    let path = out_dir.join(artifact.file_name());
    let text = json::render(artifact)
        .with_context(|| format!("failed to serialize {}", artifact.file_name()))?;
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "generated from dfn");
    Ok(())
}
