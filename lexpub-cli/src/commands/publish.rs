//! `lexpub publish`: rebuild the output tree and commit it to translation
//! branches of the data repository.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use lexpub_core::{config, config::PublishConfig, types::BranchName};
use lexpub_publish::{
    pipeline::{self, PublishScope},
    BranchOutcome, BranchReport,
};

/// Arguments for `lexpub publish`.
///
/// `--list_branches` wins over `--nogit`, which wins over `--branch_name`.
/// With none of them every open translation branch is published.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Translation branch to pull translations from and push artifacts to.
    #[arg(short = 'b', long = "branch_name", alias = "branch-name", value_name = "NAME")]
    pub branch_name: Option<String>,

    /// List the open translation branches and exit.
    #[arg(short = 'l', long = "list_branches", alias = "list-branches")]
    pub list_branches: bool,

    /// Update the local branches, but don't push upstream.
    #[arg(long)]
    pub nopush: bool,

    /// Rebuild the output files without managing them in git (implies --nopush).
    #[arg(long)]
    pub nogit: bool,

    /// Path to publish.yaml.
    #[arg(short, long, env = "LEXPUB_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        let path = config::locate(self.config.as_deref()).context("failed to locate publish.yaml")?;
        let config = config::load_at(&path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?;
        tracing::debug!("configuration loaded from {}", path.display());

        if self.list_branches {
            return print_branches(&config);
        }

        let scope = if self.nogit {
            PublishScope::LocalOnly
        } else if let Some(name) = self.branch_name.clone() {
            PublishScope::Branch(BranchName::from(name))
        } else {
            PublishScope::All
        };
        let push = !self.nopush && !self.nogit;

        let reports = pipeline::run(config, scope.clone(), push).with_context(|| match &scope {
            PublishScope::Branch(name) => format!("publish failed for branch '{name}'"),
            PublishScope::LocalOnly => "local rebuild failed".to_string(),
            PublishScope::All => "publish failed".to_string(),
        })?;

        if reports.is_empty() {
            println!("No open translation branches.");
        }
        for report in &reports {
            print_report(report);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct BranchRow {
    #[tabled(rename = "id")]
    id: u64,
    #[tabled(rename = "branch")]
    branch: String,
    #[tabled(rename = "language")]
    language: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "last transifex update")]
    last_update: String,
}

fn print_branches(config: &PublishConfig) -> Result<()> {
    let branches = pipeline::open_branches(config).context("failed to load catalog")?;
    if branches.is_empty() {
        println!("No open translation branches.");
        return Ok(());
    }

    let rows: Vec<BranchRow> = branches
        .into_iter()
        .map(|b| BranchRow {
            id: b.id,
            branch: b.branch_name.0,
            language: b.language_code,
            version: b.version,
            last_update: b
                .last_transifex_update
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn print_report(report: &BranchReport) {
    let name = report
        .branch
        .as_ref()
        .map(|b| format!("'{b}'"))
        .unwrap_or_else(|| "output tree".to_string());
    let d = &report.distill;
    let counts = format!(
        "{} rendered, {} copied, {} symlinks, {} deeds skipped",
        d.files_written, d.legacy_files_copied, d.symlinks_created, d.deeds_skipped
    );

    match report.outcome {
        BranchOutcome::LocalOnly => {
            println!("{} {name} rebuilt ({counts})", "✓".green());
        }
        BranchOutcome::Unchanged => {
            println!("{} {name} up to date ({counts})", "·".dimmed());
        }
        BranchOutcome::Committed { pushed: true } => {
            println!("{} {name} committed and pushed ({counts})", "✓".green());
        }
        BranchOutcome::Committed { pushed: false } => {
            println!("{} {name} committed, not pushed ({counts})", "✓".yellow());
        }
    }
}
