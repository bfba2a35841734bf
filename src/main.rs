//! `git-xrays` — behavioral, architectural and socio-technical metrics
//! from a repository's history and source tree.
//!
//! The flow is uniform: parse CLI args with `clap`, open the repository,
//! hand the window/selector/reference to the orchestrator, then render
//! narratives or persist a snapshot. Errors print to stderr; user errors
//! exit 1, internal failures exit 2.

/// Anemic-model detection (DBSI, orchestration pressure, AMS).
mod anemic;
/// CLI argument definitions using `clap` derive macros.
mod cli;
/// Commit clustering (K-Means++, silhouette auto-k, drift).
mod clusters;
/// Function-level cyclomatic and cognitive complexity.
mod complexity;
/// Temporal coupling (co-change Jaccard) and PAIN.
mod coupling;
/// Developer-experience overlay.
mod dx;
/// Ridge-regression effort model.
mod effort;
/// Typed error kinds and exit-code mapping.
mod error;
/// Git adapter: history extraction, refs, tree/blob reads via libgit2.
mod git;
/// God-class detection (WMC, TCC, GCS).
mod godclass;
/// Hotspot analysis (frequency × churn, Pareto).
mod hotspots;
/// Knowledge distribution (entropy, islands, DRI).
mod knowledge;
/// Tree-sitter front-ends normalizing Python/TypeScript to summaries.
mod lang;
/// Frozen record types shared by every pipeline.
mod model;
/// Shared report formatting utilities.
mod report_helpers;
/// Orchestration of pipelines, rendering, persistence.
mod runner;
/// Shared numeric helpers (min-max, entropy, Gini, decay).
mod stats;
/// Run store: SQLite persistence and run comparison.
mod store;
/// Window parsing.
mod util;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use cli::Cli;
use error::{Result, XrayError};
use git::GitRepo;
use runner::{AnalysisOptions, CancelToken, Selector};
use store::RunStore;

fn main() {
    // Usage mistakes are user errors (exit 1), not clap's default 2;
    // --help and --version still exit 0.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    });
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let target = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let repo = GitRepo::open(&target)?;
    let repo_key = repo.root().display().to_string();
    let window_days = util::parse_window(&cli.window)?;

    if cli.list_runs {
        let store = open_store(&cli)?;
        let runs = store.list_runs(&repo_key)?;
        runner::print_run_list(&repo_key, &runs);
        let other_repos = store
            .list_repos()?
            .into_iter()
            .filter(|r| r != &repo_key)
            .count();
        if other_repos > 0 {
            println!("({other_repos} other repositories in this store.)");
        }
        return Ok(());
    }

    let selector = selector_from_flags(&cli);

    if let (Some(from), Some(to)) = (cli.from.clone(), cli.to.clone()) {
        if selector.any() {
            return Err(XrayError::Input(
                "--from/--to runs the full battery; drop the per-analysis flags".to_string(),
            ));
        }
        return time_travel(&cli, &repo, &repo_key, window_days, &from, &to);
    }

    // No explicit selection means the full battery.
    let selector = if cli.all || !selector.any() {
        Selector::all()
    } else {
        selector
    };

    let opts = AnalysisOptions {
        window_days,
        selector,
        at: cli.at.clone(),
        seed: cli.seed,
    };
    let started_at = Utc::now().to_rfc3339();
    let analysis = runner::analyze(&repo, &opts, &CancelToken::new())?;
    if !cli.json {
        runner::print_header(&repo, &analysis)?;
    }
    runner::render(&analysis, cli.json, cli.top)?;

    if cli.all {
        let mut store = open_store(&cli)?;
        let run = runner::persist(&mut store, &repo_key, &started_at, &analysis)?;
        println!();
        println!("Saved run {} ({} commits analyzed).", run.run_id, run.commit_count);
    }
    Ok(())
}

/// Run the full battery at two references, persist both snapshots and
/// print the comparison.
fn time_travel(
    cli: &Cli,
    repo: &GitRepo,
    repo_key: &str,
    window_days: u32,
    from: &str,
    to: &str,
) -> Result<()> {
    let mut store = open_store(cli)?;
    let cancel = CancelToken::new();
    let mut run_ids = Vec::with_capacity(2);

    for refspec in [from, to] {
        let opts = AnalysisOptions {
            window_days,
            selector: Selector::all(),
            at: Some(refspec.to_string()),
            seed: cli.seed,
        };
        let started_at = Utc::now().to_rfc3339();
        let analysis = runner::analyze(repo, &opts, &cancel)?;
        let run = runner::persist(&mut store, repo_key, &started_at, &analysis)?;
        run_ids.push(run.run_id);
    }

    let comparison = store.compare(&run_ids[0], &run_ids[1])?;
    if cli.json {
        report_helpers::print_json_stdout(&comparison)?;
    } else {
        runner::print_comparison(&comparison);
        println!();
        println!("Saved runs {} and {}.", run_ids[0], run_ids[1]);
    }
    Ok(())
}

fn open_store(cli: &Cli) -> Result<RunStore> {
    let path = cli.db.clone().unwrap_or_else(RunStore::default_path);
    RunStore::open(&path)
}

fn selector_from_flags(cli: &Cli) -> Selector {
    Selector {
        hotspots: cli.hotspots,
        knowledge: cli.knowledge,
        coupling: cli.coupling,
        complexity: cli.complexity,
        anemic: cli.anemic,
        god_classes: cli.god_classes,
        clusters: cli.clusters,
        effort: cli.effort,
        dx: cli.dx,
    }
}
