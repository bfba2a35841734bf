//! CLI argument definitions for the `git-xrays` command.
//!
//! One flat surface: a repository path, a window, one flag per analysis
//! (or `--all`), time-travel references, and run-store options.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "git-xrays",
    version,
    about = "X-ray a git repository: hotspots, knowledge risk, coupling, effort and DX metrics",
    long_about = "\
Mine a repository's history and source tree and report behavioral,
architectural and socio-technical metrics. Every analysis reads the same
commit window, so the numbers are comparable within a run.

Analyses:
  --hotspots      change frequency × churn, with rework and Pareto spread
  --knowledge     author entropy, knowledge islands, DRI/bus factor
  --coupling      co-change pairs (Jaccard) and the PAIN composite
  --complexity    cyclomatic/cognitive complexity per function
  --anemic        data-bag classes (DBSI / orchestration pressure / AMS)
  --god-classes   WMC / TCC / god-class score
  --clusters      K-Means++ commit clustering with drift
  --effort        ridge-regression effort model (REI, attributions)
  --dx            composite developer-experience overlay

`--all` runs the full battery and persists a snapshot to the run store.
`--from`/`--to` run the full battery at two references, persist both and
print the comparison. Snapshots live in ~/.git-xrays/runs.db by default.

Examples:
  git-xrays .                             # full battery, printed only
  git-xrays . --hotspots --window 6m      # one pipeline, half a year
  git-xrays . --all --at v2.1.0           # snapshot at a tag
  git-xrays . --from v2.0.0 --to v2.1.0   # what changed between releases
  git-xrays . --list-runs                 # stored snapshots for this repo"
)]
pub struct Cli {
    /// Repository to analyze (default: current directory)
    pub path: Option<PathBuf>,

    /// Analysis window ending at the reference, e.g. 90d, 6m, 1y
    #[arg(long, default_value = "90d")]
    pub window: String,

    /// Hotspot analysis (frequency × churn)
    #[arg(long)]
    pub hotspots: bool,

    /// Knowledge distribution and bus-factor risk
    #[arg(long)]
    pub knowledge: bool,

    /// Temporal coupling and PAIN
    #[arg(long)]
    pub coupling: bool,

    /// Function-level cyclomatic and cognitive complexity
    #[arg(long)]
    pub complexity: bool,

    /// Anemic-model detection
    #[arg(long)]
    pub anemic: bool,

    /// God-class detection
    #[arg(long)]
    pub god_classes: bool,

    /// Commit clustering with auto-k and drift
    #[arg(long)]
    pub clusters: bool,

    /// Ridge-regression effort model
    #[arg(long)]
    pub effort: bool,

    /// Developer-experience overlay
    #[arg(long)]
    pub dx: bool,

    /// Run every analysis and persist the snapshot
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub all: bool,

    /// Analyze at a reference (SHA, tag, branch, or ISO date)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub at: Option<String>,

    /// Earlier reference for a run-to-run comparison (requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Later reference for a run-to-run comparison (requires --from)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Run-store database path (default: ~/.git-xrays/runs.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Seed for the clustering RNG
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Show only the top N rows per table
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Machine-readable JSON output instead of tables
    #[arg(long)]
    pub json: bool,

    /// List stored runs for this repository and exit
    #[arg(long)]
    pub list_runs: bool,
}
