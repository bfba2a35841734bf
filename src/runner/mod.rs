//! Orchestration: resolve the window, pull one change stream, run the
//! selected pipelines in dependency order, render or persist.
//!
//! All pipelines in a run consume the same `FileChange` stream and the
//! same source tree, so every derived metric references one universe. A
//! cooperative cancel token is checked between stages; persistence only
//! happens after the last stage, so a cancelled run is never written.

mod report;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, XrayError};
use crate::git::GitRepo;
use crate::model::summarize_commits;
use crate::store::{Run, RunReports, RunStore};
use crate::util::DAY_SECONDS;
use crate::{anemic, clusters, complexity, coupling, dx, effort, godclass, hotspots, knowledge, lang};

pub use report::{print_comparison, print_header, print_run_list, render};

/// Which pipelines the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    pub hotspots: bool,
    pub knowledge: bool,
    pub coupling: bool,
    pub complexity: bool,
    pub anemic: bool,
    pub god_classes: bool,
    pub clusters: bool,
    pub effort: bool,
    pub dx: bool,
}

impl Selector {
    pub fn all() -> Self {
        Self {
            hotspots: true,
            knowledge: true,
            coupling: true,
            complexity: true,
            anemic: true,
            god_classes: true,
            clusters: true,
            effort: true,
            dx: true,
        }
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }

    /// Close over pipeline dependencies: DX needs five pipelines, effort
    /// needs knowledge + coupling (PAIN rides on coupling).
    fn effective(mut self) -> Self {
        if self.dx {
            self.hotspots = true;
            self.knowledge = true;
            self.coupling = true;
            self.clusters = true;
            self.complexity = true;
        }
        if self.effort {
            self.knowledge = true;
            self.coupling = true;
        }
        if self.anemic || self.god_classes {
            // Same parse pass feeds all three structural analyzers.
            self.complexity = true;
        }
        self
    }
}

/// Cooperative cancellation checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the next stage checkpoint aborts the run.
    #[cfg(test)]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn checkpoint(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(XrayError::Analysis(format!("cancelled before {stage}")));
        }
        Ok(())
    }
}

/// One analysis invocation.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub window_days: u32,
    pub selector: Selector,
    /// Reference the window ends at; `None` means now / HEAD.
    pub at: Option<String>,
    pub seed: u64,
}

/// Everything one run produced, before rendering or persistence.
#[derive(Debug)]
pub struct Analysis {
    pub requested: Selector,
    pub reports: RunReports,
    pub commit_count: usize,
    pub window_days: u32,
    pub reference: Option<String>,
    pub reference_time: i64,
    /// True when the window contained no commits; reports are zeroed.
    pub empty: bool,
}

/// Run the selected pipelines over one window of one repository.
pub fn analyze(repo: &GitRepo, opts: &AnalysisOptions, cancel: &CancelToken) -> Result<Analysis> {
    let requested = opts.selector;
    let selector = requested.effective();

    let reference_time = match &opts.at {
        Some(refspec) => repo.resolve_ref(refspec)?,
        None => Utc::now().timestamp(),
    };
    let since = reference_time - opts.window_days as i64 * DAY_SECONDS;

    cancel.checkpoint("history extraction")?;
    let changes = repo.file_changes(Some(since), Some(reference_time))?;
    let commits = summarize_commits(&changes);
    let empty = changes.is_empty();
    if empty {
        eprintln!("warning: no commits in the analysis window; reports degrade to empty");
    }

    let mut reports = RunReports::default();

    if selector.hotspots {
        cancel.checkpoint("hotspots")?;
        reports.hotspots = hotspots::analyze(&changes, reference_time);
    }
    if selector.knowledge {
        cancel.checkpoint("knowledge")?;
        reports.knowledge = knowledge::analyze(&changes, reference_time);
    }
    if selector.coupling {
        cancel.checkpoint("coupling")?;
        reports.coupling = coupling::analyze(&changes);
        reports.pain = coupling::pain::analyze(&changes, &reports.coupling);
    }
    if selector.complexity || selector.anemic || selector.god_classes {
        cancel.checkpoint("source parsing")?;
        let (modules, contents) = parse_tree(repo, opts.at.as_deref())?;
        if selector.complexity {
            reports.complexity = complexity::analyze(&modules);
        }
        if selector.anemic {
            reports.anemic = anemic::analyze(&modules, &contents);
        }
        if selector.god_classes {
            reports.godclass = godclass::analyze(&modules);
        }
    }
    if selector.clusters {
        cancel.checkpoint("clustering")?;
        reports.clusters = clusters::analyze(&commits, opts.seed);
    }
    if selector.effort {
        cancel.checkpoint("effort model")?;
        reports.effort = effort::analyze(&changes, &reports.knowledge, &reports.pain)?;
    }
    if selector.dx {
        cancel.checkpoint("dx overlay")?;
        reports.dx = dx::analyze(
            &changes,
            &reports.hotspots,
            &reports.knowledge,
            &reports.clusters,
            &reports.complexity,
        );
    }

    Ok(Analysis {
        requested,
        reports,
        commit_count: commits.len(),
        window_days: opts.window_days,
        reference: opts.at.clone(),
        reference_time,
        empty,
    })
}

/// Parse every supported source file in the tree at `refspec`.
/// Unparseable files warn and are skipped; unreadable blobs surface as
/// adapter errors.
fn parse_tree(
    repo: &GitRepo,
    refspec: Option<&str>,
) -> Result<(Vec<lang::SourceModule>, BTreeMap<String, String>)> {
    let mut modules = Vec::new();
    let mut contents = BTreeMap::new();
    let paths = match repo.list_source_files(refspec) {
        Ok(paths) => paths,
        // No tree to read in a repository with an unborn HEAD; the
        // structural analyzers degrade to empty reports.
        Err(XrayError::Input(_)) if refspec.is_none() => Vec::new(),
        Err(e) => return Err(e),
    };
    for path in paths {
        let bytes = repo.read_file(&path, refspec)?;
        match lang::parse_module(&path, &bytes) {
            Some(module) => {
                if let Ok(text) = String::from_utf8(bytes) {
                    contents.insert(path.clone(), text);
                }
                modules.push(module);
            }
            None => eprintln!("warning: cannot parse {path}, skipping"),
        }
    }
    Ok((modules, contents))
}

/// Persist a completed analysis as a new run and return its row.
pub fn persist(
    store: &mut RunStore,
    repo_path: &str,
    started_at: &str,
    analysis: &Analysis,
) -> Result<Run> {
    let run = Run::summarize(
        Uuid::new_v4().to_string(),
        repo_path.to_string(),
        analysis.window_days,
        started_at.to_string(),
        Utc::now().to_rfc3339(),
        analysis.reference.clone(),
        analysis.commit_count,
        &analysis.reports,
    )?;
    store.save(&run, &analysis.reports)?;
    Ok(run)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
