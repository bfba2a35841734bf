//! Git repository access via libgit2.
//!
//! Implements the two capability sets the engine consumes: the history
//! side (commit counts, date range, the canonical `FileChange` stream,
//! ref resolution) and the source side (tree listing and blob reads at a
//! ref). The `GitRepo` wrapper encapsulates `git2::Repository` and its
//! resolved working directory root; commits are walked newest-first and
//! merge commits are skipped, so every change is attributable to a single
//! author. The change stream is returned oldest-first.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use git2::{Diff, ObjectType, Patch, Repository, Sort, Tree};

use crate::error::{Result, XrayError};
use crate::model::FileChange;

/// Wrapper around a `git2::Repository` with its resolved root path.
pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo").field("root", &self.root).finish()
    }
}

/// Source file extensions the AST analyzers understand.
const SOURCE_EXTENSIONS: &[&str] = &["py", "pyi", "ts", "tsx", "js", "jsx", "mjs", "cjs"];

impl GitRepo {
    /// Open the git repository that contains `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            XrayError::Input(format!(
                "not a git repository (or any parent): {}: {e}",
                path.display()
            ))
        })?;
        let root = repo
            .workdir()
            .ok_or_else(|| XrayError::Input("bare repositories are not supported".to_string()))?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    /// Repository working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterate non-merge commits in reverse chronological order, bounded
    /// by optional `since`/`until` timestamps. The callback returns
    /// `ControlFlow::Break(())` to stop early.
    fn walk_commits(
        &self,
        since: Option<i64>,
        until: Option<i64>,
        mut f: impl FnMut(&git2::Commit) -> Result<ControlFlow<()>>,
    ) -> Result<()> {
        // An unborn HEAD (fresh repository) simply has no commits.
        if self.repo.head().is_err() {
            return Ok(());
        }
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME)?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            // Merge commits don't represent individual file changes.
            if commit.parent_count() > 1 {
                continue;
            }
            let time = commit.time().seconds();
            if until.is_some_and(|ts| time > ts) {
                continue;
            }
            // Newest-first walk: once below the cutoff, everything else is too.
            if since.is_some_and(|ts| time < ts) {
                break;
            }
            if f(&commit)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Number of non-merge commits reachable from HEAD.
    pub fn commit_count(&self) -> Result<usize> {
        let mut count = 0;
        self.walk_commits(None, None, |_| {
            count += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(count)
    }

    /// Timestamp of the oldest commit reachable from HEAD.
    pub fn first_commit_date(&self) -> Result<Option<i64>> {
        let mut first = None;
        self.walk_commits(None, None, |commit| {
            first = Some(commit.time().seconds());
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(first)
    }

    /// Timestamp of the newest commit reachable from HEAD.
    pub fn last_commit_date(&self) -> Result<Option<i64>> {
        let mut last = None;
        self.walk_commits(None, None, |commit| {
            last = Some(commit.time().seconds());
            Ok(ControlFlow::Break(()))
        })?;
        Ok(last)
    }

    /// The canonical change stream for a window: one `FileChange` per
    /// (commit, file), ordered by commit timestamp ascending. Renames are
    /// not followed; a rename shows up as a change on the new path.
    ///
    /// An unborn HEAD (fresh repository with no commits) yields an empty
    /// stream rather than an error — pipelines degrade to empty reports.
    pub fn file_changes(&self, since: Option<i64>, until: Option<i64>) -> Result<Vec<FileChange>> {
        let mut changes: Vec<FileChange> = Vec::new();
        self.walk_commits(since, until, |commit| {
            let commit_id = commit.id().to_string();
            let sig = commit.author();
            let author = sig.email().or(sig.name()).unwrap_or("unknown").to_string();
            let timestamp = commit.time().seconds();

            let diff = self.commit_diff(commit)?;
            let delta_count = diff.deltas().len();
            for idx in 0..delta_count {
                let Some(path) = diff.get_delta(idx).and_then(|d| {
                    let file = d.new_file();
                    file.path().and_then(|p| p.to_str()).map(String::from)
                }) else {
                    eprintln!("warning: skipping non-UTF-8 path in commit {commit_id}");
                    continue;
                };
                let (added, deleted) = match Patch::from_diff(&diff, idx) {
                    Ok(Some(patch)) => {
                        let (_, additions, deletions) = patch.line_stats()?;
                        (additions, deletions)
                    }
                    // Binary or unrepresentable patch: counts as a touch
                    // with zero line churn.
                    Ok(None) => (0, 0),
                    Err(e) => {
                        return Err(XrayError::Adapter {
                            path: path.clone(),
                            source: e,
                        });
                    }
                };
                changes.push(FileChange {
                    commit_id: commit_id.clone(),
                    author: author.clone(),
                    timestamp,
                    path,
                    added,
                    deleted,
                });
            }
            Ok(ControlFlow::Continue(()))
        })?;

        // The walk is newest-first; the contract is oldest-first.
        changes.reverse();
        Ok(changes)
    }

    /// Resolve a reference to the instant of the referenced commit.
    ///
    /// Accepts a SHA prefix, tag, or branch (via `revparse_single`), or an
    /// ISO-8601 date, which resolves to the commit closest at-or-before
    /// the end of that day.
    pub fn resolve_ref(&self, refspec: &str) -> Result<i64> {
        if let Ok(date) = NaiveDate::parse_from_str(refspec, "%Y-%m-%d") {
            let Some(end_of_day) = date.and_hms_opt(23, 59, 59) else {
                return Err(XrayError::Input(format!("invalid date: {refspec}")));
            };
            return self.commit_at_or_before(end_of_day.and_utc().timestamp(), refspec);
        }

        let obj = self
            .repo
            .revparse_single(refspec)
            .map_err(|e| XrayError::Input(format!("unknown ref '{refspec}': {e}")))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|e| XrayError::Input(format!("'{refspec}' is not a commit: {e}")))?;
        Ok(commit.time().seconds())
    }

    /// Find the commit closest at-or-before `ts` and return its instant.
    fn commit_at_or_before(&self, ts: i64, refspec: &str) -> Result<i64> {
        let mut found = None;
        self.walk_commits(None, Some(ts), |commit| {
            found = Some(commit.time().seconds());
            Ok(ControlFlow::Break(()))
        })?;
        found.ok_or_else(|| XrayError::Input(format!("no commit at or before '{refspec}'")))
    }

    /// List source files (by extension) in the tree at `refspec`,
    /// defaulting to HEAD. Paths are repo-relative, sorted.
    pub fn list_source_files(&self, refspec: Option<&str>) -> Result<Vec<String>> {
        let tree = self.tree_at(refspec)?;
        let mut paths = Vec::new();
        self.collect_tree_paths(&tree, "", &mut paths)?;
        paths.retain(|p| {
            Path::new(p)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
        });
        paths.sort();
        Ok(paths)
    }

    /// Read a blob at `refspec` (default HEAD). The read is retried once
    /// before surfacing an adapter error with the failing path.
    pub fn read_file(&self, path: &str, refspec: Option<&str>) -> Result<Vec<u8>> {
        match self.read_blob(path, refspec) {
            Ok(bytes) => Ok(bytes),
            Err(_) => self.read_blob(path, refspec).map_err(|e| XrayError::Adapter {
                path: path.to_string(),
                source: e,
            }),
        }
    }

    fn read_blob(&self, path: &str, refspec: Option<&str>) -> std::result::Result<Vec<u8>, git2::Error> {
        let tree = match self.tree_at(refspec) {
            Ok(t) => t,
            Err(_) => {
                return Err(git2::Error::from_str("cannot resolve tree"));
            }
        };
        let entry = tree.get_path(Path::new(path))?;
        let blob = self.repo.find_blob(entry.id())?;
        Ok(blob.content().to_vec())
    }

    /// Resolve the tree at `refspec`, defaulting to HEAD.
    fn tree_at(&self, refspec: Option<&str>) -> Result<Tree<'_>> {
        let spec = refspec.unwrap_or("HEAD");
        let obj = self
            .repo
            .revparse_single(spec)
            .map_err(|e| XrayError::Input(format!("unknown ref '{spec}': {e}")))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|e| XrayError::Input(format!("'{spec}' is not a commit: {e}")))?;
        Ok(commit.tree()?)
    }

    /// Recursively collect blob paths under a tree.
    fn collect_tree_paths(&self, tree: &Tree, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        for entry in tree.iter() {
            let Some(name) = entry.name() else {
                eprintln!("warning: non-UTF-8 entry in tree: {:?}", entry.id());
                continue;
            };
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };
            match entry.kind() {
                Some(ObjectType::Blob) => out.push(path),
                Some(ObjectType::Tree) => {
                    let subtree = self.repo.find_tree(entry.id())?;
                    self.collect_tree_paths(&subtree, &path, out)?;
                }
                _ => {} // skip submodules, symlinks, etc.
            }
        }
        Ok(())
    }

    /// Diff a commit against its first parent (or the empty tree).
    fn commit_diff(&self, commit: &git2::Commit) -> Result<Diff<'_>> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        Ok(self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
