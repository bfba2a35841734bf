//! Frozen record types shared by every pipeline.
//!
//! A run's pipelines all consume the same `FileChange` stream, so every
//! derived metric references the same universe of commits and files.
//! Records are created once by the git adapter and never mutated.

use serde::Serialize;

/// One file touched by one commit. A rename appears as a change on the
/// new path only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileChange {
    pub commit_id: String,
    pub author: String,
    /// Unix timestamp (seconds) of the commit.
    pub timestamp: i64,
    /// Repository-relative path.
    pub path: String,
    pub added: usize,
    pub deleted: usize,
}

impl FileChange {
    pub fn churn(&self) -> usize {
        self.added + self.deleted
    }
}

/// Per-commit aggregate derived from the `FileChange` stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSummary {
    pub commit_id: String,
    pub author: String,
    pub timestamp: i64,
    pub file_count: usize,
    pub total_added: usize,
    pub total_deleted: usize,
    /// added / (added + deleted); 0.5 for a zero-churn commit.
    pub add_ratio: f64,
}

/// Fold a timestamp-ascending change stream into per-commit summaries,
/// preserving commit order.
pub fn summarize_commits(changes: &[FileChange]) -> Vec<CommitSummary> {
    let mut summaries: Vec<CommitSummary> = Vec::new();
    for change in changes {
        match summaries.last_mut() {
            Some(last) if last.commit_id == change.commit_id => {
                last.file_count += 1;
                last.total_added += change.added;
                last.total_deleted += change.deleted;
            }
            _ => summaries.push(CommitSummary {
                commit_id: change.commit_id.clone(),
                author: change.author.clone(),
                timestamp: change.timestamp,
                file_count: 1,
                total_added: change.added,
                total_deleted: change.deleted,
                add_ratio: 0.0,
            }),
        }
    }
    for s in &mut summaries {
        let churn = s.total_added + s.total_deleted;
        s.add_ratio = if churn > 0 {
            s.total_added as f64 / churn as f64
        } else {
            0.5
        };
    }
    summaries
}
