use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::model::FileChange;

/// Minimum shared commits for a pair to be reported.
const MIN_SHARED: usize = 2;

/// A pair of temporally coupled files, canonically ordered
/// (`file_a < file_b`).
#[derive(Debug, Clone, Serialize)]
pub struct CouplingPair {
    pub file_a: String,
    pub file_b: String,
    pub shared_commits: usize,
    pub union_commits: usize,
    /// shared / union, in [0,1].
    pub jaccard: f64,
    /// shared / total commits in the window, in [0,1].
    pub support: f64,
}

/// Coupling pipeline output. Pairs are sorted by jaccard descending.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CouplingReport {
    pub pairs: Vec<CouplingPair>,
    pub total_commits: usize,
}

/// Compute temporal coupling pairs from a change stream.
///
/// Pairs must share at least two commits and have
/// `lift = P(A∩B) / (P(A)·P(B)) ≥ 1` — at-or-above the independence
/// line. (A strictly-greater cut would drop a file that never changes
/// without its partner whenever the partner also changes alone, which is
/// exactly the dependence this analysis exists to show.)
pub fn analyze(changes: &[FileChange]) -> CouplingReport {
    // Commit sets per file; BTreeMap so pair generation is lexicographic.
    let mut commits_per_file: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut files_per_commit: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for change in changes {
        commits_per_file
            .entry(change.path.as_str())
            .or_default()
            .insert(change.commit_id.as_str());
        files_per_commit
            .entry(change.commit_id.as_str())
            .or_default()
            .insert(change.path.as_str());
    }
    let total_commits = files_per_commit.len();
    if total_commits == 0 {
        return CouplingReport::default();
    }

    let mut shared: HashMap<(&str, &str), usize> = HashMap::new();
    for files in files_per_commit.values() {
        let files: Vec<&str> = files.iter().copied().collect();
        for i in 0..files.len() {
            for j in (i + 1)..files.len() {
                // BTreeSet iteration is sorted, so (i, j) is canonical.
                *shared.entry((files[i], files[j])).or_insert(0) += 1;
            }
        }
    }

    let total = total_commits as f64;
    let mut pairs: Vec<CouplingPair> = shared
        .into_iter()
        .filter(|&(_, count)| count >= MIN_SHARED)
        .filter_map(|((a, b), count)| {
            let commits_a = commits_per_file[a].len();
            let commits_b = commits_per_file[b].len();
            let union = commits_a + commits_b - count;
            let lift = (count as f64 * total) / (commits_a as f64 * commits_b as f64);
            if lift < 1.0 - 1e-9 {
                return None;
            }
            Some(CouplingPair {
                file_a: a.to_string(),
                file_b: b.to_string(),
                shared_commits: count,
                union_commits: union,
                jaccard: count as f64 / union as f64,
                support: count as f64 / total,
            })
        })
        .collect();

    pairs.sort_by(|x, y| {
        y.jaccard
            .partial_cmp(&x.jaccard)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| x.file_a.cmp(&y.file_a))
            .then_with(|| x.file_b.cmp(&y.file_b))
    });

    CouplingReport {
        pairs,
        total_commits,
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
