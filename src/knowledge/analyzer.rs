use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::FileChange;
use crate::stats::{decay_weight, gini, shannon_entropy};
use crate::util::DAY_SECONDS;

/// Half-life for knowledge recency weighting, in days. Knowledge fades
/// slower than churn relevance, hence 90 rather than 30.
const KNOWLEDGE_HALF_LIFE_DAYS: f64 = 90.0;

/// A primary author above this share makes the file a knowledge island.
const ISLAND_THRESHOLD: f64 = 0.8;

/// One author's contribution to a file.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorContribution {
    pub author: String,
    pub churn: usize,
    pub weighted_churn: f64,
}

/// Knowledge metrics for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileKnowledge {
    pub path: String,
    /// Contributors sorted by weighted churn descending.
    pub authors: Vec<AuthorContribution>,
    pub primary_author: String,
    pub primary_pct: f64,
    /// 1 − normalized entropy of author shares; 1.0 for a single author.
    pub kdi: f64,
    pub is_island: bool,
}

/// Knowledge pipeline output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeReport {
    /// Files sorted by KDI descending, path ascending on ties.
    pub files: Vec<FileKnowledge>,
    /// Developer Risk Index: Gini coefficient of per-author weighted churn.
    pub dri: f64,
    /// Minimum number of authors covering 50 % of weighted churn.
    pub bus_factor_50: usize,
    pub author_count: usize,
}

/// Compute knowledge distribution from a change stream against a
/// reference time. An empty stream yields an empty report.
pub fn analyze(changes: &[FileChange], reference_time: i64) -> KnowledgeReport {
    let mut per_file: BTreeMap<&str, BTreeMap<&str, (usize, f64, f64)>> = BTreeMap::new();
    let mut per_author: BTreeMap<&str, f64> = BTreeMap::new();

    for change in changes {
        let age_days = (reference_time - change.timestamp) as f64 / DAY_SECONDS as f64;
        let weight = decay_weight(age_days, KNOWLEDGE_HALF_LIFE_DAYS);
        let weighted = weight * change.churn() as f64;
        let (churn, weighted_churn, weight_sum) = per_file
            .entry(change.path.as_str())
            .or_default()
            .entry(change.author.as_str())
            .or_insert((0, 0.0, 0.0));
        *churn += change.churn();
        *weighted_churn += weighted;
        *weight_sum += weight;
        *per_author.entry(change.author.as_str()).or_insert(0.0) += weighted;
    }

    let mut files: Vec<FileKnowledge> = per_file
        .into_iter()
        .map(|(path, authors)| file_knowledge(path, &authors))
        .collect();
    files.sort_by(|a, b| {
        b.kdi
            .partial_cmp(&a.kdi)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let author_totals: Vec<f64> = per_author.values().copied().collect();
    KnowledgeReport {
        files,
        dri: gini(&author_totals),
        bus_factor_50: bus_factor_50(&author_totals),
        author_count: author_totals.len(),
    }
}

/// Per-file knowledge metrics from per-author (churn, weighted churn,
/// weight-sum) accumulators. Zero-churn files fall back to commit-weight
/// shares so a touch-only history still attributes ownership.
fn file_knowledge(path: &str, authors: &BTreeMap<&str, (usize, f64, f64)>) -> FileKnowledge {
    let churn_total: f64 = authors.values().map(|&(_, wc, _)| wc).sum();
    let use_weights = churn_total <= 0.0;
    let total: f64 = if use_weights {
        authors.values().map(|&(_, _, w)| w).sum()
    } else {
        churn_total
    };

    let mut contributions: Vec<AuthorContribution> = authors
        .iter()
        .map(|(&author, &(churn, weighted_churn, weight_sum))| AuthorContribution {
            author: author.to_string(),
            churn,
            weighted_churn: if use_weights { weight_sum } else { weighted_churn },
        })
        .collect();
    contributions.sort_by(|a, b| {
        b.weighted_churn
            .partial_cmp(&a.weighted_churn)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let shares: Vec<f64> = contributions
        .iter()
        .map(|c| if total > 0.0 { c.weighted_churn / total } else { 0.0 })
        .collect();
    let n = contributions.len();
    let kdi = if n >= 2 {
        1.0 - shannon_entropy(&shares) / (n as f64).log2()
    } else {
        1.0
    };
    let primary_pct = shares.first().copied().unwrap_or(0.0);

    FileKnowledge {
        path: path.to_string(),
        primary_author: contributions
            .first()
            .map(|c| c.author.clone())
            .unwrap_or_default(),
        primary_pct,
        kdi: kdi.clamp(0.0, 1.0),
        is_island: primary_pct > ISLAND_THRESHOLD,
        authors: contributions,
    }
}

/// Minimum number of authors whose weighted churn covers half the total.
fn bus_factor_50(author_totals: &[f64]) -> usize {
    let total: f64 = author_totals.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let mut sorted = author_totals.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let mut cumulative = 0.0;
    for (i, v) in sorted.iter().enumerate() {
        cumulative += v;
        if cumulative >= total * 0.5 {
            return i + 1;
        }
    }
    sorted.len()
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
