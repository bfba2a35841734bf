use std::collections::BTreeMap;

use serde::Serialize;

use crate::clusters::{ClusterReport, Label};
use crate::complexity::ComplexityReport;
use crate::effort::commit_density;
use crate::hotspots::HotspotReport;
use crate::knowledge::KnowledgeReport;
use crate::model::FileChange;
use crate::stats::{mean, minmax_normalize};

/// Cognitive-load factor weights.
const W_COMPLEXITY: f64 = 0.35;
const W_COORDINATION: f64 = 0.25;
const W_KNOWLEDGE: f64 = 0.25;
const W_CHANGE_RATE: f64 = 0.15;

/// DX-score component weights.
const W_THROUGHPUT: f64 = 0.3;
const W_FEEDBACK: f64 = 0.25;
const W_FOCUS: f64 = 0.25;
const W_COGNITIVE: f64 = 0.2;

/// Throughput value of a cluster label.
pub fn label_weight(label: Label) -> f64 {
    match label {
        Label::Feature => 1.0,
        Label::Refactoring => 0.8,
        Label::Bugfix | Label::Mixed => 0.5,
        Label::Config => 0.3,
    }
}

/// Cognitive-load factors for one file, all in [0,1].
#[derive(Debug, Clone, Serialize)]
pub struct FileCognitiveLoad {
    pub path: String,
    pub complexity_norm: f64,
    pub coordination_norm: f64,
    pub knowledge_norm: f64,
    pub change_rate_norm: f64,
    pub cognitive_load: f64,
}

/// DX pipeline output. All five headline numbers are in [0,1].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DXReport {
    pub throughput: f64,
    pub feedback: f64,
    pub focus: f64,
    pub cognitive_load: f64,
    pub dx_score: f64,
    pub files: Vec<FileCognitiveLoad>,
    /// Every weight that went into the score, for the run record.
    pub weights: BTreeMap<String, f64>,
}

/// Compose the DX overlay from the five upstream pipelines.
pub fn analyze(
    changes: &[FileChange],
    hotspots: &HotspotReport,
    knowledge: &KnowledgeReport,
    clusters: &ClusterReport,
    complexity: &ComplexityReport,
) -> DXReport {
    let throughput = throughput(clusters);
    let feedback = feedback(changes, hotspots);
    let focus = focus(clusters);
    let files = cognitive_load_files(changes, knowledge, complexity);
    let cognitive_load = mean(&files.iter().map(|f| f.cognitive_load).collect::<Vec<_>>());

    let dx_score = (W_THROUGHPUT * throughput
        + W_FEEDBACK * feedback
        + W_FOCUS * focus
        + W_COGNITIVE * (1.0 - cognitive_load))
        .clamp(0.0, 1.0);

    DXReport {
        throughput,
        feedback,
        focus,
        cognitive_load,
        dx_score,
        files,
        weights: weight_table(),
    }
}

/// Σ weight(label) · cluster share over the commit set, normalized by
/// the maximum label weight.
fn throughput(clusters: &ClusterReport) -> f64 {
    let total: usize = clusters.clusters.iter().map(|c| c.size).sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = clusters
        .clusters
        .iter()
        .map(|c| label_weight(c.label) * c.size as f64 / total as f64)
        .sum();
    let max_weight = Label::ALL
        .iter()
        .map(|&l| label_weight(l))
        .fold(0.0, f64::max);
    (weighted / max_weight).clamp(0.0, 1.0)
}

/// mean(commit density) × (1 − mean(rework ratio)) over files.
fn feedback(changes: &[FileChange], hotspots: &HotspotReport) -> f64 {
    let mut timestamps: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for change in changes {
        timestamps
            .entry(change.path.as_str())
            .or_default()
            .push(change.timestamp);
    }
    if timestamps.is_empty() {
        return 0.0;
    }
    let densities: Vec<f64> = timestamps.values().map(|ts| commit_density(ts)).collect();
    let reworks: Vec<f64> = hotspots.files.iter().map(|f| f.rework_ratio).collect();
    (mean(&densities) * (1.0 - mean(&reworks))).clamp(0.0, 1.0)
}

/// Feature share of the labeled (non-mixed) commits, read off the
/// per-commit cluster assignments; 0.5 when nothing is labeled.
fn focus(clusters: &ClusterReport) -> f64 {
    let mut feature = 0usize;
    let mut labeled = 0usize;
    for i in 0..clusters.assignments.len() {
        match clusters.commit_label(i) {
            Some(Label::Feature) => {
                feature += 1;
                labeled += 1;
            }
            Some(Label::Mixed) | None => {}
            Some(_) => labeled += 1,
        }
    }
    if labeled == 0 {
        return 0.5;
    }
    feature as f64 / labeled as f64
}

/// Per-file cognitive load over the union of changed and parsed files.
fn cognitive_load_files(
    changes: &[FileChange],
    knowledge: &KnowledgeReport,
    complexity: &ComplexityReport,
) -> Vec<FileCognitiveLoad> {
    let mut frequency: BTreeMap<&str, f64> = BTreeMap::new();
    for change in changes {
        *frequency.entry(change.path.as_str()).or_insert(0.0) += 1.0;
    }

    let mut complexity_by_file: BTreeMap<&str, f64> = BTreeMap::new();
    for f in &complexity.functions {
        *complexity_by_file.entry(f.file.as_str()).or_insert(0.0) += f.cyclomatic as f64;
    }

    let mut paths: Vec<&str> = frequency.keys().copied().collect();
    for path in complexity_by_file.keys() {
        if !frequency.contains_key(path) {
            paths.push(path);
        }
    }
    paths.sort_unstable();
    if paths.is_empty() {
        return Vec::new();
    }

    let kdi: BTreeMap<&str, f64> = knowledge
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.kdi))
        .collect();
    let authors: BTreeMap<&str, f64> = knowledge
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.authors.len() as f64))
        .collect();

    let get = |map: &BTreeMap<&str, f64>, p: &str| map.get(p).copied().unwrap_or(0.0);
    let mut complexity_n: Vec<f64> = paths.iter().map(|p| get(&complexity_by_file, p)).collect();
    let mut coordination_n: Vec<f64> = paths.iter().map(|p| get(&authors, p)).collect();
    let mut knowledge_n: Vec<f64> = paths.iter().map(|p| get(&kdi, p)).collect();
    let mut change_rate_n: Vec<f64> = paths.iter().map(|p| get(&frequency, p)).collect();
    minmax_normalize(&mut complexity_n);
    minmax_normalize(&mut coordination_n);
    minmax_normalize(&mut knowledge_n);
    minmax_normalize(&mut change_rate_n);

    paths
        .iter()
        .enumerate()
        .map(|(i, path)| FileCognitiveLoad {
            path: path.to_string(),
            complexity_norm: complexity_n[i],
            coordination_norm: coordination_n[i],
            knowledge_norm: knowledge_n[i],
            change_rate_norm: change_rate_n[i],
            cognitive_load: W_COMPLEXITY * complexity_n[i]
                + W_COORDINATION * coordination_n[i]
                + W_KNOWLEDGE * knowledge_n[i]
                + W_CHANGE_RATE * change_rate_n[i],
        })
        .collect()
}

fn weight_table() -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();
    weights.insert("throughput".to_string(), W_THROUGHPUT);
    weights.insert("feedback".to_string(), W_FEEDBACK);
    weights.insert("focus".to_string(), W_FOCUS);
    weights.insert("cognitive_load".to_string(), W_COGNITIVE);
    weights.insert("complexity".to_string(), W_COMPLEXITY);
    weights.insert("coordination".to_string(), W_COORDINATION);
    weights.insert("knowledge".to_string(), W_KNOWLEDGE);
    weights.insert("change_rate".to_string(), W_CHANGE_RATE);
    for label in Label::ALL {
        weights.insert(format!("label_{}", label.as_str()), label_weight(label));
    }
    weights
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
