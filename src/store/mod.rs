//! Run store — embedded SQLite persistence for analysis snapshots.
//!
//! One `runs` row per analysis plus eleven child tables keyed by
//! `(run_id, natural key)`. `save` is transactional: either the whole
//! snapshot lands or nothing does. Reads return the same row values that
//! were written, so a persisted run round-trips by value.

mod compare;
mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use serde::Serialize;

use crate::anemic::AnemicReport;
use crate::clusters::ClusterReport;
use crate::complexity::ComplexityReport;
use crate::coupling::{CouplingReport, PainReport};
use crate::dx::DXReport;
use crate::effort::EffortReport;
use crate::error::{Result, XrayError};
use crate::godclass::GodClassReport;
use crate::hotspots::HotspotReport;
use crate::knowledge::KnowledgeReport;

pub use compare::{ComparisonStatus, RowDelta, RunComparison};

/// Parent row: scalar summaries of one analysis run, plus the two JSON
/// blobs (effort coefficients and DX weights).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub run_id: String,
    pub repo_path: String,
    pub window_days: u32,
    pub started_at: String,
    pub ended_at: String,
    pub reference: Option<String>,
    pub commit_count: i64,
    pub file_count: i64,
    pub author_count: i64,
    pub total_churn: i64,
    pub hotspot_file_count: i64,
    pub pareto_50: i64,
    pub pareto_80: i64,
    pub pareto_90: i64,
    pub max_hotspot: f64,
    pub island_count: i64,
    pub dri: f64,
    pub bus_factor_50: i64,
    pub coupling_pair_count: i64,
    pub max_jaccard: f64,
    pub mean_pain: f64,
    pub max_pain: f64,
    pub anemic_flagged: i64,
    pub god_class_flagged: i64,
    pub function_count: i64,
    pub mean_cyclomatic: f64,
    pub max_cognitive: i64,
    pub cluster_k: i64,
    pub silhouette: f64,
    pub effort_alpha: f64,
    pub effort_r_squared: f64,
    pub dx_score: f64,
    pub effort_coefficients: String,
    pub dx_weights: String,
}

/// The full report bundle persisted with a run.
#[derive(Debug, Clone, Default)]
pub struct RunReports {
    pub hotspots: HotspotReport,
    pub knowledge: KnowledgeReport,
    pub coupling: CouplingReport,
    pub pain: PainReport,
    pub complexity: ComplexityReport,
    pub anemic: AnemicReport,
    pub godclass: GodClassReport,
    pub clusters: ClusterReport,
    pub effort: EffortReport,
    pub dx: DXReport,
}

/// Stored knowledge projection (the per-author breakdown stays in the
/// report; the store keeps the per-file summary).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeRow {
    pub file_path: String,
    pub primary_author: String,
    pub primary_pct: f64,
    pub kdi: f64,
    pub is_island: bool,
    pub author_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotRow {
    pub file_path: String,
    pub frequency: i64,
    pub churn: i64,
    pub hotspot_score: f64,
    pub rework_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouplingRow {
    pub file_a: String,
    pub file_b: String,
    pub shared_commits: i64,
    pub union_commits: i64,
    pub jaccard: f64,
    pub support: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PainRow {
    pub file_path: String,
    pub size_norm: f64,
    pub distance_norm: f64,
    pub volatility_norm: f64,
    pub pain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnemicRow {
    pub file_path: String,
    pub class_name: String,
    pub fields: i64,
    pub behavior_methods: i64,
    pub dbsi: f64,
    pub orchestration: f64,
    pub ams: f64,
    pub touch_count: i64,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityRow {
    pub file_path: String,
    pub function_name: String,
    pub line: i64,
    pub cyclomatic: i64,
    pub cognitive: i64,
    pub max_nesting: i64,
    pub branches: i64,
    pub except_paths: i64,
    pub length: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRow {
    pub cluster_id: i64,
    pub size: i64,
    pub centroid_files: f64,
    pub centroid_churn: f64,
    pub centroid_add_ratio: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftRow {
    pub label: String,
    pub first_pct: f64,
    pub second_pct: f64,
    pub drift: f64,
    pub stable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffortRow {
    pub file_path: String,
    pub rei: f64,
    /// JSON object of per-feature contributions.
    pub contributions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DxCognitiveRow {
    pub file_path: String,
    pub complexity_norm: f64,
    pub coordination_norm: f64,
    pub knowledge_norm: f64,
    pub change_rate_norm: f64,
    pub cognitive_load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GodClassRow {
    pub file_path: String,
    pub class_name: String,
    pub method_count: i64,
    pub field_count: i64,
    pub wmc: i64,
    pub tcc: f64,
    pub gcs: f64,
    pub flagged: bool,
}

/// Handle to the embedded store. One handle per orchestrator instance;
/// the connection closes with the handle.
pub struct RunStore {
    conn: Connection,
}

impl RunStore {
    /// Default database location: `~/.git-xrays/runs.db`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".git-xrays")
            .join("runs.db")
    }

    /// Open (and migrate) a store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                XrayError::Input(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Persist a run and its reports in a single transaction.
    pub fn save(&mut self, run: &Run, reports: &RunReports) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,
             ?18,?19,?20,?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,?32,?33,?34)",
            params![
                run.run_id,
                run.repo_path,
                run.window_days,
                run.started_at,
                run.ended_at,
                run.reference,
                run.commit_count,
                run.file_count,
                run.author_count,
                run.total_churn,
                run.hotspot_file_count,
                run.pareto_50,
                run.pareto_80,
                run.pareto_90,
                run.max_hotspot,
                run.island_count,
                run.dri,
                run.bus_factor_50,
                run.coupling_pair_count,
                run.max_jaccard,
                run.mean_pain,
                run.max_pain,
                run.anemic_flagged,
                run.god_class_flagged,
                run.function_count,
                run.mean_cyclomatic,
                run.max_cognitive,
                run.cluster_k,
                run.silhouette,
                run.effort_alpha,
                run.effort_r_squared,
                run.dx_score,
                run.effort_coefficients,
                run.dx_weights,
            ],
        )?;

        for f in &reports.hotspots.files {
            tx.execute(
                "INSERT INTO hotspot_files VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    run.run_id,
                    f.path,
                    f.frequency as i64,
                    f.churn as i64,
                    f.hotspot_score,
                    f.rework_ratio
                ],
            )?;
        }
        for f in &reports.knowledge.files {
            tx.execute(
                "INSERT INTO knowledge_files VALUES (?1,?2,?3,?4,?5,?6,?7)",
                params![
                    run.run_id,
                    f.path,
                    f.primary_author,
                    f.primary_pct,
                    f.kdi,
                    f.is_island,
                    f.authors.len() as i64
                ],
            )?;
        }
        for p in &reports.coupling.pairs {
            tx.execute(
                "INSERT INTO coupling_pairs VALUES (?1,?2,?3,?4,?5,?6,?7)",
                params![
                    run.run_id,
                    p.file_a,
                    p.file_b,
                    p.shared_commits as i64,
                    p.union_commits as i64,
                    p.jaccard,
                    p.support
                ],
            )?;
        }
        for f in &reports.pain.files {
            tx.execute(
                "INSERT INTO file_pain VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    run.run_id,
                    f.path,
                    f.size_norm,
                    f.distance_norm,
                    f.volatility_norm,
                    f.pain
                ],
            )?;
        }
        for c in &reports.anemic.classes {
            tx.execute(
                "INSERT INTO anemic_classes VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
                params![
                    run.run_id,
                    c.file,
                    c.name,
                    c.fields as i64,
                    c.behavior_methods as i64,
                    c.dbsi,
                    c.orchestration,
                    c.ams,
                    c.touch_count as i64,
                    c.flagged
                ],
            )?;
        }
        for f in &reports.complexity.functions {
            tx.execute(
                "INSERT INTO complexity_functions VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
                params![
                    run.run_id,
                    f.file,
                    f.name,
                    f.line as i64,
                    f.cyclomatic as i64,
                    f.cognitive as i64,
                    f.max_nesting as i64,
                    f.branches as i64,
                    f.except_paths as i64,
                    f.length as i64
                ],
            )?;
        }
        for c in &reports.clusters.clusters {
            tx.execute(
                "INSERT INTO cluster_summaries VALUES (?1,?2,?3,?4,?5,?6,?7)",
                params![
                    run.run_id,
                    c.id as i64,
                    c.size as i64,
                    c.centroid.first().copied().unwrap_or(0.0),
                    c.centroid.get(1).copied().unwrap_or(0.0),
                    c.centroid.get(2).copied().unwrap_or(0.0),
                    c.label.as_str()
                ],
            )?;
        }
        for d in &reports.clusters.drift {
            tx.execute(
                "INSERT INTO cluster_drift VALUES (?1,?2,?3,?4,?5,?6)",
                params![
                    run.run_id,
                    d.label.as_str(),
                    d.first_pct,
                    d.second_pct,
                    d.drift,
                    d.stable
                ],
            )?;
        }
        for f in &reports.effort.files {
            let contributions = serde_json::to_string(&f.contributions)
                .map_err(|e| XrayError::Analysis(format!("JSON encoding failed: {e}")))?;
            tx.execute(
                "INSERT INTO effort_files VALUES (?1,?2,?3,?4)",
                params![run.run_id, f.path, f.rei, contributions],
            )?;
        }
        for f in &reports.dx.files {
            tx.execute(
                "INSERT INTO dx_cognitive_files VALUES (?1,?2,?3,?4,?5,?6,?7)",
                params![
                    run.run_id,
                    f.path,
                    f.complexity_norm,
                    f.coordination_norm,
                    f.knowledge_norm,
                    f.change_rate_norm,
                    f.cognitive_load
                ],
            )?;
        }
        for c in &reports.godclass.classes {
            tx.execute(
                "INSERT INTO god_class_classes VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
                params![
                    run.run_id,
                    c.file,
                    c.name,
                    c.method_count as i64,
                    c.field_count as i64,
                    c.wmc as i64,
                    c.tcc,
                    c.gcs,
                    c.flagged
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Distinct repositories with at least one run.
    pub fn list_repos(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT repo_path FROM runs ORDER BY repo_path")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    /// Runs for one repository, oldest first.
    pub fn list_runs(&self, repo_path: &str) -> Result<Vec<Run>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM runs WHERE repo_path = ?1 ORDER BY started_at, run_id",
        )?;
        let rows = stmt.query_map([repo_path], run_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<Run>>>()?)
    }

    /// Fetch one run by id; a miss is a typed `NotFound`.
    pub fn get_run(&self, run_id: &str) -> Result<Run> {
        let mut stmt = self.conn.prepare("SELECT * FROM runs WHERE run_id = ?1")?;
        let mut rows = stmt.query_map([run_id], run_from_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(XrayError::NotFound(run_id.to_string())),
        }
    }

    fn ensure_run(&self, run_id: &str) -> Result<()> {
        self.get_run(run_id).map(|_| ())
    }

    pub fn get_hotspot_files(&self, run_id: &str) -> Result<Vec<HotspotRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, frequency, churn, hotspot_score, rework_ratio
             FROM hotspot_files WHERE run_id = ?1 ORDER BY hotspot_score DESC, file_path",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(HotspotRow {
                file_path: row.get(0)?,
                frequency: row.get(1)?,
                churn: row.get(2)?,
                hotspot_score: row.get(3)?,
                rework_ratio: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_knowledge_files(&self, run_id: &str) -> Result<Vec<KnowledgeRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, primary_author, primary_pct, kdi, is_island, author_count
             FROM knowledge_files WHERE run_id = ?1 ORDER BY kdi DESC, file_path",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(KnowledgeRow {
                file_path: row.get(0)?,
                primary_author: row.get(1)?,
                primary_pct: row.get(2)?,
                kdi: row.get(3)?,
                is_island: row.get(4)?,
                author_count: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_coupling_pairs(&self, run_id: &str) -> Result<Vec<CouplingRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_a, file_b, shared_commits, union_commits, jaccard, support
             FROM coupling_pairs WHERE run_id = ?1 ORDER BY jaccard DESC, file_a, file_b",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(CouplingRow {
                file_a: row.get(0)?,
                file_b: row.get(1)?,
                shared_commits: row.get(2)?,
                union_commits: row.get(3)?,
                jaccard: row.get(4)?,
                support: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_file_pain(&self, run_id: &str) -> Result<Vec<PainRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, size_norm, distance_norm, volatility_norm, pain
             FROM file_pain WHERE run_id = ?1 ORDER BY pain DESC, file_path",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(PainRow {
                file_path: row.get(0)?,
                size_norm: row.get(1)?,
                distance_norm: row.get(2)?,
                volatility_norm: row.get(3)?,
                pain: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_anemic_classes(&self, run_id: &str) -> Result<Vec<AnemicRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, class_name, fields, behavior_methods, dbsi, orchestration, ams,
                    touch_count, flagged
             FROM anemic_classes WHERE run_id = ?1 ORDER BY ams DESC, file_path, class_name",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(AnemicRow {
                file_path: row.get(0)?,
                class_name: row.get(1)?,
                fields: row.get(2)?,
                behavior_methods: row.get(3)?,
                dbsi: row.get(4)?,
                orchestration: row.get(5)?,
                ams: row.get(6)?,
                touch_count: row.get(7)?,
                flagged: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_complexity_functions(&self, run_id: &str) -> Result<Vec<ComplexityRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, function_name, line, cyclomatic, cognitive, max_nesting,
                    branches, except_paths, length
             FROM complexity_functions WHERE run_id = ?1
             ORDER BY cyclomatic DESC, file_path, line",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(ComplexityRow {
                file_path: row.get(0)?,
                function_name: row.get(1)?,
                line: row.get(2)?,
                cyclomatic: row.get(3)?,
                cognitive: row.get(4)?,
                max_nesting: row.get(5)?,
                branches: row.get(6)?,
                except_paths: row.get(7)?,
                length: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_cluster_summaries(&self, run_id: &str) -> Result<Vec<ClusterRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT cluster_id, size, centroid_files, centroid_churn, centroid_add_ratio, label
             FROM cluster_summaries WHERE run_id = ?1 ORDER BY cluster_id",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(ClusterRow {
                cluster_id: row.get(0)?,
                size: row.get(1)?,
                centroid_files: row.get(2)?,
                centroid_churn: row.get(3)?,
                centroid_add_ratio: row.get(4)?,
                label: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_cluster_drift(&self, run_id: &str) -> Result<Vec<DriftRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT label, first_pct, second_pct, drift, stable
             FROM cluster_drift WHERE run_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(DriftRow {
                label: row.get(0)?,
                first_pct: row.get(1)?,
                second_pct: row.get(2)?,
                drift: row.get(3)?,
                stable: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_effort_files(&self, run_id: &str) -> Result<Vec<EffortRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, rei, contributions
             FROM effort_files WHERE run_id = ?1 ORDER BY rei DESC, file_path",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(EffortRow {
                file_path: row.get(0)?,
                rei: row.get(1)?,
                contributions: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_dx_cognitive_files(&self, run_id: &str) -> Result<Vec<DxCognitiveRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, complexity_norm, coordination_norm, knowledge_norm,
                    change_rate_norm, cognitive_load
             FROM dx_cognitive_files WHERE run_id = ?1 ORDER BY cognitive_load DESC, file_path",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(DxCognitiveRow {
                file_path: row.get(0)?,
                complexity_norm: row.get(1)?,
                coordination_norm: row.get(2)?,
                knowledge_norm: row.get(3)?,
                change_rate_norm: row.get(4)?,
                cognitive_load: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_god_class_classes(&self, run_id: &str) -> Result<Vec<GodClassRow>> {
        self.ensure_run(run_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT file_path, class_name, method_count, field_count, wmc, tcc, gcs, flagged
             FROM god_class_classes WHERE run_id = ?1 ORDER BY gcs DESC, file_path, class_name",
        )?;
        let rows = stmt.query_map([run_id], |row| {
            Ok(GodClassRow {
                file_path: row.get(0)?,
                class_name: row.get(1)?,
                method_count: row.get(2)?,
                field_count: row.get(3)?,
                wmc: row.get(4)?,
                tcc: row.get(5)?,
                gcs: row.get(6)?,
                flagged: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Compare two persisted runs row-by-row. Ordered by `started_at`,
    /// so A is the earlier run regardless of argument order in storage.
    pub fn compare(&self, run_a: &str, run_b: &str) -> Result<RunComparison> {
        compare::compare(self, run_a, run_b)
    }
}

fn run_from_row(row: &rusqlite::Row) -> rusqlite::Result<Run> {
    Ok(Run {
        run_id: row.get(0)?,
        repo_path: row.get(1)?,
        window_days: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
        reference: row.get(5)?,
        commit_count: row.get(6)?,
        file_count: row.get(7)?,
        author_count: row.get(8)?,
        total_churn: row.get(9)?,
        hotspot_file_count: row.get(10)?,
        pareto_50: row.get(11)?,
        pareto_80: row.get(12)?,
        pareto_90: row.get(13)?,
        max_hotspot: row.get(14)?,
        island_count: row.get(15)?,
        dri: row.get(16)?,
        bus_factor_50: row.get(17)?,
        coupling_pair_count: row.get(18)?,
        max_jaccard: row.get(19)?,
        mean_pain: row.get(20)?,
        max_pain: row.get(21)?,
        anemic_flagged: row.get(22)?,
        god_class_flagged: row.get(23)?,
        function_count: row.get(24)?,
        mean_cyclomatic: row.get(25)?,
        max_cognitive: row.get(26)?,
        cluster_k: row.get(27)?,
        silhouette: row.get(28)?,
        effort_alpha: row.get(29)?,
        effort_r_squared: row.get(30)?,
        dx_score: row.get(31)?,
        effort_coefficients: row.get(32)?,
        dx_weights: row.get(33)?,
    })
}

impl Run {
    /// Build the scalar summary row from a report bundle.
    #[allow(clippy::too_many_arguments)]
    pub fn summarize(
        run_id: String,
        repo_path: String,
        window_days: u32,
        started_at: String,
        ended_at: String,
        reference: Option<String>,
        commit_count: usize,
        reports: &RunReports,
    ) -> Result<Self> {
        let max_or_zero = |values: &mut dyn Iterator<Item = f64>| values.fold(0.0, f64::max);

        let effort_coefficients = serde_json::to_string(&reports.effort.coefficients)
            .map_err(|e| XrayError::Analysis(format!("JSON encoding failed: {e}")))?;
        let dx_weights = serde_json::to_string(&reports.dx.weights)
            .map_err(|e| XrayError::Analysis(format!("JSON encoding failed: {e}")))?;

        Ok(Run {
            run_id,
            repo_path,
            window_days,
            started_at,
            ended_at,
            reference,
            commit_count: commit_count as i64,
            file_count: reports.pain.files.len().max(reports.hotspots.files.len()) as i64,
            author_count: reports.knowledge.author_count as i64,
            total_churn: reports.hotspots.total_churn as i64,
            hotspot_file_count: reports.hotspots.files.len() as i64,
            pareto_50: reports.hotspots.pareto.files_for_50_pct as i64,
            pareto_80: reports.hotspots.pareto.files_for_80_pct as i64,
            pareto_90: reports.hotspots.pareto.files_for_90_pct as i64,
            max_hotspot: max_or_zero(&mut reports.hotspots.files.iter().map(|f| f.hotspot_score)),
            island_count: reports.knowledge.files.iter().filter(|f| f.is_island).count() as i64,
            dri: reports.knowledge.dri,
            bus_factor_50: reports.knowledge.bus_factor_50 as i64,
            coupling_pair_count: reports.coupling.pairs.len() as i64,
            max_jaccard: max_or_zero(&mut reports.coupling.pairs.iter().map(|p| p.jaccard)),
            mean_pain: crate::stats::mean(
                &reports.pain.files.iter().map(|f| f.pain).collect::<Vec<_>>(),
            ),
            max_pain: max_or_zero(&mut reports.pain.files.iter().map(|f| f.pain)),
            anemic_flagged: reports.anemic.flagged_count as i64,
            god_class_flagged: reports.godclass.flagged_count as i64,
            function_count: reports.complexity.functions.len() as i64,
            mean_cyclomatic: reports.complexity.mean_cyclomatic,
            max_cognitive: reports.complexity.max_cognitive as i64,
            cluster_k: reports.clusters.k as i64,
            silhouette: reports.clusters.silhouette,
            effort_alpha: reports.effort.alpha,
            effort_r_squared: reports.effort.r_squared,
            dx_score: reports.dx.dx_score,
            effort_coefficients,
            dx_weights,
        })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
