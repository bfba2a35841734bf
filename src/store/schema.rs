//! Run-store schema: one `runs` parent table plus eleven child tables
//! keyed by `(run_id, natural key)`. `cluster_drift` has no primary key
//! because duplicate labels are allowed.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS runs (
    run_id              TEXT PRIMARY KEY,
    repo_path           TEXT NOT NULL,
    window_days         INTEGER NOT NULL,
    started_at          TEXT NOT NULL,
    ended_at            TEXT NOT NULL,
    reference           TEXT,
    commit_count        INTEGER NOT NULL,
    file_count          INTEGER NOT NULL,
    author_count        INTEGER NOT NULL,
    total_churn         INTEGER NOT NULL,
    hotspot_file_count  INTEGER NOT NULL,
    pareto_50           INTEGER NOT NULL,
    pareto_80           INTEGER NOT NULL,
    pareto_90           INTEGER NOT NULL,
    max_hotspot         REAL NOT NULL,
    island_count        INTEGER NOT NULL,
    dri                 REAL NOT NULL,
    bus_factor_50       INTEGER NOT NULL,
    coupling_pair_count INTEGER NOT NULL,
    max_jaccard         REAL NOT NULL,
    mean_pain           REAL NOT NULL,
    max_pain            REAL NOT NULL,
    anemic_flagged      INTEGER NOT NULL,
    god_class_flagged   INTEGER NOT NULL,
    function_count      INTEGER NOT NULL,
    mean_cyclomatic     REAL NOT NULL,
    max_cognitive       INTEGER NOT NULL,
    cluster_k           INTEGER NOT NULL,
    silhouette          REAL NOT NULL,
    effort_alpha        REAL NOT NULL,
    effort_r_squared    REAL NOT NULL,
    dx_score            REAL NOT NULL,
    effort_coefficients TEXT NOT NULL,
    dx_weights          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hotspot_files (
    run_id        TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path     TEXT NOT NULL,
    frequency     INTEGER NOT NULL,
    churn         INTEGER NOT NULL,
    hotspot_score REAL NOT NULL,
    rework_ratio  REAL NOT NULL,
    PRIMARY KEY (run_id, file_path)
);

CREATE TABLE IF NOT EXISTS knowledge_files (
    run_id         TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path      TEXT NOT NULL,
    primary_author TEXT NOT NULL,
    primary_pct    REAL NOT NULL,
    kdi            REAL NOT NULL,
    is_island      INTEGER NOT NULL,
    author_count   INTEGER NOT NULL,
    PRIMARY KEY (run_id, file_path)
);

CREATE TABLE IF NOT EXISTS coupling_pairs (
    run_id         TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_a         TEXT NOT NULL,
    file_b         TEXT NOT NULL,
    shared_commits INTEGER NOT NULL,
    union_commits  INTEGER NOT NULL,
    jaccard        REAL NOT NULL,
    support        REAL NOT NULL,
    PRIMARY KEY (run_id, file_a, file_b)
);

CREATE TABLE IF NOT EXISTS file_pain (
    run_id          TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path       TEXT NOT NULL,
    size_norm       REAL NOT NULL,
    distance_norm   REAL NOT NULL,
    volatility_norm REAL NOT NULL,
    pain            REAL NOT NULL,
    PRIMARY KEY (run_id, file_path)
);

CREATE TABLE IF NOT EXISTS anemic_classes (
    run_id           TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path        TEXT NOT NULL,
    class_name       TEXT NOT NULL,
    fields           INTEGER NOT NULL,
    behavior_methods INTEGER NOT NULL,
    dbsi             REAL NOT NULL,
    orchestration    REAL NOT NULL,
    ams              REAL NOT NULL,
    touch_count      INTEGER NOT NULL,
    flagged          INTEGER NOT NULL,
    PRIMARY KEY (run_id, file_path, class_name)
);

CREATE TABLE IF NOT EXISTS complexity_functions (
    run_id        TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path     TEXT NOT NULL,
    function_name TEXT NOT NULL,
    line          INTEGER NOT NULL,
    cyclomatic    INTEGER NOT NULL,
    cognitive     INTEGER NOT NULL,
    max_nesting   INTEGER NOT NULL,
    branches      INTEGER NOT NULL,
    except_paths  INTEGER NOT NULL,
    length        INTEGER NOT NULL,
    PRIMARY KEY (run_id, file_path, function_name, line)
);

CREATE TABLE IF NOT EXISTS cluster_summaries (
    run_id            TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    cluster_id        INTEGER NOT NULL,
    size              INTEGER NOT NULL,
    centroid_files    REAL NOT NULL,
    centroid_churn    REAL NOT NULL,
    centroid_add_ratio REAL NOT NULL,
    label             TEXT NOT NULL,
    PRIMARY KEY (run_id, cluster_id)
);

CREATE TABLE IF NOT EXISTS cluster_drift (
    run_id     TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    label      TEXT NOT NULL,
    first_pct  REAL NOT NULL,
    second_pct REAL NOT NULL,
    drift      REAL NOT NULL,
    stable     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS effort_files (
    run_id        TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path     TEXT NOT NULL,
    rei           REAL NOT NULL,
    contributions TEXT NOT NULL,
    PRIMARY KEY (run_id, file_path)
);

CREATE TABLE IF NOT EXISTS dx_cognitive_files (
    run_id           TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path        TEXT NOT NULL,
    complexity_norm  REAL NOT NULL,
    coordination_norm REAL NOT NULL,
    knowledge_norm   REAL NOT NULL,
    change_rate_norm REAL NOT NULL,
    cognitive_load   REAL NOT NULL,
    PRIMARY KEY (run_id, file_path)
);

CREATE TABLE IF NOT EXISTS god_class_classes (
    run_id       TEXT NOT NULL REFERENCES runs(run_id) ON DELETE CASCADE,
    file_path    TEXT NOT NULL,
    class_name   TEXT NOT NULL,
    method_count INTEGER NOT NULL,
    field_count  INTEGER NOT NULL,
    wmc          INTEGER NOT NULL,
    tcc          REAL NOT NULL,
    gcs          REAL NOT NULL,
    flagged      INTEGER NOT NULL,
    PRIMARY KEY (run_id, file_path, class_name)
);

CREATE INDEX IF NOT EXISTS idx_runs_repo ON runs(repo_path, started_at);
";
