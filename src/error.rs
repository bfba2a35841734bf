//! Error kinds shared across the engine.
//!
//! Five kinds, each with a distinct surfacing policy: `Input` is shown
//! verbatim to the user (exit 1), `Adapter` carries the failing path and
//! is retried once before surfacing, `Analysis` marks numerically
//! ill-conditioned systems, `Store` is fatal with no partial persist,
//! and `NotFound` is a typed lookup miss. Empty analysis inputs are NOT
//! errors — pipelines degrade to empty reports instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XrayError {
    /// Invalid window spec, unknown ref, non-repo path.
    #[error("{0}")]
    Input(String),

    /// Git adapter failure with the path (or ref) that triggered it.
    #[error("git adapter failed on '{path}': {source}")]
    Adapter {
        path: String,
        #[source]
        source: git2::Error,
    },

    /// Ill-conditioned numeric system (e.g. singular ridge matrix).
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// Run-store failure. Transactions roll back; nothing is persisted.
    #[error("run store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Run id lookup miss, returned as a typed result to the caller.
    #[error("run not found: {0}")]
    NotFound(String),
}

impl XrayError {
    /// Process exit code for this error kind: 1 for user errors,
    /// 2 for internal failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            XrayError::Input(_) | XrayError::NotFound(_) => 1,
            XrayError::Adapter { .. } | XrayError::Analysis(_) | XrayError::Store(_) => 2,
        }
    }
}

impl From<serde_json::Error> for XrayError {
    fn from(e: serde_json::Error) -> Self {
        XrayError::Analysis(format!("JSON encoding failed: {e}"))
    }
}

impl From<git2::Error> for XrayError {
    fn from(e: git2::Error) -> Self {
        XrayError::Adapter {
            path: String::new(),
            source: e,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XrayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(XrayError::Input("bad window".into()).exit_code(), 1);
        assert_eq!(XrayError::NotFound("abc".into()).exit_code(), 1);
        assert_eq!(XrayError::Analysis("singular".into()).exit_code(), 2);
    }

    #[test]
    fn input_error_is_verbatim() {
        let e = XrayError::Input("invalid --window value: '3x'".into());
        assert_eq!(e.to_string(), "invalid --window value: '3x'");
    }
}
