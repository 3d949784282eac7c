//! Error types for the kitsune-core crate.
//!
//! Persistence failures carry the path they concern so the console can log
//! something actionable. None of these errors is fatal to a session: the
//! caller logs them and carries on with fresh or default state.

use std::path::PathBuf;

use kitsune_types::ParseError;

/// Errors reading or writing the session snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid snapshot document.
    #[error("snapshot JSON error at {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors reading, writing or editing settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Filesystem failure.
    #[error("settings I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid settings document.
    #[error("settings JSON error at {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A value entered in the settings menu was rejected.
    #[error("invalid setting: {0}")]
    Invalid(#[from] ParseError),
}

/// Top-level error for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Snapshot persistence failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Settings persistence failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A progression rule rejected an update.
    #[error(transparent)]
    Progression(#[from] kitsune_progression::ProgressionError),
}
