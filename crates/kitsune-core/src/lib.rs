//! Engine, scheduling and persistence for the Kitsune companion.
//!
//! This crate composes the rules from `kitsune-progression` into a single
//! [`ProgressionEngine`] driven one interaction at a time, and owns the two
//! on-disk documents: the progress snapshot and the user settings.
//!
//! # Modules
//!
//! - [`scheduler`] -- Tick-driven periodic callbacks
//! - [`engine`] -- The composition root and its fixed scheduled events
//! - [`display`] -- Status line and tab views
//! - [`snapshot`] -- Progress snapshot format, migration, and store
//! - [`settings`] -- User settings and their store
//! - [`error`] -- Snapshot, settings, and engine errors

pub mod display;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod settings;
pub mod snapshot;

pub use display::{DisplayState, status_line};
pub use engine::{EngineConfig, EngineState, ProgressionEngine};
pub use error::{CoreError, SettingsError, SnapshotError};
pub use scheduler::{CycleScheduler, ScheduledEvent, TickReport};
pub use settings::{RawSettings, Settings, SettingsStore, migrate_settings};
pub use snapshot::{RawSnapshot, SessionSnapshot, SnapshotStore, migrate_snapshot};
