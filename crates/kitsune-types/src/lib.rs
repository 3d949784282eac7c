//! Shared type definitions for the Kitsune companion.
//!
//! This crate is the single source of truth for the closed vocabularies
//! (skills, moods, interaction types, achievements, cosmetics) and for the
//! result records the progression engine hands to the console front-end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sessions and scheduled events
//! - [`enums`] -- Closed enumerations with fixed wire labels
//! - [`events`] -- XP drops, level-ups, and per-interaction outcomes
//! - [`error`] -- Label parse errors

pub mod enums;
pub mod error;
pub mod events;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AchievementId, AchievementTier, EmoteId, FoxColor, InteractionType, Mood, RandomEventKind,
    SkillName,
};
pub use error::ParseError;
pub use events::{InteractionOutcome, LevelUp, ProgressEvent, XpDrop};
pub use ids::{ScheduledEventId, SessionId};
