//! Progression rules for the Kitsune companion.
//!
//! Everything in this crate is synchronous, deterministic given an injected
//! random source, and free of I/O. Catalog data (achievements, emotes,
//! keyword rules, random events) lives in immutable statics that the
//! trackers borrow.
//!
//! # Modules
//!
//! - [`curve`] -- Cumulative XP thresholds and level lookup
//! - [`skills`] -- Nine-skill tracker with level-up detection
//! - [`tails`] -- Tail count from total level
//! - [`achievements`] -- Achievement diary and tracker
//! - [`mood`] -- Mood state machine with random drift
//! - [`classifier`] -- Keyword rules for interaction type and per-skill XP
//! - [`emotes`] -- Emotes unlocked by total level
//! - [`random_events`] -- Rare conversation events
//! - [`celebration`] -- Level-up presentation records
//! - [`error`] -- Progression errors

pub mod achievements;
pub mod celebration;
pub mod classifier;
pub mod curve;
pub mod emotes;
pub mod error;
pub mod mood;
pub mod random_events;
pub mod skills;
pub mod tails;

pub use achievements::{ACHIEVEMENTS, AchievementDef, AchievementTracker, Condition};
pub use celebration::{Celebration, celebrate};
pub use classifier::InteractionClassifier;
pub use curve::{MAX_LEVEL, MIN_LEVEL, level_for_xp, progress_percent, xp_for_level};
pub use emotes::{EMOTES, EmoteDef, available_emotes};
pub use error::ProgressionError;
pub use mood::MoodTracker;
pub use random_events::{RANDOM_EVENTS, RandomEventDef};
pub use skills::{MAX_TOTAL_LEVEL, MIN_TOTAL_LEVEL, Skill, SkillTracker};
pub use tails::{MAX_TAILS, TAIL_THRESHOLDS, next_tail_threshold, unlocked_tails};
