//! Mood: a small state machine driven by interaction types.
//!
//! Coding, question and creative interactions set the mood directly. Any
//! other interaction lets the mood drift: once more than
//! [`DEFAULT_DRIFT_AFTER`] updates have passed since the last drift, a
//! uniformly random mood is picked and the duration counter resets.
//!
//! Direct transitions do *not* reset the duration counter, so a run of
//! matched interactions followed by one unmatched interaction can still
//! trigger a drift.

use kitsune_types::{InteractionType, Mood};
use rand::Rng;
use tracing::debug;

/// Number of updates after which an unmatched interaction may drift the
/// mood (the drift fires when the counter *exceeds* this value).
pub const DEFAULT_DRIFT_AFTER: u32 = 10;

/// Direct mood for an interaction type, if it has one.
pub const fn mood_for(interaction: InteractionType) -> Option<Mood> {
    match interaction {
        InteractionType::Coding => Some(Mood::Focused),
        InteractionType::Question => Some(Mood::Helpful),
        InteractionType::Creative => Some(Mood::Playful),
        InteractionType::Analysis | InteractionType::Learning | InteractionType::General => None,
    }
}

/// Current mood plus the counters that drive random drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodTracker {
    current: Mood,
    duration: u32,
    interactions: u64,
    drift_after: u32,
}

impl MoodTracker {
    /// A curious companion with zeroed counters.
    pub const fn new() -> Self {
        Self::with_drift_after(DEFAULT_DRIFT_AFTER)
    }

    /// A tracker with a custom drift threshold.
    pub const fn with_drift_after(drift_after: u32) -> Self {
        Self {
            current: Mood::Curious,
            duration: 0,
            interactions: 0,
            drift_after,
        }
    }

    /// Advance the state machine by one interaction of the given type.
    ///
    /// Returns the mood after the update.
    pub fn update(&mut self, interaction: InteractionType, rng: &mut impl Rng) -> Mood {
        self.interactions = self.interactions.saturating_add(1);
        self.duration = self.duration.saturating_add(1);

        if let Some(mood) = mood_for(interaction) {
            self.current = mood;
        } else if self.duration > self.drift_after {
            let idx = rng.random_range(0..Mood::ALL.len());
            if let Some(&mood) = Mood::ALL.get(idx) {
                debug!(from = %self.current, to = %mood, "mood drifted");
                self.current = mood;
            }
            self.duration = 0;
        }
        self.current
    }

    /// Current mood.
    pub const fn current(&self) -> Mood {
        self.current
    }

    /// Replace the current mood (used when restoring a session).
    pub const fn set_current(&mut self, mood: Mood) {
        self.current = mood;
    }

    /// Updates since the last drift.
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Total updates seen.
    pub const fn interactions(&self) -> u64 {
        self.interactions
    }
}

impl Default for MoodTracker {
    fn default() -> Self {
        Self::new()
    }
}
