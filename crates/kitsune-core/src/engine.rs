//! The progression engine: composition root for one companion.
//!
//! [`ProgressionEngine`] owns the skill tracker, achievement diary, mood
//! state machine, XP multiplier and a [`CycleScheduler`] with three fixed
//! events:
//!
//! | owner              | interval (default) | effect                          |
//! |--------------------|--------------------|---------------------------------|
//! | `mood`             | 10 ticks           | mood update with `general`      |
//! | `random_event`     | 100 ticks          | roll; XP Boost sets multiplier  |
//! | `multiplier_reset` | 600 ticks          | XP multiplier back to 1.0       |
//!
//! # Processing an interaction
//!
//! [`ProgressionEngine::process_interaction`] never suspends and runs in a
//! fixed order:
//!
//! 1. increment the interaction counter;
//! 2. classify the text into per-skill XP and award each positive amount
//!    times the current multiplier, collecting XP drops and level-ups;
//! 3. update the mood with the interaction type;
//! 4. check the achievement diary;
//! 5. roll for a random event, reported in the outcome but never touching
//!    the multiplier (only the scheduled roll applies an XP Boost);
//! 6. tick the scheduler once;
//! 7. derive tails, total level, mood and emotes for the outcome.

use chrono::{DateTime, Utc};
use kitsune_progression::random_events::roll_from;
use kitsune_progression::{
    AchievementTracker, InteractionClassifier, MoodTracker, ProgressionError, RANDOM_EVENTS,
    RandomEventDef, SkillTracker, available_emotes, unlocked_tails,
};
use kitsune_types::{
    InteractionOutcome, InteractionType, LevelUp, Mood, RandomEventKind, SessionId, SkillName,
    XpDrop,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::display::{self, DisplayState, MemoriesTab};
use crate::error::CoreError;
use crate::scheduler::{CycleScheduler, TickReport};
use crate::snapshot::{SNAPSHOT_VERSION, SessionSnapshot, SkillRecord};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for the engine's scheduled events and multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Ticks between scheduled mood updates.
    pub mood_update_interval: u64,
    /// Ticks between scheduled random event rolls.
    pub random_event_interval: u64,
    /// Ticks between multiplier resets.
    pub multiplier_reset_interval: u64,
    /// Multiplier set by an XP Boost.
    pub boost_multiplier: Decimal,
    /// Updates after which an unmatched interaction may drift the mood.
    pub mood_drift_after: u32,
    /// Random event catalog.
    pub random_events: &'static [RandomEventDef],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mood_update_interval: 10,
            random_event_interval: 100,
            multiplier_reset_interval: 600,
            boost_multiplier: Decimal::TWO,
            mood_drift_after: kitsune_progression::mood::DEFAULT_DRIFT_AFTER,
            random_events: &RANDOM_EVENTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// Mutable progression state, also the context handed to scheduled
/// callbacks.
#[derive(Debug, Clone)]
pub struct EngineState {
    skills: SkillTracker,
    achievements: AchievementTracker,
    mood: MoodTracker,
    multiplier: Decimal,
    interactions: u64,
    rng: SmallRng,
}

impl EngineState {
    fn new(config: &EngineConfig, rng: SmallRng) -> Self {
        Self {
            skills: SkillTracker::new(),
            achievements: AchievementTracker::new(),
            mood: MoodTracker::with_drift_after(config.mood_drift_after),
            multiplier: Decimal::ONE,
            interactions: 0,
            rng,
        }
    }

    /// Skill tracker.
    pub const fn skills(&self) -> &SkillTracker {
        &self.skills
    }

    /// Achievement tracker.
    pub const fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    /// Current mood.
    pub const fn mood(&self) -> Mood {
        self.mood.current()
    }

    /// Current XP multiplier.
    pub const fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    /// Interaction counter.
    pub const fn interactions(&self) -> u64 {
        self.interactions
    }

    fn roll_random_event(&mut self, catalog: &[RandomEventDef]) -> Option<RandomEventKind> {
        let event = roll_from(catalog, &mut self.rng)?;
        debug!(event = %event, "random event rolled");
        Some(event)
    }
}

// ---------------------------------------------------------------------------
// ProgressionEngine
// ---------------------------------------------------------------------------

/// Composition root owning all progression state for one session.
#[derive(Debug)]
pub struct ProgressionEngine {
    state: EngineState,
    scheduler: CycleScheduler<EngineState, CoreError>,
    classifier: InteractionClassifier,
    config: EngineConfig,
    session_id: SessionId,
    session_start: DateTime<Utc>,
}

impl ProgressionEngine {
    /// Fresh engine with default configuration and an OS-seeded random
    /// source.
    pub fn new() -> Self {
        Self::with_rng(EngineConfig::default(), SmallRng::from_rng(&mut rand::rng()))
    }

    /// Fresh engine with default configuration and a deterministic random
    /// source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(EngineConfig::default(), SmallRng::seed_from_u64(seed))
    }

    /// Fresh engine with explicit configuration and random source.
    pub fn with_rng(config: EngineConfig, rng: SmallRng) -> Self {
        let mut scheduler: CycleScheduler<EngineState, CoreError> = CycleScheduler::new();

        scheduler.add_event("mood", config.mood_update_interval, |state: &mut EngineState| {
            let mood = state.mood.update(InteractionType::General, &mut state.rng);
            debug!(mood = %mood, "scheduled mood update");
            Ok(())
        });

        let catalog = config.random_events;
        let boost = config.boost_multiplier;
        scheduler.add_event(
            "random_event",
            config.random_event_interval,
            move |state: &mut EngineState| {
                if state.roll_random_event(catalog) == Some(RandomEventKind::XpBoost) {
                    info!(multiplier = %boost, "XP boost active");
                    state.multiplier = boost;
                }
                Ok(())
            },
        );

        scheduler.add_event(
            "multiplier_reset",
            config.multiplier_reset_interval,
            |state: &mut EngineState| {
                if state.multiplier != Decimal::ONE {
                    debug!(from = %state.multiplier, "XP multiplier reset");
                }
                state.multiplier = Decimal::ONE;
                Ok(())
            },
        );

        let session_id = SessionId::new();
        info!(session_id = %session_id, "progression engine started");
        Self {
            state: EngineState::new(&config, rng),
            scheduler,
            classifier: InteractionClassifier::new(),
            config,
            session_id,
            session_start: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    /// Coarse type of a message.
    pub fn classify(&self, text: &str) -> InteractionType {
        self.classifier.classify(text)
    }

    /// Process one message of the given type.
    pub fn process_interaction(
        &mut self,
        interaction_type: InteractionType,
        text: &str,
    ) -> InteractionOutcome {
        self.state.interactions = self.state.interactions.saturating_add(1);
        let tails_before = unlocked_tails(self.state.skills.total_level());

        let mut xp_drops = Vec::new();
        let mut level_ups = Vec::new();
        for (skill, base) in self.classifier.skill_xp(text) {
            if base == 0 {
                continue;
            }
            match self.award_xp(skill, Decimal::from(base)) {
                Ok((drop, level_up)) => {
                    xp_drops.push(drop);
                    level_ups.extend(level_up);
                }
                Err(e) => warn!(skill = %skill, error = %e, "XP award skipped"),
            }
        }

        self.state
            .mood
            .update(interaction_type, &mut self.state.rng);

        let new_achievements = self
            .state
            .achievements
            .check_all(&self.state.skills, self.state.interactions);

        // Reported only; the multiplier belongs to the scheduled roll.
        let random_event = self.state.roll_random_event(self.config.random_events);

        let report = self.scheduler.tick(&mut self.state);

        let total_level = self.state.skills.total_level();
        let current_tails = unlocked_tails(total_level);
        let tail_unlocked = (current_tails > tails_before).then_some(current_tails);
        if let Some(tails) = tail_unlocked {
            info!(tails, total_level, "new tail unlocked");
        }

        debug!(
            interaction = self.state.interactions,
            interaction_type = %interaction_type,
            drops = xp_drops.len(),
            level_ups = level_ups.len(),
            cycle = report.cycle,
            "interaction processed"
        );

        InteractionOutcome {
            interaction: self.state.interactions,
            interaction_type,
            xp_drops,
            level_ups,
            new_achievements,
            random_event,
            tail_unlocked,
            current_tails,
            total_level,
            mood: self.state.mood.current(),
            available_emotes: available_emotes(total_level),
            cycle: report.cycle,
        }
    }

    /// Classify `text` and process it.
    pub fn process_message(&mut self, text: &str) -> InteractionOutcome {
        let interaction_type = self.classify(text);
        self.process_interaction(interaction_type, text)
    }

    /// Award `base` XP times the current multiplier to one skill.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Progression`] for negative or overflowing
    /// awards; nothing changes in that case.
    pub fn award_xp(
        &mut self,
        skill: SkillName,
        base: Decimal,
    ) -> Result<(XpDrop, Option<LevelUp>), CoreError> {
        let multiplier = self.state.multiplier;
        let amount = base
            .checked_mul(multiplier)
            .ok_or_else(|| ProgressionError::ArithmeticOverflow {
                context: format!("{base} x {multiplier} for {skill}"),
            })?;
        let level_up = self.state.skills.award(skill, amount, Decimal::ONE)?;
        if let Some(lu) = &level_up {
            info!(
                skill = %lu.skill,
                old_level = lu.old_level,
                new_level = lu.new_level,
                "level up"
            );
        }
        Ok((XpDrop { skill, amount }, level_up))
    }

    /// Advance the scheduler without an interaction.
    pub fn tick(&mut self) -> TickReport {
        self.scheduler.tick(&mut self.state)
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    /// Status line for the current state.
    pub fn status_line(&self) -> String {
        display::status_line(self.state.skills.total_level(), self.state.mood.current())
    }

    /// Every display tab as of `now`.
    pub fn display(&self, now: DateTime<Utc>) -> DisplayState {
        let total_level = self.state.skills.total_level();
        let session_seconds = now
            .signed_duration_since(self.session_start)
            .num_seconds()
            .max(0);
        DisplayState {
            status: self.status_line(),
            mood: self.state.mood.current(),
            skills: display::skills_tab(&self.state.skills),
            achievements: display::achievements_tab(&self.state.achievements),
            memories: MemoriesTab {
                total_interactions: self.state.interactions,
                session_seconds: u64::try_from(session_seconds).unwrap_or(0),
                achievements_earned: self.state.achievements.completed().len(),
            },
            emotes: display::emotes_tab(total_level),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Capture the persistent state at `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION.to_owned(),
            timestamp: now,
            skills: self
                .state
                .skills
                .iter()
                .map(|(name, skill)| {
                    (
                        name,
                        SkillRecord {
                            level: skill.level(),
                            xp: skill.xp(),
                        },
                    )
                })
                .collect(),
            total_interactions: self.state.interactions,
            achievements: self.state.achievements.completed().iter().copied().collect(),
            mood: self.state.mood.current(),
            session_start: self.session_start,
        }
    }

    /// Replace skills, interaction counter, achievements and mood with the
    /// snapshot's. Levels are recomputed from XP; the session start, the
    /// multiplier and the scheduler are left alone. The snapshot version is
    /// not checked.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.state.skills =
            SkillTracker::from_xp(snapshot.skills.iter().map(|(&name, rec)| (name, rec.xp)));
        self.state.interactions = snapshot.total_interactions;
        let mut achievements = AchievementTracker::new();
        achievements.restore(snapshot.achievements.iter().copied());
        self.state.achievements = achievements;
        self.state.mood.set_current(snapshot.mood);
        info!(
            version = %snapshot.version,
            interactions = snapshot.total_interactions,
            total_level = self.state.skills.total_level(),
            "progress restored"
        );
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Progression state.
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    /// Scheduler and its registered events.
    pub const fn scheduler(&self) -> &CycleScheduler<EngineState, CoreError> {
        &self.scheduler
    }

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Identifier of this session.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// When this session started.
    pub const fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Current tail count.
    pub fn tails(&self) -> u32 {
        unlocked_tails(self.state.skills.total_level())
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
