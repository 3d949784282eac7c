//! Typed result records produced by the progression engine.
//!
//! Processing one interaction can yield several XP drops, several level-ups
//! and several achievements at once. [`InteractionOutcome`] keeps each kind
//! in its own list; [`InteractionOutcome::events`] flattens them into a
//! single ordered stream of [`ProgressEvent`] values for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{AchievementId, EmoteId, InteractionType, Mood, RandomEventKind, SkillName};

/// XP awarded to one skill by one interaction (after the multiplier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpDrop {
    /// The skill that received the XP.
    pub skill: SkillName,
    /// Amount awarded.
    pub amount: Decimal,
}

/// A skill crossed one or more level boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// The skill that levelled.
    pub skill: SkillName,
    /// Level before the XP was applied.
    pub old_level: u32,
    /// Level after the XP was applied.
    pub new_level: u32,
    /// XP applied by the award that caused the level-up.
    pub xp_gained: Decimal,
}

/// One displayable event from an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// XP was awarded.
    XpDrop(XpDrop),
    /// A skill levelled up.
    LevelUp(LevelUp),
    /// The tail count grew.
    TailUnlocked {
        /// Tail count after the interaction.
        tails: u32,
    },
    /// An achievement was completed.
    AchievementUnlocked {
        /// The completed achievement.
        id: AchievementId,
    },
    /// A random event fired.
    RandomEvent {
        /// Which event fired.
        event: RandomEventKind,
    },
}

/// Everything that happened while processing one interaction, plus the
/// derived display state afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    /// Interaction counter after this interaction (1-based).
    pub interaction: u64,
    /// The coarse type the interaction was processed as.
    pub interaction_type: InteractionType,
    /// XP drops in award order.
    pub xp_drops: Vec<XpDrop>,
    /// Zero or more level-ups in award order.
    pub level_ups: Vec<LevelUp>,
    /// Newly completed achievements in diary order.
    pub new_achievements: Vec<AchievementId>,
    /// Random event rolled for this interaction, if any.
    pub random_event: Option<RandomEventKind>,
    /// New tail count when it grew during this interaction.
    pub tail_unlocked: Option<u32>,
    /// Tail count after the interaction (1..=9).
    pub current_tails: u32,
    /// Total level after the interaction (9..=891).
    pub total_level: u32,
    /// Mood after the interaction and the scheduler tick.
    pub mood: Mood,
    /// Emotes available at the new total level.
    pub available_emotes: Vec<EmoteId>,
    /// Scheduler cycle reached by this interaction.
    pub cycle: u64,
}

impl InteractionOutcome {
    /// Flatten the outcome into display order: XP drops, level-ups, tail
    /// unlock, achievements, random event.
    pub fn events(&self) -> Vec<ProgressEvent> {
        let mut events: Vec<ProgressEvent> = self
            .xp_drops
            .iter()
            .copied()
            .map(ProgressEvent::XpDrop)
            .collect();
        events.extend(self.level_ups.iter().copied().map(ProgressEvent::LevelUp));
        if let Some(tails) = self.tail_unlocked {
            events.push(ProgressEvent::TailUnlocked { tails });
        }
        events.extend(
            self.new_achievements
                .iter()
                .map(|&id| ProgressEvent::AchievementUnlocked { id }),
        );
        if let Some(event) = self.random_event {
            events.push(ProgressEvent::RandomEvent { event });
        }
        events
    }
}
