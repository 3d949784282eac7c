//! Achievement diary: one-shot milestones over skills and interactions.
//!
//! The diary is a static catalog of [`AchievementDef`] entries, each with a
//! declarative [`Condition`]. [`AchievementTracker::check_all`] evaluates the
//! still-unearned entries in catalog order and records every newly passing
//! one. The awarded set only ever grows; an earned achievement is never
//! evaluated or reported again.

use std::collections::{BTreeMap, BTreeSet};

use kitsune_types::{AchievementId, AchievementTier};
use tracing::info;

use crate::skills::SkillTracker;
use crate::tails::unlocked_tails;

/// Predicate that completes an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Interaction counter at least this value.
    Interactions(u64),
    /// Every skill at least this level.
    AllSkillsAtLeast(u32),
    /// Some skill at least this level.
    AnySkillAtLeast(u32),
    /// Total level at least this value.
    TotalLevelAtLeast(u32),
    /// Tail count at least this value.
    TailsAtLeast(u32),
}

impl Condition {
    /// Evaluate the predicate against the current state.
    pub fn is_met(self, skills: &SkillTracker, interactions: u64) -> bool {
        match self {
            Self::Interactions(n) => interactions >= n,
            Self::AllSkillsAtLeast(level) => skills.all_at_least(level),
            Self::AnySkillAtLeast(level) => skills.any_at_least(level),
            Self::TotalLevelAtLeast(total) => skills.total_level() >= total,
            Self::TailsAtLeast(tails) => unlocked_tails(skills.total_level()) >= tails,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    /// Stable identifier.
    pub id: AchievementId,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Prestige tier.
    pub tier: AchievementTier,
    /// Completion predicate.
    pub condition: Condition,
}

/// The diary, in evaluation order.
pub static ACHIEVEMENTS: [AchievementDef; 7] = [
    AchievementDef {
        id: AchievementId::FirstInteraction,
        name: "First Steps",
        description: "Have your first conversation",
        tier: AchievementTier::Bronze,
        condition: Condition::Interactions(1),
    },
    AchievementDef {
        id: AchievementId::Helpful100,
        name: "Helpful Fox",
        description: "Help with 100 tasks",
        tier: AchievementTier::Bronze,
        condition: Condition::Interactions(100),
    },
    AchievementDef {
        id: AchievementId::Level10All,
        name: "Balanced Growth",
        description: "Reach level 10 in all skills",
        tier: AchievementTier::Silver,
        condition: Condition::AllSkillsAtLeast(10),
    },
    AchievementDef {
        id: AchievementId::Level50Any,
        name: "Adept",
        description: "Reach level 50 in any skill",
        tier: AchievementTier::Silver,
        condition: Condition::AnySkillAtLeast(50),
    },
    AchievementDef {
        id: AchievementId::TotalLevel200,
        name: "Rising Star",
        description: "Reach total level 200",
        tier: AchievementTier::Gold,
        condition: Condition::TotalLevelAtLeast(200),
    },
    AchievementDef {
        id: AchievementId::Level99Any,
        name: "Master",
        description: "Reach level 99 in any skill",
        tier: AchievementTier::Dragon,
        condition: Condition::AnySkillAtLeast(99),
    },
    AchievementDef {
        id: AchievementId::AllTails,
        name: "Nine-Tailed Legend",
        description: "Unlock all 9 tails",
        tier: AchievementTier::Dragon,
        condition: Condition::TailsAtLeast(9),
    },
];

/// Look up the catalog entry for an achievement.
pub fn definition(id: AchievementId) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

/// Awarded achievements plus (currently unused) progress counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementTracker {
    catalog: &'static [AchievementDef],
    completed: BTreeSet<AchievementId>,
    progress: BTreeMap<AchievementId, u64>,
}

impl AchievementTracker {
    /// Create a tracker over the standard diary.
    pub fn new() -> Self {
        Self::with_catalog(&ACHIEVEMENTS)
    }

    /// Create a tracker over a custom catalog.
    pub const fn with_catalog(catalog: &'static [AchievementDef]) -> Self {
        Self {
            catalog,
            completed: BTreeSet::new(),
            progress: BTreeMap::new(),
        }
    }

    /// Evaluate every unearned achievement in catalog order.
    ///
    /// Returns the achievements completed by this call, in catalog order.
    pub fn check_all(&mut self, skills: &SkillTracker, interactions: u64) -> Vec<AchievementId> {
        let mut newly_completed = Vec::new();
        for def in self.catalog {
            if self.completed.contains(&def.id) {
                continue;
            }
            if def.condition.is_met(skills, interactions) {
                info!(achievement = %def.id, name = def.name, "achievement unlocked");
                self.completed.insert(def.id);
                newly_completed.push(def.id);
            }
        }
        newly_completed
    }

    /// Mark achievements as already earned (used when restoring a session).
    pub fn restore<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = AchievementId>,
    {
        self.completed.extend(ids);
    }

    /// Whether an achievement has been earned.
    pub fn is_completed(&self, id: AchievementId) -> bool {
        self.completed.contains(&id)
    }

    /// Earned achievements in canonical order.
    pub const fn completed(&self) -> &BTreeSet<AchievementId> {
        &self.completed
    }

    /// Catalog entries not yet earned, in catalog order.
    pub fn available(&self) -> Vec<AchievementId> {
        self.catalog
            .iter()
            .map(|def| def.id)
            .filter(|id| !self.completed.contains(id))
            .collect()
    }

    /// In-progress counters.
    pub const fn progress(&self) -> &BTreeMap<AchievementId, u64> {
        &self.progress
    }
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::curve::xp_for_level;
    use kitsune_types::SkillName;

    fn skills_at(level: u32) -> SkillTracker {
        let xp = Decimal::from(xp_for_level(level));
        SkillTracker::from_xp(SkillName::ALL.iter().map(|&name| (name, xp)))
    }

    #[test]
    fn catalog_order_matches_ids() {
        let ids: Vec<AchievementId> = ACHIEVEMENTS.iter().map(|d| d.id).collect();
        assert_eq!(ids, AchievementId::ALL.to_vec());
    }

    #[test]
    fn nothing_before_first_interaction() {
        let mut tracker = AchievementTracker::new();
        assert!(tracker.check_all(&SkillTracker::new(), 0).is_empty());
    }

    #[test]
    fn first_interaction_awarded_once() {
        let mut tracker = AchievementTracker::new();
        let skills = SkillTracker::new();
        assert_eq!(
            tracker.check_all(&skills, 1),
            vec![AchievementId::FirstInteraction]
        );
        assert!(tracker.check_all(&skills, 2).is_empty());
        assert!(tracker.is_completed(AchievementId::FirstInteraction));
    }

    #[test]
    fn several_awarded_in_evaluation_order() {
        let mut tracker = AchievementTracker::new();
        let skills = skills_at(25); // total 225
        assert_eq!(
            tracker.check_all(&skills, 100),
            vec![
                AchievementId::FirstInteraction,
                AchievementId::Helpful100,
                AchievementId::Level10All,
                AchievementId::TotalLevel200,
            ]
        );
    }

    #[test]
    fn maxed_skills_complete_the_diary() {
        let mut tracker = AchievementTracker::new();
        let awarded = tracker.check_all(&skills_at(99), 100);
        assert_eq!(awarded, AchievementId::ALL.to_vec());
        assert!(tracker.available().is_empty());
    }

    #[test]
    fn any_skill_condition() {
        let mut tracker = AchievementTracker::new();
        let skills = SkillTracker::from_xp([(
            SkillName::Analysis,
            Decimal::from(xp_for_level(50)),
        )]);
        let awarded = tracker.check_all(&skills, 0);
        assert_eq!(awarded, vec![AchievementId::Level50Any]);
    }

    #[test]
    fn awarded_set_only_grows() {
        let mut tracker = AchievementTracker::new();
        let states = [
            (skills_at(12), 5_u64),
            (SkillTracker::new(), 0),
            (skills_at(30), 150),
            (SkillTracker::new(), 1),
        ];
        let mut before = tracker.completed().clone();
        for (skills, interactions) in &states {
            let _ = tracker.check_all(skills, *interactions);
            let after = tracker.completed().clone();
            assert!(after.is_superset(&before));
            before = after;
        }
    }

    #[test]
    fn restored_achievements_are_not_reemitted() {
        let mut tracker = AchievementTracker::new();
        tracker.restore([AchievementId::FirstInteraction]);
        assert!(tracker.check_all(&SkillTracker::new(), 3).is_empty());
        assert_eq!(tracker.available().len(), 6);
    }

    #[test]
    fn definition_lookup() {
        let def = definition(AchievementId::AllTails);
        assert_eq!(def.map(|d| d.name), Some("Nine-Tailed Legend"));
        assert_eq!(def.map(|d| d.tier), Some(AchievementTier::Dragon));
    }

    #[test]
    fn progress_counters_start_empty() {
        assert!(AchievementTracker::new().progress().is_empty());
    }
}
