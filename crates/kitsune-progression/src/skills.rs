//! Skill tracking: per-skill XP, derived levels, and level-up events.
//!
//! The tracker always holds exactly the nine [`SkillName`] entries. A
//! skill's level is never stored independently of its XP: every mutation
//! recomputes it through [`level_for_xp`], so the two can never disagree.
//!
//! # Awarding XP
//!
//! An award is `amount * multiplier`. Awards to names that are not one of
//! the nine skills are ignored ([`SkillTracker::apply_xp`] returns `None`
//! and nothing changes). When the new level is higher than the old one a
//! [`LevelUp`] is returned; a single interaction may award several skills
//! and therefore produce several level-ups.

use std::collections::BTreeMap;
use std::str::FromStr;

use kitsune_types::{LevelUp, SkillName};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::curve::{MAX_LEVEL, MIN_LEVEL, level_for_xp};
use crate::error::ProgressionError;

/// Lowest possible total level (nine skills at level 1).
pub const MIN_TOTAL_LEVEL: u32 = 9;

/// Highest possible total level (nine skills at level 99).
pub const MAX_TOTAL_LEVEL: u32 = 891;

/// Parse a skill display name (case-sensitive).
///
/// # Errors
///
/// Returns [`ProgressionError::UnknownSkill`] for any other string.
pub fn parse_skill(name: &str) -> Result<SkillName, ProgressionError> {
    SkillName::from_str(name).map_err(|_| ProgressionError::UnknownSkill(name.to_owned()))
}

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

/// XP and derived level of one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    level: u32,
    xp: Decimal,
}

impl Skill {
    /// A skill with no XP, at level 1.
    pub const fn fresh() -> Self {
        Self {
            level: MIN_LEVEL,
            xp: Decimal::ZERO,
        }
    }

    /// A skill holding `xp`, with its level derived from the curve.
    ///
    /// Negative XP is clamped to zero.
    pub fn from_xp(xp: Decimal) -> Self {
        let xp = xp.max(Decimal::ZERO);
        Self {
            level: level_for_xp(xp),
            xp,
        }
    }

    /// Current level (1..=99).
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Accumulated XP.
    pub const fn xp(&self) -> Decimal {
        self.xp
    }
}

impl Default for Skill {
    fn default() -> Self {
        Self::fresh()
    }
}

// ---------------------------------------------------------------------------
// SkillTracker
// ---------------------------------------------------------------------------

/// The full skill set of one companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTracker {
    skills: BTreeMap<SkillName, Skill>,
}

impl SkillTracker {
    /// Create a tracker with all nine skills at level 1 and 0 XP.
    pub fn new() -> Self {
        Self {
            skills: SkillName::ALL
                .iter()
                .map(|&name| (name, Skill::fresh()))
                .collect(),
        }
    }

    /// Rebuild a tracker from persisted XP totals.
    ///
    /// Skills missing from `xp` start fresh; levels are recomputed from XP
    /// rather than trusted from storage.
    pub fn from_xp<I>(xp: I) -> Self
    where
        I: IntoIterator<Item = (SkillName, Decimal)>,
    {
        let mut tracker = Self::new();
        for (name, amount) in xp {
            tracker.skills.insert(name, Skill::from_xp(amount));
        }
        tracker
    }

    /// Apply an award to a skill given by its display name.
    ///
    /// Unknown names and rejected awards are ignored: the return value is
    /// `None` and no state changes.
    pub fn apply_xp(&mut self, skill: &str, amount: Decimal, multiplier: Decimal) -> Option<LevelUp> {
        let name = match parse_skill(skill) {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, "ignoring XP");
                return None;
            }
        };
        match self.award(name, amount, multiplier) {
            Ok(level_up) => level_up,
            Err(e) => {
                warn!(skill = %name, error = %e, "XP award rejected");
                None
            }
        }
    }

    /// Apply `amount * multiplier` XP to `skill`.
    ///
    /// Returns `Some(LevelUp)` if the skill's level rose.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::NegativeXp`] for a negative final
    /// amount and [`ProgressionError::ArithmeticOverflow`] if the product or
    /// the new total does not fit.
    pub fn award(
        &mut self,
        skill: SkillName,
        amount: Decimal,
        multiplier: Decimal,
    ) -> Result<Option<LevelUp>, ProgressionError> {
        let final_amount =
            amount
                .checked_mul(multiplier)
                .ok_or_else(|| ProgressionError::ArithmeticOverflow {
                    context: format!("{amount} x {multiplier} for {skill}"),
                })?;
        if final_amount.is_sign_negative() && !final_amount.is_zero() {
            return Err(ProgressionError::NegativeXp {
                skill,
                amount: final_amount,
            });
        }

        let entry = self.skills.entry(skill).or_insert_with(Skill::fresh);
        let old_level = entry.level;
        let new_xp =
            entry
                .xp
                .checked_add(final_amount)
                .ok_or_else(|| ProgressionError::ArithmeticOverflow {
                    context: format!("XP total overflow for {skill}"),
                })?;
        *entry = Skill::from_xp(new_xp);

        if entry.level > old_level {
            debug!(%skill, old_level, new_level = entry.level, "skill levelled up");
            Ok(Some(LevelUp {
                skill,
                old_level,
                new_level: entry.level,
                xp_gained: final_amount,
            }))
        } else {
            Ok(None)
        }
    }

    /// State of one skill.
    pub fn skill(&self, name: SkillName) -> Skill {
        self.skills.get(&name).copied().unwrap_or_default()
    }

    /// Current level of one skill.
    pub fn level(&self, name: SkillName) -> u32 {
        self.skill(name).level
    }

    /// Accumulated XP of one skill.
    pub fn xp(&self, name: SkillName) -> Decimal {
        self.skill(name).xp
    }

    /// Sum of all nine levels (9..=891).
    pub fn total_level(&self) -> u32 {
        self.skills
            .values()
            .fold(0_u32, |acc, s| acc.saturating_add(s.level))
    }

    /// Whether every skill is at least `level`.
    pub fn all_at_least(&self, level: u32) -> bool {
        self.skills.values().all(|s| s.level >= level)
    }

    /// Whether any skill is at least `level`.
    pub fn any_at_least(&self, level: u32) -> bool {
        self.skills.values().any(|s| s.level >= level)
    }

    /// Whether any skill has reached [`MAX_LEVEL`].
    pub fn any_maxed(&self) -> bool {
        self.any_at_least(MAX_LEVEL)
    }

    /// Iterate skills in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SkillName, Skill)> + '_ {
        self.skills.iter().map(|(&name, &skill)| (name, skill))
    }
}

impl Default for SkillTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
