//! Display state: read-only views of the engine for the console.
//!
//! The views are plain serializable records built on demand by
//! [`ProgressionEngine::display`](crate::ProgressionEngine::display). They
//! hold no references into the engine, so the front-end can keep them
//! around while the engine keeps processing.

use std::collections::BTreeMap;

use kitsune_progression::{
    AchievementTracker, EMOTES, MAX_LEVEL, SkillTracker, available_emotes, next_tail_threshold,
    progress_percent, unlocked_tails, xp_for_level,
};
use kitsune_types::{AchievementId, EmoteId, Mood, SkillName};
use rust_decimal::Decimal;
use serde::Serialize;

/// One row of the skill panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillView {
    /// Skill name.
    pub name: SkillName,
    /// Current level.
    pub level: u32,
    /// Accumulated XP.
    pub xp: Decimal,
    /// Cumulative XP needed for the next level; `None` at level 99.
    pub next_level_xp: Option<u64>,
    /// Percent of the next threshold reached; `None` at level 99.
    pub progress: Option<Decimal>,
}

impl SkillView {
    fn new(name: SkillName, skills: &SkillTracker) -> Self {
        let skill = skills.skill(name);
        let level = skill.level();
        let next_level_xp = (level < MAX_LEVEL).then(|| xp_for_level(level.saturating_add(1)));
        Self {
            name,
            level,
            xp: skill.xp(),
            next_level_xp,
            progress: progress_percent(level, skill.xp()),
        }
    }

    /// Whether the skill is at the level cap.
    pub const fn is_maxed(&self) -> bool {
        self.next_level_xp.is_none()
    }
}

/// The skills tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillsTab {
    /// One row per skill in canonical order.
    pub skills: Vec<SkillView>,
    /// Sum of levels.
    pub total_level: u32,
    /// Unlocked tails.
    pub tails: u32,
    /// Total level of the next tail unlock, if any remain.
    pub next_tail_at: Option<u32>,
}

/// The achievements tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementsTab {
    /// Earned achievements.
    pub completed: Vec<AchievementId>,
    /// Not yet earned, in diary order.
    pub available: Vec<AchievementId>,
    /// In-progress counters.
    pub progress: BTreeMap<AchievementId, u64>,
}

/// The memories tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoriesTab {
    /// Interaction counter.
    pub total_interactions: u64,
    /// Whole seconds since the session started.
    pub session_seconds: u64,
    /// Number of earned achievements.
    pub achievements_earned: usize,
}

/// The emotes tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotesTab {
    /// Unlocked emotes.
    pub available: Vec<EmoteId>,
    /// Size of the emote catalog.
    pub total_emotes: usize,
    /// Number unlocked.
    pub unlocked_count: usize,
}

/// Every tab plus the headline state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Status line.
    pub status: String,
    /// Current mood.
    pub mood: Mood,
    /// Skills tab.
    pub skills: SkillsTab,
    /// Achievements tab.
    pub achievements: AchievementsTab,
    /// Memories tab.
    pub memories: MemoriesTab,
    /// Emotes tab.
    pub emotes: EmotesTab,
}

/// Status line: `"🦊<stars> Kitsune AI | Total Level: N | Mood: Title"`.
pub fn status_line(total_level: u32, mood: Mood) -> String {
    let tails = unlocked_tails(total_level);
    let stars = "🌟".repeat(usize::try_from(tails.saturating_sub(1)).unwrap_or(0));
    format!(
        "🦊{stars} Kitsune AI | Total Level: {total_level} | Mood: {}",
        mood.title()
    )
}

pub(crate) fn skills_tab(skills: &SkillTracker) -> SkillsTab {
    let total_level = skills.total_level();
    let tails = unlocked_tails(total_level);
    SkillsTab {
        skills: SkillName::ALL
            .iter()
            .map(|&name| SkillView::new(name, skills))
            .collect(),
        total_level,
        tails,
        next_tail_at: next_tail_threshold(tails),
    }
}

pub(crate) fn achievements_tab(achievements: &AchievementTracker) -> AchievementsTab {
    AchievementsTab {
        completed: achievements.completed().iter().copied().collect(),
        available: achievements.available(),
        progress: achievements.progress().clone(),
    }
}

pub(crate) fn emotes_tab(total_level: u32) -> EmotesTab {
    let available = available_emotes(total_level);
    EmotesTab {
        unlocked_count: available.len(),
        available,
        total_emotes: EMOTES.len(),
    }
}
