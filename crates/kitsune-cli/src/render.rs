//! Console rendering: the fox, menus, and the status panel.
//!
//! Everything here builds plain strings; the caller decides where they go.

use std::fmt;

use kitsune_core::DisplayState;
use kitsune_core::display::SkillView;
use kitsune_core::settings::Settings;
use kitsune_progression::{achievements, emotes};
use kitsune_types::{AchievementId, FoxColor, Mood, XpDrop};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const BAR_CELLS: usize = 10;
const FULL_CELL: &str = "█";
const EMPTY_CELL: &str = "░";

/// Icon shown in front of every XP drop.
pub const XP_DROP_ICON: &str = "🟨";

// ---------------------------------------------------------------------------
// Fox visual
// ---------------------------------------------------------------------------

/// The fox shown in prompts and headers: colour, mood, and one star per
/// tail beyond the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoxVisual {
    color: FoxColor,
    mood: Mood,
    tails: u32,
}

impl FoxVisual {
    /// A one-tailed curious fox of the given colour.
    pub const fn new(color: FoxColor) -> Self {
        Self {
            color,
            mood: Mood::Curious,
            tails: 1,
        }
    }

    /// Change the fur colour.
    pub const fn set_color(&mut self, color: FoxColor) {
        self.color = color;
    }

    /// Follow the companion's mood and tail count.
    pub const fn update(&mut self, mood: Mood, tails: u32) {
        self.mood = mood;
        self.tails = tails;
    }
}

impl fmt::Display for FoxVisual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stars = usize::try_from(self.tails.saturating_sub(1)).unwrap_or(0);
        write!(
            f,
            "{}{}{}",
            color_emoji(self.color),
            mood_emoji(self.mood),
            "🌟".repeat(stars)
        )
    }
}

/// Emoji for a fur colour.
pub const fn color_emoji(color: FoxColor) -> &'static str {
    match color {
        FoxColor::Orange => "🦊",
        FoxColor::White => "🤍🦊",
        FoxColor::Black => "🖤🦊",
        FoxColor::Golden => "💛🦊",
        FoxColor::Silver => "🤍✨🦊",
    }
}

/// Emoji for a mood. Helpful has none of its own.
pub const fn mood_emoji(mood: Mood) -> &'static str {
    match mood {
        Mood::Curious => "🤔",
        Mood::Wise => "🧠",
        Mood::Playful => "😄",
        Mood::Content => "😌",
        Mood::Focused => "🎯",
        Mood::Excited => "🤩",
        Mood::Helpful => "😐",
    }
}

// ---------------------------------------------------------------------------
// Progress lines
// ---------------------------------------------------------------------------

/// `"🟨 +25.0 Problem-Solving XP"`.
pub fn xp_drop_line(drop: &XpDrop) -> String {
    let mut amount = drop.amount.round_dp(1);
    amount.rescale(1);
    format!("{XP_DROP_ICON} +{amount} {} XP", drop.skill)
}

/// Display name of an achievement.
pub fn achievement_name(id: AchievementId) -> &'static str {
    achievements::definition(id).map_or_else(|| id.as_str(), |def| def.name)
}

/// Ten-cell bar; `None` (max level) renders full.
pub fn progress_bar(percent: Option<Decimal>) -> String {
    let filled = percent.map_or(BAR_CELLS, |p| {
        p.checked_div(Decimal::TEN)
            .and_then(|cells| cells.floor().to_usize())
            .unwrap_or(0)
            .min(BAR_CELLS)
    });
    format!(
        "{}{}",
        FULL_CELL.repeat(filled),
        EMPTY_CELL.repeat(BAR_CELLS.saturating_sub(filled))
    )
}

/// One row of the skill panel.
pub fn skill_row(view: &SkillView) -> String {
    let name = view.name.as_str();
    match view.next_level_xp {
        None => format!(
            "{name:<15} | Lv.{:>2} | {} | MAX LEVEL!",
            view.level,
            progress_bar(None)
        ),
        Some(next) => format!(
            "{name:<15} | Lv.{:>2} | {} | {:>6}/{next} XP",
            view.level,
            progress_bar(view.progress),
            view.xp.round().to_string()
        ),
    }
}

// ---------------------------------------------------------------------------
// Panels and menus
// ---------------------------------------------------------------------------

/// The full status panel.
pub fn status_panel(display: &DisplayState, fox: &FoxVisual) -> String {
    let rule = "=".repeat(60);
    let skills = &display.skills;
    let mut lines = vec![
        String::new(),
        rule.clone(),
        "🦊 KITSUNE STATUS".to_owned(),
        rule.clone(),
        format!("Fox: {fox}"),
        format!("Tails: {}/9", skills.tails),
        format!("Total Level: {}", skills.total_level),
        format!("Interactions: {}", display.memories.total_interactions),
        format!("Achievements: {}", display.memories.achievements_earned),
        format!("Mood: {}", display.mood.title()),
    ];
    if let Some(next) = skills.next_tail_at {
        lines.push(format!("Next tail at level: {next}"));
    }

    let emote_names: Vec<&str> = display
        .emotes
        .available
        .iter()
        .filter_map(|&id| emotes::emote(id).map(|e| e.name))
        .collect();
    lines.push(format!(
        "Emotes ({}/{}): {}",
        display.emotes.unlocked_count,
        display.emotes.total_emotes,
        emote_names.join(", ")
    ));
    for &id in &display.achievements.completed {
        lines.push(format!("🏆 {}", achievement_name(id)));
    }

    lines.push(String::new());
    lines.push("📊 SKILL LEVELS".to_owned());
    lines.push("-".repeat(50));
    lines.extend(skills.skills.iter().map(skill_row));
    lines.push(rule);
    lines.join("\n")
}

/// The main menu under a fox header.
pub fn main_menu(fox: &FoxVisual) -> String {
    [
        String::new(),
        format!("{fox} KITSUNE AI"),
        "=".repeat(50),
        "1. 💬 Chat with Kitsune".to_owned(),
        "2. 📊 View Status & Progress".to_owned(),
        "3. ⚙️  Settings".to_owned(),
        "4. 💾 Save Progress".to_owned(),
        "5. 🚪 Exit".to_owned(),
    ]
    .join("\n")
}

/// The settings menu with current values.
pub fn settings_menu(settings: &Settings) -> String {
    let rule = "=".repeat(50);
    [
        String::new(),
        rule.clone(),
        "⚙️  SETTINGS".to_owned(),
        rule,
        format!("1. LLM Endpoint: {}", settings.llm_endpoint),
        format!("2. Fox Color: {}", settings.fox_color),
        format!(
            "3. Sound: {}",
            if settings.sound_enabled { "On" } else { "Off" }
        ),
        format!("4. Save Location: {}", settings.save_location.display()),
        "5. Test LLM Connection".to_owned(),
        "6. Reset to Defaults".to_owned(),
        "7. Back to Main Menu".to_owned(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use kitsune_types::SkillName;

    use super::*;

    #[test]
    fn fresh_fox() {
        assert_eq!(FoxVisual::new(FoxColor::Orange).to_string(), "🦊🤔");
    }

    #[test]
    fn coloured_fox_with_tails() {
        let mut fox = FoxVisual::new(FoxColor::Silver);
        fox.update(Mood::Wise, 3);
        assert_eq!(fox.to_string(), "🤍✨🦊🧠🌟🌟");
        fox.set_color(FoxColor::Black);
        fox.update(Mood::Helpful, 1);
        assert_eq!(fox.to_string(), "🖤🦊😐");
    }

    #[test]
    fn xp_drop_formatting() {
        let drop = XpDrop {
            skill: SkillName::ProblemSolving,
            amount: Decimal::from(25),
        };
        assert_eq!(xp_drop_line(&drop), "🟨 +25.0 Problem-Solving XP");

        let boosted = XpDrop {
            skill: SkillName::Wisdom,
            amount: Decimal::new(125, 1),
        };
        assert_eq!(xp_drop_line(&boosted), "🟨 +12.5 Wisdom XP");
    }

    #[test]
    fn achievement_names_come_from_the_diary() {
        assert_eq!(achievement_name(AchievementId::FirstInteraction), "First Steps");
        assert_eq!(achievement_name(AchievementId::AllTails), "Nine-Tailed Legend");
    }

    #[test]
    fn progress_bars() {
        assert_eq!(progress_bar(Some(Decimal::ZERO)), "░░░░░░░░░░");
        assert_eq!(progress_bar(Some(Decimal::new(375, 1))), "███░░░░░░░");
        assert_eq!(progress_bar(Some(Decimal::from(250))), "██████████");
        assert_eq!(progress_bar(None), "██████████");
    }

    #[test]
    fn skill_rows() {
        let row = skill_row(&SkillView {
            name: SkillName::Wisdom,
            level: 2,
            xp: Decimal::from(100),
            next_level_xp: Some(174),
            progress: Some(Decimal::new(5747, 2)),
        });
        assert_eq!(row, "Wisdom          | Lv. 2 | █████░░░░░ |    100/174 XP");

        let maxed = skill_row(&SkillView {
            name: SkillName::Empathy,
            level: 99,
            xp: Decimal::from(13_034_431),
            next_level_xp: None,
            progress: None,
        });
        assert!(maxed.ends_with("| ██████████ | MAX LEVEL!"));
    }

    #[test]
    fn menus_list_every_choice() {
        let menu = main_menu(&FoxVisual::new(FoxColor::Golden));
        assert!(menu.contains("💛🦊🤔 KITSUNE AI"));
        assert!(menu.contains("5. 🚪 Exit"));

        let settings = settings_menu(&Settings::default());
        assert!(settings.contains("1. LLM Endpoint: http://localhost:8000"));
        assert!(settings.contains("2. Fox Color: orange"));
        assert!(settings.contains("3. Sound: On"));
        assert!(settings.contains("7. Back to Main Menu"));
    }
}
