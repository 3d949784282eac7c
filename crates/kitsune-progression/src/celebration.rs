//! Level-up celebrations.

use kitsune_types::LevelUp;
use serde::Serialize;

use crate::curve::MAX_LEVEL;

/// Presentation record for one level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Celebration {
    /// Emoji animation.
    pub animation: &'static str,
    /// Multi-line console message.
    pub message: String,
    /// Sound effect file name.
    pub sound_effect: &'static str,
    /// Graphics effect name.
    pub graphics_effect: &'static str,
    /// One-line announcement for the chat log.
    pub chat_announcement: String,
}

/// Build the celebration for a level-up. Reaching level 99 gets the
/// mastery variant.
pub fn celebrate(level_up: &LevelUp) -> Celebration {
    let skill = level_up.skill;
    let level = level_up.new_level;
    let mut celebration = Celebration {
        animation: "🦊✨🌟✨",
        message: format!("🎉 LEVEL UP! 🎉\n{skill} is now level {level}!"),
        sound_effect: "level_up_fanfare.mp3",
        graphics_effect: "golden_sparkles",
        chat_announcement: format!("Kitsune's {skill} has reached level {level}!"),
    };
    if level == MAX_LEVEL {
        celebration.animation = "🦊👑🌟👑";
        celebration.message.push_str("\n🏆 MASTERY ACHIEVED! 🏆");
        celebration.sound_effect = "mastery_fanfare.mp3";
    }
    celebration
}
