//! Closed enumerations shared across the workspace.
//!
//! Every enumeration here has a fixed wire label (used in the snapshot and
//! settings files and in console output), an `ALL` table in canonical
//! order, and a case-sensitive [`FromStr`](core::str::FromStr)
//! implementation that accepts exactly the wire label.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Generates a fieldless enum with a fixed label per variant.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in canonical order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire label for this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(ParseError::new($kind, other)),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

labelled_enum! {
    /// One of the nine fixed skills the companion can train.
    ///
    /// The canonical order is also the display order of the skill panel.
    SkillName, "skill" {
        /// General conversation; every message trains it a little.
        Wisdom => "Wisdom",
        /// Polite requests and thanks.
        Helpfulness => "Helpfulness",
        /// Stories, poems, design and invention.
        Creativity => "Creativity",
        /// Questions and data-oriented requests.
        Analysis => "Analysis",
        /// Explanations and tutorials.
        Learning => "Learning",
        /// Very long or careful, detailed requests.
        Patience => "Patience",
        /// Feelings and support.
        Empathy => "Empathy",
        /// Code, debugging and fixes.
        ProblemSolving => "Problem-Solving",
        /// Long messages.
        Communication => "Communication",
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

labelled_enum! {
    /// The companion's current mood label.
    Mood, "mood" {
        /// Starting mood of a fresh session.
        Curious => "curious",
        /// Set after a question.
        Helpful => "helpful",
        /// Set after a creative request.
        Playful => "playful",
        /// Reachable only through random drift.
        Wise => "wise",
        /// Reachable only through random drift.
        Content => "content",
        /// Reachable only through random drift.
        Excited => "excited",
        /// Set after a coding request.
        Focused => "focused",
    }
}

impl Mood {
    /// Title-cased label for the status line (e.g. `"Curious"`).
    pub fn title(self) -> String {
        let label = self.as_str();
        let mut chars = label.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self::Curious
    }
}

// ---------------------------------------------------------------------------
// Interaction types
// ---------------------------------------------------------------------------

labelled_enum! {
    /// Coarse classification of a user message.
    ///
    /// Drives mood transitions; XP is computed independently from the
    /// message text.
    InteractionType, "interaction type" {
        /// Programming requests.
        Coding => "coding",
        /// Stories, poems and other writing.
        Creative => "creative",
        /// Data and pattern analysis.
        Analysis => "analysis",
        /// Teaching and explanations.
        Learning => "learning",
        /// Anything else containing a question mark.
        Question => "question",
        /// Fallback.
        General => "general",
    }
}

impl Default for InteractionType {
    fn default() -> Self {
        Self::General
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

labelled_enum! {
    /// Identifier of one entry of the achievement diary.
    ///
    /// Canonical order is the evaluation order of the diary.
    AchievementId, "achievement" {
        /// First conversation.
        FirstInteraction => "first_interaction",
        /// One hundred conversations.
        Helpful100 => "helpful_100",
        /// Level 10 in every skill.
        Level10All => "level_10_all",
        /// Level 50 in any skill.
        Level50Any => "level_50_any",
        /// Total level 200.
        TotalLevel200 => "total_level_200",
        /// Level 99 in any skill.
        Level99Any => "level_99_any",
        /// All nine tails.
        AllTails => "all_tails",
    }
}

labelled_enum! {
    /// Prestige tier of an achievement.
    AchievementTier, "achievement tier" {
        /// Entry tier.
        Bronze => "bronze",
        /// Mid tier.
        Silver => "silver",
        /// High tier.
        Gold => "gold",
        /// Top tier.
        Dragon => "dragon",
    }
}

// ---------------------------------------------------------------------------
// Cosmetics
// ---------------------------------------------------------------------------

labelled_enum! {
    /// Fur colour of the fox, chosen in the settings menu.
    FoxColor, "fox colour" {
        /// Default colour.
        Orange => "orange",
        /// White fur.
        White => "white",
        /// Black fur.
        Black => "black",
        /// Golden fur.
        Golden => "golden",
        /// Silver fur.
        Silver => "silver",
    }
}

impl Default for FoxColor {
    fn default() -> Self {
        Self::Orange
    }
}

labelled_enum! {
    /// Emote unlocked by total level.
    EmoteId, "emote" {
        /// Available from the start.
        TailWag => "tail_wag",
        /// Total level 10.
        FoxDance => "fox_dance",
        /// Total level 25.
        WiseNod => "wise_nod",
        /// Total level 50.
        MagicSparkle => "magic_sparkle",
        /// Total level 99.
        NineTailFlourish => "nine_tail_flourish",
    }
}

labelled_enum! {
    /// A random event that may interrupt a conversation.
    RandomEventKind, "random event" {
        /// Flavour only.
        MysteriousFox => "Mysterious Fox",
        /// Raises the XP multiplier until the next reset.
        XpBoost => "XP Boost",
        /// Flavour only.
        MemoryFragment => "Memory Fragment",
    }
}
