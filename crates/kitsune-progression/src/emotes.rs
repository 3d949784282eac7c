//! Emotes unlocked by total level.

use kitsune_types::EmoteId;

/// One emote catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmoteDef {
    /// Stable identifier.
    pub id: EmoteId,
    /// Display name.
    pub name: &'static str,
    /// Total level required.
    pub unlock_level: u32,
    /// Short emoji animation.
    pub animation: &'static str,
}

/// The emote catalog in unlock order.
pub static EMOTES: [EmoteDef; 5] = [
    EmoteDef {
        id: EmoteId::TailWag,
        name: "Tail Wag",
        unlock_level: 1,
        animation: "🦊💫",
    },
    EmoteDef {
        id: EmoteId::FoxDance,
        name: "Fox Dance",
        unlock_level: 10,
        animation: "🦊💃",
    },
    EmoteDef {
        id: EmoteId::WiseNod,
        name: "Wise Nod",
        unlock_level: 25,
        animation: "🦊🧠",
    },
    EmoteDef {
        id: EmoteId::MagicSparkle,
        name: "Magic Sparkle",
        unlock_level: 50,
        animation: "🦊✨",
    },
    EmoteDef {
        id: EmoteId::NineTailFlourish,
        name: "Nine Tail Flourish",
        unlock_level: 99,
        animation: "🦊🌟",
    },
];

/// Emotes available at `total_level`, in catalog order.
pub fn available_emotes(total_level: u32) -> Vec<EmoteId> {
    EMOTES
        .iter()
        .filter(|e| total_level >= e.unlock_level)
        .map(|e| e.id)
        .collect()
}

/// Look up the catalog entry for an emote.
pub fn emote(id: EmoteId) -> Option<&'static EmoteDef> {
    EMOTES.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_follow_total_level() {
        // Nine skills at level 1 give total level 9.
        assert_eq!(available_emotes(9), vec![EmoteId::TailWag]);
        assert_eq!(
            available_emotes(25),
            vec![EmoteId::TailWag, EmoteId::FoxDance, EmoteId::WiseNod]
        );
    }

    #[test]
    fn all_emotes_at_99() {
        assert_eq!(available_emotes(99).len(), EMOTES.len());
        assert_eq!(available_emotes(891), EmoteId::ALL.to_vec());
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(emote(EmoteId::FoxDance).map(|e| e.unlock_level), Some(10));
    }
}
