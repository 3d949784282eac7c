//! Interaction classifier: keyword rules over raw message text.
//!
//! Two independent questions are answered for every message:
//!
//! 1. **Coarse type** ([`InteractionClassifier::classify`]): the first
//!    [`TypeRule`] whose trigger matches wins, falling back to
//!    [`InteractionType::General`].
//! 2. **Per-skill XP** ([`InteractionClassifier::skill_xp`]): every
//!    [`XpRule`] is evaluated in table order. A matching rule either sets
//!    the skill's amount or adds to it, so later rules for the same skill
//!    refine earlier ones. Wisdom always receives a baseline.
//!
//! Keyword matching is a case-insensitive substring test against the
//! lowercased message. Length triggers count characters, not bytes.

use kitsune_types::{InteractionType, SkillName};

// ---------------------------------------------------------------------------
// Rule model
// ---------------------------------------------------------------------------

/// Condition a rule tests against the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The lowercased message contains any of these keywords.
    Contains(&'static [&'static str]),
    /// The message contains a `?`.
    QuestionMark,
    /// The message is longer than this many characters.
    LongerThan(usize),
    /// Always matches.
    Always,
}

impl Trigger {
    /// Whether the trigger fires for `text` (`lowered` is `text` lowercased).
    fn matches(self, text: &str, lowered: &str) -> bool {
        match self {
            Self::Contains(keywords) => keywords.iter().any(|k| lowered.contains(k)),
            Self::QuestionMark => text.contains('?'),
            Self::LongerThan(limit) => text.chars().count() > limit,
            Self::Always => true,
        }
    }
}

/// How a matching XP rule combines with the skill's running amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Replace the amount.
    Set,
    /// Add to the amount (starting from zero).
    Add,
}

/// One `(trigger, skill, amount)` XP rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpRule {
    /// Skill receiving the XP.
    pub skill: SkillName,
    /// When the rule applies.
    pub trigger: Trigger,
    /// Combination mode.
    pub op: Op,
    /// Base XP amount.
    pub amount: u32,
}

/// One coarse-type rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRule {
    /// When the rule applies.
    pub trigger: Trigger,
    /// Type assigned on a match.
    pub interaction: InteractionType,
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

const fn rule(skill: SkillName, trigger: Trigger, op: Op, amount: u32) -> XpRule {
    XpRule {
        skill,
        trigger,
        op,
        amount,
    }
}

/// Coarse type rules in priority order.
pub static TYPE_RULES: [TypeRule; 5] = [
    TypeRule {
        trigger: Trigger::Contains(&["code", "program", "debug", "function", "python"]),
        interaction: InteractionType::Coding,
    },
    TypeRule {
        trigger: Trigger::Contains(&["story", "write", "creative", "poem"]),
        interaction: InteractionType::Creative,
    },
    TypeRule {
        trigger: Trigger::Contains(&["analyze", "data", "pattern", "study"]),
        interaction: InteractionType::Analysis,
    },
    TypeRule {
        trigger: Trigger::Contains(&["learn", "teach", "explain"]),
        interaction: InteractionType::Learning,
    },
    TypeRule {
        trigger: Trigger::QuestionMark,
        interaction: InteractionType::Question,
    },
];

/// Per-skill XP rules in evaluation order.
pub static XP_RULES: [XpRule; 17] = [
    rule(SkillName::Analysis, Trigger::QuestionMark, Op::Set, 10),
    rule(
        SkillName::Analysis,
        Trigger::Contains(&["analyze", "data", "pattern", "study", "research"]),
        Op::Add,
        15,
    ),
    rule(SkillName::Communication, Trigger::LongerThan(100), Op::Set, 15),
    rule(SkillName::Communication, Trigger::LongerThan(200), Op::Set, 25),
    rule(
        SkillName::Helpfulness,
        Trigger::Contains(&["help", "please", "thanks", "thank you"]),
        Op::Set,
        20,
    ),
    rule(
        SkillName::ProblemSolving,
        Trigger::Contains(&["code", "debug", "error", "fix", "solve", "problem"]),
        Op::Set,
        25,
    ),
    rule(
        SkillName::ProblemSolving,
        Trigger::Contains(&["function", "python", "javascript", "html", "css"]),
        Op::Add,
        20,
    ),
    rule(
        SkillName::Creativity,
        Trigger::Contains(&["create", "story", "poem", "write", "creative", "art"]),
        Op::Set,
        30,
    ),
    rule(
        SkillName::Creativity,
        Trigger::Contains(&["design", "imagine", "invent", "original"]),
        Op::Add,
        15,
    ),
    rule(
        SkillName::Learning,
        Trigger::Contains(&["learn", "teach", "explain", "understand", "how"]),
        Op::Set,
        18,
    ),
    rule(
        SkillName::Learning,
        Trigger::Contains(&["why", "what", "when", "where", "tutorial"]),
        Op::Add,
        12,
    ),
    rule(SkillName::Patience, Trigger::LongerThan(300), Op::Set, 10),
    rule(
        SkillName::Patience,
        Trigger::Contains(&["wait", "slowly", "careful", "detail"]),
        Op::Add,
        8,
    ),
    rule(
        SkillName::Empathy,
        Trigger::Contains(&["feel", "emotion", "sad", "happy", "worried"]),
        Op::Set,
        22,
    ),
    rule(
        SkillName::Empathy,
        Trigger::Contains(&["understand", "support", "comfort", "listen"]),
        Op::Add,
        15,
    ),
    rule(SkillName::Wisdom, Trigger::Always, Op::Set, 5),
    rule(
        SkillName::Wisdom,
        Trigger::Contains(&["wise", "advice", "guidance", "insight"]),
        Op::Set,
        25,
    ),
];

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Keyword classifier over borrowed rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionClassifier {
    type_rules: &'static [TypeRule],
    xp_rules: &'static [XpRule],
}

impl InteractionClassifier {
    /// Classifier over the standard tables.
    pub fn new() -> Self {
        Self::with_rules(&TYPE_RULES, &XP_RULES)
    }

    /// Classifier over custom tables.
    pub const fn with_rules(
        type_rules: &'static [TypeRule],
        xp_rules: &'static [XpRule],
    ) -> Self {
        Self {
            type_rules,
            xp_rules,
        }
    }

    /// Coarse type of a message.
    pub fn classify(&self, text: &str) -> InteractionType {
        let lowered = text.to_lowercase();
        self.type_rules
            .iter()
            .find(|r| r.trigger.matches(text, &lowered))
            .map_or(InteractionType::General, |r| r.interaction)
    }

    /// Base XP per skill for a message, in first-award order.
    ///
    /// Skills with no matching rule are absent. Every message yields at
    /// least the Wisdom baseline with the standard tables.
    pub fn skill_xp(&self, text: &str) -> Vec<(SkillName, u32)> {
        let lowered = text.to_lowercase();
        let mut gains: Vec<(SkillName, u32)> = Vec::new();
        for rule in self.xp_rules {
            if !rule.trigger.matches(text, &lowered) {
                continue;
            }
            if let Some(entry) = gains.iter_mut().find(|(skill, _)| *skill == rule.skill) {
                entry.1 = match rule.op {
                    Op::Set => rule.amount,
                    Op::Add => entry.1.saturating_add(rule.amount),
                };
            } else {
                gains.push((rule.skill, rule.amount));
            }
        }
        gains
    }
}

impl Default for InteractionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
