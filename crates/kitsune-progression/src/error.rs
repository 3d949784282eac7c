//! Error types for the kitsune-progression crate.
//!
//! Almost every progression operation is total: unknown skills are ignored
//! and counters saturate. The few operations that reject input return
//! [`ProgressionError`] instead of panicking.

use kitsune_types::SkillName;

/// Errors that can occur while mutating progression state.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// The skill name is not one of the nine fixed skills.
    #[error("unknown skill: {0:?}")]
    UnknownSkill(String),

    /// An XP award was negative.
    #[error("negative XP award for {skill}: {amount}")]
    NegativeXp {
        /// The skill the award targeted.
        skill: SkillName,
        /// The rejected amount.
        amount: rust_decimal::Decimal,
    },

    /// Multiplying an award overflowed the XP representation.
    #[error("arithmetic overflow in XP computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
