//! Random events that occasionally interrupt a conversation.
//!
//! Each catalog entry is rolled independently in catalog order with its own
//! probability; the first hit wins, so at most one event fires per roll.
//! Probabilities are expressed in basis points (1/10000).

use kitsune_types::RandomEventKind;
use rand::Rng;

/// Denominator for [`RandomEventDef::basis_points`].
pub const BASIS_POINTS: u32 = 10_000;

/// One random event catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomEventDef {
    /// Which event.
    pub kind: RandomEventKind,
    /// Message shown when it fires.
    pub message: &'static str,
    /// Chance per roll, out of [`BASIS_POINTS`].
    pub basis_points: u32,
}

/// The catalog in roll order.
pub static RANDOM_EVENTS: [RandomEventDef; 3] = [
    RandomEventDef {
        kind: RandomEventKind::MysteriousFox,
        message: "A mysterious fox appears and shares ancient wisdom...",
        basis_points: 100,
    },
    RandomEventDef {
        kind: RandomEventKind::XpBoost,
        message: "You feel inspired! Next interaction gives bonus XP!",
        basis_points: 500,
    },
    RandomEventDef {
        kind: RandomEventKind::MemoryFragment,
        message: "A memory fragment surfaces, revealing new insights...",
        basis_points: 300,
    },
];

/// Roll the standard catalog once.
pub fn roll(rng: &mut impl Rng) -> Option<RandomEventKind> {
    roll_from(&RANDOM_EVENTS, rng)
}

/// Roll a custom catalog once.
pub fn roll_from(catalog: &[RandomEventDef], rng: &mut impl Rng) -> Option<RandomEventKind> {
    catalog
        .iter()
        .find(|event| rng.random_range(0..BASIS_POINTS) < event.basis_points)
        .map(|event| event.kind)
}

/// Display message for an event.
pub fn message(kind: RandomEventKind) -> &'static str {
    RANDOM_EVENTS
        .iter()
        .find(|event| event.kind == kind)
        .map_or("", |event| event.message)
}
