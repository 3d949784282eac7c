//! Integration tests for the progression engine: interaction processing,
//! scheduled events, and snapshot persistence.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use chrono::{Duration, Utc};
use kitsune_core::snapshot::SkillRecord;
use kitsune_core::{EngineConfig, ProgressionEngine, SessionSnapshot, SnapshotStore};
use kitsune_progression::{RandomEventDef, xp_for_level};
use kitsune_types::{AchievementId, InteractionType, Mood, RandomEventKind, SkillName};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_decimal::Decimal;

static NO_EVENTS: [RandomEventDef; 0] = [];

static ALWAYS_BOOST: [RandomEventDef; 1] = [RandomEventDef {
    kind: RandomEventKind::XpBoost,
    message: "boost",
    basis_points: 10_000,
}];

fn engine_with(config: EngineConfig) -> ProgressionEngine {
    ProgressionEngine::with_rng(config, SmallRng::seed_from_u64(7))
}

fn quiet() -> ProgressionEngine {
    engine_with(EngineConfig {
        random_events: &NO_EVENTS,
        ..EngineConfig::default()
    })
}

fn xp_of(engine: &ProgressionEngine, skill: SkillName) -> Decimal {
    engine.state().skills().xp(skill)
}

// ---------------------------------------------------------------------------
// Interaction processing
// ---------------------------------------------------------------------------

#[test]
fn mixed_message_awards_several_skills() {
    let mut engine = quiet();
    let text = "Write a story about a magical fox, how do I debug it?";
    let outcome = engine.process_interaction(engine.classify(text), text);

    assert_eq!(outcome.interaction_type, InteractionType::Coding);
    let skills: Vec<SkillName> = outcome.xp_drops.iter().map(|d| d.skill).collect();
    assert!(skills.contains(&SkillName::ProblemSolving));
    assert!(skills.contains(&SkillName::Creativity));
    assert_eq!(xp_of(&engine, SkillName::Creativity), Decimal::from(30));
    assert_eq!(xp_of(&engine, SkillName::ProblemSolving), Decimal::from(25));
}

#[test]
fn thousand_xp_levels_wisdom_to_nine() {
    let mut engine = quiet();
    let (drop, level_up) = engine
        .award_xp(SkillName::Wisdom, Decimal::from(1000))
        .unwrap();
    assert_eq!(drop.amount, Decimal::from(1000));
    let level_up = level_up.unwrap();
    assert_eq!(level_up.old_level, 1);
    assert_eq!(level_up.new_level, 9);
    assert_eq!(engine.state().skills().level(SkillName::Wisdom), 9);
}

#[test]
fn several_level_ups_in_one_interaction() {
    let mut engine = quiet();
    let almost = Decimal::from(xp_for_level(5).saturating_sub(1));
    let record = SkillRecord {
        level: 4,
        xp: almost,
    };
    let snapshot = SessionSnapshot {
        skills: [
            (SkillName::ProblemSolving, record),
            (SkillName::Creativity, record),
        ]
        .into_iter()
        .collect(),
        ..engine.snapshot(Utc::now())
    };
    engine.restore(&snapshot);

    let outcome = engine.process_message("Write a story about a magical fox, how do I debug it?");

    assert!(outcome.level_ups.len() >= 2);
    let levelled: Vec<SkillName> = outcome.level_ups.iter().map(|l| l.skill).collect();
    assert!(levelled.contains(&SkillName::ProblemSolving));
    assert!(levelled.contains(&SkillName::Creativity));
    for lu in &outcome.level_ups {
        assert_eq!(lu.old_level, 4);
        assert!(lu.new_level >= 5);
    }
}

#[test]
fn counters_and_cycles_advance_together() {
    let mut engine = quiet();
    for n in 1..=25_u64 {
        let outcome = engine.process_message("hello there");
        assert_eq!(outcome.interaction, n);
        assert_eq!(outcome.cycle, n);
    }
    assert_eq!(engine.state().interactions(), 25);
    assert_eq!(engine.scheduler().cycle(), 25);
}

#[test]
fn first_interaction_achievement_only_once() {
    let mut engine = quiet();
    let first = engine.process_message("hi");
    let second = engine.process_message("hi");
    assert_eq!(first.new_achievements, vec![AchievementId::FirstInteraction]);
    assert!(second.new_achievements.is_empty());
}

#[test]
fn emotes_follow_total_level() {
    let mut engine = quiet();
    let outcome = engine.process_message("hi");
    // A fresh companion has total level 9.
    assert_eq!(outcome.available_emotes.len(), 1);
}

// ---------------------------------------------------------------------------
// Multiplier and random events
// ---------------------------------------------------------------------------

#[test]
fn interaction_boost_is_reported_without_doubling_xp() {
    let mut engine = engine_with(EngineConfig {
        random_events: &ALWAYS_BOOST,
        ..EngineConfig::default()
    });

    let first = engine.process_message("hello");
    assert_eq!(first.random_event, Some(RandomEventKind::XpBoost));
    assert_eq!(first.xp_drops[0].amount, Decimal::from(5));
    assert_eq!(engine.state().multiplier(), Decimal::ONE);

    let second = engine.process_message("hello");
    assert_eq!(second.xp_drops[0].amount, Decimal::from(5));
    assert_eq!(xp_of(&engine, SkillName::Wisdom), Decimal::from(10));
}

#[test]
fn scheduled_boost_doubles_later_interactions() {
    let mut engine = engine_with(EngineConfig {
        random_events: &ALWAYS_BOOST,
        random_event_interval: 1,
        ..EngineConfig::default()
    });

    // The first interaction's tick runs the scheduled roll after the award.
    let first = engine.process_message("hello");
    assert_eq!(first.xp_drops[0].amount, Decimal::from(5));
    assert_eq!(engine.state().multiplier(), Decimal::TWO);

    let second = engine.process_message("hello");
    assert_eq!(second.xp_drops[0].amount, Decimal::from(10));
}

#[test]
fn multiplier_reset_event_restores_one() {
    let mut engine = engine_with(EngineConfig {
        random_events: &ALWAYS_BOOST,
        random_event_interval: 2,
        multiplier_reset_interval: 3,
        ..EngineConfig::default()
    });

    engine.tick();
    assert_eq!(engine.state().multiplier(), Decimal::ONE);
    engine.tick();
    assert_eq!(engine.state().multiplier(), Decimal::TWO);
    let report = engine.tick();
    assert_eq!(report.cycle, 3);
    assert_eq!(engine.state().multiplier(), Decimal::ONE);
}

#[test]
fn scheduled_random_event_can_boost() {
    let mut engine = engine_with(EngineConfig {
        random_events: &ALWAYS_BOOST,
        random_event_interval: 2,
        multiplier_reset_interval: 1_000,
        ..EngineConfig::default()
    });
    engine.tick();
    assert_eq!(engine.state().multiplier(), Decimal::ONE);
    engine.tick();
    assert_eq!(engine.state().multiplier(), Decimal::TWO);
}

#[test]
fn default_engine_has_three_running_events() {
    let engine = ProgressionEngine::with_seed(99);
    assert_eq!(engine.scheduler().len(), 3);
    assert!(engine.scheduler().events().all(|e| e.is_running()));
}

// ---------------------------------------------------------------------------
// Tails
// ---------------------------------------------------------------------------

#[test]
fn tail_unlock_is_reported_when_it_happens() {
    let mut engine = quiet();
    let threshold = xp_for_level(42);
    let snapshot = SessionSnapshot {
        skills: [(
            SkillName::Wisdom,
            SkillRecord {
                level: 41,
                xp: Decimal::from(threshold.saturating_sub(1)),
            },
        )]
        .into_iter()
        .collect(),
        ..engine.snapshot(Utc::now())
    };
    engine.restore(&snapshot);
    assert_eq!(engine.state().skills().total_level(), 49);
    assert_eq!(engine.tails(), 2);

    let outcome = engine.process_message("hello");
    assert_eq!(outcome.total_level, 50);
    assert_eq!(outcome.tail_unlocked, Some(3));
    assert_eq!(outcome.current_tails, 3);

    let next = engine.process_message("hello");
    assert_eq!(next.tail_unlocked, None);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn snapshot_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("saves"));

    let mut engine = quiet();
    for text in ["debug my code", "write a poem", "I feel sad"] {
        engine.process_message(text);
    }
    store.save(&engine.snapshot(Utc::now())).unwrap();

    let mut restored = quiet();
    let loaded = store.load().unwrap().unwrap();
    restored.restore(&loaded);

    for &skill in SkillName::ALL {
        assert_eq!(xp_of(&restored, skill), xp_of(&engine, skill));
        assert_eq!(
            restored.state().skills().level(skill),
            engine.state().skills().level(skill)
        );
    }
    assert_eq!(restored.state().interactions(), 3);
    assert_eq!(restored.state().mood(), engine.state().mood());
    assert!(
        restored
            .state()
            .achievements()
            .is_completed(AchievementId::FirstInteraction)
    );
}

#[test]
fn restore_keeps_current_session_start() {
    let mut engine = quiet();
    let own_start = engine.session_start();
    let mut snapshot = engine.snapshot(Utc::now());
    snapshot.session_start = own_start - Duration::days(3);
    engine.restore(&snapshot);
    assert_eq!(engine.session_start(), own_start);
}

#[test]
fn older_snapshot_version_is_accepted() {
    let mut engine = quiet();
    let mut snapshot = engine.snapshot(Utc::now());
    snapshot.version = "1.0".to_owned();
    snapshot.total_interactions = 150;
    snapshot.mood = Mood::Wise;
    snapshot.achievements = vec![AchievementId::FirstInteraction, AchievementId::Helpful100];
    engine.restore(&snapshot);

    assert_eq!(engine.state().interactions(), 150);
    assert_eq!(engine.state().mood(), Mood::Wise);
    let outcome = engine.process_message("hello");
    assert_eq!(outcome.interaction, 151);
    assert!(outcome.new_achievements.is_empty());
}

#[test]
fn display_reports_memories() {
    let mut engine = quiet();
    engine.process_message("hello");
    let later = engine.session_start() + Duration::seconds(90);
    let display = engine.display(later);
    assert_eq!(display.memories.total_interactions, 1);
    assert_eq!(display.memories.session_seconds, 90);
    assert_eq!(display.memories.achievements_earned, 1);
    assert_eq!(display.achievements.available.len(), 6);
    assert_eq!(display.status, engine.status_line());
}
