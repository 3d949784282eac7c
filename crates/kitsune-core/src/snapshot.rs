//! Session snapshots: the persisted progress document and its store.
//!
//! A snapshot is a JSON document with camelCase keys:
//!
//! ```json
//! {
//!   "version": "3.0",
//!   "timestamp": "2026-01-01T12:00:00Z",
//!   "skills": { "Wisdom": { "level": 2, "xp": "90" } },
//!   "totalInteractions": 12,
//!   "achievements": ["first_interaction"],
//!   "mood": "curious",
//!   "sessionStart": "2026-01-01T11:00:00Z"
//! }
//! ```
//!
//! Reading is lenient. The file is first parsed into a [`RawSnapshot`]
//! where every field is optional and every label is a plain string;
//! [`migrate_snapshot`] then fills absent fields with defaults and drops
//! labels that are not known skills, achievements or moods (with a
//! warning). All silent defaulting lives in that one function.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kitsune_types::{AchievementId, Mood, SkillName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SnapshotError;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "3.0";

/// File name of the snapshot inside the save directory.
pub const SNAPSHOT_FILE: &str = "kitsune_progress.json";

// ---------------------------------------------------------------------------
// Typed snapshot
// ---------------------------------------------------------------------------

/// One skill as persisted. The level is informational; it is recomputed
/// from XP on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Level at save time.
    pub level: u32,
    /// Accumulated XP.
    pub xp: Decimal,
}

/// Validated snapshot of one companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Format version.
    pub version: String,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Per-skill XP and level.
    pub skills: BTreeMap<SkillName, SkillRecord>,
    /// Interaction counter.
    pub total_interactions: u64,
    /// Earned achievements.
    pub achievements: Vec<AchievementId>,
    /// Mood at save time.
    pub mood: Mood,
    /// Start of the session that wrote the snapshot.
    pub session_start: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Raw snapshot and migration
// ---------------------------------------------------------------------------

/// Persisted skill entry before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSkill {
    /// Stored level, ignored on restore.
    #[serde(default)]
    pub level: Option<u32>,
    /// Stored XP.
    #[serde(default)]
    pub xp: Decimal,
}

/// Snapshot document as found on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    /// Format version, if recorded.
    #[serde(default)]
    pub version: Option<String>,
    /// Save time, if recorded.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Skills keyed by display name.
    #[serde(default)]
    pub skills: BTreeMap<String, RawSkill>,
    /// Interaction counter.
    #[serde(default, alias = "total_interactions")]
    pub total_interactions: u64,
    /// Achievement labels.
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Mood label.
    #[serde(default, alias = "currentMood", alias = "current_mood")]
    pub mood: Option<String>,
    /// Session start, if recorded.
    #[serde(default, alias = "session_start")]
    pub session_start: Option<DateTime<Utc>>,
}

/// Turn a raw document into a validated snapshot.
///
/// Absent fields take defaults (`now` for timestamps, curious mood, zero
/// interactions). Unknown labels are dropped with a warning. The version
/// string is carried through unchecked.
pub fn migrate_snapshot(raw: RawSnapshot, now: DateTime<Utc>) -> SessionSnapshot {
    let mut skills = BTreeMap::new();
    for (name, record) in raw.skills {
        let Ok(skill) = SkillName::from_str(&name) else {
            warn!(skill = %name, "dropping unknown skill from snapshot");
            continue;
        };
        let xp = record.xp.max(Decimal::ZERO);
        skills.insert(
            skill,
            SkillRecord {
                level: kitsune_progression::level_for_xp(xp),
                xp,
            },
        );
    }

    let mut achievements = Vec::with_capacity(raw.achievements.len());
    for label in raw.achievements {
        match AchievementId::from_str(&label) {
            Ok(id) if !achievements.contains(&id) => achievements.push(id),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "dropping unknown achievement from snapshot"),
        }
    }

    let mood = match raw.mood.as_deref().map(Mood::from_str) {
        Some(Ok(mood)) => mood,
        Some(Err(e)) => {
            warn!(error = %e, "unknown mood in snapshot, using default");
            Mood::default()
        }
        None => Mood::default(),
    };

    SessionSnapshot {
        version: raw.version.unwrap_or_else(|| SNAPSHOT_VERSION.to_owned()),
        timestamp: raw.timestamp.unwrap_or(now),
        skills,
        total_interactions: raw.total_interactions,
        achievements,
        mood,
        session_start: raw.session_start.unwrap_or(now),
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Reads and writes the snapshot file in a save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Store rooted at `dir`. Nothing touches the filesystem until the
    /// first save or load.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Write `snapshot`, creating the save directory on demand.
    ///
    /// Returns the path written.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<PathBuf, SnapshotError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path();
        let json = serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            path = %path.display(),
            interactions = snapshot.total_interactions,
            "progress saved"
        );
        Ok(path)
    }

    /// Read and migrate the snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot file exists yet.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, SnapshotError> {
        let path = self.path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot yet");
                return Ok(None);
            }
            Err(source) => return Err(SnapshotError::Io { path, source }),
        };
        let raw: RawSnapshot =
            serde_json::from_str(&contents).map_err(|source| SnapshotError::Json {
                path: path.clone(),
                source,
            })?;
        Ok(Some(migrate_snapshot(raw, Utc::now())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SessionSnapshot {
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        migrate_snapshot(raw, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn empty_document_defaults_everything() {
        let snap = parse("{}");
        assert_eq!(snap.version, SNAPSHOT_VERSION);
        assert!(snap.skills.is_empty());
        assert_eq!(snap.total_interactions, 0);
        assert!(snap.achievements.is_empty());
        assert_eq!(snap.mood, Mood::Curious);
        assert_eq!(snap.session_start, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn unknown_labels_are_dropped() {
        let snap = parse(
            r#"{
                "skills": {"Wisdom": {"level": 50, "xp": 90}, "Cooking": {"xp": 10}},
                "achievements": ["first_interaction", "dragon_slayer", "first_interaction"],
                "mood": "grumpy"
            }"#,
        );
        assert_eq!(snap.skills.len(), 1);
        assert_eq!(snap.achievements, vec![AchievementId::FirstInteraction]);
        assert_eq!(snap.mood, Mood::Curious);
    }

    #[test]
    fn stored_level_is_recomputed() {
        let snap = parse(r#"{"skills": {"Wisdom": {"level": 50, "xp": 90}}}"#);
        assert_eq!(
            snap.skills.get(&SkillName::Wisdom),
            Some(&SkillRecord {
                level: 2,
                xp: Decimal::from(90)
            })
        );
    }

    #[test]
    fn snake_case_keys_are_accepted() {
        let snap = parse(r#"{"total_interactions": 7, "current_mood": "wise"}"#);
        assert_eq!(snap.total_interactions, 7);
        assert_eq!(snap.mood, Mood::Wise);
    }

    #[test]
    fn written_keys_are_camel_case() {
        let snap = parse(r#"{"totalInteractions": 3}"#);
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("totalInteractions").is_some());
        assert!(json.get("sessionStart").is_some());
        assert_eq!(json.get("version"), Some(&serde_json::json!("3.0")));
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("never-created"));
        assert!(matches!(store.load(), Ok(None)));
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("saves"));
        let mut snap = parse("{}");
        snap.total_interactions = 42;
        snap.achievements.push(AchievementId::Helpful100);
        snap.skills.insert(
            SkillName::Empathy,
            SkillRecord {
                level: 10,
                xp: Decimal::new(11545, 1),
            },
        );

        let path = store.save(&snap).unwrap();
        assert_eq!(path, store.path());
        let loaded = store.load().unwrap();
        assert_eq!(loaded, Some(snap));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(SnapshotError::Json { .. })));
    }
}
