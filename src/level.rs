//! Level timelines
//!
//! A level is a JSON file of timed obstacle cues plus optional replay settings:
//!
//! ```json
//! { "obstacles": [{ "time": 1.45, "type": "cube" }],
//!   "replay": { "jumpTime": 1.45, "survivalSeconds": 2 } }
//! ```
//!
//! Parsing is forgiving. Bad fields fall back to defaults and bad cues are
//! skipped; only unreadable files or invalid JSON fail the load, and even then
//! the game simply spawns obstacles at random.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{DEFAULT_JUMP_TIME, DEFAULT_SURVIVAL_SECONDS};
use crate::settings::Settings;
use crate::sim::ObstacleKind;

/// A timed spawn instruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Seconds of simulation time
    pub time: f32,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

/// Replay verifier parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// When the scripted jump fires (seconds)
    pub jump_time: f32,
    /// How long to survive after leaving the cube (ms)
    pub survival_ms: f32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            jump_time: DEFAULT_JUMP_TIME,
            survival_ms: DEFAULT_SURVIVAL_SECONDS * 1000.0,
        }
    }
}

/// Parsed level
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelTimeline {
    /// Cues sorted by time (stable for equal times)
    pub cues: Vec<Cue>,
    pub replay: ReplayConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Failed to read level {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse level {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape, every field optional
#[derive(Debug, Default, Deserialize)]
struct LevelFile {
    #[serde(default, deserialize_with = "lenient")]
    obstacles: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    replay: Option<ReplayFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplayFile {
    #[serde(default, deserialize_with = "lenient")]
    jump_time: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    survival_seconds: Option<f32>,
}

/// Deserialize a field, treating a value of the wrong shape as missing
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl LevelTimeline {
    /// Parse a level from JSON text
    pub fn from_json(name: &str, json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json).map_err(|source| LevelError::Parse {
            name: name.to_string(),
            source,
        })?;

        let mut cues = Vec::new();
        for (index, raw) in file.obstacles.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_value::<Cue>(raw) {
                Ok(cue) => cues.push(cue),
                Err(e) => log::warn!("Level {name}: skipping cue {index}: {e}"),
            }
        }
        cues.sort_by(|a, b| a.time.total_cmp(&b.time));

        let defaults = ReplayConfig::default();
        let replay = file.replay.unwrap_or_default();
        let replay = ReplayConfig {
            jump_time: replay.jump_time.unwrap_or(defaults.jump_time),
            survival_ms: replay
                .survival_seconds
                .map(|s| s * 1000.0)
                .unwrap_or(defaults.survival_ms),
        };

        Ok(Self { cues, replay })
    }
}

/// Where level files come from
pub trait LevelSource {
    fn load(&self, name: &str) -> Result<LevelTimeline, LevelError>;
}

/// Levels stored as `<root>/<name>.json`
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    root: PathBuf,
}

impl DirLevelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LevelSource for DirLevelSource {
    fn load(&self, name: &str) -> Result<LevelTimeline, LevelError> {
        let path = self.root.join(format!("{name}.json"));
        let json = std::fs::read_to_string(&path).map_err(|source| LevelError::Io {
            name: name.to_string(),
            source,
        })?;
        LevelTimeline::from_json(name, &json)
    }
}

/// Load the level the settings ask for, if any
///
/// Only the proof level is ever loaded. Failures are logged and yield `None`,
/// which puts the game in random spawn mode.
pub fn load_level(source: &dyn LevelSource, settings: &Settings) -> Option<LevelTimeline> {
    if !settings.uses_proof_level() {
        return None;
    }
    let name = settings.level.as_deref()?;
    match source.load(name) {
        Ok(level) => {
            log::info!("Loaded level {name} ({} cues)", level.cues.len());
            Some(level)
        }
        Err(e) => {
            log::warn!("Level load failed, falling back to random spawn: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PROOF_LEVEL_NAME;

    struct MemorySource(&'static str);

    impl LevelSource for MemorySource {
        fn load(&self, name: &str) -> Result<LevelTimeline, LevelError> {
            LevelTimeline::from_json(name, self.0)
        }
    }

    #[test]
    fn test_parse_full_level() {
        let level = LevelTimeline::from_json(
            "proof",
            r#"{"obstacles":[{"time":1.45,"type":"cube"}],"replay":{"jumpTime":1.2,"survivalSeconds":3}}"#,
        )
        .unwrap();
        assert_eq!(
            level.cues,
            vec![Cue {
                time: 1.45,
                kind: ObstacleKind::Cube
            }]
        );
        assert_eq!(level.replay.jump_time, 1.2);
        assert_eq!(level.replay.survival_ms, 3000.0);
    }

    #[test]
    fn test_missing_replay_uses_defaults() {
        let level = LevelTimeline::from_json("a", r#"{"obstacles":[]}"#).unwrap();
        assert_eq!(level.replay, ReplayConfig::default());
        assert_eq!(level.replay.survival_ms, 2000.0);

        let level = LevelTimeline::from_json("b", r#"{"replay":{"jumpTime":2}}"#).unwrap();
        assert!(level.cues.is_empty());
        assert_eq!(level.replay.jump_time, 2.0);
        assert_eq!(level.replay.survival_ms, 2000.0);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let level = LevelTimeline::from_json(
            "c",
            r#"{"obstacles":"nope","replay":{"jumpTime":"soon","survivalSeconds":4}}"#,
        )
        .unwrap();
        assert!(level.cues.is_empty());
        assert_eq!(level.replay.jump_time, DEFAULT_JUMP_TIME);
        assert_eq!(level.replay.survival_ms, 4000.0);
    }

    #[test]
    fn test_bad_cues_skipped_and_sorted() {
        let level = LevelTimeline::from_json(
            "d",
            r#"{"obstacles":[
                {"time":2.0,"type":"spike"},
                {"time":1.0,"type":"lava"},
                {"type":"cube"},
                {"time":0.5,"type":"cube"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            level.cues,
            vec![
                Cue {
                    time: 0.5,
                    kind: ObstacleKind::Cube
                },
                Cue {
                    time: 2.0,
                    kind: ObstacleKind::Spike
                },
            ]
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = LevelTimeline::from_json("broken", "{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Parse { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let source = DirLevelSource::new("/definitely/not/here");
        let err = source.load(PROOF_LEVEL_NAME).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_load_level_only_for_proof_level() {
        let source = MemorySource(r#"{"obstacles":[{"time":1,"type":"spike"}]}"#);

        let other = Settings::from_query("level=intro");
        assert!(load_level(&source, &other).is_none());

        let proof = Settings::from_query("level=proof_top_land.json");
        let level = load_level(&source, &proof).unwrap();
        assert_eq!(level.cues.len(), 1);
    }

    #[test]
    fn test_load_failure_falls_back() {
        let proof = Settings::from_query("level=proof_top_land");
        assert!(load_level(&MemorySource("42"), &proof).is_none());
    }

    #[test]
    fn test_shipped_proof_level_parses() {
        let source = DirLevelSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/levels"));
        let level = source.load(PROOF_LEVEL_NAME).unwrap();
        assert_eq!(
            level.cues,
            vec![Cue {
                time: 1.45,
                kind: ObstacleKind::Cube
            }]
        );
        assert_eq!(level.replay, ReplayConfig::default());
    }
}
