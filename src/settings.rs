//! Runtime switches
//!
//! Hosts pass these as a URL-style query string, e.g.
//! `level=proof_top_land.json&replay=true&debugCollision=true`.

use serde::{Deserialize, Serialize};

use crate::consts::WORLD_WIDTH;

/// The level that drives the replay proof scenario
pub const PROOF_LEVEL_NAME: &str = "proof_top_land";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Log collisions and expose hitboxes to the renderer
    pub debug_collision: bool,
    /// Run the scripted replay verifier (proof level only)
    pub replay: bool,
    /// Level name without the `.json` suffix
    pub level: Option<String>,
    /// Seed for random obstacle kinds
    pub seed: u64,
    /// Width of the visible world (obstacles spawn just past it)
    pub world_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_collision: false,
            replay: false,
            level: None,
            seed: 0,
            world_width: WORLD_WIDTH,
        }
    }
}

impl Settings {
    /// Parse `key=value` pairs separated by `&`
    ///
    /// Unknown keys and unparsable values are ignored. Boolean switches are on
    /// only for the literal `true`.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "debugCollision" => settings.debug_collision = value == "true",
                "replay" => settings.replay = value == "true",
                "level" if !value.is_empty() => {
                    settings.level = Some(value.trim_end_matches(".json").to_string());
                }
                "seed" => match value.parse() {
                    Ok(seed) => settings.seed = seed,
                    Err(_) => log::warn!("Ignoring invalid seed {value:?}"),
                },
                "width" => match value.parse::<f32>() {
                    Ok(width) if width > 0.0 => settings.world_width = width,
                    _ => log::warn!("Ignoring invalid width {value:?}"),
                },
                _ => log::debug!("Ignoring unknown setting {key:?}"),
            }
        }

        settings
    }

    /// The proof level is selected
    pub fn uses_proof_level(&self) -> bool {
        self.level.as_deref() == Some(PROOF_LEVEL_NAME)
    }

    /// Replay verification was requested for the proof level
    pub fn replay_enabled(&self) -> bool {
        self.replay && self.uses_proof_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_query("");
        assert_eq!(settings, Settings::default());
        assert!(!settings.replay_enabled());
    }

    #[test]
    fn test_proof_query() {
        let settings =
            Settings::from_query("?level=proof_top_land.json&replay=true&debugCollision=true");
        assert_eq!(settings.level.as_deref(), Some(PROOF_LEVEL_NAME));
        assert!(settings.uses_proof_level());
        assert!(settings.replay_enabled());
        assert!(settings.debug_collision);
    }

    #[test]
    fn test_replay_needs_proof_level() {
        let settings = Settings::from_query("level=intro&replay=true");
        assert!(settings.replay);
        assert!(!settings.replay_enabled());
    }

    #[test]
    fn test_only_literal_true_enables() {
        let settings = Settings::from_query("replay=1&debugCollision=yes");
        assert!(!settings.replay);
        assert!(!settings.debug_collision);
    }

    #[test]
    fn test_numeric_values() {
        let settings = Settings::from_query("seed=42&width=640");
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.world_width, 640.0);

        let settings = Settings::from_query("seed=abc&width=-3");
        assert_eq!(settings.seed, 0);
        assert_eq!(settings.world_width, WORLD_WIDTH);
    }
}
