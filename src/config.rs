//! Persistent application configuration model and defaults.

use crate::app_state::DEFAULT_VOLUME;

/// Root configuration persisted to `lumina.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Playback preferences restored between sessions.
    pub ui: UiConfig,
}

/// Playback preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UiConfig {
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            shuffle: false,
            repeat: false,
        }
    }
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

/// Clamps loaded values into their valid ranges.
pub fn sanitize_config(mut config: Config) -> Config {
    config.ui.volume = config.ui.volume.clamp(0.0, 1.0);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_restore_a_fresh_session() {
        let config = Config::default();
        assert_eq!(config.ui.volume, DEFAULT_VOLUME);
        assert!(!config.ui.shuffle);
        assert!(!config.ui.repeat);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("[ui]\nshuffle = true\n").expect("toml should parse");
        assert!(config.ui.shuffle);
        assert_eq!(config.ui.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn sanitize_clamps_volume() {
        let mut config = Config::default();
        config.ui.volume = 3.5;
        assert_eq!(sanitize_config(config).ui.volume, 1.0);

        let mut config = Config::default();
        config.ui.volume = -1.0;
        assert_eq!(sanitize_config(config).ui.volume, 0.0);
    }
}
