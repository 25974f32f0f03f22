//! Configuration load/save under the platform config directory.
//!
//! A missing file is created with defaults on first load; a malformed file
//! falls back to defaults with a warning. Save failures are logged and never
//! fatal.

use std::path::PathBuf;

use log::{info, warn};

use crate::config::{sanitize_config, Config};

const CONFIG_FILE_NAME: &str = "lumina.toml";

pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Loads the persisted configuration, writing defaults on first run.
pub fn load_or_create() -> Config {
    let Some(config_file) = config_file_path() else {
        warn!("No config directory available; using default config");
        return Config::default();
    };

    if !config_file.exists() {
        let default_config = Config::default();
        info!(
            "Config file not found. Creating default config. path={}",
            config_file.display()
        );
        save(&default_config);
        return default_config;
    }

    let content = match std::fs::read_to_string(&config_file) {
        Ok(content) => content,
        Err(err) => {
            warn!("Failed to read {}: {}", config_file.display(), err);
            return Config::default();
        }
    };

    let config = match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            warn!("Failed to parse {}: {}", config_file.display(), err);
            Config::default()
        }
    };
    sanitize_config(config)
}

/// Writes the configuration back out. Best effort; failures are logged.
pub fn save(config: &Config) {
    let Some(config_file) = config_file_path() else {
        warn!("No config directory available; config not saved");
        return;
    };

    let serialized = match toml::to_string(config) {
        Ok(serialized) => serialized,
        Err(err) => {
            warn!("Failed to serialize config: {}", err);
            return;
        }
    };
    if let Err(err) = std::fs::write(&config_file, serialized) {
        warn!("Failed to write {}: {}", config_file.display(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.ui.volume = 0.25;
        config.ui.repeat = true;

        let serialized = toml::to_string(&config).expect("config should serialize");
        let parsed: Config = toml::from_str(&serialized).expect("config should parse");
        assert_eq!(parsed, config);
    }
}
