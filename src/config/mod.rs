use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

mod key_bindings;
pub use key_bindings::{KeyBinding, KeyBindings};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_line_numbers")]
    pub line_numbers: bool,
    #[serde(default)]
    pub key_bindings: KeyBindings,
}

fn default_line_numbers() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_status_line_bg")]
    pub status_line_bg: String,
    #[serde(default = "default_status_line_fg")]
    pub status_line_fg: String,
}

fn default_status_line_bg() -> String {
    "#4b5263".to_string()
}

fn default_status_line_fg() -> String {
    "#abb2bf".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            line_numbers: default_line_numbers(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_line_bg: default_status_line_bg(),
            status_line_fg: default_status_line_fg(),
        }
    }
}

impl Config {
    /// Load the config file, writing out the defaults on first run. Any
    /// failure to locate, read or parse falls back to the defaults so a
    /// broken config never keeps the editor from starting.
    pub fn load() -> Self {
        let config_path = match config_dir() {
            Ok(dir) => dir.join("config.toml"),
            Err(_) => return Config::default(),
        };

        if config_path.exists() {
            match fs::read_to_string(&config_path)
                .ok()
                .and_then(|s| toml::from_str(&s).ok())
            {
                Some(config) => config,
                None => {
                    log::warn!("Could not read {:?}; using default config", config_path);
                    Config::default()
                }
            }
        } else {
            let config = Config::default();
            // Best effort; a read-only home directory is not fatal.
            if let Err(err) = config.save() {
                log::warn!("Could not write default config: {}", err);
            }
            config
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = config_dir()?;
        let config_path = config_dir.join("config.toml");

        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

        let config_str =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }
}

fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .with_context(|| "Failed to determine config directory")?
        .join("modus");

    Ok(config_dir)
}
