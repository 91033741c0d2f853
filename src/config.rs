//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsavl/rsavl.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `RSAVL_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Value;

/// Step pacing used with `--animate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Pause after each visited node during search/insert/delete
    pub visit_delay_ms: u64,
    /// Pause after each rotation step and redraw
    pub rotation_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            visit_delay_ms: 250,
            rotation_delay_ms: 500,
        }
    }
}

/// Inclusive range for random inserts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RandomConfig {
    pub min: Value,
    pub max: Value,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

/// Text drawing options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show height and balance factor next to each value
    pub show_balance: bool,
    /// Joiner for traversal output
    pub separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_balance: true,
            separator: " → ".into(),
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect
/// "not specified" while merging layers).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub animation: RawAnimationConfig,
    pub random: RawRandomConfig,
    pub display: RawDisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawAnimationConfig {
    pub visit_delay_ms: Option<u64>,
    pub rotation_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRandomConfig {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub show_balance: Option<bool>,
    pub separator: Option<String>,
}

/// Unified configuration for rsavl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub animation: AnimationConfig,
    pub random: RandomConfig,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for rsavl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsavl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsavl.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            animation: AnimationConfig {
                visit_delay_ms: overlay
                    .animation
                    .visit_delay_ms
                    .unwrap_or(self.animation.visit_delay_ms),
                rotation_delay_ms: overlay
                    .animation
                    .rotation_delay_ms
                    .unwrap_or(self.animation.rotation_delay_ms),
            },
            random: RandomConfig {
                min: overlay.random.min.unwrap_or(self.random.min),
                max: overlay.random.max.unwrap_or(self.random.max),
            },
            display: DisplayConfig {
                show_balance: overlay
                    .display
                    .show_balance
                    .unwrap_or(self.display.show_balance),
                separator: overlay
                    .display
                    .separator
                    .clone()
                    .unwrap_or_else(|| self.display.separator.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional extra config file (`--config`); must exist if given
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit local file
        if let Some(path) = local {
            let path = expand_path(path);
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, Self::env_source())?;

        current.validate()?;
        Ok(current)
    }

    fn env_source() -> Environment {
        Environment::with_prefix("RSAVL")
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply RSAVL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder().add_source(env).build().map_err(config_err)?;

        if let Ok(val) = config.get::<u64>("animation.visit_delay_ms") {
            settings.animation.visit_delay_ms = val;
        }
        if let Ok(val) = config.get::<u64>("animation.rotation_delay_ms") {
            settings.animation.rotation_delay_ms = val;
        }
        if let Ok(val) = config.get::<Value>("random.min") {
            settings.random.min = val;
        }
        if let Ok(val) = config.get::<Value>("random.max") {
            settings.random.max = val;
        }
        if let Ok(val) = config.get::<bool>("display.show_balance") {
            settings.display.show_balance = val;
        }
        if let Ok(val) = config.get_string("display.separator") {
            settings.display.separator = val;
        }

        Ok(settings)
    }

    /// Reject settings no command could work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.random.min > self.random.max {
            return Err(ApplicationError::Config {
                message: format!(
                    "random.min ({}) is greater than random.max ({})",
                    self.random.min, self.random.max
                ),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsavl configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsavl/rsavl.toml
#   Local:  file passed with --config
#   Env:    RSAVL_<SECTION>__<KEY>, e.g. RSAVL_RANDOM__MAX=500

[animation]
# Pause after each visited node (only with --animate)
# visit_delay_ms = 250
# Pause after each rotation step (only with --animate)
# rotation_delay_ms = 500

[random]
# Inclusive range for `random`
# min = 1
# max = 100

[display]
# Show [h=.. bf=..] next to each value
# show_balance = true
# Joiner for traversal output
# separator = " → "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::env_source().source(Some(map))
    }

    #[test]
    fn given_defaults_then_pacing_and_range_are_set() {
        let settings = Settings::default();
        assert_eq!(settings.animation.visit_delay_ms, 250);
        assert_eq!(settings.animation.rotation_delay_ms, 500);
        assert_eq!((settings.random.min, settings.random.max), (1, 100));
        assert!(settings.display.show_balance);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_values() {
        let raw: RawSettings = toml::from_str("[random]\nmax = 10\n").unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.random.max, 10);
        assert_eq!(merged.random.min, 1);
        assert_eq!(merged.animation, AnimationConfig::default());
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replace_values() {
        let env = env_from(&[
            ("RSAVL_RANDOM__MAX", "500"),
            ("RSAVL_ANIMATION__VISIT_DELAY_MS", "5"),
        ]);
        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();
        assert_eq!(settings.random.max, 500);
        assert_eq!(settings.animation.visit_delay_ms, 5);
        assert_eq!(settings.animation.rotation_delay_ms, 500);
    }

    #[test]
    fn given_inverted_range_then_validate_fails() {
        let mut settings = Settings::default();
        settings.random.min = 50;
        settings.random.max = 10;
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let text = Settings::default().to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
