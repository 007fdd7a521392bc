//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/fallforest/fallforest.toml`
//! 3. Explicit config file: `--config <FILE>`
//! 4. Environment variables: `FALLFOREST_*` prefix
//! 5. Command line flags (applied by the CLI via [`Settings::merge_with`])

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Capacity, DomainError, RootParams};

/// Shape of the generated tree and the spring target.
///
/// Counts are signed so that negative values coming from files or the
/// environment reach validation instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ForestConfig {
    /// Leaves on the root branch
    pub root_leaves: i64,
    /// Children of the root branch
    pub root_branches: i64,
    /// Leaves shed per burst (raised to 1 if lower)
    pub wind_strength: i64,
    /// Leaves per branch after the grow pass
    pub spring_capacity: i64,
    /// Seed for reproducible trees; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            root_leaves: 3,
            root_branches: 2,
            wind_strength: 2,
            spring_capacity: 3,
            seed: None,
        }
    }
}

impl ForestConfig {
    pub fn root_params(&self) -> Result<RootParams, DomainError> {
        RootParams::new(self.root_leaves, self.root_branches, self.wind_strength)
    }

    pub fn capacity(&self) -> Result<Capacity, DomainError> {
        Capacity::new(self.spring_capacity)
    }
}

/// Delay between leaf events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    /// Milliseconds to wait after each event (0 disables pacing)
    pub interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

impl PacingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Event log file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path; no log file when unset
    pub file: Option<PathBuf>,
    /// Append to an existing log instead of truncating it
    pub append: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("leaf_fall_log.txt")),
            append: false,
        }
    }
}

/// Raw forest config for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawForestConfig {
    pub root_leaves: Option<i64>,
    pub root_branches: Option<i64>,
    pub wind_strength: Option<i64>,
    pub spring_capacity: Option<i64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPacingConfig {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLogConfig {
    pub file: Option<PathBuf>,
    pub append: Option<bool>,
    /// Drop the log file entirely (command line only)
    #[serde(skip)]
    pub disabled: bool,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub forest: RawForestConfig,
    pub pacing: RawPacingConfig,
    pub log: RawLogConfig,
}

/// Unified configuration for fallforest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub forest: ForestConfig,
    pub pacing: PacingConfig,
    pub log: LogConfig,
}

/// Get the XDG config directory for fallforest.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fallforest").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("fallforest.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/fallforest/fallforest.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `FALLFOREST_*`, sections separated by `__`
    ///    (e.g. `FALLFOREST_FOREST__WIND_STRENGTH=4`)
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge overlay onto self: every field the overlay specifies wins.
    ///
    /// An overlay log path is expanded here, so flags get the same `~` and
    /// `$VAR` handling as files and environment.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let forest = &overlay.forest;
        let log = LogConfig {
            file: if overlay.log.disabled {
                None
            } else {
                overlay
                    .log
                    .file
                    .as_deref()
                    .map(expand_path)
                    .or_else(|| self.log.file.clone())
            },
            append: overlay.log.append.unwrap_or(self.log.append),
        };

        Self {
            forest: ForestConfig {
                root_leaves: forest.root_leaves.unwrap_or(self.forest.root_leaves),
                root_branches: forest.root_branches.unwrap_or(self.forest.root_branches),
                wind_strength: forest.wind_strength.unwrap_or(self.forest.wind_strength),
                spring_capacity: forest
                    .spring_capacity
                    .unwrap_or(self.forest.spring_capacity),
                seed: forest.seed.or(self.forest.seed),
            },
            pacing: PacingConfig {
                interval_ms: overlay
                    .pacing
                    .interval_ms
                    .unwrap_or(self.pacing.interval_ms),
            },
            log,
        }
    }

    /// Apply FALLFOREST_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FALLFOREST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<i64>(&config, "forest.root_leaves")? {
            settings.forest.root_leaves = val;
        }
        if let Some(val) = env_value::<i64>(&config, "forest.root_branches")? {
            settings.forest.root_branches = val;
        }
        if let Some(val) = env_value::<i64>(&config, "forest.wind_strength")? {
            settings.forest.wind_strength = val;
        }
        if let Some(val) = env_value::<i64>(&config, "forest.spring_capacity")? {
            settings.forest.spring_capacity = val;
        }
        if let Some(val) = env_value::<u64>(&config, "forest.seed")? {
            settings.forest.seed = Some(val);
        }
        if let Some(val) = env_value::<u64>(&config, "pacing.interval_ms")? {
            settings.pacing.interval_ms = val;
        }
        if let Ok(val) = config.get_string("log.file") {
            settings.log.file = Some(PathBuf::from(val));
        }
        if let Some(val) = env_value::<bool>(&config, "log.append")? {
            settings.log.append = val;
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(file) = &self.log.file {
            self.log.file = Some(expand_path(file));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# fallforest configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/fallforest/fallforest.toml
#   File:   fallforest --config <FILE>
#   Env:    FALLFOREST_<SECTION>__<KEY>, e.g. FALLFOREST_FOREST__SEED=42
#   Flags:  fallforest run --leaves 5 --wind 3 ...

[forest]
# Leaves on the root branch
# root_leaves = 3

# Children of the root branch (each child gets 1-3 leaves and 0-1 children)
# root_branches = 2

# Leaves a branch sheds per gust; values below 1 are raised to 1
# wind_strength = 2

# Leaves per branch once spring is over
# spring_capacity = 3

# Seed for a reproducible tree (random when unset)
# seed = 42

[pacing]
# Delay after each leaf event, in milliseconds (0 = no delay)
# interval_ms = 500

[log]
# Event log file (supports ~ and $VAR)
# file = "leaf_fall_log.txt"

# Append instead of truncating
# append = false
"#
        .to_string()
    }
}

/// Read an optional environment override; a present but unparsable value is an error.
fn env_value<'de, T: Deserialize<'de>>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
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

    #[test]
    fn given_defaults_when_created_then_match_classic_forest() {
        let settings = Settings::default();
        assert_eq!(settings.forest.root_leaves, 3);
        assert_eq!(settings.forest.root_branches, 2);
        assert_eq!(settings.forest.wind_strength, 2);
        assert_eq!(settings.forest.spring_capacity, 3);
        assert_eq!(settings.pacing.interval(), Duration::from_millis(500));
        assert_eq!(settings.log.file, Some(PathBuf::from("leaf_fall_log.txt")));
        assert!(!settings.log.append);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            forest: RawForestConfig {
                wind_strength: Some(5),
                seed: Some(9),
                ..Default::default()
            },
            pacing: RawPacingConfig {
                interval_ms: Some(0),
            },
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.forest.wind_strength, 5);
        assert_eq!(merged.forest.seed, Some(9));
        assert_eq!(merged.forest.root_leaves, 3);
        assert_eq!(merged.pacing.interval_ms, 0);
        assert_eq!(merged.log, LogConfig::default());
    }

    #[test]
    fn given_disabled_log_when_merging_then_drops_file() {
        let overlay = RawSettings {
            log: RawLogConfig {
                file: Some(PathBuf::from("ignored.txt")),
                disabled: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.log.file, None);
    }

    #[test]
    fn given_negative_leaves_when_validating_then_invalid_configuration() {
        let forest = ForestConfig {
            root_leaves: -2,
            ..Default::default()
        };
        assert!(forest.root_params().is_err());
    }

    #[test]
    fn given_zero_capacity_when_validating_then_invalid_configuration() {
        let forest = ForestConfig {
            spring_capacity: 0,
            ..Default::default()
        };
        assert!(forest.capacity().is_err());
    }

    #[test]
    fn given_tilde_in_log_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.log.file = Some(PathBuf::from("~/leaves.txt"));

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let file = settings.log.file.unwrap();
        assert!(file.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_settings_when_serialising_then_round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.forest.seed = Some(42);

        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();

        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsing_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
