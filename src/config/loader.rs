//! Configuration file loading with precedence handling.
//!
//! Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).

use crate::animation::TransitionTimings;
use crate::gesture::GestureConfig;
use crate::layout::{RowMetrics, DEFAULT_DRAFT_LABEL};
use crate::model::{SwipeGesture, UnknownSwipeGesture};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DIALOG_ROW_CONFIG";

/// Environment variable overriding the swipe gesture.
pub const SWIPE_ACTION_ENV_VAR: &str = "DIALOG_ROW_SWIPE_ACTION";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Setting name as written in the file or environment.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; anything missing keeps its default.
/// Corresponds to `~/.config/dialog-row/config.toml`.
///
/// ```toml
/// swipe_action = "mute"
/// draft_label = "Draft"
///
/// [swipe]
/// commit_threshold_ratio = 0.45
///
/// [animations]
/// roll_ms = 430
///
/// [metrics]
/// row_height = 72.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Action revealed by swiping an ordinary conversation.
    #[serde(default)]
    pub swipe_action: Option<SwipeGesture>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Prefix shown before draft previews.
    #[serde(default)]
    pub draft_label: Option<String>,

    /// Swipe and press tunables.
    #[serde(default)]
    pub swipe: Option<SwipeSection>,

    /// Transition durations.
    #[serde(default)]
    pub animations: Option<AnimationSection>,

    /// Row geometry.
    #[serde(default)]
    pub metrics: Option<MetricsSection>,
}

/// `[swipe]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SwipeSection {
    /// Fraction of the row width past which a release commits.
    #[serde(default)]
    pub commit_threshold_ratio: Option<f32>,
    /// Movement below which a press is still a tap.
    #[serde(default)]
    pub touch_slop_px: Option<f32>,
    /// Hold time of a long press.
    #[serde(default)]
    pub long_press_ms: Option<u64>,
    /// Duration of the settle animation.
    #[serde(default)]
    pub settle_ms: Option<u64>,
}

/// `[animations]` section, all durations in milliseconds.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnimationSection {
    /// Pill pop-in.
    #[serde(default)]
    pub pop_ms: Option<u64>,
    /// Pill collapse.
    #[serde(default)]
    pub shrink_ms: Option<u64>,
    /// Counter digit roll.
    #[serde(default)]
    pub roll_ms: Option<u64>,
    /// Pin icon appearing.
    #[serde(default)]
    pub toggle_in_ms: Option<u64>,
    /// Pin icon disappearing.
    #[serde(default)]
    pub toggle_out_ms: Option<u64>,
    /// Mute, online and call fades.
    #[serde(default)]
    pub fade_ms: Option<u64>,
    /// Delivery icon morph.
    #[serde(default)]
    pub status_ms: Option<u64>,
    /// Rounded corners while swiping.
    #[serde(default)]
    pub corner_ms: Option<u64>,
}

/// `[metrics]` section, all distances in pixels.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Row height without the divider.
    #[serde(default)]
    pub row_height: Option<f32>,
    /// Avatar diameter.
    #[serde(default)]
    pub avatar_size: Option<f32>,
    /// Distance from the leading edge to the avatar.
    #[serde(default)]
    pub avatar_start: Option<f32>,
    /// Distance from the leading edge to title and preview.
    #[serde(default)]
    pub content_start: Option<f32>,
    /// Trailing padding of title and preview.
    #[serde(default)]
    pub end_padding: Option<f32>,
    /// Pill height.
    #[serde(default)]
    pub pill_height: Option<f32>,
    /// Smallest text width a pill is sized for.
    #[serde(default)]
    pub pill_min_text_width: Option<f32>,
    /// Horizontal padding on each side of pill text.
    #[serde(default)]
    pub pill_padding: Option<f32>,
    /// Size of title and preview-line icons.
    #[serde(default)]
    pub icon_size: Option<f32>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Action revealed by swiping an ordinary conversation.
    pub swipe_action: SwipeGesture,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Prefix shown before draft previews.
    pub draft_label: String,
    /// Lay rows out right to left.
    pub rtl: bool,
    /// Swipe and press tunables.
    pub gesture: GestureConfig,
    /// Transition durations.
    pub timings: TransitionTimings,
    /// Row geometry.
    pub metrics: RowMetrics,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            swipe_action: SwipeGesture::default(),
            log_file_path: default_log_path(),
            draft_label: DEFAULT_DRAFT_LABEL.to_string(),
            rtl: false,
            gesture: GestureConfig::default(),
            timings: TransitionTimings::default(),
            metrics: RowMetrics::default(),
        }
    }
}

impl ResolvedConfig {
    /// Checks values that parse but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.gesture.commit_threshold_ratio;
        if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
            return Err(invalid(
                "swipe.commit_threshold_ratio",
                format!("{ratio} is not in (0, 1]"),
            ));
        }
        let slop = self.gesture.touch_slop_px;
        if !(slop.is_finite() && slop >= 0.0) {
            return Err(invalid("swipe.touch_slop_px", format!("{slop} is negative")));
        }
        let m = &self.metrics;
        for (key, value) in [
            ("metrics.row_height", m.row_height),
            ("metrics.avatar_size", m.avatar_size),
            ("metrics.pill_height", m.pill_height),
            ("metrics.icon_size", m.icon_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(key, format!("{value} must be positive")));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/dialog-row/dialog-row.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory when no
/// state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("dialog-row").join("dialog-row.log")
    } else {
        PathBuf::from("dialog-row.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path: `<config_dir>/dialog-row/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dialog-row").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DIALOG_ROW_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `DIALOG_ROW_SWIPE_ACTION`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when the variable names no gesture.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(value) = std::env::var(SWIPE_ACTION_ENV_VAR) {
        config.swipe_action = value
            .parse()
            .map_err(|e: UnknownSwipeGesture| invalid(SWIPE_ACTION_ENV_VAR, e.to_string()))?;
    }
    Ok(config)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    let Some(config) = config_file else {
        return resolved;
    };

    if let Some(action) = config.swipe_action {
        resolved.swipe_action = action;
    }
    if let Some(path) = config.log_file_path {
        resolved.log_file_path = path;
    }
    if let Some(label) = config.draft_label {
        resolved.draft_label = label;
    }

    if let Some(swipe) = config.swipe {
        let g = &mut resolved.gesture;
        g.commit_threshold_ratio = swipe.commit_threshold_ratio.unwrap_or(g.commit_threshold_ratio);
        g.touch_slop_px = swipe.touch_slop_px.unwrap_or(g.touch_slop_px);
        g.long_press_ms = swipe.long_press_ms.unwrap_or(g.long_press_ms);
        g.settle_ms = swipe.settle_ms.unwrap_or(g.settle_ms);
    }

    if let Some(anim) = config.animations {
        let t = &mut resolved.timings;
        t.pop_ms = anim.pop_ms.unwrap_or(t.pop_ms);
        t.shrink_ms = anim.shrink_ms.unwrap_or(t.shrink_ms);
        t.roll_ms = anim.roll_ms.unwrap_or(t.roll_ms);
        t.toggle_in_ms = anim.toggle_in_ms.unwrap_or(t.toggle_in_ms);
        t.toggle_out_ms = anim.toggle_out_ms.unwrap_or(t.toggle_out_ms);
        t.fade_ms = anim.fade_ms.unwrap_or(t.fade_ms);
        t.status_ms = anim.status_ms.unwrap_or(t.status_ms);
        t.corner_ms = anim.corner_ms.unwrap_or(t.corner_ms);
    }

    if let Some(metrics) = config.metrics {
        let m = &mut resolved.metrics;
        m.row_height = metrics.row_height.unwrap_or(m.row_height);
        m.avatar_size = metrics.avatar_size.unwrap_or(m.avatar_size);
        m.avatar_start = metrics.avatar_start.unwrap_or(m.avatar_start);
        m.content_start = metrics.content_start.unwrap_or(m.content_start);
        m.end_padding = metrics.end_padding.unwrap_or(m.end_padding);
        m.pill_height = metrics.pill_height.unwrap_or(m.pill_height);
        m.pill_min_text_width = metrics.pill_min_text_width.unwrap_or(m.pill_min_text_width);
        m.pill_padding = metrics.pill_padding.unwrap_or(m.pill_padding);
        m.icon_size = metrics.icon_size.unwrap_or(m.icon_size);
    }

    resolved
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    swipe_action_override: Option<SwipeGesture>,
    rtl: bool,
) -> ResolvedConfig {
    if let Some(action) = swipe_action_override {
        config.swipe_action = action;
    }
    if rtl {
        config.rtl = true;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
