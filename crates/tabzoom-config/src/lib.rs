//! Tabzoom configuration system
//!
//! This crate provides centralized configuration for the tab shell and its
//! zoom transition, loading settings from `tabzoom.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "tabzoom.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TabzoomConfig {
    /// Spring timings and corner radii of the zoom transition
    pub transition: TransitionConfig,
    /// Drag gesture tuning for the interactive dismiss
    pub gesture: GestureConfig,
    /// Tab grid and screen geometry
    pub shell: ShellConfig,
}

/// Timing of one spring-driven animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpringConfig {
    /// Fixed duration in milliseconds
    pub duration_ms: f32,
    /// Damping ratio (1.0 is critically damped)
    pub damping_ratio: f32,
    /// Initial velocity, in units of total travel per second
    pub initial_velocity: f32,
}

impl SpringConfig {
    pub const fn new(duration_ms: f32, damping_ratio: f32, initial_velocity: f32) -> Self {
        Self {
            duration_ms,
            damping_ratio,
            initial_velocity,
        }
    }
}

/// Zoom transition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Grid → browser (button-triggered push)
    pub forward: SpringConfig,
    /// Browser → grid (button-triggered pop)
    pub backward: SpringConfig,
    /// Settle back to the browser after a cancelled drag
    pub interactive_cancel: SpringConfig,
    /// Settle into the grid cell after a committed drag
    pub interactive_commit: SpringConfig,
    /// Corner radius of a grid thumbnail
    pub small_corner_radius: f32,
    /// Corner radius of the full-screen overlay
    pub full_corner_radius: f32,
}

/// Which way the user swipes to dismiss the browser into the grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DismissDirection {
    /// Negative vertical translation drives the effect.
    #[default]
    Up,
    /// Positive vertical translation drives the effect.
    Down,
}

/// Interactive gesture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum displacement (px) at release for the dismiss to commit
    pub commit_displacement: f32,
    /// Multiplier turning the drag fraction into the scale coefficient
    pub drag_gain: f32,
    /// Offset inside the inverse-square scale curve
    pub scale_offset: f32,
    /// Asymptotic minimum of the scale curve
    pub scale_floor: f32,
    /// Cap of the drag fraction used for vertical displacement
    pub max_displacement_fraction: f32,
    /// Pointer travel (px) before a drag is recognized
    pub touch_slop: f32,
    /// Sliding window used to estimate release velocity
    pub velocity_window_ms: f32,
    /// Velocity cap in px/s
    pub max_fling_velocity: f32,
    pub dismiss_direction: DismissDirection,
}

/// Shell configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Spacing between grid cells and the grid's horizontal inset
    pub cell_spacing: f32,
    /// Cell height as a fraction of `cell_width * screen aspect`
    pub cell_height_ratio: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the status-bar area trimmed from page captures
    pub safe_area_top_inset: f32,
    /// URL opened by "add tab"
    pub new_tab_url: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            forward: SpringConfig::new(700.0, 0.99, 9.0),
            backward: SpringConfig::new(250.0, 0.99, 6.0),
            interactive_cancel: SpringConfig::new(500.0, 0.99, 4.0),
            interactive_commit: SpringConfig::new(250.0, 0.99, 6.0),
            small_corner_radius: 16.0,
            full_corner_radius: 50.0,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_displacement: 50.0,
            drag_gain: 10.0,
            scale_offset: 1.414,
            scale_floor: 0.5,
            max_displacement_fraction: 0.35,
            touch_slop: 8.0,
            velocity_window_ms: 100.0,
            max_fling_velocity: 8_000.0,
            dismiss_direction: DismissDirection::Up,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            cell_spacing: 10.0,
            cell_height_ratio: 0.7,
            screen_width: 390.0,
            screen_height: 844.0,
            safe_area_top_inset: 47.0,
            new_tab_url: "https://en.wikipedia.org".to_string(),
        }
    }
}

impl TabzoomConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `tabzoom.toml` in the current directory,
    /// or return the defaults if it is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                log::warn!("{err}; using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        // Transition settings
        if let Some(ms) = env_f32("TABZOOM_FORWARD_DURATION_MS") {
            self.transition.forward.duration_ms = ms;
        }
        if let Some(ms) = env_f32("TABZOOM_BACKWARD_DURATION_MS") {
            self.transition.backward.duration_ms = ms;
        }
        if let Some(radius) = env_f32("TABZOOM_SMALL_CORNER_RADIUS") {
            self.transition.small_corner_radius = radius;
        }
        if let Some(radius) = env_f32("TABZOOM_FULL_CORNER_RADIUS") {
            self.transition.full_corner_radius = radius;
        }

        // Gesture settings
        if let Some(px) = env_f32("TABZOOM_COMMIT_DISPLACEMENT") {
            self.gesture.commit_displacement = px;
        }
        if let Some(px) = env_f32("TABZOOM_TOUCH_SLOP") {
            self.gesture.touch_slop = px;
        }
        if let Ok(val) = std::env::var("TABZOOM_DISMISS_DIRECTION") {
            if val.eq_ignore_ascii_case("down") {
                self.gesture.dismiss_direction = DismissDirection::Down;
            } else if val.eq_ignore_ascii_case("up") {
                self.gesture.dismiss_direction = DismissDirection::Up;
            } else {
                log::warn!("ignoring TABZOOM_DISMISS_DIRECTION={val}");
            }
        }

        // Shell settings
        if let Some(w) = env_f32("TABZOOM_SCREEN_WIDTH") {
            self.shell.screen_width = w;
        }
        if let Some(h) = env_f32("TABZOOM_SCREEN_HEIGHT") {
            self.shell.screen_height = h;
        }
        if let Some(inset) = env_f32("TABZOOM_SAFE_AREA_TOP") {
            self.shell.safe_area_top_inset = inset;
        }
        if let Ok(url) = std::env::var("TABZOOM_NEW_TAB_URL") {
            self.shell.new_tab_url = url;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from tabzoom.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_f32(key: &str) -> Option<f32> {
    let val = std::env::var(key).ok()?;
    match val.parse::<f32>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => {
            log::warn!("ignoring {key}={val}: not a number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TabzoomConfig::default();
        assert_eq!(config.transition.forward, SpringConfig::new(700.0, 0.99, 9.0));
        assert_eq!(config.transition.backward, SpringConfig::new(250.0, 0.99, 6.0));
        assert_eq!(config.transition.small_corner_radius, 16.0);
        assert_eq!(config.transition.full_corner_radius, 50.0);
        assert_eq!(config.gesture.commit_displacement, 50.0);
        assert_eq!(config.gesture.dismiss_direction, DismissDirection::Up);
    }

    #[test]
    fn test_toml_serialization() {
        let config = TabzoomConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: TabzoomConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: TabzoomConfig = toml::from_str(
            r#"
            [gesture]
            commit_displacement = 80.0
            dismiss_direction = "down"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.gesture.commit_displacement, 80.0);
        assert_eq!(parsed.gesture.dismiss_direction, DismissDirection::Down);
        assert_eq!(parsed.gesture.touch_slop, 8.0);
        assert_eq!(parsed.transition, TransitionConfig::default());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = TabzoomConfig::load_from_file("/nonexistent/tabzoom.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if tabzoom.toml doesn't exist
        let config = TabzoomConfig::load_or_default();
        assert!(config.transition.forward.duration_ms > 0.0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("TABZOOM_FORWARD_DURATION_MS", "900");
            std::env::set_var("TABZOOM_DISMISS_DIRECTION", "Down");
            std::env::set_var("TABZOOM_TOUCH_SLOP", "not-a-number");
        }

        let mut config = TabzoomConfig::default();
        config.merge_with_env();

        assert_eq!(config.transition.forward.duration_ms, 900.0);
        assert_eq!(config.gesture.dismiss_direction, DismissDirection::Down);
        assert_eq!(config.gesture.touch_slop, 8.0);

        unsafe {
            std::env::remove_var("TABZOOM_FORWARD_DURATION_MS");
            std::env::remove_var("TABZOOM_DISMISS_DIRECTION");
            std::env::remove_var("TABZOOM_TOUCH_SLOP");
        }
    }
}
