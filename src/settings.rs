//! Simulation settings
//!
//! Process-wide constants (time step, playfield, projectile size, timers).
//! Loaded from a JSON file when one is given, otherwise the built-in
//! defaults from `consts` apply.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::ConfigError;

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed physics step in seconds
    pub time_step: f32,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Distance from the bottom edge up to the ground line
    pub ground_margin: f32,
    /// Horizontal launch position
    pub launch_origin_x: f32,

    // === Projectile ===
    pub projectile_radius: f32,
    /// Upper bound of the speed control
    pub max_speed: f32,

    // === Timers ===
    /// Pause between clearing a level and loading the next one
    pub advance_delay_secs: f32,
    /// Longest flight the preview trace will simulate
    pub max_preview_secs: f32,
    /// Frame runner substep cap
    pub max_substeps: u32,

    // === Analysis ===
    /// How close a probe must be to a recorded sample to snap to it
    pub snap_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_step: consts::TIME_STEP,

            playfield_width: consts::PLAYFIELD_WIDTH,
            playfield_height: consts::PLAYFIELD_HEIGHT,
            ground_margin: consts::GROUND_MARGIN,
            launch_origin_x: consts::LAUNCH_ORIGIN_X,

            projectile_radius: consts::PROJECTILE_RADIUS,
            max_speed: consts::MAX_SPEED,

            advance_delay_secs: consts::ADVANCE_DELAY_SECS,
            max_preview_secs: consts::MAX_PREVIEW_SECS,
            max_substeps: consts::MAX_SUBSTEPS,

            snap_radius: consts::SNAP_RADIUS,
        }
    }
}

impl Settings {
    /// Y coordinate of the ground line (render space)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.playfield_height - self.ground_margin
    }

    /// Advance delay rounded up to whole ticks
    pub fn advance_delay_ticks(&self) -> u32 {
        (self.advance_delay_secs / self.time_step).ceil().max(0.0) as u32
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.playfield_width <= 0.0 || self.ground_y() <= 0.0 {
            return Err(ConfigError::Invalid(
                "playfield must have a positive width and a ground line inside it".to_string(),
            ));
        }
        if self.projectile_radius < 0.0 || self.snap_radius < 0.0 {
            return Err(ConfigError::Invalid(
                "radii must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from a file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {e})", path.display());
                Self::default()
            }
        }
    }
}

/// Per-level physics configuration derived from `Settings` and a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub gravity: f32,
    pub time_step: f32,
    pub ground_y: f32,
    pub launch_origin: Vec2,
}

impl SimulationConfig {
    pub fn new(settings: &Settings, gravity: f32, launch_height: f32) -> Self {
        let ground_y = settings.ground_y();
        Self {
            gravity,
            time_step: settings.time_step,
            ground_y,
            launch_origin: Vec2::new(settings.launch_origin_x, ground_y - launch_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let settings = Settings::default();
        assert_eq!(settings.ground_y(), 460.0);
        assert_eq!(settings.advance_delay_ticks(), 40);

        let config = SimulationConfig::new(&settings, 9.81, 30.0);
        assert_eq!(config.launch_origin, Vec2::new(80.0, 430.0));
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{ "time_step": 0.01, "snap_radius": 5 }"#).unwrap();
        assert_eq!(settings.time_step, 0.01);
        assert_eq!(settings.snap_radius, 5.0);
        assert_eq!(settings.playfield_width, consts::PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_bad_step() {
        assert!(matches!(
            Settings::from_json(r#"{ "time_step": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/slingshot-settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let json = Settings::default().to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), Settings::default());
    }
}
