//! Level definitions
//!
//! Levels are plain data: gravity, launch height, target templates, an
//! instruction line and an optional challenge. The built-in campaign lives
//! here; custom sets can be read from JSON.

use serde::{Deserialize, Serialize};

use super::challenge::{ChallengeSpec, Quantity};
use super::collision::Target;
use super::kinematics::LaunchParameters;
use crate::error::ConfigError;

/// Earth gravity in playfield units
pub const EARTH_GRAVITY: f32 = 9.81;
/// Moon gravity in playfield units
pub const MOON_GRAVITY: f32 = 1.62;
/// Default launch height above the ground line
pub const DEFAULT_LAUNCH_HEIGHT: f32 = 30.0;

/// Immutable level template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub gravity: f32,
    #[serde(default = "default_launch_height")]
    pub launch_height: f32,
    pub targets: Vec<Target>,
    pub instructions: String,
    #[serde(default)]
    pub challenge: Option<ChallengeSpec>,
}

fn default_launch_height() -> f32 {
    DEFAULT_LAUNCH_HEIGHT
}

impl LevelSpec {
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !(self.gravity > 0.0 && self.gravity.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "level {index}: gravity must be positive, got {}",
                self.gravity
            )));
        }
        if self
            .targets
            .iter()
            .any(|t| t.width <= 0.0 || t.height <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "level {index}: targets need a positive width and height"
            )));
        }
        Ok(())
    }
}

/// Parse and validate a level set
pub fn levels_from_json(json: &str) -> Result<Vec<LevelSpec>, ConfigError> {
    let levels: Vec<LevelSpec> = serde_json::from_str(json)?;
    for (i, level) in levels.iter().enumerate() {
        level.validate(i)?;
    }
    Ok(levels)
}

/// Built-in campaign, ground line at y = 460
pub fn campaign() -> Vec<LevelSpec> {
    vec![
        LevelSpec {
            gravity: EARTH_GRAVITY,
            launch_height: DEFAULT_LAUNCH_HEIGHT,
            targets: vec![Target::new(500.0, 440.0, 40.0, 40.0)],
            instructions: "Level 1: Hit the single target!".to_string(),
            challenge: None,
        },
        LevelSpec {
            gravity: EARTH_GRAVITY,
            launch_height: DEFAULT_LAUNCH_HEIGHT,
            targets: vec![
                Target::new(400.0, 440.0, 30.0, 30.0),
                Target::new(600.0, 380.0, 50.0, 50.0),
            ],
            instructions: "Level 2: Two targets! One is higher.".to_string(),
            challenge: Some(ChallengeSpec::ExactMatch {
                question: "At the very top of its flight, which velocity component is zero: \
                           horizontal or vertical?"
                    .to_string(),
                accepted: vec![
                    "vertical".to_string(),
                    "the vertical component".to_string(),
                    "vertical velocity".to_string(),
                    "vy".to_string(),
                ],
            }),
        },
        LevelSpec {
            gravity: EARTH_GRAVITY,
            launch_height: DEFAULT_LAUNCH_HEIGHT,
            targets: vec![Target::new(700.0, 430.0, 60.0, 60.0)],
            instructions: "Level 3: A distant challenge!".to_string(),
            challenge: Some(ChallengeSpec::NumericPair {
                question: "A ball leaves the ground at 60° and 40 m/s with g = 9.81 m/s². \
                           Give its maximum height (m) and its time to reach the top (s)."
                    .to_string(),
                launch: LaunchParameters::new(60.0, 40.0),
                gravity: EARTH_GRAVITY,
                quantities: [Quantity::MaxHeight, Quantity::TimeToPeak],
                tolerance: 0.5,
            }),
        },
        LevelSpec {
            gravity: EARTH_GRAVITY,
            launch_height: DEFAULT_LAUNCH_HEIGHT,
            targets: vec![Target::new(550.0, 360.0, 40.0, 40.0)],
            instructions: "Level 4: A raised target. Arc it in!".to_string(),
            challenge: Some(ChallengeSpec::KeywordPair {
                question: "Ignoring air resistance, name the only force on the projectile in \
                           flight, and the direction it points."
                    .to_string(),
                keywords: ["gravity".to_string(), "down".to_string()],
            }),
        },
        LevelSpec {
            gravity: MOON_GRAVITY,
            launch_height: 80.0,
            targets: vec![Target::new(650.0, 300.0, 50.0, 50.0)],
            instructions: "Level 5: Moon shot. Gravity is much weaker here.".to_string(),
            challenge: Some(ChallengeSpec::AttemptOnly {
                question: "Before launching, predict your shot's range and time of flight."
                    .to_string(),
                guidance: "Compare your predictions with the measured range and time of flight \
                           after the shot. Weaker gravity stretches both."
                    .to_string(),
                required_inputs: 2,
            }),
        },
    ]
}
