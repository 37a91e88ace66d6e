//! Slingshot Sim - projectile-motion teaching simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, forecasts, collisions, levels)
//! - `runner`: Fixed-step frame loop with a render hook
//! - `settings`: Process-wide simulation settings

pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, InputError};
pub use runner::{RenderSink, Runner};
pub use settings::{Settings, SimulationConfig};

/// Built-in defaults for `Settings`
pub mod consts {
    /// Fixed simulation timestep (20 Hz physics)
    pub const TIME_STEP: f32 = 0.05;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 500.0;
    /// Ground line sits this far above the bottom edge
    pub const GROUND_MARGIN: f32 = 40.0;
    pub const LAUNCH_ORIGIN_X: f32 = 80.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    pub const MAX_SPEED: f32 = 100.0;

    /// Pause between a cleared level and the next one
    pub const ADVANCE_DELAY_SECS: f32 = 2.0;
    /// Preview trace time ceiling
    pub const MAX_PREVIEW_SECS: f32 = 10.0;
    /// Analysis probe snap distance
    pub const SNAP_RADIUS: f32 = 15.0;
}
