//! Pre-launch trajectory prediction
//!
//! Two independent outputs:
//! - closed-form numbers (apex height, range, time of flight to the ground)
//! - a dashed preview trace built by stepping the same integrator as a live
//!   flight into a throwaway buffer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::{self, LaunchParameters};
use crate::settings::{Settings, SimulationConfig};

/// Closed-form flight prediction.
///
/// `None` means "unknown" (degenerate gravity or a non-finite result) and is
/// shown as such, never hidden. Known values are clamped to >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub max_height: Option<f32>,
    pub range: Option<f32>,
    pub time_of_flight: Option<f32>,
    /// Ground was unreachable; time of flight is the return-to-launch-height
    /// time instead of a landing time
    pub estimated: bool,
}

fn known(value: f32) -> Option<f32> {
    value.is_finite().then(|| value.max(0.0))
}

/// Predict apex, range and landing time for a launch
pub fn forecast(params: LaunchParameters, config: &SimulationConfig) -> Forecast {
    let g = config.gravity;
    let (vx, vy) = params.velocity();
    let max_height = kinematics::peak_height(vy, g).and_then(known);

    if g <= 0.0 {
        return Forecast {
            max_height,
            ..Forecast::default()
        };
    }

    // 0.5*g*t^2 - vy*t + (launchY - groundY) = 0, later root
    let a = 0.5 * g;
    let b = -vy;
    let c = config.launch_origin.y - config.ground_y;
    let discriminant = b * b - 4.0 * a * c;

    let (t_flight, estimated) = if discriminant >= 0.0 {
        ((-b + discriminant.sqrt()) / (2.0 * a), false)
    } else {
        (2.0 * vy / g, true)
    };

    Forecast {
        max_height,
        range: known(vx * t_flight),
        time_of_flight: known(t_flight),
        estimated,
    }
}

/// Step a launch forward until it lands, leaves the playfield or runs past
/// the preview time ceiling. The first point is the launch origin.
pub fn preview_path(
    params: LaunchParameters,
    config: &SimulationConfig,
    settings: &Settings,
) -> Vec<Vec2> {
    let dt = config.time_step;
    let max_steps = (settings.max_preview_secs / dt).ceil().max(0.0) as usize;
    let radius = settings.projectile_radius;

    let mut state = kinematics::launch_state(params, config.launch_origin);
    let mut points = Vec::with_capacity(max_steps.min(1024) + 1);
    points.push(state.pos);

    for _ in 0..max_steps {
        state = kinematics::step(state, config.gravity, dt);
        if state.pos.y + radius > config.ground_y
            || state.pos.x < 0.0
            || state.pos.x > settings.playfield_width
        {
            break;
        }
        points.push(state.pos);
    }

    points
}
