//! Auto-aim
//!
//! Seeded random search over launch parameters. Each candidate is flown on a
//! scratch copy of the engine, so what it reports is exactly what a real
//! launch from the same state would do.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{self, FlightEnd};
use super::kinematics::LaunchParameters;
use super::state::EngineState;
use super::tick::run_flight;

/// Upper bound on ticks for one trial flight
const TRIAL_MAX_TICKS: u32 = 20_000;

/// Result of one trial flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    pub params: LaunchParameters,
    pub hits: usize,
    pub reason: Option<FlightEnd>,
}

/// Fly `params` on a copy of `state` and count the targets it takes down
pub fn trial(state: &EngineState, params: LaunchParameters) -> Option<Trial> {
    if !state.can_launch() {
        return None;
    }
    let mut scratch = state.clone();
    scratch.events.clear();
    scratch
        .set_launch_parameters(params.angle_degrees, params.speed)
        .ok()?;
    scratch.launch();
    let reason = run_flight(&mut scratch, TRIAL_MAX_TICKS);
    Some(Trial {
        params: scratch.params,
        hits: collision::hit_count(&scratch.targets),
        reason,
    })
}

/// Try up to `attempts` random launches and return the first that clears
/// every remaining target, or the best partial one seen
pub fn search(state: &EngineState, rng: &mut Pcg32, attempts: usize) -> Option<Trial> {
    let max_speed = state.settings.max_speed;
    if max_speed <= 0.0 {
        return None;
    }

    let total = state.targets.len();
    let mut best: Option<Trial> = None;

    for _ in 0..attempts {
        let params = LaunchParameters::new(
            rng.random_range(5.0..85.0),
            rng.random_range(max_speed * 0.1..=max_speed),
        );
        let result = trial(state, params)?;
        if result.hits == total {
            log::debug!("Auto-aim found {:?}", result.params);
            return Some(result);
        }
        if best.is_none_or(|b| result.hits > b.hits) {
            best = Some(result);
        }
    }

    best
}
