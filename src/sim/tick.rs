//! Fixed timestep simulation tick
//!
//! One call advances the engine by exactly one `time_step`, whatever the
//! host's frame timing. Inputs for the tick are applied first, then the
//! flight is stepped, then the level-advance countdown runs.

use glam::Vec2;

use super::collision::FlightEnd;
use super::kinematics::LaunchParameters;
use super::state::EngineState;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw control values (angle degrees, speed); clamped on apply
    pub controls: Option<LaunchParameters>,
    /// Fire (ignored while flying)
    pub launch: bool,
    /// Reload the current level
    pub reset: bool,
    /// Toggle analysis mode (ignored while flying)
    pub toggle_analysis: bool,
    /// Probe position while in analysis mode
    pub probe: Option<Vec2>,
}

/// Advance the engine by one fixed timestep.
///
/// Returns the reason if a flight ended during this tick.
pub fn tick(state: &mut EngineState, input: &TickInput) -> Option<FlightEnd> {
    if input.reset {
        state.reset();
    }

    if let Some(controls) = input.controls {
        if let Err(e) = state.set_launch_parameters(controls.angle_degrees, controls.speed) {
            log::warn!("Ignoring controls: {e}");
        }
    }

    if input.toggle_analysis {
        state.toggle_analysis();
    }

    if input.launch {
        state.launch();
    }

    if let Some(at) = input.probe {
        state.probe(at);
    }

    let ended = state.step_flight();
    state.tick_pending_advance();
    ended
}

/// Tick with no input until the current flight ends, at most `max_ticks`
/// times. Returns the termination reason, `None` if still flying.
pub fn run_flight(state: &mut EngineState, max_ticks: u32) -> Option<FlightEnd> {
    let idle = TickInput::default();
    for _ in 0..max_ticks {
        if !state.is_flying() {
            break;
        }
        if let Some(reason) = tick(state, &idle) {
            return Some(reason);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::collision::Target;
    use crate::sim::level::{self, LevelSpec};
    use crate::sim::state::{FlightPhase, LevelStatus};

    fn launch_input() -> TickInput {
        TickInput {
            launch: true,
            ..Default::default()
        }
    }

    /// One level whose target can't be reached, so every flight is a miss
    fn unreachable_level() -> Vec<LevelSpec> {
        vec![LevelSpec {
            gravity: 9.81,
            launch_height: 30.0,
            targets: vec![Target::new(780.0, 0.0, 10.0, 10.0)],
            instructions: "miss".to_string(),
            challenge: None,
        }]
    }

    /// Target covering the launch area, so the first step clears the level
    fn trivial_levels(count: usize) -> Vec<LevelSpec> {
        (0..count)
            .map(|i| LevelSpec {
                gravity: 9.81,
                launch_height: 30.0,
                targets: vec![Target::new(40.0, 380.0, 100.0, 100.0)],
                instructions: format!("level {}", i + 1),
                challenge: None,
            })
            .collect()
    }

    #[test]
    fn test_tick_idle_to_flying() {
        let mut state = EngineState::new(Settings::default(), level::campaign());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, FlightPhase::Idle);
        assert!(state.path.is_empty());

        tick(&mut state, &launch_input());
        assert_eq!(state.phase, FlightPhase::Flying);
        // Launch sample plus the first step
        assert_eq!(state.path.len(), 2);
        let dt = state.config.time_step;
        assert!((state.path.samples()[1].t - dt).abs() < 1e-6);
    }

    #[test]
    fn test_miss_reports_hit_count() {
        let mut state = EngineState::new(Settings::default(), unreachable_level());
        tick(&mut state, &launch_input());
        let reason = run_flight(&mut state, 10_000);
        assert!(matches!(
            reason,
            Some(FlightEnd::Ground) | Some(FlightEnd::OutOfBounds)
        ));
        assert_eq!(state.phase, FlightPhase::Idle);
        assert_eq!(state.message, "Try Again for Level 1. You hit 0/1 targets.");
        assert!(state.last_stats.is_some());
        assert!(state.scheduled_advance().is_none());
        // Preview is back for the next attempt
        assert!(!state.preview.is_empty());
    }

    #[test]
    fn test_clear_advances_after_delay() {
        let mut state = EngineState::new(Settings::default(), trivial_levels(2));
        let ended = tick(&mut state, &launch_input());
        assert_eq!(ended, Some(FlightEnd::AllTargetsHit));
        assert_eq!(state.message, "Level 1 Cleared! Well Done!");
        assert!(state.scheduled_advance().is_some());

        let delay = state.settings.advance_delay_ticks();
        // The clearing tick already counted one off
        for _ in 0..delay - 2 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status(), LevelStatus::Active(0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.status(), LevelStatus::Active(1));
        assert!(state.scheduled_advance().is_none());
        assert!(state.path.is_empty());
    }

    #[test]
    fn test_reset_mid_flight_cancels_advance() {
        let mut state = EngineState::new(Settings::default(), trivial_levels(3));
        tick(&mut state, &launch_input());
        assert!(state.scheduled_advance().is_some());

        // Relaunch while the advance is pending, then reset mid-flight
        tick(&mut state, &launch_input());
        assert!(state.scheduled_advance().is_some());
        assert!(state.launch());
        assert!(state.is_flying());
        tick(
            &mut state,
            &TickInput {
                reset: true,
                ..Default::default()
            },
        );
        assert!(!state.is_flying());
        assert!(state.path.is_empty());
        assert!(state.scheduled_advance().is_none());

        // Long after the scheduled delay the level has not moved
        for _ in 0..state.settings.advance_delay_ticks() * 3 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status(), LevelStatus::Active(0));
    }

    #[test]
    fn test_campaign_completion_disables_launch() {
        let mut state = EngineState::new(Settings::default(), trivial_levels(1));
        tick(&mut state, &launch_input());
        for _ in 0..state.settings.advance_delay_ticks() {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status(), LevelStatus::Completed);
        assert!(state.targets.is_empty());
        assert_eq!(state.message, "All Levels Completed! Congratulations!");

        tick(&mut state, &launch_input());
        assert_eq!(state.phase, FlightPhase::Idle);
        assert!(state.path.is_empty());
    }

    #[test]
    fn test_controls_applied_before_launch() {
        let mut state = EngineState::new(Settings::default(), level::campaign());
        tick(
            &mut state,
            &TickInput {
                controls: Some(LaunchParameters::new(60.0, 70.0)),
                launch: true,
                ..Default::default()
            },
        );
        assert_eq!(state.params, LaunchParameters::new(60.0, 70.0));
        let launch = state.path.samples()[0];
        assert!((launch.physics_vel.x - 35.0).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let mut a = EngineState::new(Settings::default(), level::campaign());
        let mut b = EngineState::new(Settings::default(), level::campaign());
        let input = TickInput {
            controls: Some(LaunchParameters::new(38.0, 66.0)),
            launch: true,
            ..Default::default()
        };
        tick(&mut a, &input);
        tick(&mut b, &input);
        run_flight(&mut a, 10_000);
        run_flight(&mut b, 10_000);
        assert_eq!(a.path, b.path);
        assert_eq!(a.targets, b.targets);
        assert_eq!(a.last_stats, b.last_stats);
    }
}
