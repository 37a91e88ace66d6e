//! Frame runner
//!
//! Turns wall-clock frames into fixed simulation ticks and calls the render
//! hook after every tick and every state-changing command. Engine events are
//! drained and handed to the sink before each render, so the engine's log
//! never outlives one call. Rendering never overlaps a tick: everything runs
//! on the caller's thread.

use glam::Vec2;

use crate::error::InputError;
use crate::sim::challenge::SubmitOutcome;
use crate::sim::kinematics::LaunchParameters;
use crate::sim::state::{AnalysisReadout, EngineEvent, EngineState};
use crate::sim::tick::{TickInput, tick};

/// Consumer of engine state (drawing, HUD text, logging)
pub trait RenderSink {
    fn render(&mut self, state: &EngineState);

    /// Events raised since the previous render, oldest first
    fn on_events(&mut self, _events: &[EngineEvent]) {}
}

/// Owns the engine and a render sink
pub struct Runner<R: RenderSink> {
    state: EngineState,
    sink: R,
    accumulator: f32,
}

impl<R: RenderSink> Runner<R> {
    pub fn new(state: EngineState, sink: R) -> Self {
        let mut runner = Self {
            state,
            sink,
            accumulator: 0.0,
        };
        runner.render();
        runner
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Mutable engine access for hosts that drive `tick` themselves
    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    fn render(&mut self) {
        let events = self.state.drain_events();
        if !events.is_empty() {
            self.sink.on_events(&events);
        }
        self.sink.render(&self.state);
    }

    /// Feed `dt` seconds of wall time; returns how many ticks ran
    pub fn frame(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame time {dt}");
            return 0;
        }
        let step = self.state.config.time_step;
        let max_substeps = self.state.settings.max_substeps;
        let dt = dt.clamp(0.0, step * max_substeps as f32);
        self.accumulator += dt;

        let idle = TickInput::default();
        let mut substeps = 0;
        while self.accumulator >= step && substeps < max_substeps {
            tick(&mut self.state, &idle);
            self.accumulator -= step;
            substeps += 1;
            self.render();
        }
        substeps
    }

    /// Run exactly one tick with the given input
    pub fn tick_with(&mut self, input: &TickInput) {
        tick(&mut self.state, input);
        self.render();
    }

    /// Tick until nothing is in flight and no level advance is waiting, at
    /// most `max_ticks` times. Returns ticks run.
    pub fn settle(&mut self, max_ticks: u32) -> u32 {
        let idle = TickInput::default();
        let mut ticks = 0;
        while ticks < max_ticks
            && (self.state.is_flying() || self.state.scheduled_advance().is_some())
        {
            self.tick_with(&idle);
            ticks += 1;
        }
        ticks
    }

    pub fn set_launch_parameters(
        &mut self,
        angle_degrees: f32,
        speed: f32,
    ) -> Result<LaunchParameters, InputError> {
        let params = self.state.set_launch_parameters(angle_degrees, speed)?;
        self.render();
        Ok(params)
    }

    pub fn launch(&mut self) -> bool {
        let launched = self.state.launch();
        if launched {
            self.accumulator = 0.0;
            self.render();
        }
        launched
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.accumulator = 0.0;
        self.render();
    }

    pub fn toggle_analysis(&mut self) -> bool {
        let toggled = self.state.toggle_analysis();
        if toggled {
            self.render();
        }
        toggled
    }

    pub fn probe(&mut self, at: Vec2) -> Option<AnalysisReadout> {
        let readout = self.state.probe(at);
        self.render();
        readout
    }

    pub fn submit_challenge(
        &mut self,
        first: &str,
        second: Option<&str>,
    ) -> Result<Option<SubmitOutcome>, InputError> {
        let outcome = self.state.submit_challenge(first, second)?;
        self.render();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::level;

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        flying_frames: usize,
        events: Vec<EngineEvent>,
    }

    impl RenderSink for CountingSink {
        fn render(&mut self, state: &EngineState) {
            self.frames += 1;
            if state.is_flying() {
                self.flying_frames += 1;
            }
        }

        fn on_events(&mut self, events: &[EngineEvent]) {
            self.events.extend_from_slice(events);
        }
    }

    fn runner() -> Runner<CountingSink> {
        Runner::new(
            EngineState::new(Settings::default(), level::campaign()),
            CountingSink::default(),
        )
    }

    #[test]
    fn test_renders_on_construction() {
        assert_eq!(runner().sink().frames, 1);
    }

    #[test]
    fn test_frame_accumulates_fixed_steps() {
        let mut r = runner();
        r.launch();
        // Three and a half steps of wall time
        let ticks = r.frame(0.175);
        assert_eq!(ticks, 3);
        assert_eq!(r.state().path.len(), 4);
        // Remainder carries into the next frame
        assert_eq!(r.frame(0.03), 1);
    }

    #[test]
    fn test_frame_caps_substeps() {
        // Binary-exact step so the cap is hit without rounding slack
        let settings = Settings {
            time_step: 0.25,
            ..Settings::default()
        };
        let mut r = Runner::new(
            EngineState::new(settings, level::campaign()),
            CountingSink::default(),
        );
        r.launch();
        let ticks = r.frame(10.0);
        assert_eq!(ticks, r.state().settings.max_substeps);
    }

    #[test]
    fn test_ignored_launch_does_not_render() {
        let mut r = runner();
        assert!(r.launch());
        let frames = r.sink().frames;
        assert!(!r.launch());
        assert_eq!(r.sink().frames, frames);
    }

    #[test]
    fn test_settle_finishes_flight() {
        let mut r = runner();
        r.launch();
        let ticks = r.settle(10_000);
        assert!(ticks > 0);
        assert!(!r.state().is_flying());
        assert!(r.sink().flying_frames > 0);
    }

    #[test]
    fn test_frame_ignores_non_finite_dt() {
        let mut r = runner();
        r.launch();
        assert_eq!(r.frame(0.05), 1);
        assert_eq!(r.frame(f32::NAN), 0);
        assert_eq!(r.frame(f32::INFINITY), 0);

        let before = r.state().path.len();
        assert_eq!(r.frame(0.05), 1);
        assert_eq!(r.state().path.len(), before + 1);
    }

    #[test]
    fn test_events_are_handed_to_sink() {
        let mut r = runner();
        assert_eq!(r.sink().events, vec![EngineEvent::LevelLoaded { index: 0 }]);

        for _ in 0..50 {
            r.launch();
            r.settle(10_000);
            r.reset();
            assert!(r.state().events.is_empty());
        }
        let launches = r
            .sink()
            .events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Launched { .. }))
            .count();
        assert_eq!(launches, 50);
    }
}
