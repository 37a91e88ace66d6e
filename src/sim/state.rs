//! Engine state and the commands that mutate it
//!
//! Everything the simulator knows lives in one owned `EngineState`. The host
//! holds it exclusively and passes it to `tick` and the command methods below;
//! renderers only ever read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::challenge::{ChallengeState, SubmitOutcome, Verdict};
use super::collision::{self, FlightEnd, Target};
use super::forecast::{self, Forecast};
use super::kinematics::{self, KinematicState, LaunchParameters};
use super::level::LevelSpec;
use super::path::{FlightPath, FlightStats, PathSample};
use crate::error::InputError;
use crate::settings::{Settings, SimulationConfig};

/// Projectile phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Resting at the launch origin (or where the last flight ended)
    Idle,
    Flying,
}

/// Progression status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Active(usize),
    /// Past the last level; terminal
    Completed,
}

/// Handle for a scheduled level advance.
///
/// Only valid for the level instance that issued it: any reload or reset
/// bumps the generation and turns older tickets into no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    pub generation: u64,
    pub next_level: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    ticket: AdvanceTicket,
    ticks_remaining: u32,
}

/// Things that happened, in order, for hosts that react to transitions
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    LevelLoaded { index: usize },
    Launched { params: LaunchParameters },
    TargetHit { index: usize },
    FlightEnded {
        reason: FlightEnd,
        stats: Option<FlightStats>,
    },
    LevelCleared { index: usize },
    AdvanceScheduled(AdvanceTicket),
    ChallengeGraded(Verdict),
    CampaignCompleted,
}

/// Instantaneous vectors at a recorded point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReadout {
    pub sample: PathSample,
    pub speed: f32,
    /// Physics-space acceleration; always straight down
    pub gravity: Vec2,
}

/// Complete simulator state
#[derive(Debug, Clone)]
pub struct EngineState {
    pub settings: Settings,
    levels: Vec<LevelSpec>,
    /// Current level; equals the level count once the campaign is done
    level_index: usize,

    /// Physics for the current level
    pub config: SimulationConfig,
    /// Latest accepted control values
    pub params: LaunchParameters,

    pub phase: FlightPhase,
    pub projectile: KinematicState,
    pub path: FlightPath,
    pub targets: Vec<Target>,
    pub challenge: Option<ChallengeState>,

    /// Closed-form prediction for `params`
    pub forecast: Forecast,
    /// Preview trace for `params`; empty while flying
    pub preview: Vec<Vec2>,
    /// Stats of the most recent completed flight
    pub last_stats: Option<FlightStats>,
    /// Level message / status line
    pub message: String,

    pub analysis_mode: bool,
    pub readout: Option<AnalysisReadout>,

    pub events: Vec<EngineEvent>,

    pending_advance: Option<PendingAdvance>,
    generation: u64,
    flight_ticks: u32,
}

/// "unknown" for missing values, two decimals otherwise
pub fn display_value(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "unknown".to_string(),
    }
}

/// Text for the max height / range / time-of-flight fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readouts {
    pub max_height: String,
    pub range: String,
    pub time_of_flight: String,
}

impl EngineState {
    /// Build an engine over a level set and load level 0
    pub fn new(settings: Settings, levels: Vec<LevelSpec>) -> Self {
        let config = match levels.first() {
            Some(level) => SimulationConfig::new(&settings, level.gravity, level.launch_height),
            None => SimulationConfig::new(&settings, 0.0, 0.0),
        };
        let mut state = Self {
            projectile: KinematicState::at_rest(config.launch_origin),
            settings,
            levels,
            level_index: 0,
            config,
            params: LaunchParameters::default(),
            phase: FlightPhase::Idle,
            path: FlightPath::new(),
            targets: Vec::new(),
            challenge: None,
            forecast: Forecast::default(),
            preview: Vec::new(),
            last_stats: None,
            message: String::new(),
            analysis_mode: false,
            readout: None,
            events: Vec::new(),
            pending_advance: None,
            generation: 0,
            flight_ticks: 0,
        };
        state.load_level(0);
        state
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn status(&self) -> LevelStatus {
        if self.level_index >= self.levels.len() {
            LevelStatus::Completed
        } else {
            LevelStatus::Active(self.level_index)
        }
    }

    pub fn is_flying(&self) -> bool {
        self.phase == FlightPhase::Flying
    }

    /// Launching is possible (not flying, campaign not finished)
    pub fn can_launch(&self) -> bool {
        !self.is_flying() && self.status() != LevelStatus::Completed
    }

    pub fn current_level(&self) -> Option<&LevelSpec> {
        self.levels.get(self.level_index)
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Load a level, or enter `Completed` when `index` is past the end.
    ///
    /// Progression only moves forward: loading an earlier level than the
    /// current one is refused. Any pending advance is cancelled.
    pub fn load_level(&mut self, index: usize) -> bool {
        if index < self.level_index {
            log::warn!(
                "Refusing to go back from level {} to {}",
                self.level_index + 1,
                index + 1
            );
            return false;
        }

        self.level_index = index.min(self.levels.len());
        self.generation += 1;
        self.pending_advance = None;
        self.analysis_mode = false;
        self.readout = None;
        self.last_stats = None;

        let Some(level) = self.levels.get(self.level_index) else {
            self.targets.clear();
            self.challenge = None;
            self.reset_projectile();
            self.preview.clear();
            self.forecast = Forecast::default();
            self.message = "All Levels Completed! Congratulations!".to_string();
            self.events.push(EngineEvent::CampaignCompleted);
            log::info!("Campaign completed ({} levels)", self.levels.len());
            return true;
        };

        self.config = SimulationConfig::new(&self.settings, level.gravity, level.launch_height);
        self.targets = collision::clone_targets(&level.targets);
        self.challenge = level.challenge.clone().map(ChallengeState::new);
        self.message = level.instructions.clone();
        self.reset_projectile();
        self.refresh_forecast();

        self.events.push(EngineEvent::LevelLoaded {
            index: self.level_index,
        });
        log::info!(
            "Loaded level {} (gravity {}, {} targets)",
            self.level_index + 1,
            self.config.gravity,
            self.targets.len()
        );
        true
    }

    /// Reload the current level from its template
    pub fn reset(&mut self) {
        self.load_level(self.level_index);
    }

    fn reset_projectile(&mut self) {
        self.phase = FlightPhase::Idle;
        self.projectile = KinematicState::at_rest(self.config.launch_origin);
        self.path.clear();
        self.flight_ticks = 0;
    }

    /// Recompute forecast and preview for the current controls
    pub fn refresh_forecast(&mut self) {
        if self.status() == LevelStatus::Completed {
            return;
        }
        self.forecast = forecast::forecast(self.params, &self.config);
        self.preview = forecast::preview_path(self.params, &self.config, &self.settings);
    }

    /// Accept new control values.
    ///
    /// Out-of-range values are clamped; non-finite ones are rejected and the
    /// previous parameters kept. The forecast only refreshes while idle.
    pub fn set_launch_parameters(
        &mut self,
        angle_degrees: f32,
        speed: f32,
    ) -> Result<LaunchParameters, InputError> {
        let params = LaunchParameters::clamped(angle_degrees, speed, self.settings.max_speed)
            .ok_or(InputError::NonFinite {
                angle_degrees,
                speed,
            })?;
        self.params = params;
        if !self.is_flying() {
            self.refresh_forecast();
        }
        Ok(params)
    }

    /// Fire with the current parameters. Ignored while flying or after the
    /// campaign is complete.
    pub fn launch(&mut self) -> bool {
        if !self.can_launch() {
            return false;
        }

        self.analysis_mode = false;
        self.readout = None;
        self.last_stats = None;
        self.preview.clear();
        self.flight_ticks = 0;

        self.projectile = kinematics::launch_state(self.params, self.config.launch_origin);
        self.path.clear();
        self.path.append(PathSample {
            pos: self.projectile.pos,
            physics_vel: self.projectile.physics_velocity(),
            t: 0.0,
        });
        self.phase = FlightPhase::Flying;

        self.events.push(EngineEvent::Launched {
            params: self.params,
        });
        log::info!(
            "Launch: angle {:.1}°, speed {:.1}",
            self.params.angle_degrees,
            self.params.speed
        );
        true
    }

    /// Advance the projectile one fixed step: integrate, record, collide
    pub(crate) fn step_flight(&mut self) -> Option<FlightEnd> {
        if !self.is_flying() {
            return None;
        }

        let dt = self.config.time_step;
        self.projectile = kinematics::step(self.projectile, self.config.gravity, dt);
        self.flight_ticks += 1;
        self.path.append(PathSample {
            pos: self.projectile.pos,
            physics_vel: self.projectile.physics_velocity(),
            t: self.flight_ticks as f32 * dt,
        });

        let bounds = collision::Bounds {
            ground_y: self.config.ground_y,
            playfield_width: self.settings.playfield_width,
            radius: self.settings.projectile_radius,
        };
        let result = collision::evaluate(&mut self.projectile.pos, &mut self.targets, &bounds);

        for index in result.newly_hit {
            log::debug!("Target {} hit at t={:.2}", index, self.flight_ticks as f32 * dt);
            self.events.push(EngineEvent::TargetHit { index });
        }

        if let Some(reason) = result.ended {
            self.on_flight_ended(reason);
        }
        result.ended
    }

    fn on_flight_ended(&mut self, reason: FlightEnd) {
        self.phase = FlightPhase::Idle;
        self.last_stats = self.path.compute_stats();
        self.events.push(EngineEvent::FlightEnded {
            reason,
            stats: self.last_stats,
        });
        log::info!(
            "Flight ended ({:?}) after {} steps, {}/{} targets",
            reason,
            self.flight_ticks,
            collision::hit_count(&self.targets),
            self.targets.len()
        );

        self.check_completion();
        self.refresh_forecast();
    }

    /// Schedule the advance when every target is down and the challenge is
    /// satisfied; otherwise set the retry message
    fn check_completion(&mut self) {
        let level_number = self.level_index + 1;
        let hit = collision::hit_count(&self.targets);
        let total = self.targets.len();

        if !collision::all_hit(&self.targets) {
            self.message =
                format!("Try Again for Level {level_number}. You hit {hit}/{total} targets.");
            return;
        }

        if let Some(challenge) = &self.challenge {
            if challenge.answered && !challenge.is_satisfied() {
                self.message = format!(
                    "All targets hit, but the challenge was missed. \
                     Reset to retry Level {level_number}."
                );
                return;
            }
            if !challenge.is_satisfied() {
                self.message = format!(
                    "All targets hit! Answer the challenge to clear Level {level_number}."
                );
                return;
            }
        }

        self.message = format!("Level {level_number} Cleared! Well Done!");
        if self.pending_advance.is_none() {
            let ticket = AdvanceTicket {
                generation: self.generation,
                next_level: self.level_index + 1,
            };
            self.pending_advance = Some(PendingAdvance {
                ticket,
                ticks_remaining: self.settings.advance_delay_ticks(),
            });
            self.events.push(EngineEvent::LevelCleared {
                index: self.level_index,
            });
            self.events.push(EngineEvent::AdvanceScheduled(ticket));
            log::info!("Level {level_number} cleared");
        }
    }

    /// Ticket for the advance currently waiting, if any
    pub fn scheduled_advance(&self) -> Option<AdvanceTicket> {
        self.pending_advance.map(|p| p.ticket)
    }

    /// Count one tick off the pending advance; fires it when due
    pub(crate) fn tick_pending_advance(&mut self) {
        let Some(pending) = self.pending_advance.as_mut() else {
            return;
        };
        pending.ticks_remaining = pending.ticks_remaining.saturating_sub(1);
        if pending.ticks_remaining == 0 {
            let ticket = pending.ticket;
            self.fire_advance(ticket);
        }
    }

    /// Run a scheduled advance. Stale tickets (issued before the latest load
    /// or reset) do nothing.
    pub fn fire_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if ticket.generation != self.generation || self.pending_advance.is_none() {
            log::debug!("Dropping stale advance to level {}", ticket.next_level + 1);
            return false;
        }
        self.pending_advance = None;
        self.load_level(ticket.next_level)
    }

    /// Grade an answer for the current level's challenge.
    ///
    /// `Ok(None)` when there is nothing to answer. A correct answer given
    /// after every target is already down clears the level right away.
    pub fn submit_challenge(
        &mut self,
        first: &str,
        second: Option<&str>,
    ) -> Result<Option<SubmitOutcome>, InputError> {
        let Some(challenge) = self.challenge.as_mut() else {
            return Ok(None);
        };
        let outcome = challenge.submit(first, second)?;
        if let SubmitOutcome::Graded(verdict) = &outcome {
            log::info!("Challenge graded: {verdict:?}");
            self.events.push(EngineEvent::ChallengeGraded(verdict.clone()));
            if !self.is_flying() && !self.path.is_empty() {
                self.check_completion();
            }
        }
        Ok(Some(outcome))
    }

    /// Switch analysis mode. Only possible while idle with a recorded path.
    pub fn toggle_analysis(&mut self) -> bool {
        if self.is_flying() || self.path.is_empty() {
            return false;
        }
        self.analysis_mode = !self.analysis_mode;
        if !self.analysis_mode {
            self.readout = None;
        }
        true
    }

    /// Snap a probe to the recorded path; requires analysis mode
    pub fn probe(&mut self, at: Vec2) -> Option<AnalysisReadout> {
        if !self.analysis_mode {
            return None;
        }
        self.readout = self
            .path
            .nearest_sample(at, self.settings.snap_radius)
            .map(|sample| AnalysisReadout {
                sample: *sample,
                speed: sample.physics_vel.length(),
                gravity: Vec2::new(0.0, -self.config.gravity),
            });
        self.readout
    }

    /// Actual stats after a flight, otherwise the forecast
    pub fn readouts(&self) -> Readouts {
        match self.last_stats {
            Some(stats) => Readouts {
                max_height: display_value(Some(stats.max_height)),
                range: display_value(Some(stats.range)),
                time_of_flight: display_value(Some(stats.time_of_flight)),
            },
            None => Readouts {
                max_height: display_value(self.forecast.max_height),
                range: display_value(self.forecast.range),
                time_of_flight: display_value(self.forecast.time_of_flight),
            },
        }
    }
}
