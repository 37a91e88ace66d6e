//! Deterministic simulation module
//!
//! All engine logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (auto-aim)
//! - No rendering or platform dependencies

pub mod aim;
pub mod challenge;
pub mod collision;
pub mod forecast;
pub mod kinematics;
pub mod level;
pub mod path;
pub mod state;
pub mod tick;

pub use challenge::{ChallengeSpec, ChallengeState, Quantity, SubmitOutcome, Verdict};
pub use collision::{FlightEnd, Target};
pub use forecast::{Forecast, forecast, preview_path};
pub use kinematics::{KinematicState, LaunchParameters, step, velocity_components};
pub use level::{LevelSpec, campaign, levels_from_json};
pub use path::{FlightPath, FlightStats, PathSample, nearest_sample};
pub use state::{
    AdvanceTicket, AnalysisReadout, EngineEvent, EngineState, FlightPhase, LevelStatus, Readouts,
    display_value,
};
pub use tick::{TickInput, run_flight, tick};
