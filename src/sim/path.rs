//! Recorded flight path, post-flight statistics and the analysis lookup

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One recorded point of a flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// Render-space position
    pub pos: Vec2,
    /// Velocity with y positive upward
    pub physics_vel: Vec2,
    /// Seconds since launch
    pub t: f32,
}

/// Statistics of a completed flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightStats {
    pub max_height: f32,
    /// Signed: a leftward flight reports a negative range
    pub range: f32,
    pub time_of_flight: f32,
}

/// Append-only record of the current flight, in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPath {
    samples: Vec<PathSample>,
}

impl FlightPath {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn append(&mut self, sample: PathSample) {
        self.samples.push(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Stats over the whole record; `None` until the flight has advanced at
    /// least one step
    pub fn compute_stats(&self) -> Option<FlightStats> {
        if self.samples.len() < 2 {
            return None;
        }
        let launch = self.samples.first()?;
        let last = self.samples.last()?;

        let max_height = self
            .samples
            .iter()
            .map(|s| launch.pos.y - s.pos.y)
            .fold(0.0f32, f32::max);

        Some(FlightStats {
            max_height,
            range: last.pos.x - launch.pos.x,
            time_of_flight: last.t,
        })
    }

    /// Nearest recorded sample to `probe`, if any lies within `snap_radius`
    pub fn nearest_sample(&self, probe: Vec2, snap_radius: f32) -> Option<&PathSample> {
        nearest_sample(&self.samples, probe, snap_radius)
    }
}

/// Minimum-distance sample within `snap_radius` of `probe`.
///
/// Ties go to the earliest sample.
pub fn nearest_sample(
    samples: &[PathSample],
    probe: Vec2,
    snap_radius: f32,
) -> Option<&PathSample> {
    let mut best: Option<(&PathSample, f32)> = None;
    for sample in samples {
        let d2 = sample.pos.distance_squared(probe);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((sample, d2));
        }
    }
    best.filter(|(_, d2)| *d2 <= snap_radius * snap_radius)
        .map(|(sample, _)| sample)
}
