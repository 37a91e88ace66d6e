//! Collision and flight termination
//!
//! Evaluated once per physics step, after the step has been applied and the
//! sample recorded. The projectile is treated as its bounding square
//! `[x-r, x+r] × [y-r, y+r]`. Targets never deflect it: a hit only latches the
//! target's flag and the projectile keeps flying.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangular target (render space, top-left anchored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Latches true on first overlap, never reverts within a level instance
    #[serde(default)]
    pub hit: bool,
}

impl Target {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            hit: false,
        }
    }

    /// Strict overlap between the target and a square of half-size `radius`
    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius > self.x
            && pos.x - radius < self.x + self.width
            && pos.y + radius > self.y
            && pos.y - radius < self.y + self.height
    }
}

/// Fresh, independent copies of a level's target templates with all flags
/// cleared
pub fn clone_targets(templates: &[Target]) -> Vec<Target> {
    templates
        .iter()
        .map(|t| Target {
            hit: false,
            ..t.clone()
        })
        .collect()
}

/// Why a flight stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEnd {
    Ground,
    AllTargetsHit,
    OutOfBounds,
}

/// Static geometry a step is checked against
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub ground_y: f32,
    pub playfield_width: f32,
    pub radius: f32,
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// Indices of targets whose flag flipped during this step
    pub newly_hit: Vec<usize>,
    /// Set when the flight is over
    pub ended: Option<FlightEnd>,
}

/// Check ground, targets, all-clear and side walls for the current position.
///
/// On ground contact the position is clamped to rest on the ground line. All
/// conditions are checked in the same step; when several hold the single
/// reported reason is the first of ground, all-targets-hit, out-of-bounds.
pub fn evaluate(pos: &mut Vec2, targets: &mut [Target], bounds: &Bounds) -> CollisionResult {
    let r = bounds.radius;
    let mut result = CollisionResult::default();

    if pos.y + r > bounds.ground_y {
        pos.y = bounds.ground_y - r;
        result.ended = Some(FlightEnd::Ground);
    }

    for (i, target) in targets.iter_mut().enumerate() {
        if !target.hit && target.overlaps(*pos, r) {
            target.hit = true;
            result.newly_hit.push(i);
        }
    }

    if result.ended.is_none() && all_hit(targets) {
        result.ended = Some(FlightEnd::AllTargetsHit);
    }

    if result.ended.is_none() && (pos.x - r < 0.0 || pos.x + r > bounds.playfield_width) {
        result.ended = Some(FlightEnd::OutOfBounds);
    }

    result
}

/// Every target is hit. An empty set counts as cleared.
pub fn all_hit(targets: &[Target]) -> bool {
    targets.iter().all(|t| t.hit)
}

pub fn hit_count(targets: &[Target]) -> usize {
    targets.iter().filter(|t| t.hit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            ground_y: 460.0,
            playfield_width: 800.0,
            radius: 8.0,
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        let target = Target::new(100.0, 100.0, 20.0, 20.0);
        // Square edge exactly touching the left side: no overlap
        assert!(!target.overlaps(Vec2::new(92.0, 110.0), 8.0));
        assert!(target.overlaps(Vec2::new(92.5, 110.0), 8.0));
        assert!(target.overlaps(Vec2::new(110.0, 110.0), 8.0));
        assert!(!target.overlaps(Vec2::new(110.0, 128.0), 8.0));
    }

    #[test]
    fn test_ground_clamps_and_ends() {
        let mut pos = Vec2::new(300.0, 455.0);
        let mut targets = vec![Target::new(500.0, 440.0, 40.0, 40.0)];
        let result = evaluate(&mut pos, &mut targets, &bounds());
        assert_eq!(result.ended, Some(FlightEnd::Ground));
        assert_eq!(pos.y, 452.0);
        assert!(!targets[0].hit);
    }

    #[test]
    fn test_hit_passes_through() {
        let mut pos = Vec2::new(110.0, 110.0);
        let mut targets = vec![
            Target::new(100.0, 100.0, 20.0, 20.0),
            Target::new(600.0, 100.0, 20.0, 20.0),
        ];
        let result = evaluate(&mut pos, &mut targets, &bounds());
        assert_eq!(result.newly_hit, vec![0]);
        assert_eq!(result.ended, None);
        assert_eq!(pos, Vec2::new(110.0, 110.0));

        // Already-hit targets are not reported again
        let result = evaluate(&mut pos, &mut targets, &bounds());
        assert!(result.newly_hit.is_empty());
        assert!(targets[0].hit);
    }

    #[test]
    fn test_two_targets_in_one_step() {
        let mut pos = Vec2::new(110.0, 110.0);
        let mut targets = vec![
            Target::new(100.0, 100.0, 20.0, 20.0),
            Target::new(105.0, 105.0, 30.0, 30.0),
        ];
        let result = evaluate(&mut pos, &mut targets, &bounds());
        assert_eq!(result.newly_hit, vec![0, 1]);
        assert_eq!(result.ended, Some(FlightEnd::AllTargetsHit));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut targets = vec![Target::new(500.0, 440.0, 40.0, 40.0)];
        let mut pos = Vec2::new(795.0, 200.0);
        assert_eq!(
            evaluate(&mut pos, &mut targets, &bounds()).ended,
            Some(FlightEnd::OutOfBounds)
        );
        let mut pos = Vec2::new(7.0, 200.0);
        assert_eq!(
            evaluate(&mut pos, &mut targets, &bounds()).ended,
            Some(FlightEnd::OutOfBounds)
        );
    }

    #[test]
    fn test_simultaneous_conditions_report_once() {
        let mut targets = vec![Target::new(500.0, 440.0, 40.0, 40.0)];
        let mut pos = Vec2::new(799.0, 458.0);
        let result = evaluate(&mut pos, &mut targets, &bounds());
        assert_eq!(result.ended, Some(FlightEnd::Ground));
    }

    #[test]
    fn test_clone_targets_is_independent() {
        let templates = vec![Target::new(1.0, 2.0, 3.0, 4.0)];
        let mut live = clone_targets(&templates);
        live[0].hit = true;
        assert!(!templates[0].hit);
        assert_eq!(hit_count(&live), 1);
        assert!(all_hit(&live));
    }
}
