//! Projectile kinematics
//!
//! Two coordinate conventions meet here:
//! - render space: y grows downward, used for stepping against the ground line
//! - physics space: y grows upward, used for everything reported to the learner
//!
//! Launch velocities come out in physics space; `launch_state` flips the
//! vertical component into render space once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Launch angle and speed as set by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    /// Elevation above horizontal, degrees in [0, 90]
    pub angle_degrees: f32,
    /// Launch speed (>= 0)
    pub speed: f32,
}

impl Default for LaunchParameters {
    fn default() -> Self {
        Self {
            angle_degrees: 45.0,
            speed: 50.0,
        }
    }
}

impl LaunchParameters {
    pub fn new(angle_degrees: f32, speed: f32) -> Self {
        Self {
            angle_degrees,
            speed,
        }
    }

    /// Clamp into the range the controls can produce.
    ///
    /// Returns `None` for non-finite values; callers keep their previous
    /// parameters in that case.
    pub fn clamped(angle_degrees: f32, speed: f32, max_speed: f32) -> Option<Self> {
        if !angle_degrees.is_finite() || !speed.is_finite() {
            return None;
        }
        Some(Self {
            angle_degrees: angle_degrees.clamp(0.0, 90.0),
            speed: speed.clamp(0.0, max_speed.max(0.0)),
        })
    }

    /// (vx, vy) in physics space
    #[inline]
    pub fn velocity(&self) -> (f32, f32) {
        velocity_components(self.angle_degrees, self.speed)
    }
}

/// Position and velocity of the projectile in render space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl KinematicState {
    /// At rest at `origin`
    pub fn at_rest(origin: Vec2) -> Self {
        Self {
            pos: origin,
            vel: Vec2::ZERO,
        }
    }

    /// Velocity with the vertical axis flipped to physics space
    #[inline]
    pub fn physics_velocity(&self) -> Vec2 {
        Vec2::new(self.vel.x, -self.vel.y)
    }
}

/// Split a launch into horizontal and (upward-positive) vertical speed
pub fn velocity_components(angle_degrees: f32, speed: f32) -> (f32, f32) {
    // cos θ as sin(90° - θ): exactly zero at 90° instead of a tiny negative
    let horizontal = (90.0 - angle_degrees).to_radians().sin();
    let vertical = angle_degrees.to_radians().sin();
    (speed * horizontal, speed * vertical)
}

/// Initial render-space state for a launch from `origin`
pub fn launch_state(params: LaunchParameters, origin: Vec2) -> KinematicState {
    let (vx, vy) = params.velocity();
    KinematicState {
        pos: origin,
        vel: Vec2::new(vx, -vy),
    }
}

/// Advance one fixed step with semi-implicit Euler.
///
/// Velocity is updated first and the *new* velocity moves the position. The
/// forecaster preview and the live flight both go through here so the two
/// traces line up exactly.
#[inline]
pub fn step(state: KinematicState, gravity: f32, dt: f32) -> KinematicState {
    let vel = Vec2::new(state.vel.x, state.vel.y + gravity * dt);
    KinematicState {
        pos: state.pos + vel * dt,
        vel,
    }
}

/// Time to apex, `None` when gravity is not positive
pub fn peak_time(vy_physics: f32, gravity: f32) -> Option<f32> {
    if gravity > 0.0 {
        Some(vy_physics / gravity)
    } else {
        None
    }
}

/// Apex height above the launch point, `None` when gravity is not positive
pub fn peak_height(vy_physics: f32, gravity: f32) -> Option<f32> {
    if gravity > 0.0 {
        Some(vy_physics * vy_physics / (2.0 * gravity))
    } else {
        None
    }
}

/// Time to come back down to launch height
pub fn flat_flight_time(vy_physics: f32, gravity: f32) -> Option<f32> {
    peak_time(vy_physics, gravity).map(|t| 2.0 * t)
}

/// Horizontal distance covered when landing back at launch height
pub fn flat_range(params: LaunchParameters, gravity: f32) -> Option<f32> {
    let (vx, vy) = params.velocity();
    flat_flight_time(vy, gravity).map(|t| vx * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_components_quadrants() {
        let (vx, vy) = velocity_components(0.0, 10.0);
        assert!((vx - 10.0).abs() < 1e-5);
        assert!(vy.abs() < 1e-5);

        let (vx, vy) = velocity_components(90.0, 10.0);
        assert_eq!(vx, 0.0);
        assert!((vy - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_launch_state_flips_vertical() {
        let state = launch_state(LaunchParameters::new(30.0, 20.0), Vec2::new(80.0, 430.0));
        assert!(state.vel.y < 0.0, "upward launch must move toward smaller render y");
        assert!((state.physics_velocity().y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_uses_updated_velocity() {
        let state = KinematicState {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
        };
        let next = step(state, 10.0, 0.5);
        assert_eq!(next.vel, Vec2::new(1.0, 5.0));
        // 0.5 * new vy (5.0), not 0.5 * old vy (0.0)
        assert_eq!(next.pos, Vec2::new(0.5, 2.5));
    }

    #[test]
    fn test_peak_height_scenario() {
        let (_, vy) = velocity_components(45.0, 50.0);
        let h = peak_height(vy, 9.81).unwrap();
        assert!((h - 63.72).abs() < 0.1, "got {h}");
        assert!((peak_time(vy, 9.81).unwrap() - 3.604).abs() < 0.01);
    }

    #[test]
    fn test_zero_gravity_is_unknown() {
        assert_eq!(peak_time(10.0, 0.0), None);
        assert_eq!(peak_height(10.0, 0.0), None);
        assert_eq!(flat_range(LaunchParameters::default(), -1.0), None);
    }

    #[test]
    fn test_clamped_parameters() {
        let p = LaunchParameters::clamped(120.0, -5.0, 100.0).unwrap();
        assert_eq!(p.angle_degrees, 90.0);
        assert_eq!(p.speed, 0.0);
        assert!(LaunchParameters::clamped(f32::NAN, 10.0, 100.0).is_none());
        assert!(LaunchParameters::clamped(10.0, f32::INFINITY, 100.0).is_none());
    }
}
