//! Lakeside - a first-person fishing minigame core
//!
//! Core modules:
//! - `physics`: Minimal rigid-body world (bodies, point constraints, water)
//! - `sim`: Deterministic simulation (cast, bite timers, skill check, fish)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Error kinds shared by the simulation and settings

pub mod error;
pub mod physics;
pub mod settings;
pub mod sim;

pub use error::{FishingError, SettingsError};
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz physics step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity (m/s²)
    pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.82, 0.0);

    /// Lake surface height
    pub const WATER_LEVEL: f32 = 0.0;
    /// Bobber defaults
    pub const BOBBER_RADIUS: f32 = 0.2;
    pub const BOBBER_MASS: f32 = 1.0;
    /// Where the rod constraint attaches, relative to the rod-tip anchor body
    pub const ROD_ANCHOR_OFFSET: Vec3 = Vec3::new(0.0, -0.05, -1.0);
    /// Rod tip relative to the camera (right, down, forward)
    pub const ROD_TIP_OFFSET: Vec3 = Vec3::new(0.35, -0.3, -0.8);

    /// Cast impulse shaping
    pub const CAST_HORIZONTAL_FACTOR: f32 = 2.5;
    pub const CAST_VERTICAL_FACTOR: f32 = 1.5;
    pub const CAST_VERTICAL_MIN: f32 = 4.0;
    pub const CAST_VERTICAL_MAX: f32 = 10.0;

    /// Bite timing (seconds)
    pub const BITE_DELAY_MIN: f32 = 5.0;
    pub const BITE_DELAY_MAX: f32 = 10.0;
    pub const TREMBLE_INTERVAL: f32 = 0.05;
    pub const TREMBLE_AMPLITUDE: f32 = 0.1;

    /// Skill check dial (degrees)
    pub const HIT_WINDOW_LOW_DEG: f32 = 30.0;
    pub const HIT_WINDOW_HIGH_DEG: f32 = 60.0;
    pub const INDICATOR_RATE_DEG: f32 = 180.0;

    /// Fish wandering
    pub const FISH_COUNT: usize = 8;
    pub const FISH_WANDER_ACCEL: f32 = 0.1; // per tick
    pub const FISH_MAX_SPEED: f32 = 1.0;
    pub const FISH_RESAMPLE_CHANCE: f64 = 0.01;
    pub const FISH_RETURN_SPEED: f32 = 2.0;
    pub const LAKE_RADIUS: f32 = 40.0;
    pub const FISH_SPAWN_EXTENT: f32 = 40.0;
    pub const FISH_MIN_SPAWN_DISTANCE: f32 = 10.0;
    pub const FISH_DEPTH: f32 = -1.0;
    /// Cap on rejection-sampling attempts when placing a fish
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Wrap an angle into a single turn [0, 2π)
#[inline]
pub fn wrap_turn(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Project a vector onto the horizontal (XZ) plane
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal unit vector for a heading angle (radians, 0 = +X)
#[inline]
pub fn heading_to_dir(theta: f32) -> Vec3 {
    Vec3::new(theta.cos(), 0.0, theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_turn() {
        assert!((wrap_turn(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_turn(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!(wrap_turn(-1e-9) < TAU);
    }

    #[test]
    fn test_horizontal_drops_y() {
        assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_heading_is_unit() {
        for i in 0..16 {
            let dir = heading_to_dir(i as f32 * 0.4);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert_eq!(dir.y, 0.0);
        }
    }
}
