//! Skill check dial
//!
//! An indicator sweeps around a circle at a fixed rate. Confirming while it
//! is inside the hit window lands the fish. Angles are radians, measured in a
//! single turn [0, 2π).

use serde::{Deserialize, Serialize};

use crate::wrap_turn;

/// Angular target zone, half-open: [low, high)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWindow {
    pub low: f32,
    pub high: f32,
}

impl HitWindow {
    pub fn new(low: f32, high: f32) -> Self {
        Self {
            low: wrap_turn(low),
            high: wrap_turn(high),
        }
    }

    pub fn from_degrees(low_deg: f32, high_deg: f32) -> Self {
        Self::new(low_deg.to_radians(), high_deg.to_radians())
    }

    /// Check if an angle (any number of turns) lands inside the window
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = wrap_turn(theta);
        if self.low <= self.high {
            theta >= self.low && theta < self.high
        } else {
            // Window crosses 0 (e.g. 350°..20°)
            theta >= self.low || theta < self.high
        }
    }

    /// Angular span of the window (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.high - self.low;
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }
}

/// The rotating indicator of an open skill check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCheck {
    /// Indicator angle, wrapped to [0, 2π)
    pub angle: f32,
    /// Sweep rate (radians/second)
    pub rate: f32,
    pub window: HitWindow,
}

impl SkillCheck {
    pub fn new(rate: f32, window: HitWindow) -> Self {
        Self {
            angle: 0.0,
            rate,
            window,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = wrap_turn(self.angle + self.rate * dt);
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    pub fn set_angle_degrees(&mut self, degrees: f32) {
        self.angle = wrap_turn(degrees.to_radians());
    }

    /// Whether a confirm right now would succeed
    pub fn is_hit(&self) -> bool {
        self.window.contains_angle(self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    fn default_check() -> SkillCheck {
        SkillCheck::new(180f32.to_radians(), HitWindow::from_degrees(30.0, 60.0))
    }

    #[test]
    fn test_confirm_at_45_degrees_hits() {
        let mut check = default_check();
        check.set_angle_degrees(45.0);
        assert!(check.is_hit());
    }

    #[test]
    fn test_confirm_at_10_degrees_misses() {
        let mut check = default_check();
        check.set_angle_degrees(10.0);
        assert!(!check.is_hit());
    }

    #[test]
    fn test_window_is_half_open() {
        let window = HitWindow::from_degrees(30.0, 60.0);
        assert!(window.contains_angle(30f32.to_radians()));
        assert!(window.contains_angle(59.9f32.to_radians()));
        assert!(!window.contains_angle(60f32.to_radians()));
        assert!(!window.contains_angle(60.5f32.to_radians()));
        assert!(!window.contains_angle(61f32.to_radians()));
    }

    #[test]
    fn test_window_wraparound() {
        let window = HitWindow::from_degrees(350.0, 20.0);
        assert!(window.contains_angle(0.0));
        assert!(window.contains_angle(355f32.to_radians()));
        assert!(window.contains_angle(10f32.to_radians()));
        assert!(!window.contains_angle(180f32.to_radians()));
        assert!((window.angular_span() - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_indicator_sweeps_into_window() {
        let mut check = default_check();
        // 180°/s: 0.25 s lands at 45°
        for _ in 0..15 {
            check.advance(1.0 / 60.0);
        }
        assert!((check.angle_degrees() - 45.0).abs() < 0.5);
        assert!(check.is_hit());
    }

    #[test]
    fn test_indicator_wraps() {
        let mut check = default_check();
        check.advance(2.5); // 450°
        assert!((check.angle_degrees() - 90.0).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn prop_membership_repeats_every_turn(deg in 0.0f32..360.0, turns in -3i32..3) {
            let window = HitWindow::from_degrees(30.0, 60.0);
            let theta = deg.to_radians();
            // Keep clear of the edges where float wrap error could flip the result
            prop_assume!((deg - 30.0).abs() > 0.01 && (deg - 60.0).abs() > 0.01);
            prop_assert_eq!(
                window.contains_angle(theta),
                window.contains_angle(theta + turns as f32 * TAU)
            );
        }
    }
}
