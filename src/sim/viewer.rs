//! First-person viewpoint and the rod tip hanging off it
//!
//! The viewer is the only thing movement/look input touches. It is locked
//! while the skill check is open so the dial owns the player's attention.

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::ROD_TIP_OFFSET;
use crate::normalize_angle;

/// Held movement keys for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.left || self.right)
    }
}

const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub position: Vec3,
    /// Radians about +Y; 0 looks down -Z
    pub yaw: f32,
    /// Radians, clamped to ±89°
    pub pitch: f32,
    /// Walking speed (units/second)
    pub walk_speed: f32,
    /// Radians per unit of look delta
    pub look_sensitivity: f32,
    /// Rod tip in camera space
    pub rod_offset: Vec3,
    locked: bool,
}

impl Viewer {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            walk_speed: 4.0,
            look_sensitivity: 0.002,
            rod_offset: ROD_TIP_OFFSET,
            locked: false,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// World-space rod tip. Recompute every tick: it follows the camera.
    pub fn rod_tip(&self) -> Vec3 {
        self.position + self.rotation() * self.rod_offset
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            log::debug!("Viewer input {}", if locked { "locked" } else { "unlocked" });
        }
        self.locked = locked;
    }

    /// Apply movement and look input. Returns false (and does nothing) while locked.
    pub fn apply(&mut self, intent: MovementIntent, look_delta: Vec2, dt: f32) -> bool {
        if self.locked {
            return false;
        }

        self.yaw = normalize_angle(self.yaw - look_delta.x * self.look_sensitivity);
        self.pitch = (self.pitch - look_delta.y * self.look_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);

        if !intent.is_idle() {
            // Walk on the ground plane regardless of pitch
            let forward = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
            let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
            let mut wish = Vec3::ZERO;
            if intent.forward {
                wish += forward;
            }
            if intent.back {
                wish -= forward;
            }
            if intent.right {
                wish += right;
            }
            if intent.left {
                wish -= right;
            }
            self.position += wish.normalize_or_zero() * self.walk_speed * dt;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_walk_moves_down_neg_z() {
        let mut viewer = Viewer::new(Vec3::ZERO);
        let intent = MovementIntent { forward: true, ..Default::default() };
        viewer.apply(intent, Vec2::ZERO, 1.0);
        assert!((viewer.position - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let mut viewer = Viewer::new(Vec3::ZERO);
        let intent = MovementIntent { forward: true, right: true, ..Default::default() };
        viewer.apply(intent, Vec2::ZERO, 1.0);
        assert!((viewer.position.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_locked_viewer_ignores_input() {
        let mut viewer = Viewer::new(Vec3::new(1.0, 2.0, 3.0));
        viewer.set_locked(true);
        let intent = MovementIntent { forward: true, ..Default::default() };
        assert!(!viewer.apply(intent, Vec2::new(100.0, 50.0), 1.0));
        assert_eq!(viewer.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(viewer.yaw, 0.0);
        assert_eq!(viewer.pitch, 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut viewer = Viewer::new(Vec3::ZERO);
        viewer.apply(MovementIntent::default(), Vec2::new(0.0, -1.0e6), 0.0);
        assert!((viewer.pitch - MAX_PITCH).abs() < 1e-5);
    }

    #[test]
    fn test_rod_tip_follows_camera() {
        let mut viewer = Viewer::new(Vec3::new(0.0, 2.0, 0.0));
        let tip = viewer.rod_tip();
        assert!((tip - (Vec3::new(0.0, 2.0, 0.0) + ROD_TIP_OFFSET)).length() < 1e-5);

        viewer.yaw = std::f32::consts::PI;
        let turned = viewer.rod_tip();
        // Facing +Z now: the forward component flips sign
        assert!(turned.z > 0.0);
    }
}
