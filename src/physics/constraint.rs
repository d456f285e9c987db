//! Point-to-point constraints

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, RigidBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub u32);

/// Pins a point on `body_a` to a point on `body_b` (pivots in local space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointToPoint {
    pub id: ConstraintId,
    pub body_a: BodyId,
    pub pivot_a: Vec3,
    pub body_b: BodyId,
    pub pivot_b: Vec3,
}

impl PointToPoint {
    pub fn new(body_a: BodyId, pivot_a: Vec3, body_b: BodyId, pivot_b: Vec3) -> Self {
        Self {
            id: ConstraintId(0),
            body_a,
            pivot_a,
            body_b,
            pivot_b,
        }
    }

    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Separation between the two pivots (b minus a), in world space
    pub fn error(&self, a: &RigidBody, b: &RigidBody) -> Vec3 {
        b.local_to_world(self.pivot_b) - a.local_to_world(self.pivot_a)
    }
}
