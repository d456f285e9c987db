//! Rigid bodies and collision shapes

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    /// Infinite plane through the body position, facing `normal`
    Plane { normal: Vec3 },
}

impl Shape {
    /// Extent of the shape from its center along `dir` (unit vector)
    pub fn support(&self, rotation: Quat, dir: Vec3) -> f32 {
        match *self {
            Shape::Sphere { radius } => radius,
            Shape::Box { half_extents } => {
                (rotation * Vec3::X).dot(dir).abs() * half_extents.x
                    + (rotation * Vec3::Y).dot(dir).abs() * half_extents.y
                    + (rotation * Vec3::Z).dot(dir).abs() * half_extents.z
            }
            Shape::Plane { .. } => 0.0,
        }
    }
}

/// A rigid body. Mass 0 makes the body static (or kinematic when moved by hand).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: BodyId,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub shape: Shape,
    /// Multiplier on world gravity (0 = neutrally buoyant / floating freely)
    pub gravity_scale: f32,
    /// Fraction of linear velocity lost per second
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second
    pub angular_damping: f32,
    /// Affected by the world's water volume
    pub buoyant: bool,
}

impl RigidBody {
    /// New body at the origin; the id is assigned when added to a world
    pub fn new(shape: Shape, mass: f32) -> Self {
        Self {
            id: BodyId(0),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: mass.max(0.0),
            shape,
            gravity_scale: 1.0,
            linear_damping: 0.01,
            angular_damping: 0.01,
            buoyant: false,
        }
    }

    /// Zero-mass body (anchors, ground)
    pub fn fixed(shape: Shape) -> Self {
        Self::new(shape, 0.0)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn buoyant(mut self) -> Self {
        self.buoyant = true;
        self
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() { 1.0 / self.mass } else { 0.0 }
    }

    /// Scalar inverse inertia (shapes treated as isotropic)
    fn inverse_inertia(&self) -> f32 {
        if !self.is_dynamic() {
            return 0.0;
        }
        let inertia = match self.shape {
            Shape::Sphere { radius } => 0.4 * self.mass * radius * radius,
            Shape::Box { half_extents } => self.mass * half_extents.length_squared() / 3.0,
            Shape::Plane { .. } => return 0.0,
        };
        if inertia > 0.0 { 1.0 / inertia } else { 0.0 }
    }

    /// Clear linear and angular velocity
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Instantaneous impulse applied at a world-space point
    pub fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.velocity += impulse * self.inverse_mass();
        let arm = world_point - self.position;
        self.angular_velocity += arm.cross(impulse) * self.inverse_inertia();
    }

    /// World-space position of a point given in body-local coordinates
    #[inline]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_at_center_has_no_spin() {
        let mut body = RigidBody::new(Shape::Sphere { radius: 0.5 }, 2.0);
        body.apply_impulse(Vec3::new(4.0, 2.0, 0.0), body.position);
        assert_eq!(body.velocity, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_off_center_impulse_spins() {
        let mut body = RigidBody::new(Shape::Sphere { radius: 0.5 }, 1.0);
        body.apply_impulse(Vec3::X, Vec3::new(0.0, 0.5, 0.0));
        assert!(body.angular_velocity.z < 0.0);
    }

    #[test]
    fn test_static_body_ignores_impulse() {
        let mut body = RigidBody::fixed(Shape::Sphere { radius: 1.0 });
        body.apply_impulse(Vec3::splat(10.0), Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.inverse_mass(), 0.0);
    }

    #[test]
    fn test_box_support_rotated() {
        let shape = Shape::Box { half_extents: Vec3::new(2.0, 1.0, 1.0) };
        assert!((shape.support(Quat::IDENTITY, Vec3::Y) - 1.0).abs() < 1e-5);
        let tipped = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!((shape.support(tipped, Vec3::Y) - 2.0).abs() < 1e-5);
    }
}
