//! Physics world: body/constraint storage and the fixed step

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::body::{BodyId, RigidBody, Shape};
use super::constraint::{ConstraintId, PointToPoint};

/// Horizontal water surface with buoyancy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterVolume {
    /// Surface height
    pub level: f32,
    /// Fraction of velocity lost per second when fully submerged
    pub drag: f32,
}

impl WaterVolume {
    /// Submerged fraction of a buoyant body (0 = dry, 1 = fully under)
    pub fn submerged_fraction(&self, body: &RigidBody) -> f32 {
        let extent = body.shape.support(body.rotation, Vec3::Y);
        if extent <= 0.0 {
            return if body.position.y < self.level { 1.0 } else { 0.0 };
        }
        let bottom = body.position.y - extent;
        ((self.level - bottom) / (2.0 * extent)).clamp(0.0, 1.0)
    }
}

/// Owns every body and constraint; controllers refer to them by id
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    gravity: Vec3,
    water: Option<WaterVolume>,
    /// Sorted by id for deterministic iteration
    bodies: Vec<RigidBody>,
    constraints: Vec<PointToPoint>,
    /// Position-projection passes per step
    pub solver_iterations: u32,
    /// Fraction of tangential velocity kept per ground contact
    pub ground_friction: f32,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            water: None,
            bodies: Vec::new(),
            constraints: Vec::new(),
            solver_iterations: 4,
            ground_friction: 0.9,
            next_id: 1,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn water(&self) -> Option<WaterVolume> {
        self.water
    }

    pub fn set_water(&mut self, water: Option<WaterVolume>) {
        self.water = water;
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body, returning its id. Ids are never reused.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        let id = BodyId(self.allocate_id());
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body along with every constraint attached to it
    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.index_of(id)?;
        self.constraints.retain(|c| !c.involves(id));
        Some(self.bodies.remove(index))
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Add a constraint between two existing bodies. Returns None if either is missing.
    pub fn add_constraint(&mut self, mut constraint: PointToPoint) -> Option<ConstraintId> {
        if self.index_of(constraint.body_a).is_none() || self.index_of(constraint.body_b).is_none() {
            return None;
        }
        let id = ConstraintId(self.allocate_id());
        constraint.id = id;
        self.constraints.push(constraint);
        Some(id)
    }

    /// Remove a constraint. Returns false if it was already gone.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|c| c.id != id);
        self.constraints.len() != before
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&PointToPoint> {
        self.constraints.iter().find(|c| c.id == id)
    }

    pub fn constraints(&self) -> &[PointToPoint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Apply an impulse at a world point. Returns false if the body doesn't exist.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec3, world_point: Vec3) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.apply_impulse(impulse, world_point);
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate(dt);
        for _ in 0..self.solver_iterations {
            self.solve_constraints(dt);
        }
        self.resolve_ground_contacts();
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        let water = self.water;

        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            let mut accel = gravity * body.gravity_scale;
            let mut damping = body.linear_damping;

            if let (true, Some(water)) = (body.buoyant, water) {
                let submerged = water.submerged_fraction(body);
                if submerged > 0.0 {
                    // Floats at half submersion
                    accel -= gravity * body.gravity_scale * 2.0 * submerged;
                    damping += water.drag * submerged;
                }
            }

            body.velocity += accel * dt;
            body.velocity *= (1.0 - damping.clamp(0.0, 1.0)).powf(dt);
            body.angular_velocity *= (1.0 - body.angular_damping.clamp(0.0, 1.0)).powf(dt);

            body.position += body.velocity * dt;
            let spin = body.angular_velocity * dt;
            if spin.length_squared() > 0.0 {
                body.rotation = (Quat::from_scaled_axis(spin) * body.rotation).normalize();
            }
        }
    }

    /// One projection pass: move pivots together, split by inverse mass
    fn solve_constraints(&mut self, dt: f32) {
        for constraint in &self.constraints {
            let (Ok(ia), Ok(ib)) = (
                self.bodies.binary_search_by_key(&constraint.body_a, |b| b.id),
                self.bodies.binary_search_by_key(&constraint.body_b, |b| b.id),
            ) else {
                continue;
            };

            let wa = self.bodies[ia].inverse_mass();
            let wb = self.bodies[ib].inverse_mass();
            let total = wa + wb;
            if total <= 0.0 {
                continue;
            }

            let error = constraint.error(&self.bodies[ia], &self.bodies[ib]);
            let correct_a = error * (wa / total);
            let correct_b = -error * (wb / total);

            let a = &mut self.bodies[ia];
            a.position += correct_a;
            a.velocity += correct_a / dt;
            let b = &mut self.bodies[ib];
            b.position += correct_b;
            b.velocity += correct_b / dt;
        }
    }

    /// Push dynamic bodies out of static planes and kill inward velocity
    fn resolve_ground_contacts(&mut self) {
        let planes: Vec<(Vec3, Vec3)> = self
            .bodies
            .iter()
            .filter_map(|b| match b.shape {
                Shape::Plane { normal } => Some((b.position, normal.normalize_or_zero())),
                _ => None,
            })
            .collect();
        if planes.is_empty() {
            return;
        }

        let friction = self.ground_friction;
        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            for &(point, normal) in &planes {
                let extent = body.shape.support(body.rotation, normal);
                let gap = (body.position - point).dot(normal) - extent;
                if gap >= 0.0 {
                    continue;
                }
                body.position -= normal * gap;
                let normal_speed = body.velocity.dot(normal);
                if normal_speed < 0.0 {
                    body.velocity -= normal * normal_speed;
                    let tangential = body.velocity - normal * body.velocity.dot(normal);
                    body.velocity -= tangential * (1.0 - friction);
                    body.angular_velocity *= friction;
                }
            }
        }
    }
}
