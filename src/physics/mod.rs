//! Minimal rigid-body world
//!
//! Just enough simulation for a bobber on a line and fish in a lake:
//! - Semi-implicit Euler integration at a fixed timestep
//! - Point-to-point constraints solved by position projection
//! - Static plane contacts (ground)
//! - A water volume with buoyancy and drag
//!
//! Constraint and body removal take effect immediately; nothing is deferred.

pub mod body;
pub mod constraint;
pub mod world;

pub use body::{BodyId, RigidBody, Shape};
pub use constraint::{ConstraintId, PointToPoint};
pub use world::{PhysicsWorld, WaterVolume};
