//! Physics-to-visual sync
//!
//! Each synced entity joins a body id with a visual id and a transform slot
//! the renderer reads. The slot layout is GPU friendly so a bridge can upload
//! the whole list as an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::{BodyId, PhysicsWorld};

/// Position + orientation copied out of a body
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyTransform {
    pub position: [f32; 3],
    pub _pad: f32,
    /// Quaternion (x, y, z, w)
    pub rotation: [f32; 4],
}

impl BodyTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: position.to_array(),
            _pad: 0.0,
            rotation: rotation.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_array(self.rotation)
    }
}

impl Default for BodyTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// What the visual represents (renderer picks a mesh from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualRole {
    Bobber,
    Fish,
    Prop,
}

#[derive(Debug, Clone)]
pub struct SyncedEntity {
    pub body: BodyId,
    /// Opaque id of the visual owned by the renderer
    pub visual: u32,
    pub role: VisualRole,
    pub transform: BodyTransform,
}

impl SyncedEntity {
    pub fn new(body: BodyId, visual: u32, role: VisualRole) -> Self {
        Self {
            body,
            visual,
            role,
            transform: BodyTransform::default(),
        }
    }

    /// Copy the body's transform. Returns false if the body no longer exists.
    pub fn sync(&mut self, world: &PhysicsWorld) -> bool {
        match world.body(self.body) {
            Some(body) => {
                self.transform = BodyTransform::new(body.position, body.rotation);
                true
            }
            None => false,
        }
    }
}

/// Refresh every entry, dropping entries whose body was removed
pub fn sync_all(entities: &mut Vec<SyncedEntity>, world: &PhysicsWorld) {
    entities.retain_mut(|e| {
        let alive = e.sync(world);
        if !alive {
            log::debug!("Dropping visual {} (body {:?} removed)", e.visual, e.body);
        }
        alive
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{RigidBody, Shape};

    #[test]
    fn test_transform_layout_is_tight() {
        assert_eq!(std::mem::size_of::<BodyTransform>(), 32);
        let transforms = [BodyTransform::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&transforms);
        assert_eq!(bytes.len(), 64);
    }

    #[test]
    fn test_sync_copies_body_pose() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let rotation = Quat::from_rotation_y(0.5);
        let mut body = RigidBody::new(Shape::Sphere { radius: 1.0 }, 1.0).with_position(Vec3::new(1.0, 2.0, 3.0));
        body.rotation = rotation;
        let id = world.add_body(body);

        let mut entity = SyncedEntity::new(id, 7, VisualRole::Prop);
        assert!(entity.sync(&world));
        assert_eq!(entity.transform.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(entity.transform.rotation().abs_diff_eq(rotation, 1e-6));
    }

    #[test]
    fn test_sync_all_drops_removed_bodies() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let a = world.add_body(RigidBody::new(Shape::Sphere { radius: 1.0 }, 1.0));
        let b = world.add_body(RigidBody::new(Shape::Sphere { radius: 1.0 }, 1.0));
        let mut entities = vec![
            SyncedEntity::new(a, 1, VisualRole::Fish),
            SyncedEntity::new(b, 2, VisualRole::Fish),
        ];
        world.remove_body(a);
        sync_all(&mut entities, &world);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].visual, 2);
    }
}
