//! Fish wandering inside the lake
//!
//! Each fish pushes along its wander target while it is in navigable water
//! and is turned straight back home as soon as it leaves. What counts as
//! "in water" is injected via [`NavigableWater`].

use glam::{Quat, Vec3};
use rand::Rng;

use crate::consts::MAX_SPAWN_ATTEMPTS;
use crate::physics::{BodyId, PhysicsWorld, RigidBody, Shape};
use crate::settings::FishSettings;
use crate::{heading_to_dir, horizontal};

/// Region fish are allowed to swim in
pub trait NavigableWater {
    fn is_in_water(&self, position: Vec3) -> bool;

    /// Where stray fish head back to
    fn home(&self) -> Vec3 {
        Vec3::ZERO
    }
}

/// Circular lake: in water while within `radius` (horizontally) of `center`
#[derive(Debug, Clone, Copy)]
pub struct RadiusBoundary {
    pub center: Vec3,
    pub radius: f32,
}

impl NavigableWater for RadiusBoundary {
    fn is_in_water(&self, position: Vec3) -> bool {
        horizontal(position - self.center).length() <= self.radius
    }

    fn home(&self) -> Vec3 {
        self.center
    }
}

/// Terrain-shaped lake: in water wherever the ground lies below the surface
pub struct TerrainDepth<F: Fn(f32, f32) -> f32> {
    /// Ground height at (x, z)
    pub height_at: F,
    pub water_level: f32,
    pub home: Vec3,
}

impl<F: Fn(f32, f32) -> f32> NavigableWater for TerrainDepth<F> {
    fn is_in_water(&self, position: Vec3) -> bool {
        (self.height_at)(position.x, position.z) < self.water_level
    }

    fn home(&self) -> Vec3 {
        self.home
    }
}

/// Random horizontal unit vector
pub fn random_heading(rng: &mut impl Rng) -> Vec3 {
    heading_to_dir(rng.random_range(0.0..std::f32::consts::TAU))
}

/// Uniform point in the spawn square at least `min_distance` from the origin.
///
/// Rejection sampling is capped; if every attempt lands too close, the fish
/// is placed exactly `min_distance` out along a random heading.
pub fn spawn_position(rng: &mut impl Rng, extent: f32, min_distance: f32, depth: f32) -> Vec3 {
    let extent = extent.max(f32::EPSILON);
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let x = rng.random_range(-extent..extent);
        let z = rng.random_range(-extent..extent);
        if x.hypot(z) >= min_distance {
            return Vec3::new(x, depth, z);
        }
    }
    log::warn!(
        "Fish spawn rejected {} times (extent {}, min distance {}), using fallback",
        MAX_SPAWN_ATTEMPTS,
        extent,
        min_distance
    );
    random_heading(rng) * min_distance + Vec3::new(0.0, depth, 0.0)
}

/// A wandering fish
#[derive(Debug, Clone)]
pub struct FishAgent {
    pub body: BodyId,
    pub visual: u32,
    /// Desired horizontal heading (unit vector)
    pub wander_target: Vec3,
}

impl FishAgent {
    /// Add a fish body to the world at a valid spawn point
    pub fn spawn(
        world: &mut PhysicsWorld,
        visual: u32,
        settings: &FishSettings,
        rng: &mut impl Rng,
    ) -> Self {
        let position = spawn_position(rng, settings.spawn_extent, settings.min_spawn_distance, settings.depth);
        let body = world.add_body(
            RigidBody::new(Shape::Box { half_extents: Vec3::new(0.15, 0.1, 0.4) }, 1.0)
                .with_position(position)
                .with_gravity_scale(0.0)
                .with_damping(0.05, 0.5),
        );
        Self {
            body,
            visual,
            wander_target: random_heading(rng),
        }
    }

    /// One tick of wandering. Returns whether the fish was in water, or None
    /// if its body is gone.
    pub fn update(
        &mut self,
        world: &mut PhysicsWorld,
        region: &dyn NavigableWater,
        settings: &FishSettings,
        rng: &mut impl Rng,
    ) -> Option<bool> {
        let body = world.body_mut(self.body)?;
        let in_water = region.is_in_water(body.position);

        if in_water {
            body.velocity += self.wander_target * settings.wander_accel;
            body.velocity.x = body.velocity.x.clamp(-settings.max_speed, settings.max_speed);
            body.velocity.z = body.velocity.z.clamp(-settings.max_speed, settings.max_speed);
            if rng.random_bool(settings.resample_chance.clamp(0.0, 1.0)) {
                self.wander_target = random_heading(rng);
            }
        } else {
            // Forced reversal: ignore the wander target until back inside
            let inward = horizontal(region.home() - body.position).normalize_or_zero();
            body.velocity = inward * settings.return_speed;
            if inward != Vec3::ZERO {
                self.wander_target = inward;
            }
        }

        let heading = horizontal(body.velocity);
        if heading.length_squared() > 1e-6 {
            body.rotation = Quat::from_rotation_y((-heading.x).atan2(-heading.z));
            body.angular_velocity = Vec3::ZERO;
        }
        Some(in_water)
    }
}

/// Run every fish for one tick
pub fn update_fish(
    agents: &mut [FishAgent],
    world: &mut PhysicsWorld,
    region: &dyn NavigableWater,
    settings: &FishSettings,
    rng: &mut impl Rng,
) {
    for agent in agents.iter_mut() {
        agent.update(world, region, settings, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn lake() -> RadiusBoundary {
        RadiusBoundary { center: Vec3::ZERO, radius: 40.0 }
    }

    fn world_with_fish_at(position: Vec3, rng: &mut Pcg32) -> (PhysicsWorld, FishAgent) {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let mut agent = FishAgent::spawn(&mut world, 1, &FishSettings::default(), rng);
        world.body_mut(agent.body).unwrap().position = position;
        agent.wander_target = Vec3::X;
        (world, agent)
    }

    #[test]
    fn test_spawn_respects_min_distance() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let p = spawn_position(&mut rng, 40.0, 10.0, -1.0);
            assert!(horizontal(p).length() >= 10.0 - 1e-4);
            assert_eq!(p.y, -1.0);
        }
    }

    #[test]
    fn test_spawn_fallback_when_square_is_too_small() {
        let mut rng = Pcg32::seed_from_u64(7);
        // Every sample lies within 1.5 of the origin
        let p = spawn_position(&mut rng, 1.0, 10.0, 0.0);
        assert!((horizontal(p).length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_wander_accelerates_and_clamps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let (mut world, mut agent) = world_with_fish_at(Vec3::new(5.0, -1.0, 0.0), &mut rng);
        let settings = FishSettings { resample_chance: 0.0, ..Default::default() };

        assert_eq!(agent.update(&mut world, &lake(), &settings, &mut rng), Some(true));
        let v = world.body(agent.body).unwrap().velocity;
        assert!((v.x - settings.wander_accel).abs() < 1e-5);

        for _ in 0..100 {
            agent.update(&mut world, &lake(), &settings, &mut rng);
        }
        let v = world.body(agent.body).unwrap().velocity;
        assert!(v.x <= settings.max_speed + 1e-6);
    }

    #[test]
    fn test_stray_fish_turns_home() {
        let mut rng = Pcg32::seed_from_u64(2);
        let (mut world, mut agent) = world_with_fish_at(Vec3::new(50.0, -1.0, 0.0), &mut rng);
        let settings = FishSettings::default();

        assert_eq!(agent.update(&mut world, &lake(), &settings, &mut rng), Some(false));
        let v = world.body(agent.body).unwrap().velocity;
        assert!((v - Vec3::new(-settings.return_speed, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(agent.wander_target, Vec3::NEG_X);
    }

    #[test]
    fn test_fish_stays_near_lake_over_time() {
        let mut rng = Pcg32::seed_from_u64(3);
        let settings = FishSettings::default();
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let mut agents: Vec<FishAgent> = (0..6)
            .map(|i| FishAgent::spawn(&mut world, i, &settings, &mut rng))
            .collect();

        for _ in 0..3000 {
            world.step(SIM_DT);
            update_fish(&mut agents, &mut world, &lake(), &settings, &mut rng);
        }
        for agent in &agents {
            let p = world.body(agent.body).unwrap().position;
            // Spawn square corners start outside the circle; everyone is pulled back in
            assert!(horizontal(p).length() < 40.0 + 1.0, "fish escaped to {p}");
        }
    }

    #[test]
    fn test_terrain_policy() {
        let pond = TerrainDepth {
            height_at: |x: f32, _z: f32| if x < 10.0 { -2.0 } else { 1.0 },
            water_level: 0.0,
            home: Vec3::ZERO,
        };
        assert!(pond.is_in_water(Vec3::new(5.0, -1.0, 100.0)));
        assert!(!pond.is_in_water(Vec3::new(15.0, -1.0, 0.0)));

        let mut rng = Pcg32::seed_from_u64(4);
        let (mut world, mut agent) = world_with_fish_at(Vec3::new(15.0, -1.0, 3.0), &mut rng);
        assert_eq!(agent.update(&mut world, &pond, &FishSettings::default(), &mut rng), Some(false));
        assert!(world.body(agent.body).unwrap().velocity.x < 0.0);
    }

    #[test]
    fn test_fish_faces_heading() {
        let mut rng = Pcg32::seed_from_u64(5);
        let (mut world, mut agent) = world_with_fish_at(Vec3::new(50.0, -1.0, 0.0), &mut rng);
        agent.update(&mut world, &lake(), &FishSettings::default(), &mut rng);
        let body = world.body(agent.body).unwrap();
        let facing = body.rotation * Vec3::NEG_Z;
        assert!((facing - Vec3::NEG_X).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_outside_fish_velocity_points_inward(
            x in -200.0f32..200.0,
            z in -200.0f32..200.0,
            seed in 0u64..1000,
        ) {
            let region = lake();
            let position = Vec3::new(x, -1.0, z);
            prop_assume!(!region.is_in_water(position));

            let mut rng = Pcg32::seed_from_u64(seed);
            let (mut world, mut agent) = world_with_fish_at(position, &mut rng);
            agent.update(&mut world, &region, &FishSettings::default(), &mut rng);

            let v = world.body(agent.body).unwrap().velocity;
            let inward = horizontal(region.home() - position).normalize_or_zero();
            prop_assert!(v.dot(inward) >= 0.0);
        }
    }
}
