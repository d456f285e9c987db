//! Casting, recalling and watching the bobber
//!
//! The controller exclusively owns the bobber body, the rod-tip anchor body
//! and the constraint between them. Everything else only reads them.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::session::FishingSession;
use super::timer::Scheduler;
use crate::error::FishingError;
use crate::physics::{BodyId, ConstraintId, PhysicsWorld, PointToPoint, RigidBody, Shape};
use crate::settings::CastSettings;

/// World-space pointer ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Where the ray meets the horizontal water plane, if it does
    pub fn intersect_water(&self, level: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (level - self.origin.y) / self.direction.y;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.direction * t)
    }
}

/// Cast impulse and the numbers behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchImpulse {
    pub direction: Vec3,
    pub distance: f32,
    pub horizontal_strength: f32,
    pub vertical_strength: f32,
    pub impulse: Vec3,
}

/// Impulse that throws the bobber from `origin` toward `target`.
///
/// Horizontal strength grows with distance; vertical strength is clamped so
/// short casts still arc and long casts don't sail into the sky.
pub fn launch_impulse(origin: Vec3, target: Vec3, tuning: &CastSettings) -> LaunchImpulse {
    let delta = target - origin;
    let distance = delta.length();
    let direction = delta.normalize_or_zero();
    let horizontal_strength = distance * tuning.horizontal_factor;
    let vertical_strength = (distance * tuning.vertical_factor).clamp(tuning.vertical_min, tuning.vertical_max);
    LaunchImpulse {
        direction,
        distance,
        horizontal_strength,
        vertical_strength,
        impulse: Vec3::new(
            direction.x * horizontal_strength,
            vertical_strength,
            direction.z * horizontal_strength,
        ),
    }
}

#[derive(Debug, Clone)]
pub struct CastController {
    bobber: BodyId,
    anchor: Option<BodyId>,
    rod_joint: Option<ConstraintId>,
    tuning: CastSettings,
}

impl CastController {
    /// Create the bobber and hang it from the rod tip
    pub fn new(world: &mut PhysicsWorld, rod_tip: Vec3, tuning: CastSettings) -> Self {
        let bobber = world.add_body(
            RigidBody::new(Shape::Sphere { radius: tuning.bobber_radius }, tuning.bobber_mass)
                .with_position(rod_tip)
                .with_damping(0.1, 0.5)
                .buoyant(),
        );
        let mut controller = Self {
            bobber,
            anchor: None,
            rod_joint: None,
            tuning,
        };
        controller.attach(world, rod_tip);
        controller
    }

    pub fn bobber(&self) -> BodyId {
        self.bobber
    }

    pub fn anchor(&self) -> Option<BodyId> {
        self.anchor
    }

    pub fn rod_joint(&self) -> Option<ConstraintId> {
        self.rod_joint
    }

    pub fn tuning(&self) -> &CastSettings {
        &self.tuning
    }

    pub fn bobber_position(&self, world: &PhysicsWorld) -> Option<Vec3> {
        world.body(self.bobber).map(|b| b.position)
    }

    /// Drop the rod constraint and its anchor body, if present
    fn detach(&mut self, world: &mut PhysicsWorld) {
        if let Some(joint) = self.rod_joint.take() {
            world.remove_constraint(joint);
        }
        if let Some(anchor) = self.anchor.take() {
            world.remove_body(anchor);
        }
    }

    /// Fresh anchor at the rod tip with the bobber pinned below it
    fn attach(&mut self, world: &mut PhysicsWorld, rod_tip: Vec3) {
        self.detach(world);
        let anchor = world.add_body(RigidBody::fixed(Shape::Sphere { radius: 0.01 }).with_position(rod_tip));
        self.anchor = Some(anchor);
        self.rod_joint = world.add_constraint(PointToPoint::new(
            self.bobber,
            Vec3::ZERO,
            anchor,
            self.tuning.anchor_offset,
        ));
    }

    /// Throw the bobber from `origin` toward `target`
    pub fn cast(
        &mut self,
        world: &mut PhysicsWorld,
        session: &mut FishingSession,
        origin: Vec3,
        target: Vec3,
    ) -> Result<LaunchImpulse, FishingError> {
        if session.is_fishing {
            return Err(FishingError::DoubleCastAttempt);
        }

        self.detach(world);
        let launch = launch_impulse(origin, target, &self.tuning);

        let body = world.body_mut(self.bobber).ok_or(FishingError::InvalidCastTarget)?;
        body.position = origin;
        body.stop();
        world.apply_impulse(self.bobber, launch.impulse, origin);

        session.is_fishing = true;
        log::debug!(
            "Cast {:.1} units: horizontal {:.2}, vertical {:.2}",
            launch.distance,
            launch.horizontal_strength,
            launch.vertical_strength
        );
        Ok(launch)
    }

    /// Reel the bobber back onto the rod and reset the session.
    ///
    /// Timers are cancelled before anything moves. Calling this repeatedly
    /// always leaves exactly one rod constraint.
    pub fn recall(
        &mut self,
        world: &mut PhysicsWorld,
        session: &mut FishingSession,
        scheduler: &mut Scheduler,
        rod_tip: Vec3,
    ) {
        session.cancel_timers(scheduler);
        self.detach(world);

        if let Some(body) = world.body_mut(self.bobber) {
            body.stop();
            body.position = rod_tip;
        }
        self.attach(world, rod_tip);
        session.reset_flags();
    }

    /// Keep the anchor glued to the moving rod tip
    pub fn update_anchor(&self, world: &mut PhysicsWorld, rod_tip: Vec3) {
        if self.rod_joint.is_none() {
            return;
        }
        if let Some(anchor) = self.anchor.and_then(|id| world.body_mut(id)) {
            anchor.position = rod_tip;
        }
    }

    /// Bobber has dipped into the water while a cast is out and nothing is armed
    pub fn touches_water(&self, world: &PhysicsWorld, session: &FishingSession, water_level: f32) -> bool {
        if !session.is_fishing || session.has_active_timer() {
            return false;
        }
        self.bobber_position(world)
            .is_some_and(|p| p.y <= water_level + self.tuning.bobber_radius * 0.5)
    }

    /// Nudge the bobber by up to `amplitude` on each axis
    pub fn tremble(&self, world: &mut PhysicsWorld, amplitude: f32, rng: &mut impl Rng) {
        if amplitude <= 0.0 {
            return;
        }
        if let Some(body) = world.body_mut(self.bobber) {
            body.position += Vec3::new(
                rng.random_range(-amplitude..=amplitude),
                rng.random_range(-amplitude..=amplitude),
                rng.random_range(-amplitude..=amplitude),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, SIM_DT};
    use crate::sim::timer::TimerRole;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ROD_TIP: Vec3 = Vec3::new(0.0, 2.0, 0.0);

    fn setup() -> (PhysicsWorld, CastController, FishingSession, Scheduler) {
        let mut world = PhysicsWorld::new(GRAVITY);
        let controller = CastController::new(&mut world, ROD_TIP, CastSettings::default());
        (world, controller, FishingSession::default(), Scheduler::new())
    }

    #[test]
    fn test_fifty_unit_cast() {
        let launch = launch_impulse(Vec3::ZERO, Vec3::new(0.0, 0.0, -50.0), &CastSettings::default());
        assert_eq!(launch.vertical_strength, 10.0);
        assert!((launch.horizontal_strength - 125.0).abs() < 1e-4);
        assert!((launch.impulse - Vec3::new(0.0, 10.0, -125.0)).length() < 1e-3);
    }

    #[test]
    fn test_short_cast_still_arcs() {
        let launch = launch_impulse(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &CastSettings::default());
        assert_eq!(launch.vertical_strength, 4.0);
    }

    #[test]
    fn test_ray_water_intersection() {
        let down = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, -1.0));
        let hit = down.intersect_water(0.0).unwrap();
        assert!((hit - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);

        let level = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z);
        assert!(level.intersect_water(0.0).is_none());
        let up = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        assert!(up.intersect_water(0.0).is_none());
    }

    #[test]
    fn test_new_controller_hangs_bobber() {
        let (world, controller, _, _) = setup();
        assert_eq!(world.constraint_count(), 1);
        assert!(controller.anchor().is_some());
        assert_eq!(controller.bobber_position(&world), Some(ROD_TIP));
    }

    #[test]
    fn test_cast_detaches_and_launches() {
        let (mut world, mut controller, mut session, _) = setup();
        let launch = controller
            .cast(&mut world, &mut session, ROD_TIP, Vec3::new(0.0, 0.0, -20.0))
            .unwrap();

        assert!(session.is_fishing);
        assert_eq!(world.constraint_count(), 0);
        assert!(controller.anchor().is_none());
        let bobber = world.body(controller.bobber()).unwrap();
        assert!((bobber.velocity - launch.impulse / CastSettings::default().bobber_mass).length() < 1e-4);
        assert_eq!(bobber.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_double_cast_is_rejected() {
        let (mut world, mut controller, mut session, _) = setup();
        controller
            .cast(&mut world, &mut session, ROD_TIP, Vec3::new(0.0, 0.0, -20.0))
            .unwrap();
        let before = world.body(controller.bobber()).unwrap().velocity;
        assert_eq!(
            controller.cast(&mut world, &mut session, ROD_TIP, Vec3::new(5.0, 0.0, -5.0)),
            Err(FishingError::DoubleCastAttempt)
        );
        assert_eq!(world.body(controller.bobber()).unwrap().velocity, before);
    }

    #[test]
    fn test_recall_is_idempotent() {
        let (mut world, mut controller, mut session, mut sched) = setup();
        controller
            .cast(&mut world, &mut session, ROD_TIP, Vec3::new(0.0, 0.0, -20.0))
            .unwrap();
        let bodies_before = world.bodies().len();

        for _ in 0..5 {
            controller.recall(&mut world, &mut session, &mut sched, ROD_TIP);
            assert_eq!(world.constraint_count(), 1);
        }
        // One anchor, never accumulated
        assert_eq!(world.bodies().len(), bodies_before + 1);
        assert!(!session.is_fishing);
        assert_eq!(session.click_count, 0);
    }

    #[test]
    fn test_recall_cancels_timers() {
        let (mut world, mut controller, mut session, mut sched) = setup();
        let bite = sched.schedule_once(5.0, TimerRole::Bite);
        session.arm(&mut sched, TimerRole::Bite, bite);
        let tremble = sched.schedule_repeating(0.05, TimerRole::Tremble);
        session.arm(&mut sched, TimerRole::Tremble, tremble);

        controller.recall(&mut world, &mut session, &mut sched, ROD_TIP);
        assert_eq!(sched.pending(), 0);
        assert!(!session.has_active_timer());
    }

    #[test]
    fn test_anchor_follows_rod_tip() {
        let (mut world, controller, _, _) = setup();
        let moved = ROD_TIP + Vec3::new(3.0, 0.0, 1.0);
        controller.update_anchor(&mut world, moved);
        for _ in 0..10 {
            world.step(SIM_DT);
        }
        let anchor = world.body(controller.anchor().unwrap()).unwrap();
        assert_eq!(anchor.position, moved);
        let bobber = controller.bobber_position(&world).unwrap();
        assert!((bobber - (moved + CastSettings::default().anchor_offset)).length() < 1e-3);
    }

    #[test]
    fn test_cast_lands_in_water() {
        let (mut world, mut controller, mut session, _) = setup();
        controller
            .cast(&mut world, &mut session, ROD_TIP, Vec3::new(0.0, 0.0, -10.0))
            .unwrap();

        let mut touched = false;
        for _ in 0..600 {
            world.step(SIM_DT);
            if controller.touches_water(&world, &session, 0.0) {
                touched = true;
                break;
            }
        }
        assert!(touched);
    }

    #[test]
    fn test_tremble_stays_within_amplitude() {
        let (mut world, controller, _, _) = setup();
        let mut rng = Pcg32::seed_from_u64(9);
        let before = controller.bobber_position(&world).unwrap();
        controller.tremble(&mut world, 0.1, &mut rng);
        let delta = controller.bobber_position(&world).unwrap() - before;
        assert!(delta.abs().max_element() <= 0.1 + 1e-6);
    }

    proptest! {
        #[test]
        fn prop_vertical_impulse_is_clamped(
            ox in -50.0f32..50.0, oy in 0.0f32..5.0, oz in -50.0f32..50.0,
            tx in -500.0f32..500.0, tz in -500.0f32..500.0,
        ) {
            let launch = launch_impulse(Vec3::new(ox, oy, oz), Vec3::new(tx, 0.0, tz), &CastSettings::default());
            prop_assert!(launch.impulse.y >= 4.0 && launch.impulse.y <= 10.0);
        }
    }
}
