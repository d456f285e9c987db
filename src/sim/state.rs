//! Game state and core simulation types
//!
//! Owns every piece of the lakeside scene: physics, the fishing state
//! machine, fish, timers, the ledger and the render-facing lists.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cast::Ray;
use super::effects::Effect;
use super::fish::{FishAgent, NavigableWater, RadiusBoundary};
use super::fishing::{FishingContext, FishingPhase, FishingStateMachine};
use super::inventory::{InventoryEntry, InventoryLedger};
use super::skill_check::SkillCheck;
use super::sync::{BodyTransform, SyncedEntity, VisualRole};
use super::timer::{Scheduler, TimerFired};
use super::viewer::Viewer;
use crate::error::FishingError;
use crate::physics::{BodyId, PhysicsWorld, RigidBody, Shape, WaterVolume};
use crate::settings::Settings;

/// Notifications for the UI layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cast { origin: Vec3, target: Vec3 },
    /// Bobber hit the water; waiting for a bite
    Splash { position: Vec3 },
    /// A fish bit; the dial is up
    SkillCheckOpened,
    FishCaught {
        key: String,
        display_name: String,
        image_ref: String,
        quantity: u32,
    },
    CatchMissed { angle_deg: f32 },
    /// Player reeled in before the catch was decided
    Recalled,
}

/// Height props are dropped from above their resting spot
pub const PROP_DROP_HEIGHT: f32 = 10.0;

pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub settings: Settings,
    pub physics: PhysicsWorld,
    pub viewer: Viewer,
    pub fishing: FishingStateMachine,
    /// Fish, in spawn order
    pub fish: Vec<FishAgent>,
    pub region: Box<dyn NavigableWater>,
    pub scheduler: Scheduler,
    pub ledger: InventoryLedger,
    /// Body → visual pairs refreshed every tick
    pub synced: Vec<SyncedEntity>,
    /// Visual effects (not gameplay-affecting)
    pub effects: Vec<Effect>,
    events: Vec<GameEvent>,
    next_visual: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut physics = PhysicsWorld::new(settings.world.gravity);
        physics.set_water(Some(WaterVolume {
            level: settings.world.water_level,
            drag: settings.world.water_drag,
        }));
        // Lake bed / ground
        physics.add_body(
            RigidBody::fixed(Shape::Plane { normal: Vec3::Y })
                .with_position(Vec3::new(0.0, settings.world.ground_level, 0.0)),
        );

        let mut viewer = Viewer::new(settings.viewer.start_position);
        viewer.walk_speed = settings.viewer.walk_speed;
        viewer.look_sensitivity = settings.viewer.look_sensitivity;
        viewer.rod_offset = settings.cast.rod_offset;

        let fishing = FishingStateMachine::new(&mut physics, viewer.rod_tip(), &settings);
        let region = Box::new(RadiusBoundary {
            center: Vec3::ZERO,
            radius: settings.fish.lake_radius,
        });

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(0),
            time_ticks: 0,
            ledger: InventoryLedger::new(settings.effective_catalog()),
            physics,
            viewer,
            fishing,
            fish: Vec::new(),
            region,
            scheduler: Scheduler::new(),
            synced: Vec::new(),
            effects: Vec::new(),
            events: Vec::new(),
            next_visual: 1,
            settings,
        };

        let bobber = state.fishing.cast_controller().bobber();
        let visual = state.next_visual_id();
        state.synced.push(SyncedEntity::new(bobber, visual, VisualRole::Bobber));

        for _ in 0..state.settings.fish.count {
            let visual = state.next_visual_id();
            let agent = FishAgent::spawn(&mut state.physics, visual, &state.settings.fish, &mut rng);
            state.synced.push(SyncedEntity::new(agent.body, visual, VisualRole::Fish));
            state.fish.push(agent);
        }
        state.rng = rng;

        log::info!(
            "Lake ready: seed {}, {} fish, {} species",
            seed,
            state.fish.len(),
            state.ledger.catalog().len()
        );
        state
    }

    /// Swap the "is this water" policy fish use
    pub fn with_water_region(mut self, region: Box<dyn NavigableWater>) -> Self {
        self.region = region;
        self
    }

    /// Allocate a new visual ID
    pub fn next_visual_id(&mut self) -> u32 {
        let id = self.next_visual;
        self.next_visual += 1;
        id
    }

    /// Drop a box-shaped scenery prop (tree, fisherman) above `position`.
    /// It falls and settles on the ground, and is synced like everything else.
    pub fn spawn_prop(&mut self, position: Vec3, half_extents: Vec3) -> (BodyId, u32) {
        let body = self.physics.add_body(
            RigidBody::new(Shape::Box { half_extents }, 1.0)
                .with_position(position + Vec3::new(0.0, PROP_DROP_HEIGHT, 0.0)),
        );
        let visual = self.next_visual_id();
        self.synced.push(SyncedEntity::new(body, visual, VisualRole::Prop));
        log::debug!("Prop {} spawned at {}", visual, position);
        (body, visual)
    }

    /// Split borrows so the state machine can reach the rest of the state
    pub fn split_fishing(&mut self) -> (&mut FishingStateMachine, FishingContext<'_>) {
        let GameState {
            fishing,
            physics,
            scheduler,
            ledger,
            viewer,
            events,
            effects,
            rng,
            ..
        } = self;
        (
            fishing,
            FishingContext {
                world: physics,
                scheduler,
                ledger,
                viewer,
                events,
                effects,
                rng,
            },
        )
    }

    pub fn cast(&mut self, ray: Ray) -> Result<(), FishingError> {
        let (fishing, mut ctx) = self.split_fishing();
        fishing.request_cast(&mut ctx, ray).map(|_| ())
    }

    pub fn reel_in(&mut self) {
        let (fishing, mut ctx) = self.split_fishing();
        fishing.reel_in(&mut ctx);
    }

    /// Returns Some(success) when a skill check was resolved
    pub fn confirm(&mut self) -> Option<bool> {
        let (fishing, mut ctx) = self.split_fishing();
        fishing.confirm(&mut ctx)
    }

    pub fn update_bobber(&mut self) {
        let (fishing, mut ctx) = self.split_fishing();
        fishing.update_bobber(&mut ctx);
    }

    pub fn dispatch_timer(&mut self, fired: TimerFired) {
        let (fishing, mut ctx) = self.split_fishing();
        if let Err(err) = fishing.on_timer(&mut ctx, fired) {
            log::debug!("Ignoring {:?} timer: {}", fired.role, err);
        }
    }

    pub fn phase(&self) -> FishingPhase {
        self.fishing.phase()
    }

    pub fn skill_check(&self) -> Option<&SkillCheck> {
        self.fishing.skill_check()
    }

    /// Whether movement/look input is suspended
    pub fn input_locked(&self) -> bool {
        self.viewer.is_locked()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn inventory(&self) -> Vec<InventoryEntry> {
        self.ledger.snapshot()
    }

    pub fn transforms(&self) -> &[SyncedEntity] {
        &self.synced
    }

    /// Transforms packed for an instance buffer, in `transforms()` order
    pub fn transform_buffer(&self) -> Vec<BodyTransform> {
        self.synced.iter().map(|e| e.transform).collect()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn bobber_position(&self) -> Option<Vec3> {
        self.fishing.cast_controller().bobber_position(&self.physics)
    }
}
