//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod cast;
pub mod effects;
pub mod fish;
pub mod fishing;
pub mod inventory;
pub mod session;
pub mod skill_check;
pub mod state;
pub mod sync;
pub mod tick;
pub mod timer;
pub mod viewer;

pub use cast::{CastController, LaunchImpulse, Ray, launch_impulse};
pub use effects::{Effect, EffectKind};
pub use fish::{FishAgent, NavigableWater, RadiusBoundary, TerrainDepth};
pub use fishing::{FishingContext, FishingPhase, FishingStateMachine};
pub use inventory::{FishKind, InventoryEntry, InventoryLedger, default_catalog};
pub use session::FishingSession;
pub use skill_check::{HitWindow, SkillCheck};
pub use state::{GameEvent, GameState};
pub use sync::{BodyTransform, SyncedEntity, VisualRole};
pub use tick::{TickInput, tick};
pub use timer::{Scheduler, TimerFired, TimerHandle, TimerRole};
pub use viewer::{MovementIntent, Viewer};
