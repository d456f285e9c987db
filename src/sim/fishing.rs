//! Fishing minigame state machine
//!
//! Idle → Cast → WaitingForBite → Active (skill check) → Resolved → Idle
//!
//! Inputs and timer fires may arrive in any order relative to ticks, so every
//! transition checks the current phase and the stored timer handle before
//! acting. Anything that doesn't fit the current phase is a no-op.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cast::{CastController, LaunchImpulse, Ray};
use super::effects::{Effect, EffectKind, spawn_effect};
use super::inventory::InventoryLedger;
use super::session::FishingSession;
use super::skill_check::{HitWindow, SkillCheck};
use super::state::GameEvent;
use super::timer::{Scheduler, TimerFired, TimerRole};
use super::viewer::Viewer;
use crate::error::FishingError;
use crate::physics::PhysicsWorld;
use crate::settings::{BiteSettings, Settings, SkillCheckSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishingPhase {
    /// Bobber hangs from the rod
    Idle,
    /// Bobber is flying toward the water
    Cast,
    /// Bobber is floating and trembling; bite timer armed
    WaitingForBite,
    /// Skill check dial is open; viewer input is locked
    Active,
    /// Catch decided; immediately followed by a recall to Idle
    Resolved,
}

/// Everything outside the state machine that a transition may touch
pub struct FishingContext<'a> {
    pub world: &'a mut PhysicsWorld,
    pub scheduler: &'a mut Scheduler,
    pub ledger: &'a mut InventoryLedger,
    pub viewer: &'a mut Viewer,
    pub events: &'a mut Vec<GameEvent>,
    pub effects: &'a mut Vec<Effect>,
    pub rng: &'a mut Pcg32,
}

#[derive(Debug, Clone)]
pub struct FishingStateMachine {
    phase: FishingPhase,
    session: FishingSession,
    cast: CastController,
    skill_check: Option<SkillCheck>,
    bite: BiteSettings,
    dial: SkillCheckSettings,
    water_level: f32,
}

impl FishingStateMachine {
    /// Create the bobber on the rod and start Idle
    pub fn new(world: &mut PhysicsWorld, rod_tip: Vec3, settings: &Settings) -> Self {
        Self {
            phase: FishingPhase::Idle,
            session: FishingSession::default(),
            cast: CastController::new(world, rod_tip, settings.cast.clone()),
            skill_check: None,
            bite: settings.bite.clone(),
            dial: settings.skill_check.clone(),
            water_level: settings.world.water_level,
        }
    }

    pub fn phase(&self) -> FishingPhase {
        self.phase
    }

    pub fn session(&self) -> &FishingSession {
        &self.session
    }

    pub fn cast_controller(&self) -> &CastController {
        &self.cast
    }

    /// Open skill check, if any (for drawing the dial)
    pub fn skill_check(&self) -> Option<&SkillCheck> {
        self.skill_check.as_ref()
    }

    pub fn skill_check_mut(&mut self) -> Option<&mut SkillCheck> {
        self.skill_check.as_mut()
    }

    fn set_phase(&mut self, phase: FishingPhase) {
        if self.phase != phase {
            log::debug!("Fishing phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Cast along a pointer ray. Rejected if already fishing or the ray misses the water.
    pub fn request_cast(&mut self, ctx: &mut FishingContext, ray: Ray) -> Result<LaunchImpulse, FishingError> {
        if self.phase != FishingPhase::Idle || self.session.is_fishing {
            return Err(FishingError::DoubleCastAttempt);
        }
        let target = ray
            .intersect_water(self.water_level)
            .ok_or(FishingError::InvalidCastTarget)?;
        let origin = ctx.viewer.rod_tip();
        if origin.distance(target) > self.cast.tuning().max_distance {
            return Err(FishingError::InvalidCastTarget);
        }

        // A new cast never inherits timers from the last session
        self.session.cancel_timers(ctx.scheduler);
        let launch = self.cast.cast(ctx.world, &mut self.session, origin, target)?;

        self.set_phase(FishingPhase::Cast);
        ctx.events.push(GameEvent::Cast { origin, target });
        log::info!("Cast toward ({:.1}, {:.1}), {:.1} units", target.x, target.z, launch.distance);
        Ok(launch)
    }

    /// Reel in from any phase after Cast. Safe to call with nothing pending.
    pub fn reel_in(&mut self, ctx: &mut FishingContext) {
        match self.phase {
            FishingPhase::Idle => {
                log::debug!("Reel-in ignored while idle");
            }
            FishingPhase::Cast | FishingPhase::WaitingForBite | FishingPhase::Active | FishingPhase::Resolved => {
                log::info!("Reeled in during {:?}", self.phase);
                self.finish(ctx);
                ctx.events.push(GameEvent::Recalled);
            }
        }
    }

    /// Player pressed confirm. Returns Some(success) if a skill check was resolved.
    pub fn confirm(&mut self, ctx: &mut FishingContext) -> Option<bool> {
        if self.phase != FishingPhase::Active {
            log::debug!("Confirm ignored in {:?}", self.phase);
            return None;
        }
        let check = self.skill_check.take()?;
        self.session.click_count += 1;
        let success = check.is_hit();
        self.set_phase(FishingPhase::Resolved);

        if success {
            self.land_fish(ctx);
        } else {
            log::info!("Missed at {:.0}°", check.angle_degrees());
            ctx.events.push(GameEvent::CatchMissed {
                angle_deg: check.angle_degrees(),
            });
        }

        self.finish(ctx);
        Some(success)
    }

    /// Credit a random species and announce it
    fn land_fish(&mut self, ctx: &mut FishingContext) {
        let catalog = ctx.ledger.catalog();
        if catalog.is_empty() {
            log::error!("Fish landed but the catalog is empty");
            return;
        }
        let kind = catalog[ctx.rng.random_range(0..catalog.len())].clone();

        match ctx.ledger.credit(&kind.key) {
            Ok(quantity) => {
                self.session.fish_caught = true;
                log::info!("Caught a {} (now {})", kind.display_name, quantity);
                ctx.events.push(GameEvent::FishCaught {
                    key: kind.key,
                    display_name: kind.display_name,
                    image_ref: kind.image_ref,
                    quantity,
                });
                if let Some(position) = self.cast.bobber_position(ctx.world) {
                    spawn_effect(ctx.effects, EffectKind::CatchBurst, position);
                }
            }
            Err(err) => {
                log::error!("Ledger rejected catalog fish: {}", err);
                debug_assert!(false, "catalog and ledger disagree: {err}");
            }
        }
    }

    /// Back to Idle: recall the bobber and hand input back to the viewer
    fn finish(&mut self, ctx: &mut FishingContext) {
        let rod_tip = ctx.viewer.rod_tip();
        self.cast.recall(ctx.world, &mut self.session, ctx.scheduler, rod_tip);
        self.skill_check = None;
        ctx.viewer.set_locked(false);
        self.set_phase(FishingPhase::Idle);
    }

    /// Per-tick bobber work: follow the rod tip, watch for the splash
    pub fn update_bobber(&mut self, ctx: &mut FishingContext) {
        self.cast.update_anchor(ctx.world, ctx.viewer.rod_tip());

        if self.phase == FishingPhase::Cast
            && self.cast.touches_water(ctx.world, &self.session, self.water_level)
        {
            self.begin_waiting(ctx);
        }
    }

    fn begin_waiting(&mut self, ctx: &mut FishingContext) {
        if let Some(position) = self.cast.bobber_position(ctx.world) {
            let surface = Vec3::new(position.x, self.water_level, position.z);
            spawn_effect(ctx.effects, EffectKind::Splash, surface);
            spawn_effect(ctx.effects, EffectKind::Shadow, surface);
            ctx.events.push(GameEvent::Splash { position: surface });
        }

        let tremble = ctx
            .scheduler
            .schedule_repeating(self.bite.tremble_interval, TimerRole::Tremble);
        self.session.arm(ctx.scheduler, TimerRole::Tremble, tremble);

        let delay = if self.bite.delay_max > self.bite.delay_min {
            ctx.rng.random_range(self.bite.delay_min..self.bite.delay_max)
        } else {
            self.bite.delay_min
        };
        let bite = ctx.scheduler.schedule_once(delay, TimerRole::Bite);
        self.session.arm(ctx.scheduler, TimerRole::Bite, bite);

        self.set_phase(FishingPhase::WaitingForBite);
        log::info!("Bobber in the water, bite in {:.1}s", delay);
    }

    /// Handle a scheduler fire. Fires that don't match the stored handle are stale.
    pub fn on_timer(&mut self, ctx: &mut FishingContext, fired: TimerFired) -> Result<(), FishingError> {
        if !self.session.owns(fired.role, fired.handle) {
            return Err(FishingError::StaleTimerFire);
        }

        match fired.role {
            TimerRole::Tremble => {
                if self.phase == FishingPhase::WaitingForBite {
                    self.cast.tremble(ctx.world, self.bite.tremble_amplitude, ctx.rng);
                }
            }
            TimerRole::Bite => {
                self.session.consume(TimerRole::Bite);
                if self.phase == FishingPhase::WaitingForBite {
                    self.open_skill_check(ctx);
                }
            }
        }
        Ok(())
    }

    fn open_skill_check(&mut self, ctx: &mut FishingContext) {
        self.session.cancel(ctx.scheduler, TimerRole::Tremble);
        let window = HitWindow::from_degrees(self.dial.window_low_deg, self.dial.window_high_deg);
        self.skill_check = Some(SkillCheck::new(self.dial.rate_deg_per_sec.to_radians(), window));
        ctx.viewer.set_locked(true);
        self.set_phase(FishingPhase::Active);
        ctx.events.push(GameEvent::SkillCheckOpened);
        log::info!("Fish on! Skill check open");
    }

    /// Sweep the dial indicator
    pub fn advance_skill_check(&mut self, dt: f32) {
        if let Some(check) = self.skill_check.as_mut() {
            check.advance(dt);
        }
    }
}
