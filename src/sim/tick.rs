//! Fixed timestep simulation tick
//!
//! Core game loop that advances the lake deterministically. Per tick:
//! input events → viewer → physics → fish → bobber checks → timers →
//! skill check dial → effects → render sync.

use glam::Vec2;

use super::cast::Ray;
use super::effects::decay_effects;
use super::fish::update_fish;
use super::state::GameState;
use super::sync::sync_all;
use super::viewer::MovementIntent;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cast along this pointer ray
    pub cast: Option<Ray>,
    /// Pull the bobber back to the rod
    pub reel_in: bool,
    /// Skill check confirm (click/space)
    pub confirm: bool,
    /// Held movement keys
    pub movement: MovementIntent,
    /// Mouse look delta since last tick
    pub look_delta: Vec2,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Reel-in first so a cast in the same tick starts a fresh session
    if input.reel_in {
        state.reel_in();
    }
    if let Some(ray) = input.cast {
        if let Err(err) = state.cast(ray) {
            log::debug!("Cast ignored: {}", err);
        }
    }
    if input.confirm {
        state.confirm();
    }

    state.viewer.apply(input.movement, input.look_delta, dt);

    state.physics.step(dt);

    update_fish(
        &mut state.fish,
        &mut state.physics,
        state.region.as_ref(),
        &state.settings.fish,
        &mut state.rng,
    );

    state.update_bobber();

    for fired in state.scheduler.advance(dt) {
        state.dispatch_timer(fired);
    }

    state.fishing.advance_skill_check(dt);

    decay_effects(&mut state.effects, dt);
    sync_all(&mut state.synced, &state.physics);
}
