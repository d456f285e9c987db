//! Short-lived visual effects (not gameplay-affecting)

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Expanding ring where the bobber hits the water
    Splash,
    /// Dark disc under the bobber
    Shadow,
    /// Burst at the bobber when a fish is landed
    CatchBurst,
}

impl EffectKind {
    /// Lifetime in seconds
    pub fn duration(&self) -> f32 {
        match self {
            EffectKind::Splash => 0.6,
            EffectKind::Shadow => 1.5,
            EffectKind::CatchBurst => 1.0,
        }
    }

    /// Radius at spawn and how fast it grows (units/second)
    fn radius_and_growth(&self) -> (f32, f32) {
        match self {
            EffectKind::Splash => (0.1, 2.0),
            EffectKind::Shadow => (0.35, 0.0),
            EffectKind::CatchBurst => (0.2, 3.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec3,
    /// 1 at spawn, 0 when expired
    pub life: f32,
    pub radius: f32,
}

impl Effect {
    pub fn new(kind: EffectKind, position: Vec3) -> Self {
        let (radius, _) = kind.radius_and_growth();
        Self {
            kind,
            position,
            life: 1.0,
            radius,
        }
    }
}

/// Maximum live effects; the oldest is dropped first
pub const MAX_EFFECTS: usize = 32;

pub fn spawn_effect(effects: &mut Vec<Effect>, kind: EffectKind, position: Vec3) {
    if effects.len() >= MAX_EFFECTS {
        effects.remove(0);
    }
    effects.push(Effect::new(kind, position));
}

/// Age every effect by `dt` and drop the expired ones
pub fn decay_effects(effects: &mut Vec<Effect>, dt: f32) {
    for effect in effects.iter_mut() {
        let (_, growth) = effect.kind.radius_and_growth();
        effect.life -= dt / effect.kind.duration();
        effect.radius += growth * dt;
    }
    effects.retain(|e| e.life > 0.0);
}
