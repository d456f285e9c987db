//! Game settings and tuning
//!
//! Loaded from a JSON file; any missing field falls back to its default so
//! partial files stay valid.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::inventory::{FishKind, default_catalog};
use crate::sim::skill_check::HitWindow;

/// World physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub gravity: Vec3,
    pub water_level: f32,
    /// Fraction of velocity lost per second when fully submerged
    pub water_drag: f32,
    /// Ground plane height for props
    pub ground_level: f32,
    /// Physics ticks per second
    pub tick_rate: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            water_level: WATER_LEVEL,
            water_drag: 0.9,
            ground_level: WATER_LEVEL - 3.0,
            tick_rate: 1.0 / SIM_DT,
        }
    }
}

/// Bobber, rod and cast impulse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CastSettings {
    pub horizontal_factor: f32,
    pub vertical_factor: f32,
    pub vertical_min: f32,
    pub vertical_max: f32,
    /// Casts farther than this are rejected like a miss
    pub max_distance: f32,
    pub bobber_radius: f32,
    pub bobber_mass: f32,
    /// Rod constraint pivot on the anchor body
    pub anchor_offset: Vec3,
    /// Rod tip in camera space
    pub rod_offset: Vec3,
}

impl Default for CastSettings {
    fn default() -> Self {
        Self {
            horizontal_factor: CAST_HORIZONTAL_FACTOR,
            vertical_factor: CAST_VERTICAL_FACTOR,
            vertical_min: CAST_VERTICAL_MIN,
            vertical_max: CAST_VERTICAL_MAX,
            max_distance: 100.0,
            bobber_radius: BOBBER_RADIUS,
            bobber_mass: BOBBER_MASS,
            anchor_offset: ROD_ANCHOR_OFFSET,
            rod_offset: ROD_TIP_OFFSET,
        }
    }
}

/// Waiting for a bite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiteSettings {
    /// Bite delay is uniform in [min, max) seconds
    pub delay_min: f32,
    pub delay_max: f32,
    pub tremble_interval: f32,
    /// Max jitter per axis
    pub tremble_amplitude: f32,
}

impl Default for BiteSettings {
    fn default() -> Self {
        Self {
            delay_min: BITE_DELAY_MIN,
            delay_max: BITE_DELAY_MAX,
            tremble_interval: TREMBLE_INTERVAL,
            tremble_amplitude: TREMBLE_AMPLITUDE,
        }
    }
}

/// Skill check dial (degrees)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCheckSettings {
    pub window_low_deg: f32,
    pub window_high_deg: f32,
    pub rate_deg_per_sec: f32,
}

impl Default for SkillCheckSettings {
    fn default() -> Self {
        Self {
            window_low_deg: HIT_WINDOW_LOW_DEG,
            window_high_deg: HIT_WINDOW_HIGH_DEG,
            rate_deg_per_sec: INDICATOR_RATE_DEG,
        }
    }
}

/// Fish wandering and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishSettings {
    pub count: usize,
    /// Velocity added along the wander target each tick
    pub wander_accel: f32,
    /// Horizontal velocity components are clamped to [-max, max]
    pub max_speed: f32,
    /// Per-tick chance of picking a new wander target
    pub resample_chance: f64,
    /// Speed when heading back into the lake
    pub return_speed: f32,
    pub lake_radius: f32,
    pub spawn_extent: f32,
    pub min_spawn_distance: f32,
    pub depth: f32,
}

impl Default for FishSettings {
    fn default() -> Self {
        Self {
            count: FISH_COUNT,
            wander_accel: FISH_WANDER_ACCEL,
            max_speed: FISH_MAX_SPEED,
            resample_chance: FISH_RESAMPLE_CHANCE,
            return_speed: FISH_RETURN_SPEED,
            lake_radius: LAKE_RADIUS,
            spawn_extent: FISH_SPAWN_EXTENT,
            min_spawn_distance: FISH_MIN_SPAWN_DISTANCE,
            depth: FISH_DEPTH,
        }
    }
}

/// First-person viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub start_position: Vec3,
    pub walk_speed: f32,
    pub look_sensitivity: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 2.0, 0.0),
            walk_speed: 4.0,
            look_sensitivity: 0.002,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldSettings,
    pub cast: CastSettings,
    pub bite: BiteSettings,
    pub skill_check: SkillCheckSettings,
    pub fish: FishSettings,
    pub viewer: ViewerSettings,
    /// Catchable species (empty means the built-in four)
    pub catalog: Vec<FishKind>,
}

impl Settings {
    /// Catalog to use, falling back to the built-in species
    pub fn effective_catalog(&self) -> Vec<FishKind> {
        if self.catalog.is_empty() {
            default_catalog()
        } else {
            self.catalog.clone()
        }
    }

    /// Fixed timestep derived from the tick rate
    pub fn sim_dt(&self) -> f32 {
        if self.world.tick_rate > 0.0 {
            1.0 / self.world.tick_rate
        } else {
            SIM_DT
        }
    }

    /// Reject tuning the simulation can't run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if !(self.world.tick_rate > 0.0) {
            return invalid("world.tick_rate must be positive");
        }
        if !(self.bite.delay_min >= 0.0 && self.bite.delay_min < self.bite.delay_max) {
            return invalid("bite delay range must satisfy 0 <= delay_min < delay_max");
        }
        if !(self.bite.tremble_interval > 0.0) {
            return invalid("bite.tremble_interval must be positive");
        }
        if self.cast.vertical_min > self.cast.vertical_max {
            return invalid("cast.vertical_min must not exceed cast.vertical_max");
        }
        if !(self.cast.bobber_mass > 0.0 && self.cast.bobber_radius > 0.0) {
            return invalid("bobber mass and radius must be positive");
        }
        let (low, high) = (self.skill_check.window_low_deg, self.skill_check.window_high_deg);
        let window = HitWindow::from_degrees(low, high);
        // Ends that wrap onto each other leave nothing to hit
        if (high - low).abs() >= 360.0 || window.low == window.high {
            return invalid("skill check window must span more than 0° and less than 360°");
        }
        if !(0.0..=1.0).contains(&self.fish.resample_chance) {
            return invalid("fish.resample_chance must be within [0, 1]");
        }
        if self.fish.min_spawn_distance < 0.0 || self.fish.spawn_extent <= 0.0 {
            return invalid("fish spawn extent must be positive and min distance non-negative");
        }

        let mut keys: Vec<&str> = self.catalog.iter().map(|k| k.key.as_str()).collect();
        keys.sort_unstable();
        if keys.windows(2).any(|w| w[0] == w[1]) {
            return invalid("catalog keys must be unique");
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
