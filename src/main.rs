//! Lakeside entry point
//!
//! Headless native driver: runs the fixed-step loop against a scripted angler
//! and logs what happens. Usage: `lakeside [seed] [settings.json]`

use glam::Vec3;

use lakeside::Settings;
use lakeside::consts::MAX_SUBSTEPS;
use lakeside::sim::{FishingPhase, GameEvent, GameState, Ray, TickInput, tick};

/// Casts the angler tries before going home
const CASTS: u32 = 5;
/// Wall-clock seconds of simulated play per cast before giving up
const CAST_TIMEOUT: f32 = 20.0;
/// Pretend frame time fed to the accumulator
const FRAME_DT: f32 = 1.0 / 45.0;

/// Drives `tick` with a fixed-step accumulator, like a render loop would
struct Session {
    state: GameState,
    accumulator: f32,
    /// Fixed step from `world.tick_rate`
    dt: f32,
    input: TickInput,
}

impl Session {
    fn new(state: GameState) -> Self {
        let dt = state.settings.sim_dt();
        Self {
            state,
            accumulator: 0.0,
            dt,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, frame_dt: f32) {
        let dt = frame_dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, self.dt);
            self.accumulator -= self.dt;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.cast = None;
            self.input.reel_in = false;
            self.input.confirm = false;
        }

        for event in self.state.drain_events() {
            report(&event);
        }
    }

    /// Aim down at the lake a little in front of the viewer and cast
    fn cast(&mut self, reach: f32) {
        let eye = self.state.viewer.position;
        let forward = self.state.viewer.forward();
        let target = Vec3::new(eye.x + forward.x * reach, 0.0, eye.z + forward.z * reach);
        self.input.cast = Some(Ray::new(eye, target - eye));
    }

    /// Press confirm once the dial sweeps into the hit window
    fn watch_dial(&mut self) {
        if let Some(check) = self.state.skill_check() {
            if check.is_hit() {
                self.input.confirm = true;
            }
        }
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::Cast { target, .. } => log::info!("Line out toward ({:.1}, {:.1})", target.x, target.z),
        GameEvent::Splash { .. } => log::info!("Plop. Waiting for a bite..."),
        GameEvent::SkillCheckOpened => log::info!("Something's biting!"),
        GameEvent::FishCaught {
            display_name, quantity, ..
        } => log::info!("Landed a {} ({} so far)", display_name, quantity),
        GameEvent::CatchMissed { angle_deg } => log::info!("It got away ({:.0}°)", angle_deg),
        GameEvent::Recalled => log::info!("Reeled in"),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x1a4e_51de);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    log::info!("Lakeside (native) starting with seed {}", seed);

    let mut state = GameState::with_settings(seed, settings);
    state.spawn_prop(Vec3::new(-6.0, 0.0, 4.0), Vec3::new(0.5, 3.0, 0.5));
    state.spawn_prop(Vec3::new(5.0, 0.0, 6.0), Vec3::new(0.4, 0.9, 0.4));
    let mut session = Session::new(state);

    let frames_per_cast = (CAST_TIMEOUT / FRAME_DT) as u32;
    for attempt in 0..CASTS {
        session.cast(12.0 + attempt as f32 * 3.0);
        for _ in 0..frames_per_cast {
            session.watch_dial();
            session.update(FRAME_DT);
            if session.state.phase() == FishingPhase::Idle && session.input.cast.is_none() {
                break;
            }
        }
        if session.state.phase() != FishingPhase::Idle {
            session.input.reel_in = true;
            session.update(FRAME_DT);
        }
    }

    log::info!("Done after {} ticks", session.state.time_ticks);
    for entry in session.state.inventory() {
        println!("{:<14} {:>3}", entry.display_name, entry.quantity);
    }
}
