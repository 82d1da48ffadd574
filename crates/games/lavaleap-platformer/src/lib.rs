pub mod actor;
pub mod animation;
pub mod cell;
pub mod config;
pub mod levels;
pub mod map_gen;
pub mod vector;

use serde::{Deserialize, Serialize};

use lavaleap_core::assets::AssetStore;
use lavaleap_core::input::InputState;
use lavaleap_core::schedule::FrameTimer;
use lavaleap_core::simulation::Simulation;
use lavaleap_core::snapshot::{self, EncodeError};
use lavaleap_core::surface::DrawSurface;

use actor::{Actor, ActorSnapshot, UpdateOutcome, Viewport};
use cell::Drawable;
use config::PlatformerConfig;
use levels::LevelFile;
use map_gen::{LevelMap, MapError, MapGenerator};

/// Things that happened during a level update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    CoinCollected { score: u32, remaining: usize },
    LevelPassed { score: u32 },
    ActorDied { x: f32, y: f32 },
    Respawned,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub level: String,
    pub score: u32,
    pub coins_left: usize,
    pub coin_frame: u8,
    pub passed: bool,
    pub paused: bool,
    pub actor: ActorSnapshot,
}

/// One playable level: the generated map, the actor, and the score.
pub struct Level {
    name: String,
    generator: MapGenerator,
    map: LevelMap,
    actor: Actor,
    auto_respawn: bool,
    coin_timer: FrameTimer,
    coin_frame: u8,
    score: u32,
    deaths: u32,
    passed: bool,
    paused: bool,
    debug: bool,
}

impl Level {
    /// Build the map for `surface` and spawn the actor.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        schema: &[S],
        config: &PlatformerConfig,
        surface: &mut dyn DrawSurface,
        assets: &dyn AssetStore,
    ) -> Result<Self, MapError> {
        let name = name.into();
        let generator = MapGenerator::new(schema, config.map.tile_size);
        let map = generator.generate_map(surface, assets)?;
        let actor = Actor::new(config.actor.clone(), Viewport::of(surface));
        tracing::info!(
            level = %name,
            coins = map.collectibles.len(),
            "Level started"
        );
        Ok(Self {
            name,
            generator,
            map,
            actor,
            auto_respawn: config.auto_respawn,
            coin_timer: FrameTimer::new(config.coin.frame_ms),
            coin_frame: 0,
            score: 0,
            deaths: 0,
            passed: false,
            paused: false,
            debug: false,
        })
    }

    pub fn from_file(
        file: &LevelFile,
        config: &PlatformerConfig,
        surface: &mut dyn DrawSurface,
        assets: &dyn AssetStore,
    ) -> Result<Self, MapError> {
        Self::new(file.name.clone(), &file.rows, config, surface, assets)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn map(&self) -> &LevelMap {
        &self.map
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggle the hitbox overlay.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Feed this frame's input to the actor. Ignored while paused.
    pub fn apply_input(&mut self, input: &InputState) {
        if self.paused || self.passed {
            return;
        }
        self.actor.apply_input(input);
    }

    /// Rebuild the map against the current surface size and respawn.
    pub fn restart(
        &mut self,
        surface: &mut dyn DrawSurface,
        assets: &dyn AssetStore,
    ) -> Result<(), MapError> {
        self.map = self.generator.generate_map(surface, assets)?;
        self.actor.set_viewport(Viewport::of(surface));
        self.actor.reset_position();
        self.score = 0;
        self.passed = false;
        self.coin_frame = 0;
        self.coin_timer.arm();
        tracing::info!(level = %self.name, "Level restarted");
        Ok(())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            level: self.name.clone(),
            score: self.score,
            coins_left: self.map.collectibles.len(),
            coin_frame: self.coin_frame,
            passed: self.passed,
            paused: self.paused,
            actor: self.actor.snapshot(),
        }
    }

    /// MessagePack-encoded [`FrameSnapshot`].
    pub fn encode_snapshot(&self) -> Result<Vec<u8>, EncodeError> {
        snapshot::encode(&self.snapshot())
    }

    fn animate_coins(&mut self, now_ms: f64) {
        if !self.coin_timer.ready(now_ms) {
            return;
        }
        self.coin_frame = (self.coin_frame + 1) % cell::COIN_FRAMES;
        for coin in &mut self.map.collectibles {
            coin.advance_frame();
        }
    }

    fn collect(&mut self, index: usize, events: &mut Vec<LevelEvent>) {
        if index >= self.map.collectibles.len() {
            return;
        }
        self.map.collectibles.remove(index);
        self.score += 1;
        let remaining = self.map.collectibles.len();
        tracing::debug!(score = self.score, remaining, "Coin collected");
        events.push(LevelEvent::CoinCollected {
            score: self.score,
            remaining,
        });
        if remaining == 0 {
            self.passed = true;
            tracing::info!(level = %self.name, score = self.score, "Level passed");
            events.push(LevelEvent::LevelPassed { score: self.score });
        }
    }
}

impl Simulation for Level {
    type Event = LevelEvent;

    fn update(&mut self, now_ms: f64, delta_ms: f32) -> Vec<LevelEvent> {
        if self.paused || self.passed {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.animate_coins(now_ms);

        let outcome = self.actor.update(
            &self.map.platforms,
            &self.map.hazards,
            &self.map.collectibles,
            delta_ms,
        );
        match outcome {
            UpdateOutcome::Died => {
                self.deaths += 1;
                let (x, y) = self.actor.position();
                tracing::info!(level = %self.name, x, y, deaths = self.deaths, "Actor died");
                events.push(LevelEvent::ActorDied { x, y });
            },
            UpdateOutcome::Collected(index) => self.collect(index, &mut events),
            UpdateOutcome::Moved | UpdateOutcome::Dead => {},
        }

        self.actor.animate(now_ms);

        if self.auto_respawn && self.actor.is_dead() && self.actor.is_death_animation_finished() {
            self.actor.reset_position();
            tracing::debug!(level = %self.name, "Actor respawned");
            events.push(LevelEvent::Respawned);
        }

        events
    }

    fn render(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetStore) {
        surface.clear();
        for cell in self.map.cells() {
            cell.draw(surface, assets);
        }
        self.actor.draw(surface, assets);
        if self.debug {
            self.actor.draw_debug(surface);
        }
    }
}
