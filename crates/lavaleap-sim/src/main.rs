use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use lavaleap_core::assets::{AssetRegistry, SpriteHandle};
use lavaleap_core::input::{Action, InputState};
use lavaleap_core::schedule::{FrameLoop, NOMINAL_FRAME_MS};
use lavaleap_core::snapshot::snapshot_channel;
use lavaleap_core::surface::RecordingSurface;

use lavaleap_platformer::animation::AnimationState;
use lavaleap_platformer::cell::{COIN_FRAMES, CellKind};
use lavaleap_platformer::config::PlatformerConfig;
use lavaleap_platformer::levels;
use lavaleap_platformer::{Level, LevelEvent};

struct Args {
    frames: u64,
    level: String,
    width: f32,
    height: f32,
    load_frames: u64,
    debug: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        frames: 600,
        level: "first-steps".to_string(),
        width: 800.0,
        height: 600.0,
        load_frames: 30,
        debug: false,
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--frames=") {
            args.frames = v.parse().unwrap_or(args.frames);
        } else if let Some(v) = arg.strip_prefix("--level=") {
            args.level = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--width=") {
            args.width = v.parse().unwrap_or(args.width);
        } else if let Some(v) = arg.strip_prefix("--height=") {
            args.height = v.parse().unwrap_or(args.height);
        } else if let Some(v) = arg.strip_prefix("--load-frames=") {
            args.load_frames = v.parse().unwrap_or(args.load_frames);
        } else if arg == "--debug" {
            args.debug = true;
        } else {
            tracing::warn!("Ignoring unknown argument {arg}");
        }
    }
    args
}

/// Every sprite key the level can ask for.
fn sprite_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = AnimationState::ALL.iter().map(|s| s.sprite_key()).collect();
    for kind in [CellKind::Ground, CellKind::Lava, CellKind::Platform] {
        keys.push(kind.sprite_key(0));
    }
    for frame in 0..COIN_FRAMES {
        keys.push(CellKind::Coin.sprite_key(frame));
    }
    keys
}

/// Run right, hop periodically, and turn back for a stretch.
fn scripted_input(frame: u64) -> InputState {
    let mut input = InputState::default();
    let leg = frame % 240;
    input.set(Action::MoveRight, leg < 150);
    input.set(Action::MoveLeft, (180..220).contains(&leg));
    input.set(Action::Jump, frame % 45 == 0);
    input
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args();
    let config = PlatformerConfig::load();

    let file = match levels::resolve(&args.level) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Cannot load level {}: {e}", args.level);
            return ExitCode::FAILURE;
        },
    };

    let mut surface = RecordingSurface::new(args.width, args.height);
    let mut assets = AssetRegistry::new();
    let keys = sprite_keys();
    for key in &keys {
        assets.register(*key);
    }

    let mut level = match Level::from_file(&file, &config, &mut surface, &assets) {
        Ok(level) => level,
        Err(e) => {
            tracing::error!("Cannot build level {}: {e}", file.name);
            return ExitCode::FAILURE;
        },
    };
    level.set_debug(args.debug);

    let (mut writer, reader) = snapshot_channel(level.snapshot());
    let mut frame_loop = FrameLoop::new();
    let handle = frame_loop.handle();
    let mut now = 0.0f64;
    let mut draw_calls = 0usize;

    for frame in 0..args.frames {
        if frame == args.load_frames {
            for (i, key) in keys.iter().enumerate() {
                assets.mark_ready(*key, SpriteHandle(i as u32));
            }
            tracing::debug!(sprites = keys.len(), "Sprites ready");
        }

        level.apply_input(&scripted_input(frame));
        let Some(events) = frame_loop.tick(now, &mut level, &mut surface, &assets) else {
            break;
        };
        draw_calls += surface.take_commands().len();

        for event in events {
            match event {
                LevelEvent::CoinCollected { score, remaining } => {
                    tracing::info!(frame, score, remaining, "Coin collected");
                },
                LevelEvent::ActorDied { x, y } => {
                    tracing::info!(frame, x, y, "Actor died");
                },
                LevelEvent::Respawned => tracing::info!(frame, "Respawned"),
                LevelEvent::LevelPassed { score } => {
                    tracing::info!(frame, score, "Level passed");
                    handle.cancel();
                },
            }
        }
        writer.publish(level.snapshot());
        now += f64::from(NOMINAL_FRAME_MS);
    }

    let latest = reader.latest();
    let encoded = match level.encode_snapshot() {
        Ok(bytes) => bytes.len(),
        Err(e) => {
            tracing::error!("Failed to encode snapshot: {e}");
            return ExitCode::FAILURE;
        },
    };
    tracing::info!(
        level = %latest.value.level,
        frames = frame_loop.frames(),
        published = latest.frame,
        score = latest.value.score,
        coins_left = latest.value.coins_left,
        deaths = level.deaths(),
        draw_calls,
        snapshot_bytes = encoded,
        "Simulation finished"
    );
    ExitCode::SUCCESS
}
