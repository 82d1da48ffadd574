use serde::{Deserialize, Serialize};

/// Downward acceleration per scaled time unit.
pub const GRAVITY: f32 = 0.31;
/// Velocity multiplier applied on floor contact (negative = damped rebound).
pub const BOUNCE: f32 = -0.5;
/// Horizontal velocity multiplier applied when landing on a platform.
pub const FRICTION: f32 = 0.93;
/// Below this horizontal speed friction snaps velocity to zero.
pub const FRICTION_EPSILON: f32 = 0.001;
/// Upward speed set by a jump.
pub const JUMP_IMPULSE: f32 = 8.0;
/// Fixed per-frame horizontal slowdown while grounded without input.
pub const IDLE_DECELERATION: f32 = 0.4;
/// Milliseconds per scaled physics time unit.
pub const DELTA_SCALE_MS: f32 = 20.0;
/// Divisor applied to gravity each integration step.
pub const GRAVITY_DAMPING: f32 = 1.2;
/// Horizontal speed set while a direction key is held.
pub const MOVE_SPEED: f32 = 5.0;
/// Actor collision radius.
pub const ACTOR_RADIUS: f32 = 30.0;
/// Default tile edge length in pixels.
pub const TILE_SIZE: f32 = 40.0;

/// Physics and animation parameters for the actor, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub radius: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub gravity: f32,
    pub bounce: f32,
    pub friction: f32,
    pub friction_epsilon: f32,
    pub jump_impulse: f32,
    pub move_speed: f32,
    pub idle_deceleration: f32,
    pub delta_scale_ms: f32,
    pub gravity_damping: f32,
    /// Vertical speed above which a falling actor counts as airborne.
    pub airborne_threshold: f32,
    /// Vertical speed above which the fast-fall jump frame is shown.
    pub fast_fall_threshold: f32,
    pub walk_frame_ms: f64,
    pub jump_frame_ms: f64,
    pub death_frame_ms: f64,
    /// Spawn x, measured from the left edge of the viewport.
    pub spawn_x: f32,
    /// Spawn height above the floor (viewport bottom).
    pub spawn_floor_offset: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            radius: ACTOR_RADIUS,
            sprite_width: 64.0,
            sprite_height: 64.0,
            gravity: GRAVITY,
            bounce: BOUNCE,
            friction: FRICTION,
            friction_epsilon: FRICTION_EPSILON,
            jump_impulse: JUMP_IMPULSE,
            move_speed: MOVE_SPEED,
            idle_deceleration: IDLE_DECELERATION,
            delta_scale_ms: DELTA_SCALE_MS,
            gravity_damping: GRAVITY_DAMPING,
            airborne_threshold: 2.0,
            fast_fall_threshold: 5.0,
            walk_frame_ms: 150.0,
            jump_frame_ms: 100.0,
            death_frame_ms: 150.0,
            spawn_x: 100.0,
            spawn_floor_offset: 200.0,
        }
    }
}

/// Map generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_size: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
        }
    }
}

/// Coin sprite cycling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub frame_ms: f64,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self { frame_ms: 120.0 }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub actor: ActorConfig,
    pub map: MapConfig,
    pub coin: CoinConfig,
    /// Respawn automatically once the death animation has played out.
    pub auto_respawn: bool,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            actor: ActorConfig::default(),
            map: MapConfig::default(),
            coin: CoinConfig::default(),
            auto_respawn: true,
        }
    }
}

impl PlatformerConfig {
    /// Load config from `$LAVALEAP_CONFIG` or `config/lavaleap.toml`. Falls back
    /// to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("LAVALEAP_CONFIG")
            .unwrap_or_else(|_| "config/lavaleap.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_or_default(&content, &path),
            Err(_) => {
                tracing::debug!("No config at {path}, using defaults");
                PlatformerConfig::default()
            },
        }
    }

    fn from_toml_or_default(content: &str, origin: &str) -> Self {
        match toml::from_str::<PlatformerConfig>(content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse {origin}: {e}, using defaults");
                PlatformerConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = PlatformerConfig::from_toml_or_default(
            "[actor]\ngravity = 0.5\n[map]\ntile_size = 32.0\n",
            "test",
        );
        assert_eq!(cfg.actor.gravity, 0.5);
        assert_eq!(cfg.actor.bounce, BOUNCE);
        assert_eq!(cfg.map.tile_size, 32.0);
        assert_eq!(cfg.coin.frame_ms, 120.0);
        assert!(cfg.auto_respawn);
    }

    #[test]
    fn malformed_toml_falls_back() {
        let cfg = PlatformerConfig::from_toml_or_default("actor = [", "test");
        assert_eq!(cfg.actor.radius, ACTOR_RADIUS);
        assert_eq!(cfg.map.tile_size, TILE_SIZE);
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let mut cfg = PlatformerConfig::default();
        cfg.actor.jump_impulse = 11.0;
        cfg.auto_respawn = false;
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PlatformerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.actor.jump_impulse, 11.0);
        assert!(!back.auto_respawn);
    }

    #[test]
    fn defaults_match_reference_tuning() {
        let a = ActorConfig::default();
        assert_eq!(a.walk_frame_ms, 150.0);
        assert_eq!(a.jump_frame_ms, 100.0);
        assert_eq!(a.death_frame_ms, 150.0);
        assert_eq!(a.friction, 0.93);
        assert_eq!(a.idle_deceleration, 0.4);
    }
}
