use serde::{Deserialize, Serialize};

use lavaleap_core::schedule::FrameTimer;

use crate::config::ActorConfig;

/// Number of walk frames in the cycle.
pub const WALK_FRAMES: u8 = 5;
/// Number of jump frames.
pub const JUMP_FRAMES: u8 = 5;
/// Number of death frames before the animation completes.
pub const DEATH_FRAMES: u8 = 4;

/// Every sprite the actor can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Walk1,
    Walk2,
    Walk3,
    Walk4,
    Walk5,
    Jump1,
    Jump2,
    Jump3,
    Jump4,
    Jump5,
    Dead1,
    Dead2,
    Dead3,
    Dead4,
}

const WALK: [AnimationState; WALK_FRAMES as usize] = [
    AnimationState::Walk1,
    AnimationState::Walk2,
    AnimationState::Walk3,
    AnimationState::Walk4,
    AnimationState::Walk5,
];

const JUMP: [AnimationState; JUMP_FRAMES as usize] = [
    AnimationState::Jump1,
    AnimationState::Jump2,
    AnimationState::Jump3,
    AnimationState::Jump4,
    AnimationState::Jump5,
];

const DEAD: [AnimationState; DEATH_FRAMES as usize] = [
    AnimationState::Dead1,
    AnimationState::Dead2,
    AnimationState::Dead3,
    AnimationState::Dead4,
];

impl AnimationState {
    /// Walk state for a 1-based frame number.
    pub fn walk(frame: u8) -> Self {
        WALK[(frame.clamp(1, WALK_FRAMES) - 1) as usize]
    }

    pub fn jump(frame: u8) -> Self {
        JUMP[(frame.clamp(1, JUMP_FRAMES) - 1) as usize]
    }

    pub fn dead(frame: u8) -> Self {
        DEAD[(frame.clamp(1, DEATH_FRAMES) - 1) as usize]
    }

    pub fn is_dead(self) -> bool {
        DEAD.contains(&self)
    }

    pub fn sprite_key(self) -> &'static str {
        match self {
            AnimationState::Idle => "player/idle",
            AnimationState::Walk1 => "player/go1",
            AnimationState::Walk2 => "player/go2",
            AnimationState::Walk3 => "player/go3",
            AnimationState::Walk4 => "player/go4",
            AnimationState::Walk5 => "player/go5",
            AnimationState::Jump1 => "player/jump1",
            AnimationState::Jump2 => "player/jump2",
            AnimationState::Jump3 => "player/jump3",
            AnimationState::Jump4 => "player/jump4",
            AnimationState::Jump5 => "player/jump5",
            AnimationState::Dead1 => "player/dead1",
            AnimationState::Dead2 => "player/dead2",
            AnimationState::Dead3 => "player/dead3",
            AnimationState::Dead4 => "player/dead4",
        }
    }

    pub const ALL: [AnimationState; 15] = [
        AnimationState::Idle,
        AnimationState::Walk1,
        AnimationState::Walk2,
        AnimationState::Walk3,
        AnimationState::Walk4,
        AnimationState::Walk5,
        AnimationState::Jump1,
        AnimationState::Jump2,
        AnimationState::Jump3,
        AnimationState::Jump4,
        AnimationState::Jump5,
        AnimationState::Dead1,
        AnimationState::Dead2,
        AnimationState::Dead3,
        AnimationState::Dead4,
    ];
}

/// Which way the sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// `-1` for left, `1` for right.
    pub fn sign(self) -> i8 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// Facing for a horizontal velocity; `None` when standing still.
    pub fn from_velocity(vx: f32) -> Option<Facing> {
        if vx > 0.0 {
            Some(Facing::Right)
        } else if vx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Physics flags the state machine reads each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub vx: f32,
    pub vy: f32,
    pub on_surface: bool,
    pub is_jumping: bool,
    pub is_dead: bool,
}

/// Elapsed-time driven animation state machine for the actor.
#[derive(Debug, Clone)]
pub struct Animator {
    state: AnimationState,
    facing: Facing,
    walk_frame: u8,
    jump_frame: u8,
    death_frame: u8,
    death_complete: bool,
    walk_timer: FrameTimer,
    jump_timer: FrameTimer,
    death_timer: FrameTimer,
    airborne_threshold: f32,
    fast_fall_threshold: f32,
}

impl Animator {
    pub fn new(config: &ActorConfig) -> Self {
        Self {
            state: AnimationState::Idle,
            facing: Facing::Right,
            walk_frame: 1,
            jump_frame: 1,
            death_frame: 0,
            death_complete: false,
            walk_timer: FrameTimer::new(config.walk_frame_ms),
            jump_timer: FrameTimer::new(config.jump_frame_ms),
            death_timer: FrameTimer::new(config.death_frame_ms),
            airborne_threshold: config.airborne_threshold,
            fast_fall_threshold: config.fast_fall_threshold,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn jump_frame(&self) -> u8 {
        self.jump_frame
    }

    pub fn death_frame(&self) -> u8 {
        self.death_frame
    }

    pub fn is_death_complete(&self) -> bool {
        self.death_complete
    }

    pub fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Start a new jump from frame 1.
    pub fn start_jump(&mut self) {
        self.jump_frame = 1;
    }

    /// Begin the death sequence; the first frame shows on the next advance.
    pub fn start_death(&mut self) {
        self.death_frame = 0;
        self.death_complete = false;
        self.death_timer.arm();
    }

    /// Back to idle with all counters cleared.
    pub fn reset(&mut self) {
        self.state = AnimationState::Idle;
        self.walk_frame = 1;
        self.jump_frame = 1;
        self.death_frame = 0;
        self.death_complete = false;
        self.walk_timer.arm();
        self.jump_timer.arm();
        self.death_timer.arm();
    }

    /// Advance the state machine for the current frame.
    pub fn advance(&mut self, now_ms: f64, motion: Motion) {
        if motion.is_dead {
            if !self.death_complete && self.death_timer.ready(now_ms) {
                self.death_frame += 1;
                if self.death_frame <= DEATH_FRAMES {
                    self.state = AnimationState::dead(self.death_frame);
                } else {
                    self.death_frame = DEATH_FRAMES;
                    self.death_complete = true;
                }
            }
            return;
        }

        if motion.vx.abs() > 0.0 && motion.on_surface {
            self.jump_frame = 1;
            if self.walk_timer.ready(now_ms) {
                self.walk_frame = self.walk_frame % WALK_FRAMES + 1;
                self.state = AnimationState::walk(self.walk_frame);
                if let Some(facing) = Facing::from_velocity(motion.vx) {
                    self.facing = facing;
                }
            }
        } else if motion.is_jumping || motion.vy > self.airborne_threshold {
            if self.jump_timer.ready(now_ms) {
                self.jump_frame = next_jump_frame(
                    self.jump_frame,
                    motion.vy,
                    self.airborne_threshold,
                    self.fast_fall_threshold,
                );
                self.state = AnimationState::jump(self.jump_frame);
            }
        } else {
            self.jump_frame = 1;
            self.state = AnimationState::Idle;
        }
    }
}

/// Pick the next jump frame from vertical velocity (positive = falling).
///
/// Ascending steps through frames 1..3, the apex band holds 3, falling shows
/// 4 and fast falling 5. The result never goes below `current`.
pub fn next_jump_frame(current: u8, vy: f32, apex_band: f32, fast_fall: f32) -> u8 {
    let target = if vy < 0.0 && current < 3 {
        current + 1
    } else if vy.abs() < apex_band {
        3
    } else if vy > fast_fall {
        5
    } else if vy > apex_band {
        4
    } else {
        current
    };
    target.max(current).min(JUMP_FRAMES)
}
