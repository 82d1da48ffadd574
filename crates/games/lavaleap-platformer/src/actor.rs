use serde::{Deserialize, Serialize};

use lavaleap_core::assets::AssetStore;
use lavaleap_core::color::Color;
use lavaleap_core::input::InputState;
use lavaleap_core::surface::DrawSurface;

use crate::animation::{AnimationState, Animator, Facing, Motion};
use crate::cell::{Cell, Drawable};
use crate::config::ActorConfig;
use crate::vector::Vector2;

/// Size of the play area; the bottom edge is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn of(surface: &dyn DrawSurface) -> Self {
        Self::new(surface.width(), surface.height())
    }
}

/// What happened during one [`Actor::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Normal integration and collision resolution ran.
    Moved,
    /// The actor touched a hazard this frame.
    Died,
    /// The actor was already dead; nothing moved.
    Dead,
    /// The actor touched the collectible at this index; nothing moved.
    Collected(usize),
}

/// The player-controlled circle.
#[derive(Debug, Clone)]
pub struct Actor {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) velocity: Vector2,
    pub(crate) radius: f32,
    pub(crate) is_jumping: bool,
    pub(crate) on_surface: bool,
    pub(crate) is_dead: bool,
    /// A horizontal key is held this frame.
    pub(crate) steering: bool,
    viewport: Viewport,
    config: ActorConfig,
    animator: Animator,
}

impl Actor {
    /// Create an actor at the spawn point of `viewport`.
    pub fn new(config: ActorConfig, viewport: Viewport) -> Self {
        assert!(
            config.radius > 0.0,
            "actor radius must be positive, got {}",
            config.radius
        );
        assert!(
            config.delta_scale_ms > 0.0 && config.gravity_damping > 0.0,
            "time scale and gravity damping must be positive"
        );
        let mut actor = Self {
            x: 0.0,
            y: 0.0,
            velocity: Vector2::ZERO,
            radius: config.radius,
            is_jumping: false,
            on_surface: false,
            is_dead: false,
            steering: false,
            viewport,
            animator: Animator::new(&config),
            config,
        };
        actor.reset_position();
        actor
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Move the actor without touching velocity or state.
    pub fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn velocity_x(&self) -> f32 {
        self.velocity.x
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn on_solid_surface(&self) -> bool {
        self.on_surface
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_death_animation_finished(&self) -> bool {
        self.animator.is_death_complete()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animator.state()
    }

    pub fn facing(&self) -> Facing {
        self.animator.facing()
    }

    /// `-1` facing left, `1` facing right.
    pub fn direction(&self) -> i8 {
        self.animator.facing().sign()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn set_velocity_x(&mut self, vx: f32) {
        let vx = if vx.is_finite() { vx } else { 0.0 };
        self.velocity.x = vx;
        if let Some(facing) = Facing::from_velocity(vx) {
            self.animator.face(facing);
        }
    }

    /// Mark whether a horizontal key is held. Idle deceleration only applies
    /// while it is not.
    pub fn set_steering(&mut self, steering: bool) {
        self.steering = steering;
    }

    /// Map the logical input state onto velocity and jump intent.
    pub fn apply_input(&mut self, input: &InputState) {
        if self.is_dead {
            return;
        }
        self.steering = input.steering();
        let axis = input.horizontal_axis();
        if axis != 0.0 {
            self.set_velocity_x(axis * self.config.move_speed);
        }
        if input.jump {
            self.jump();
        }
    }

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.on_surface || self.is_dead {
            return false;
        }
        self.velocity.y = -self.config.jump_impulse;
        self.is_jumping = true;
        self.on_surface = false;
        self.animator.start_jump();
        true
    }

    /// Back to the spawn point with a fresh life.
    pub fn reset_position(&mut self) {
        self.x = self.config.spawn_x;
        self.y = self.viewport.height - self.config.spawn_floor_offset;
        self.velocity = Vector2::ZERO;
        self.is_jumping = false;
        self.on_surface = false;
        self.is_dead = false;
        self.animator.reset();
    }

    /// Advance physics by `delta_ms` against the level's cells.
    pub fn update(
        &mut self,
        platforms: &[Cell],
        hazards: &[Cell],
        collectibles: &[Cell],
        delta_ms: f32,
    ) -> UpdateOutcome {
        if self.is_dead {
            return UpdateOutcome::Dead;
        }

        if hazards
            .iter()
            .any(|h| h.rect.touches_circle(self.x, self.y, self.radius))
        {
            self.is_dead = true;
            self.animator.start_death();
            self.settle_on_platforms(platforms);
            tracing::debug!(x = self.x, y = self.y, "Actor touched a hazard");
            return UpdateOutcome::Died;
        }

        if let Some(index) = collectibles
            .iter()
            .position(|c| c.rect.center_within(self.x, self.y, self.radius))
        {
            return UpdateOutcome::Collected(index);
        }

        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            0.0
        };
        let ds = delta_ms / self.config.delta_scale_ms;

        self.velocity.add(Vector2::new(
            0.0,
            self.config.gravity * ds / self.config.gravity_damping,
        ));

        let prev_x = self.x;
        let prev_y = self.y;
        let mut step = self.velocity;
        step.scale(ds);
        self.x += step.x;
        self.y += step.y;

        self.on_surface = false;
        self.resolve_platforms(platforms, prev_x, prev_y);
        self.contain();
        self.decelerate_idle();

        UpdateOutcome::Moved
    }

    /// Advance the animation state machine.
    pub fn animate(&mut self, now_ms: f64) {
        let motion = Motion {
            vx: self.velocity.x,
            vy: self.velocity.y,
            on_surface: self.on_surface,
            is_jumping: self.is_jumping,
            is_dead: self.is_dead,
        };
        self.animator.advance(now_ms, motion);
    }

    /// Snap-only pass used when dying: rest on any overlapping platform whose
    /// top is below the actor's top. Velocity is left untouched.
    fn settle_on_platforms(&mut self, platforms: &[Cell]) {
        for platform in platforms.iter().filter(|p| p.kind.is_solid()) {
            let r = &platform.rect;
            if r.overlaps_circle_bounds(self.x, self.y, self.radius)
                && self.y - self.radius <= r.top()
            {
                self.y = r.top() - self.radius;
                self.on_surface = true;
            }
        }
    }

    /// Resolve overlaps with solid cells, inferring the approach side from
    /// the position before integration.
    fn resolve_platforms(&mut self, platforms: &[Cell], prev_x: f32, prev_y: f32) {
        let radius = self.radius;
        for platform in platforms.iter().filter(|p| p.kind.is_solid()) {
            let r = &platform.rect;
            if !r.overlaps_circle_bounds(self.x, self.y, radius) {
                continue;
            }

            let from_top = prev_y + radius <= r.top();
            let from_bottom = prev_y - radius >= r.bottom();
            let from_left = prev_x + radius <= r.left();
            let from_right = prev_x - radius >= r.right();

            if from_top && self.velocity.y > 0.0 {
                self.y = r.top() - radius;
                self.velocity.y = 0.0;
                self.is_jumping = false;
                self.on_surface = true;
                self.velocity.x *= self.config.friction;
                if self.velocity.x.abs() < self.config.friction_epsilon {
                    self.velocity.x = 0.0;
                }
            } else if from_bottom && self.velocity.y < 0.0 {
                // Head bump.
                self.y = r.bottom() + radius;
                self.velocity.y = 0.0;
            } else if from_left && self.velocity.x > 0.0 {
                self.x = r.left() - radius;
                self.velocity.x = 0.0;
            } else if from_right && self.velocity.x < 0.0 {
                self.x = r.right() + radius;
                self.velocity.x = 0.0;
            }
        }
    }

    /// Floor bounce and side walls.
    fn contain(&mut self) {
        let Viewport { width, height } = self.viewport;

        if self.y + self.radius > height {
            self.y = height - self.radius;
            self.velocity.y *= self.config.bounce;
            self.is_jumping = false;
            self.on_surface = true;
        }

        if self.x + self.radius > width {
            self.velocity.x = -self.velocity.x;
            self.x = width - self.radius;
        } else if self.x - self.radius < 0.0 {
            self.velocity.x = -self.velocity.x;
            self.x = self.radius;
        }
    }

    /// Linear slowdown while grounded with no horizontal input, so the actor
    /// comes to a full stop instead of sliding asymptotically.
    fn decelerate_idle(&mut self) {
        if self.is_jumping || !self.on_surface || self.steering {
            return;
        }
        let speed = self.velocity.x.abs();
        if speed > 0.0 {
            let slowed = (speed - self.config.idle_deceleration).max(0.0);
            self.velocity.x = self.velocity.x.signum() * slowed;
        }
    }

    /// Hitbox outline for debugging collisions.
    pub fn draw_debug(&self, surface: &mut dyn DrawSurface) {
        surface.set_stroke_color(Color::DEBUG_HITBOX);
        surface.stroke_circle(self.x, self.y, self.radius);
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            x: self.x,
            y: self.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
            radius: self.radius,
            state: self.animator.state(),
            facing: self.animator.facing(),
            on_surface: self.on_surface,
            is_jumping: self.is_jumping,
            is_dead: self.is_dead,
        }
    }
}

impl Drawable for Actor {
    fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetStore) {
        let Some(sprite) = assets.sprite(self.animator.state().sprite_key()) else {
            surface.set_fill_color(Color::ACTOR);
            surface.draw_circle(self.x, self.y, self.radius);
            return;
        };

        let w = self.config.sprite_width;
        let h = self.config.sprite_height;
        surface.save_state();
        surface.translate(self.x - w / 2.0, self.y - h / 2.0);
        if self.animator.facing() == Facing::Left {
            surface.scale(-1.0, 1.0);
            surface.translate(-w, 0.0);
        }
        surface.draw_image(sprite, 0.0, 0.0, w, h);
        surface.restore_state();
    }
}

/// Immutable per-frame view of the actor for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub state: AnimationState,
    pub facing: Facing,
    pub on_surface: bool,
    pub is_jumping: bool,
    pub is_dead: bool,
}
