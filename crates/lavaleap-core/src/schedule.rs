use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::AssetStore;
use crate::simulation::Simulation;
use crate::surface::DrawSurface;

/// Nominal frame length used for the very first tick (60 Hz).
pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
/// Upper bound on a single tick's delta. Longer gaps (backgrounded tab,
/// debugger pause) are clamped so the actor cannot tunnel through tiles.
pub const MAX_FRAME_MS: f32 = 50.0;

/// Elapsed-time gate for frame-based animations.
///
/// Fires at most once per `interval_ms` of caller-supplied clock time,
/// independent of how often it is polled.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTimer {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameTimer {
    pub fn new(interval_ms: f64) -> Self {
        assert!(interval_ms > 0.0, "frame timer interval must be positive");
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true (and restarts the interval) if at least `interval_ms`
    /// elapsed since the last firing. An armed timer fires on the next poll.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            },
        }
    }

    /// Make the next [`FrameTimer::ready`] call fire immediately.
    pub fn arm(&mut self) {
        self.last_ms = None;
    }
}

/// Cancellation handle for a [`FrameLoop`]. Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<AtomicBool>,
}

impl LoopHandle {
    /// Withdraw the next-frame request. Takes effect on the next tick.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Cooperative frame driver: one synchronous "advance, then render" per tick.
#[derive(Debug)]
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    paused: bool,
    last_ms: Option<f64>,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            paused: false,
            last_ms: None,
            frames: 0,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Arc::clone(&self.running),
        }
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

    /// Number of ticks that advanced the simulation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Returns `None` once the loop has been cancelled; the
    /// host should stop requesting frames at that point.
    pub fn tick<S: Simulation + ?Sized>(
        &mut self,
        now_ms: f64,
        sim: &mut S,
        surface: &mut dyn DrawSurface,
        assets: &dyn AssetStore,
    ) -> Option<Vec<S::Event>> {
        if !self.running.load(Ordering::Acquire) {
            return None;
        }

        let delta_ms = frame_delta(self.last_ms, now_ms);
        self.last_ms = Some(now_ms);

        let events = if self.paused {
            Vec::new()
        } else {
            self.frames += 1;
            sim.update(now_ms, delta_ms)
        };
        sim.render(surface, assets);
        Some(events)
    }
}

/// Delta since the previous tick, sanitized and clamped to [`MAX_FRAME_MS`].
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_ms {
        None => NOMINAL_FRAME_MS,
        Some(last) => {
            let delta = (now_ms - last) as f32;
            if delta.is_finite() {
                delta.clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            }
        },
    }
}
