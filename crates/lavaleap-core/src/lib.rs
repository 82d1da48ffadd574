pub mod assets;
pub mod color;
pub mod input;
pub mod schedule;
pub mod simulation;
pub mod snapshot;
pub mod surface;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::assets::{AssetStore, SpriteHandle};
    use crate::simulation::Simulation;
    use crate::surface::{DrawCommand, RecordingSurface};

    /// Asset store that reports every sprite as loaded (or none of them).
    pub struct StaticAssets {
        pub all_ready: bool,
    }

    impl StaticAssets {
        pub fn ready() -> Self {
            Self { all_ready: true }
        }

        pub fn loading() -> Self {
            Self { all_ready: false }
        }
    }

    impl AssetStore for StaticAssets {
        fn sprite(&self, key: &str) -> Option<SpriteHandle> {
            if !self.all_ready {
                return None;
            }
            // Stable per-key handle so tests can tell sprites apart.
            let hash = key
                .bytes()
                .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
            Some(SpriteHandle(hash))
        }
    }

    /// A recording surface with the default 800x600 test viewport.
    pub fn test_surface() -> RecordingSurface {
        RecordingSurface::new(800.0, 600.0)
    }

    /// Run `n` frames of `dt_ms` each starting at `start_ms`, returning all
    /// accumulated events and the clock value after the last frame.
    pub fn run_frames<S: Simulation + ?Sized>(
        sim: &mut S,
        n: usize,
        start_ms: f64,
        dt_ms: f32,
    ) -> (Vec<S::Event>, f64) {
        let mut now = start_ms;
        let mut events = Vec::new();
        for _ in 0..n {
            now += dt_ms as f64;
            events.extend(sim.update(now, dt_ms));
        }
        (events, now)
    }

    /// Count recorded filled rectangles.
    pub fn rectangles(surface: &RecordingSurface) -> usize {
        surface.count(|c| matches!(c, DrawCommand::Rectangle { .. }))
    }

    /// Count recorded image blits.
    pub fn images(surface: &RecordingSurface) -> usize {
        surface.count(|c| matches!(c, DrawCommand::Image { .. }))
    }
}
