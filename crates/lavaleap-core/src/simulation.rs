use crate::assets::AssetStore;
use crate::surface::DrawSurface;

/// Something the [`FrameLoop`](crate::schedule::FrameLoop) can drive.
///
/// `update` advances all state for one frame and reports domain events;
/// `render` draws the current state and must not mutate it.
pub trait Simulation {
    /// Domain events emitted during update (pickups, deaths, level end).
    type Event;

    /// Advance one frame. `now_ms` is a monotonic clock used for animation
    /// timing; `delta_ms` is the clamped time since the previous frame.
    fn update(&mut self, now_ms: f64, delta_ms: f32) -> Vec<Self::Event>;

    /// Draw the current state.
    fn render(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetStore);
}
