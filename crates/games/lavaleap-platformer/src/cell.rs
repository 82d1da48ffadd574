use serde::{Deserialize, Serialize};

use lavaleap_core::assets::AssetStore;
use lavaleap_core::color::Color;
use lavaleap_core::surface::DrawSurface;

/// Schema symbol for an empty tile.
pub const EMPTY_SYMBOL: char = '.';
/// Number of frames in the coin spin cycle.
pub const COIN_FRAMES: u8 = 4;

/// Anything that can render itself against a [`DrawSurface`].
pub trait Drawable {
    fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetStore);
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "degenerate rectangle {width}x{height}"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closest point of the rectangle to `(px, py)`.
    pub fn closest_point(&self, px: f32, py: f32) -> (f32, f32) {
        (
            px.clamp(self.left(), self.right()),
            py.clamp(self.top(), self.bottom()),
        )
    }

    /// Circle/rectangle contact; touching counts.
    pub fn touches_circle(&self, cx: f32, cy: f32, radius: f32) -> bool {
        let (nx, ny) = self.closest_point(cx, cy);
        let dx = cx - nx;
        let dy = cy - ny;
        dx * dx + dy * dy <= radius * radius
    }

    /// Whether `(px, py)` lies within `radius` of the rectangle's center.
    pub fn center_within(&self, px: f32, py: f32, radius: f32) -> bool {
        let (cx, cy) = self.center();
        let dx = px - cx;
        let dy = py - cy;
        dx * dx + dy * dy <= radius * radius
    }

    /// Strict overlap with the bounding box of a circle. Edges that merely
    /// touch do not overlap.
    pub fn overlaps_circle_bounds(&self, cx: f32, cy: f32, radius: f32) -> bool {
        cy + radius > self.top()
            && cy - radius < self.bottom()
            && cx + radius > self.left()
            && cx - radius < self.right()
    }
}

/// The closed set of tile kinds a map schema can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Ground,
    Lava,
    Platform,
    Coin,
}

impl CellKind {
    /// Parse a schema symbol. `.` and unknown symbols yield `None`; callers
    /// decide whether an unknown symbol is an error.
    pub fn from_symbol(symbol: char) -> Option<CellKind> {
        match symbol {
            'G' => Some(CellKind::Ground),
            'L' => Some(CellKind::Lava),
            'P' => Some(CellKind::Platform),
            'C' => Some(CellKind::Coin),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Ground => 'G',
            CellKind::Lava => 'L',
            CellKind::Platform => 'P',
            CellKind::Coin => 'C',
        }
    }

    /// Whether the actor can move through this tile.
    pub fn is_passable(self) -> bool {
        matches!(self, CellKind::Lava | CellKind::Coin)
    }

    pub fn is_solid(self) -> bool {
        !self.is_passable()
    }

    pub fn is_lethal(self) -> bool {
        self == CellKind::Lava
    }

    pub fn color(self) -> Color {
        match self {
            CellKind::Ground => Color::GROUND,
            CellKind::Lava => Color::LAVA,
            CellKind::Platform => Color::PLATFORM,
            CellKind::Coin => Color::COIN,
        }
    }

    /// Sprite key for this kind at animation frame `frame` (0-based).
    pub fn sprite_key(self, frame: u8) -> &'static str {
        match self {
            CellKind::Ground => "tiles/ground",
            CellKind::Lava => "tiles/lava",
            CellKind::Platform => "tiles/platform",
            CellKind::Coin => match frame % COIN_FRAMES {
                0 => "tiles/coin1",
                1 => "tiles/coin2",
                2 => "tiles/coin3",
                _ => "tiles/coin4",
            },
        }
    }
}

/// A placed map tile. Geometry is fixed; only coins advance `frame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub rect: Rect,
    frame: u8,
}

impl Cell {
    pub fn new(kind: CellKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, width, height),
            frame: 0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.rect.x, self.rect.y)
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Step the spin animation. No-op for non-animated kinds.
    pub fn advance_frame(&mut self) {
        if self.kind == CellKind::Coin {
            self.frame = (self.frame + 1) % COIN_FRAMES;
        }
    }
}

impl Drawable for Cell {
    fn draw(&self, surface: &mut dyn DrawSurface, assets: &dyn AssetStore) {
        let r = &self.rect;
        match assets.sprite(self.kind.sprite_key(self.frame)) {
            Some(sprite) => surface.draw_image(sprite, r.x, r.y, r.width, r.height),
            None => {
                surface.set_fill_color(self.kind.color());
                surface.draw_rectangle(r.x, r.y, r.width, r.height);
            },
        }
    }
}
