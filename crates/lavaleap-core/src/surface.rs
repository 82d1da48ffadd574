use crate::assets::SpriteHandle;
use crate::color::Color;

/// Drawing primitives the simulation renders against.
///
/// The host owns the canvas lifecycle; the core only issues draw calls and
/// reads the current size.
pub trait DrawSurface {
    fn clear(&mut self);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32);
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32);
    fn draw_image(&mut self, sprite: SpriteHandle, x: f32, y: f32, width: f32, height: f32);
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn width(&self) -> f32;
    fn height(&self) -> f32;
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillColor(Color),
    StrokeColor(Color),
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
    },
    StrokeCircle {
        x: f32,
        y: f32,
        radius: f32,
    },
    Image {
        sprite: SpriteHandle,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Save,
    Restore,
    Translate(f32, f32),
    Scale(f32, f32),
}

/// Headless surface that records every call instead of rasterizing.
///
/// Used by the simulation binary and by tests to inspect what was drawn.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            depth: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the surface size.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Current save/restore nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Rectangle {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCommand::Circle { x, y, radius });
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCommand::StrokeCircle { x, y, radius });
    }

    fn draw_image(&mut self, sprite: SpriteHandle, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Image {
            sprite,
            x,
            y,
            width,
            height,
        });
    }

    fn save_state(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore_state(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Scale(x, y));
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}
