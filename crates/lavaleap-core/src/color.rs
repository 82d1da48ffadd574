use serde::{Deserialize, Serialize};

/// Fill color used for fallback shapes when a sprite is not ready yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS-style `rgba(...)` string for canvas backends.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }

    pub const GROUND: Color = Color::rgb(46, 139, 87);
    pub const PLATFORM: Color = Color::rgb(34, 170, 68);
    pub const LAVA: Color = Color::rgb(230, 57, 20);
    pub const COIN: Color = Color::rgb(255, 195, 18);
    pub const ACTOR: Color = Color::rgb(83, 152, 255);
    /// Hitbox outline for the debug overlay.
    pub const DEBUG_HITBOX: Color = Color::rgba(0, 255, 0, 128);
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_includes_alpha() {
        assert_eq!(Color::rgb(255, 0, 0).to_css(), "rgba(255,0,0,1.000)");
        assert_eq!(Color::DEBUG_HITBOX.to_css(), "rgba(0,255,0,0.502)");
    }

    #[test]
    fn default_is_opaque_black() {
        let c = Color::default();
        assert_eq!((c.r, c.g, c.b, c.a), (0, 0, 0, 255));
    }
}
