use serde::{Deserialize, Serialize};

/// Mutable 2D vector used for actor velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(&mut self, other: Vector2) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn scale(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }

    pub fn set(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_scale_set() {
        let mut v = Vector2::new(1.0, 2.0);
        v.add(Vector2::new(0.5, -1.0));
        assert_eq!(v, Vector2::new(1.5, 1.0));
        v.scale(2.0);
        assert_eq!(v, Vector2::new(3.0, 2.0));
        v.set(0.0, 0.0);
        assert_eq!(v, Vector2::ZERO);
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!Vector2::new(f32::NAN, 0.0).is_finite());
        assert!(Vector2::default().is_finite());
    }
}
