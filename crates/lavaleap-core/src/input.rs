use serde::{Deserialize, Serialize};

/// Logical actions the input layer maps physical keys onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Pressed state of every logical action for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn set(&mut self, action: Action, pressed: bool) {
        match action {
            Action::MoveLeft => self.move_left = pressed,
            Action::MoveRight => self.move_right = pressed,
            Action::Jump => self.jump = pressed,
        }
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::Jump => self.jump,
        }
    }

    /// -1 (left), 0, +1 (right). Opposing keys cancel out.
    pub fn horizontal_axis(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Whether any horizontal key is held, even if they cancel.
    pub fn steering(&self) -> bool {
        self.move_left || self.move_right
    }
}
