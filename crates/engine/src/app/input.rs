use crate::iso::to_iso;
use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Quit,
}

const ACTION_COUNT: usize = 5;

/// Held state of every [`InputAction`], sampled once per simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    down: [bool; ACTION_COUNT],
}

impl InputState {
    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// Releases everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }

    /// Raw screen-axis intent; `y` grows downward.
    pub fn axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.is_down(InputAction::MoveLeft) {
            axes.x -= 1.0;
        }
        if self.is_down(InputAction::MoveRight) {
            axes.x += 1.0;
        }
        if self.is_down(InputAction::MoveUp) {
            axes.y -= 1.0;
        }
        if self.is_down(InputAction::MoveDown) {
            axes.y += 1.0;
        }
        axes
    }

    /// Unit world-space direction, so held keys move along screen axes.
    pub fn movement_direction(&self) -> Vec2 {
        let axes = self.axes().normalized_or_zero();
        if axes.is_zero() {
            return Vec2::ZERO;
        }
        to_iso(axes)
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Quit => 4,
        }
    }
}
