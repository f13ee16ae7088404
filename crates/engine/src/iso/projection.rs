use crate::math::Vec2;

/// Width in pixels of one sprite cell.
pub const SPRITE_WIDTH: f32 = 36.0;
/// Height in pixels of one sprite cell. A tile's top face spans half of it.
pub const SPRITE_HEIGHT: f32 = 36.0;

/// Row-vector 2x2 matrix: `(x, y)` maps to `(x*m00 + y*m10, x*m01 + y*m11)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2 {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
}

impl Mat2 {
    pub fn apply(self, v: Vec2) -> Vec2 {
        Vec2 {
            x: v.x * self.m00 + v.y * self.m10,
            y: v.x * self.m01 + v.y * self.m11,
        }
    }

    pub fn determinant(self) -> f32 {
        self.m00 * self.m11 - self.m10 * self.m01
    }

    pub fn inverse(self) -> Option<Mat2> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON {
            return None;
        }
        Some(Mat2 {
            m00: self.m11 / det,
            m01: -self.m01 / det,
            m10: -self.m10 / det,
            m11: self.m00 / det,
        })
    }
}

/// Screen-axis direction to world (tile) direction on the 2:1 diamond grid.
pub const TO_ISO: Mat2 = Mat2 {
    m00: 0.5,
    m01: -0.5,
    m10: 1.0,
    m11: 1.0,
};

/// Inverse of [`TO_ISO`].
pub const TO_ORTHO: Mat2 = Mat2 {
    m00: 1.0,
    m01: 0.5,
    m10: -1.0,
    m11: 0.5,
};

/// World (tile) coordinates to render pixels.
pub const TO_SCREEN: Mat2 = Mat2 {
    m00: SPRITE_WIDTH / 2.0,
    m01: SPRITE_HEIGHT / 4.0,
    m10: SPRITE_WIDTH / -2.0,
    m11: SPRITE_HEIGHT / 4.0,
};

pub fn to_iso(v: Vec2) -> Vec2 {
    TO_ISO.apply(v)
}

pub fn to_ortho(v: Vec2) -> Vec2 {
    TO_ORTHO.apply(v)
}

pub fn to_screen(v: Vec2) -> Vec2 {
    TO_SCREEN.apply(v)
}

/// Render pixels back to world coordinates.
pub fn from_screen(v: Vec2) -> Vec2 {
    // TO_SCREEN has determinant SPRITE_WIDTH * SPRITE_HEIGHT / 4, never zero.
    match TO_SCREEN.inverse() {
        Some(inverse) => inverse.apply(v),
        None => Vec2::ZERO,
    }
}
