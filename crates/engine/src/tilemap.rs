use thiserror::Error;

/// Open, walkable ground.
pub const TILE_FLOOR: u16 = 0;
/// Solid wall; the only code the collision core treats as blocking.
pub const TILE_WALL: u16 = 1;

/// Fixed-size grid of tile codes stored row-major (`index = x + y * width`).
///
/// Coordinates are signed so callers can probe past the edges freely:
/// out-of-bounds reads return a fallback and out-of-bounds writes are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    width: u32,
    height: u32,
    tiles: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

impl Tilemap {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TILE_FLOOR)
    }

    pub fn filled(width: u32, height: u32, code: u16) -> Self {
        Self {
            width,
            height,
            tiles: vec![code; width as usize * height as usize],
        }
    }

    pub fn from_tiles(width: u32, height: u32, tiles: Vec<u16>) -> Result<Self, TilemapError> {
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TilemapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn has(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.has(x, y) {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Tile code at `(x, y)`, or [`TILE_FLOOR`] outside the map.
    pub fn at(&self, x: i32, y: i32) -> u16 {
        self.at_or(x, y, TILE_FLOOR)
    }

    pub fn at_or(&self, x: i32, y: i32, fallback: u16) -> u16 {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(fallback)
    }

    pub fn put(&mut self, x: i32, y: i32, code: u16) {
        if let Some(index) = self.index_of(x, y) {
            self.tiles[index] = code;
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.at(x, y) == TILE_WALL
    }

    pub fn count(&self, code: u16) -> usize {
        self.tiles.iter().filter(|tile| **tile == code).count()
    }
}
