//! Static tile property table.
//!
//! Tile codes stored in a [`Tilemap`] resolve to a [`TileKind`], and every kind
//! has exactly one [`TileDescriptor`] known at compile time.

use crate::tilemap::{Tilemap, TILE_WALL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Floor,
    Wall,
    DebugWall,
}

/// Which packed sheet a tile is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayer {
    Background,
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRender {
    /// One sprite stretched over the tile cell.
    StaticImage,
    /// Face sheet laid out as a 5x5 grid of top and side variants.
    DynamicWall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDescriptor {
    pub kind: TileKind,
    pub opaque: bool,
    pub layer: TileLayer,
    pub render: TileRender,
    pub sprite_key: &'static str,
    pub fallback_top: [u8; 4],
    pub fallback_side: [u8; 4],
}

const FLOOR: TileDescriptor = TileDescriptor {
    kind: TileKind::Floor,
    opaque: false,
    layer: TileLayer::Background,
    render: TileRender::StaticImage,
    sprite_key: "tile/floor",
    fallback_top: [96, 104, 88, 255],
    fallback_side: [72, 78, 66, 255],
};

const WALL: TileDescriptor = TileDescriptor {
    kind: TileKind::Wall,
    opaque: true,
    layer: TileLayer::Foreground,
    render: TileRender::DynamicWall,
    sprite_key: "tile/grass_wall",
    fallback_top: [74, 112, 56, 255],
    fallback_side: [112, 83, 58, 255],
};

const DEBUG_WALL: TileDescriptor = TileDescriptor {
    kind: TileKind::DebugWall,
    opaque: true,
    layer: TileLayer::Foreground,
    render: TileRender::DynamicWall,
    sprite_key: "tile/debug",
    fallback_top: [220, 60, 220, 255],
    fallback_side: [140, 30, 140, 255],
};

impl TileKind {
    pub const ALL: [TileKind; 3] = [TileKind::Floor, TileKind::Wall, TileKind::DebugWall];

    /// Unknown codes fall back to floor.
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => TileKind::Wall,
            2 => TileKind::DebugWall,
            _ => TileKind::Floor,
        }
    }

    pub const fn code(self) -> u16 {
        match self {
            TileKind::Floor => 0,
            TileKind::Wall => 1,
            TileKind::DebugWall => 2,
        }
    }

    pub const fn descriptor(self) -> &'static TileDescriptor {
        match self {
            TileKind::Floor => &FLOOR,
            TileKind::Wall => &WALL,
            TileKind::DebugWall => &DEBUG_WALL,
        }
    }
}

/// Descriptor of the tile at `(x, y)`. Cells outside the map read as walls so
/// the map edge renders closed.
pub fn descriptor_at(tilemap: &Tilemap, x: i32, y: i32) -> &'static TileDescriptor {
    TileKind::from_code(tilemap.at_or(x, y, TILE_WALL)).descriptor()
}

pub fn is_opaque_at(tilemap: &Tilemap, x: i32, y: i32) -> bool {
    descriptor_at(tilemap, x, y).opaque
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_kinds() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_code(kind.code()), kind);
            assert_eq!(kind.descriptor().kind, kind);
        }
    }

    #[test]
    fn unknown_code_is_floor() {
        assert_eq!(TileKind::from_code(99), TileKind::Floor);
    }

    #[test]
    fn only_walls_render_in_foreground() {
        assert_eq!(TileKind::Floor.descriptor().layer, TileLayer::Background);
        assert_eq!(TileKind::Wall.descriptor().layer, TileLayer::Foreground);
        assert!(TileKind::Wall.descriptor().opaque);
        assert!(!TileKind::Floor.descriptor().opaque);
    }

    #[test]
    fn outside_the_map_reads_opaque() {
        let tilemap = Tilemap::new(2, 2);
        assert!(!is_opaque_at(&tilemap, 0, 0));
        assert!(is_opaque_at(&tilemap, -1, 0));
        assert!(is_opaque_at(&tilemap, 2, 2));
    }
}
