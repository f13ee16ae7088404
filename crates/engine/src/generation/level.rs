use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node_tree::{Node, NodeTree};
use super::raster::{ellipse_points, line_points};
use crate::tilemap::{Tilemap, TILE_FLOOR, TILE_WALL};

/// Tunables for room and corridor carving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfig {
    pub node_count: usize,
    pub room_size_min: i32,
    pub room_size_max: i32,
    /// Half the side of the square grid cell each room is jittered inside.
    pub room_padding: i32,
    pub corridor_radius_min: i32,
    pub corridor_radius_max: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            node_count: 8,
            room_size_min: 12,
            room_size_max: 16,
            room_padding: 12,
            corridor_radius_min: 1,
            corridor_radius_max: 3,
        }
    }
}

impl LevelConfig {
    pub fn grid_cell(&self) -> i32 {
        self.room_padding * 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub paths: Vec<RoomId>,
}

impl Room {
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Opens the ellipse inscribed in the room's rectangle.
    pub fn carve(&self, tilemap: &mut Tilemap) {
        let (mid_x, mid_y) = self.center();
        let radius_x = self.width as f64 / 2.0;
        let radius_y = self.height as f64 / 2.0;
        for (x, y) in ellipse_points(mid_x, mid_y, radius_x, radius_y) {
            tilemap.put(x, y, TILE_FLOOR);
        }
    }
}

/// A carved tilemap together with the rooms it was carved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub tilemap: Tilemap,
    pub rooms: Vec<Room>,
}

/// Turns a node tree into a solid tilemap with rooms and corridors carved out.
pub fn generate_level<R>(nodes: NodeTree, config: &LevelConfig, rng: &mut R) -> Tilemap
where
    R: Rng + ?Sized,
{
    generate_level_layout(nodes, config, rng).tilemap
}

pub fn generate_level_layout<R>(mut nodes: NodeTree, config: &LevelConfig, rng: &mut R) -> Level
where
    R: Rng + ?Sized,
{
    let grid = config.grid_cell();

    nodes.normalize();
    nodes.scale(grid + 1);
    // One-tile border keeps rooms off the map edge.
    nodes.translate(1, 1);

    let rooms = nodes.map_nodes(
        |node| create_room(node, config, rng),
        |room, child| room.paths.push(RoomId(child.0)),
    );

    let (max_x, max_y) = rooms.iter().fold((0, 0), |(max_x, max_y), room| {
        (max_x.max(room.x + room.width), max_y.max(room.y + room.height))
    });
    let mut tilemap = Tilemap::filled((max_x + 1) as u32, (max_y + 1) as u32, TILE_WALL);

    for room in &rooms {
        room.carve(&mut tilemap);
    }

    let radius_min = config.corridor_radius_min.min(config.corridor_radius_max);
    for room in &rooms {
        let (from_x, from_y) = room.center();
        for path in &room.paths {
            let Some(other) = rooms.get(path.0) else {
                continue;
            };
            let (to_x, to_y) = other.center();
            let radius = rng.gen_range(radius_min..=config.corridor_radius_max);
            for (x, y) in line_points(from_x, from_y, to_x, to_y, radius) {
                tilemap.put(x, y, TILE_FLOOR);
            }
        }
    }

    debug!(
        rooms = rooms.len(),
        width = tilemap.width(),
        height = tilemap.height(),
        open_tiles = tilemap.count(TILE_FLOOR),
        "level_carved"
    );

    Level { tilemap, rooms }
}

fn create_room<R>(node: &Node, config: &LevelConfig, rng: &mut R) -> Room
where
    R: Rng + ?Sized,
{
    let size_min = config.room_size_min.min(config.room_size_max);
    let width = rng.gen_range(size_min..=config.room_size_max);
    let height = rng.gen_range(size_min..=config.room_size_max);

    let grid = config.grid_cell();
    let x = node.position.x + rng.gen_range(0..=(grid - width - 1).max(0));
    let y = node.position.y + rng.gen_range(0..=(grid - height - 1).max(0));

    Room {
        x,
        y,
        width,
        height,
        paths: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::generation::node_tree::create_node_tree;
    use crate::generation::raster::round_half_up;

    fn build(seed: u64, count: usize) -> Level {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tree = create_node_tree(count, &mut rng);
        generate_level_layout(tree, &LevelConfig::default(), &mut rng)
    }

    fn reachable_from(tilemap: &Tilemap, start: (i32, i32)) -> HashSet<(i32, i32)> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            for next in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if tilemap.has(next.0, next.1)
                    && tilemap.at(next.0, next.1) == TILE_FLOOR
                    && seen.insert(next)
                {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    fn center_cell(room: &Room) -> (i32, i32) {
        let (x, y) = room.center();
        (round_half_up(x), round_half_up(y))
    }

    #[test]
    fn every_tile_is_floor_or_wall() {
        for seed in 0..8 {
            let level = build(seed, 6);
            assert!(level
                .tilemap
                .tiles()
                .iter()
                .all(|tile| *tile == TILE_FLOOR || *tile == TILE_WALL));
        }
    }

    #[test]
    fn tilemap_bounds_cover_every_room_plus_margin() {
        let level = build(11, 9);
        let max_x = level.rooms.iter().map(|r| r.x + r.width).max().expect("rooms");
        let max_y = level.rooms.iter().map(|r| r.y + r.height).max().expect("rooms");
        assert_eq!(level.tilemap.width() as i32, max_x + 1);
        assert_eq!(level.tilemap.height() as i32, max_y + 1);
    }

    #[test]
    fn rooms_stay_inside_their_grid_cells() {
        let config = LevelConfig::default();
        let level = build(5, 12);
        for room in &level.rooms {
            assert!((config.room_size_min..=config.room_size_max).contains(&room.width));
            assert!((config.room_size_min..=config.room_size_max).contains(&room.height));
            let cell_x = (room.x - 1).rem_euclid(config.grid_cell() + 1);
            let cell_y = (room.y - 1).rem_euclid(config.grid_cell() + 1);
            assert!(cell_x + room.width < config.grid_cell());
            assert!(cell_y + room.height < config.grid_cell());
        }
    }

    #[test]
    fn room_links_mirror_node_links() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let tree = create_node_tree(10, &mut rng);
        let expected: Vec<Vec<usize>> = tree
            .nodes()
            .iter()
            .map(|node| node.children.iter().map(|child| child.0).collect())
            .collect();
        let level = generate_level_layout(tree, &LevelConfig::default(), &mut rng);
        let actual: Vec<Vec<usize>> = level
            .rooms
            .iter()
            .map(|room| room.paths.iter().map(|path| path.0).collect())
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn all_room_centres_are_open_and_mutually_reachable() {
        for seed in 0..6 {
            let level = build(seed, 8);
            let start = center_cell(&level.rooms[0]);
            assert_eq!(level.tilemap.at(start.0, start.1), TILE_FLOOR);
            let reachable = reachable_from(&level.tilemap, start);
            for room in &level.rooms {
                assert!(
                    reachable.contains(&center_cell(room)),
                    "seed={seed} room at ({}, {}) unreachable",
                    room.x,
                    room.y
                );
            }
        }
    }

    #[test]
    fn default_parameters_leave_a_solid_border() {
        let level = build(3, 10);
        let tilemap = &level.tilemap;
        let w = tilemap.width() as i32;
        let h = tilemap.height() as i32;
        for x in 0..w {
            assert_eq!(tilemap.at(x, 0), TILE_WALL);
            assert_eq!(tilemap.at(x, h - 1), TILE_WALL);
        }
        for y in 0..h {
            assert_eq!(tilemap.at(0, y), TILE_WALL);
            assert_eq!(tilemap.at(w - 1, y), TILE_WALL);
        }
    }

    #[test]
    fn empty_tree_yields_single_solid_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let tilemap = generate_level(NodeTree::default(), &LevelConfig::default(), &mut rng);
        assert_eq!((tilemap.width(), tilemap.height()), (1, 1));
        assert_eq!(tilemap.at(0, 0), TILE_WALL);
    }

    #[test]
    fn same_seed_generates_same_level() {
        assert_eq!(build(42, 7), build(42, 7));
    }
}
