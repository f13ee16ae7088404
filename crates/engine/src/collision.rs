//! Per-axis sliding collision of an axis-aligned box against solid tiles.
//!
//! Only the leading edge of travel is checked, X before Y, and long moves are
//! swept tile by tile so they cannot skip a wall. A box that already
//! overlaps a wall is not pushed out unless it moves further into it.

use crate::math::Vec2;
use crate::tilemap::Tilemap;

const EDGE_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

/// Collision footprint: `position` is the centre, `size` the full extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }

    /// Tile columns and rows the box covers, nudged inward so an edge lying
    /// exactly on a tile boundary does not count the neighbouring tile.
    fn tile_span(&self) -> (i32, i32, i32, i32) {
        let left = (self.left() + EDGE_EPSILON).floor() as i32;
        let top = (self.top() + EDGE_EPSILON).floor() as i32;
        let right = (self.right() - EDGE_EPSILON).ceil() as i32 - 1;
        let bottom = (self.bottom() - EDGE_EPSILON).ceil() as i32 - 1;
        (left, top, right, bottom)
    }

    /// Tiles touched by one edge of the box.
    pub fn edge_tiles(&self, edge: Edge) -> Vec<(i32, i32)> {
        let (left, top, right, bottom) = self.tile_span();
        match edge {
            Edge::Left => (top..=bottom).map(|y| (left, y)).collect(),
            Edge::Right => (top..=bottom).map(|y| (right, y)).collect(),
            Edge::Top => (left..=right).map(|x| (x, top)).collect(),
            Edge::Bottom => (left..=right).map(|x| (x, bottom)).collect(),
        }
    }

    /// Snaps the given edge onto the tile boundary it crossed.
    pub fn align_edge(&mut self, edge: Edge) {
        let half_w = self.size.x / 2.0;
        let half_h = self.size.y / 2.0;
        match edge {
            Edge::Left => self.position.x = (self.position.x - half_w).floor() + half_w + 1.0,
            Edge::Top => self.position.y = (self.position.y - half_h).floor() + half_h + 1.0,
            Edge::Right => self.position.x = (self.position.x + half_w).floor() - half_w,
            Edge::Bottom => self.position.y = (self.position.y + half_h).floor() - half_h,
        }
    }
}

pub fn has_edge_collision(tilemap: &Tilemap, body: &Body, edge: Edge) -> bool {
    body.edge_tiles(edge)
        .into_iter()
        .any(|(x, y)| tilemap.is_solid(x, y))
}

/// Moves `body` by `(delta_x, delta_y)`, resolving X then Y against solid tiles.
///
/// Each axis is swept in sub-steps no longer than one tile or the body's
/// extent on that axis, and stops at the first blocked sub-step.
pub fn move_body(tilemap: &Tilemap, body: &mut Body, delta_x: f32, delta_y: f32) {
    sweep_axis(tilemap, body, Axis::X, delta_x);
    sweep_axis(tilemap, body, Axis::Y, delta_y);
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn sweep_axis(tilemap: &Tilemap, body: &mut Body, axis: Axis, delta: f32) {
    if !delta.is_finite() {
        return;
    }
    let (edge, extent) = match axis {
        Axis::X => (leading_edge(delta, Edge::Left, Edge::Right), body.size.x),
        Axis::Y => (leading_edge(delta, Edge::Top, Edge::Bottom), body.size.y),
    };
    let Some(edge) = edge else {
        return;
    };

    let max_step = if extent > 0.0 { extent.min(1.0) } else { 1.0 };
    let steps = (delta.abs() / max_step).ceil().max(1.0) as u32;
    let step = delta / steps as f32;
    for _ in 0..steps {
        match axis {
            Axis::X => body.position.x += step,
            Axis::Y => body.position.y += step,
        }
        if has_edge_collision(tilemap, body, edge) {
            body.align_edge(edge);
            return;
        }
    }
}

fn leading_edge(delta: f32, negative: Edge, positive: Edge) -> Option<Edge> {
    if delta < 0.0 {
        Some(negative)
    } else if delta > 0.0 {
        Some(positive)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::{TILE_FLOOR, TILE_WALL};

    const TOLERANCE: f32 = 1e-5;

    /// Solid map with an open horizontal corridor on row 1 from `open_from` to `open_to`.
    fn corridor(width: u32, open_from: i32, open_to: i32) -> Tilemap {
        let mut tilemap = Tilemap::filled(width, 3, TILE_WALL);
        for x in open_from..=open_to {
            tilemap.put(x, 1, TILE_FLOOR);
        }
        tilemap
    }

    fn body_at(x: f32, y: f32, size: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(size, size))
    }

    fn assert_inside(tilemap: &Tilemap, body: &Body) {
        let (w, h) = (tilemap.width() as f32, tilemap.height() as f32);
        assert!(
            body.left() >= -TOLERANCE && body.right() <= w + TOLERANCE,
            "left={} right={} width={w}",
            body.left(),
            body.right()
        );
        assert!(
            body.top() >= -TOLERANCE && body.bottom() <= h + TOLERANCE,
            "top={} bottom={} height={h}",
            body.top(),
            body.bottom()
        );
    }

    #[test]
    fn moving_left_into_wall_stops_flush_with_wall() {
        let tilemap = corridor(8, 2, 6);
        let mut body = body_at(6.5, 1.5, 0.9);

        move_body(&tilemap, &mut body, -5.0, 0.0);

        assert!((body.left() - 2.0).abs() < TOLERANCE, "left={}", body.left());
        assert!((body.position.y - 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn long_move_into_adjacent_wall_stops_flush() {
        let tilemap = corridor(8, 2, 6);
        let mut body = body_at(2.5, 1.5, 0.9);

        move_body(&tilemap, &mut body, -5.0, 0.0);

        assert!((body.left() - 2.0).abs() < TOLERANCE, "left={}", body.left());
        assert_inside(&tilemap, &body);
    }

    #[test]
    fn long_move_right_in_single_open_cell_collides() {
        let mut tilemap = Tilemap::filled(3, 3, TILE_WALL);
        tilemap.put(1, 1, TILE_FLOOR);

        for start in [Vec2::new(1.0, 1.0), Vec2::new(1.5, 1.5)] {
            let mut body = Body::new(start, Vec2::new(0.9, 0.9));
            move_body(&tilemap, &mut body, 2.0, 0.0);

            assert!((body.right() - 2.0).abs() < TOLERANCE, "right={}", body.right());
            assert!((body.position.x - (2.0 - 0.9 / 2.0)).abs() < TOLERANCE);
            assert_inside(&tilemap, &body);
        }
    }

    #[test]
    fn thin_body_cannot_tunnel_through_one_tile_wall() {
        let mut tilemap = Tilemap::filled(10, 3, TILE_WALL);
        for x in [1, 2, 3, 5, 6, 7, 8] {
            tilemap.put(x, 1, TILE_FLOOR);
        }
        let mut body = body_at(2.5, 1.5, 0.2);

        move_body(&tilemap, &mut body, 4.0, 0.0);

        assert!((body.right() - 4.0).abs() < TOLERANCE, "right={}", body.right());
    }

    #[test]
    fn long_unblocked_move_lands_exactly() {
        let tilemap = corridor(12, 1, 10);
        let mut body = body_at(1.5, 1.5, 0.5);
        move_body(&tilemap, &mut body, 7.5, 0.0);
        assert!((body.position.x - 9.0).abs() < 1e-4, "x={}", body.position.x);
    }

    #[test]
    fn moving_right_into_solid_neighbour_clamps_to_its_boundary() {
        let mut tilemap = Tilemap::filled(3, 3, TILE_WALL);
        tilemap.put(1, 1, TILE_FLOOR);
        let mut body = body_at(1.5, 1.5, 0.9);

        move_body(&tilemap, &mut body, 0.5, 0.0);

        assert!((body.position.x - (2.0 - 0.9 / 2.0)).abs() < TOLERANCE);
        assert!((body.right() - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn small_steps_toward_a_wall_never_penetrate() {
        let tilemap = corridor(8, 1, 5);
        let mut body = body_at(2.5, 1.5, 0.75);
        for _ in 0..200 {
            move_body(&tilemap, &mut body, 1.0 / 60.0 * 10.0, 0.0);
            assert!(body.right() <= 6.0 + TOLERANCE, "right={}", body.right());
        }
        assert!((body.right() - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn vertical_moves_resolve_top_and_bottom_edges() {
        let mut tilemap = Tilemap::filled(3, 5, TILE_WALL);
        for y in 1..=3 {
            tilemap.put(1, y, TILE_FLOOR);
        }
        let mut body = body_at(1.5, 2.5, 0.5);

        move_body(&tilemap, &mut body, 0.0, -3.0);
        assert!((body.top() - 1.0).abs() < TOLERANCE, "top={}", body.top());

        move_body(&tilemap, &mut body, 0.0, 5.0);
        assert!((body.bottom() - 4.0).abs() < TOLERANCE, "bottom={}", body.bottom());
        assert_inside(&tilemap, &body);
    }

    #[test]
    fn diagonal_move_slides_along_wall_on_free_axis() {
        let mut tilemap = Tilemap::filled(6, 6, TILE_WALL);
        for y in 1..=4 {
            for x in 1..=2 {
                tilemap.put(x, y, TILE_FLOOR);
            }
        }
        let mut body = body_at(2.0, 2.0, 0.5);

        move_body(&tilemap, &mut body, 1.0, 1.0);

        assert!((body.right() - 3.0).abs() < TOLERANCE);
        assert!((body.position.y - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn zero_delta_is_a_no_op_even_inside_a_wall() {
        let tilemap = Tilemap::filled(3, 3, TILE_WALL);
        let mut body = body_at(1.5, 1.5, 0.9);
        move_body(&tilemap, &mut body, 0.0, 0.0);
        assert_eq!(body.position, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn overlapping_box_moving_away_is_not_pushed_out() {
        let tilemap = corridor(6, 2, 4);
        // Left edge already inside the solid column 1.
        let mut body = body_at(2.2, 1.5, 0.9);
        move_body(&tilemap, &mut body, 0.1, 0.0);
        assert!((body.position.x - 2.3).abs() < TOLERANCE);
        assert!(body.left() < 2.0);
    }

    #[test]
    fn edge_exactly_on_boundary_does_not_touch_next_tile() {
        let body = body_at(1.5, 1.5, 1.0);
        assert_eq!(body.edge_tiles(Edge::Right), vec![(1, 1)]);
        assert_eq!(body.edge_tiles(Edge::Left), vec![(1, 1)]);
    }

    #[test]
    fn edge_tiles_span_every_row_the_box_covers() {
        let body = body_at(2.0, 2.0, 1.5);
        assert_eq!(body.edge_tiles(Edge::Left), vec![(1, 1), (1, 2)]);
        assert_eq!(body.edge_tiles(Edge::Bottom), vec![(1, 2), (2, 2)]);
    }
}
