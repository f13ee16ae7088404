//! Diagonal packing of a tilemap into a row-per-diagonal sprite sheet.
//!
//! Tiles sharing `x + y` render at the same isometric depth. Packing every
//! such diagonal into one sheet row lets a whole band be blitted at once and
//! lets the caller splice entity draws between bands.

use crate::app::{Image, RasterSurface, RectF};
use crate::tilemap::Tilemap;

/// `(cols, rows)` of the packed sheet in tiles.
pub fn packed_size(width: u32, height: u32) -> (u32, u32) {
    (width.min(height), width.max(height))
}

/// Sheet cell `(col, row)` holding tile `(x, y)`.
pub fn packed_coord(width: u32, height: u32, x: u32, y: u32) -> (u32, u32) {
    let (_, rows) = packed_size(width, height);
    if rows == 0 {
        return (0, 0);
    }
    let diagonal = i64::from(x) + i64::from(y);
    let rows = i64::from(rows);
    // Diagonals past the map height start at a larger x than 0.
    let offset = (i64::from(height) - diagonal - 1).min(0);
    // Diagonals past the sheet height wrap to the top rows, after the
    // run already stored there.
    let overflow = (diagonal + 1 - rows).max(0);
    let col = i64::from(x) + offset + overflow;
    (col.max(0) as u32, (diagonal % rows) as u32)
}

/// Location of one diagonal in the packed sheet plus where to draw it, in
/// tile units. `dest_x`/`dest_y` are relative to the projected world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedRow {
    pub diagonal: u32,
    pub src_x: u32,
    pub src_y: u32,
    pub span_x: u32,
    pub span_y: u32,
    pub dest_x: f32,
    pub dest_y: f32,
}

impl PackedRow {
    /// Source and destination rectangles in pixels.
    pub fn scaled(&self, sprite_width: f32, sprite_height: f32) -> (RectF, RectF) {
        let width = self.span_x as f32 * sprite_width;
        let height = self.span_y as f32 * sprite_height;
        (
            RectF::new(
                self.src_x as f32 * sprite_width,
                self.src_y as f32 * sprite_height,
                width,
                height,
            ),
            RectF::new(
                self.dest_x * sprite_width,
                self.dest_y * sprite_height,
                width,
                height,
            ),
        )
    }
}

pub fn packed_row_bounds(width: u32, height: u32, diagonal: u32) -> PackedRow {
    let (cols, rows) = packed_size(width, height);
    let d = i64::from(diagonal);
    let (cols_i, rows_i) = (i64::from(cols), i64::from(rows));

    let length = if d < rows_i {
        (d + 1).min(cols_i)
    } else {
        cols_i + rows_i - d - 1
    };
    let src_x = (d - rows_i + 1).max(0);
    let src_y = if rows == 0 { 0 } else { d % rows_i };

    let df = diagonal as f32;
    let (cols_f, rows_f) = (cols as f32, rows as f32);
    let dest_x = if d < rows_i {
        if d < i64::from(height) {
            (df + 1.0) / -2.0
        } else {
            (df + 1.0) / 2.0 - cols_f
        }
    } else if height > width {
        (df + 1.0) / 2.0 - rows_f
    } else {
        (df + cols_f + 1.0) / 2.0 - cols_f * 1.5
    };
    let dest_y = (df - 2.0) / 4.0;

    PackedRow {
        diagonal,
        src_x: src_x as u32,
        src_y: src_y as u32,
        span_x: length.max(0) as u32,
        span_y: 1,
        dest_x,
        dest_y,
    }
}

/// One event from [`DiagonalCursor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagonalStep {
    /// Entities with `x + y < depth_limit` belong in front of no later row
    /// and must be drawn before `diagonal`.
    Row { diagonal: u32, depth_limit: f32 },
    /// All rows are drawn; everything left goes on top.
    Remaining,
}

impl DiagonalStep {
    pub fn depth_limit(self) -> f32 {
        match self {
            DiagonalStep::Row { depth_limit, .. } => depth_limit,
            DiagonalStep::Remaining => f32::INFINITY,
        }
    }
}

/// Pull-style walk over the diagonals of a `width` x `height` map, back to
/// front, ending with a single [`DiagonalStep::Remaining`].
#[derive(Debug, Clone)]
pub struct DiagonalCursor {
    width: u32,
    height: u32,
    next_diagonal: u32,
    finished: bool,
}

impl DiagonalCursor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_diagonal: 0,
            finished: false,
        }
    }

    pub fn diagonal_count(&self) -> u32 {
        if self.width == 0 || self.height == 0 {
            0
        } else {
            self.width + self.height - 1
        }
    }

    pub fn next_row_bound(&mut self) -> Option<DiagonalStep> {
        if self.finished {
            return None;
        }
        if self.next_diagonal < self.diagonal_count() {
            let diagonal = self.next_diagonal;
            self.next_diagonal += 1;
            return Some(DiagonalStep::Row {
                diagonal,
                depth_limit: (diagonal + 1) as f32,
            });
        }
        self.finished = true;
        Some(DiagonalStep::Remaining)
    }
}

impl Iterator for DiagonalCursor {
    type Item = DiagonalStep;

    fn next(&mut self) -> Option<DiagonalStep> {
        self.next_row_bound()
    }
}

/// Blits one diagonal band of a packed `sheet`.
pub fn draw_packed_row<S: RasterSurface + ?Sized>(
    surface: &mut S,
    sheet: &Image,
    width: u32,
    height: u32,
    diagonal: u32,
    sprite_width: f32,
    sprite_height: f32,
) {
    let row = packed_row_bounds(width, height, diagonal);
    if row.span_x == 0 {
        return;
    }
    let (src, dest) = row.scaled(sprite_width, sprite_height);
    surface.draw_image(sheet, Some(src), dest);
}

/// Where a tile callback should paint one tile, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub x: i32,
    pub y: i32,
    pub dest_x: f32,
    pub dest_y: f32,
}

/// Resizes `surface` to the packed sheet and calls `draw_tile` for every tile
/// in row-major order with its packed destination.
pub fn render_packed_sheet<S, F>(
    tilemap: &Tilemap,
    surface: &mut S,
    sprite_width: f32,
    sprite_height: f32,
    mut draw_tile: F,
) where
    S: RasterSurface + ?Sized,
    F: FnMut(&Tilemap, &mut S, TilePlacement),
{
    let (cols, rows) = packed_size(tilemap.width(), tilemap.height());
    surface.resize(
        (cols as f32 * sprite_width).ceil() as u32,
        (rows as f32 * sprite_height).ceil() as u32,
    );
    for y in 0..tilemap.height() {
        for x in 0..tilemap.width() {
            let (col, row) = packed_coord(tilemap.width(), tilemap.height(), x, y);
            draw_tile(
                tilemap,
                surface,
                TilePlacement {
                    x: x as i32,
                    y: y as i32,
                    dest_x: col as f32 * sprite_width,
                    dest_y: row as f32 * sprite_height,
                },
            );
        }
    }
}

/// Pixel size of the full isometric sheet of a `width` x `height` map.
pub fn iso_sheet_size(width: u32, height: u32, sprite_width: f32, sprite_height: f32) -> (f32, f32) {
    let sum = (width + height) as f32;
    (sum / 2.0 * sprite_width, (sum + 2.0) / 4.0 * sprite_height)
}

/// Offset at which the isometric sheet lines up with the projected world origin.
pub fn iso_sheet_origin(height: u32, sprite_width: f32, sprite_height: f32) -> (f32, f32) {
    (sprite_width * height as f32 / -2.0, sprite_height / -2.0)
}

/// Resizes `surface` to the isometric sheet and calls `draw_tile` for every
/// tile in row-major order with its isometric destination.
pub fn render_iso_sheet<S, F>(
    tilemap: &Tilemap,
    surface: &mut S,
    sprite_width: f32,
    sprite_height: f32,
    mut draw_tile: F,
) where
    S: RasterSurface + ?Sized,
    F: FnMut(&Tilemap, &mut S, TilePlacement),
{
    let (width, height) = iso_sheet_size(
        tilemap.width(),
        tilemap.height(),
        sprite_width,
        sprite_height,
    );
    surface.resize(width.ceil() as u32, height.ceil() as u32);
    let map_height = tilemap.height() as f32;
    for y in 0..tilemap.height() {
        for x in 0..tilemap.width() {
            let (xf, yf) = (x as f32, y as f32);
            draw_tile(
                tilemap,
                surface,
                TilePlacement {
                    x: x as i32,
                    y: y as i32,
                    dest_x: (xf - yf + map_height - 1.0) / 2.0 * sprite_width,
                    dest_y: (xf + yf) / 4.0 * sprite_height,
                },
            );
        }
    }
}
