//! Per-tile painters used while building the background and foreground sheets.

use crate::iso::TilePlacement;
use crate::math::Vec2;
use crate::tiles::{descriptor_at, is_opaque_at, TileDescriptor, TileLayer, TileRender};
use crate::tilemap::Tilemap;

use super::canvas::{Image, RasterSurface, RectF, Rgba};
use super::sprites::SpriteCache;

const EDGE_COLOR: Rgba = [24, 26, 20, 255];

/// Solidity of the eight neighbours of a tile. Out-of-map cells count as
/// opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbours {
    pub north_west: bool,
    pub north: bool,
    pub north_east: bool,
    pub west: bool,
    pub east: bool,
    pub south_west: bool,
    pub south: bool,
    pub south_east: bool,
}

impl Neighbours {
    pub fn opaque_around(tilemap: &Tilemap, x: i32, y: i32) -> Self {
        let at = |dx: i32, dy: i32| is_opaque_at(tilemap, x + dx, y + dy);
        Self {
            north_west: at(-1, -1),
            north: at(0, -1),
            north_east: at(1, -1),
            west: at(-1, 0),
            east: at(1, 0),
            south_west: at(-1, 1),
            south: at(0, 1),
            south_east: at(1, 1),
        }
    }

    pub fn enclosed(&self) -> bool {
        self.north_west
            && self.north
            && self.north_east
            && self.west
            && self.east
            && self.south_west
            && self.south
            && self.south_east
    }
}

/// Face of a dynamic wall tile in its 5x5 face sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallFace {
    Top,
    NegX,
    NegY,
    PosX,
    PosY,
}

/// Faces to draw for the wall at `(x, y)`, in paint order, with their source
/// rectangle in the face sheet. Empty when the wall is fully enclosed.
pub fn dynamic_wall_faces(
    tilemap: &Tilemap,
    x: i32,
    y: i32,
    sprite_width: f32,
    sprite_height: f32,
) -> Vec<(WallFace, RectF)> {
    let neighbours = Neighbours::opaque_around(tilemap, x, y);
    if neighbours.enclosed() {
        return Vec::new();
    }
    let cell_w = sprite_width + 1.0;
    let cell_h = sprite_height + 1.0;
    let variant_x = 1.0 + x.rem_euclid(3) as f32;
    let variant_y = 1.0 + y.rem_euclid(3) as f32;
    let rect = |sx: f32, sy: f32| RectF::new(sx, sy, sprite_width, sprite_height);

    let mut faces = vec![(WallFace::Top, rect(cell_w * variant_x, cell_h * variant_y))];
    if !neighbours.west {
        faces.push((WallFace::NegX, rect(cell_w * variant_y, 0.0)));
    }
    if !neighbours.north {
        faces.push((WallFace::NegY, rect(cell_w * variant_x, cell_h * 4.0)));
    }
    if !neighbours.east {
        faces.push((WallFace::PosX, rect(cell_w * 4.0, cell_h * variant_y)));
    }
    if !neighbours.south {
        faces.push((WallFace::PosY, rect(0.0, cell_h * variant_x)));
    }
    faces
}

/// Paints tile sprites, falling back to flat shapes when a sprite is missing.
pub struct TilePainter<'a> {
    pub sprites: &'a mut SpriteCache,
    pub sprite_width: f32,
    pub sprite_height: f32,
}

impl TilePainter<'_> {
    pub fn paint<S: RasterSurface + ?Sized>(
        &mut self,
        tilemap: &Tilemap,
        surface: &mut S,
        placement: TilePlacement,
        layer: TileLayer,
    ) {
        let descriptor = descriptor_at(tilemap, placement.x, placement.y);
        if descriptor.layer != layer {
            return;
        }
        match descriptor.render {
            TileRender::StaticImage => self.paint_static(surface, descriptor, placement),
            TileRender::DynamicWall => self.paint_dynamic_wall(tilemap, surface, descriptor, placement),
        }
    }

    fn dest(&self, placement: TilePlacement) -> RectF {
        RectF::new(
            placement.dest_x,
            placement.dest_y,
            self.sprite_width,
            self.sprite_height,
        )
    }

    fn paint_static<S: RasterSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        descriptor: &TileDescriptor,
        placement: TilePlacement,
    ) {
        let dest = self.dest(placement);
        match self.sprites.get(descriptor.sprite_key) {
            Some(sprite) => surface.draw_image(sprite, None, dest),
            None => paint_fallback_floor(surface, descriptor, dest),
        }
    }

    fn paint_dynamic_wall<S: RasterSurface + ?Sized>(
        &mut self,
        tilemap: &Tilemap,
        surface: &mut S,
        descriptor: &TileDescriptor,
        placement: TilePlacement,
    ) {
        let faces = dynamic_wall_faces(
            tilemap,
            placement.x,
            placement.y,
            self.sprite_width,
            self.sprite_height,
        );
        if faces.is_empty() {
            return;
        }
        let dest = self.dest(placement);
        match self.sprites.get(descriptor.sprite_key) {
            Some(sheet) => draw_faces(surface, sheet, &faces, dest),
            None => paint_fallback_wall(surface, descriptor, &faces, dest),
        }
    }
}

fn draw_faces<S: RasterSurface + ?Sized>(
    surface: &mut S,
    sheet: &Image,
    faces: &[(WallFace, RectF)],
    dest: RectF,
) {
    for (_, src) in faces {
        surface.draw_image(sheet, Some(*src), dest);
    }
}

/// Point inside a sprite cell given in 36ths of its size.
fn cell_point(dest: RectF, x: f32, y: f32) -> Vec2 {
    Vec2::new(
        dest.x + x / 36.0 * dest.width,
        dest.y + y / 36.0 * dest.height,
    )
}

fn paint_fallback_floor<S: RasterSurface + ?Sized>(
    surface: &mut S,
    descriptor: &TileDescriptor,
    dest: RectF,
) {
    let diamond = [
        cell_point(dest, 18.0, 18.0),
        cell_point(dest, 36.0, 27.0),
        cell_point(dest, 18.0, 36.0),
        cell_point(dest, 0.0, 27.0),
    ];
    surface.fill_path(&diamond, descriptor.fallback_top);
}

fn paint_fallback_wall<S: RasterSurface + ?Sized>(
    surface: &mut S,
    descriptor: &TileDescriptor,
    faces: &[(WallFace, RectF)],
    dest: RectF,
) {
    let top = cell_point(dest, 18.0, 0.0);
    let right = cell_point(dest, 36.0, 9.0);
    let bottom = cell_point(dest, 18.0, 18.0);
    let left = cell_point(dest, 0.0, 9.0);
    for (face, _) in faces {
        match face {
            WallFace::Top => surface.fill_path(&[top, right, bottom, left], descriptor.fallback_top),
            WallFace::PosY => surface.fill_path(
                &[
                    left,
                    bottom,
                    cell_point(dest, 18.0, 36.0),
                    cell_point(dest, 0.0, 27.0),
                ],
                descriptor.fallback_side,
            ),
            WallFace::PosX => surface.fill_path(
                &[
                    bottom,
                    right,
                    cell_point(dest, 36.0, 27.0),
                    cell_point(dest, 18.0, 36.0),
                ],
                shade(descriptor.fallback_side, 0.75),
            ),
            WallFace::NegX => surface.stroke_path(&[top, left], EDGE_COLOR),
            WallFace::NegY => surface.stroke_path(&[top, right], EDGE_COLOR),
        }
    }
}

fn shade(color: Rgba, factor: f32) -> Rgba {
    let scale = |channel: u8| (channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}
