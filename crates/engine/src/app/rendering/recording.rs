use crate::math::Vec2;

use super::canvas::{Image, RasterSurface, RectF, Rgba};

/// Draw call captured by [`RecordingSurface`], already in device space.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCall {
    Clear(Rgba),
    FillRect { rect: RectF, color: Rgba },
    DrawImage { size: (u32, u32), src: Option<RectF>, dest: RectF },
    FillPath { points: Vec<Vec2>, color: Rgba },
    StrokePath { points: Vec<Vec2>, color: Rgba },
    FillCircle { center: Vec2, color: Rgba },
    Resize(u32, u32),
}

/// Surface that records calls instead of rasterising them.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    width: u32,
    height: u32,
    offset: (f32, f32),
    scale: (f32, f32),
    saved: Vec<((f32, f32), (f32, f32))>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: (1.0, 1.0),
            ..Self::default()
        }
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale.0 + self.offset.0,
            y * self.scale.1 + self.offset.1,
        )
    }

    fn map_rect(&self, rect: RectF) -> RectF {
        let (x, y) = self.map(rect.x, rect.y);
        RectF::new(x, y, rect.width * self.scale.0, rect.height * self.scale.1)
    }

    fn map_points(&self, points: &[Vec2]) -> Vec<Vec2> {
        points
            .iter()
            .map(|point| {
                let (x, y) = self.map(point.x, point.y);
                Vec2::new(x, y)
            })
            .collect()
    }

    pub fn image_draws(&self) -> Vec<(Option<RectF>, RectF)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::DrawImage { src, dest, .. } => Some((*src, *dest)),
                _ => None,
            })
            .collect()
    }
}

impl RasterSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.offset = (0.0, 0.0);
        self.scale = (1.0, 1.0);
        self.calls.push(DrawCall::Resize(width, height));
    }

    fn clear(&mut self, color: Rgba) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        let rect = self.map_rect(rect);
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: &Image, src: Option<RectF>, dest: RectF) {
        let dest = self.map_rect(dest);
        self.calls.push(DrawCall::DrawImage {
            size: (image.width(), image.height()),
            src,
            dest,
        });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.offset.0 += dx * self.scale.0;
        self.offset.1 += dy * self.scale.1;
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.scale.0 *= sx;
        self.scale.1 *= sy;
    }

    fn reset_transform(&mut self) {
        self.offset = (0.0, 0.0);
        self.scale = (1.0, 1.0);
    }

    fn save(&mut self) {
        self.saved.push((self.offset, self.scale));
    }

    fn restore(&mut self) {
        if let Some((offset, scale)) = self.saved.pop() {
            self.offset = offset;
            self.scale = scale;
        }
    }

    fn fill_path(&mut self, points: &[Vec2], color: Rgba) {
        let points = self.map_points(points);
        self.calls.push(DrawCall::FillPath { points, color });
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Rgba) {
        let points = self.map_points(points);
        self.calls.push(DrawCall::StrokePath { points, color });
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Rgba) {
        let (x, y) = self.map(center.x, center.y);
        self.calls.push(DrawCall::FillCircle {
            center: Vec2::new(x, y),
            color,
        });
    }
}
