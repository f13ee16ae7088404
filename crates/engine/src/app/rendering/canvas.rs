use crate::math::Vec2;

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Owned RGBA8 pixel buffer, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Returns `None` when `rgba` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(out)
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.rgba[offset..offset + 4];
        blend_source_over(dst, color);
    }
}

fn blend_source_over(dst: &mut [u8], src: Rgba) {
    let alpha = src[3] as u32;
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let inv = 255 - alpha;
    for channel in 0..3 {
        dst[channel] = ((src[channel] as u32 * alpha + dst[channel] as u32 * inv + 127) / 255) as u8;
    }
    dst[3] = (alpha + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
}

/// Scale then translate, applied to user-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    scale_x: f32,
    scale_y: f32,
    translate_x: f32,
    translate_y: f32,
}

impl Affine {
    const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale_x + self.translate_x,
            y * self.scale_y + self.translate_y,
        )
    }
}

/// 2D immediate-mode drawing target.
///
/// Transforms compose in user space: `translate` after `scale` moves by the
/// scaled amount. `resize` discards contents and resets the transform.
pub trait RasterSurface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: RectF, color: Rgba);
    /// Draws `src` (whole image when `None`) of `image` stretched into `dest`.
    fn draw_image(&mut self, image: &Image, src: Option<RectF>, dest: RectF);
    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn reset_transform(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    /// Fills the closed polygon through `points` (even-odd).
    fn fill_path(&mut self, points: &[Vec2], color: Rgba);
    /// Strokes the open polyline through `points` one device pixel wide.
    fn stroke_path(&mut self, points: &[Vec2], color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// Software [`RasterSurface`] backed by an [`Image`].
#[derive(Debug, Clone)]
pub struct Canvas {
    image: Image,
    transform: Affine,
    saved: Vec<Affine>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: Image::new(width, height),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    fn device_rect(&self, rect: RectF) -> (f32, f32, f32, f32) {
        let (x0, y0) = self.transform.apply(rect.x, rect.y);
        let (x1, y1) = self.transform.apply(rect.x + rect.width, rect.y + rect.height);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    fn clipped_span(&self, min: f32, max: f32, limit: u32) -> (i32, i32) {
        let start = (min.round() as i32).max(0);
        let end = (max.round() as i32).min(limit as i32);
        (start, end)
    }
}

impl RasterSurface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = Image::new(width, height);
        self.transform = Affine::IDENTITY;
        self.saved.clear();
    }

    fn clear(&mut self, color: Rgba) {
        for pixel in self.image.rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        let (x0, y0, x1, y1) = self.device_rect(rect);
        let (left, right) = self.clipped_span(x0, x1, self.image.width);
        let (top, bottom) = self.clipped_span(y0, y1, self.image.height);
        for y in top..bottom {
            for x in left..right {
                self.image.blend_pixel(x, y, color);
            }
        }
    }

    fn draw_image(&mut self, image: &Image, src: Option<RectF>, dest: RectF) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let src = src.unwrap_or(RectF::new(
            0.0,
            0.0,
            image.width as f32,
            image.height as f32,
        ));
        if src.width <= 0.0 || src.height <= 0.0 || dest.width == 0.0 || dest.height == 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.device_rect(dest);
        let device_width = x1 - x0;
        let device_height = y1 - y0;
        if device_width <= 0.0 || device_height <= 0.0 {
            return;
        }
        let (left, right) = self.clipped_span(x0, x1, self.image.width);
        let (top, bottom) = self.clipped_span(y0, y1, self.image.height);

        for out_y in top..bottom {
            let v = (out_y as f32 + 0.5 - y0) / device_height;
            let src_y = (src.y + v * src.height).floor();
            if src_y < 0.0 || src_y >= image.height as f32 {
                continue;
            }
            for out_x in left..right {
                let u = (out_x as f32 + 0.5 - x0) / device_width;
                let src_x = (src.x + u * src.width).floor();
                if src_x < 0.0 || src_x >= image.width as f32 {
                    continue;
                }
                if let Some(color) = image.pixel(src_x as u32, src_y as u32) {
                    self.image.blend_pixel(out_x, out_y, color);
                }
            }
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate_x += dx * self.transform.scale_x;
        self.transform.translate_y += dy * self.transform.scale_y;
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale_x *= sx;
        self.transform.scale_y *= sy;
    }

    fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    fn fill_path(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let device: Vec<(f32, f32)> = points
            .iter()
            .map(|point| self.transform.apply(point.x, point.y))
            .collect();
        let min_y = device.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = device.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let top = (min_y.floor() as i32).max(0);
        let bottom = (max_y.ceil() as i32).min(self.image.height as i32);

        let mut crossings = Vec::new();
        for y in top..bottom {
            let sample_y = y as f32 + 0.5;
            crossings.clear();
            for (index, &(ax, ay)) in device.iter().enumerate() {
                let (bx, by) = device[(index + 1) % device.len()];
                if (ay <= sample_y) != (by <= sample_y) {
                    crossings.push(ax + (sample_y - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = ((pair[0] - 0.5).ceil() as i32).max(0);
                let end = ((pair[1] - 0.5).ceil() as i32).min(self.image.width as i32);
                for x in start..end {
                    self.image.blend_pixel(x, y, color);
                }
            }
        }
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Rgba) {
        for segment in points.windows(2) {
            let (ax, ay) = self.transform.apply(segment[0].x, segment[0].y);
            let (bx, by) = self.transform.apply(segment[1].x, segment[1].y);
            let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as i32;
            for step in 0..=steps {
                let t = step as f32 / steps as f32;
                let x = (ax + (bx - ax) * t).floor() as i32;
                let y = (ay + (by - ay) * t).floor() as i32;
                self.image.blend_pixel(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (cx, cy) = self.transform.apply(center.x, center.y);
        let radius = radius * (self.transform.scale_x.abs() + self.transform.scale_y.abs()) * 0.5;
        if radius <= 0.0 {
            return;
        }
        let top = ((cy - radius).floor() as i32).max(0);
        let bottom = ((cy + radius).ceil() as i32).min(self.image.height as i32);
        let left = ((cx - radius).floor() as i32).max(0);
        let right = ((cx + radius).ceil() as i32).min(self.image.width as i32);
        for y in top..bottom {
            for x in left..right {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.image.blend_pixel(x, y, color);
                }
            }
        }
    }
}
