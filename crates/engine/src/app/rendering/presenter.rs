use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::canvas::{Canvas, RasterSurface};

/// Owns the window's pixel surface and the software canvas copied into it.
pub struct FramePresenter {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    canvas: Canvas,
}

impl FramePresenter {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            canvas: Canvas::new(size.width, size.height),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.canvas.resize(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn present(&mut self) -> Result<(), Error> {
        let frame = self.pixels.frame_mut();
        let source = self.canvas.image().rgba();
        if frame.len() == source.len() {
            frame.copy_from_slice(source);
        }
        self.pixels.render()
    }
}
