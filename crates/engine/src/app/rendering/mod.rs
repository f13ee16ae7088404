mod canvas;
mod presenter;
#[cfg(test)]
pub(crate) mod recording;
mod sandbox_renderer;
mod sprites;
mod tile_renderers;

pub use canvas::{Canvas, Image, RasterSurface, RectF, Rgba, TRANSPARENT};
pub use presenter::FramePresenter;
pub use sandbox_renderer::{DebugGraph, RenderOptions, SandboxRenderer, BACKGROUND_COLOR};
pub use sprites::{load_sprite, sprite_path, SpriteCache, SpriteLoadError};
pub use tile_renderers::{dynamic_wall_faces, Neighbours, TilePainter, WallFace};
