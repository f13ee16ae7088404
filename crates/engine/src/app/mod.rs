mod entity;
mod frame_clock;
mod input;
mod loop_runner;
mod metrics;
pub(crate) mod rendering;
mod sandbox;

pub use entity::{Entity, EntityId, EntityKind};
pub use frame_clock::{FrameClock, StepPlan};
pub use input::{InputAction, InputState};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    dynamic_wall_faces, load_sprite, sprite_path, Canvas, DebugGraph, FramePresenter, Image,
    Neighbours, RasterSurface, RectF, RenderOptions, Rgba, SandboxRenderer, SpriteCache,
    SpriteLoadError, TilePainter, WallFace, BACKGROUND_COLOR, TRANSPARENT,
};
pub use sandbox::Sandbox;
