pub mod app;
pub mod collision;
pub mod config;
pub mod generation;
pub mod iso;
pub mod math;
mod paths;
pub mod tilemap;
pub mod tiles;

pub use app::{
    run_app, AppError, Canvas, DebugGraph, Entity, EntityId, EntityKind,
    FrameClock, Image, InputAction, InputState, LoopConfig, LoopMetricsSnapshot, RasterSurface,
    RectF, RenderOptions, Rgba, Sandbox, SandboxRenderer, SpriteCache, SpriteLoadError, StepPlan,
    BACKGROUND_COLOR,
};
pub use collision::{move_body, Body, Edge};
pub use config::{AppConfig, ConfigError, SandboxConfig, WindowConfig};
pub use generation::{
    create_node_tree, generate_level, generate_level_layout, GridPos, Level, LevelConfig, Node,
    NodeId, NodeTree, Room, RoomId,
};
pub use math::Vec2;
pub use paths::{resolve_app_paths, AppPaths, StartupError, ROOT_ENV_VAR};
pub use tilemap::{Tilemap, TilemapError, TILE_FLOOR, TILE_WALL};
pub use tiles::{TileDescriptor, TileKind};
