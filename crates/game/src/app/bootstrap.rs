use iso_engine::{
    create_node_tree, generate_level_layout, resolve_app_paths, AppConfig, AppError, DebugGraph,
    Entity, Level, LoopConfig, RenderOptions, Sandbox, SandboxConfig, SandboxRenderer,
    SpriteCache, Vec2, TILE_FLOOR,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

const MARKER_SIZE: f32 = 0.25;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) sandbox: Sandbox,
    pub(crate) renderer: SandboxRenderer,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    let config = AppConfig::load_from_env()?;

    let asset_root = match resolve_app_paths() {
        Ok(paths) => {
            info!(
                root = %paths.root.display(),
                assets = %paths.assets_dir.display(),
                "startup_paths"
            );
            Some(paths.assets_dir)
        }
        Err(err) => {
            warn!(error = %err, "asset_root_unresolved_using_fallback_tiles");
            None
        }
    };

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes = create_node_tree(config.level.node_count, &mut rng);
    let node_count = nodes.len();
    let level = generate_level_layout(nodes, &config.level, &mut rng);
    info!(
        seed,
        nodes = node_count,
        rooms = level.rooms.len(),
        open_tiles = level.tilemap.count(TILE_FLOOR),
        width = level.tilemap.width(),
        height = level.tilemap.height(),
        "level_generated"
    );

    let graph = DebugGraph::from_rooms(&level.rooms);
    let sandbox = populate_sandbox(level, &config.sandbox);

    let options = RenderOptions {
        scale: config.sandbox.render_scale,
        debug_collision: config.sandbox.debug_collision,
        debug_node_tree: config.sandbox.debug_node_tree,
    };
    let mut renderer = SandboxRenderer::new(SpriteCache::new(asset_root), options);
    renderer.set_debug_graph(Some(graph));

    Ok(AppWiring {
        config: LoopConfig::from(&config.window),
        sandbox,
        renderer,
    })
}

/// Player in the first room, one marker in every other room.
fn populate_sandbox(level: Level, settings: &SandboxConfig) -> Sandbox {
    let mut sandbox = Sandbox::new();
    let centers: Vec<Vec2> = level
        .rooms
        .iter()
        .map(|room| {
            let (x, y) = room.center();
            Vec2::new(x as f32, y as f32)
        })
        .collect();

    if let Some(&spawn) = centers.first() {
        let player = sandbox.add_entity(Entity::player(
            spawn,
            settings.player_size,
            settings.player_speed,
        ));
        sandbox.set_camera_target(Some(player));
    }
    if settings.room_markers {
        for &center in centers.iter().skip(1) {
            sandbox.add_entity(Entity::marker(center, MARKER_SIZE));
        }
    }
    sandbox.set_tilemap(Some(level.tilemap));
    sandbox
}
