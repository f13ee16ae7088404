use tracing::debug;

use crate::generation::Room;
use crate::iso::{
    draw_packed_row, iso_sheet_origin, render_iso_sheet, render_packed_sheet, to_screen,
    DiagonalCursor, DiagonalStep, SPRITE_HEIGHT, SPRITE_WIDTH,
};
use crate::math::Vec2;
use crate::tiles::TileLayer;

use super::canvas::{Canvas, RasterSurface, RectF, Rgba};
use super::sprites::SpriteCache;
use super::tile_renderers::TilePainter;
use crate::app::{Entity, EntityKind, Sandbox};

pub const BACKGROUND_COLOR: Rgba = [128, 128, 128, 255];
const PLAYER_COLOR: Rgba = [220, 36, 36, 255];
const MARKER_COLOR: Rgba = [240, 196, 64, 255];
const COLLISION_COLOR: Rgba = [255, 0, 255, 160];
const ENTITY_ORIGIN_COLOR: Rgba = [40, 80, 255, 255];
const WORLD_ORIGIN_COLOR: Rgba = [128, 0, 128, 255];
const GRAPH_NODE_COLOR: Rgba = [220, 36, 36, 220];
const GRAPH_EDGE_COLOR: Rgba = [40, 80, 255, 255];
const ORIGIN_DOT_RADIUS: f32 = 2.0;
const GRAPH_NODE_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub scale: f32,
    pub debug_collision: bool,
    pub debug_node_tree: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            debug_collision: false,
            debug_node_tree: false,
        }
    }
}

/// Room graph in world coordinates, drawn when `debug_node_tree` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugGraph {
    pub nodes: Vec<Vec2>,
    pub edges: Vec<(usize, usize)>,
}

impl DebugGraph {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let nodes = rooms
            .iter()
            .map(|room| {
                let (x, y) = room.center();
                Vec2::new(x as f32, y as f32)
            })
            .collect();
        let edges = rooms
            .iter()
            .enumerate()
            .flat_map(|(index, room)| room.paths.iter().map(move |child| (index, child.0)))
            .filter(|&(_, child)| child < rooms.len())
            .collect();
        Self { nodes, edges }
    }
}

/// Draws a [`Sandbox`] with tilemap rows and entities interleaved by depth.
///
/// The tilemap is pre-rendered into two sheets whenever the sandbox reports a
/// new tilemap revision: an isometric background of open tiles blitted in one
/// go, and a diagonal-packed foreground of walls blitted row by row.
pub struct SandboxRenderer {
    options: RenderOptions,
    sprites: SpriteCache,
    rendered_revision: Option<u64>,
    map_size: Option<(u32, u32)>,
    background: Canvas,
    foreground: Canvas,
    debug_graph: Option<DebugGraph>,
    draw_order: Vec<usize>,
}

impl SandboxRenderer {
    pub fn new(sprites: SpriteCache, options: RenderOptions) -> Self {
        Self {
            options,
            sprites,
            rendered_revision: None,
            map_size: None,
            background: Canvas::new(0, 0),
            foreground: Canvas::new(0, 0),
            debug_graph: None,
            draw_order: Vec::new(),
        }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn set_debug_graph(&mut self, graph: Option<DebugGraph>) {
        self.debug_graph = graph;
    }

    pub fn rendered_revision(&self) -> Option<u64> {
        self.rendered_revision
    }

    /// Clears `surface`, centres and scales the view, then draws the sandbox.
    pub fn draw_frame<S: RasterSurface + ?Sized>(&mut self, surface: &mut S, sandbox: &Sandbox) {
        surface.reset_transform();
        surface.clear(BACKGROUND_COLOR);
        let (width, height) = surface.size();
        surface.translate(width as f32 / 2.0, height as f32 / 2.0);
        surface.scale(self.options.scale, self.options.scale);
        self.draw(surface, sandbox);
        if self.options.debug_collision {
            surface.fill_circle(Vec2::ZERO, ORIGIN_DOT_RADIUS, WORLD_ORIGIN_COLOR);
        }
    }

    pub fn draw<S: RasterSurface + ?Sized>(&mut self, surface: &mut S, sandbox: &Sandbox) {
        self.sync_sheets(sandbox);

        surface.save();
        if let Some(target) = sandbox.camera_target() {
            let focus = target.position();
            surface.translate(
                (focus.x - focus.y) * SPRITE_WIDTH / -2.0,
                (focus.x + focus.y) * SPRITE_HEIGHT / -4.0,
            );
        }

        let entities = sandbox.entities();
        self.draw_order.clear();
        self.draw_order.extend(0..entities.len());
        self.draw_order
            .sort_by(|&a, &b| entities[a].depth().total_cmp(&entities[b].depth()));

        match (sandbox.tilemap(), self.map_size) {
            (Some(_), Some((map_width, map_height))) => {
                let background = self.background.image();
                let (origin_x, origin_y) = iso_sheet_origin(map_height, SPRITE_WIDTH, SPRITE_HEIGHT);
                surface.draw_image(
                    background,
                    None,
                    RectF::new(
                        origin_x,
                        origin_y,
                        background.width() as f32,
                        background.height() as f32,
                    ),
                );

                let mut pending = self.draw_order.iter().map(|&index| &entities[index]).peekable();
                for step in DiagonalCursor::new(map_width, map_height) {
                    let limit = step.depth_limit();
                    while let Some(entity) = pending.next_if(|entity| entity.depth() < limit) {
                        draw_entity(surface, entity, &self.options);
                    }
                    if let DiagonalStep::Row { diagonal, .. } = step {
                        draw_packed_row(
                            surface,
                            self.foreground.image(),
                            map_width,
                            map_height,
                            diagonal,
                            SPRITE_WIDTH,
                            SPRITE_HEIGHT,
                        );
                    }
                }
            }
            _ => {
                for &index in &self.draw_order {
                    draw_entity(surface, &entities[index], &self.options);
                }
            }
        }

        if self.options.debug_node_tree {
            if let Some(graph) = &self.debug_graph {
                draw_debug_graph(surface, graph);
            }
        }
        surface.restore();
    }

    fn sync_sheets(&mut self, sandbox: &Sandbox) {
        let revision = sandbox.tilemap_revision();
        if self.rendered_revision == Some(revision) {
            return;
        }
        self.rendered_revision = Some(revision);

        let Self {
            sprites,
            background,
            foreground,
            map_size,
            ..
        } = self;
        let Some(tilemap) = sandbox.tilemap() else {
            *map_size = None;
            background.resize(0, 0);
            foreground.resize(0, 0);
            return;
        };

        let mut painter = TilePainter {
            sprites,
            sprite_width: SPRITE_WIDTH,
            sprite_height: SPRITE_HEIGHT,
        };
        render_iso_sheet(
            tilemap,
            background,
            SPRITE_WIDTH,
            SPRITE_HEIGHT,
            |tilemap, surface, placement| {
                painter.paint(tilemap, surface, placement, TileLayer::Background)
            },
        );
        render_packed_sheet(
            tilemap,
            foreground,
            SPRITE_WIDTH,
            SPRITE_HEIGHT,
            |tilemap, surface, placement| {
                painter.paint(tilemap, surface, placement, TileLayer::Foreground)
            },
        );
        *map_size = Some((tilemap.width(), tilemap.height()));
        debug!(
            revision,
            width = tilemap.width(),
            height = tilemap.height(),
            "tilemap_sheets_rendered"
        );
    }
}

fn draw_entity<S: RasterSurface + ?Sized>(surface: &mut S, entity: &Entity, options: &RenderOptions) {
    let screen = to_screen(entity.position());
    if options.debug_collision {
        let body = entity.body;
        let footprint = [
            to_screen(Vec2::new(body.left(), body.top())),
            to_screen(Vec2::new(body.right(), body.top())),
            to_screen(Vec2::new(body.right(), body.bottom())),
            to_screen(Vec2::new(body.left(), body.bottom())),
        ];
        surface.fill_path(&footprint, COLLISION_COLOR);
    }

    let (width, height, color) = match entity.kind {
        EntityKind::Player => (SPRITE_WIDTH / 2.0, SPRITE_HEIGHT / 2.0, PLAYER_COLOR),
        EntityKind::Marker => (SPRITE_WIDTH / 4.0, SPRITE_HEIGHT / 4.0, MARKER_COLOR),
    };
    surface.fill_rect(
        RectF::new(
            screen.x - width / 2.0,
            screen.y - height + entity.bob_offset_px(),
            width,
            height,
        ),
        color,
    );

    if options.debug_collision {
        surface.fill_circle(screen, ORIGIN_DOT_RADIUS, ENTITY_ORIGIN_COLOR);
    }
}

fn draw_debug_graph<S: RasterSurface + ?Sized>(surface: &mut S, graph: &DebugGraph) {
    for &(parent, child) in &graph.edges {
        let (Some(&a), Some(&b)) = (graph.nodes.get(parent), graph.nodes.get(child)) else {
            continue;
        };
        surface.stroke_path(&[to_screen(a), to_screen(b)], GRAPH_EDGE_COLOR);
    }
    for &node in &graph.nodes {
        surface.fill_circle(to_screen(node), GRAPH_NODE_RADIUS, GRAPH_NODE_COLOR);
    }
}
