use std::collections::VecDeque;

use iso_engine::iso::{DiagonalCursor, DiagonalStep};
use iso_engine::{
    create_node_tree, generate_level_layout, Canvas, Entity, InputAction, InputState, Level,
    LevelConfig, RenderOptions, Sandbox, SandboxRenderer, SpriteCache, Tilemap, Vec2,
    BACKGROUND_COLOR,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const EPSILON: f32 = 1e-4;

fn generate(seed: u64) -> Level {
    let config = LevelConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let nodes = create_node_tree(config.node_count, &mut rng);
    generate_level_layout(nodes, &config, &mut rng)
}

fn reachable_from(tilemap: &Tilemap, start: (i32, i32)) -> Vec<bool> {
    let width = tilemap.width() as i32;
    let height = tilemap.height() as i32;
    let mut seen = vec![false; (width * height) as usize];
    let mut queue = VecDeque::from([start]);
    seen[(start.1 * width + start.0) as usize] = true;
    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if nx < 0 || ny < 0 || nx >= width || ny >= height || tilemap.is_solid(nx, ny) {
                continue;
            }
            let index = (ny * width + nx) as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    seen
}

#[test]
fn same_seed_produces_same_level() {
    assert_eq!(generate(42), generate(42));
}

#[test]
fn every_room_is_reachable_from_the_first() {
    for seed in [1, 2, 3, 99] {
        let level = generate(seed);
        let tilemap = &level.tilemap;
        let centers: Vec<(i32, i32)> = level
            .rooms
            .iter()
            .map(|room| {
                let (x, y) = room.center();
                (x.floor() as i32, y.floor() as i32)
            })
            .collect();
        let seen = reachable_from(tilemap, centers[0]);
        for (x, y) in centers {
            let index = (y as u32 * tilemap.width() + x as u32) as usize;
            assert!(seen[index], "seed {seed}: room at ({x}, {y}) is cut off");
        }
    }
}

#[test]
fn level_border_stays_solid() {
    let level = generate(5);
    let tilemap = &level.tilemap;
    let (w, h) = (tilemap.width() as i32, tilemap.height() as i32);
    for x in 0..w {
        assert!(tilemap.is_solid(x, 0));
        assert!(tilemap.is_solid(x, h - 1));
    }
    for y in 0..h {
        assert!(tilemap.is_solid(0, y));
        assert!(tilemap.is_solid(w - 1, y));
    }
}

#[test]
fn walking_player_never_overlaps_walls() {
    let level = generate(8);
    let (x, y) = level.rooms[0].center();
    let mut sandbox = Sandbox::new();
    let player = sandbox.add_entity(Entity::player(Vec2::new(x as f32, y as f32), 0.75, 10.0));
    sandbox.set_tilemap(Some(level.tilemap));

    let mut input = InputState::default();
    let routes = [
        InputAction::MoveUp,
        InputAction::MoveRight,
        InputAction::MoveDown,
        InputAction::MoveLeft,
    ];
    for action in routes {
        input.clear();
        input.set(action, true);
        for _ in 0..90 {
            sandbox.update(1.0 / 60.0, &input);
            let body = &sandbox.entity(player).expect("player").body;
            let tilemap = sandbox.tilemap().expect("tilemap");
            let (left, right) = (body.left() + EPSILON, body.right() - EPSILON);
            let (top, bottom) = (body.top() + EPSILON, body.bottom() - EPSILON);
            for ty in top.floor() as i32..bottom.ceil() as i32 {
                for tx in left.floor() as i32..right.ceil() as i32 {
                    assert!(!tilemap.is_solid(tx, ty), "player overlaps wall at ({tx}, {ty})");
                }
            }
        }
    }
}

#[test]
fn cursor_covers_every_diagonal_of_a_generated_level() {
    let level = generate(13);
    let (w, h) = (level.tilemap.width(), level.tilemap.height());
    let steps: Vec<DiagonalStep> = DiagonalCursor::new(w, h).collect();
    assert_eq!(steps.len() as u32, w + h);
    assert_eq!(steps.last(), Some(&DiagonalStep::Remaining));
}

#[test]
fn rendered_frame_draws_level_around_player() {
    let level = generate(21);
    let (x, y) = level.rooms[0].center();
    let mut sandbox = Sandbox::new();
    let player = sandbox.add_entity(Entity::player(Vec2::new(x as f32, y as f32), 0.75, 10.0));
    sandbox.set_camera_target(Some(player));
    sandbox.set_tilemap(Some(level.tilemap));

    let mut renderer = SandboxRenderer::new(SpriteCache::new(None), RenderOptions::default());
    let mut canvas = Canvas::new(320, 240);
    renderer.draw_frame(&mut canvas, &sandbox);

    assert_eq!(renderer.rendered_revision(), Some(sandbox.tilemap_revision()));
    let image = canvas.image();
    let painted = (0..image.height())
        .flat_map(|py| (0..image.width()).map(move |px| (px, py)))
        .filter(|&(px, py)| image.pixel(px, py) != Some(BACKGROUND_COLOR))
        .count();
    assert!(painted > (320 * 240) / 4, "only {painted} pixels painted");
}
