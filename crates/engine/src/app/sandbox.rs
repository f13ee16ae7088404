use crate::collision::move_body;
use crate::tilemap::Tilemap;

use super::{Entity, EntityId, InputState};

/// Simulation state: an optional level plus the entities living in it.
#[derive(Debug, Default)]
pub struct Sandbox {
    tilemap: Option<Tilemap>,
    tilemap_revision: u64,
    entities: Vec<Entity>,
    next_entity_id: u32,
    camera_target: Option<EntityId>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        entity.assign_id(id);
        self.entities.push(entity);
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    /// Replaces the level. Renderers compare [`Self::tilemap_revision`] to
    /// notice the swap.
    pub fn set_tilemap(&mut self, tilemap: Option<Tilemap>) {
        self.tilemap = tilemap;
        self.tilemap_revision += 1;
    }

    pub fn tilemap(&self) -> Option<&Tilemap> {
        self.tilemap.as_ref()
    }

    pub fn tilemap_revision(&self) -> u64 {
        self.tilemap_revision
    }

    pub fn set_camera_target(&mut self, id: Option<EntityId>) {
        self.camera_target = id;
    }

    /// Explicit target if it still exists, else the lowest-depth entity.
    pub fn camera_target(&self) -> Option<&Entity> {
        self.camera_target
            .and_then(|id| self.entity(id))
            .or_else(|| {
                self.entities
                    .iter()
                    .min_by(|a, b| a.depth().total_cmp(&b.depth()))
            })
    }

    /// Advances every entity by one fixed step.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        for entity in &mut self.entities {
            entity.gather_intent(input);
            if !entity.velocity.is_zero() {
                let delta = entity.velocity * dt;
                match &self.tilemap {
                    Some(tilemap) => move_body(tilemap, &mut entity.body, delta.x, delta.y),
                    None => entity.body.position += delta,
                }
            }
            entity.post_update(dt);
        }
    }
}
