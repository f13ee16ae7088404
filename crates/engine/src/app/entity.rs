use std::f32::consts::TAU;

use crate::collision::Body;
use crate::math::Vec2;

use super::InputState;

const WALK_CYCLES_PER_SECOND: f32 = 2.5;
const WALK_BOB_AMPLITUDE_PX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Steered by [`InputState`].
    Player,
    /// Static prop.
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    pub kind: EntityKind,
    pub body: Body,
    pub velocity: Vec2,
    pub speed: f32,
    walk_phase: f32,
}

impl Entity {
    pub fn player(position: Vec2, size: f32, speed: f32) -> Self {
        Self::new(EntityKind::Player, position, size, speed)
    }

    pub fn marker(position: Vec2, size: f32) -> Self {
        Self::new(EntityKind::Marker, position, size, 0.0)
    }

    fn new(kind: EntityKind, position: Vec2, size: f32, speed: f32) -> Self {
        Self {
            id: EntityId(0),
            kind,
            body: Body::new(position, Vec2::new(size, size)),
            velocity: Vec2::ZERO,
            speed,
            walk_phase: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Isometric depth; larger is nearer the viewer.
    pub fn depth(&self) -> f32 {
        self.body.position.x + self.body.position.y
    }

    pub fn walk_phase(&self) -> f32 {
        self.walk_phase
    }

    pub(crate) fn gather_intent(&mut self, input: &InputState) {
        self.velocity = match self.kind {
            EntityKind::Player => input.movement_direction() * self.speed,
            EntityKind::Marker => Vec2::ZERO,
        };
    }

    pub(crate) fn post_update(&mut self, dt: f32) {
        if self.velocity.is_zero() {
            self.walk_phase = 0.0;
            return;
        }
        self.walk_phase = (self.walk_phase + dt * WALK_CYCLES_PER_SECOND).fract();
    }

    /// Vertical sprite offset in pixels, never below the resting position.
    pub fn bob_offset_px(&self) -> f32 {
        -(self.walk_phase * TAU).sin().abs() * WALK_BOB_AMPLITUDE_PX
    }
}
