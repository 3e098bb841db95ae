use bevy_ecs::prelude::*;
use bevy_math::Mat4;

use constants::placement::PLACED_LABEL_PREFIX;

/// A marker cube fixed at the reticle transform captured when it was placed.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub transform: Mat4,
    pub label: String,
}

/// Every cube placed during the process lifetime, in placement order.
#[derive(Resource, Debug, Default)]
pub struct PlacedObjects {
    entities: Vec<Entity>,
}

impl PlacedObjects {
    /// Spawn a cube at `transform` and record it.
    pub fn spawn(&mut self, commands: &mut Commands, transform: Mat4) -> Entity {
        let label = format!("{}-{}", PLACED_LABEL_PREFIX, self.entities.len());
        let entity = commands.spawn(PlacedObject { transform, label }).id();
        self.entities.push(entity);
        entity
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
