use crate::context::{SimulationContext, Viewport};
use crate::engine::{Canvas, Pose};
use crate::object::{draw_entity, Collidable, Drawable, Entity, GameObject, Layout, Updatable};

/// Anything the player stands on or bumps into without reacting itself :
/// the floor strip, jump platform blocks, tubes, trees. What touching it
/// means is decided by the toucher from the tag.
pub struct Platform {
    entity: Entity,
    layout: Layout,
}

impl Platform {
    pub fn new(mut entity: Entity, layout: Layout) -> Self {
        // the floor strip is scenery, the floor line itself stops falling
        if layout == Layout::Floor {
            entity.collidable = false;
        }
        Platform { entity, layout }
    }
}

impl Updatable for Platform {
    fn update(&mut self, _ctx: &mut SimulationContext) {}
}

impl Collidable for Platform {}

impl Drawable for Platform {
    fn draw(&self, canvas: &dyn Canvas) {
        draw_entity(&self.entity, canvas, Pose::default());
    }
}

impl GameObject for Platform {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn resize(&mut self, _old: &Viewport, new: &Viewport) {
        self.layout.apply(&mut self.entity, new);
    }
}
