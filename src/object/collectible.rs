use crate::collision::CollisionData;
use crate::context::{SimulationContext, Sound, Viewport};
use crate::engine::{Canvas, Pose};
use crate::object::{
    draw_entity, Collidable, Drawable, Entity, GameObject, Layout, ObjectTag, Updatable,
};

/// Score pickup. Its claim id is derived from the level and descriptor slot,
/// so the same coin rebuilt by a level restart is recognised.
pub struct Coin {
    entity: Entity,
    layout: Layout,
    claim_id: String,
    hidden: bool,
}

impl Coin {
    pub fn new(mut entity: Entity, layout: Layout, ctx: &SimulationContext) -> Self {
        let claim_id = Self::claim_id(ctx.level_tag(), entity.slot);
        let hidden = ctx.session.is_claimed(&claim_id);
        if hidden {
            entity.collidable = false;
        }
        Coin {
            entity,
            layout,
            claim_id,
            hidden,
        }
    }

    pub fn claim_id(level_tag: &str, slot: usize) -> String {
        format!("{}#{}", level_tag, slot)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Updatable for Coin {
    fn update(&mut self, _ctx: &mut SimulationContext) {}
}

impl Collidable for Coin {
    fn collision_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        if collision.other().tag != ObjectTag::Player {
            return;
        }
        if ctx.session.claim_coin(&self.claim_id, ctx.config.coin_value) {
            ctx.play(Sound::Coin);
        }
        self.entity.destroy();
    }
}

impl Drawable for Coin {
    fn draw(&self, canvas: &dyn Canvas) {
        if !self.hidden {
            draw_entity(&self.entity, canvas, Pose::default());
        }
    }
}

impl GameObject for Coin {
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

/// Power-up : touching it makes the player invincible for a while
pub struct Mushroom {
    entity: Entity,
    layout: Layout,
}

impl Mushroom {
    pub fn new(entity: Entity, layout: Layout) -> Self {
        Mushroom { entity, layout }
    }
}

impl Updatable for Mushroom {
    fn update(&mut self, _ctx: &mut SimulationContext) {}
}

impl Collidable for Mushroom {
    fn collision_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        if collision.other().tag != ObjectTag::Player {
            return;
        }
        self.entity.destroy();
        ctx.grant_invincibility();
        ctx.play(Sound::PowerUp);
    }
}

impl Drawable for Mushroom {
    fn draw(&self, canvas: &dyn Canvas) {
        draw_entity(&self.entity, canvas, Pose::default());
    }
}

impl GameObject for Mushroom {
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
