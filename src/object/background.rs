use crate::context::{SimulationContext, Viewport};
use crate::engine::{Canvas, Pose, Rect};
use crate::object::{Collidable, Drawable, Entity, GameObject, Layout, Updatable};

/// What drives a layer's horizontal scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scroll {
    Static,
    /// follows the player's hills parallax speed
    Hills,
    /// follows the player's mountains parallax speed
    Mountains,
    /// constant drift, pixels per tick
    Drift(f64),
}

impl Scroll {
    /// Layer for a parallax descriptor name; unknown names drift
    pub fn for_layer(name: &str, speed_ratio: f64) -> Self {
        match name {
            "hills" => Scroll::Hills,
            "mountains" => Scroll::Mountains,
            _ => Scroll::Drift(speed_ratio),
        }
    }

    fn speed(&self, ctx: &SimulationContext) -> f64 {
        match *self {
            Scroll::Static => 0.0,
            Scroll::Hills => ctx.parallax.hills,
            Scroll::Mountains => ctx.parallax.mountains,
            Scroll::Drift(speed) => speed,
        }
    }
}

/// Full width scenery, tiled horizontally so a scrolled layer has no gaps
pub struct Background {
    entity: Entity,
    layout: Layout,
    scroll: Scroll,
    offset: f64,
}

impl Background {
    pub fn new(mut entity: Entity, layout: Layout, scroll: Scroll) -> Self {
        entity.collidable = false;
        Background {
            entity,
            layout,
            scroll,
            offset: 0.0,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Destinations covering the viewport, leftmost first
    fn tiles(&self) -> Vec<Rect> {
        let rect = self.entity.rect();
        let width = rect.width();
        if width <= 0.0 {
            return vec![];
        }
        let mut x = self.offset % width;
        if x > 0.0 {
            x -= width;
        }
        // the layer is viewport wide, a second tile covers the wrap-around
        (0..2)
            .map(|i| Rect::new_from_x_y(x + i as f64 * width, rect.y(), width, rect.height()))
            .collect()
    }
}

impl Updatable for Background {
    fn update(&mut self, ctx: &mut SimulationContext) {
        let width = self.entity.size.width;
        if width > 0.0 {
            self.offset = (self.offset - self.scroll.speed(ctx)) % width;
        }
    }
}

impl Collidable for Background {}

impl Drawable for Background {
    fn draw(&self, canvas: &dyn Canvas) {
        let frame = self.entity.source_frame();
        for destination in self.tiles() {
            canvas.draw_sprite(&self.entity.sprite.asset, &frame, &destination, Pose::default());
        }
    }
}

impl GameObject for Background {
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
