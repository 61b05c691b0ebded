use crate::collision::CollisionData;
use crate::context::{SimulationContext, Sound, Viewport};
use crate::engine::{Canvas, Pose};
use crate::object::character::Character;
use crate::object::{
    draw_entity, rescale, scaled_size, Collidable, Drawable, Entity, GameObject, ObjectTag,
    Updatable,
};

/// Goombas and flying goombas. They patrol between their left bound and the
/// right edge of the screen and are only dangerous from the side.
pub struct Enemy {
    entity: Entity,
    character: Character,
    scale_size: f64,
    /// left patrol bound as a fraction of the viewport width
    min_position: f64,
    /// flying height as a fraction of the space above the floor line
    y_percentage: f64,
    /// -1.0 walking left, 1.0 walking right
    direction: f64,
}

impl Enemy {
    pub fn new(
        mut entity: Entity,
        scale_size: f64,
        min_position: f64,
        y_percentage: f64,
        ctx: &SimulationContext,
    ) -> Self {
        let character = Character::new(
            &ctx.viewport,
            entity.size.height,
            ctx.config.animation_rate,
        );
        entity.speed = ctx.config.enemy_speed;
        let mut enemy = Enemy {
            entity,
            character,
            scale_size,
            min_position,
            y_percentage,
            direction: -1.0,
        };
        enemy.place_vertically(&ctx.viewport);
        enemy
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    fn is_flying(&self) -> bool {
        self.entity.tag == ObjectTag::FlyingGoomba
    }

    fn place_vertically(&mut self, viewport: &Viewport) {
        self.entity.position.y = if self.is_flying() {
            self.y_percentage * (viewport.bottom - self.entity.size.height)
        } else {
            self.character.bottom
        };
    }

    fn patrol(&mut self, viewport: &Viewport) {
        let left_bound = self.min_position * viewport.inner_width;
        let right_bound = viewport.inner_width - self.entity.size.width;
        let x = &mut self.entity.position.x;
        *x += self.entity.speed * self.direction;
        if *x <= left_bound {
            *x = left_bound;
            self.direction = 1.0;
        } else if *x >= right_bound {
            *x = right_bound;
            self.direction = -1.0;
        }
    }

    fn die(&mut self, ctx: &mut SimulationContext) {
        ctx.play(Sound::GoombaDeath);
        self.entity.destroy();
    }
}

impl Updatable for Enemy {
    fn update(&mut self, ctx: &mut SimulationContext) {
        self.character.animate(&mut self.entity.frame);
        self.patrol(&ctx.viewport);
        if !self.is_flying() {
            self.character.fall(&mut self.entity, ctx.config.gravity);
        }
    }
}

impl Collidable for Enemy {
    fn collision_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        let other = collision.other();
        match other.tag {
            ObjectTag::Player if other.top => {
                if self.is_flying() {
                    ctx.flags.goomba_bounce_high = true;
                } else {
                    ctx.flags.goomba_bounce = true;
                }
                self.die(ctx);
            }
            ObjectTag::Player if other.is_side() && ctx.flags.invincible => self.die(ctx),
            tag if tag.is_obstacle() || tag == ObjectTag::JumpPlatform => {
                // turn away from whatever was walked into
                let this = collision.this();
                if this.left {
                    self.direction = -1.0;
                } else if this.right {
                    self.direction = 1.0;
                }
            }
            _ => {}
        }
    }
}

impl Drawable for Enemy {
    fn draw(&self, canvas: &dyn Canvas) {
        draw_entity(&self.entity, canvas, Pose::default());
    }
}

impl GameObject for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn resize(&mut self, old: &Viewport, new: &Viewport) {
        let size = scaled_size(self.entity.sprite.frame, new, self.scale_size);
        self.entity.size = size;
        self.entity.position.x = rescale(self.entity.position.x, old.inner_width, new.inner_width);
        self.character.resize(new, size.height);
        self.place_vertically(new);
    }
}
