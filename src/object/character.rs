use crate::context::Viewport;
use crate::object::{Entity, Frame};

/// Gravity and sprite animation for anything that walks on the floor.
/// Owned by value inside the player and enemies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Character {
    /// y at which the character stands on the floor line
    pub bottom: f64,
    animation_rate: u32,
    ticks: u32,
}

impl Character {
    pub fn new(viewport: &Viewport, height: f64, animation_rate: u32) -> Self {
        Character {
            bottom: viewport.bottom - height,
            animation_rate: animation_rate.max(1),
            ticks: 0,
        }
    }

    pub fn resize(&mut self, viewport: &Viewport, height: f64) {
        self.bottom = viewport.bottom - height;
    }

    pub fn is_on_floor(&self, entity: &Entity) -> bool {
        self.bottom <= entity.position.y
    }

    /// Pull toward the floor line, never past it
    pub fn fall(&self, entity: &mut Entity, gravity: f64) {
        if entity.position.y < self.bottom {
            entity.position.y = (entity.position.y + gravity).min(self.bottom);
        }
    }

    /// Keep a character that was pushed below the floor on it
    pub fn clamp_to_floor(&self, entity: &mut Entity) {
        if entity.position.y > self.bottom {
            entity.position.y = self.bottom;
        }
    }

    pub fn animate(&mut self, frame: &mut Frame) {
        self.ticks += 1;
        if self.ticks >= self.animation_rate {
            self.ticks = 0;
            frame.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Rect, Size};
    use crate::object::ObjectTag;
    use crate::sprite::Sprite;

    fn entity_at(y: f64) -> Entity {
        Entity::new(
            "goomba",
            ObjectTag::Goomba,
            0,
            Sprite {
                asset: "goomba.png".into(),
                frame: Size {
                    width: 10.0,
                    height: 10.0,
                },
            },
            Rect::new_from_x_y(0.0, y, 10.0, 20.0),
        )
    }

    #[test]
    fn falls_until_the_floor_line() {
        let viewport = Viewport::new(800.0, 600.0, 0.9);
        let character = Character::new(&viewport, 20.0, 1);
        assert_eq!(character.bottom, 520.0);

        let mut entity = entity_at(515.0);
        character.fall(&mut entity, 3.0);
        assert_eq!(entity.position.y, 518.0);
        character.fall(&mut entity, 3.0);
        assert_eq!(entity.position.y, 520.0);
        assert!(character.is_on_floor(&entity));
    }

    #[test]
    fn animation_steps_every_rate_ticks() {
        let viewport = Viewport::new(800.0, 600.0, 0.9);
        let mut character = Character::new(&viewport, 20.0, 3);
        let mut frame = Frame {
            row: 0,
            column: 0,
            min: 0,
            max: 5,
        };
        character.animate(&mut frame);
        character.animate(&mut frame);
        assert_eq!(frame.column, 0);
        character.animate(&mut frame);
        assert_eq!(frame.column, 1);
    }
}
