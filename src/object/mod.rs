//! Game objects : a flat `Entity` (position, size, frame) shared by every
//! kind, plus the behaviour traits each kind opts into.

pub mod background;
pub mod character;
pub mod collectible;
pub mod enemy;
pub mod platform;

use crate::collision::CollisionData;
use crate::context::{SimulationContext, Viewport};
use crate::engine::{Canvas, Point, Pose, Rect, Size};
use crate::schedule::ScheduledEvent;
use crate::sprite::player::Player;
use crate::sprite::Sprite;
use anyhow::{anyhow, Error};
use std::fmt;
use std::str::FromStr;

/// The `id` of a level descriptor : what kind of thing an object is to the
/// objects that touch it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectTag {
    Background,
    Floor,
    JumpPlatform,
    Tube,
    Tree,
    FinishLine,
    Goomba,
    FlyingGoomba,
    Mushroom,
    Coin,
    Player,
}

impl ObjectTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectTag::Background => "background",
            ObjectTag::Floor => "floor",
            ObjectTag::JumpPlatform => "jumpPlatform",
            ObjectTag::Tube => "tube",
            ObjectTag::Tree => "tree",
            ObjectTag::FinishLine => "finishline",
            ObjectTag::Goomba => "goomba",
            ObjectTag::FlyingGoomba => "flyingGoomba",
            ObjectTag::Mushroom => "mushroom",
            ObjectTag::Coin => "coin",
            ObjectTag::Player => "player",
        }
    }

    /// Solid from the side, entered from the top
    pub fn is_obstacle(&self) -> bool {
        matches!(self, ObjectTag::Tube | ObjectTag::Tree | ObjectTag::FinishLine)
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, ObjectTag::Goomba | ObjectTag::FlyingGoomba)
    }
}

impl FromStr for ObjectTag {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "background" => Ok(ObjectTag::Background),
            "floor" | "platform" => Ok(ObjectTag::Floor),
            "jumpPlatform" => Ok(ObjectTag::JumpPlatform),
            "tube" => Ok(ObjectTag::Tube),
            "tree" => Ok(ObjectTag::Tree),
            "finishline" | "minifinishline" => Ok(ObjectTag::FinishLine),
            "goomba" => Ok(ObjectTag::Goomba),
            "flyingGoomba" => Ok(ObjectTag::FlyingGoomba),
            "mushroom" => Ok(ObjectTag::Mushroom),
            "coin" => Ok(ObjectTag::Coin),
            "player" => Ok(ObjectTag::Player),
            other => Err(anyhow!("unknown object id '{}'", other)),
        }
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current sprite cell and the column range the animation cycles through
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub row: u32,
    pub column: u32,
    pub min: u32,
    pub max: u32,
}

impl Frame {
    pub fn advance(&mut self) {
        if self.column < self.max {
            self.column += 1;
        } else {
            self.column = self.min;
        }
    }
}

/// Placement as fractions of the viewport, re-applied on resize
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x_percentage: f64,
    pub y_percentage: f64,
}

impl Placement {
    /// Top left corner for an object of `size`; y = 1.0 rests on the floor
    pub fn resolve(&self, viewport: &Viewport, size: Size) -> Point {
        Point {
            x: self.x_percentage * viewport.inner_width,
            y: self.y_percentage * (viewport.bottom - size.height),
        }
    }
}

/// On-screen size from the sheet cell : `scale_size` objects side by side
/// fill the viewport width, aspect ratio kept
pub fn scaled_size(frame: Size, viewport: &Viewport, scale_size: f64) -> Size {
    let width = viewport.inner_width / scale_size;
    let height = if frame.width > 0.0 {
        width * frame.height / frame.width
    } else {
        width
    };
    Size { width, height }
}

/// Carry a coordinate over to a resized axis
pub fn rescale(value: f64, old_extent: f64, new_extent: f64) -> f64 {
    if old_extent > 0.0 {
        value / old_extent * new_extent
    } else {
        value
    }
}

/// How a static object's rectangle follows the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// full width strip under the floor line
    Floor,
    /// full width from the top down to the floor line, or the whole screen
    Backdrop { full_screen: bool },
    /// scaled from the sheet cell, placed by percentage above the floor line
    Placed {
        placement: Placement,
        scale_size: f64,
    },
    /// like `Placed`, but y is a fraction of the floor line itself
    Marker {
        placement: Placement,
        scale_size: f64,
    },
}

impl Layout {
    pub fn rect(&self, frame: Size, viewport: &Viewport) -> Rect {
        match *self {
            Layout::Floor => Rect::new_from_x_y(
                0.0,
                viewport.bottom,
                viewport.inner_width,
                (viewport.inner_height - viewport.bottom).max(0.0),
            ),
            Layout::Backdrop { full_screen } => {
                let height = if full_screen {
                    viewport.inner_height
                } else {
                    viewport.bottom
                };
                Rect::new_from_x_y(0.0, viewport.top, viewport.inner_width, height)
            }
            Layout::Placed {
                placement,
                scale_size,
            } => {
                let size = scaled_size(frame, viewport, scale_size);
                Rect::new(placement.resolve(viewport, size), size)
            }
            Layout::Marker {
                placement,
                scale_size,
            } => {
                let size = scaled_size(frame, viewport, scale_size);
                let position = Point {
                    x: placement.x_percentage * viewport.inner_width,
                    y: placement.y_percentage * viewport.bottom,
                };
                Rect::new(position, size)
            }
        }
    }

    /// Move and resize `entity` for `viewport`
    pub fn apply(&self, entity: &mut Entity, viewport: &Viewport) {
        let rect = self.rect(entity.sprite.frame, viewport);
        entity.position = rect.position;
        entity.size = rect.size;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub tag: ObjectTag,
    /// index of the descriptor this object came from, unique within a level
    pub slot: usize,
    pub position: Point,
    pub size: Size,
    pub speed: f64,
    pub frame: Frame,
    pub sprite: Sprite,
    /// takes part in the collision pass
    pub collidable: bool,
    destroyed: bool,
}

impl Entity {
    pub fn new(name: &str, tag: ObjectTag, slot: usize, sprite: Sprite, rect: Rect) -> Self {
        Entity {
            name: name.to_string(),
            tag,
            slot,
            position: rect.position,
            size: rect.size,
            speed: 0.0,
            frame: Frame::default(),
            sprite,
            collidable: true,
            destroyed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn source_frame(&self) -> Rect {
        self.sprite.cell(self.frame.column, self.frame.row)
    }

    /// Flag for removal; the world drops it from the active list after the
    /// current tick and it takes no further part in collisions
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Advances one simulation tick
pub trait Updatable {
    fn update(&mut self, ctx: &mut SimulationContext);
}

/// Reacts to the collision pass; objects without a reaction keep the default
pub trait Collidable {
    fn collision_action(&mut self, _collision: &CollisionData, _ctx: &mut SimulationContext) {}

    /// Called once per tick after every pair has been visited
    fn after_collisions(&mut self, _ctx: &mut SimulationContext) {}
}

/// Renders the current frame, never mutates simulation state
pub trait Drawable {
    fn draw(&self, canvas: &dyn Canvas);
}

pub trait GameObject: Updatable + Collidable + Drawable {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    /// Re-apply percentage placement after the viewport changed
    fn resize(&mut self, _old: &Viewport, _new: &Viewport) {}

    fn on_scheduled(&mut self, _event: ScheduledEvent, _ctx: &mut SimulationContext) {}

    fn destroy(&mut self) {
        self.entity_mut().destroy();
    }

    fn as_player(&self) -> Option<&Player> {
        None
    }

    fn as_player_mut(&mut self) -> Option<&mut Player> {
        None
    }
}

pub fn draw_entity(entity: &Entity, canvas: &dyn Canvas, pose: Pose) {
    canvas.draw_sprite(
        &entity.sprite.asset,
        &entity.source_frame(),
        &entity.rect(),
        pose,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_wraps_back_to_min() {
        let mut frame = Frame {
            row: 0,
            column: 2,
            min: 1,
            max: 3,
        };
        frame.advance();
        assert_eq!(frame.column, 3);
        frame.advance();
        assert_eq!(frame.column, 1);
    }

    #[test]
    fn descriptor_ids_parse_with_aliases() {
        assert_eq!("platform".parse::<ObjectTag>().unwrap(), ObjectTag::Floor);
        assert_eq!(
            "minifinishline".parse::<ObjectTag>().unwrap(),
            ObjectTag::FinishLine
        );
        assert!("dragon".parse::<ObjectTag>().is_err());
        assert!(ObjectTag::Tube.is_obstacle());
        assert!(ObjectTag::FlyingGoomba.is_hazard());
    }

    #[test]
    fn placement_rests_on_the_floor_at_full_height() {
        let viewport = Viewport::new(1000.0, 600.0, 0.9);
        let size = Size {
            width: 40.0,
            height: 40.0,
        };
        let point = Placement {
            x_percentage: 0.5,
            y_percentage: 1.0,
        }
        .resolve(&viewport, size);
        assert_eq!(point, Point { x: 500.0, y: 500.0 });
    }

    #[test]
    fn marker_hangs_from_the_floor_line() {
        let viewport = Viewport::new(1000.0, 600.0, 0.9);
        let layout = Layout::Marker {
            placement: Placement {
                x_percentage: 0.85,
                y_percentage: 0.5,
            },
            scale_size: 10.0,
        };
        let rect = layout.rect(
            Size {
                width: 50.0,
                height: 100.0,
            },
            &viewport,
        );
        approx::assert_relative_eq!(rect.x(), 850.0);
        approx::assert_relative_eq!(rect.y(), 270.0);
        approx::assert_relative_eq!(rect.height(), 200.0);
    }

    #[test]
    fn floor_strip_sits_under_the_floor_line() {
        let viewport = Viewport::new(1000.0, 600.0, 0.9);
        let rect = Layout::Floor.rect(Size::default(), &viewport);
        approx::assert_relative_eq!(rect.top(), 540.0);
        approx::assert_relative_eq!(rect.height(), 60.0);
        assert_eq!(rescale(250.0, 1000.0, 500.0), 125.0);
    }

    #[test]
    fn scaled_size_keeps_aspect() {
        let viewport = Viewport::new(1000.0, 600.0, 0.9);
        let size = scaled_size(
            Size {
                width: 20.0,
                height: 40.0,
            },
            &viewport,
            10.0,
        );
        assert_eq!(size.width, 100.0);
        assert_eq!(size.height, 200.0);
    }
}
