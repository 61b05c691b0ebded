//! Fixtures shared by the simulation tests. The viewport puts the floor line
//! at 440, so a 40px tall player stands at y = 400.

use crate::config::{Difficulty, GameConfig};
use crate::context::{SimulationContext, Viewport};
use crate::engine::{Rect, Size};
use crate::object::platform::Platform;
use crate::object::{Entity, Layout, ObjectTag, Placement};
use crate::sprite::player::Player;
use crate::sprite::{Animation, AnimationTable, IdleFrame, Sprite};

pub const PLAYER_WIDTH: f64 = 20.0;
pub const PLAYER_HEIGHT: f64 = 40.0;

pub fn viewport() -> Viewport {
    Viewport {
        inner_width: 800.0,
        inner_height: 500.0,
        top: 0.0,
        bottom: 440.0,
    }
}

pub fn context(difficulty: Difficulty) -> SimulationContext {
    let mut ctx = SimulationContext::new(GameConfig::default(), difficulty, viewport());
    ctx.begin_level("test");
    ctx
}

pub fn sprite(tag: ObjectTag, width: f64, height: f64) -> Sprite {
    Sprite {
        asset: format!("images/{}.png", tag),
        frame: Size { width, height },
    }
}

pub fn entity(tag: ObjectTag, slot: usize, x: f64, y: f64, width: f64, height: f64) -> Entity {
    Entity::new(
        tag.as_str(),
        tag,
        slot,
        sprite(tag, width, height),
        Rect::new_from_x_y(x, y, width, height),
    )
}

pub fn animation_table() -> AnimationTable {
    let animation = |row| Animation {
        row,
        frames: 7,
        min: 0,
        idle_frame: None,
    };
    AnimationTable {
        left: Animation {
            idle_frame: Some(IdleFrame {
                column: 0,
                frames: 0,
            }),
            ..animation(1)
        },
        right: Animation {
            idle_frame: Some(IdleFrame {
                column: 7,
                frames: 7,
            }),
            ..animation(2)
        },
        jump_left: animation(3),
        jump_right: animation(4),
        dash: Some(animation(5)),
    }
}

/// Player on the floor line at `x`
pub fn player(ctx: &SimulationContext, x: f64) -> Player {
    let entity = entity(ObjectTag::Player, 0, x, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT);
    Player::new(entity, 40.0, animation_table(), ctx)
}

/// Entity of a jump platform block with an exact rectangle
pub fn block(slot: usize, x: f64, y: f64, width: f64, height: f64) -> Entity {
    entity(ObjectTag::JumpPlatform, slot, x, y, width, height)
}

/// Entity of any other kind with an exact rectangle
pub fn obstacle(tag: ObjectTag, slot: usize, x: f64, y: f64, width: f64, height: f64) -> Entity {
    entity(tag, slot, x, y, width, height)
}

/// A block platform game object, for world level tests
pub fn block_platform(slot: usize, x: f64, y: f64, width: f64, height: f64) -> Platform {
    let viewport = viewport();
    Platform::new(
        block(slot, x, y, width, height),
        Layout::Placed {
            placement: Placement {
                x_percentage: x / viewport.inner_width,
                y_percentage: y / (viewport.bottom - height),
            },
            scale_size: viewport.inner_width / width,
        },
    )
}
