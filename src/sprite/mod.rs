// ┌──────────────────────────────────────────────────────────────────────────┐
// │                          sprite/ layout                                  │
// ├────────────────┬─────────────────────────────────────────────────────────┤
// │ mod.rs         │ Key, Animation, AnimationTable, Sprite (sheet cell)     │
// │ state.rs       │ PlayerState<S> : Floor / OnPlatform typed states        │
// │ player.rs      │ PlayerStateMachine + Player (input, jump, hazards)      │
// └────────────────┴─────────────────────────────────────────────────────────┘
pub mod player;
pub mod state;

use crate::engine::{Rect, Size};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Movement keys the player reacts to, keyed by `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// "w"
    Jump,
    /// "a"
    Left,
    /// "s"
    Dash,
    /// "d"
    Right,
}

impl Key {
    /// `None` for every key the player does not handle
    pub fn from_key(key: &str) -> Option<Key> {
        match key {
            "w" => Some(Key::Jump),
            "a" => Some(Key::Left),
            "s" => Some(Key::Dash),
            "d" => Some(Key::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Jump => "w",
            Key::Left => "a",
            Key::Dash => "s",
            Key::Right => "d",
        }
    }

    /// The horizontal key this one cancels
    pub fn opposite(&self) -> Option<Key> {
        match self {
            Key::Left => Some(Key::Right),
            Key::Right => Some(Key::Left),
            _ => None,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Key::Left | Key::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdleFrame {
    pub column: u32,
    pub frames: u32,
}

/// One row of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub row: u32,
    /// last column of the row
    pub frames: u32,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub idle_frame: Option<IdleFrame>,
}

/// Player animations, one per key. Jumping has a left and right facing
/// variant; dashing is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTable {
    pub left: Animation,
    pub right: Animation,
    pub jump_left: Animation,
    pub jump_right: Animation,
    pub dash: Option<Animation>,
}

impl AnimationTable {
    const LEFT: &'static str = "a";
    const RIGHT: &'static str = "d";
    const JUMP_LEFT: &'static str = "wa";
    const JUMP_RIGHT: &'static str = "wd";
    const DASH: &'static str = "s";

    /// Build from the string keyed map found in asset data. Every animation
    /// the controller can ask for must be present, so a lookup during play
    /// can never miss.
    pub fn from_descriptors(animations: &HashMap<String, Animation>) -> Result<Self> {
        let required = |key: &str| {
            animations
                .get(key)
                .copied()
                .ok_or_else(|| anyhow!("missing '{}' animation", key))
        };
        Ok(AnimationTable {
            left: required(Self::LEFT)?,
            right: required(Self::RIGHT)?,
            jump_left: required(Self::JUMP_LEFT)?,
            jump_right: required(Self::JUMP_RIGHT)?,
            dash: animations.get(Self::DASH).copied(),
        })
    }

    /// Animation for `key` given the current facing (`Key::Left` or
    /// `Key::Right`). `None` only for an optional animation left out.
    pub fn get(&self, key: Key, facing: Key) -> Option<&Animation> {
        match key {
            Key::Left => Some(&self.left),
            Key::Right => Some(&self.right),
            Key::Jump if facing == Key::Left => Some(&self.jump_left),
            Key::Jump => Some(&self.jump_right),
            Key::Dash => self.dash.as_ref(),
        }
    }
}

/// Where an object's pixels come from : image asset plus the size of one
/// cell of its sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub asset: String,
    pub frame: Size,
}

impl Sprite {
    /// Source rectangle of cell (`column`, `row`)
    pub fn cell(&self, column: u32, row: u32) -> Rect {
        Rect::new_from_x_y(
            column as f64 * self.frame.width,
            row as f64 * self.frame.height,
            self.frame.width,
            self.frame.height,
        )
    }
}
