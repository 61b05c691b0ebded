//! Level descriptors : the ordered object lists that make up each level,
//! validated once at load and turned into live objects on every (re)start.

use crate::config::Difficulty;
use crate::context::SimulationContext;
use crate::engine::{Point, Rect, Size};
use crate::object::background::{Background, Scroll};
use crate::object::collectible::{Coin, Mushroom};
use crate::object::enemy::Enemy;
use crate::object::platform::Platform;
use crate::object::{scaled_size, Entity, GameObject, Layout, ObjectTag, Placement};
use crate::sprite::player::Player;
use crate::sprite::{Animation, AnimationTable, Sprite};
use anyhow::{anyhow, bail, Context, Error, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

// drift speed of a parallax layer that names none
const DEFAULT_DRIFT: f64 = 0.5;

/// Image plus sheet layout of one asset
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetData {
    pub src: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub columns: Option<u32>,
    /// how many of this object side by side fill the viewport width
    #[serde(default)]
    pub scale_size: Option<f64>,
    #[serde(default)]
    pub speed_ratio: Option<f64>,
    #[serde(default)]
    pub animations: HashMap<String, Animation>,
}

impl AssetData {
    /// Size of one sheet cell
    pub fn cell_size(&self) -> Size {
        Size {
            width: self.width / self.columns.unwrap_or(1).max(1) as f64,
            height: self.height / self.rows.unwrap_or(1).max(1) as f64,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            bail!("data.width must be positive, got {}", self.width);
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            bail!("data.height must be positive, got {}", self.height);
        }
        if self.rows == Some(0) || self.columns == Some(0) {
            bail!("data.rows and data.columns must be at least 1");
        }
        if let Some(scale) = self.scale_size {
            if !(scale.is_finite() && scale > 0.0) {
                bail!("data.scaleSize must be positive, got {}", scale);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub name: String,
    pub id: String,
    pub class: String,
    pub data: AssetData,
    #[serde(default)]
    pub x_percentage: Option<f64>,
    #[serde(default)]
    pub y_percentage: Option<f64>,
    #[serde(default)]
    pub min_position: Option<f64>,
    /// only built on these difficulties; every difficulty when absent
    #[serde(default)]
    pub difficulties: Option<Vec<Difficulty>>,
}

impl ObjectDescriptor {
    pub fn is_included(&self, difficulty: Difficulty) -> bool {
        self.difficulties
            .as_ref()
            .map_or(true, |difficulties| difficulties.contains(&difficulty))
    }

    fn placement(&self, default_y: f64) -> Placement {
        Placement {
            x_percentage: self.x_percentage.unwrap_or(0.0),
            y_percentage: self.y_percentage.unwrap_or(default_y),
        }
    }

    fn validate(&self) -> Result<ObjectClass> {
        let class: ObjectClass = self.class.parse()?;
        let tag: ObjectTag = self.id.parse()?;
        if !class.accepts(tag) {
            bail!("class '{}' can not have id '{}'", self.class, self.id);
        }
        for (field, value) in [
            ("xPercentage", self.x_percentage),
            ("yPercentage", self.y_percentage),
            ("minPosition", self.min_position),
        ] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    bail!("{} must be within [0, 1], got {}", field, value);
                }
            }
        }
        self.data.validate()?;
        if class == ObjectClass::Player {
            AnimationTable::from_descriptors(&self.data.animations)
                .context("player animations")?;
        }
        Ok(class)
    }
}

/// Kind of game object a descriptor builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Background,
    BackgroundStart,
    BackgroundParallax,
    Platform,
    JumpPlatform,
    BlockPlatform,
    Tube,
    FinishLine,
    Coin,
    Goomba,
    FlyingGoomba,
    Mushroom,
    Player,
}

impl ObjectClass {
    fn accepts(&self, tag: ObjectTag) -> bool {
        use ObjectClass::*;
        match self {
            Background | BackgroundStart | BackgroundParallax => tag == ObjectTag::Background,
            Platform => tag == ObjectTag::Floor,
            JumpPlatform | BlockPlatform => tag == ObjectTag::JumpPlatform,
            Tube => matches!(tag, ObjectTag::Tube | ObjectTag::Tree),
            FinishLine => tag == ObjectTag::FinishLine,
            Coin => tag == ObjectTag::Coin,
            Goomba => tag == ObjectTag::Goomba,
            FlyingGoomba => tag == ObjectTag::FlyingGoomba,
            Mushroom => tag == ObjectTag::Mushroom,
            Player => tag == ObjectTag::Player,
        }
    }

    /// `scale_size` when the asset names none
    fn default_scale(&self) -> f64 {
        use ObjectClass::*;
        match self {
            JumpPlatform | BlockPlatform => 27.0,
            Tube | FinishLine => 10.0,
            Coin => 40.0,
            Goomba | FlyingGoomba => 20.0,
            Mushroom => 30.0,
            Player => 12.0,
            Background | BackgroundStart | BackgroundParallax | Platform => 1.0,
        }
    }
}

impl FromStr for ObjectClass {
    type Err = Error;

    fn from_str(class: &str) -> Result<Self, Self::Err> {
        match class {
            "Background" => Ok(ObjectClass::Background),
            "BackgroundStart" => Ok(ObjectClass::BackgroundStart),
            "BackgroundParallax" => Ok(ObjectClass::BackgroundParallax),
            "Platform" => Ok(ObjectClass::Platform),
            "JumpPlatform" => Ok(ObjectClass::JumpPlatform),
            "BlockPlatform" => Ok(ObjectClass::BlockPlatform),
            "Tube" => Ok(ObjectClass::Tube),
            "FinishLine" => Ok(ObjectClass::FinishLine),
            "Coin" => Ok(ObjectClass::Coin),
            "Goomba" => Ok(ObjectClass::Goomba),
            "FlyingGoomba" => Ok(ObjectClass::FlyingGoomba),
            "Mushroom" => Ok(ObjectClass::Mushroom),
            "Player" | "PlayerHills" | "PlayerGreece" => Ok(ObjectClass::Player),
            other => Err(anyhow!("unknown object class '{}'", other)),
        }
    }
}

/// When a level counts as finished
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    /// the player left past the right edge of the screen
    #[default]
    PlayerOffScreen,
    /// start and end screens, any key continues
    AnyKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelDescriptor {
    pub tag: String,
    #[serde(default)]
    pub completion: Completion,
    pub objects: Vec<ObjectDescriptor>,
}

impl LevelDescriptor {
    pub const PATH: &'static str = "levels.json";

    /// Reject anything that would otherwise fail mid-frame. Errors name the
    /// level, the object index and the offending field.
    pub fn validate(&self) -> Result<()> {
        let mut players = vec![];
        for (index, object) in self.objects.iter().enumerate() {
            let class = object.validate().with_context(|| {
                format!(
                    "level '{}' object {} ('{}')",
                    self.tag, index, object.name
                )
            })?;
            if class == ObjectClass::Player {
                players.push(object);
            }
        }

        match self.completion {
            Completion::PlayerOffScreen => {
                if players.len() != 1 {
                    bail!(
                        "level '{}' needs exactly one player, found {}",
                        self.tag,
                        players.len()
                    );
                }
                if players.iter().any(|player| player.difficulties.is_some()) {
                    bail!(
                        "level '{}' player must not be filtered by difficulty",
                        self.tag
                    );
                }
            }
            Completion::AnyKey if players.len() > 1 => {
                bail!("level '{}' has more than one player", self.tag);
            }
            Completion::AnyKey => {}
        }
        Ok(())
    }

    /// Live objects for the current difficulty, in descriptor order. Each
    /// object's slot is its descriptor index.
    pub fn instantiate(&self, ctx: &SimulationContext) -> Result<Vec<Box<dyn GameObject>>> {
        let mut objects = vec![];
        for (slot, object) in self.objects.iter().enumerate() {
            if !object.is_included(ctx.difficulty) {
                continue;
            }
            let built = build(slot, object, ctx)
                .with_context(|| format!("level '{}' object {}", self.tag, slot))?;
            objects.push(built);
        }
        log!(
            "level '{}': {} of {} objects on {}",
            self.tag,
            objects.len(),
            self.objects.len(),
            ctx.difficulty
        );
        Ok(objects)
    }
}

/// Validate every level; an empty list is an error
pub fn validate_levels(levels: &[LevelDescriptor]) -> Result<()> {
    if levels.is_empty() {
        bail!("no levels to play");
    }
    levels.iter().try_for_each(LevelDescriptor::validate)
}

/// Every image any level uses, once each
pub fn image_sources(levels: &[LevelDescriptor]) -> Vec<String> {
    levels
        .iter()
        .flat_map(|level| level.objects.iter())
        .map(|object| object.data.src.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn build(
    slot: usize,
    object: &ObjectDescriptor,
    ctx: &SimulationContext,
) -> Result<Box<dyn GameObject>> {
    let class: ObjectClass = object.class.parse()?;
    let tag: ObjectTag = object.id.parse()?;
    let frame = object.data.cell_size();
    let sprite = Sprite {
        asset: object.data.src.clone(),
        frame,
    };
    let scale_size = object.data.scale_size.unwrap_or_else(|| class.default_scale());
    let viewport = &ctx.viewport;
    let entity_at = |rect: Rect| Entity::new(&object.name, tag, slot, sprite.clone(), rect);
    let laid_out = |layout: Layout| (entity_at(layout.rect(frame, viewport)), layout);
    let placed = Layout::Placed {
        placement: object.placement(1.0),
        scale_size,
    };

    let built: Box<dyn GameObject> = match class {
        ObjectClass::Background | ObjectClass::BackgroundStart | ObjectClass::BackgroundParallax => {
            let layout = Layout::Backdrop {
                full_screen: class == ObjectClass::BackgroundStart,
            };
            let scroll = match class {
                ObjectClass::BackgroundParallax => Scroll::for_layer(
                    &object.name,
                    object.data.speed_ratio.unwrap_or(DEFAULT_DRIFT),
                ),
                _ => Scroll::Static,
            };
            let (entity, layout) = laid_out(layout);
            Box::new(Background::new(entity, layout, scroll))
        }
        ObjectClass::Platform => {
            let (entity, layout) = laid_out(Layout::Floor);
            Box::new(Platform::new(entity, layout))
        }
        ObjectClass::JumpPlatform | ObjectClass::BlockPlatform | ObjectClass::Tube => {
            let (entity, layout) = laid_out(placed);
            Box::new(Platform::new(entity, layout))
        }
        ObjectClass::FinishLine => {
            let (entity, layout) = laid_out(Layout::Marker {
                placement: object.placement(1.0),
                scale_size,
            });
            Box::new(Platform::new(entity, layout))
        }
        ObjectClass::Coin => {
            let (entity, layout) = laid_out(placed);
            Box::new(Coin::new(entity, layout, ctx))
        }
        ObjectClass::Mushroom => {
            let (entity, layout) = laid_out(placed);
            Box::new(Mushroom::new(entity, layout))
        }
        ObjectClass::Goomba | ObjectClass::FlyingGoomba => {
            let size = scaled_size(frame, viewport, scale_size);
            let x = object.x_percentage.unwrap_or(0.0) * viewport.inner_width;
            Box::new(Enemy::new(
                entity_at(Rect::new(Point { x, y: 0.0 }, size)),
                scale_size,
                object.min_position.unwrap_or(0.0),
                object.y_percentage.unwrap_or(0.5),
                ctx,
            ))
        }
        ObjectClass::Player => {
            let animations = AnimationTable::from_descriptors(&object.data.animations)?;
            let size = scaled_size(frame, viewport, scale_size);
            let x = object.x_percentage.unwrap_or(0.0) * viewport.inner_width;
            Box::new(Player::new(
                entity_at(Rect::new(Point { x, y: 0.0 }, size)),
                scale_size,
                animations,
                ctx,
            ))
        }
    };
    Ok(built)
}
