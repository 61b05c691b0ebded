/// All code relating to individual player states is behind this module and
/// enforces unrepresentable states : a `PlayerState<OnPlatform>` can only be
/// reached through `land_on`, and it is the only state carrying a platform.
/// - PUBLIC  : PlayerState, PlayerContext, Movement, state markers
/// - PRIVATE : the context inside a state is only changed by its methods
use crate::config::{Difficulty, JumpFractions};

/// Directions the player may currently move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Movement {
    fn free() -> Self {
        Movement {
            up: true,
            down: true,
            left: true,
            right: true,
        }
    }
}

/// The platform underfoot, as last measured by the collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformRef {
    pub slot: usize,
    pub left: f64,
    pub right: f64,
    pub top: f64,
}

impl PlatformRef {
    pub fn spans(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Where a jump starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSource {
    Floor,
    Platform,
}

/// Jump height in pixels (the player moves up by this much, Δy = -height).
/// Only difficulty, the floor threshold and the launch source matter.
pub fn jump_height(
    fractions: &JumpFractions,
    difficulty: Difficulty,
    bottom: f64,
    source: LaunchSource,
) -> f64 {
    let fraction = match (source, difficulty) {
        (LaunchSource::Platform, _) => fractions.platform,
        (LaunchSource::Floor, Difficulty::Easy) => fractions.easy,
        (LaunchSource::Floor, Difficulty::Normal) => fractions.normal,
        (LaunchSource::Floor, Difficulty::Hard | Difficulty::Impossible) => fractions.hard,
    };
    bottom * fraction
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Floor;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OnPlatform {
    object: PlatformRef,
}

/// Shared data for every state :
/// - control : idle, movement flags
/// - physics : gravity switch
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerContext {
    pub idle: bool,
    pub gravity_enabled: bool,
    pub movement: Movement,
}

impl PlayerContext {
    /// Side contacts clear a direction for one movement step only
    pub fn release_sides(&mut self) {
        self.movement.left = true;
        self.movement.right = true;
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerState<S> {
    context: PlayerContext,
    state: S,
}

/// generic methods shared between all states
impl<S> PlayerState<S> {
    pub fn context(&self) -> &PlayerContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PlayerContext {
        &mut self.context
    }
}

impl PlayerState<Floor> {
    pub fn new() -> Self {
        PlayerState {
            context: PlayerContext {
                idle: true,
                gravity_enabled: true,
                movement: Movement::free(),
            },
            state: Floor,
        }
    }

    pub fn land_on(self, object: PlatformRef) -> PlayerState<OnPlatform> {
        let mut context = self.context;
        context.gravity_enabled = false;
        context.movement.down = false;
        context.release_sides();
        PlayerState {
            context,
            state: OnPlatform { object },
        }
    }

    /// Jumping off the floor keeps the floor state, gravity pulls back down
    pub fn jump(mut self) -> Self {
        self.context.gravity_enabled = true;
        self
    }
}

impl Default for PlayerState<Floor> {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState<OnPlatform> {
    pub fn object(&self) -> &PlatformRef {
        &self.state.object
    }

    /// Same state, different (or re-measured) platform underfoot
    pub fn move_to(mut self, object: PlatformRef) -> Self {
        self.state.object = object;
        self
    }

    pub fn step_off(self) -> PlayerState<Floor> {
        let mut context = self.context;
        context.gravity_enabled = true;
        context.movement.down = true;
        PlayerState {
            context,
            state: Floor,
        }
    }

    pub fn jump(self) -> PlayerState<Floor> {
        self.step_off()
    }
}
