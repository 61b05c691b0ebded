use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persisted difficulty preference, scales jump height and enemy density
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Impossible,
}

impl Difficulty {
    /// localStorage key the preference is stored under
    pub const STORAGE_KEY: &'static str = "difficulty";

    /// Hazards kill the player on every difficulty except easy
    pub fn is_lethal(self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "impossible" => Ok(Difficulty::Impossible),
            other => Err(anyhow!("unknown difficulty '{}'", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        };
        f.write_str(name)
    }
}

/// Jump height as a fraction of the floor threshold, per difficulty
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JumpFractions {
    pub easy: f64,
    pub normal: f64,
    /// hard and anything harder
    pub hard: f64,
    /// launching from a jump platform, any difficulty
    pub platform: f64,
}

impl Default for JumpFractions {
    fn default() -> Self {
        JumpFractions {
            easy: 0.50,
            normal: 0.40,
            hard: 0.30,
            platform: 0.15,
        }
    }
}

/// Gameplay tunables. Every field has a default so a partial `config.json`
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// pixels per tick while falling
    pub gravity: f64,
    pub player_speed: f64,
    /// speed multiplier while the dash key is held
    pub dash_multiplier: f64,
    pub jump: JumpFractions,
    /// x the player is pushed back to when leaving the left edge
    pub left_clamp: f64,
    /// background height as a fraction of the viewport height, sets the floor
    pub background_ratio: f64,
    /// ticks between animation frames
    pub animation_rate: u32,

    // -- delayed effects, milliseconds of game clock --
    pub hazard_delay_ms: f64,
    pub respawn_delay_ms: f64,
    pub hazard_cooldown_ms: f64,
    pub tube_pause_ms: f64,
    pub tube_exit_ms: f64,
    pub invincibility_ms: f64,

    /// horizontal push on easy instead of dying
    pub easy_nudge: f64,
    pub coin_value: u32,
    pub goomba_bounce: f64,
    pub flying_goomba_bounce: f64,
    pub enemy_speed: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            gravity: 3.0,
            player_speed: 2.0,
            dash_multiplier: 3.0,
            jump: JumpFractions::default(),
            left_clamp: 1.0,
            background_ratio: 0.9,
            animation_rate: 6,
            hazard_delay_ms: 50.0,
            respawn_delay_ms: 900.0,
            hazard_cooldown_ms: 1000.0,
            tube_pause_ms: 1000.0,
            tube_exit_ms: 1000.0,
            invincibility_ms: 2000.0,
            easy_nudge: 10.0,
            coin_value: 5,
            goomba_bounce: 100.0,
            flying_goomba_bounce: 250.0,
            enemy_speed: 1.0,
        }
    }
}

impl GameConfig {
    pub const PATH: &'static str = "config.json";

    /// Fraction of `bottom` the player rises when jumping off the floor
    pub fn floor_jump_fraction(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.jump.easy,
            Difficulty::Normal => self.jump.normal,
            Difficulty::Hard | Difficulty::Impossible => self.jump.hard,
        }
    }
}
