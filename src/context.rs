use crate::config::{Difficulty, GameConfig};
use crate::schedule::{GameClock, Millis, ScheduledEvent, Scheduler};
use std::collections::HashSet;

/// Viewport geometry in css pixels. `bottom` is the floor line, set by the
/// background height rather than the window height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub inner_width: f64,
    pub inner_height: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Viewport {
    pub fn new(inner_width: f64, inner_height: f64, background_ratio: f64) -> Self {
        Viewport {
            inner_width,
            inner_height,
            top: 0.0,
            bottom: inner_height * background_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    PlayerJump,
    PlayerDeath,
    Coin,
    GoombaDeath,
    PowerUp,
}

/// What the level loader should do once the current tick is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    /// reload the current level from its own descriptor (respawn)
    Restart,
    Advance,
}

/// One-frame signals between objects, consumed by whoever reads them next
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevelFlags {
    /// a goomba was stomped, the player hops
    pub goomba_bounce: bool,
    /// a flying goomba was stomped, the player hops higher
    pub goomba_bounce_high: bool,
    pub invincible: bool,
    pub dash: bool,
}

/// Scroll speeds of the parallax layers, driven by player input
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Parallax {
    pub hills: f64,
    pub mountains: f64,
}

impl Parallax {
    pub const HILLS: f64 = 0.4;
    pub const MOUNTAINS: f64 = 0.1;

    /// `direction` is -1.0 for left, 1.0 for right
    pub fn scroll(&mut self, direction: f64) {
        self.hills = Self::HILLS * direction;
        self.mountains = Self::MOUNTAINS * direction;
    }

    pub fn stop(&mut self) {
        self.hills = 0.0;
        self.mountains = 0.0;
    }
}

/// Survives level restarts and transitions
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub score: u32,
    claimed_coins: HashSet<String>,
}

impl Session {
    pub fn is_claimed(&self, coin_id: &str) -> bool {
        self.claimed_coins.contains(coin_id)
    }

    /// Record the claim and award `value` once; false if already claimed
    pub fn claim_coin(&mut self, coin_id: &str, value: u32) -> bool {
        if !self.claimed_coins.insert(coin_id.to_string()) {
            return false;
        }
        self.score += value;
        true
    }
}

/// Everything objects may read or signal besides their own fields. Passed
/// explicitly into update and collision handling; the level-scoped part is
/// reset by `begin_level`.
#[derive(Debug)]
pub struct SimulationContext {
    pub config: GameConfig,
    pub difficulty: Difficulty,
    pub viewport: Viewport,
    pub session: Session,
    pub clock: GameClock,
    pub flags: LevelFlags,
    pub parallax: Parallax,
    /// some key went down this tick (start / end screens)
    pub any_key: bool,
    level_tag: String,
    scheduler: Scheduler,
    sounds: Vec<Sound>,
    transition: Option<LevelTransition>,
    /// game time the latest invincibility window closes
    invincible_until: Millis,
}

impl SimulationContext {
    pub fn new(config: GameConfig, difficulty: Difficulty, viewport: Viewport) -> Self {
        SimulationContext {
            config,
            difficulty,
            viewport,
            session: Session::default(),
            clock: GameClock::default(),
            flags: LevelFlags::default(),
            parallax: Parallax::default(),
            any_key: false,
            level_tag: String::new(),
            scheduler: Scheduler::new(),
            sounds: vec![],
            transition: None,
            invincible_until: 0.0,
        }
    }

    /// Drop everything scoped to the previous level. Pending scheduled
    /// events die with it; score and claimed coins carry over.
    pub fn begin_level(&mut self, tag: &str) {
        self.level_tag = tag.to_string();
        self.scheduler.clear();
        self.flags = LevelFlags::default();
        self.parallax.stop();
        self.any_key = false;
        self.transition = None;
        self.invincible_until = 0.0;
    }

    pub fn level_tag(&self) -> &str {
        &self.level_tag
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn schedule(&mut self, delay: Millis, event: ScheduledEvent) {
        let now = self.clock.now();
        self.scheduler.schedule(now, delay, event);
    }

    pub fn is_scheduled(&self, event: ScheduledEvent) -> bool {
        self.scheduler.is_pending(event)
    }

    pub fn take_due_events(&mut self) -> Vec<ScheduledEvent> {
        let now = self.clock.now();
        self.scheduler.take_due(now)
    }

    /// Start or extend invincibility to a full window from now. Every grant
    /// schedules its own end; only the one reaching the deadline clears it.
    pub fn grant_invincibility(&mut self) {
        let duration = self.config.invincibility_ms;
        self.flags.invincible = true;
        self.invincible_until = self.now() + duration;
        self.schedule(duration, ScheduledEvent::InvincibilityEnd);
    }

    pub fn end_invincibility_if_due(&mut self) {
        if self.now() >= self.invincible_until {
            self.flags.invincible = false;
        }
    }

    pub fn play(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    /// First request in a tick wins; a death restart is not overridden by a
    /// completion detected later in the same tick
    pub fn request_transition(&mut self, transition: LevelTransition) {
        if self.transition.is_none() {
            self.transition = Some(transition);
        }
    }

    pub fn take_transition(&mut self) -> Option<LevelTransition> {
        self.transition.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SimulationContext {
        SimulationContext::new(
            GameConfig::default(),
            Difficulty::Easy,
            Viewport::new(800.0, 600.0, 0.9),
        )
    }

    #[test]
    fn floor_line_follows_background_ratio() {
        let viewport = Viewport::new(800.0, 600.0, 0.9);
        approx::assert_relative_eq!(viewport.bottom, 540.0);
    }

    #[test]
    fn coin_is_awarded_once() {
        let mut session = Session::default();
        assert!(session.claim_coin("hills#3", 5));
        assert!(!session.claim_coin("hills#3", 5));
        assert_eq!(session.score, 5);
        assert!(session.is_claimed("hills#3"));
    }

    #[test]
    fn begin_level_keeps_session_and_drops_pending_events() {
        let mut ctx = context();
        ctx.session.claim_coin("hills#3", 5);
        ctx.schedule(900.0, ScheduledEvent::Respawn);
        ctx.flags.goomba_bounce = true;
        ctx.request_transition(LevelTransition::Restart);

        ctx.begin_level("hills");

        assert_eq!(ctx.session.score, 5);
        assert!(!ctx.is_scheduled(ScheduledEvent::Respawn));
        assert!(!ctx.flags.goomba_bounce);
        assert_eq!(ctx.take_transition(), None);
        assert_eq!(ctx.level_tag(), "hills");
    }

    #[test]
    fn later_grant_extends_invincibility() {
        let mut ctx = context();
        ctx.grant_invincibility();
        ctx.clock.advance(1500.0);
        ctx.grant_invincibility();

        ctx.clock.advance(500.0);
        assert_eq!(ctx.take_due_events(), vec![ScheduledEvent::InvincibilityEnd]);
        ctx.end_invincibility_if_due();
        assert!(ctx.flags.invincible);

        ctx.clock.advance(1500.0);
        assert_eq!(ctx.take_due_events(), vec![ScheduledEvent::InvincibilityEnd]);
        ctx.end_invincibility_if_due();
        assert!(!ctx.flags.invincible);
    }

    #[test]
    fn first_transition_request_wins() {
        let mut ctx = context();
        ctx.request_transition(LevelTransition::Restart);
        ctx.request_transition(LevelTransition::Advance);
        assert_eq!(ctx.take_transition(), Some(LevelTransition::Restart));
        assert_eq!(ctx.take_transition(), None);
    }
}
