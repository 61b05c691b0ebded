use crate::collision::{CollisionData, Touch};
use crate::context::{LevelTransition, SimulationContext, Sound, Viewport};
use crate::engine::{Canvas, Pose};
use crate::object::character::Character;
use crate::object::{
    draw_entity, rescale, scaled_size, Collidable, Drawable, Entity, GameObject, ObjectTag,
    Updatable,
};
use crate::schedule::ScheduledEvent;
use crate::sprite::state::{
    jump_height, Floor, LaunchSource, OnPlatform, PlatformRef, PlayerContext, PlayerState,
};
use crate::sprite::{AnimationTable, Key};
use std::collections::HashSet;

/// ELI5:
/// ┌──────────────── State Transition Flow ──────────────────┐
/// │  From State  →  Event    →  To State                    │
/// ├─────────────────────────────────────────────────────────┤
/// │  Floor       →  Land     →  OnPlatform                  │
/// │  OnPlatform  →  Land     →  OnPlatform (other platform) │
/// │  OnPlatform  →  StepOff  →  Floor                       │
/// │  OnPlatform  →  Jump     →  Floor                       │
/// │  Floor       →  Jump     →  Floor (gravity on)          │
/// └─────────────────────────────────────────────────────────┘
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Land(PlatformRef),
    StepOff,
    Jump,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum PlayerStateMachine {
    Floor(PlayerState<Floor>),
    OnPlatform(PlayerState<OnPlatform>),
}

impl From<PlayerState<Floor>> for PlayerStateMachine {
    fn from(state: PlayerState<Floor>) -> Self {
        PlayerStateMachine::Floor(state)
    }
}

impl From<PlayerState<OnPlatform>> for PlayerStateMachine {
    fn from(state: PlayerState<OnPlatform>) -> Self {
        PlayerStateMachine::OnPlatform(state)
    }
}

impl PlayerStateMachine {
    // consumes the old state, so a stale platform can not outlive the
    // transition that left it
    fn transition(self, event: Event) -> Self {
        use PlayerStateMachine::*;
        match (self, event) {
            (Floor(state), Event::Land(platform)) => state.land_on(platform).into(),
            (OnPlatform(state), Event::Land(platform)) => state.move_to(platform).into(),
            (OnPlatform(state), Event::StepOff) => state.step_off().into(),
            (OnPlatform(state), Event::Jump) => state.jump().into(),
            (Floor(state), Event::Jump) => state.jump().into(),
            // stepping off the floor means nothing
            _ => self,
        }
    }

    fn context(&self) -> &PlayerContext {
        match self {
            PlayerStateMachine::Floor(state) => state.context(),
            PlayerStateMachine::OnPlatform(state) => state.context(),
        }
    }

    fn context_mut(&mut self) -> &mut PlayerContext {
        match self {
            PlayerStateMachine::Floor(state) => state.context_mut(),
            PlayerStateMachine::OnPlatform(state) => state.context_mut(),
        }
    }

    fn platform(&self) -> Option<&PlatformRef> {
        match self {
            PlayerStateMachine::OnPlatform(state) => Some(state.object()),
            PlayerStateMachine::Floor(_) => None,
        }
    }
}

/// The keyboard driven character. One per gameplay level.
pub struct Player {
    entity: Entity,
    character: Character,
    state: PlayerStateMachine,
    animations: AnimationTable,
    scale_size: f64,
    pressed: HashSet<Key>,
    /// last horizontal key, decides idle and jump facing
    direction: Key,
    // per-tick collision bookkeeping
    platform_contact: bool,
    // one-shot guards for deferred effects
    in_tube: bool,
    is_dying: bool,
    timer: bool,
    pose: Pose,
}

impl Player {
    /// `entity` arrives sized; the player starts standing on the floor line
    pub fn new(
        mut entity: Entity,
        scale_size: f64,
        animations: AnimationTable,
        ctx: &SimulationContext,
    ) -> Self {
        let character = Character::new(
            &ctx.viewport,
            entity.size.height,
            ctx.config.animation_rate,
        );
        entity.position.y = character.bottom;
        entity.speed = ctx.config.player_speed;

        let mut player = Player {
            entity,
            character,
            state: PlayerState::<Floor>::new().into(),
            animations,
            scale_size,
            pressed: HashSet::new(),
            direction: Key::Right,
            platform_contact: false,
            in_tube: false,
            is_dying: false,
            timer: false,
            pose: Pose::default(),
        };
        player.set_animation(Key::Right);
        player
    }

    pub fn context(&self) -> &PlayerContext {
        self.state.context()
    }

    pub fn is_on_platform(&self) -> bool {
        matches!(self.state, PlayerStateMachine::OnPlatform(_))
    }

    pub fn platform(&self) -> Option<&PlatformRef> {
        self.state.platform()
    }

    pub fn direction(&self) -> Key {
        self.direction
    }

    pub fn is_dying(&self) -> bool {
        self.is_dying
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// y of the floor line for this player
    pub fn floor(&self) -> f64 {
        self.character.bottom
    }

    fn is_active(&self, key: Key) -> bool {
        self.pressed.contains(&key) && !self.state.context().idle
    }

    /// Point the sprite at the row for `key`. Keys without an animation are
    /// ignored.
    fn set_animation(&mut self, key: Key) {
        if key.is_horizontal() {
            self.direction = key;
        }
        let animation = match self.animations.get(key, self.direction) {
            Some(animation) => *animation,
            None => return,
        };
        let frame = &mut self.entity.frame;
        frame.row = animation.row;
        frame.min = animation.min;
        frame.max = animation.frames;
        if self.state.context().idle {
            if let Some(idle) = animation.idle_frame {
                frame.column = idle.column;
                frame.min = idle.frames;
            }
        }
    }

    // ==================== Input ====================
    pub fn key_down(&mut self, name: &str, ctx: &mut SimulationContext) {
        let key = match Key::from_key(name) {
            Some(key) => key,
            None => return,
        };
        if self.pressed.insert(key) {
            // last pressed wins, the older direction is forgotten until it
            // is pressed again
            if let Some(opposite) = key.opposite() {
                self.pressed.remove(&opposite);
            }
            self.state.context_mut().idle = false;
            self.set_animation(key);
        }
        match key {
            Key::Dash => ctx.flags.dash = true,
            Key::Left if self.entity.position.x > 2.0 => ctx.parallax.scroll(-1.0),
            Key::Right => ctx.parallax.scroll(1.0),
            _ => {}
        }
    }

    pub fn key_up(&mut self, name: &str, ctx: &mut SimulationContext) {
        let key = match Key::from_key(name) {
            Some(key) => key,
            None => return,
        };
        self.pressed.remove(&key);
        if self.pressed.is_empty() {
            self.state.context_mut().idle = true;
            self.set_animation(self.direction);
        }
        match key {
            Key::Dash => {
                ctx.flags.dash = false;
                ctx.parallax.stop();
            }
            Key::Left | Key::Right => ctx.parallax.stop(),
            Key::Jump => {}
        }
    }

    // ==================== Update steps ====================
    fn take_bounce(&mut self, ctx: &mut SimulationContext) {
        if ctx.flags.goomba_bounce {
            ctx.flags.goomba_bounce = false;
            self.entity.position.y -= ctx.config.goomba_bounce;
        }
        if ctx.flags.goomba_bounce_high {
            ctx.flags.goomba_bounce_high = false;
            self.entity.position.y -= ctx.config.flying_goomba_bounce;
        }
    }

    fn check_platform_edge(&mut self) {
        let center_x = self.entity.rect().center().x;
        if let Some(platform) = self.state.platform() {
            if !platform.spans(center_x) {
                self.state = self.state.transition(Event::StepOff);
            }
        }
    }

    fn walk(&mut self, ctx: &SimulationContext) {
        let movement = self.state.context().movement;
        let speed = if self.is_active(Key::Dash) {
            self.entity.speed * ctx.config.dash_multiplier
        } else {
            self.entity.speed
        };
        if self.is_active(Key::Left) && movement.left {
            self.entity.position.x -= speed;
        }
        if self.is_active(Key::Right) && movement.right {
            self.entity.position.x += speed;
        }
    }

    fn try_jump(&mut self, ctx: &mut SimulationContext) {
        let context = *self.state.context();
        let grounded = context.gravity_enabled && self.character.is_on_floor(&self.entity);
        let resting = !context.movement.down;
        if !grounded && !resting {
            return;
        }
        self.set_animation(self.direction);
        if !self.is_active(Key::Jump) {
            return;
        }

        let source = if grounded {
            LaunchSource::Floor
        } else {
            LaunchSource::Platform
        };
        ctx.play(Sound::PlayerJump);
        self.entity.position.y -= jump_height(
            &ctx.config.jump,
            ctx.difficulty,
            self.character.bottom,
            source,
        );
        self.state = self.state.transition(Event::Jump);
        self.set_animation(Key::Jump);
    }

    fn clamp_to_screen(&mut self, ctx: &mut SimulationContext) {
        let x = self.entity.position.x;
        if x < 0.0 {
            self.entity.position.x = ctx.config.left_clamp;
            ctx.parallax.stop();
        } else if x >= ctx.viewport.inner_width {
            self.entity.position.x = ctx.viewport.inner_width - 1.0;
            ctx.parallax.stop();
        }
    }

    // ==================== Collision reactions ====================
    fn block_side(&mut self, touch: &Touch) {
        let movement = &mut self.state.context_mut().movement;
        if touch.left {
            movement.right = false;
        }
        if touch.right {
            movement.left = false;
        }
    }

    fn platform_action(&mut self, collision: &CollisionData) {
        let touch = collision.this();
        if touch.is_side() {
            self.block_side(touch);
            return;
        }
        let other = collision.other_rect;
        let platform = PlatformRef {
            slot: collision.other_slot,
            left: other.left(),
            right: other.right(),
            top: other.top(),
        };
        if !touch.top || !platform.spans(self.entity.rect().center().x) {
            return;
        }

        match self.state {
            PlayerStateMachine::Floor(_) => {
                // sink a pixel in so the contact keeps being reported
                self.entity.position.y = platform.top - self.entity.size.height + 1.0;
                self.state = self.state.transition(Event::Land(platform));
                self.set_animation(self.direction);
            }
            PlayerStateMachine::OnPlatform(state) if state.object().slot != platform.slot => {
                self.state = self.state.transition(Event::Land(platform));
            }
            PlayerStateMachine::OnPlatform(_) => {}
        }
        self.platform_contact = true;
    }

    fn obstacle_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        let touch = collision.this();
        if touch.is_side() {
            self.block_side(touch);
            return;
        }
        if touch.top && !self.in_tube && !self.is_on_platform() {
            self.entity.position.x = collision.new_x;
            self.state.context_mut().gravity_enabled = false;
            self.in_tube = true;
            ctx.schedule(ctx.config.tube_pause_ms, ScheduledEvent::TubeGravity);
        }
    }

    fn hazard_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        if !collision.this().is_side()
            || ctx.flags.invincible
            || self.timer
            || ctx.is_scheduled(ScheduledEvent::HazardStrike)
        {
            return;
        }
        ctx.schedule(ctx.config.hazard_delay_ms, ScheduledEvent::HazardStrike);
    }

    fn hazard_strike(&mut self, ctx: &mut SimulationContext) {
        if self.timer {
            return;
        }
        self.timer = true;
        if ctx.difficulty.is_lethal() {
            self.pose.rotated = true;
            ctx.play(Sound::PlayerDeath);
            if !self.is_dying {
                self.is_dying = true;
                ctx.schedule(ctx.config.respawn_delay_ms, ScheduledEvent::Respawn);
            }
        } else {
            self.entity.position.x += ctx.config.easy_nudge;
            ctx.schedule(ctx.config.hazard_cooldown_ms, ScheduledEvent::HazardCooldown);
        }
    }
}

impl Updatable for Player {
    fn update(&mut self, ctx: &mut SimulationContext) {
        self.character.animate(&mut self.entity.frame);
        self.take_bounce(ctx);
        self.check_platform_edge();

        let context = *self.state.context();
        if context.gravity_enabled && context.movement.down {
            self.character.fall(&mut self.entity, ctx.config.gravity);
        }

        self.walk(ctx);
        self.try_jump(ctx);
        // side blocks hold for one movement step, the next pass re-applies them
        self.state.context_mut().release_sides();
        self.clamp_to_screen(ctx);
        self.pose.inverted = ctx.flags.dash || ctx.flags.invincible;
    }
}

impl Collidable for Player {
    fn collision_action(&mut self, collision: &CollisionData, ctx: &mut SimulationContext) {
        match collision.other().tag {
            ObjectTag::JumpPlatform => self.platform_action(collision),
            tag if tag.is_obstacle() => self.obstacle_action(collision, ctx),
            tag if tag.is_hazard() => self.hazard_action(collision, ctx),
            _ => {}
        }
    }

    fn after_collisions(&mut self, _ctx: &mut SimulationContext) {
        if self.is_on_platform() && !self.platform_contact {
            self.state = self.state.transition(Event::StepOff);
        }
        self.platform_contact = false;
    }
}

impl Drawable for Player {
    fn draw(&self, canvas: &dyn Canvas) {
        draw_entity(&self.entity, canvas, self.pose);
    }
}

impl GameObject for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn resize(&mut self, old: &Viewport, new: &Viewport) {
        let on_floor = self.character.is_on_floor(&self.entity);
        let size = scaled_size(self.entity.sprite.frame, new, self.scale_size);
        self.entity.size = size;
        self.entity.position.x = rescale(self.entity.position.x, old.inner_width, new.inner_width);
        self.character.resize(new, size.height);
        if on_floor {
            self.entity.position.y = self.character.bottom;
        } else {
            self.entity.position.y = rescale(self.entity.position.y, old.bottom, new.bottom);
            self.character.clamp_to_floor(&mut self.entity);
        }
    }

    fn on_scheduled(&mut self, event: ScheduledEvent, ctx: &mut SimulationContext) {
        match event {
            ScheduledEvent::HazardStrike => self.hazard_strike(ctx),
            ScheduledEvent::HazardCooldown => self.timer = false,
            ScheduledEvent::Respawn => {
                log!("player: respawning in level '{}'", ctx.level_tag());
                ctx.request_transition(LevelTransition::Restart);
            }
            ScheduledEvent::TubeGravity => {
                self.state.context_mut().gravity_enabled = true;
                ctx.schedule(ctx.config.tube_exit_ms, ScheduledEvent::TubeExit);
            }
            ScheduledEvent::TubeExit => {
                self.entity.position.x = ctx.viewport.inner_width + 1.0;
            }
            ScheduledEvent::InvincibilityEnd => {}
        }
    }

    fn as_player(&self) -> Option<&Player> {
        Some(self)
    }

    fn as_player_mut(&mut self) -> Option<&mut Player> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::check;
    use crate::config::Difficulty;
    use crate::testutils;
    use approx::assert_relative_eq;

    fn tick(player: &mut Player, ctx: &mut SimulationContext) {
        player.update(ctx);
        player.after_collisions(ctx);
    }

    fn collide(player: &mut Player, other: &Entity, ctx: &mut SimulationContext) {
        if let Some(collision) = check(player.entity(), other) {
            player.collision_action(&collision, ctx);
        }
    }

    #[test]
    fn walking_right_for_one_frame() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 0.0);
        let row = testutils::animation_table().right.row;

        player.key_down("d", &mut ctx);
        tick(&mut player, &mut ctx);

        assert_relative_eq!(player.entity().position.x, ctx.config.player_speed);
        assert_eq!(player.direction(), Key::Right);
        assert_eq!(player.entity().frame.row, row);
        assert_relative_eq!(ctx.parallax.hills, 0.4);
    }

    #[test]
    fn dash_triples_speed_and_inverts_the_sprite() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("a", &mut ctx);
        player.key_down("s", &mut ctx);
        tick(&mut player, &mut ctx);

        assert_relative_eq!(player.entity().position.x, 94.0);
        assert!(player.pose().inverted);
        assert!(ctx.flags.dash);
    }

    #[test]
    fn easy_floor_jump_is_half_the_floor_line() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        assert_relative_eq!(player.floor(), 400.0);

        player.key_down("w", &mut ctx);
        tick(&mut player, &mut ctx);

        assert_relative_eq!(player.entity().position.y, 200.0);
        assert!(player.context().gravity_enabled);
        assert_eq!(ctx.drain_sounds(), vec![Sound::PlayerJump]);
    }

    #[test]
    fn hard_floor_jump_is_shorter() {
        let mut ctx = testutils::context(Difficulty::Hard);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("w", &mut ctx);
        tick(&mut player, &mut ctx);

        assert_relative_eq!(player.entity().position.y, 400.0 - 0.30 * 400.0);
    }

    #[test]
    fn no_jump_while_airborne() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        player.entity_mut().position.y = 300.0;

        player.key_down("w", &mut ctx);
        tick(&mut player, &mut ctx);

        // only gravity
        assert_relative_eq!(player.entity().position.y, 303.0);
    }

    #[test]
    fn left_edge_clamps_and_stops_parallax() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 0.0);
        ctx.parallax.scroll(-1.0);
        player.entity_mut().position.x = -5.0;

        tick(&mut player, &mut ctx);

        assert_relative_eq!(player.entity().position.x, 1.0);
        assert_relative_eq!(ctx.parallax.hills, 0.0);
    }

    #[test]
    fn right_edge_keeps_the_player_on_screen() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 799.0);

        player.key_down("d", &mut ctx);
        tick(&mut player, &mut ctx);

        assert!(player.entity().position.x < ctx.viewport.inner_width);
    }

    #[test]
    fn last_pressed_direction_wins() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("a", &mut ctx);
        player.key_down("d", &mut ctx);
        tick(&mut player, &mut ctx);
        assert_relative_eq!(player.entity().position.x, 102.0);

        // 'a' is still physically down but was forgotten
        player.key_up("d", &mut ctx);
        tick(&mut player, &mut ctx);
        assert_relative_eq!(player.entity().position.x, 102.0);
        assert!(player.context().idle);
    }

    #[test]
    fn repeated_key_down_is_a_no_op() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("d", &mut ctx);
        player.key_down("d", &mut ctx);
        player.key_up("d", &mut ctx);

        assert!(player.context().idle);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("ArrowUp", &mut ctx);
        tick(&mut player, &mut ctx);

        assert!(player.context().idle);
        assert_relative_eq!(player.entity().position.x, 100.0);
    }

    #[test]
    fn idle_frame_pins_the_column() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);

        player.key_down("d", &mut ctx);
        player.key_up("d", &mut ctx);

        let idle = testutils::animation_table().right.idle_frame.unwrap();
        assert_eq!(player.entity().frame.column, idle.column);
        assert_eq!(player.entity().frame.min, idle.frames);
    }

    #[test]
    fn lands_on_a_platform_then_walks_off_its_edge() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        // falling onto a block whose top is at 300
        player.entity_mut().position.y = 262.0;
        let block = testutils::block(7, 90.0, 300.0, 40.0, 40.0);

        collide(&mut player, &block, &mut ctx);
        player.after_collisions(&mut ctx);

        assert!(player.is_on_platform());
        assert_eq!(player.platform().map(|p| p.slot), Some(7));
        assert!(!player.context().gravity_enabled);
        assert!(!player.context().movement.down);
        assert_relative_eq!(player.entity().rect().bottom(), 301.0);

        // standing still keeps the contact
        player.update(&mut ctx);
        collide(&mut player, &block, &mut ctx);
        player.after_collisions(&mut ctx);
        assert!(player.is_on_platform());

        // past the block's x extent
        player.entity_mut().position.x = 140.0;
        player.update(&mut ctx);
        collide(&mut player, &block, &mut ctx);
        player.after_collisions(&mut ctx);

        assert!(!player.is_on_platform());
        assert!(player.platform().is_none());
        assert!(player.context().gravity_enabled);
        assert!(player.context().movement.down);
    }

    #[test]
    fn platform_jump_uses_the_platform_fraction() {
        let mut ctx = testutils::context(Difficulty::Hard);
        let mut player = testutils::player(&ctx, 100.0);
        player.entity_mut().position.y = 262.0;
        let block = testutils::block(7, 90.0, 300.0, 40.0, 40.0);
        collide(&mut player, &block, &mut ctx);
        player.after_collisions(&mut ctx);
        let y = player.entity().position.y;

        player.key_down("w", &mut ctx);
        player.update(&mut ctx);

        assert_relative_eq!(player.entity().position.y, y - 0.15 * 400.0);
        assert!(!player.is_on_platform());
        assert!(player.context().movement.down);
    }

    #[test]
    fn side_contact_blocks_for_one_step() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 81.0);
        let block = testutils::block(3, 100.0, 420.0, 20.0, 20.0);
        player.key_down("d", &mut ctx);

        collide(&mut player, &block, &mut ctx);
        assert!(!player.context().movement.right);
        player.update(&mut ctx);
        assert_relative_eq!(player.entity().position.x, 81.0);

        // nothing re-applies the block
        player.update(&mut ctx);
        assert_relative_eq!(player.entity().position.x, 83.0);
    }

    #[test]
    fn tube_top_pauses_then_exits_right() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        player.entity_mut().position.y = 262.0;
        let tube = testutils::obstacle(ObjectTag::Tube, 9, 90.0, 300.0, 60.0, 100.0);

        collide(&mut player, &tube, &mut ctx);
        assert_relative_eq!(player.entity().position.x, 110.0);
        assert!(!player.context().gravity_enabled);
        assert!(ctx.is_scheduled(ScheduledEvent::TubeGravity));

        ctx.clock.advance(ctx.config.tube_pause_ms);
        for event in ctx.take_due_events() {
            player.on_scheduled(event, &mut ctx);
        }
        assert!(player.context().gravity_enabled);

        ctx.clock.advance(ctx.config.tube_exit_ms);
        for event in ctx.take_due_events() {
            player.on_scheduled(event, &mut ctx);
        }
        assert!(player.entity().position.x > ctx.viewport.inner_width);
    }

    #[test]
    fn hazard_on_normal_schedules_one_respawn() {
        let mut ctx = testutils::context(Difficulty::Normal);
        let mut player = testutils::player(&ctx, 81.0);
        let goomba = testutils::obstacle(ObjectTag::Goomba, 4, 100.0, 410.0, 30.0, 30.0);

        collide(&mut player, &goomba, &mut ctx);
        collide(&mut player, &goomba, &mut ctx);
        ctx.clock.advance(ctx.config.hazard_delay_ms);
        let due = ctx.take_due_events();
        assert_eq!(due, vec![ScheduledEvent::HazardStrike]);
        player.on_scheduled(ScheduledEvent::HazardStrike, &mut ctx);
        // a second strike while dying changes nothing
        player.on_scheduled(ScheduledEvent::HazardStrike, &mut ctx);
        collide(&mut player, &goomba, &mut ctx);

        assert!(player.is_dying());
        assert!(player.pose().rotated);
        assert!(!ctx.is_scheduled(ScheduledEvent::HazardStrike));
        assert_eq!(ctx.drain_sounds(), vec![Sound::PlayerDeath]);

        ctx.clock.advance(ctx.config.respawn_delay_ms);
        let due = ctx.take_due_events();
        assert_eq!(due, vec![ScheduledEvent::Respawn]);
        player.on_scheduled(ScheduledEvent::Respawn, &mut ctx);
        assert_eq!(ctx.take_transition(), Some(LevelTransition::Restart));
    }

    #[test]
    fn hazard_on_easy_nudges_and_recovers() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 81.0);
        let goomba = testutils::obstacle(ObjectTag::Goomba, 4, 100.0, 410.0, 30.0, 30.0);

        collide(&mut player, &goomba, &mut ctx);
        ctx.clock.advance(ctx.config.hazard_delay_ms);
        for event in ctx.take_due_events() {
            player.on_scheduled(event, &mut ctx);
        }
        assert_relative_eq!(player.entity().position.x, 91.0);
        assert!(!player.is_dying());

        ctx.clock.advance(ctx.config.hazard_cooldown_ms);
        for event in ctx.take_due_events() {
            player.on_scheduled(event, &mut ctx);
        }
        collide(&mut player, &goomba, &mut ctx);
        assert!(ctx.is_scheduled(ScheduledEvent::HazardStrike));
    }

    #[test]
    fn invincible_player_ignores_hazards() {
        let mut ctx = testutils::context(Difficulty::Hard);
        let mut player = testutils::player(&ctx, 81.0);
        let goomba = testutils::obstacle(ObjectTag::Goomba, 4, 100.0, 410.0, 30.0, 30.0);
        ctx.flags.invincible = true;

        collide(&mut player, &goomba, &mut ctx);

        assert!(!ctx.is_scheduled(ScheduledEvent::HazardStrike));
    }

    #[test]
    fn stomp_bounce_is_consumed_once() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        ctx.flags.goomba_bounce = true;

        player.update(&mut ctx);

        assert!(!ctx.flags.goomba_bounce);
        // hop first, then this tick's gravity
        assert_relative_eq!(player.entity().position.y, 300.0 + ctx.config.gravity);
    }

    #[test]
    fn movement_down_tracks_the_state() {
        let mut ctx = testutils::context(Difficulty::Easy);
        let mut player = testutils::player(&ctx, 100.0);
        let block = testutils::block(2, 90.0, 300.0, 40.0, 40.0);
        player.key_down("d", &mut ctx);
        player.entity_mut().position.y = 262.0;

        for _ in 0..40 {
            player.update(&mut ctx);
            collide(&mut player, &block, &mut ctx);
            player.after_collisions(&mut ctx);
            assert_eq!(player.is_on_platform(), !player.context().movement.down);
        }
        // walked off the block and back down to the floor
        assert!(!player.is_on_platform());
    }
}
