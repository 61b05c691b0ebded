use crate::context::{LevelTransition, SimulationContext, Sound, Viewport};
use crate::engine::input::KeyPress;
use crate::engine::Canvas;
use crate::level::{validate_levels, Completion, LevelDescriptor};
use crate::object::GameObject;
use crate::schedule::Millis;
use crate::world::World;
use anyhow::{anyhow, Result};

/// ┌──────────────── Level Flow ─────────────────────────────┐
/// │  start ──any key──► level 1 ──off screen──► level 2 ... │
/// │                       ▲   │                             │
/// │                       └───┘ respawn (same level)        │
/// │  ... end ──any key──► start                             │
/// └─────────────────────────────────────────────────────────┘
pub struct LevelLoader {
    levels: Vec<LevelDescriptor>,
    current: usize,
    world: World,
    ctx: SimulationContext,
}

impl LevelLoader {
    /// Validates every level up front and starts the first one
    pub fn new(levels: Vec<LevelDescriptor>, ctx: SimulationContext) -> Result<Self> {
        validate_levels(&levels)?;
        let mut loader = LevelLoader {
            levels,
            current: 0,
            world: World::default(),
            ctx,
        };
        loader.transition_to_level(0)?;
        Ok(loader)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Throw away the running level and build `index` from its descriptor
    pub fn transition_to_level(&mut self, index: usize) -> Result<()> {
        let level = self
            .levels
            .get(index)
            .ok_or_else(|| anyhow!("no level at index {}", index))?;
        self.ctx.begin_level(&level.tag);
        self.world = World::new(level.instantiate(&self.ctx)?);
        self.current = index;
        log!("loader: level {} '{}' (score {})", index, level.tag, self.ctx.session.score);
        Ok(())
    }

    /// One frame of input plus one simulation step, then any level change
    /// it asked for
    pub fn tick(&mut self, events: &[KeyPress], delta: Millis) -> Result<()> {
        self.ctx.any_key = events
            .iter()
            .any(|event| matches!(event, KeyPress::KeyDown(_)));
        self.world.handle_keys(events, &mut self.ctx);
        self.world.tick(&mut self.ctx, delta);

        if self.is_complete() {
            self.ctx.request_transition(LevelTransition::Advance);
        }
        match self.ctx.take_transition() {
            Some(LevelTransition::Restart) => self.transition_to_level(self.current),
            Some(LevelTransition::Advance) => {
                self.transition_to_level((self.current + 1) % self.levels.len())
            }
            None => Ok(()),
        }
    }

    fn is_complete(&self) -> bool {
        let completion = match self.levels.get(self.current) {
            Some(level) => level.completion,
            None => return false,
        };
        match completion {
            Completion::PlayerOffScreen => self
                .world
                .player()
                .map_or(false, |player| {
                    player.entity().position.x > self.ctx.viewport.inner_width
                }),
            Completion::AnyKey => self.ctx.any_key,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let old = self.ctx.viewport;
        if old == viewport {
            return;
        }
        self.ctx.viewport = viewport;
        self.world.resize(&old, &viewport);
    }

    pub fn draw(&self, canvas: &dyn Canvas) {
        self.world.draw(canvas);
    }

    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        self.ctx.drain_sounds()
    }
}
