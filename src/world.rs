use crate::collision::collision_pass;
use crate::context::{SimulationContext, Viewport};
use crate::engine::input::KeyPress;
use crate::engine::Canvas;
use crate::object::GameObject;
use crate::schedule::{Millis, ScheduledEvent};
use crate::sprite::player::Player;

/// The active object list of the running level. Only the world adds or
/// removes entries; objects change nothing but themselves and the context.
#[derive(Default)]
pub struct World {
    objects: Vec<Box<dyn GameObject>>,
}

impl World {
    pub fn new(objects: Vec<Box<dyn GameObject>>) -> Self {
        World { objects }
    }

    pub fn objects(&self) -> &[Box<dyn GameObject>] {
        &self.objects
    }

    pub fn player(&self) -> Option<&Player> {
        self.objects.iter().find_map(|object| object.as_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.objects
            .iter_mut()
            .find_map(|object| object.as_player_mut())
    }

    /// Key events of this frame, in arrival order
    pub fn handle_keys(&mut self, events: &[KeyPress], ctx: &mut SimulationContext) {
        if let Some(player) = self.player_mut() {
            for event in events {
                match event {
                    KeyPress::KeyDown(key) => player.key_down(key, ctx),
                    KeyPress::KeyUp(key) => player.key_up(key, ctx),
                }
            }
        }
    }

    /// One simulation step : updates, collision pass, due scheduled events,
    /// then removal of destroyed objects
    pub fn tick(&mut self, ctx: &mut SimulationContext, delta: Millis) {
        ctx.clock.advance(delta);

        for object in self.objects.iter_mut() {
            if !object.entity().is_destroyed() {
                object.update(ctx);
            }
        }

        collision_pass(&mut self.objects, ctx);
        for object in self.objects.iter_mut() {
            object.after_collisions(ctx);
        }

        for event in ctx.take_due_events() {
            self.dispatch(event, ctx);
        }

        self.objects.retain(|object| !object.entity().is_destroyed());
    }

    fn dispatch(&mut self, event: ScheduledEvent, ctx: &mut SimulationContext) {
        match event {
            ScheduledEvent::InvincibilityEnd => ctx.end_invincibility_if_due(),
            _ => {
                for object in self.objects.iter_mut() {
                    object.on_scheduled(event, ctx);
                }
            }
        }
    }

    pub fn draw(&self, canvas: &dyn Canvas) {
        for object in self.objects.iter() {
            object.draw(canvas);
        }
    }

    pub fn resize(&mut self, old: &Viewport, new: &Viewport) {
        for object in self.objects.iter_mut() {
            object.resize(old, new);
        }
    }
}
