use crate::browser;
use crate::config::{Difficulty, GameConfig};
use crate::context::{SimulationContext, Viewport};
use crate::engine::input::KeyState;
use crate::engine::{self, Canvas, Game, Pose, Rect, Renderer, FRAME_SIZE};
use crate::level::{image_sources, validate_levels, LevelDescriptor};
use crate::loader::LevelLoader;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use futures::join;
use std::collections::HashMap;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌───────────────────── Game Architecture Overview ────────────────────────┐
/// │                                                                         │
/// │                              Update Flow                                │
/// │                                                                         │
/// │    ┌─────────────┐          ┌─────────────┐          ┌─────────────┐    │
/// │    │  engine.rs  │  update  │   game.rs   │   tick   │  loader.rs  │    │
/// │    │  GameLoop   ├─────────►│  Platformer ├─────────►│ LevelLoader │    │
/// │    │             │          │  update()   │          │  tick()     │    │
/// │    └──────┬──────┘          └─────────────┘          └──────┬──────┘    │
/// │           │                                                 │           │
/// │     ┌─────┴──────┐                                    ┌─────┴─────┐     │
/// │     │  KeyState  │  drained KeyPress events           │   World   │     │
/// │     │  Keyboard  ├───────────────────────────────────►│  objects  │     │
/// │     └────────────┘                                    └───────────┘     │
/// │                                                                         │
/// ├──────────────────────── Call Sequence ──────────────────────────────────┤
/// │                                                                         │
/// │  1. GameLoop runs update() once per FRAME_SIZE of elapsed time          │
/// │  2. Platformer follows window resizes, then hands the frame's key       │
/// │     events to the LevelLoader                                           │
/// │  3. LevelLoader ticks the World and applies restart / advance           │
/// │  4. draw() clears the canvas and draws every object in list order       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum Platformer {
    /// resources are still being fetched
    Loading,
    Loaded(Running),
}

/// Everything a running game owns
pub struct Running {
    loader: LevelLoader,
    images: HashMap<String, HtmlImageElement>,
}

impl Platformer {
    pub fn new() -> Self {
        Platformer::Loading
    }

    /// A missing or broken config is not fatal, the defaults are playable
    async fn load_config() -> GameConfig {
        match browser::fetch_json::<GameConfig>(GameConfig::PATH).await {
            Ok(config) => config,
            Err(err) => {
                log!("Platformer: using default config ({:#})", err);
                GameConfig::default()
            }
        }
    }

    async fn load_levels() -> Result<Vec<LevelDescriptor>> {
        browser::fetch_json::<Vec<LevelDescriptor>>(LevelDescriptor::PATH)
            .await
            .with_context(|| format!("Failed to load levels from : {}", LevelDescriptor::PATH))
    }

    async fn load_images(sources: Vec<String>) -> Result<HashMap<String, HtmlImageElement>> {
        let images = try_join_all(sources.iter().map(|source| engine::load_image(source))).await?;
        Ok(sources.into_iter().zip(images).collect())
    }

    fn stored_difficulty() -> Difficulty {
        match browser::local_storage_item(Difficulty::STORAGE_KEY) {
            Ok(Some(stored)) => stored.parse().unwrap_or_else(|err| {
                log!("Platformer: {:#}, playing on {}", err, Difficulty::default());
                Difficulty::default()
            }),
            Ok(None) => Difficulty::default(),
            Err(err) => {
                error!("Platformer: {:#}", err);
                Difficulty::default()
            }
        }
    }

    fn viewport(config: &GameConfig) -> Result<Viewport> {
        let (width, height) = browser::inner_size()?;
        Ok(Viewport::new(width, height, config.background_ratio))
    }
}

impl Default for Platformer {
    fn default() -> Self {
        Platformer::new()
    }
}

#[async_trait(?Send)]
impl Game for Platformer {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            // config and levels are independent, fetch them side by side;
            // images depend on the level list so they come second
            Platformer::Loading => {
                let (config, levels) = join!(Self::load_config(), Self::load_levels());
                let levels = levels?;
                validate_levels(&levels)?;
                let images = Self::load_images(image_sources(&levels)).await?;

                let difficulty = Self::stored_difficulty();
                let viewport = Self::viewport(&config)?;
                browser::resize_canvas(viewport.inner_width, viewport.inner_height)?;
                log!(
                    "Platformer: {} levels, {} images, {} difficulty",
                    levels.len(),
                    images.len(),
                    difficulty
                );

                let ctx = SimulationContext::new(config, difficulty, viewport);
                let loader = LevelLoader::new(levels, ctx)?;
                Ok(Box::new(Platformer::Loaded(Running { loader, images })))
            }
            Platformer::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &mut KeyState) {
        if let Platformer::Loaded(running) = self {
            running.follow_window();
            let events = keystate.drain_events();
            if let Err(err) = running.loader.tick(&events, FRAME_SIZE as f64) {
                error!("Platformer: {:#}", err);
            }
            for sound in running.loader.drain_sounds() {
                log!("Platformer: sound {:?}", sound);
            }
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let Platformer::Loaded(running) = self {
            let viewport = running.loader.context().viewport;
            let canvas = SpriteCanvas {
                renderer,
                images: &running.images,
            };
            canvas.clear(&Rect::new_from_x_y(
                0.0,
                0.0,
                viewport.inner_width,
                viewport.inner_height,
            ));
            running.loader.draw(&canvas);
        }
    }
}

impl Running {
    fn follow_window(&mut self) {
        let config = &self.loader.context().config;
        let viewport = match Platformer::viewport(config) {
            Ok(viewport) => viewport,
            Err(err) => {
                error!("Platformer: {:#}", err);
                return;
            }
        };
        if viewport == self.loader.context().viewport {
            return;
        }
        if let Err(err) = browser::resize_canvas(viewport.inner_width, viewport.inner_height) {
            error!("Platformer: {:#}", err);
        }
        self.loader.resize(viewport);
    }
}

/// Resolves asset names to the images loaded at startup
struct SpriteCanvas<'a> {
    renderer: &'a Renderer,
    images: &'a HashMap<String, HtmlImageElement>,
}

impl Canvas for SpriteCanvas<'_> {
    fn clear(&self, rect: &Rect) {
        self.renderer.clear(rect);
    }

    fn draw_sprite(&self, asset: &str, frame: &Rect, destination: &Rect, pose: Pose) {
        match self.images.get(asset) {
            Some(image) => self.renderer.draw_image(image, frame, destination, pose),
            None => error!("SpriteCanvas: no image loaded for {}", asset),
        }
    }
}
