#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestration layer that wires the world, the pure systems and a
//! rendering backend into a playable labyrinth session.

mod input;
mod settings;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result as AnyResult};
use labyrinth_core::{Command, Event, Phase, LEVELS};
use labyrinth_rendering::{
    Banner, Camera, FrameInput, Hud, MazePresentation, Palette, Presentation, RenderingBackend,
    Scene,
};
use labyrinth_system_clock::Clock;
use labyrinth_system_maze_generation::MazeGeneration;
use labyrinth_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use input::InputAdapter;
pub use settings::{
    GenerationSettings, InputSettings, Settings, SettingsError, SimulationSettings,
    DEFAULT_MOUSE_SENSITIVITY,
};

/// Window title requested from rendering backends.
pub const WINDOW_TITLE: &str = "Labyrinth";

/// Log filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "labyrinth=info";

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_LOG_FILTER`] when the environment carries no
/// directives. Fails if another global subscriber is already installed.
pub fn init_tracing() -> AnyResult<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .context("failed to install tracing subscriber")
}

/// A running labyrinth: the authoritative world plus the systems reacting to it.
#[derive(Debug)]
pub struct Session {
    world: World,
    generation: MazeGeneration,
    clock: Clock,
    input: InputAdapter,
    maze_revision: u64,
}

impl Session {
    /// Builds a session and installs the opening level's maze.
    ///
    /// # Panics
    ///
    /// Panics when `settings` fail [`Settings::validate`].
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        if let Err(error) = settings.validate() {
            panic!("invalid session settings: {error}");
        }
        let generation_config = settings.generation_config();
        info!(seed = generation_config.rng_seed(), "creating session");

        let mut session = Self {
            world: World::new(settings.world_config()),
            generation: MazeGeneration::new(generation_config),
            clock: Clock::new(),
            input: InputAdapter::new(settings.input.mouse_sensitivity),
            maze_revision: 0,
        };

        let mut commands = Vec::new();
        session.generation.initial_commands(&mut commands);
        let mut log = Vec::new();
        session.execute(commands, &mut log);
        session
    }

    /// Advances the session by one frame.
    ///
    /// Input commands are applied first, followed by a single tick. Events are
    /// then fed to the systems until none of them responds, so a maze requested
    /// by a cleared level is installed before the next frame begins. Returns
    /// every event the world emitted during the frame.
    pub fn frame(&mut self, dt: Duration, input: &FrameInput) -> Vec<Event> {
        let mut commands = Vec::new();
        self.input.translate(input, &mut commands);
        commands.push(Command::Tick { dt });

        let mut log = Vec::new();
        self.execute(commands, &mut log);
        log
    }

    /// Whole seconds elapsed since the run started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Builds a fresh scene snapshot.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::default();
        self.update_scene(&mut scene);
        scene
    }

    /// Refreshes `scene` in place, replacing the maze only when it changed.
    pub fn update_scene(&self, scene: &mut Scene) {
        let current = scene
            .maze
            .as_ref()
            .is_some_and(|maze| maze.revision == self.maze_revision);
        if !current {
            scene.maze = query::grid(&self.world)
                .map(|grid| MazePresentation::new(Arc::clone(grid), self.maze_revision));
        }

        scene.camera =
            Camera::from_agent(query::position(&self.world), query::heading(&self.world));
        scene.hud = Hud {
            level: query::level(&self.world),
            elapsed_seconds: self.clock.elapsed_seconds(),
            banner: self.banner(),
        };
    }

    /// Drives the session with the provided rendering backend until it exits.
    pub fn run<B>(mut self, backend: B) -> AnyResult<()>
    where
        B: RenderingBackend,
    {
        let presentation = Presentation::new(WINDOW_TITLE, Palette::default(), self.scene());
        backend
            .run(presentation, move |dt, input, scene| {
                let _ = self.frame(dt, &input);
                self.update_scene(scene);
            })
            .context("rendering backend failed")
    }

    fn banner(&self) -> Option<Banner> {
        match query::phase(&self.world) {
            Phase::Completed => Some(Banner::Congratulations {
                levels: LEVELS,
                seconds: self.clock.elapsed_seconds(),
            }),
            _ if !query::has_started(&self.world) => Some(Banner::Instructions),
            _ => None,
        }
    }

    fn execute(&mut self, commands: Vec<Command>, log: &mut Vec<Event>) {
        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            self.dispatch(events, log);
        }
    }

    fn dispatch(&mut self, pending_events: Vec<Event>, log: &mut Vec<Event>) {
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }
            log.extend(events.iter().cloned());

            self.clock.handle(&events);
            self.input.handle(&events);
            for event in &events {
                if let Event::LevelLoaded { level, size } = event {
                    self.maze_revision = self.maze_revision.saturating_add(1);
                    debug!(
                        level = level.get(),
                        size,
                        revision = self.maze_revision,
                        "maze ready"
                    );
                }
            }

            let mut commands = Vec::new();
            self.generation.handle(&events, &mut commands);
            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
