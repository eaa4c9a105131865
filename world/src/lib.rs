#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative navigation state for the labyrinth.
//!
//! The world owns the current maze, the agent walking through it and the level
//! counter. Every mutation arrives as a [`Command`] through [`apply`], and every
//! observable outcome leaves as an [`Event`].

mod collision;

use std::{sync::Arc, time::Duration};

use labyrinth_core::{
    CellCoord, Command, Event, Grid, Heading, Level, MovementIntent, MovementIntents, Phase,
    WorldPosition,
};
use tracing::{debug, info};

/// Distance the agent covers per tick for each held intent, in world units.
pub const DEFAULT_STEP_LENGTH: f32 = 0.05;

/// Cell the agent is placed on whenever a level starts.
pub const DEFAULT_SPAWN: CellCoord = CellCoord::new(1, 1);

/// Tuning parameters for the navigation world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    step_length: f32,
    spawn: CellCoord,
}

impl Config {
    /// Creates a configuration from an explicit step length and spawn cell.
    #[must_use]
    pub const fn new(step_length: f32, spawn: CellCoord) -> Self {
        Self { step_length, spawn }
    }

    /// Displacement applied per tick for each held intent.
    #[must_use]
    pub const fn step_length(&self) -> f32 {
        self.step_length
    }

    /// Cell the agent spawns on.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LENGTH, DEFAULT_SPAWN)
    }
}

/// Represents the authoritative labyrinth world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    level: Level,
    grid: Option<Arc<Grid>>,
    agent: Agent,
    phase: Phase,
    started: bool,
    tick_index: u64,
}

impl World {
    /// Creates an idle world that waits for its first maze.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            level: Level::first(),
            grid: None,
            agent: Agent::default(),
            phase: Phase::Idle,
            started: false,
            tick_index: 0,
        }
    }

    fn load_level(&mut self, level: Level, grid: Arc<Grid>, out_events: &mut Vec<Event>) {
        if self.phase == Phase::Completed {
            debug!(level = level.get(), "ignoring maze delivered after completion");
            return;
        }

        let size = grid.columns();

        self.agent = Agent::at(collision::cell_center(&grid, self.config.spawn));
        self.grid = Some(grid);
        self.level = level;
        self.phase = if self.started {
            Phase::Active
        } else {
            Phase::Idle
        };

        debug!(level = level.get(), size, "maze installed");
        out_events.push(Event::LevelLoaded { level, size });
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        assert!(self.grid.is_some(), "start requested before a maze was loaded");
        if self.started || self.phase != Phase::Idle {
            return;
        }

        // Keys held on the instruction screen must not move the agent.
        self.agent.intents.clear();
        self.started = true;
        self.phase = Phase::Active;
        info!(level = self.level.get(), "run started");
        out_events.push(Event::GameStarted);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(grid) = self.grid.as_ref().map(Arc::clone) else {
            panic!("tick requested before a maze was loaded");
        };
        if self.phase != Phase::Active {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        if self.agent.intents.any() {
            let from = self.agent.position;
            let candidate = self.agent.candidate(self.config.step_length);
            if collision::is_blocked(&grid, candidate) {
                out_events.push(Event::MovementRejected {
                    attempted: candidate,
                });
            } else {
                self.agent.position = candidate;
                out_events.push(Event::AgentMoved {
                    from,
                    to: candidate,
                });
            }
        }

        if collision::is_exit(&grid, self.agent.position) {
            self.reach_exit(out_events);
        }
    }

    fn reach_exit(&mut self, out_events: &mut Vec<Event>) {
        match self.level.next() {
            Some(next) => {
                info!(
                    cleared = self.level.get(),
                    next = next.get(),
                    tick = self.tick_index,
                    "level cleared"
                );
                self.level = next;
                self.phase = Phase::Idle;
                self.grid = None;
                out_events.push(Event::LevelComplete { level: next });
            }
            None => {
                info!(level = self.level.get(), tick = self.tick_index, "run complete");
                self.phase = Phase::Completed;
                out_events.push(Event::GameComplete { level: self.level });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when [`Command::Start`] or [`Command::Tick`] arrive before any maze
/// has been installed with [`Command::LoadLevel`], or after a level was
/// cleared and before its successor was installed.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level, grid } => world.load_level(level, grid, out_events),
        Command::Start => world.start(out_events),
        Command::SetIntent { intent, held } => world.agent.intents.set(intent, held),
        Command::SetHeading { heading } => world.agent.heading = heading,
        Command::Tick { dt } => world.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::sync::Arc;

    use super::{collision, World};
    use labyrinth_core::{CellCoord, Grid, Heading, Level, MovementIntents, Phase, WorldPosition};

    /// Maze the agent is currently navigating, if one is installed.
    #[must_use]
    pub fn grid(world: &World) -> Option<&Arc<Grid>> {
        world.grid.as_ref()
    }

    /// Continuous position of the agent.
    #[must_use]
    pub fn position(world: &World) -> WorldPosition {
        world.agent.position
    }

    /// Direction the agent faces.
    #[must_use]
    pub fn heading(world: &World) -> Heading {
        world.agent.heading
    }

    /// Movement intents currently held.
    #[must_use]
    pub fn intents(world: &World) -> MovementIntents {
        world.agent.intents
    }

    /// Level the agent is playing or about to play.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Whether the start signal has been received.
    #[must_use]
    pub fn has_started(world: &World) -> bool {
        world.started
    }

    /// World position of the spawn cell within the installed maze.
    #[must_use]
    pub fn spawn_position(world: &World) -> Option<WorldPosition> {
        world
            .grid
            .as_ref()
            .map(|grid| collision::cell_center(grid, world.config.spawn))
    }

    /// Grid cell the agent currently rounds into, if it lies inside the maze.
    #[must_use]
    pub fn occupied_cell(world: &World) -> Option<CellCoord> {
        world
            .grid
            .as_ref()
            .and_then(|grid| collision::cell_at(grid, world.agent.position))
    }

    /// Grid cell an arbitrary position rounds into within the installed maze.
    #[must_use]
    pub fn cell_at(world: &World, position: WorldPosition) -> Option<CellCoord> {
        world
            .grid
            .as_ref()
            .and_then(|grid| collision::cell_at(grid, position))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Agent {
    position: WorldPosition,
    heading: Heading,
    intents: MovementIntents,
}

impl Agent {
    fn at(position: WorldPosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Position reached by applying every held intent once.
    ///
    /// Opposing intents cancel and perpendicular ones add up, so forward plus
    /// right walks diagonally.
    fn candidate(&self, step_length: f32) -> WorldPosition {
        let forward = self.heading.forward();
        let right = self.heading.right();
        let mut candidate = self.position;
        if self.intents.is_held(MovementIntent::Forward) {
            candidate = candidate.offset(forward, step_length);
        }
        if self.intents.is_held(MovementIntent::Backward) {
            candidate = candidate.offset(forward, -step_length);
        }
        if self.intents.is_held(MovementIntent::Left) {
            candidate = candidate.offset(right, -step_length);
        }
        if self.intents.is_held(MovementIntent::Right) {
            candidate = candidate.offset(right, step_length);
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::{Cell, LEVELS};

    fn corridor() -> Arc<Grid> {
        Arc::new(Grid::from_rows(vec![
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Exit, Cell::Wall],
        ]))
    }

    fn loaded(step_length: f32, level: Level) -> World {
        let mut world = World::new(Config::new(step_length, DEFAULT_SPAWN));
        let mut events = Vec::new();
        world.load_level(level, corridor(), &mut events);
        world
    }

    #[test]
    fn load_level_places_agent_on_spawn_cell() {
        let world = loaded(0.05, Level::first());
        assert_eq!(query::position(&world), WorldPosition::new(-0.5, -0.5));
        assert_eq!(query::occupied_cell(&world), Some(CellCoord::new(1, 1)));
        assert_eq!(query::phase(&world), Phase::Idle);
    }

    #[test]
    fn candidate_composes_held_intents() {
        let mut agent = Agent::at(WorldPosition::new(0.0, 0.0));
        agent.intents.set(MovementIntent::Forward, true);
        agent.intents.set(MovementIntent::Backward, true);
        let cancelled = agent.candidate(0.5);
        assert!(cancelled.x.abs() < 1e-6 && cancelled.z.abs() < 1e-6);

        agent.intents.set(MovementIntent::Backward, false);
        agent.intents.set(MovementIntent::Left, true);
        let diagonal = agent.candidate(0.5);
        assert!((diagonal.x + 0.5).abs() < 1e-6);
        assert!((diagonal.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn tick_is_ignored_while_idle() {
        let mut world = loaded(0.6, Level::first());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetIntent {
                intent: MovementIntent::Backward,
                held: true,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::position(&world), WorldPosition::new(-0.5, -0.5));
        assert!(query::intents(&world).is_held(MovementIntent::Backward));
    }

    #[test]
    fn final_exit_completes_the_run() {
        let mut world = loaded(0.6, Level::new(LEVELS));
        let mut events = Vec::new();
        world.start(&mut events);
        world.agent.intents.set(MovementIntent::Backward, true);
        world.tick(Duration::from_millis(16), &mut events);

        assert_eq!(query::phase(&world), Phase::Completed);
        assert!(events.contains(&Event::GameComplete {
            level: Level::new(LEVELS)
        }));

        events.clear();
        world.tick(Duration::from_millis(16), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    #[should_panic(expected = "tick requested before a maze was loaded")]
    fn tick_without_maze_panics() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
    }

    #[test]
    #[should_panic(expected = "start requested before a maze was loaded")]
    fn start_without_maze_panics() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
    }
}
