#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised maze generation and the system that supplies a maze per level.

use std::sync::Arc;

use labyrinth_core::{maze_size_for_level, Cell, CellCoord, Command, Event, Grid, Level};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Carving offsets in (column, row) order before shuffling.
const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Cell where carving begins.
const CARVE_ORIGIN: CellCoord = CellCoord::new(1, 1);

/// Carves a maze with a randomised depth-first backtracker.
///
/// Every cell starts as a wall. Carving begins at (1, 1) and advances two cells
/// at a time so a one-cell wall always separates neighbouring corridors; the
/// cell in between is opened whenever the far cell is still solid. The carved
/// cells form a spanning tree, so exactly one simple path links any two of
/// them. Afterwards the border is breached at column 1 of the top row and the
/// cell at column `width - 2` of the bottom row becomes the exit.
///
/// The frontier lives on a heap-allocated stack, so call depth stays constant
/// however large the maze grows.
///
/// # Panics
///
/// Panics when either dimension is even or smaller than three.
pub fn generate<R>(width: u32, height: u32, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    assert!(
        width >= 3 && height >= 3 && width % 2 == 1 && height % 2 == 1,
        "maze dimensions must be odd and at least 3 (received {width}x{height})"
    );

    let mut grid = Grid::filled(width, height, Cell::Wall);
    grid.set(CARVE_ORIGIN, Cell::Floor);

    let mut stack = vec![Frame::new(CARVE_ORIGIN, rng)];
    while let Some(frame) = stack.last_mut() {
        let Some((dx, dy)) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let origin = frame.cell;
        let Some(target) = offset(origin, dx * 2, dy * 2, width, height) else {
            continue;
        };
        if grid.cell(target) != Some(Cell::Wall) {
            continue;
        }

        if let Some(between) = offset(origin, dx, dy, width, height) {
            grid.set(between, Cell::Floor);
        }
        grid.set(target, Cell::Floor);
        stack.push(Frame::new(target, rng));
    }

    grid.set(CellCoord::new(1, 0), Cell::Floor);
    grid.set(CellCoord::new(width - 2, height - 1), Cell::Exit);
    grid
}

/// Carves a square maze sized for the provided level.
pub fn generate_for_level<R>(level: Level, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let size = maze_size_for_level(level);
    generate(size, size, rng)
}

/// Pending carving work for a single cell.
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    directions: [(i64, i64); 4],
    next: usize,
}

impl Frame {
    fn new<R>(cell: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut directions = DIRECTIONS;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<(i64, i64)> {
        let direction = self.directions.get(self.next).copied()?;
        self.next += 1;
        Some(direction)
    }
}

fn offset(cell: CellCoord, dx: i64, dy: i64, width: u32, height: u32) -> Option<CellCoord> {
    let column = i64::from(cell.column()) + dx;
    let row = i64::from(cell.row()) + dy;
    if column < 0 || row < 0 || column >= i64::from(width) || row >= i64::from(height) {
        return None;
    }
    Some(CellCoord::new(
        u32::try_from(column).ok()?,
        u32::try_from(row).ok()?,
    ))
}

/// Configuration parameters required to construct the maze generation system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the maze sequence.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed of the random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Pure system that answers level transitions with freshly generated mazes.
///
/// Two systems built from the same seed produce the same sequence of mazes.
#[derive(Debug)]
pub struct MazeGeneration {
    rng: ChaCha8Rng,
}

impl MazeGeneration {
    /// Creates a new maze generation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the command that installs the opening level's maze.
    pub fn initial_commands(&mut self, out: &mut Vec<Command>) {
        out.push(self.load_level(Level::first()));
    }

    /// Consumes world events and emits a maze for every level that needs one.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::LevelComplete { level } = event {
                out.push(self.load_level(*level));
            }
        }
    }

    fn load_level(&mut self, level: Level) -> Command {
        let grid = generate_for_level(level, &mut self.rng);
        debug!(level = level.get(), size = grid.columns(), "generated maze");
        Command::LoadLevel {
            level,
            grid: Arc::new(grid),
        }
    }
}
