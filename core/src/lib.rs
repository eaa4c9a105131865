#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the labyrinth engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative navigation world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to. Systems consume event streams and respond
//! exclusively with new command batches.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

/// Number of levels that compose a full run.
pub const LEVELS: u32 = 10;

/// Edge length of the first level's maze measured in cells.
pub const BASE_MAZE_SIZE: u32 = 11;

/// Growth of the maze edge length between consecutive levels.
pub const MAZE_SIZE_STEP: u32 = 2;

/// Computes the maze edge length used by the provided level.
///
/// The result is always odd and strictly increases with the level number.
#[must_use]
pub const fn maze_size_for_level(level: Level) -> u32 {
    BASE_MAZE_SIZE + (level.get() - 1) * MAZE_SIZE_STEP
}

/// Occupancy state of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Solid cell that blocks the agent.
    Wall,
    /// Open cell the agent may walk across.
    Floor,
    /// Open cell that completes the level when entered.
    Exit,
}

impl Cell {
    /// Reports whether the agent may occupy the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dense row-major maze layout.
///
/// Grids are immutable once built. The world and its observers share them
/// behind an [`Arc`], so replacing a level swaps the whole value at once.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell holds the provided state.
    ///
    /// # Panics
    ///
    /// Panics when the cell count does not fit in memory addresses.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, cell: Cell) -> Self {
        let Ok(capacity) = usize::try_from(u64::from(columns) * u64::from(rows)) else {
            panic!("grid of {columns}x{rows} cells exceeds the address space");
        };
        Self {
            columns,
            rows,
            cells: vec![cell; capacity],
        }
    }

    /// Builds a grid from explicit rows.
    ///
    /// # Panics
    ///
    /// Panics when the rows do not all share the same length, or when either
    /// dimension exceeds `u32::MAX`.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let columns = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == columns),
            "grid rows must share the same length"
        );
        let (Ok(column_count), Ok(row_count)) = (u32::try_from(columns), u32::try_from(rows.len()))
        else {
            panic!("grid dimensions exceed u32");
        };
        Self {
            columns: column_count,
            rows: row_count,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the state of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the state of a cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, coord: CellCoord, cell: Cell) {
        if let Some(index) = self.index(coord) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }

    /// Cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterator over every cell paired with its coordinate, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *cell)
        })
    }

    /// Locates the first exit cell in row-major order.
    #[must_use]
    pub fn exit(&self) -> Option<CellCoord> {
        self.iter()
            .find(|(_, cell)| *cell == Cell::Exit)
            .map(|(coord, _)| coord)
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Continuous position on the maze floor measured in world units.
///
/// Each grid cell covers a unit square. The `x` axis follows columns and the
/// `z` axis follows rows, with the maze centred on the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    /// Offset along the column axis.
    pub x: f32,
    /// Offset along the row axis.
    pub z: f32,
}

impl WorldPosition {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Returns the position displaced by `delta` scaled by `amount`.
    #[must_use]
    pub fn offset(self, delta: (f32, f32), amount: f32) -> Self {
        Self {
            x: self.x + delta.0 * amount,
            z: self.z + delta.1 * amount,
        }
    }
}

/// Horizontal look direction of the agent expressed as a yaw angle in radians.
///
/// A yaw of zero faces toward decreasing `z`, matching a camera that looks down
/// its negative depth axis. Positive yaw turns counter-clockwise seen from above.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heading {
    yaw: f32,
}

impl Heading {
    /// Creates a heading from a yaw angle in radians.
    #[must_use]
    pub const fn from_yaw(yaw: f32) -> Self {
        Self { yaw }
    }

    /// Yaw angle in radians.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Unit vector on the (x, z) plane pointing where the agent faces.
    #[must_use]
    pub fn forward(&self) -> (f32, f32) {
        let (sin, cos) = self.yaw.sin_cos();
        (-sin, -cos)
    }

    /// Unit vector on the (x, z) plane pointing to the agent's right.
    #[must_use]
    pub fn right(&self) -> (f32, f32) {
        let (sin, cos) = self.yaw.sin_cos();
        (cos, -sin)
    }
}

/// Held movement key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementIntent {
    /// Walk along the heading.
    Forward,
    /// Walk against the heading.
    Backward,
    /// Strafe to the left of the heading.
    Left,
    /// Strafe to the right of the heading.
    Right,
}

/// Set of independently held movement intents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementIntents {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl MovementIntents {
    /// Creates an empty intent set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
        }
    }

    /// Marks the intent as held or released.
    pub fn set(&mut self, intent: MovementIntent, held: bool) {
        match intent {
            MovementIntent::Forward => self.forward = held,
            MovementIntent::Backward => self.backward = held,
            MovementIntent::Left => self.left = held,
            MovementIntent::Right => self.right = held,
        }
    }

    /// Returns a copy of the set with the intent marked as held.
    #[must_use]
    pub fn with(mut self, intent: MovementIntent) -> Self {
        self.set(intent, true);
        self
    }

    /// Reports whether the intent is currently held.
    #[must_use]
    pub const fn is_held(&self, intent: MovementIntent) -> bool {
        match intent {
            MovementIntent::Forward => self.forward,
            MovementIntent::Backward => self.backward,
            MovementIntent::Left => self.left,
            MovementIntent::Right => self.right,
        }
    }

    /// Reports whether any intent is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Releases every intent.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// One-based level number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// Creates a level wrapper.
    ///
    /// # Panics
    ///
    /// Panics when `value` lies outside `1..=LEVELS`.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        assert!(value >= 1 && value <= LEVELS, "level out of range");
        Self(value)
    }

    /// The opening level.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether this is the last level of the run.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.0 >= LEVELS
    }

    /// Level that follows this one, or `None` after the final level.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        if self.is_final() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

/// Lifecycle phase of the navigation world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the start signal or for the next level's maze. Ticks are ignored.
    Idle,
    /// Held intents drive movement every tick.
    Active,
    /// The final exit was reached. No further ticks are processed.
    Completed,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a freshly generated maze and re-initialises the agent at spawn.
    LoadLevel {
        /// Level the maze belongs to.
        level: Level,
        /// Maze layout the agent will navigate.
        grid: Arc<Grid>,
    },
    /// One-shot signal that begins the run.
    Start,
    /// Records that a movement key was pressed or released.
    SetIntent {
        /// Movement key affected by the input event.
        intent: MovementIntent,
        /// Whether the key is now held.
        held: bool,
    },
    /// Updates the direction the agent faces.
    SetHeading {
        /// New look direction.
        heading: Heading,
    },
    /// Advances the simulation by a single step.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a maze was installed and the agent placed at spawn.
    LevelLoaded {
        /// Level the maze belongs to.
        level: Level,
        /// Edge length of the installed maze.
        size: u32,
    },
    /// Announces that the run began.
    GameStarted,
    /// Indicates that the simulation clock advanced during an active tick.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the agent committed a new position.
    AgentMoved {
        /// Position before the tick.
        from: WorldPosition,
        /// Position after the tick.
        to: WorldPosition,
    },
    /// Reports that the tick's displacement was discarded because it hit a wall.
    MovementRejected {
        /// Candidate position that was rolled back.
        attempted: WorldPosition,
    },
    /// Announces that the agent reached an exit and the run advanced a level.
    LevelComplete {
        /// Level that now needs a maze.
        level: Level,
    },
    /// Announces that the agent reached the final level's exit.
    GameComplete {
        /// Level whose exit finished the run.
        level: Level,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        maze_size_for_level, Cell, CellCoord, Grid, Heading, Level, MovementIntent, MovementIntents,
        LEVELS,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&CellCoord::new(9, 10));
        assert_round_trip(&Cell::Exit);
        assert_round_trip(&Level::new(7));
    }

    #[test]
    fn maze_size_grows_by_two_per_level() {
        assert_eq!(maze_size_for_level(Level::first()), 11);
        assert_eq!(maze_size_for_level(Level::new(2)), 13);
        assert_eq!(maze_size_for_level(Level::new(LEVELS)), 29);
        for value in 1..=LEVELS {
            assert_eq!(maze_size_for_level(Level::new(value)) % 2, 1);
        }
    }

    #[test]
    fn level_stops_advancing_after_final() {
        assert_eq!(Level::first().next(), Some(Level::new(2)));
        assert!(Level::new(LEVELS).is_final());
        assert_eq!(Level::new(LEVELS).next(), None);
    }

    #[test]
    fn grid_indexes_row_major() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Exit],
        ]);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cell(CellCoord::new(2, 1)), Some(Cell::Exit));
        assert_eq!(grid.cell(CellCoord::new(3, 0)), None);
        assert_eq!(grid.exit(), Some(CellCoord::new(2, 1)));
        let coords: Vec<_> = grid.iter().map(|(coord, _)| coord).collect();
        assert_eq!(coords[4], CellCoord::new(1, 1));
    }

    #[test]
    fn filled_grid_covers_every_cell() {
        let grid = Grid::filled(5, 3, Cell::Wall);
        assert_eq!(grid.cells().len(), 15);
        assert!(grid.cells().iter().all(|cell| *cell == Cell::Wall));
        assert_eq!(grid.cell(CellCoord::new(4, 2)), Some(Cell::Wall));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    #[should_panic(expected = "exceeds the address space")]
    fn oversized_grid_is_rejected() {
        let _ = Grid::filled(u32::MAX, u32::MAX, Cell::Wall);
    }

    #[test]
    #[should_panic(expected = "grid rows must share the same length")]
    fn ragged_rows_are_rejected() {
        let _ = Grid::from_rows(vec![vec![Cell::Wall, Cell::Floor], vec![Cell::Wall]]);
    }

    #[test]
    fn intents_compose_with_builder() {
        let intents = MovementIntents::new()
            .with(MovementIntent::Forward)
            .with(MovementIntent::Right);
        assert!(intents.is_held(MovementIntent::Forward));
        assert!(intents.is_held(MovementIntent::Right));
        assert!(!intents.is_held(MovementIntent::Left));

        let mut cleared = intents;
        cleared.clear();
        assert!(!cleared.any());
    }

    #[test]
    fn default_heading_faces_negative_depth() {
        let heading = Heading::default();
        let (fx, fz) = heading.forward();
        let (rx, rz) = heading.right();
        assert!(fx.abs() < 1e-6 && (fz + 1.0).abs() < 1e-6);
        assert!((rx - 1.0).abs() < 1e-6 && rz.abs() < 1e-6);
    }

    #[test]
    fn quarter_turn_rotates_axes() {
        let heading = Heading::from_yaw(std::f32::consts::FRAC_PI_2);
        let (fx, fz) = heading.forward();
        let (rx, rz) = heading.right();
        assert!((fx + 1.0).abs() < 1e-6 && fz.abs() < 1e-6);
        assert!(rx.abs() < 1e-6 && (rz + 1.0).abs() < 1e-6);
    }
}
