//! Session settings loaded from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use labyrinth_core::{CellCoord, BASE_MAZE_SIZE};
use labyrinth_system_maze_generation as maze_generation;
use labyrinth_world as world;
use serde::Deserialize;
use thiserror::Error;

/// Radians of yaw applied per pixel of horizontal pointer travel.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.002;

/// Tunable parameters of a labyrinth session.
///
/// Every table and key is optional; missing values fall back to the
/// defaults used by the world and the input adapter.
///
/// ```toml
/// [simulation]
/// step_length = 0.05
/// spawn_column = 1
/// spawn_row = 1
///
/// [generation]
/// seed = 42
///
/// [input]
/// mouse_sensitivity = 0.002
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Navigation parameters.
    pub simulation: SimulationSettings,
    /// Maze generation parameters.
    pub generation: GenerationSettings,
    /// Pointer and keyboard parameters.
    pub input: InputSettings,
}

/// Navigation parameters forwarded to the world.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// World units travelled per tick for each held intent.
    pub step_length: f32,
    /// Column of the spawn cell.
    pub spawn_column: u32,
    /// Row of the spawn cell.
    pub spawn_row: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            step_length: world::DEFAULT_STEP_LENGTH,
            spawn_column: world::DEFAULT_SPAWN.column(),
            spawn_row: world::DEFAULT_SPAWN.row(),
        }
    }
}

/// Maze generation parameters.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    /// Fixed seed for the maze sequence; drawn from entropy when absent.
    pub seed: Option<u64>,
}

/// Pointer and keyboard parameters.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputSettings {
    /// Radians of yaw per pixel of horizontal pointer travel.
    pub mouse_sensitivity: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
        }
    }
}

/// Reasons a settings document is rejected after parsing.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SettingsError {
    /// The step length must move the agent forward.
    #[error("step length must be a positive finite number (received {0})")]
    InvalidStepLength(f32),
    /// The spawn must be a corridor cell present in every maze.
    #[error(
        "spawn cell ({column}, {row}) must use odd coordinates below {limit}",
        limit = BASE_MAZE_SIZE - 1
    )]
    InvalidSpawn {
        /// Requested spawn column.
        column: u32,
        /// Requested spawn row.
        row: u32,
    },
    /// Pointer sensitivity must be usable as a yaw scale.
    #[error("mouse sensitivity must be finite (received {0})")]
    InvalidMouseSensitivity(f32),
}

impl Settings {
    /// Parses and validates settings from a TOML document.
    pub fn from_toml_str(document: &str) -> AnyResult<Self> {
        let settings: Self = toml::from_str(document).context("failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates settings from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&document)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Checks that the values describe a playable session.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let step_length = self.simulation.step_length;
        if !step_length.is_finite() || step_length <= 0.0 {
            return Err(SettingsError::InvalidStepLength(step_length));
        }

        let column = self.simulation.spawn_column;
        let row = self.simulation.spawn_row;
        if !is_corridor_index(column) || !is_corridor_index(row) {
            return Err(SettingsError::InvalidSpawn { column, row });
        }

        let sensitivity = self.input.mouse_sensitivity;
        if !sensitivity.is_finite() {
            return Err(SettingsError::InvalidMouseSensitivity(sensitivity));
        }

        Ok(())
    }

    /// World configuration derived from the simulation table.
    #[must_use]
    pub fn world_config(&self) -> world::Config {
        world::Config::new(
            self.simulation.step_length,
            CellCoord::new(self.simulation.spawn_column, self.simulation.spawn_row),
        )
    }

    /// Maze generation configuration, drawing a seed from entropy when none is set.
    #[must_use]
    pub fn generation_config(&self) -> maze_generation::Config {
        let seed = self.generation.seed.unwrap_or_else(rand::random);
        maze_generation::Config::new(seed)
    }
}

// Odd indices below the smallest maze size are always carved.
fn is_corridor_index(index: u32) -> bool {
    index % 2 == 1 && index < BASE_MAZE_SIZE - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_indices_are_odd_and_interior() {
        assert!(is_corridor_index(1));
        assert!(is_corridor_index(9));
        assert!(!is_corridor_index(0));
        assert!(!is_corridor_index(2));
        assert!(!is_corridor_index(11));
    }

    #[test]
    fn fixed_seed_is_forwarded() {
        let settings = Settings {
            generation: GenerationSettings { seed: Some(99) },
            ..Settings::default()
        };
        assert_eq!(settings.generation_config().rng_seed(), 99);
    }
}
