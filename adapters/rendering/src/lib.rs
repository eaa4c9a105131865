#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for labyrinth adapters.
//!
//! Backends receive a [`Scene`] describing the maze, the first-person camera
//! and the HUD, and report raw player input back through [`FrameInput`]. No
//! backend lives here; this crate only fixes the boundary.

use std::{sync::Arc, time::Duration};

use anyhow::Result as AnyResult;
use glam::{Vec2, Vec3};
use labyrinth_core::{Cell, CellCoord, Grid, Heading, Level, WorldPosition};

/// Height of the camera above the floor in world units.
pub const EYE_HEIGHT: f32 = 1.0;

/// Height of wall blocks and of the ceiling plane in world units.
pub const WALL_HEIGHT: f32 = 2.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Material colors applied to the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Clear color behind the maze.
    pub sky: Color,
    /// Wall blocks.
    pub wall: Color,
    /// Open floor tiles.
    pub floor: Color,
    /// The exit tile.
    pub exit: Color,
    /// The ceiling plane.
    pub ceiling: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::from_hex(0x87_ce_eb),
            wall: Color::from_hex(0x8b_45_13),
            floor: Color::from_hex(0x22_8b_22),
            exit: Color::from_hex(0xff_d7_00),
            ceiling: Color::from_hex(0x46_82_b4),
        }
    }
}

/// Maze geometry snapshot.
///
/// The revision changes only when a new maze is installed, so backends can
/// rebuild their meshes on level change and reuse them otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Maze layout shared with the simulation.
    pub grid: Arc<Grid>,
    /// Monotonic counter identifying the installed maze.
    pub revision: u64,
}

impl MazePresentation {
    /// Creates a new maze presentation.
    #[must_use]
    pub fn new(grid: Arc<Grid>, revision: u64) -> Self {
        Self { grid, revision }
    }

    /// World-space centre of the provided cell on the floor plane.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec3 {
        Vec3::new(
            cell.column() as f32 - self.grid.columns() as f32 / 2.0,
            0.0,
            cell.row() as f32 - self.grid.rows() as f32 / 2.0,
        )
    }

    /// Centres of the wall blocks, raised so each block rests on the floor.
    pub fn wall_blocks(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.grid
            .iter()
            .filter(|(_, cell)| *cell == Cell::Wall)
            .map(|(coord, _)| self.cell_center(coord) + Vec3::Y * (WALL_HEIGHT / 2.0))
    }

    /// Floor tiles paired with the state of the cell they cover.
    pub fn floor_tiles(&self) -> impl Iterator<Item = (Vec3, Cell)> + '_ {
        self.grid
            .iter()
            .filter(|(_, cell)| cell.is_passable())
            .map(|(coord, cell)| (self.cell_center(coord), cell))
    }

    /// Side lengths of the ceiling plane.
    #[must_use]
    pub fn ceiling_extent(&self) -> Vec2 {
        Vec2::new(self.grid.columns() as f32, self.grid.rows() as f32)
    }
}

/// First-person camera placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Horizontal look angle in radians.
    pub yaw: f32,
}

impl Camera {
    /// Places the camera at eye height above the agent, looking along its heading.
    #[must_use]
    pub fn from_agent(position: WorldPosition, heading: Heading) -> Self {
        Self {
            eye: Vec3::new(position.x, EYE_HEIGHT, position.z),
            yaw: heading.yaw(),
        }
    }

    /// Unit look direction in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (x, z) = Heading::from_yaw(self.yaw).forward();
        Vec3::new(x, 0.0, z)
    }
}

/// Overlay message shown above the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// Controls reminder shown until the run starts.
    Instructions,
    /// Shown once the final exit was reached.
    Congratulations {
        /// Number of levels completed.
        levels: u32,
        /// Whole seconds the run took.
        seconds: u64,
    },
}

impl Banner {
    /// Text the backend should display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Instructions => String::from(
                "Use WASD keys to move. Mouse to look around. Click or press Space to start.",
            ),
            Self::Congratulations { levels, seconds } => format!(
                "Congratulations! You've completed all {levels} levels in {seconds} seconds!"
            ),
        }
    }
}

/// Heads-up display content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Level being played.
    pub level: Level,
    /// Whole seconds elapsed since the run started.
    pub elapsed_seconds: u64,
    /// Optional overlay message.
    pub banner: Option<Banner>,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            level: Level::first(),
            elapsed_seconds: 0,
            banner: Some(Banner::Instructions),
        }
    }
}

/// Scene description combining the maze, the camera and the HUD.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Installed maze, absent between clearing a level and receiving the next.
    pub maze: Option<MazePresentation>,
    /// Camera placement for the current frame.
    pub camera: Camera,
    /// Heads-up display content.
    pub hud: Hud,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Material colors applied to the maze.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Physical keys the labyrinth reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Walk forward.
    W,
    /// Strafe left.
    A,
    /// Walk backward.
    S,
    /// Strafe right.
    D,
    /// Start the run.
    Space,
    /// Any key without a binding.
    Other,
}

/// Edge-triggered keyboard transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Key that changed state.
    pub key: Key,
    /// `true` on key-down, `false` on key-up.
    pub pressed: bool,
}

impl KeyEvent {
    /// Key-down transition.
    #[must_use]
    pub const fn down(key: Key) -> Self {
        Self { key, pressed: true }
    }

    /// Key-up transition.
    #[must_use]
    pub const fn up(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Key transitions observed since the previous frame, in arrival order.
    pub keys: Vec<KeyEvent>,
    /// Horizontal pointer movement since the previous frame, in pixels.
    pub pointer_yaw_delta: f32,
    /// Whether the player clicked the viewport this frame.
    pub start_requested: bool,
}

/// Rendering backend capable of presenting labyrinth scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> MazePresentation {
        let grid = Grid::from_rows(vec![
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Exit, Cell::Wall],
        ]);
        MazePresentation::new(Arc::new(grid), 1)
    }

    #[test]
    fn hex_colors_unpack_channels() {
        let gold = Color::from_hex(0xff_d7_00);
        assert_eq!(gold, Color::from_rgb_u8(255, 215, 0));
    }

    #[test]
    fn wall_blocks_rest_on_the_floor() {
        let maze = corridor();
        let blocks: Vec<_> = maze.wall_blocks().collect();
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[0], Vec3::new(-1.5, 1.0, -1.5));
        assert_eq!(maze.ceiling_extent(), Vec2::new(3.0, 3.0));
    }

    #[test]
    fn floor_tiles_mark_the_exit() {
        let maze = corridor();
        let exits: Vec<_> = maze
            .floor_tiles()
            .filter(|(_, cell)| *cell == Cell::Exit)
            .collect();
        assert_eq!(exits, vec![(Vec3::new(-0.5, 0.0, 0.5), Cell::Exit)]);
    }

    #[test]
    fn camera_sits_at_eye_height_above_agent() {
        let camera = Camera::from_agent(WorldPosition::new(-4.5, -4.5), Heading::default());
        assert_eq!(camera.eye, Vec3::new(-4.5, EYE_HEIGHT, -4.5));
        assert!((camera.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn congratulations_banner_reports_totals() {
        let banner = Banner::Congratulations {
            levels: 10,
            seconds: 187,
        };
        assert_eq!(
            banner.message(),
            "Congratulations! You've completed all 10 levels in 187 seconds!"
        );
    }
}
