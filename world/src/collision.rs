//! Grid occupancy rules that translate continuous positions into cells.

use labyrinth_core::{Cell, CellCoord, Grid, WorldPosition};

/// Maps a continuous position onto the grid cell it rounds into.
///
/// Each axis is shifted by half the grid extent and rounded half-up, so a
/// position exactly on a cell boundary belongs to the cell with the larger
/// index. Returns `None` when the rounded index falls outside the grid.
pub(crate) fn cell_at(grid: &Grid, position: WorldPosition) -> Option<CellCoord> {
    let column = axis_index(position.x, grid.columns())?;
    let row = axis_index(position.z, grid.rows())?;
    Some(CellCoord::new(column, row))
}

/// Reports whether the position rounds onto a wall.
///
/// Positions outside the grid are never blocked.
pub(crate) fn is_blocked(grid: &Grid, position: WorldPosition) -> bool {
    cell_at(grid, position).and_then(|cell| grid.cell(cell)) == Some(Cell::Wall)
}

/// Reports whether the position rounds onto the exit.
pub(crate) fn is_exit(grid: &Grid, position: WorldPosition) -> bool {
    cell_at(grid, position).and_then(|cell| grid.cell(cell)) == Some(Cell::Exit)
}

/// Centre of the provided cell expressed in world units.
pub(crate) fn cell_center(grid: &Grid, cell: CellCoord) -> WorldPosition {
    WorldPosition::new(
        cell.column() as f32 - grid.columns() as f32 / 2.0,
        cell.row() as f32 - grid.rows() as f32 / 2.0,
    )
}

fn axis_index(offset: f32, extent: u32) -> Option<u32> {
    let rounded = (offset + extent as f32 / 2.0 + 0.5).floor();
    if rounded.is_nan() || rounded < 0.0 || rounded >= extent as f32 {
        return None;
    }
    Some(rounded as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_rows(vec![
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Floor, Cell::Wall],
            vec![Cell::Wall, Cell::Exit, Cell::Wall],
        ])
    }

    #[test]
    fn cell_center_round_trips_through_lookup() {
        let grid = corridor();
        for (coord, _) in grid.iter() {
            assert_eq!(cell_at(&grid, cell_center(&grid, coord)), Some(coord));
        }
    }

    #[test]
    fn boundary_rounds_toward_larger_index() {
        let grid = corridor();
        // x = 0.0 shifts to 1.5, exactly between columns one and two.
        assert_eq!(
            cell_at(&grid, WorldPosition::new(0.0, -0.5)),
            Some(CellCoord::new(2, 1))
        );
        // x = -1.0 shifts to 0.5, exactly between column zero and column one.
        assert_eq!(
            cell_at(&grid, WorldPosition::new(-1.0, -0.5)),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn positions_outside_grid_are_passable() {
        let grid = corridor();
        let outside = WorldPosition::new(-0.5, -3.0);
        assert_eq!(cell_at(&grid, outside), None);
        assert!(!is_blocked(&grid, outside));
        assert!(!is_exit(&grid, outside));
    }

    #[test]
    fn walls_and_exit_are_classified() {
        let grid = corridor();
        assert!(is_blocked(&grid, WorldPosition::new(-1.5, -0.5)));
        assert!(!is_blocked(&grid, WorldPosition::new(-0.5, -0.5)));
        assert!(is_exit(&grid, WorldPosition::new(-0.5, 0.5)));
    }
}
