//! Converts physical dimensions into cell counts. See [solve_dimensions].

use crate::lattice::Orientation;
use log::debug;
use serde::{Deserialize, Serialize};

/// Cell counts for a (possibly ragged) hex grid. Which fields carry the
/// stagger depends on orientation:
///
/// - Pointy-top: rows are stacked vertically and odd rows are shifted right
///   by half a cell, so `cols` is the cell count of even rows and `cols_odd`
///   the count of odd rows. `rows_odd` always equals `rows`.
/// - Flat-top: the same thing rotated. Odd columns are shifted down by half a
///   cell, so `rows` and `rows_odd` are the per-column counts for even and odd
///   columns. `cols_odd` always equals `cols`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct GridDimensions {
    pub cols: u32,
    pub cols_odd: u32,
    pub rows: u32,
    pub rows_odd: u32,
}

impl GridDimensions {
    /// A non-ragged grid with the same count on every row/column
    pub const fn uniform(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            cols_odd: cols,
            rows,
            rows_odd: rows,
        }
    }

    /// Total number of hexagon cells this grid holds
    pub fn cell_count(&self, orientation: Orientation) -> usize {
        let lanes = orientation.lanes(*self);
        (0..lanes.count)
            .map(|lane| lanes.cells_in(lane) as usize)
            .sum()
    }
}

/// Output of [solve_dimensions]: the cell counts, plus the physical extent
/// of the grid those counts produce.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolvedDimensions {
    #[serde(flatten)]
    pub dimensions: GridDimensions,
    pub actual_width: f64,
    pub actual_length: f64,
}

/// Upper bound on the cell count along any single axis. This caps lattice size
/// so that every downstream computation stays cheap.
pub const MAX_CELLS_PER_AXIS: u32 = 100;

/// Smallest spacing we'll solve with. Anything at or below zero would divide
/// by zero, so it gets bumped up to this.
pub const MIN_SPACING: f64 = 0.001;

/// Slack added before flooring a cell count, so that a dimension that's an
/// exact multiple of the cell pitch doesn't lose a cell to float error
const FIT_EPSILON: f64 = 1.0e-9;

/// Figure out how many hexagon cells fit in the requested bounding box. The
/// grid produced by the returned counts never exceeds `width`×`length`,
/// unless the request is smaller than a single cell (every axis gets at least
/// one cell, no matter what).
///
/// `spacing` is the hexagon side length, in the same unit as `width` and
/// `length`.
///
/// The counts are worked out in an orientation-independent frame:
///
/// - **Lanes** are the rows (pointy-top) or columns (flat-top). Lanes are
///   `1.5 * spacing` apart and there's no stagger between them, so the lane
///   count only depends on one dimension.
/// - **Along** a lane, cells are `sqrt(3) * spacing` apart. Odd lanes start
///   half a cell in, so they may fit one fewer cell than even lanes.
pub fn solve_dimensions(
    width: f64,
    length: f64,
    spacing: f64,
    orientation: Orientation,
) -> SolvedDimensions {
    // Written as a negated comparison so NaN gets replaced too
    let spacing = if !(spacing > MIN_SPACING) {
        MIN_SPACING
    } else {
        spacing
    };
    let cell_pitch = 3.0_f64.sqrt() * spacing;
    let lane_pitch = 1.5 * spacing;

    let (along_extent, across_extent) = match orientation {
        Orientation::PointyTop => (width, length),
        Orientation::FlatTop => (length, width),
    };

    let even = fit(along_extent / cell_pitch);
    let odd = fit((along_extent - cell_pitch / 2.0) / cell_pitch);
    // A lane of hexagons is 2 spacings tall, and each extra lane adds 1.5
    let lanes = fit((across_extent - spacing / 2.0) / lane_pitch);

    // Extent along the lanes is measured from the primary (even) lanes
    let actual_along = even as f64 * cell_pitch;
    let actual_across = lanes as f64 * lane_pitch + spacing / 2.0;

    let solved = match orientation {
        Orientation::PointyTop => SolvedDimensions {
            dimensions: GridDimensions {
                cols: even,
                cols_odd: odd,
                rows: lanes,
                rows_odd: lanes,
            },
            actual_width: actual_along,
            actual_length: actual_across,
        },
        Orientation::FlatTop => SolvedDimensions {
            dimensions: GridDimensions {
                cols: lanes,
                cols_odd: lanes,
                rows: even,
                rows_odd: odd,
            },
            actual_width: actual_across,
            actual_length: actual_along,
        },
    };
    debug!(
        "Solved {}x{} ({} spacing, {}) to {:?}",
        width, length, spacing, orientation, solved
    );
    solved
}

/// Floor a fractional cell count, clamped to `[1, MAX_CELLS_PER_AXIS]`
fn fit(cells: f64) -> u32 {
    let cells = (cells + FIT_EPSILON).floor();
    if !(cells >= 1.0) {
        1
    } else if cells >= MAX_CELLS_PER_AXIS as f64 {
        MAX_CELLS_PER_AXIS
    } else {
        cells as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const SQRT_3: f64 = 1.7320508075688772;

    #[test]
    fn test_solve_pointy_top() {
        let solved = solve_dimensions(100.0, 100.0, 10.0, Orientation::PointyTop);
        assert_eq!(
            solved.dimensions,
            GridDimensions {
                cols: 5,
                cols_odd: 5,
                rows: 6,
                rows_odd: 6,
            }
        );
        // Width only counts the even rows
        assert_approx_eq!(solved.actual_width, 5.0 * SQRT_3 * 10.0);
        assert_approx_eq!(solved.actual_length, 95.0);
    }

    #[test]
    fn test_solve_ragged() {
        // Odd rows can't fit a 5th cell once they're shifted over
        let solved = solve_dimensions(90.0, 100.0, 10.0, Orientation::PointyTop);
        assert_eq!(solved.dimensions.cols, 5);
        assert_eq!(solved.dimensions.cols_odd, 4);
        assert_approx_eq!(solved.actual_width, 5.0 * SQRT_3 * 10.0);
        assert!(solved.actual_width <= 90.0);
    }

    #[test]
    fn test_solve_flat_top() {
        let solved = solve_dimensions(100.0, 90.0, 10.0, Orientation::FlatTop);
        assert_eq!(
            solved.dimensions,
            GridDimensions {
                cols: 6,
                cols_odd: 6,
                rows: 5,
                rows_odd: 4,
            }
        );
        assert_approx_eq!(solved.actual_width, 95.0);
        assert_approx_eq!(solved.actual_length, 5.0 * SQRT_3 * 10.0);
    }

    #[test]
    fn test_solve_exact_fit() {
        // Exactly two cells wide shouldn't lose one to rounding
        let width = 2.0 * SQRT_3 * 10.0;
        let solved = solve_dimensions(width, 35.0, 10.0, Orientation::PointyTop);
        assert_eq!(solved.dimensions.cols, 2);
        assert_eq!(solved.dimensions.cols_odd, 1);
        assert_eq!(solved.dimensions.rows, 2);
    }

    #[test]
    fn test_solve_never_exceeds_request() {
        for orientation in [Orientation::PointyTop, Orientation::FlatTop] {
            for &(width, length) in
                &[(50.0, 50.0), (120.0, 37.0), (33.3, 210.0), (77.7, 77.7)]
            {
                let solved = solve_dimensions(width, length, 7.5, orientation);
                assert!(
                    solved.actual_width <= width + 1.0e-6,
                    "{:?} too wide for {}",
                    solved,
                    width
                );
                assert!(
                    solved.actual_length <= length + 1.0e-6,
                    "{:?} too long for {}",
                    solved,
                    length
                );
            }
        }
    }

    #[test]
    fn test_solve_single_cell_wide() {
        // Room for one cell but not the offset odd row, which gets clamped
        // up to 1 anyway. That mustn't push the width past the request.
        let width = 1.2 * SQRT_3 * 10.0;
        let solved = solve_dimensions(width, 100.0, 10.0, Orientation::PointyTop);
        assert_eq!(solved.dimensions.cols, 1);
        assert_eq!(solved.dimensions.cols_odd, 1);
        assert_eq!(solved.dimensions.rows, 6);
        assert_approx_eq!(solved.actual_width, SQRT_3 * 10.0);
        assert!(solved.actual_width <= width);

        let solved = solve_dimensions(100.0, width, 10.0, Orientation::FlatTop);
        assert_eq!(solved.dimensions.rows, 1);
        assert_eq!(solved.dimensions.rows_odd, 1);
        assert!(solved.actual_length <= width);
    }

    #[test]
    fn test_solve_degenerate() {
        // Too small for even one cell, but we always get at least one
        let solved = solve_dimensions(1.0, 1.0, 10.0, Orientation::PointyTop);
        assert_eq!(solved.dimensions, GridDimensions::uniform(1, 1));

        // Zero/negative/NaN inputs are clamped rather than blowing up
        let solved = solve_dimensions(0.0, -5.0, 0.0, Orientation::FlatTop);
        assert_eq!(solved.dimensions, GridDimensions::uniform(1, 1));
        let solved =
            solve_dimensions(f64::NAN, 10.0, f64::NAN, Orientation::PointyTop);
        assert_eq!(solved.dimensions.cols, 1);
    }

    #[test]
    fn test_solve_capped() {
        let solved =
            solve_dimensions(1.0e6, 1.0e6, 1.0, Orientation::PointyTop);
        assert_eq!(
            solved.dimensions,
            GridDimensions::uniform(MAX_CELLS_PER_AXIS, MAX_CELLS_PER_AXIS)
        );
    }

    #[test]
    fn test_cell_count() {
        let dims = GridDimensions {
            cols: 5,
            cols_odd: 4,
            rows: 3,
            rows_odd: 3,
        };
        // 5 + 4 + 5
        assert_eq!(dims.cell_count(Orientation::PointyTop), 14);
        // Flat-top reads the same fields as 5 columns of 3 cells
        assert_eq!(dims.cell_count(Orientation::FlatTop), 15);
    }
}
