use grid_util::point::Point;
use std::iter::successors;

use crate::cell::CellState;
use crate::grid::Grid;
use crate::search::{FxIndexMap, SearchObserver};

/// Walks the predecessor links back from `end` and returns the route from `end` to
/// the cell right after the start. Every cell but `end` itself is tagged as path,
/// with `observer` seeing the grid after each tag. The walk stops at the first cell
/// without a predecessor, which is the start, so its marker survives.
pub fn reconstruct<O>(
    grid: &mut Grid,
    predecessors: &FxIndexMap<Point, Point>,
    end: &Point,
    observer: &mut O,
) -> Vec<Point>
where
    O: SearchObserver + ?Sized,
{
    let path = successors(Some(*end), |p| predecessors.get(p).copied())
        .take_while(|p| predecessors.contains_key(p))
        .collect::<Vec<Point>>();
    for p in path.iter().skip(1) {
        grid.cell_mut(p).mark(CellState::Path);
        observer.on_step(grid);
    }
    path
}
