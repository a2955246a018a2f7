use core::fmt;
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, CellState, N_NEIGHBOURS};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::search::{search, CancelToken, SearchObserver, SearchOutcome};

/// Down, up, right and left as (row, column) deltas. The order decides which of
/// several equal-length routes the search settles on.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); N_NEIGHBOURS] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A square grid of [Cell]s together with the placed start and end markers.
///
/// Positions are [Point]s with `x` as the row and `y` as the column. Besides the
/// cells, the grid maintains a [UnionFind] of 4-connected passable components so
/// hosts can ask whether the end is reachable at all before animating a search.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cell_width: u32,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Allocates `size`×`size` empty cells. `cell_width` is only used to map pixel
    /// positions back to cells.
    pub fn new(size: i32, cell_width: u32) -> Result<Grid> {
        if size <= 0 {
            return Err(GridError::InvalidSize(size));
        }
        Ok(Grid::allocate(size as usize, cell_width))
    }

    pub fn from_config(config: &GridConfig) -> Result<Grid> {
        Grid::new(config.rows, config.cell_width())
    }

    fn allocate(size: usize, cell_width: u32) -> Grid {
        let cells = iproduct!(0..size as i32, 0..size as i32)
            .map(|(row, col)| Cell::new(Point::new(row, col)))
            .collect::<Vec<Cell>>();
        let mut grid = Grid {
            size,
            cell_width,
            cells,
            start: None,
            end: None,
            components: UnionFind::new(size * size),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.size
            && (point.y as usize) < self.size
    }
    fn check_bounds(&self, point: &Point) -> Result<()> {
        if self.in_bounds(point) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds(*point))
        }
    }
    /// Row-major index of an in-bounds point.
    pub(crate) fn get_ix_point(&self, point: &Point) -> usize {
        debug_assert!(self.in_bounds(point));
        point.x as usize * self.size + point.y as usize
    }

    pub fn cell(&self, point: &Point) -> Option<&Cell> {
        if self.in_bounds(point) {
            Some(&self.cells[self.get_ix_point(point)])
        } else {
            None
        }
    }
    pub(crate) fn cell_mut(&mut self, point: &Point) -> &mut Cell {
        let ix = self.get_ix_point(point);
        &mut self.cells[ix]
    }
    pub fn state(&self, point: &Point) -> Option<CellState> {
        self.cell(point).map(Cell::state)
    }
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    /// The cells of each row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    pub fn can_move_to(&self, point: &Point) -> bool {
        self.state(point).is_some_and(CellState::is_passable)
    }
    /// Passable orthogonal neighbours of `point` in down, up, right, left order.
    pub fn neighborhood_points(&self, point: &Point) -> SmallVec<[Point; N_NEIGHBOURS]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|(dr, dc)| Point::new(point.x + dr, point.y + dc))
            .filter(|p| self.can_move_to(p))
            .collect()
    }
    /// Recomputes the cached neighbour list of every cell. Has to run after edits
    /// and before a search.
    pub fn update_neighbours(&mut self) {
        for ix in 0..self.cells.len() {
            let neighbours = self.neighborhood_points(&self.cells[ix].pos());
            self.cells[ix].set_neighbours(neighbours);
        }
    }

    /// Changes a cell's state and keeps the components in sync. Placing a barrier may
    /// split a component, so that only flags the components as dirty.
    fn set_state(&mut self, point: Point, state: CellState) {
        let was_passable = self.can_move_to(&point);
        self.cell_mut(&point).set_state(state);
        if was_passable && !state.is_passable() {
            self.components_dirty = true;
        } else if !was_passable && state.is_passable() {
            let p_ix = self.get_ix_point(&point);
            for n in self.neighborhood_points(&point) {
                let n_ix = self.get_ix_point(&n);
                self.components.union(p_ix, n_ix);
            }
        }
    }

    /// Moves the start marker to `point`, replacing whatever was there unless it is
    /// the end.
    pub fn set_start(&mut self, point: Point) -> Result<()> {
        self.check_bounds(&point)?;
        if self.end == Some(point) {
            return Err(GridError::Reserved(point));
        }
        if let Some(old) = self.start.take() {
            self.set_state(old, CellState::Empty);
        }
        self.set_state(point, CellState::Start);
        self.start = Some(point);
        debug!("Start placed at {:?}", point);
        Ok(())
    }

    /// Moves the end marker to `point`, replacing whatever was there unless it is
    /// the start.
    pub fn set_end(&mut self, point: Point) -> Result<()> {
        self.check_bounds(&point)?;
        if self.start == Some(point) {
            return Err(GridError::Reserved(point));
        }
        if let Some(old) = self.end.take() {
            self.set_state(old, CellState::Empty);
        }
        self.set_state(point, CellState::End);
        self.end = Some(point);
        debug!("End placed at {:?}", point);
        Ok(())
    }

    pub fn set_barrier(&mut self, point: Point) -> Result<()> {
        self.check_bounds(&point)?;
        if self.start == Some(point) || self.end == Some(point) {
            return Err(GridError::Reserved(point));
        }
        self.set_state(point, CellState::Barrier);
        Ok(())
    }

    /// Resets a cell to empty. Clearing the start or end cell unsets that marker.
    pub fn clear_cell(&mut self, point: Point) -> Result<()> {
        self.check_bounds(&point)?;
        if self.start == Some(point) {
            self.start = None;
        } else if self.end == Some(point) {
            self.end = None;
        }
        self.set_state(point, CellState::Empty);
        Ok(())
    }

    /// Replaces the grid by a fresh one of the same dimensions.
    pub fn clear_all(&mut self) {
        info!("Clearing {}x{} grid", self.size, self.size);
        *self = Grid::allocate(self.size, self.cell_width);
    }

    /// Wipes open, closed and path marks of a previous search. Start, end and
    /// barriers stay.
    pub fn reset_search(&mut self) {
        self.cells
            .iter_mut()
            .filter(|c| c.state().is_search_mark())
            .for_each(Cell::reset);
    }

    /// Maps a pixel position inside the window to the cell under it.
    pub fn cell_at_pixel(&self, px: u32, py: u32) -> Option<Point> {
        if self.cell_width == 0 {
            return None;
        }
        let point = Point::new((px / self.cell_width) as i32, (py / self.cell_width) as i32);
        self.in_bounds(&point).then_some(point)
    }

    /// Primary-button placement: the start goes down first, then the end, and every
    /// later click on another cell raises a barrier. Returns the cell's new state.
    pub fn place(&mut self, point: Point) -> Result<CellState> {
        self.check_bounds(&point)?;
        if self.start.is_none() && self.end != Some(point) {
            self.set_start(point)?;
        } else if self.end.is_none() && self.start != Some(point) {
            self.set_end(point)?;
        } else if self.start != Some(point) && self.end != Some(point) {
            self.set_barrier(point)?;
        }
        Ok(self.cells[self.get_ix_point(&point)].state())
    }

    /// Secondary-button erase.
    pub fn erase(&mut self, point: Point) -> Result<()> {
        self.clear_cell(point)
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if self.in_bounds(start) && self.in_bounds(goal) {
            self.components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
        } else {
            false
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable grid neighbours to
    /// the same components. Looking down and right is enough to cover every edge.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.size * self.size);
        self.components_dirty = false;
        for (row, col) in iproduct!(0..self.size as i32, 0..self.size as i32) {
            let point = Point::new(row, col);
            if !self.can_move_to(&point) {
                continue;
            }
            let parent_ix = self.get_ix_point(&point);
            let neighbour_ixs = [Point::new(row + 1, col), Point::new(row, col + 1)]
                .into_iter()
                .filter(|p| self.can_move_to(p))
                .map(|p| self.get_ix_point(&p))
                .collect::<SmallVec<[usize; 2]>>();
            for ix in neighbour_ixs {
                self.components.union(parent_ix, ix);
            }
        }
    }

    /// Recomputes adjacency and searches from the placed start to the placed end,
    /// wiping the marks of any earlier search first.
    pub fn run<O>(&mut self, observer: &mut O, cancel: &CancelToken) -> Result<SearchOutcome>
    where
        O: SearchObserver + ?Sized,
    {
        let start = self.start.ok_or(GridError::MissingStart)?;
        let end = self.end.ok_or(GridError::MissingEnd)?;
        self.reset_search();
        self.update_neighbours();
        self.update();
        let reachable = self.reachable(&start, &end);
        if !reachable {
            info!("{:?} is not reachable from {:?}", end, start);
        }
        let outcome = search(self, start, end, observer, cancel)?;
        if reachable && matches!(outcome, SearchOutcome::NoPathExists { .. }) {
            warn!("Reachable goal could not be pathed to, is reachable graph correct?");
        }
        Ok(outcome)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row.iter().map(|c| c.state().symbol()).join(""))?;
        }
        Ok(())
    }
}
