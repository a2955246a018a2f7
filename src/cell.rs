use core::fmt;
use grid_util::point::Point;
use smallvec::SmallVec;

/// Number of orthogonal neighbours a cell can have.
pub const N_NEIGHBOURS: usize = 4;

/// Semantic role of a cell. Hosts map these to colours or glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    /// Discovered, still on the frontier.
    Open,
    /// Expanded.
    Closed,
    /// Part of the reconstructed route.
    Path,
}

impl CellState {
    /// Start and End markers are never overwritten by the search.
    pub fn is_terminal(self) -> bool {
        matches!(self, CellState::Start | CellState::End)
    }
    pub fn is_passable(self) -> bool {
        self != CellState::Barrier
    }
    /// Whether the state was produced by a search rather than by editing.
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Open | CellState::Closed | CellState::Path)
    }
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single grid position. The position's `x` is the row and `y` the column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Point,
    state: CellState,
    neighbours: SmallVec<[Point; N_NEIGHBOURS]>,
}

impl Cell {
    pub fn new(pos: Point) -> Cell {
        Cell {
            pos,
            state: CellState::Empty,
            neighbours: SmallVec::new(),
        }
    }
    pub fn pos(&self) -> Point {
        self.pos
    }
    pub fn row(&self) -> i32 {
        self.pos.x
    }
    pub fn col(&self) -> i32 {
        self.pos.y
    }
    pub fn state(&self) -> CellState {
        self.state
    }
    /// Passable neighbours as of the last [update_neighbours](crate::Grid::update_neighbours),
    /// in down, up, right, left order.
    pub fn neighbours(&self) -> &[Point] {
        &self.neighbours
    }
    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }
    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }
    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }
    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }
    pub fn is_closed(&self) -> bool {
        self.state == CellState::Closed
    }
    pub fn is_path(&self) -> bool {
        self.state == CellState::Path
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }
    /// Applies a search mark unless the cell carries a terminal marker.
    pub(crate) fn mark(&mut self, state: CellState) {
        debug_assert!(state.is_search_mark());
        if !self.state.is_terminal() {
            self.state = state;
        }
    }
    pub(crate) fn set_neighbours(&mut self, neighbours: SmallVec<[Point; N_NEIGHBOURS]>) {
        self.neighbours = neighbours;
    }
    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }
}
