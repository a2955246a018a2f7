//! # grid_astar
//!
//! Step-by-step [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on
//! a square grid for interactive visualizers. A host edits a [Grid] (start, end,
//! barriers), triggers a search and redraws from the cell [states](CellState) every
//! time the [SearchObserver] is called. Movement is 4-directional with unit cost and
//! the heuristic is the [Manhattan distance](heuristic::manhattan), so found paths are
//! shortest paths. Among equally good frontier entries the earliest discovered one is
//! expanded first, which makes the chosen route deterministic.
//!
//! ```
//! use grid_astar::{CancelToken, CellState, Grid, NoopObserver};
//! use grid_util::point::Point;
//!
//! let mut grid = Grid::new(5, 10).unwrap();
//! grid.set_start(Point::new(0, 0)).unwrap();
//! grid.set_end(Point::new(4, 4)).unwrap();
//! let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
//! assert_eq!(outcome.path().map(|p| p.len()), Some(8));
//! assert_eq!(grid.count(CellState::Path), 7);
//! ```
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod reconstruct;
pub mod search;

pub use cell::{Cell, CellState};
pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::Grid;
pub use search::{search, CancelToken, NoopObserver, Score, SearchObserver, SearchOutcome};

/// Cost of a single orthogonal move.
pub const EDGE_COST: u32 = 1;
/// Rows (and columns) of the grid a host gets by default.
pub const DEFAULT_ROWS: i32 = 60;
/// Pixel width of the square window the default grid fills.
pub const DEFAULT_WINDOW_WIDTH: u32 = 600;
