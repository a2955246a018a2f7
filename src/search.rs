//! A* over the cached cell adjacency of a [Grid], driven one expansion at a time so
//! a host can redraw after every step. Follows the same frontier discipline as
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! but keys entries by an insertion sequence so equal f-scores are expanded first
//! in, first out.
use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info, trace};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;

use crate::cell::{CellState, N_NEIGHBOURS};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::heuristic::manhattan;
use crate::reconstruct::reconstruct;
use crate::EDGE_COST;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A g- or f-score. Cells that have not been reached score [Score::Infinite], which
/// compares greater than every finite score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    Finite(u32),
    #[default]
    Infinite,
}

impl Score {
    pub fn finite(self) -> Option<u32> {
        match self {
            Score::Finite(c) => Some(c),
            Score::Infinite => None,
        }
    }
}

/// How a search ended. `expanded` counts frontier pops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `path` runs from the end back to the cell after the start; `cost` is the
    /// g-score of the end.
    PathFound {
        path: Vec<Point>,
        cost: u32,
        expanded: usize,
    },
    NoPathExists {
        expanded: usize,
    },
    Cancelled {
        expanded: usize,
    },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::PathFound { .. })
    }
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchOutcome::PathFound { path, .. } => Some(path),
            _ => None,
        }
    }
    pub fn expanded(&self) -> usize {
        match self {
            SearchOutcome::PathFound { expanded, .. }
            | SearchOutcome::NoPathExists { expanded }
            | SearchOutcome::Cancelled { expanded } => *expanded,
        }
    }
}

/// Receives progress while a search runs. The grid is lent read-only, so an
/// observer can draw it but never edit it mid-search.
pub trait SearchObserver {
    /// Called once per expansion and once per cell tagged as path.
    fn on_step(&mut self, grid: &Grid);

    /// Called right after a cell is popped from the frontier.
    fn on_expand(&mut self, _current: &Point) {}
}

impl<F> SearchObserver for F
where
    F: FnMut(&Grid),
{
    fn on_step(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// Observer for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_step(&mut self, _grid: &Grid) {}
}

/// Cooperative abort flag, checked once per loop iteration of [search]. Clones share
/// the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }
    pub fn cancel(&self) {
        self.flag.store(true, atomic::Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(atomic::Ordering::Relaxed)
    }
    pub fn reset(&self) {
        self.flag.store(false, atomic::Ordering::Relaxed);
    }
}

struct FrontierEntry {
    f_score: u32,
    sequence: usize,
    pos: Point,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.sequence == other.sequence
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest f-score, and among equal
        // f-scores the earliest insertion.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Bookkeeping of a single search, dropped when it returns.
struct SearchState {
    g_score: FxHashMap<Point, u32>,
    f_score: FxHashMap<Point, u32>,
    predecessors: FxIndexMap<Point, Point>,
    frontier: BinaryHeap<FrontierEntry>,
    in_frontier: FxHashSet<Point>,
    sequence: usize,
}

impl SearchState {
    fn new(start: Point, estimate: u32) -> SearchState {
        let mut state = SearchState {
            g_score: FxHashMap::default(),
            f_score: FxHashMap::default(),
            predecessors: FxIndexMap::default(),
            frontier: BinaryHeap::new(),
            in_frontier: FxHashSet::default(),
            sequence: 0,
        };
        state.g_score.insert(start, 0);
        state.f_score.insert(start, estimate);
        state.frontier.push(FrontierEntry {
            f_score: estimate,
            sequence: 0,
            pos: start,
        });
        state.in_frontier.insert(start);
        state
    }

    fn g(&self, pos: &Point) -> Score {
        self.g_score
            .get(pos)
            .map_or(Score::Infinite, |&c| Score::Finite(c))
    }

    /// Pushes `pos` with the next sequence number unless it is already queued. A
    /// queued cell keeps its original key even if its f-score improved since.
    fn enqueue(&mut self, pos: Point, f_score: u32) -> bool {
        if !self.in_frontier.insert(pos) {
            return false;
        }
        self.sequence += 1;
        self.frontier.push(FrontierEntry {
            f_score,
            sequence: self.sequence,
            pos,
        });
        true
    }
}

fn validate(grid: &Grid, start: &Point, end: &Point) -> Result<()> {
    for p in [start, end] {
        if !grid.in_bounds(p) {
            return Err(GridError::OutOfBounds(*p));
        }
    }
    if start == end {
        return Err(GridError::SameStartEnd(*start));
    }
    for p in [start, end] {
        if !grid.can_move_to(p) {
            return Err(GridError::Blocked(*p));
        }
    }
    // Searching between other cells than the placed markers would leave a second
    // terminal on the grid.
    if grid.start().is_some_and(|s| s != *start) {
        return Err(GridError::StartMismatch(*start));
    }
    if grid.end().is_some_and(|e| e != *end) {
        return Err(GridError::EndMismatch(*end));
    }
    Ok(())
}

/// Runs A* from `start` to `end` over the neighbour lists cached by the last
/// [Grid::update_neighbours] call, tagging cells Open, Closed and finally Path as
/// it goes. `observer` sees the grid after every expansion; `cancel` is polled right
/// after every pop and leaves all marks made so far in place.
///
/// Invalid start or end positions, including ones that differ from the grid's placed
/// start or end, are rejected before any search state exists. Untagged start and end
/// cells keep their state.
/// Running out of frontier is a regular [SearchOutcome::NoPathExists].
pub fn search<O>(
    grid: &mut Grid,
    start: Point,
    end: Point,
    observer: &mut O,
    cancel: &CancelToken,
) -> Result<SearchOutcome>
where
    O: SearchObserver + ?Sized,
{
    validate(grid, &start, &end)?;
    info!("Computing path from {:?} to {:?}", start, end);

    let mut state = SearchState::new(start, manhattan(&start, &end));
    let mut expanded = 0;
    while let Some(FrontierEntry {
        f_score,
        sequence,
        pos: current,
    }) = state.frontier.pop()
    {
        if cancel.is_cancelled() {
            info!("Search cancelled after {} expansions", expanded);
            return Ok(SearchOutcome::Cancelled { expanded });
        }
        state.in_frontier.remove(&current);
        expanded += 1;
        trace!(
            "Expanding {:?} (key f = {}, current f = {:?}, seq = {})",
            current,
            f_score,
            state.f_score.get(&current),
            sequence
        );
        observer.on_expand(&current);

        if current == end {
            let path = reconstruct(grid, &state.predecessors, &end, observer);
            let cost = state.g(&end).finite().unwrap_or_default();
            debug!(
                "Path of cost {} found after {} expansions, {} cells queued",
                cost, expanded, state.sequence
            );
            return Ok(SearchOutcome::PathFound {
                path,
                cost,
                expanded,
            });
        }

        let current_g = state.g_score.get(&current).copied().unwrap_or_default();
        let neighbours: SmallVec<[Point; N_NEIGHBOURS]> = grid
            .cell(&current)
            .map(|c| c.neighbours().iter().copied().collect())
            .unwrap_or_default();
        for neighbour in neighbours {
            let tentative = current_g + EDGE_COST;
            if Score::Finite(tentative) < state.g(&neighbour) {
                let f = tentative + manhattan(&neighbour, &end);
                state.predecessors.insert(neighbour, current);
                state.g_score.insert(neighbour, tentative);
                state.f_score.insert(neighbour, f);
                if state.enqueue(neighbour, f) && neighbour != end {
                    grid.cell_mut(&neighbour).mark(CellState::Open);
                }
            }
        }

        observer.on_step(grid);

        if current != start {
            grid.cell_mut(&current).mark(CellState::Closed);
        }
    }
    debug!("Frontier exhausted after {} expansions", expanded);
    Ok(SearchOutcome::NoPathExists { expanded })
}
