use grid_astar::{
    heuristic::manhattan, search, CancelToken, CellState, Grid, GridError, NoopObserver,
    SearchObserver, SearchOutcome,
};
use grid_util::point::Point;

fn points(coords: &[(i32, i32)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn grid_with(size: i32, barriers: &[(i32, i32)], start: (i32, i32), end: (i32, i32)) -> Grid {
    let mut grid = Grid::new(size, 10).unwrap();
    for p in points(barriers) {
        grid.set_barrier(p).unwrap();
    }
    grid.set_start(Point::new(start.0, start.1)).unwrap();
    grid.set_end(Point::new(end.0, end.1)).unwrap();
    grid
}

#[derive(Default)]
struct Recorder {
    expanded: Vec<Point>,
    steps: usize,
}

impl SearchObserver for Recorder {
    fn on_step(&mut self, _grid: &Grid) {
        self.steps += 1;
    }
    fn on_expand(&mut self, current: &Point) {
        self.expanded.push(*current);
    }
}

/// Without barriers every cell shares the same f-score, so the whole grid is expanded
/// and the first-in first-out tie-break sends the route down the first column.
#[test]
fn open_grid_corner_to_corner() {
    let mut grid = grid_with(5, &[], (0, 0), (4, 4));
    let end = Point::new(4, 4);
    let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    let SearchOutcome::PathFound {
        path,
        cost,
        expanded,
    } = outcome
    else {
        panic!("expected a path");
    };
    assert_eq!(cost, 8);
    assert_eq!(path.len() as u32, cost);
    assert_eq!(expanded, 25);
    assert_eq!(
        path,
        points(&[(4, 4), (4, 3), (4, 2), (4, 1), (4, 0), (3, 0), (2, 0), (1, 0)])
    );
    // Walking from the start, every step gets closer to the end.
    for pair in path.windows(2) {
        assert!(manhattan(&pair[1], &end) > manhattan(&pair[0], &end));
    }
    assert_eq!(grid.to_string(), "Sxxxx\n*xxxx\n*xxxx\n*xxxx\n****E\n");
}

/// |S#E|
/// | # |
/// |   |
#[test]
fn wall_with_single_gap() {
    let mut grid = grid_with(3, &[(0, 1), (1, 1)], (0, 0), (0, 2));
    let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    let path = outcome.path().unwrap();
    assert!(path.contains(&Point::new(2, 1)));
    assert_eq!(
        path,
        points(&[(0, 2), (1, 2), (2, 2), (2, 1), (2, 0), (1, 0)])
    );
    assert_eq!(grid.to_string(), "S#E\n*#*\n***\n");
}

/// Open cells left on the frontier stay visible after the path is found.
#[test]
fn frontier_remnants_remain_open() {
    let mut grid = grid_with(4, &[(1, 1), (1, 2), (2, 1)], (0, 0), (3, 3));
    let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    assert_eq!(outcome.path().map(|p| p.len()), Some(6));
    assert_eq!(outcome.expanded(), 12);
    assert_eq!(grid.to_string(), "Sxxx\n*##x\n*#ox\n***E\n");
}

#[test]
fn enclosed_start_has_no_path() {
    let mut grid = grid_with(4, &[(0, 1), (1, 0)], (0, 0), (3, 3));
    grid.update();
    assert!(!grid.reachable(&Point::new(0, 0), &Point::new(3, 3)));
    let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    assert_eq!(outcome, SearchOutcome::NoPathExists { expanded: 1 });
    assert_eq!(grid.count(CellState::Path), 0);
    assert_eq!(grid.count(CellState::Closed), 0);
}

#[test]
fn enclosed_end_exhausts_reachable_cells() {
    let mut grid = grid_with(4, &[(2, 3), (3, 2)], (0, 0), (3, 3));
    let outcome = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    assert_eq!(outcome, SearchOutcome::NoPathExists { expanded: 13 });
    assert_eq!(grid.count(CellState::Path), 0);
    assert_eq!(grid.count(CellState::Open), 0);
    // Every reachable cell but the start is closed.
    assert_eq!(grid.count(CellState::Closed), 12);
    assert_eq!(grid.state(&Point::new(3, 3)), Some(CellState::End));
}

#[test]
fn identical_grids_expand_identically() {
    let mut recorders = [Recorder::default(), Recorder::default()];
    for recorder in recorders.iter_mut() {
        let mut grid = grid_with(6, &[(1, 1), (2, 3), (3, 3), (4, 1)], (0, 0), (5, 4));
        grid.run(recorder, &CancelToken::new()).unwrap();
    }
    assert_eq!(recorders[0].expanded, recorders[1].expanded);
    assert_eq!(recorders[0].steps, recorders[1].steps);

    let mut recorder = Recorder::default();
    let mut grid = grid_with(5, &[], (0, 0), (4, 4));
    grid.run(&mut recorder, &CancelToken::new()).unwrap();
    assert_eq!(
        recorder.expanded[..7],
        points(&[(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2), (3, 0)])
    );
    // One step per expansion that is not the end, one per path cell.
    assert_eq!(recorder.steps, 24 + 7);
}

#[test]
fn cancel_after_first_expansion() {
    // The start's only passable neighbour is (0, 1).
    let mut grid = grid_with(3, &[(1, 0)], (0, 0), (2, 2));
    let token = CancelToken::new();
    let trigger = token.clone();
    let mut cancel_on_step = |_: &Grid| trigger.cancel();
    let outcome = grid.run(&mut cancel_on_step, &token).unwrap();
    assert_eq!(outcome, SearchOutcome::Cancelled { expanded: 1 });
    assert_eq!(
        grid.count(CellState::Open) + grid.count(CellState::Closed),
        1
    );
    assert_eq!(grid.state(&Point::new(0, 1)), Some(CellState::Open));
    assert_eq!(grid.state(&Point::new(0, 0)), Some(CellState::Start));
}

#[test]
fn cancel_before_start_leaves_grid_untouched() {
    let mut grid = grid_with(3, &[], (0, 0), (2, 2));
    let token = CancelToken::new();
    token.cancel();
    let outcome = grid.run(&mut NoopObserver, &token).unwrap();
    assert_eq!(outcome, SearchOutcome::Cancelled { expanded: 0 });
    assert_eq!(grid.count(CellState::Empty), 7);

    token.reset();
    let outcome = grid.run(&mut NoopObserver, &token).unwrap();
    assert!(outcome.is_found());
}

#[test]
fn run_requires_both_markers() {
    let mut grid = Grid::new(3, 10).unwrap();
    let cancel = CancelToken::new();
    assert_eq!(
        grid.run(&mut NoopObserver, &cancel),
        Err(GridError::MissingStart)
    );
    grid.set_start(Point::new(0, 0)).unwrap();
    assert_eq!(
        grid.run(&mut NoopObserver, &cancel),
        Err(GridError::MissingEnd)
    );
}

#[test]
fn rerun_gives_same_result() {
    let mut grid = grid_with(6, &[(2, 0), (2, 1), (2, 2), (2, 3), (4, 5)], (0, 0), (5, 5));
    let first = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    let first_render = grid.to_string();
    let second = grid.run(&mut NoopObserver, &CancelToken::new()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_render, grid.to_string());
}

#[test]
fn search_from_explicit_positions() {
    // The cells do not need start and end tags to be searched between, and they
    // keep their state afterwards.
    let mut grid = Grid::new(4, 10).unwrap();
    grid.set_barrier(Point::new(1, 1)).unwrap();
    grid.update_neighbours();
    let start = Point::new(0, 0);
    let end = Point::new(2, 2);
    let outcome = search(&mut grid, start, end, &mut NoopObserver, &CancelToken::new()).unwrap();
    assert_eq!(outcome.path().map(|p| p.len()), Some(4));
    assert_eq!(grid.state(&start), Some(CellState::Empty));
    assert_eq!(grid.state(&end), Some(CellState::Empty));
    assert_eq!(grid.count(CellState::End), 0);
    assert_eq!(grid.count(CellState::Path), 3);

    // A later click still places exactly one end.
    grid.place(Point::new(3, 3)).unwrap();
    grid.place(Point::new(3, 0)).unwrap();
    assert_eq!(grid.count(CellState::Start), 1);
    assert_eq!(grid.count(CellState::End), 1);
}

/// |S  E|
/// |    |
/// |    |
/// |   E|  <- placed end
#[test]
fn search_must_use_placed_markers() {
    let mut grid = grid_with(4, &[], (0, 0), (3, 3));
    grid.update_neighbours();
    let cancel = CancelToken::new();
    let before = grid.to_string();

    let err = search(&mut grid, Point::new(0, 0), Point::new(0, 3), &mut NoopObserver, &cancel)
        .unwrap_err();
    assert_eq!(err, GridError::EndMismatch(Point::new(0, 3)));
    assert!(err.is_invalid_configuration());
    let err = search(&mut grid, Point::new(1, 0), Point::new(3, 3), &mut NoopObserver, &cancel)
        .unwrap_err();
    assert_eq!(err, GridError::StartMismatch(Point::new(1, 0)));

    assert_eq!(grid.to_string(), before);
    assert_eq!(grid.count(CellState::End), 1);
    assert_eq!(grid.end(), Some(Point::new(3, 3)));

    // The placed markers themselves are fine and keep their tags.
    let outcome = search(&mut grid, Point::new(0, 0), Point::new(3, 3), &mut NoopObserver, &cancel)
        .unwrap();
    assert!(outcome.is_found());
    assert_eq!(grid.count(CellState::End), 1);
    assert_eq!(grid.state(&Point::new(3, 3)), Some(CellState::End));
    assert_eq!(grid.count(CellState::Start), 1);
}

#[test]
fn clearing_start_during_editing() {
    let mut grid = Grid::new(3, 10).unwrap();
    grid.place(Point::new(0, 0)).unwrap();
    grid.place(Point::new(2, 2)).unwrap();
    grid.erase(Point::new(0, 0)).unwrap();
    assert_eq!(grid.start(), None);
    assert_eq!(grid.end(), Some(Point::new(2, 2)));
    assert_eq!(
        grid.run(&mut NoopObserver, &CancelToken::new()),
        Err(GridError::MissingStart)
    );
}
