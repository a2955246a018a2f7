use grid_astar::{CancelToken, Grid, GridConfig, SearchOutcome};
use grid_util::point::Point;

// A headless host: the grid is "clicked" in code and every search step is printed as
// text. Cells use the following symbols:
// - S start, E end, # barrier
// - o open (frontier), x closed (expanded), * path
//
// The search is cancelled once it has drawn more than MAX_FRAMES frames.

const MAX_FRAMES: usize = 200;

fn main() -> grid_astar::Result<()> {
    let config = GridConfig::new(8, 80);
    let mut grid = Grid::from_config(&config)?;

    // Clicks in pixel space, like a mouse would deliver them.
    let clicks = [(5, 5), (75, 75), (35, 5), (35, 15), (35, 25), (35, 35), (35, 45), (35, 55)];
    for (px, py) in clicks {
        if let Some(point) = grid.cell_at_pixel(px, py) {
            grid.place(point)?;
        }
    }
    // Punch a hole into the wall again.
    grid.erase(Point::new(3, 3))?;
    println!("{}", grid);

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let mut frame = 0;
    let mut draw = |grid: &Grid| {
        frame += 1;
        println!("Frame {frame}:\n{grid}");
        if frame >= MAX_FRAMES {
            trigger.cancel();
        }
    };
    match grid.run(&mut draw, &cancel)? {
        SearchOutcome::PathFound { cost, expanded, .. } => {
            println!("Path of length {cost} found after {expanded} expansions")
        }
        SearchOutcome::NoPathExists { expanded } => {
            println!("No path after {expanded} expansions")
        }
        SearchOutcome::Cancelled { expanded } => println!("Cancelled after {expanded} expansions"),
    }
    println!("{}", grid);

    grid.clear_all();
    println!("Cleared:\n{}", grid);
    Ok(())
}
