use grid_util::point::Point;

use crate::EDGE_COST;

/// Manhattan distance between two positions, scaled by the uniform edge cost.
/// Exact lower bound for 4-connected unit-cost movement, so A* stays optimal.
pub fn manhattan(p1: &Point, p2: &Point) -> u32 {
    ((p1.x - p2.x).unsigned_abs() + (p1.y - p2.y).unsigned_abs()) * EDGE_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_and_zero_on_diagonal() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 4);
        assert_eq!(manhattan(&a, &b), 8);
        assert_eq!(manhattan(&b, &a), 8);
        assert_eq!(manhattan(&a, &a), 0);
        assert_eq!(manhattan(&Point::new(2, 5), &Point::new(3, 1)), 5);
    }
}
