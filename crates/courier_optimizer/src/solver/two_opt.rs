use tracing::debug;

use crate::problem::{
    distance_index::{Distance, DistanceIndex},
    location::{DEPOT, LocationIdx},
};

/// Smallest gain that counts as an improvement.
const IMPROVEMENT_EPSILON: Distance = 1e-9;

/// **Intra-Route 2-Opt** on an open route leaving the depot.
///
/// Reverses the stops between `from` and `to` (inclusive). The depot is the
/// predecessor of the first stop, and `to + 1` always lies inside the route.
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///          ^             ^               ^            ^
///          A             B               C            D
///
/// AFTER (Sequence Reversed):
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
///          ^             ^               ^            ^
///          A             C               B            D
///
/// Edges Removed: (prev->from), (to->next)
/// Edges Added:   (prev->to),   (from->next)
/// ```
#[derive(Debug)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug, Clone, Copy)]
pub struct TwoOptParams {
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        debug_assert!(params.from < params.to, "TwoOpt: cannot have from >= to");

        TwoOptOperator { params }
    }

    /// Change in route distance if the move were applied, from the two
    /// boundary edges only. Exact on a symmetric table.
    pub fn delta(&self, index: &DistanceIndex, route: &[LocationIdx]) -> Distance {
        let TwoOptParams { from, to } = self.params;

        let prev = if from == 0 { DEPOT } else { route[from - 1] };
        let next = route[to + 1];

        let current_cost =
            index.travel_distance(prev, route[from]) + index.travel_distance(route[to], next);
        let new_cost =
            index.travel_distance(prev, route[to]) + index.travel_distance(route[from], next);

        new_cost - current_cost
    }

    pub fn apply<T>(&self, route: &mut [T]) {
        route[self.params.from..=self.params.to].reverse();
    }

    /// Visits the candidate moves of a route with `len` stops in scan order.
    fn generate_moves<C>(len: usize, mut consumer: C) -> Option<TwoOptOperator>
    where
        C: FnMut(&TwoOptOperator) -> bool,
    {
        if len < 4 {
            return None;
        }

        for from in 0..len - 3 {
            for to in (from + 1)..len - 1 {
                let op = TwoOptOperator::new(TwoOptParams { from, to });
                if consumer(&op) {
                    return Some(op);
                }
            }
        }

        None
    }
}

/// Applies first-improvement 2-opt moves to `route` until a full scan finds
/// none. `location` maps a stop to its table column. Returns the number of
/// moves applied.
pub fn improve<T, F>(index: &DistanceIndex, route: &mut [T], location: F) -> usize
where
    F: Fn(&T) -> LocationIdx,
{
    let mut locations = route.iter().map(&location).collect::<Vec<_>>();
    let mut moves = 0;

    while let Some(op) = TwoOptOperator::generate_moves(locations.len(), |op| {
        op.delta(index, &locations) < -IMPROVEMENT_EPSILON
    }) {
        debug!(
            from = op.params.from,
            to = op.params.to,
            delta = op.delta(index, &locations),
            "Applying 2-opt move"
        );
        op.apply(&mut locations);
        op.apply(route);
        moves += 1;
    }

    moves
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    fn open_route_distance(index: &DistanceIndex, route: &[LocationIdx]) -> Distance {
        let mut previous = DEPOT;
        let mut total = 0.0;
        for &location in route {
            total += index.travel_distance(previous, location);
            previous = location;
        }
        total
    }

    #[test]
    fn test_delta_matches_route_change() {
        let index = test_utils::create_line_index(6);
        let route = [3, 1, 2, 5, 4, 6].map(LocationIdx::new);

        for (from, to) in [(0, 1), (0, 4), (1, 3), (2, 4)] {
            let op = TwoOptOperator::new(TwoOptParams { from, to });
            let mut reversed = route;
            op.apply(&mut reversed);

            let expected =
                open_route_distance(&index, &reversed) - open_route_distance(&index, &route);
            assert!((op.delta(&index, &route) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_improve_untangles_line() {
        let index = test_utils::create_line_index(5);
        let mut route = [1, 3, 2, 4, 5].map(LocationIdx::new);

        let moves = improve(&index, &mut route, |&location| location);

        assert_eq!(moves, 1);
        assert_eq!(route, [1, 2, 3, 4, 5].map(LocationIdx::new));
    }

    #[test]
    fn test_improve_never_increases_distance() {
        let index = test_utils::create_line_index(8);
        let routes = [
            [8, 1, 7, 2, 6, 3, 5, 4],
            [2, 1, 4, 3, 6, 5, 8, 7],
            [1, 2, 3, 4, 5, 6, 7, 8],
            [5, 4, 3, 2, 1, 8, 7, 6],
        ];

        for route in routes {
            let mut route = route.map(LocationIdx::new);
            let before = open_route_distance(&index, &route);
            improve(&index, &mut route, |&location| location);
            let after = open_route_distance(&index, &route);

            assert!(after <= before + 1e-9, "{after} > {before}");
        }
    }

    #[test]
    fn test_short_routes_are_left_alone() {
        let index = test_utils::create_line_index(3);
        let mut route = [3, 1, 2].map(LocationIdx::new);

        assert_eq!(improve(&index, &mut route, |&location| location), 0);
        assert_eq!(route, [3, 1, 2].map(LocationIdx::new));
    }
}
