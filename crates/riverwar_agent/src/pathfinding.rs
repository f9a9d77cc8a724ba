//! Grid pathfinding by breadth-first search.
//!
//! The grid is unweighted, so BFS yields a shortest path by edge count.
//! Neighbors expand in the fixed N, E, S, W tile order, which together
//! with the FIFO fringe makes every search fully deterministic.
//!
//! Paths are ephemeral: occupancy changes as other units move within
//! the same turn, so a path must be recomputed every time it is needed
//! and never reused.

use std::collections::{HashMap, VecDeque};

use riverwar_core::grid::TileId;
use riverwar_core::state::GameState;
use riverwar_core::units::MoveDomain;

/// Find a shortest route from `start` to `goal` for a unit of the given
/// movement domain.
///
/// The returned sequence excludes `start` and includes `goal`. An empty
/// sequence means either `start == goal` or no route exists under the
/// current occupancy - both are normal outcomes, not errors.
///
/// A tile joins the fringe only if it is unvisited, unoccupied, and
/// passable for the domain; the goal itself is exempt from those tests
/// so a route can terminate on a tile the mover will stop next to.
#[must_use]
pub fn find_path(
    state: &GameState,
    domain: MoveDomain,
    start: TileId,
    goal: TileId,
) -> Vec<TileId> {
    if start == goal {
        return Vec::new();
    }

    let map = state.map();
    let mut fringe: VecDeque<TileId> = VecDeque::new();
    let mut came_from: HashMap<TileId, TileId> = HashMap::new();

    fringe.push_back(start);
    came_from.insert(start, start);

    while let Some(inspect) = fringe.pop_front() {
        let Some(tile) = map.get(inspect) else {
            continue;
        };
        for neighbor in tile.neighbors().into_iter().flatten() {
            if neighbor == goal {
                return reconstruct(&came_from, start, inspect, goal);
            }
            if came_from.contains_key(&neighbor) {
                continue;
            }
            let Some(next) = map.get(neighbor) else {
                continue;
            };
            if next.unit.is_some() || !next.terrain.passable(domain) {
                continue;
            }
            came_from.insert(neighbor, inspect);
            fringe.push_back(neighbor);
        }
    }

    // Fringe exhausted: no route under current occupancy.
    Vec::new()
}

/// Walk the came-from mapping backward from the tile that reached the
/// goal, then reverse into start-to-goal order.
fn reconstruct(
    came_from: &HashMap<TileId, TileId>,
    start: TileId,
    reached_from: TileId,
    goal: TileId,
) -> Vec<TileId> {
    let mut path = vec![goal];
    let mut cursor = reached_from;
    while cursor != start {
        path.push(cursor);
        match came_from.get(&cursor) {
            Some(&prev) => cursor = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use riverwar_core::grid::Coord;
    use riverwar_core::player::PlayerId;
    use riverwar_test_utils::strategies::dims_with_two_coords;
    use riverwar_test_utils::{open_state, riverine_state, tile_id, worker_at};

    #[test]
    fn test_path_to_self_is_empty() {
        let state = open_state(5, 5);
        let a = tile_id(&state, 2, 2);
        assert!(find_path(&state, MoveDomain::Field, a, a).is_empty());
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let state = open_state(10, 10);
        let start = tile_id(&state, 0, 0);
        let goal = tile_id(&state, 9, 9);

        let path = find_path(&state, MoveDomain::Field, start, goal);
        assert_eq!(path.len(), 18);
        assert_eq!(*path.last().unwrap(), goal);

        let first = state.map().get(path[0]).unwrap().coord;
        assert!(first == Coord::new(1, 0) || first == Coord::new(0, 1));
    }

    #[test]
    fn test_adjacent_goal_is_single_step() {
        let state = open_state(4, 4);
        let start = tile_id(&state, 1, 1);
        let goal = tile_id(&state, 2, 1);
        let path = find_path(&state, MoveDomain::Field, start, goal);
        assert_eq!(path, vec![goal]);
    }

    #[test]
    fn test_river_wall_blocks() {
        let river: Vec<Coord> = (0..5).map(|y| Coord::new(2, y)).collect();
        let state = riverine_state(5, 5, &river);
        let start = tile_id(&state, 0, 2);
        let goal = tile_id(&state, 4, 2);
        assert!(find_path(&state, MoveDomain::Field, start, goal).is_empty());
    }

    #[test]
    fn test_occupied_wall_blocks() {
        let mut state = open_state(5, 5);
        for y in 0..5 {
            let _ = worker_at(&mut state, PlayerId::EAST, 2, y);
        }
        let start = tile_id(&state, 0, 2);
        let goal = tile_id(&state, 4, 2);
        assert!(find_path(&state, MoveDomain::Field, start, goal).is_empty());
    }

    #[test]
    fn test_detours_around_partial_wall() {
        let river: Vec<Coord> = (0..4).map(|y| Coord::new(2, y)).collect();
        let state = riverine_state(5, 5, &river);
        let start = tile_id(&state, 0, 0);
        let goal = tile_id(&state, 4, 0);

        let path = find_path(&state, MoveDomain::Field, start, goal);
        assert!(!path.is_empty());
        // Must dip to row 4 to round the wall: 4 down, 4 across, 4 up.
        assert_eq!(path.len(), 12);
        for &step in &path {
            let tile = state.map().get(step).unwrap();
            assert_ne!(tile.coord, Coord::new(2, 0));
        }
    }

    #[test]
    fn test_occupied_goal_still_reachable() {
        // The goal tile is exempt from the occupancy test.
        let mut state = open_state(5, 5);
        let _ = worker_at(&mut state, PlayerId::EAST, 4, 0);
        let start = tile_id(&state, 0, 0);
        let goal = tile_id(&state, 4, 0);
        let path = find_path(&state, MoveDomain::Field, start, goal);
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_same_inputs_same_path() {
        let river = [Coord::new(3, 1), Coord::new(3, 2), Coord::new(3, 3)];
        let state = riverine_state(8, 8, &river);
        let start = tile_id(&state, 1, 2);
        let goal = tile_id(&state, 6, 2);

        let first = find_path(&state, MoveDomain::Field, start, goal);
        let second = find_path(&state, MoveDomain::Field, start, goal);
        let third = find_path(&state, MoveDomain::Field, start, goal);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    proptest! {
        #[test]
        fn prop_path_to_self_is_empty(((w, h), a, _b) in dims_with_two_coords()) {
            let state = open_state(w, h);
            let start = tile_id(&state, a.x, a.y);
            prop_assert!(find_path(&state, MoveDomain::Field, start, start).is_empty());
        }

        #[test]
        fn prop_open_grid_length_is_manhattan(((w, h), a, b) in dims_with_two_coords()) {
            let state = open_state(w, h);
            let start = tile_id(&state, a.x, a.y);
            let goal = tile_id(&state, b.x, b.y);
            let path = find_path(&state, MoveDomain::Field, start, goal);
            prop_assert_eq!(path.len() as u32, a.manhattan(b));
        }

        #[test]
        fn prop_path_steps_are_adjacent(((w, h), a, b) in dims_with_two_coords()) {
            let state = open_state(w, h);
            let start = tile_id(&state, a.x, a.y);
            let goal = tile_id(&state, b.x, b.y);
            let path = find_path(&state, MoveDomain::Field, start, goal);
            let mut prev = start;
            for &step in &path {
                prop_assert!(state.map().adjacent(prev, step));
                prev = step;
            }
        }
    }
}
