//! Obstacle-free grid pathfinder.
//!
//! # Responsibility
//! - Route between two tiles with orthogonal unit steps.
//!
//! # Invariants
//! - Output starts at `from`, ends at `to`, and is never empty.
//! - Consecutive tiles differ by exactly one step on one axis, except for
//!   endpoints further apart than [`MAX_STEP_DISTANCE`], which are joined by
//!   their corner waypoints only.
//! - Same inputs always produce the same route.
//! - The search area is the grid extended to cover both endpoints, so
//!   negative or out-of-grid endpoints and zero-size grids still terminate.
//! - Coordinates at the edges of the `i32` range never overflow.

use crate::model::geometry::{Coords, Size};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Longest Manhattan distance routed tile by tile.
pub const MAX_STEP_DISTANCE: u32 = 4096;

/// Neighbour expansion order: right, down, left, up.
const STEPS: [Coords; 4] = [
    Coords::new(1, 0),
    Coords::new(0, 1),
    Coords::new(-1, 0),
    Coords::new(0, -1),
];

/// Inclusive routing bounds.
#[derive(Debug, Clone, Copy)]
struct Area {
    low: Coords,
    high: Coords,
}

impl Area {
    fn covering(grid_size: Size, from: Coords, to: Coords) -> Self {
        let mut low = Coords::new(from.x.min(to.x), from.y.min(to.y));
        let mut high = Coords::new(from.x.max(to.x), from.y.max(to.y));
        if grid_size.width > 0 && grid_size.height > 0 {
            low.x = low.x.min(0);
            low.y = low.y.min(0);
            high.x = high.x.max(grid_size.width - 1);
            high.y = high.y.max(grid_size.height - 1);
        }
        Self { low, high }
    }

    fn contains(&self, tile: Coords) -> bool {
        (self.low.x..=self.high.x).contains(&tile.x) && (self.low.y..=self.high.y).contains(&tile.y)
    }
}

/// Open-set entry. `BinaryHeap` is a max-heap, so ordering is reversed to
/// pop the lowest cost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_cost: u32,
    h_cost: u32,
    tile: Coords,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            // Closer to target first keeps the search on a single staircase.
            .then(other.h_cost.cmp(&self.h_cost))
            .then(other.tile.y.cmp(&self.tile.y))
            .then(other.tile.x.cmp(&self.tile.x))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a route from `from` to `to` inside a grid of `grid_size` tiles.
///
/// `from == to` yields `[from]`.
pub fn find_path(grid_size: Size, from: Coords, to: Coords) -> Vec<Coords> {
    if from == to {
        return vec![from];
    }
    if from.manhattan_to(to) > MAX_STEP_DISTANCE {
        return corner_waypoints(from, to);
    }

    let area = Area::covering(grid_size, from, to);
    astar(area, from, to).unwrap_or_else(|| staircase(from, to))
}

fn astar(area: Area, from: Coords, to: Coords) -> Option<Vec<Coords>> {
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Coords, Coords> = HashMap::new();
    let mut g_costs: HashMap<Coords, u32> = HashMap::new();
    let mut closed: HashSet<Coords> = HashSet::new();

    g_costs.insert(from, 0);
    let h = from.manhattan_to(to);
    open.push(OpenEntry {
        f_cost: h,
        h_cost: h,
        tile: from,
    });

    while let Some(current) = open.pop() {
        if current.tile == to {
            return Some(reconstruct(&came_from, from, to));
        }
        if !closed.insert(current.tile) {
            continue;
        }

        let current_g = g_costs.get(&current.tile).copied().unwrap_or(u32::MAX);
        for step in STEPS {
            let Some(next) = current.tile.checked_add(step) else {
                continue;
            };
            if !area.contains(next) || closed.contains(&next) {
                continue;
            }

            let tentative = current_g.saturating_add(1);
            if tentative >= g_costs.get(&next).copied().unwrap_or(u32::MAX) {
                continue;
            }

            g_costs.insert(next, tentative);
            came_from.insert(next, current.tile);
            let h = next.manhattan_to(to);
            open.push(OpenEntry {
                f_cost: tentative.saturating_add(h),
                h_cost: h,
                tile: next,
            });
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Coords, Coords>, from: Coords, to: Coords) -> Vec<Coords> {
    let mut path = vec![to];
    let mut cursor = to;
    while cursor != from {
        match came_from.get(&cursor) {
            Some(previous) => {
                cursor = *previous;
                path.push(cursor);
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Horizontal-then-vertical turn, as waypoints.
fn corner_waypoints(from: Coords, to: Coords) -> Vec<Coords> {
    let corner = Coords::new(to.x, from.y);
    let mut path = vec![from];
    if corner != from && corner != to {
        path.push(corner);
    }
    path.push(to);
    path
}

/// Horizontal-then-vertical walk.
fn staircase(from: Coords, to: Coords) -> Vec<Coords> {
    let mut path = vec![from];
    let mut cursor = from;
    while cursor.x != to.x {
        cursor.x += (to.x - cursor.x).signum();
        path.push(cursor);
    }
    while cursor.y != to.y {
        cursor.y += (to.y - cursor.y).signum();
        path.push(cursor);
    }
    path
}
