//! Neighbourhood evaluation and the satisfaction rule.

use crate::grid::World;
use schelling_core::Position;

/// Same-type and total occupied neighbours of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighbourCount {
    pub same: usize,
    pub total: usize,
}

impl NeighbourCount {
    /// A cell is unsatisfied when `same <= threshold * total`.
    ///
    /// The comparison is inclusive, so a cell with no occupied neighbours
    /// (`0 <= 0`) is always unsatisfied.
    pub fn is_unsatisfied(&self, threshold: f64) -> bool {
        self.same as f64 <= threshold * self.total as f64
    }
}

/// Count neighbours matching the occupant at `pos`.
///
/// Empty cells are compared like any other, against `Empty`; since only
/// occupied cells are neighbours their `same` count is always zero.
pub fn count_same_neighbours(world: &World, pos: Position, radius: usize) -> NeighbourCount {
    let neighbours = world.neighbours_of(pos, radius);
    let occupant = world.occupant_at(pos);

    NeighbourCount {
        same: neighbours.iter().filter(|n| **n == occupant).count(),
        total: neighbours.len(),
    }
}

/// All unsatisfied cells, in row-major scan order
pub fn unsatisfied_positions(world: &World, threshold: f64, radius: usize) -> Vec<Position> {
    world
        .positions()
        .filter(|pos| count_same_neighbours(world, *pos, radius).is_unsatisfied(threshold))
        .collect()
}

/// Mean share of same-type neighbours over occupied cells.
///
/// Cells without occupied neighbours are left out. Returns `None` when no
/// cell qualifies.
pub fn mean_similarity(world: &World, radius: usize) -> Option<f64> {
    let mut sum = 0.0;
    let mut cells = 0usize;

    for (pos, occupant) in world.iter() {
        if occupant.is_empty() {
            continue;
        }

        let count = count_same_neighbours(world, pos, radius);
        if count.total > 0 {
            sum += count.same as f64 / count.total as f64;
            cells += 1;
        }
    }

    (cells > 0).then(|| sum / cells as f64)
}
