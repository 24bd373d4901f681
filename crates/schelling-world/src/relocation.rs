//! The relocation pass that rehouses unsatisfied cells.

use crate::grid::World;
use schelling_core::Position;
use tracing::trace;

/// Outcome of one relocation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relocation {
    /// Swaps performed
    pub relocated: usize,
    /// Unsatisfied cells left in place because the pool ran dry
    pub stranded: usize,
}

/// Move every unsatisfied cell, in the given order, into a cell popped from
/// the back of `pool`; the vacated position is pushed back so later moves in
/// the same pass can reuse it.
///
/// Popped positions are not re-checked for emptiness. When the pool is
/// exhausted the remaining unsatisfied cells stay where they are.
pub fn relocate(world: &mut World, pool: &mut Vec<Position>, unsatisfied: &[Position]) -> Relocation {
    let mut outcome = Relocation::default();

    for (i, &from) in unsatisfied.iter().enumerate() {
        let Some(to) = pool.pop() else {
            outcome.stranded = unsatisfied.len() - i;
            break;
        };

        trace!(
            from = %from,
            to = %to,
            occupant = %world.occupant_at(from),
            "Relocating"
        );

        world.swap(from, to);
        pool.push(from);
        outcome.relocated += 1;
    }

    outcome
}
