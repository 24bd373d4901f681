//! Observer that reports the state of the world through `tracing`.

use schelling_world::satisfaction::mean_similarity;
use schelling_world::{World, WorldObserver};
use tracing::{info, trace};

/// Logs the census and similarity index every `every` updates
pub struct CensusLogger {
    every: u64,
    radius: usize,
    updates: u64,
}

impl CensusLogger {
    pub fn new(every: u64, radius: usize) -> Self {
        Self {
            every,
            radius,
            updates: 0,
        }
    }

    fn is_due(&self) -> bool {
        self.every > 0 && self.updates % self.every == 0
    }
}

impl WorldObserver for CensusLogger {
    fn on_world_update(&mut self, world: &World) {
        self.updates += 1;
        if !self.is_due() {
            return;
        }

        let census = world.census();
        let similarity = mean_similarity(world, self.radius).unwrap_or(0.0);
        info!(
            step = self.updates,
            type_a = census.type_a,
            type_b = census.type_b,
            empty = census.empty,
            similarity = format!("{:.3}", similarity),
            "World update"
        );
        trace!("\n{}", world);
    }
}
