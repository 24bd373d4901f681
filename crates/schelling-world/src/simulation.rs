//! Simulation engine: the step rule, observer notification and the paced run loop.

use crate::grid::World;
use crate::observer::{StopSignal, WorldObserver};
use crate::relocation::{relocate, Relocation};
use crate::satisfaction::{mean_similarity, unsatisfied_positions};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schelling_core::{Census, Result, SimulationConfig, MIN_STEPS_PER_SECOND};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based index of the step
    pub step: u64,
    /// Cells classified unsatisfied in this step
    pub unsatisfied: usize,
    /// Swaps performed
    pub relocated: usize,
    /// Whether the relocation pool ran dry before every cell was moved
    pub pool_exhausted: bool,
}

/// Final state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub census: Census,
    pub similarity: Option<f64>,
}

/// Result of advancing the world by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cells classified unsatisfied
    pub unsatisfied: usize,
    pub relocation: Relocation,
}

impl StepOutcome {
    pub fn pool_exhausted(&self) -> bool {
        self.relocation.stranded > 0
    }
}

/// Advance `world` by one step.
///
/// 1. Shuffle the free positions into the relocation pool.
/// 2. Collect unsatisfied cells in row-major order and shuffle them.
/// 3. Relocate them one by one through the shared pool.
pub fn advance<R: Rng + ?Sized>(
    world: &mut World,
    threshold: f64,
    radius: usize,
    rng: &mut R,
) -> StepOutcome {
    let mut pool = world.free_positions();
    pool.shuffle(rng);

    let mut unsatisfied = unsatisfied_positions(world, threshold, radius);
    unsatisfied.shuffle(rng);

    let relocation = relocate(world, &mut pool, &unsatisfied);
    StepOutcome {
        unsatisfied: unsatisfied.len(),
        relocation,
    }
}

/// Sleeps until the next scheduled tick; never sleeps when running behind.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next_tick: Option<Instant>,
}

impl FrameClock {
    /// Rates below `MIN_STEPS_PER_SECOND` (and NaN) are raised to it
    pub fn new(ticks_per_second: f64) -> Self {
        let rate = ticks_per_second.max(MIN_STEPS_PER_SECOND);
        Self {
            period: Duration::from_secs_f64(1.0 / rate),
            next_tick: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tick(&mut self) {
        if let Some(deadline) = self.next_tick {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
        }
        self.next_tick = Some(Instant::now() + self.period);
    }
}

pub struct Simulation {
    world: World,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    observers: Vec<Box<dyn WorldObserver>>,
    steps: u64,
}

impl Simulation {
    /// Create an engine, seeding its generator from `config.seed` (or the OS)
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create an engine driven by an explicit random source
    pub fn with_rng(config: SimulationConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let world = World::create(config.size, &config.distribution, &mut rng)?;
        Self::from_world(config, world, rng)
    }

    /// Run the dynamics on a prepared world; `config.size` is taken from it
    pub fn from_world(mut config: SimulationConfig, world: World, rng: ChaCha8Rng) -> Result<Self> {
        config.size = world.size();
        config.validate()?;

        info!(
            size = config.size,
            threshold = config.threshold,
            radius = config.neighbourhood_radius,
            census = ?world.census(),
            "Created simulation"
        );

        Ok(Self {
            world,
            config,
            rng,
            observers: Vec::new(),
            steps: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Completed steps so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn add_observer(&mut self, observer: Box<dyn WorldObserver>) {
        self.observers.push(observer);
    }

    pub fn notify_all(&mut self) {
        for observer in &mut self.observers {
            observer.on_world_update(&self.world);
        }
    }

    /// Execute one step and notify observers of the result
    pub fn step(&mut self) -> StepReport {
        let outcome = advance(
            &mut self.world,
            self.config.threshold,
            self.config.neighbourhood_radius,
            &mut self.rng,
        );
        self.steps += 1;

        let report = StepReport {
            step: self.steps,
            unsatisfied: outcome.unsatisfied,
            relocated: outcome.relocation.relocated,
            pool_exhausted: outcome.pool_exhausted(),
        };
        debug!(
            step = report.step,
            unsatisfied = report.unsatisfied,
            relocated = report.relocated,
            pool_exhausted = report.pool_exhausted,
            "Step complete"
        );

        self.notify_all();
        report
    }

    /// Step at the configured pace until `stop` asks to end.
    ///
    /// There is no convergence check; the loop only ends through `stop`,
    /// which is polled once after every step.
    #[instrument(skip_all, fields(size = self.config.size, steps_per_second = self.config.steps_per_second))]
    pub fn run<S: StopSignal + ?Sized>(&mut self, stop: &mut S) -> RunSummary {
        info!("Starting simulation");

        let mut clock = FrameClock::new(self.config.steps_per_second);
        let first_step = self.steps;
        loop {
            clock.tick();
            self.step();
            if stop.should_stop() {
                break;
            }
        }

        let summary = self.summary();
        info!(
            steps_this_run = self.steps - first_step,
            total_steps = summary.steps,
            similarity = ?summary.similarity,
            "Simulation stopped"
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.steps,
            census: self.world.census(),
            similarity: mean_similarity(&self.world, self.config.neighbourhood_radius),
        }
    }
}
