//! Schelling segregation world.
//!
//! A square grid of two population types plus empty cells. Every step, cells
//! whose share of like neighbours is too low are relocated into free cells.

pub mod grid;
pub mod observer;
pub mod relocation;
pub mod satisfaction;
pub mod simulation;

pub use grid::World;
pub use observer::{StepLimit, StopSignal, WorldObserver};
pub use simulation::{RunSummary, Simulation, StepReport};
