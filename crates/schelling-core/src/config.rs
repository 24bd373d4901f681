//! Configuration types for the simulation.

use crate::{Census, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tolerance used when checking that the distribution fractions sum to one
const FRACTION_SUM_TOLERANCE: f64 = 1e-6;

/// Slowest accepted pace, one step every ~17 minutes
pub const MIN_STEPS_PER_SECOND: f64 = 1e-3;

/// Target share of each occupant kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distribution {
    /// Fraction of cells holding type A (0.0 to 1.0)
    pub type_a: f64,
    /// Fraction of cells holding type B (0.0 to 1.0)
    pub type_b: f64,
    /// Fraction of empty cells (0.0 to 1.0)
    pub empty: f64,
}

impl Default for Distribution {
    fn default() -> Self {
        Self {
            type_a: 0.25,
            type_b: 0.25,
            empty: 0.50,
        }
    }
}

impl Distribution {
    pub fn new(type_a: f64, type_b: f64, empty: f64) -> Self {
        Self {
            type_a,
            type_b,
            empty,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, fraction) in [
            ("type_a", self.type_a),
            ("type_b", self.type_b),
            ("empty", self.empty),
        ] {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "fraction {} must be a non-negative number, got {}",
                    name, fraction
                )));
            }
        }

        let sum = self.type_a + self.type_b + self.empty;
        if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
            return Err(Error::InvalidConfiguration(format!(
                "distribution fractions must sum to 1.0, got {}",
                sum
            )));
        }

        Ok(())
    }

    /// Occupant counts for a grid of `cells` cells.
    ///
    /// Both types get `fraction * cells` rounded half to even; type B is
    /// clamped so the two never exceed the grid, and empty takes whatever is
    /// left so the grid is always exactly full.
    pub fn census_for(&self, cells: usize) -> Census {
        let round = |fraction: f64| (fraction * cells as f64).round_ties_even() as usize;

        let type_a = round(self.type_a).min(cells);
        let type_b = round(self.type_b).min(cells - type_a);
        let empty = cells - type_a - type_b;

        let literal_empty = round(self.empty);
        if literal_empty != empty {
            debug!(
                cells,
                literal_empty,
                adjusted_empty = empty,
                "Rounded population did not fill the grid; adjusted empty count"
            );
        }

        Census::new(type_a, type_b, empty)
    }
}

/// Simulation engine parameters, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Target population distribution
    pub distribution: Distribution,
    /// Share of same-type neighbours (among occupied ones) a cell needs to stay put
    pub threshold: f64,
    /// Pacing of the run loop; does not affect the dynamics
    pub steps_per_second: f64,
    /// Half-width of the square neighbourhood
    pub neighbourhood_radius: usize,
    /// Random seed for reproducibility; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 80,
            distribution: Distribution::default(),
            threshold: 0.7,
            steps_per_second: 20.0,
            neighbourhood_radius: 1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfiguration(
                "grid size must be a positive integer".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfiguration(format!(
                "threshold must lie in [0, 1], got {}",
                self.threshold
            )));
        }

        if !self.steps_per_second.is_finite() || self.steps_per_second < MIN_STEPS_PER_SECOND {
            return Err(Error::InvalidConfiguration(format!(
                "steps_per_second must be finite and at least {}, got {}",
                MIN_STEPS_PER_SECOND, self.steps_per_second
            )));
        }

        if self.neighbourhood_radius == 0 {
            return Err(Error::InvalidConfiguration(
                "neighbourhood_radius must be at least 1".to_string(),
            ));
        }

        self.distribution.validate()
    }
}

/// Configuration for the `schelling` binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Engine parameters
    pub simulation: SimulationConfig,
    /// Stop after this many steps even without a shutdown signal
    pub max_steps: Option<u64>,
    /// Log a census line every this many steps (0 disables)
    pub log_every: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            max_steps: None,
            log_every: 20,
        }
    }
}

impl RunnerConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: RunnerConfig = serde_json::from_str(text)?;
        config.simulation.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.size, 80);
        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.steps_per_second, 20.0);
        assert_eq!(config.neighbourhood_radius, 1);
        assert!(config.validate().is_ok());

        let runner = RunnerConfig::default();
        assert_eq!(runner.max_steps, None);
    }

    #[test]
    fn test_distribution_must_sum_to_one() {
        let dist = Distribution::new(0.3, 0.3, 0.3);
        assert!(matches!(
            dist.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let dist = Distribution::new(0.5, 0.5, 0.0);
        assert!(dist.validate().is_ok());
    }

    #[test]
    fn test_distribution_rejects_negative_fractions() {
        let dist = Distribution::new(1.2, -0.2, 0.0);
        assert!(matches!(
            dist.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let dist = Distribution::new(f64::NAN, 0.5, 0.5);
        assert!(dist.validate().is_err());
    }

    #[test]
    fn test_invalid_simulation_configs() {
        let zero_size = SimulationConfig {
            size: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_size.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let high_threshold = SimulationConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(high_threshold.validate().is_err());

        let frozen = SimulationConfig {
            steps_per_second: 0.0,
            ..Default::default()
        };
        assert!(frozen.validate().is_err());

        let glacial = SimulationConfig {
            steps_per_second: 1e-20,
            ..Default::default()
        };
        assert!(matches!(
            glacial.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let slowest = SimulationConfig {
            steps_per_second: MIN_STEPS_PER_SECOND,
            ..Default::default()
        };
        assert!(slowest.validate().is_ok());

        let no_radius = SimulationConfig {
            neighbourhood_radius: 0,
            ..Default::default()
        };
        assert!(no_radius.validate().is_err());
    }

    #[test]
    fn test_census_for_exact_split() {
        let census = Distribution::new(0.25, 0.25, 0.5).census_for(16);
        assert_eq!(census, Census::new(4, 4, 8));
    }

    #[test]
    fn test_census_for_always_fills_grid() {
        // 9 cells: 0.5 * 9 = 4.5 rounds to 4 for both types, leaving one empty
        let census = Distribution::new(0.5, 0.5, 0.0).census_for(9);
        assert_eq!(census.total(), 9);
        assert_eq!(census.type_a, 4);
        assert_eq!(census.type_b, 4);
        assert_eq!(census.empty, 1);

        // 1.5 -> 2 for both types overshoots 3 cells; type B is clamped
        let census = Distribution::new(0.5, 0.5, 0.0).census_for(3);
        assert_eq!(census, Census::new(2, 1, 0));

        // 0.3 * 10 = 3 each, empty = 4
        let census = Distribution::new(0.3, 0.3, 0.4).census_for(10);
        assert_eq!(census, Census::new(3, 3, 4));
    }

    #[test]
    fn test_census_for_rounds_half_to_even() {
        // 1.5 -> 2, 0.5 -> 0, 2.0 -> 2
        let census = Distribution::new(0.375, 0.125, 0.5).census_for(4);
        assert_eq!(census, Census::new(2, 0, 2));

        // 2.5 -> 2, 7.5 -> 8
        let census = Distribution::new(0.25, 0.75, 0.0).census_for(10);
        assert_eq!(census, Census::new(2, 8, 0));
    }

    #[test]
    fn test_runner_config_from_partial_json() {
        let json = r#"{ "simulation": { "size": 10, "seed": 7 }, "max_steps": 50 }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        assert_eq!(config.simulation.size, 10);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.threshold, 0.7);
        assert_eq!(config.max_steps, Some(50));
    }

    #[test]
    fn test_runner_config_rejects_bad_values() {
        let json = r#"{ "simulation": { "threshold": 2.0 } }"#;
        assert!(matches!(
            RunnerConfig::from_json(json),
            Err(Error::InvalidConfiguration(_))
        ));

        assert!(matches!(
            RunnerConfig::from_json("not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = RunnerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RunnerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
