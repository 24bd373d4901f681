//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a single grid cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    TypeA,
    TypeB,
    Empty,
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        *self == Occupant::Empty
    }

    pub fn all() -> [Occupant; 3] {
        [Occupant::TypeA, Occupant::TypeB, Occupant::Empty]
    }

    /// Single-character glyph, handy for text dumps of a grid
    pub fn glyph(&self) -> char {
        match self {
            Occupant::TypeA => 'A',
            Occupant::TypeB => 'B',
            Occupant::Empty => '.',
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A `(row, col)` cell reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Number of cells holding each kind of occupant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    pub type_a: usize,
    pub type_b: usize,
    pub empty: usize,
}

impl Census {
    pub fn new(type_a: usize, type_b: usize, empty: usize) -> Self {
        Self {
            type_a,
            type_b,
            empty,
        }
    }

    pub fn record(&mut self, occupant: Occupant) {
        match occupant {
            Occupant::TypeA => self.type_a += 1,
            Occupant::TypeB => self.type_b += 1,
            Occupant::Empty => self.empty += 1,
        }
    }

    pub fn count(&self, occupant: Occupant) -> usize {
        match occupant {
            Occupant::TypeA => self.type_a,
            Occupant::TypeB => self.type_b,
            Occupant::Empty => self.empty,
        }
    }

    pub fn total(&self) -> usize {
        self.type_a + self.type_b + self.empty
    }
}

impl FromIterator<Occupant> for Census {
    fn from_iter<I: IntoIterator<Item = Occupant>>(iter: I) -> Self {
        let mut census = Census::default();
        for occupant in iter {
            census.record(occupant);
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_from_occupants() {
        let census: Census = [
            Occupant::TypeA,
            Occupant::Empty,
            Occupant::TypeB,
            Occupant::TypeA,
        ]
        .into_iter()
        .collect();

        assert_eq!(census, Census::new(2, 1, 1));
        assert_eq!(census.total(), 4);
        assert_eq!(census.count(Occupant::TypeA), 2);
    }

    #[test]
    fn test_occupant_glyphs() {
        assert_eq!(Occupant::TypeA.to_string(), "A");
        assert_eq!(Occupant::TypeB.to_string(), "B");
        assert_eq!(Occupant::Empty.to_string(), ".");
        assert!(Occupant::Empty.is_empty());
        assert!(!Occupant::TypeB.is_empty());
    }
}
