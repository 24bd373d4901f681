//! Square occupancy grid for the world.

use rand::seq::SliceRandom;
use rand::Rng;
use schelling_core::{Census, Distribution, Error, Occupant, Position, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-size `size × size` grid of occupants, stored row-major.
///
/// Edges are hard boundaries; there is no wraparound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    size: usize,
    cells: Vec<Occupant>,
}

impl World {
    /// Populate a grid according to `distribution` and shuffle it with `rng`
    pub fn create<R: Rng + ?Sized>(
        size: usize,
        distribution: &Distribution,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration(
                "grid size must be a positive integer".to_string(),
            ));
        }
        distribution.validate()?;

        let census = distribution.census_for(size * size);

        let mut cells = Vec::with_capacity(census.total());
        for occupant in Occupant::all() {
            cells.extend(std::iter::repeat(occupant).take(census.count(occupant)));
        }
        cells.shuffle(rng);

        Ok(Self { size, cells })
    }

    /// Build a world from an explicit square layout
    pub fn from_rows(rows: Vec<Vec<Occupant>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::InvalidGrid("grid has no rows".to_string()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row_num, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    row_num,
                    row.len(),
                    size
                )));
            }
            cells.extend(row);
        }

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Occupant at `pos`, or `None` outside the grid
    pub fn get(&self, pos: Position) -> Option<Occupant> {
        self.contains(pos).then(|| self.cells[self.pos_to_index(pos)])
    }

    /// Occupant at `pos`.
    ///
    /// Panics if `pos` lies outside the grid.
    pub fn occupant_at(&self, pos: Position) -> Occupant {
        self.cells[self.pos_to_index(pos)]
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Exchange the occupants of two cells
    pub fn swap(&mut self, a: Position, b: Position) {
        let a = self.pos_to_index(a);
        let b = self.pos_to_index(b);
        self.cells.swap(a, b);
    }

    /// Occupied cells in the square block of side `2 * radius + 1` around
    /// `pos`, excluding `pos` itself and clipped at the grid edges.
    pub fn neighbours_of(&self, pos: Position, radius: usize) -> Vec<Occupant> {
        let start_row = pos.row.saturating_sub(radius);
        let end_row = pos.row.saturating_add(radius).saturating_add(1).min(self.size);
        let start_col = pos.col.saturating_sub(radius);
        let end_col = pos.col.saturating_add(radius).saturating_add(1).min(self.size);

        let block = (end_row - start_row) * (end_col - start_col);
        let mut neighbours = Vec::with_capacity(block.saturating_sub(1));
        for row in start_row..end_row {
            for col in start_col..end_col {
                if row == pos.row && col == pos.col {
                    continue;
                }

                let occupant = self.cells[row * self.size + col];
                if !occupant.is_empty() {
                    neighbours.push(occupant);
                }
            }
        }

        neighbours
    }

    /// Every position currently holding `Empty`, in row-major order
    pub fn free_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, occupant)| occupant.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn census(&self) -> Census {
        self.cells.iter().copied().collect()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        Position::new(index / self.size, index % self.size)
    }

    /// Iterator over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, occupant)| (self.index_to_pos(i), *occupant))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Occupant]> + '_ {
        self.cells.chunks(self.size)
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for occupant in row {
                write!(f, "{}", occupant)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
