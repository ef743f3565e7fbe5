//! Generation-0 patterns.
//!
//! Fixed patterns are stamped around the grid center and wrap across the
//! edges like everything else on the torus.

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{seed_cells, GridDimensions};
use super::rules::{ALIVE, DEAD};

/// Classic Game of Life starting patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPattern {
    /// Independent per-cell draw against the seed threshold.
    #[default]
    Random,
    Glider,
    Blinker,
    Block,
    GosperGun,
    Clear,
}

const GLIDER: &[(u32, u32)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const BLINKER: &[(u32, u32)] = &[(0, 0), (1, 0), (2, 0)];
const CLEAR: &[(u32, u32)] = &[];
const BLOCK: &[(u32, u32)] = &[(0, 0), (1, 0), (0, 1), (1, 1)];
const GOSPER_GUN: &[(u32, u32)] = &[
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

impl SeedPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPattern::Random => "Random",
            SeedPattern::Glider => "Glider",
            SeedPattern::Blinker => "Blinker",
            SeedPattern::Block => "Block",
            SeedPattern::GosperGun => "Gosper Gun",
            SeedPattern::Clear => "Clear",
        }
    }

    /// Live cell offsets of a fixed pattern, `None` for random seeding.
    fn offsets(&self) -> Option<&'static [(u32, u32)]> {
        match self {
            SeedPattern::Random => None,
            SeedPattern::Glider => Some(GLIDER),
            SeedPattern::Blinker => Some(BLINKER),
            SeedPattern::Block => Some(BLOCK),
            SeedPattern::GosperGun => Some(GOSPER_GUN),
            SeedPattern::Clear => Some(CLEAR),
        }
    }

    /// Build the generation-0 cell buffer for this pattern.
    pub fn cells<R: Rng>(&self, dims: GridDimensions, threshold: f32, rng: &mut R) -> Vec<u32> {
        match self.offsets() {
            None => seed_cells(rng, dims.cell_count(), threshold),
            Some(offsets) => stamp(dims, offsets),
        }
    }
}

/// Place `offsets` so that their bounding box is centered on the grid.
fn stamp(dims: GridDimensions, offsets: &[(u32, u32)]) -> Vec<u32> {
    let mut cells = vec![DEAD; dims.cell_count()];

    let extent_x = offsets.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let extent_y = offsets.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
    if extent_x > dims.width || extent_y > dims.height {
        warn!(
            "{}x{} pattern does not fit a {}x{} grid; it will wrap onto itself",
            extent_x, extent_y, dims.width, dims.height
        );
    }

    let origin_x = dims.width as i64 / 2 - extent_x as i64 / 2;
    let origin_y = dims.height as i64 / 2 - extent_y as i64 / 2;
    for &(x, y) in offsets {
        cells[dims.wrapped_index(origin_x + x as i64, origin_y + y as i64)] = ALIVE;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rules::step_cells;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn live(cells: &[u32]) -> usize {
        cells.iter().filter(|&&c| c == ALIVE).count()
    }

    fn build(pattern: SeedPattern, side: u32) -> (GridDimensions, Vec<u32>) {
        let dims = GridDimensions::square(side).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        (dims, pattern.cells(dims, 0.6, &mut rng))
    }

    #[test]
    fn test_fixed_pattern_live_counts() {
        assert_eq!(live(&build(SeedPattern::Glider, 16).1), 5);
        assert_eq!(live(&build(SeedPattern::Blinker, 16).1), 3);
        assert_eq!(live(&build(SeedPattern::Block, 16).1), 4);
        assert_eq!(live(&build(SeedPattern::GosperGun, 64).1), 36);
        assert_eq!(live(&build(SeedPattern::Clear, 16).1), 0);
    }

    #[test]
    fn test_glider_keeps_five_cells() {
        let (dims, mut cells) = build(SeedPattern::Glider, 16);
        let mut next = vec![DEAD; cells.len()];
        for _ in 0..64 {
            step_cells(&cells, &mut next, dims);
            std::mem::swap(&mut cells, &mut next);
            assert_eq!(live(&cells), 5);
        }
        // A glider crosses a 16-wide torus in 64 generations and comes home.
        assert_eq!(cells, build(SeedPattern::Glider, 16).1);
    }

    #[test]
    fn test_random_pattern_uses_threshold() {
        let (_, cells) = build(SeedPattern::Random, 128);
        let fraction = live(&cells) as f64 / cells.len() as f64;
        assert!((fraction - 0.4).abs() < 0.03);
    }

    #[test]
    fn test_serde_names() {
        let pattern: SeedPattern = serde_json::from_str("\"gosper_gun\"").unwrap();
        assert_eq!(pattern, SeedPattern::GosperGun);
        assert_eq!(serde_json::to_string(&SeedPattern::Random).unwrap(), "\"random\"");
        assert_eq!(SeedPattern::GosperGun.as_str(), "Gosper Gun");
    }
}
