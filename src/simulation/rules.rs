//! Conway's Game of Life rule, independent of any device.
//!
//! The compute shader in `life.wgsl` implements exactly the same logic;
//! `step_cells` is the host reference used to check it.

use super::grid::GridDimensions;

pub const DEAD: u32 = 0;
pub const ALIVE: u32 = 1;

/// Offsets of the eight Moore neighbors.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Next state of a cell given its current state and live neighbor count.
///
/// | neighbors | next state |
/// |-----------|------------|
/// | 2         | unchanged  |
/// | 3         | alive      |
/// | otherwise | dead       |
#[inline]
pub fn next_state(current: u32, neighbors: u32) -> u32 {
    match neighbors {
        2 => current,
        3 => ALIVE,
        _ => DEAD,
    }
}

/// Number of live cells among the toroidal neighbors of `(x, y)`.
pub fn live_neighbors(cells: &[u32], dims: GridDimensions, x: u32, y: u32) -> u32 {
    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dx, dy)| cells[dims.wrapped_index(x as i64 + dx, y as i64 + dy)])
        .sum()
}

/// Advance one generation from `source` into `destination`.
///
/// The two slices are distinct borrows, so a generation can never be
/// computed in place.
pub fn step_cells(source: &[u32], destination: &mut [u32], dims: GridDimensions) {
    debug_assert_eq!(source.len(), dims.cell_count());
    debug_assert_eq!(destination.len(), dims.cell_count());

    for y in 0..dims.height {
        for x in 0..dims.width {
            let index = dims.index(x, y);
            destination[index] = next_state(source[index], live_neighbors(source, dims, x, y));
        }
    }
}

/// Source and destination buffer indices for the step taken at `tick`.
#[inline]
pub fn buffer_roles(tick: u64) -> (usize, usize) {
    ((tick % 2) as usize, ((tick + 1) % 2) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> GridDimensions {
        GridDimensions::new(width, height).unwrap()
    }

    fn grid_with(dims: GridDimensions, alive: &[(u32, u32)]) -> Vec<u32> {
        let mut cells = vec![DEAD; dims.cell_count()];
        for &(x, y) in alive {
            cells[dims.index(x, y)] = ALIVE;
        }
        cells
    }

    fn step(cells: &[u32], dims: GridDimensions) -> Vec<u32> {
        let mut next = vec![DEAD; cells.len()];
        step_cells(cells, &mut next, dims);
        next
    }

    #[test]
    fn test_rule_table() {
        for neighbors in 0..=8 {
            for current in [DEAD, ALIVE] {
                let expected = match neighbors {
                    2 => current,
                    3 => ALIVE,
                    _ => DEAD,
                };
                assert_eq!(
                    next_state(current, neighbors),
                    expected,
                    "current={current} neighbors={neighbors}"
                );
            }
        }
    }

    #[test]
    fn test_corner_wraps_to_opposite_corner() {
        let dims = dims(8, 8);
        let cells = grid_with(dims, &[(7, 7)]);
        assert_eq!(live_neighbors(&cells, dims, 0, 0), 1);

        let edges = grid_with(dims, &[(7, 0), (0, 7), (1, 1)]);
        assert_eq!(live_neighbors(&edges, dims, 0, 0), 3);
    }

    #[test]
    fn test_neighbor_count_excludes_self() {
        let dims = dims(4, 4);
        let cells = grid_with(dims, &[(1, 1)]);
        assert_eq!(live_neighbors(&cells, dims, 1, 1), 0);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let dims = dims(4, 4);
        let cells = grid_with(dims, &[(1, 1)]);
        assert!(step(&cells, dims).iter().all(|&c| c == DEAD));
    }

    #[test]
    fn test_block_is_still_life() {
        for size in [4, 5, 8] {
            let dims = dims(size, size);
            let block = grid_with(dims, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
            let mut cells = block.clone();
            for _ in 0..5 {
                cells = step(&cells, dims);
                assert_eq!(cells, block, "block changed on {size}x{size}");
            }
        }
    }

    #[test]
    fn test_blinker_has_period_two() {
        let dims = dims(5, 5);
        let horizontal = grid_with(dims, &[(1, 2), (2, 2), (3, 2)]);
        let vertical = grid_with(dims, &[(2, 1), (2, 2), (2, 3)]);

        let once = step(&horizontal, dims);
        assert_eq!(once, vertical);
        assert_eq!(step(&once, dims), horizontal);
    }

    #[test]
    fn test_blinker_across_edge() {
        let dims = dims(6, 6);
        let wrapped = grid_with(dims, &[(5, 3), (0, 3), (1, 3)]);
        let next = step(&wrapped, dims);
        assert_eq!(next, grid_with(dims, &[(0, 2), (0, 3), (0, 4)]));
        assert_eq!(step(&next, dims), wrapped);
    }

    #[test]
    fn test_buffer_roles_alternate() {
        for tick in 0..16u64 {
            let (source, destination) = buffer_roles(tick);
            assert_ne!(source, destination);
            assert_eq!(source, (tick % 2) as usize);
            assert_eq!(destination, ((tick + 1) % 2) as usize);
        }
    }
}
