//! Fixed-size 2D grid with 8-way neighbour enumeration.

use crate::error::GameError;
use std::ops::{Index, IndexMut};

/// Grid position `(x, y)`; x grows right, y grows down.
pub type Pos = (usize, usize);

/// Neighbour offsets in enumeration order: NW, N, NE, W, E, SW, S, SE.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Row-major storage of `width * height` values. Dimensions never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        let cells = (0..width * height).map(|_| T::default()).collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, (x, y): Pos) -> bool {
        x < self.width && y < self.height
    }

    /// Position `pos` shifted by `(dx, dy)`, or `None` if that leaves the grid.
    pub fn offset(&self, (x, y): Pos, dx: isize, dy: isize) -> Option<Pos> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.contains((nx, ny)).then_some((nx, ny))
    }

    /// In-bounds neighbours of `pos`. The iterator borrows nothing, so the grid
    /// may be mutated while walking it.
    pub fn neighbors(&self, pos: Pos) -> Neighbors {
        assert!(
            self.contains(pos),
            "position {:?} out of bounds for grid {}x{}",
            pos,
            self.width,
            self.height
        );
        Neighbors {
            center: pos,
            bounds: (self.width, self.height),
            index: 0,
        }
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<T> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    fn slot(&self, (x, y): Pos) -> usize {
        assert!(
            self.contains((x, y)),
            "position {:?} out of bounds for grid {}x{}",
            (x, y),
            self.width,
            self.height
        );
        y * self.width + x
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &T {
        &self.cells[self.slot(pos)]
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut T {
        let i = self.slot(pos);
        &mut self.cells[i]
    }
}

/// Lazy neighbour walk; clone it to enumerate again.
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Pos,
    bounds: (usize, usize),
    index: usize,
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        let (x, y) = self.center;
        let (w, h) = self.bounds;
        while let Some(&(dx, dy)) = DISPLACEMENTS.get(self.index) {
            self.index += 1;
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if nx < w && ny < h {
                return Some((nx, ny));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Grid::<u8>::new(0, 4),
            Err(GameError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert!(Grid::<u8>::new(3, 0).is_err());
    }

    #[test]
    fn test_index_roundtrip() {
        let mut g = Grid::<u8>::new(3, 2).unwrap();
        g[(2, 1)] = 7;
        assert_eq!(g[(2, 1)], 7);
        assert!(g.contains((2, 1)));
        assert!(!g.contains((3, 1)));
        assert_eq!(g.iter().filter(|&&v| v == 7).count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let g = Grid::<u8>::new(3, 2).unwrap();
        let _ = g[(0, 2)];
    }

    #[test]
    fn test_neighbor_counts() {
        let g = Grid::<u8>::new(4, 4).unwrap();
        assert_eq!(g.neighbors((0, 0)).count(), 3);
        assert_eq!(g.neighbors((1, 0)).count(), 5);
        assert_eq!(g.neighbors((1, 1)).count(), 8);
        assert_eq!(
            g.neighbors((0, 0)).collect::<Vec<_>>(),
            vec![(1, 0), (0, 1), (1, 1)]
        );
    }

    #[test]
    fn test_neighbors_restartable() {
        let g = Grid::<u8>::new(1, 1).unwrap();
        assert_eq!(g.neighbors((0, 0)).next(), None);

        let g = Grid::<u8>::new(5, 5).unwrap();
        let walk = g.neighbors((2, 2));
        assert_eq!(walk.clone().collect::<Vec<_>>(), walk.collect::<Vec<_>>());
    }

    #[test]
    fn test_offset() {
        let g = Grid::<u8>::new(3, 3).unwrap();
        assert_eq!(g.offset((0, 0), -1, 0), None);
        assert_eq!(g.offset((2, 2), 0, 1), None);
        assert_eq!(g.offset((1, 1), 1, -1), Some((2, 0)));
    }

    #[test]
    fn test_positions_cover_grid() {
        let g = Grid::<u8>::new(3, 2).unwrap();
        let all: Vec<_> = g.positions().collect();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|&p| g.contains(p)));
    }

    fn grid_and_pos() -> impl Strategy<Value = (usize, usize, Pos)> {
        (1usize..12, 1usize..12)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), (0..w, 0..h)))
    }

    proptest! {
        #[test]
        fn neighbors_in_bounds_at_distance_one((w, h, p) in grid_and_pos()) {
            let g = Grid::<u8>::new(w, h).unwrap();
            for n in g.neighbors(p) {
                prop_assert!(g.contains(n));
                let dist = n.0.abs_diff(p.0).max(n.1.abs_diff(p.1));
                prop_assert_eq!(dist, 1);
            }
        }

        #[test]
        fn neighbors_symmetric((w, h, p) in grid_and_pos()) {
            let g = Grid::<u8>::new(w, h).unwrap();
            for q in g.positions() {
                let forward = g.neighbors(p).any(|n| n == q);
                let backward = g.neighbors(q).any(|n| n == p);
                prop_assert_eq!(forward, backward);
            }
        }
    }
}
