//! Grid: the fixed ROW × COL set of figures placed at an anchor.

use crate::figure::{Figure, FigureState, Vec3};

/// Distance between neighbouring figures, in anchor units.
pub const SPACING: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct Grid {
    pub anchor: Vec3,
    rows: usize,
    cols: usize,
    /// figures[row][col].
    figures: Vec<Vec<Figure>>,
}

impl Grid {
    /// Figures sit at `x = col * SPACING`, `z = row * SPACING` from the anchor.
    pub fn new(anchor: Vec3, rows: usize, cols: usize) -> Self {
        let figures = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        Figure::new(Vec3::default().add_offset(
                            col as f32 * SPACING,
                            0.0,
                            row as f32 * SPACING,
                        ))
                    })
                    .collect()
            })
            .collect();
        Self {
            anchor,
            rows,
            cols,
            figures,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Figure> {
        self.figures.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Figure> {
        self.figures.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// All cells with their figure, row-major.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Figure)> {
        self.figures.iter().enumerate().flat_map(|(row, r)| {
            r.iter().enumerate().map(move |(col, f)| ((row, col), f))
        })
    }

    /// Coordinates of every figure currently in `state`, row-major.
    pub fn cells_in(&self, state: FigureState) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|(_, f)| f.state() == state)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_in(&self, state: FigureState) -> usize {
        self.cells().filter(|(_, f)| f.state() == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape_and_offsets() {
        let g = Grid::new(Vec3::new(1.0, 0.0, 2.0), 2, 3);
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.cells().count(), 6);
        let f = g.get(1, 2).unwrap();
        assert!((f.offset.x - 2.0 * SPACING).abs() < 1e-6);
        assert!((f.offset.z - SPACING).abs() < 1e-6);
        assert_eq!(f.offset.y, 0.0);
        assert!(g.get(2, 0).is_none());
        assert!(g.get(0, 3).is_none());
    }

    #[test]
    fn test_all_start_down() {
        let g = Grid::new(Vec3::default(), 3, 3);
        assert_eq!(g.count_in(FigureState::Down), 9);
        assert_eq!(g.cells_in(FigureState::Down)[4], (1, 1));
    }

    #[test]
    fn test_cells_in_tracks_state() {
        let mut g = Grid::new(Vec3::default(), 2, 2);
        g.get_mut(0, 1).unwrap().pull_up(0);
        assert_eq!(g.cells_in(FigureState::MovingUp), vec![(0, 1)]);
        assert_eq!(g.count_in(FigureState::Down), 3);
    }
}
