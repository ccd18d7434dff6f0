use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive (n_real={n_real:?}, n_grid={n_grid:?})")]
    InvalidDimensions { n_real: [i32; 3], n_grid: [i32; 3] },
    #[error("computed grid index {index} exceeds buffer length {len}")]
    IndexOverflow { index: usize, len: usize },
}

/// True mathematical modulo: the result is always in `[0, b)`.
fn modulo(a: i32, b: i32) -> i32 {
    let r = a % b;
    if r < 0 { r + b } else { r }
}

/// A dense periodic 3D scalar field.
///
/// Stores `n_real.x * n_real.y * n_real.z` 32-bit density values with
/// toroidal (wraparound) indexing: any integer coordinate triple addresses a
/// stored voxel after reduction modulo `n_real`.
///
/// `n_real` is the stored-box size; `n_grid` is the subdivision count of the
/// *full* unit cell. The two differ when a map stores only part of the cell,
/// which is why the fractional-coordinate conversions use `n_grid` while
/// indexing wraps against `n_real`. Both are fixed for the grid's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicGrid {
    n_real: [i32; 3],
    n_grid: [i32; 3],
    values: Vec<f32>,
}

impl PeriodicGrid {
    /// Allocates a zero-filled grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if any component of either
    /// dimension triple is not positive.
    pub fn new(n_real: [i32; 3], n_grid: [i32; 3]) -> Result<Self, GridError> {
        if n_real.iter().chain(n_grid.iter()).any(|&n| n <= 0) {
            return Err(GridError::InvalidDimensions { n_real, n_grid });
        }
        let len = n_real[0] as usize * n_real[1] as usize * n_real[2] as usize;
        Ok(PeriodicGrid {
            n_real,
            n_grid,
            values: vec![0.0; len],
        })
    }

    /// Stored-box dimensions.
    pub fn n_real(&self) -> [i32; 3] {
        self.n_real
    }

    /// Full-unit-cell subdivision counts.
    pub fn n_grid(&self) -> [i32; 3] {
        self.n_grid
    }

    /// The raw stored values, third grid axis varying fastest.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Linear offset of the voxel addressed by `(i, j, k)` after periodic
    /// wraparound.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOverflow`] if the offset would exceed the
    /// allocated buffer. Unreachable given the modulo reduction, but kept as
    /// a hard check so a future invariant change cannot turn into silent
    /// out-of-bounds truncation.
    fn index(&self, i: i32, j: i32, k: i32) -> Result<usize, GridError> {
        let i = modulo(i, self.n_real[0]) as i64;
        let j = modulo(j, self.n_real[1]) as i64;
        let k = modulo(k, self.n_real[2]) as i64;
        let index = ((i * self.n_real[1] as i64 + j) * self.n_real[2] as i64 + k) as usize;
        if index >= self.values.len() {
            return Err(GridError::IndexOverflow {
                index,
                len: self.values.len(),
            });
        }
        Ok(index)
    }

    /// Reads the value at the periodically wrapped coordinate.
    pub fn get(&self, i: i32, j: i32, k: i32) -> Result<f32, GridError> {
        Ok(self.values[self.index(i, j, k)?])
    }

    /// Writes the value at the periodically wrapped coordinate.
    pub fn set(&mut self, i: i32, j: i32, k: i32, value: f32) -> Result<(), GridError> {
        let index = self.index(i, j, k)?;
        self.values[index] = value;
        Ok(())
    }

    /// Fractional coordinates of a grid point, relative to the full unit
    /// cell (`n_grid`, not the stored box).
    pub fn grid_to_frac(&self, i: i32, j: i32, k: i32) -> Point3<f64> {
        Point3::new(
            i as f64 / self.n_grid[0] as f64,
            j as f64 / self.n_grid[1] as f64,
            k as f64 / self.n_grid[2] as f64,
        )
    }

    /// Grid coordinates (rounded down) of a fractional position.
    ///
    /// Uses `floor`, not truncation toward zero, so negative fractional
    /// coordinates map to the correct cell below the origin.
    pub fn frac_to_grid(&self, frac: &Point3<f64>) -> [i32; 3] {
        [
            (frac.x * self.n_grid[0] as f64).floor() as i32,
            (frac.y * self.n_grid[1] as f64).floor() as i32,
            (frac.z * self.n_grid[2] as f64).floor() as i32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips_exact_value() {
        let mut grid = PeriodicGrid::new([4, 4, 4], [4, 4, 4]).unwrap();
        grid.set(1, 2, 3, -0.625).unwrap();
        assert_eq!(grid.get(1, 2, 3).unwrap(), -0.625);
    }

    #[test]
    fn indexing_is_periodic_in_every_axis() {
        let mut grid = PeriodicGrid::new([4, 5, 6], [4, 5, 6]).unwrap();
        grid.set(1, 2, 3, 7.5).unwrap();
        assert_eq!(grid.get(1 + 4, 2, 3).unwrap(), 7.5);
        assert_eq!(grid.get(1 - 8, 2, 3).unwrap(), 7.5);
        assert_eq!(grid.get(1, 2 + 10, 3).unwrap(), 7.5);
        assert_eq!(grid.get(1, 2, 3 - 6).unwrap(), 7.5);
        assert_eq!(grid.get(1 + 40, 2 - 15, 3 + 12).unwrap(), 7.5);
    }

    #[test]
    fn negative_coordinates_wrap_to_far_face() {
        let mut grid = PeriodicGrid::new([4, 4, 4], [4, 4, 4]).unwrap();
        grid.set(3, 3, 3, 1.25).unwrap();
        assert_eq!(grid.get(-1, -1, -1).unwrap(), 1.25);
    }

    #[test]
    fn third_axis_varies_fastest_in_storage_order() {
        let mut grid = PeriodicGrid::new([2, 3, 4], [2, 3, 4]).unwrap();
        grid.set(1, 2, 3, 9.0).unwrap();
        // linear index = (i * ny + j) * nz + k
        assert_eq!(grid.values()[(1 * 3 + 2) * 4 + 3], 9.0);
    }

    #[test]
    fn grid_to_frac_uses_full_cell_subdivisions() {
        let grid = PeriodicGrid::new([2, 2, 2], [4, 8, 16]).unwrap();
        let frac = grid.grid_to_frac(1, 2, 4);
        assert_eq!(frac, Point3::new(0.25, 0.25, 0.25));
    }

    #[test]
    fn frac_to_grid_floors_toward_negative_infinity() {
        let grid = PeriodicGrid::new([4, 4, 4], [4, 4, 4]).unwrap();
        assert_eq!(grid.frac_to_grid(&Point3::new(-0.25, 0.5, 0.76)), [-1, 2, 3]);
        assert_eq!(grid.frac_to_grid(&Point3::new(-0.01, 0.99, 0.0)), [-1, 3, 0]);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let result = PeriodicGrid::new([4, 0, 4], [4, 4, 4]);
        assert!(matches!(result, Err(GridError::InvalidDimensions { .. })));
    }

    #[test]
    fn negative_full_cell_dimension_is_rejected() {
        let result = PeriodicGrid::new([4, 4, 4], [4, -4, 4]);
        assert!(matches!(result, Err(GridError::InvalidDimensions { .. })));
    }
}
