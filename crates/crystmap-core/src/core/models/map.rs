use super::cell::UnitCell;
use super::grid::{GridError, PeriodicGrid};
use nalgebra::Point3;
use serde::Serialize;
use std::sync::Arc;

/// A sub-volume of density pulled out of a map for isosurface computation.
///
/// `points` and `values` are parallel sequences, one entry per visited grid
/// node in x-outer/y/z-inner order; `size` is the node count per axis.
/// Regenerated on every extraction request; not retained by the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedBlock {
    pub points: Vec<Point3<f64>>,
    pub values: Vec<f32>,
    pub size: [i32; 3],
}

/// A decoded electron-density map.
///
/// Owns the periodic grid of density values and a shared reference to the
/// unit cell it is defined on, together with the map's mean and
/// root-mean-square deviation. Built by one of the decoders in
/// [`crate::core::io`]; read-only afterwards.
#[derive(Debug, Clone)]
pub struct DensityMap {
    grid: PeriodicGrid,
    unit_cell: Arc<UnitCell>,
    mean: f64,
    rms: f64,
}

impl DensityMap {
    pub fn new(grid: PeriodicGrid, unit_cell: Arc<UnitCell>, mean: f64, rms: f64) -> Self {
        DensityMap {
            grid,
            unit_cell,
            mean,
            rms,
        }
    }

    pub fn grid(&self) -> &PeriodicGrid {
        &self.grid
    }

    pub fn unit_cell(&self) -> &Arc<UnitCell> {
        &self.unit_cell
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn rms(&self) -> f64 {
        self.rms
    }

    /// Converts a sigma level to an absolute density threshold.
    pub fn abs_level(&self, sigma: f64) -> f64 {
        sigma * self.rms + self.mean
    }

    /// Extracts a block of density around `center` for isosurfacing.
    ///
    /// With a center, the block covers the axis-aligned cube
    /// `[center - radius, center + radius]` in orthogonal space: both
    /// corners are fractionalized through the unit cell and floored into
    /// grid-index bounds. Without a center the block spans the whole stored
    /// box, including the wrapped far face so a periodic surface closes.
    ///
    /// Every node of the closed index range is emitted as an orthogonalized
    /// position plus the periodically wrapped density value; `size` per axis
    /// is `grid_max - grid_min + 1`.
    pub fn extract_block(
        &self,
        radius: f64,
        center: Option<Point3<f64>>,
    ) -> Result<ExtractedBlock, GridError> {
        let (grid_min, grid_max) = match center {
            Some(center) => {
                let xyz_min = Point3::new(center.x - radius, center.y - radius, center.z - radius);
                let xyz_max = Point3::new(center.x + radius, center.y + radius, center.z + radius);
                let frac_min = self.unit_cell.fractionalize(&xyz_min);
                let frac_max = self.unit_cell.fractionalize(&xyz_max);
                (
                    self.grid.frac_to_grid(&frac_min),
                    self.grid.frac_to_grid(&frac_max),
                )
            }
            None => ([0, 0, 0], self.grid.n_real()),
        };

        let size = [
            grid_max[0] - grid_min[0] + 1,
            grid_max[1] - grid_min[1] + 1,
            grid_max[2] - grid_min[2] + 1,
        ];
        let count = size.iter().map(|&n| n.max(0) as usize).product();
        let mut points = Vec::with_capacity(count);
        let mut values = Vec::with_capacity(count);
        for i in grid_min[0]..=grid_max[0] {
            for j in grid_min[1]..=grid_max[1] {
                for k in grid_min[2]..=grid_max[2] {
                    let frac = self.grid.grid_to_frac(i, j, k);
                    points.push(self.unit_cell.orthogonalize(&frac));
                    values.push(self.grid.get(i, j, k)?);
                }
            }
        }
        Ok(ExtractedBlock {
            points,
            values,
            size,
        })
    }
}
