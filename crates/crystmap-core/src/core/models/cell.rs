use nalgebra::{Matrix3, Point3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellError {
    #[error("unit-cell length must be positive and finite (a={a}, b={b}, c={c})")]
    InvalidLength { a: f64, b: f64, c: f64 },
    #[error("unit-cell angles (α={alpha}°, β={beta}°, γ={gamma}°) describe a degenerate cell")]
    DegenerateAngles { alpha: f64, beta: f64, gamma: f64 },
}

/// A triclinic crystallographic unit cell.
///
/// Holds the six cell parameters (lengths in Å, angles in degrees) together
/// with the precomputed orthogonalization matrix and its inverse, using the
/// standard PDB convention: `a` along x, `b` in the x-y plane.
///
/// Immutable after construction; both coordinate transforms are pure.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    orth: Matrix3<f64>,
    frac: Matrix3<f64>,
}

impl UnitCell {
    /// Builds a cell from the six parameters, precomputing both transform
    /// matrices.
    ///
    /// # Errors
    ///
    /// Returns [`CellError`] if any length is non-positive or non-finite, or
    /// if the angles make the cell volume vanish.
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self, CellError> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) || a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return Err(CellError::InvalidLength { a, b, c });
        }
        let (cos_a, cos_b) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (cos_g, sin_g) = (gamma.to_radians().cos(), gamma.to_radians().sin());

        // Squared fractional volume; zero or negative means the three cell
        // angles cannot close into a parallelepiped.
        let v2 = 1.0 - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g + 2.0 * cos_a * cos_b * cos_g;
        if !v2.is_finite() || v2 <= 0.0 || sin_g.abs() < 1e-12 {
            return Err(CellError::DegenerateAngles { alpha, beta, gamma });
        }
        let v = v2.sqrt();

        let orth = Matrix3::new(
            a,
            b * cos_g,
            c * cos_b,
            0.0,
            b * sin_g,
            c * (cos_a - cos_b * cos_g) / sin_g,
            0.0,
            0.0,
            c * v / sin_g,
        );
        let frac = orth
            .try_inverse()
            .ok_or(CellError::DegenerateAngles { alpha, beta, gamma })?;

        Ok(UnitCell {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            orth,
            frac,
        })
    }

    /// Converts an orthogonal (Cartesian, Å) position to fractional
    /// coordinates of this cell.
    pub fn fractionalize(&self, xyz: &Point3<f64>) -> Point3<f64> {
        self.frac * xyz
    }

    /// Converts fractional coordinates to an orthogonal (Cartesian, Å)
    /// position.
    pub fn orthogonalize(&self, frac: &Point3<f64>) -> Point3<f64> {
        self.orth * frac
    }

    /// The six cell parameters in conventional order.
    pub fn parameters(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.alpha, self.beta, self.gamma]
    }
}
