//! Parsing of crystallographic symmetry-operator records.
//!
//! CCP4 map headers carry symmetry as free-form text triplets such as
//! `X,Y,Z`, `-Y,X-Y,Z+1/3`. Each triplet describes one affine transform of
//! fractional coordinates; during decoding the translation part is re-scaled
//! into grid units so the operator can be applied to integer grid indices
//! directly (see [`SymmetryOperator::scaled_to_grid`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymmetryError {
    #[error("expected three comma-separated components in symmetry operator '{op}'")]
    WrongComponentCount { op: String },
    #[error("unrecognized term '{term}' in symmetry operator '{op}'")]
    UnrecognizedTerm { term: String, op: String },
}

/// One parsed symmetry operator: a 3×4 affine matrix with integer rotation
/// coefficients and fractional (unit-cell relative) translations.
///
/// Row `r` maps `(x, y, z)` to `rot[r]·(x, y, z) + trans[r]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperator {
    pub rot: [[i32; 3]; 3],
    pub trans: [f64; 3],
}

/// The same operator with translations pre-scaled into grid units, ready to
/// apply to integer grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOperator {
    pub rot: [[i32; 3]; 3],
    pub trans: [i32; 3],
}

/// Whether an operator record is the identity `x,y,z` (case- and
/// whitespace-insensitive). Identity records mean "no expansion needed" and
/// are skipped by the decoder.
pub fn is_identity(record: &str) -> bool {
    let stripped: String = record
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect();
    stripped == "x,y,z"
}

/// Splits a component like `x-y+1/3` into signed terms: `x`, `-y`, `+1/3`.
fn split_terms(component: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;
    for (pos, c) in component.char_indices() {
        if pos > 0 && (c == '+' || c == '-') {
            terms.push(&component[start..pos]);
            start = pos;
        }
    }
    terms.push(&component[start..]);
    terms
}

impl SymmetryOperator {
    /// Parses one operator record.
    ///
    /// The record is lower-cased and stripped of whitespace, split on commas
    /// into exactly three components, and each component split on sign
    /// boundaries. A term is either a signed axis reference (`x`, `y`, `z`)
    /// contributing ±1 to that rotation coefficient, or a signed fraction
    /// `p/q` contributing to the translation.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError`] on a wrong component count or any term that
    /// matches neither pattern.
    pub fn parse(record: &str) -> Result<Self, SymmetryError> {
        let normalized: String = record
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(|c| c.to_lowercase())
            .collect();
        let components: Vec<&str> = normalized.split(',').collect();
        if components.len() != 3 {
            return Err(SymmetryError::WrongComponentCount {
                op: record.trim().to_string(),
            });
        }

        let mut rot = [[0i32; 3]; 3];
        let mut trans = [0f64; 3];
        for (row, component) in components.iter().enumerate() {
            for term in split_terms(component) {
                let (sign, body) = match term.strip_prefix('-') {
                    Some(rest) => (-1, rest),
                    None => (1, term.strip_prefix('+').unwrap_or(term)),
                };
                match body {
                    "x" => rot[row][0] += sign,
                    "y" => rot[row][1] += sign,
                    "z" => rot[row][2] += sign,
                    _ => {
                        let fraction = body.split_once('/').and_then(|(p, q)| {
                            let p: u32 = p.parse().ok()?;
                            let q: u32 = q.parse().ok()?;
                            if q == 0 { None } else { Some(p as f64 / q as f64) }
                        });
                        match fraction {
                            Some(f) => trans[row] += sign as f64 * f,
                            None => {
                                return Err(SymmetryError::UnrecognizedTerm {
                                    term: term.to_string(),
                                    op: record.trim().to_string(),
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(SymmetryOperator { rot, trans })
    }

    /// Scales each row's translation by the corresponding full-cell grid
    /// count and rounds to the nearest integer.
    ///
    /// Applying symmetry to grid indices instead of continuous coordinates
    /// is an approximation, exact only when the operator translations land
    /// on whole grid units; preserved as-is for parity with existing map
    /// files.
    pub fn scaled_to_grid(&self, n_grid: [i32; 3]) -> GridOperator {
        let mut trans = [0i32; 3];
        for row in 0..3 {
            trans[row] = (self.trans[row] * n_grid[row] as f64).round() as i32;
        }
        GridOperator {
            rot: self.rot,
            trans,
        }
    }
}

impl GridOperator {
    /// Maps one integer grid coordinate triple to its symmetry image.
    pub fn apply(&self, p: [i32; 3]) -> [i32; 3] {
        let mut out = [0i32; 3];
        for row in 0..3 {
            out[row] = self.rot[row][0] * p[0]
                + self.rot[row][1] * p[1]
                + self.rot[row][2] * p[2]
                + self.trans[row];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_detected_regardless_of_case_and_spacing() {
        assert!(is_identity("x,y,z"));
        assert!(is_identity("  X , Y , Z  "));
        assert!(!is_identity("-x,-y,-z"));
        assert!(!is_identity("x,y,z+1/2"));
    }

    #[test]
    fn plain_axis_triplet_parses_to_identity_matrix() {
        let op = SymmetryOperator::parse("X,Y,Z").unwrap();
        assert_eq!(op.rot, [[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        assert_eq!(op.trans, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn trigonal_screw_operator_parses_with_fractional_translation() {
        let op = SymmetryOperator::parse("-Y, X-Y, Z+1/3").unwrap();
        assert_eq!(op.rot, [[0, -1, 0], [1, -1, 0], [0, 0, 1]]);
        assert_eq!(op.trans[0], 0.0);
        assert_eq!(op.trans[1], 0.0);
        assert!((op.trans[2] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn translation_scales_into_grid_units_and_rounds() {
        let op = SymmetryOperator::parse("x,y,z+1/3").unwrap();
        let grid_op = op.scaled_to_grid([6, 6, 6]);
        assert_eq!(grid_op.trans, [0, 0, 2]);
        let grid_op = op.scaled_to_grid([8, 8, 8]);
        // 8/3 = 2.67 rounds to 3
        assert_eq!(grid_op.trans, [0, 0, 3]);
    }

    #[test]
    fn inversion_operator_negates_grid_coordinates() {
        let op = SymmetryOperator::parse("-x,-y,-z").unwrap();
        let grid_op = op.scaled_to_grid([4, 4, 4]);
        assert_eq!(grid_op.apply([1, 2, 3]), [-1, -2, -3]);
    }

    #[test]
    fn two_component_record_is_rejected() {
        let result = SymmetryOperator::parse("x,y");
        assert!(matches!(
            result,
            Err(SymmetryError::WrongComponentCount { .. })
        ));
    }

    #[test]
    fn unknown_axis_letter_is_rejected() {
        let result = SymmetryOperator::parse("x,y,w");
        assert!(matches!(result, Err(SymmetryError::UnrecognizedTerm { .. })));
    }

    #[test]
    fn bare_number_without_denominator_is_rejected() {
        let result = SymmetryOperator::parse("x,y,z+1");
        assert!(matches!(result, Err(SymmetryError::UnrecognizedTerm { .. })));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let result = SymmetryOperator::parse("x,y,z+1/0");
        assert!(matches!(result, Err(SymmetryError::UnrecognizedTerm { .. })));
    }
}
