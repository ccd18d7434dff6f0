use super::DecodeError;
use super::traits::DensityMapFile;
use crate::core::models::cell::UnitCell;
use crate::core::models::grid::PeriodicGrid;
use crate::core::models::map::DensityMap;
use crate::core::symmetry::{self, SymmetryOperator};
use std::sync::Arc;

// Format reference: https://www.ccp4.ac.uk/html/maplib.html#description
//
// 1024-byte header of 256 32-bit words (integer, with float overlay for the
// real-valued fields), an optional extended header of 80-byte ASCII symmetry
// records, then the density values in column/row/section order.

const HEADER_BYTES: usize = 1024;
const HEADER_WORDS: usize = 256;
const SYMOP_RECORD_BYTES: usize = 80;

/// Header bookkeeping not folded into the [`DensityMap`] itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ccp4Metadata {
    pub mode: i32,
    pub min: f32,
    pub max: f32,
    pub space_group: i32,
    pub nsymbt: i32,
    pub lskflg: i32,
}

/// Read-only word views over the immutable file buffer: the same bytes
/// interpreted as little-endian i32 or f32, no aliasing and no mutation.
struct Words<'a> {
    buf: &'a [u8],
}

impl Words<'_> {
    fn int(&self, word: usize) -> i32 {
        let o = 4 * word;
        i32::from_le_bytes([self.buf[o], self.buf[o + 1], self.buf[o + 2], self.buf[o + 3]])
    }

    fn float(&self, word: usize) -> f32 {
        let o = 4 * word;
        f32::from_le_bytes([self.buf[o], self.buf[o + 1], self.buf[o + 2], self.buf[o + 3]])
    }
}

pub struct Ccp4File;

impl DensityMapFile for Ccp4File {
    type Metadata = Ccp4Metadata;
    type Error = DecodeError;

    fn decode(buf: &[u8]) -> Result<(DensityMap, Self::Metadata), Self::Error> {
        if buf.len() < HEADER_BYTES {
            return Err(DecodeError::SizeMismatch {
                expected: HEADER_BYTES,
                actual: buf.len(),
            });
        }
        let words = Words { buf };

        let n_crs = [words.int(0), words.int(1), words.int(2)];
        let mode = words.int(3);
        if mode != 2 {
            return Err(DecodeError::UnsupportedMode { mode });
        }
        let start = [words.int(4), words.int(5), words.int(6)];
        let n_grid = [words.int(7), words.int(8), words.int(9)];

        // MAPC/MAPR/MAPS say which of X,Y,Z (1,2,3) each of columns, rows,
        // sections corresponds to; invert that into per-axis positions.
        let map_crs = [words.int(16), words.int(17), words.int(18)];
        let axis_of = |code: i32| map_crs.iter().position(|&c| c == code);
        let (ax, ay, az) = match (axis_of(1), axis_of(2), axis_of(3)) {
            (Some(ax), Some(ay), Some(az)) => (ax, ay, az),
            _ => return Err(DecodeError::InvalidAxisCodes { codes: map_crs }),
        };

        let metadata = Ccp4Metadata {
            mode,
            min: words.float(19),
            max: words.float(20),
            space_group: words.int(22),
            nsymbt: words.int(23),
            lskflg: words.int(24),
        };
        let mean = words.float(21) as f64;
        let rms = words.float(54) as f64;
        let nsymbt = metadata.nsymbt;

        let n_points = n_crs[0] as i64 * n_crs[1] as i64 * n_crs[2] as i64;
        let expected = HEADER_BYTES as i64 + nsymbt as i64 + 4 * n_points;
        if expected != buf.len() as i64 {
            return Err(DecodeError::SizeMismatch {
                expected: expected.max(0) as usize,
                actual: buf.len(),
            });
        }
        if nsymbt < 0 || nsymbt % 4 != 0 {
            return Err(DecodeError::AlignmentError { nsymbt });
        }

        let unit_cell = Arc::new(UnitCell::new(
            words.float(10) as f64,
            words.float(11) as f64,
            words.float(12) as f64,
            words.float(13) as f64,
            words.float(14) as f64,
            words.float(15) as f64,
        )?);

        // CCP4 maps are expanded over the full cell, so the stored box and
        // the periodicity coincide.
        let mut grid = PeriodicGrid::new(n_grid, n_grid)?;

        let data_start = HEADER_WORDS + (nsymbt / 4) as usize;
        let end = [start[0] + n_crs[0], start[1] + n_crs[1], start[2] + n_crs[2]];

        let mut idx = data_start;
        let mut it = [0i32; 3];
        for s in start[2]..end[2] {
            it[2] = s;
            for r in start[1]..end[1] {
                it[1] = r;
                for c in start[0]..end[0] {
                    it[0] = c;
                    grid.set(it[ax], it[ay], it[az], words.float(idx))?;
                    idx += 1;
                }
            }
        }

        if nsymbt > 0 {
            let mut rec = HEADER_BYTES;
            while rec + SYMOP_RECORD_BYTES <= HEADER_BYTES + nsymbt as usize {
                let record = String::from_utf8_lossy(&buf[rec..rec + SYMOP_RECORD_BYTES]);
                rec += SYMOP_RECORD_BYTES;
                if symmetry::is_identity(&record) {
                    continue;
                }
                let grid_op = SymmetryOperator::parse(&record)?.scaled_to_grid(n_grid);

                // Applied to grid indices rather than continuous coordinates;
                // equivalent for the simple crystallographic operators seen
                // in practice, though not in general.
                let mut idx = data_start;
                for s in start[2]..end[2] {
                    it[2] = s;
                    for r in start[1]..end[1] {
                        it[1] = r;
                        for c in start[0]..end[0] {
                            it[0] = c;
                            let p = grid_op.apply([it[ax], it[ay], it[az]]);
                            grid.set(p[0], p[1], p[2], words.float(idx))?;
                            idx += 1;
                        }
                    }
                }
            }
        }

        Ok((DensityMap::new(grid, unit_cell, mean, rms), metadata))
    }
}
