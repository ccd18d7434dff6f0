use super::DecodeError;
use super::traits::DensityMapFile;
use crate::core::models::cell::UnitCell;
use crate::core::models::grid::PeriodicGrid;
use crate::core::models::map::DensityMap;
use crate::core::stats;
use std::sync::Arc;

// Format reference: https://www.uoxray.uoregon.edu/tnt/manual/node104.html
//
// 512-byte header of 16-bit words, then density bytes packed into 8×8×8
// bricks. Files exist in both byte orders; the sentinel header word 18
// equals 100 only when read with the file's own order.

const HEADER_BYTES: usize = 512;
const BRICK_EDGE: i32 = 8;
const BRICK_BYTES: usize = 512;
const ENDIAN_SENTINEL: i16 = 100;

/// Header bookkeeping not folded into the [`DensityMap`] itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dsn6Metadata {
    pub origin: [i32; 3],
    /// Whether the file was stored in the opposite byte order and every
    /// 16-bit word (including the packed density bytes) was swapped on read.
    pub byte_swapped: bool,
    /// Stored byte `b` decodes to density `(b - plus) / prod`.
    pub prod: f64,
    pub plus: f64,
}

/// A read-only view that presents the buffer in the detected byte order.
///
/// The historical implementations swapped the whole buffer in place; this
/// view translates indices on read instead, so the caller's memory is never
/// touched.
struct Dsn6View<'a> {
    buf: &'a [u8],
    swapped: bool,
}

impl Dsn6View<'_> {
    fn word(&self, index: usize) -> i16 {
        let o = 2 * index;
        let pair = [self.buf[o], self.buf[o + 1]];
        if self.swapped {
            i16::from_be_bytes(pair)
        } else {
            i16::from_le_bytes(pair)
        }
    }

    /// A density byte; the word swap exchanges byte pairs, hence the `^ 1`.
    fn byte(&self, index: usize) -> u8 {
        if self.swapped {
            self.buf[index ^ 1]
        } else {
            self.buf[index]
        }
    }
}

pub struct Dsn6File;

impl DensityMapFile for Dsn6File {
    type Metadata = Dsn6Metadata;
    type Error = DecodeError;

    fn decode(buf: &[u8]) -> Result<(DensityMap, Self::Metadata), Self::Error> {
        if buf.len() < HEADER_BYTES {
            return Err(DecodeError::SizeMismatch {
                expected: HEADER_BYTES,
                actual: buf.len(),
            });
        }
        let mut view = Dsn6View { buf, swapped: false };
        if view.word(18) != ENDIAN_SENTINEL {
            view.swapped = true;
            if view.word(18) != ENDIAN_SENTINEL {
                return Err(DecodeError::EndianDetectionFailure);
            }
        }

        let origin = [view.word(0) as i32, view.word(1) as i32, view.word(2) as i32];
        let n_real = [view.word(3) as i32, view.word(4) as i32, view.word(5) as i32];
        let n_grid = [view.word(6) as i32, view.word(7) as i32, view.word(8) as i32];

        let n_blocks = [
            (n_real[0] + BRICK_EDGE - 1) / BRICK_EDGE,
            (n_real[1] + BRICK_EDGE - 1) / BRICK_EDGE,
            (n_real[2] + BRICK_EDGE - 1) / BRICK_EDGE,
        ];
        let expected = HEADER_BYTES as i64
            + BRICK_BYTES as i64 * n_blocks[0] as i64 * n_blocks[1] as i64 * n_blocks[2] as i64;
        if expected != buf.len() as i64 {
            return Err(DecodeError::SizeMismatch {
                expected: expected.max(0) as usize,
                actual: buf.len(),
            });
        }

        let cell_mult = 1.0 / view.word(17) as f64;
        let unit_cell = Arc::new(UnitCell::new(
            cell_mult * view.word(9) as f64,
            cell_mult * view.word(10) as f64,
            cell_mult * view.word(11) as f64,
            cell_mult * view.word(12) as f64,
            cell_mult * view.word(13) as f64,
            cell_mult * view.word(14) as f64,
        )?);
        let prod = view.word(15) as f64 / 100.0;
        let plus = view.word(16) as f64;

        let mut grid = PeriodicGrid::new(n_real, n_grid)?;

        // Bricks iterate Z-outer/Y/X, as do the voxels inside each brick. A
        // brick sticking out past n_real still occupies its full 512 bytes;
        // its out-of-range voxels are skipped by advancing the cursor.
        let mut offset = HEADER_BYTES;
        for zz in 0..n_blocks[2] {
            for yy in 0..n_blocks[1] {
                for xx in 0..n_blocks[0] {
                    for k in 0..BRICK_EDGE {
                        let z = BRICK_EDGE * zz + k;
                        for j in 0..BRICK_EDGE {
                            let y = BRICK_EDGE * yy + j;
                            for i in 0..BRICK_EDGE {
                                let x = BRICK_EDGE * xx + i;
                                if x < n_real[0] && y < n_real[1] && z < n_real[2] {
                                    let density = (view.byte(offset) as f64 - plus) / prod;
                                    offset += 1;
                                    grid.set(
                                        origin[0] + x,
                                        origin[1] + y,
                                        origin[2] + z,
                                        density as f32,
                                    )?;
                                } else {
                                    offset += (BRICK_EDGE - i) as usize;
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }

        // DSN6 headers carry no trustworthy statistics; compute them from
        // the decoded values.
        let map_stats = stats::compute(grid.values());
        let metadata = Dsn6Metadata {
            origin,
            byte_swapped: view.swapped,
            prod,
            plus,
        };
        Ok((
            DensityMap::new(grid, unit_cell, map_stats.mean, map_stats.stddev),
            metadata,
        ))
    }
}
