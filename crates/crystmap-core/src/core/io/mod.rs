//! Decoding of density-map file formats.
//!
//! Two legacy binary layouts are supported, each behind the common
//! [`traits::DensityMapFile`] interface:
//!
//! - [`ccp4`] - CCP4/MRC maps, mode 2 (32-bit float) only, with optional
//!   symmetry-operator expansion from the extended header
//! - [`dsn6`] - DSN6/BRIX maps with byte-packed 8×8×8 bricks and automatic
//!   byte-order detection
//!
//! The format is chosen explicitly by the caller through [`MapFormat`], or
//! guessed from the buffer with [`MapFormat::sniff`]. There is no runtime
//! type inspection: dispatch is a closed enum.

pub mod ccp4;
pub mod dsn6;
pub mod traits;

use crate::core::models::cell::CellError;
use crate::core::models::grid::GridError;
use crate::core::models::map::DensityMap;
use crate::core::symmetry::SymmetryError;
use thiserror::Error;

/// Errors shared by the map decoders.
///
/// All are fatal to the decode in progress; nothing is retried and a map
/// from a failed decode never escapes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported CCP4 map mode {mode} (only mode 2, 32-bit float, is supported)")]
    UnsupportedMode { mode: i32 },

    #[error("map length mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("CCP4 extended header size {nsymbt} is not divisible by 4")]
    AlignmentError { nsymbt: i32 },

    #[error("CCP4 axis correspondence codes {codes:?} are not a permutation of 1,2,3")]
    InvalidAxisCodes { codes: [i32; 3] },

    #[error("DSN6 endian sentinel is not 100 in either byte order")]
    EndianDetectionFailure,

    #[error("malformed symmetry operator: {0}")]
    MalformedOperator(#[from] SymmetryError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid unit cell in map header: {0}")]
    Cell(#[from] CellError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The supported on-disk map formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Ccp4,
    Dsn6,
}

impl MapFormat {
    /// Guesses the format from the buffer contents.
    ///
    /// CCP4 is recognized by the `MAP ` stamp at byte 208 (header word 53);
    /// DSN6 by its sentinel header word equal to 100 in either byte order.
    /// A convenience only — explicit caller selection always wins.
    pub fn sniff(buf: &[u8]) -> Option<MapFormat> {
        if buf.len() >= 1024 && &buf[208..212] == b"MAP " {
            return Some(MapFormat::Ccp4);
        }
        if buf.len() >= 512 {
            let le = i16::from_le_bytes([buf[36], buf[37]]);
            let be = i16::from_be_bytes([buf[36], buf[37]]);
            if le == 100 || be == 100 {
                return Some(MapFormat::Dsn6);
            }
        }
        None
    }

    /// Decodes the buffer with the decoder for this format, discarding the
    /// format-specific metadata.
    pub fn decode(self, buf: &[u8]) -> Result<DensityMap, DecodeError> {
        use traits::DensityMapFile;
        match self {
            MapFormat::Ccp4 => ccp4::Ccp4File::decode(buf).map(|(map, _)| map),
            MapFormat::Dsn6 => dsn6::Dsn6File::decode(buf).map(|(map, _)| map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffing_rejects_unrecognized_buffers() {
        assert_eq!(MapFormat::sniff(&[0u8; 2048]), None);
        assert_eq!(MapFormat::sniff(b"not a map"), None);
    }

    #[test]
    fn ccp4_stamp_is_recognized() {
        let mut buf = vec![0u8; 2048];
        buf[208..212].copy_from_slice(b"MAP ");
        assert_eq!(MapFormat::sniff(&buf), Some(MapFormat::Ccp4));
    }

    #[test]
    fn dsn6_sentinel_is_recognized_in_both_byte_orders() {
        let mut buf = vec![0u8; 512];
        buf[36..38].copy_from_slice(&100i16.to_le_bytes());
        assert_eq!(MapFormat::sniff(&buf), Some(MapFormat::Dsn6));
        buf[36..38].copy_from_slice(&100i16.to_be_bytes());
        assert_eq!(MapFormat::sniff(&buf), Some(MapFormat::Dsn6));
    }
}
