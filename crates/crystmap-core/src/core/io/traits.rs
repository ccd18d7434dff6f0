use crate::core::models::map::DensityMap;
use std::error::Error;
use std::fs;
use std::io;
use std::path::Path;

/// Defines the interface for decoding density-map file formats.
///
/// Decoding is buffer-based: both supported formats need random access over
/// the whole file (header words, extended symmetry records, brick-packed
/// data), so the entire contents are passed as one immutable byte slice
/// rather than streamed. The buffer is never mutated; byte-order correction
/// happens on read.
pub trait DensityMapFile {
    /// Format-specific header bookkeeping returned alongside the map.
    type Metadata;

    /// The error type for decode operations.
    type Error: Error + From<io::Error>;

    /// Decodes a whole-file buffer into a density map and its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not conform to the format; the
    /// decode fails fast on the first violation and no partially built map
    /// escapes.
    fn decode(buf: &[u8]) -> Result<(DensityMap, Self::Metadata), Self::Error>;

    /// Reads a file and decodes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoding fails.
    fn decode_path<P: AsRef<Path>>(path: P) -> Result<(DensityMap, Self::Metadata), Self::Error> {
        let buf = fs::read(path)?;
        Self::decode(&buf)
    }
}
