//! Zlib compression for loose objects.
//!
//! Objects are stored as the zlib stream of their full encoded form
//! (header plus payload). The level is configurable; every level
//! produces a stream any zlib decoder reads.

use crate::{Result, StorageError};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

/// Compression level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression (stored zlib blocks)
    None,
    /// Fast compression (lower ratio)
    Fast,
    /// Default compression (balanced)
    #[default]
    Default,
    /// Best compression (slower, higher ratio)
    Best,
}

impl CompressionLevel {
    /// Converts to flate2 compression level.
    pub fn to_flate2(self) -> flate2::Compression {
        match self {
            CompressionLevel::None => flate2::Compression::none(),
            CompressionLevel::Fast => flate2::Compression::fast(),
            CompressionLevel::Default => flate2::Compression::default(),
            CompressionLevel::Best => flate2::Compression::best(),
        }
    }

    /// Parses a level name (`none`, `fast`, `default`, `best`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "fast" => Some(Self::Fast),
            "default" => Some(Self::Default),
            "best" => Some(Self::Best),
            _ => None,
        }
    }

    /// Compresses `data` into a zlib stream.
    pub fn compress(self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.to_flate2());
        encoder
            .write_all(data)
            .map_err(|e| StorageError::Compression(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| StorageError::Compression(e.to_string()))
    }
}

/// Inflates a zlib stream.
pub(crate) fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| StorageError::Compression(e.to_string()))?;
    Ok(decompressed)
}
