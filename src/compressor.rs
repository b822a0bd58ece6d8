use std::io;

use thiserror::Error;

use crate::algorithms::frequency::Symbol;

/// Represents an error emitted while building codes, packing, or unpacking data.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Tree construction was given zero distinct symbols (the input was empty after trimming).
    #[error("cannot build a Huffman tree from an empty alphabet")]
    EmptyAlphabet,

    /// Decompression was requested before any code table was produced or loaded.
    #[error("no code table available: compress with this codec first or load a table file")]
    MissingCodeTable,

    /// The padding header or the bitstream behind it does not describe a valid payload.
    ///
    /// The argument describes what went wrong.
    #[error("corrupt payload: {0}")]
    CorruptPadding(String),

    /// A symbol to be packed has no code in the table.
    #[error("symbol {0:#04x} has no code in the table")]
    UnknownSymbol(Symbol),

    /// A code table read from outside the codec is not a usable prefix code.
    #[error("invalid code table: {0}")]
    InvalidTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("code table file error: {0}")]
    TableFormat(#[from] serde_json::Error),
}

pub type Result<T, E = CodecError> = core::result::Result<T, E>;

/// Represents shared behavior for byte-level codecs.
///
/// Provides a method [`compress_bytes`](Compressor::compress_bytes) to compress data and
/// [`decompress_bytes`](Compressor::decompress_bytes) to decompress data.
///
/// # Note
///
/// A codec may normalize its input before encoding (see [`normalize`](Compressor::normalize)).
/// The guarantee is that [`decompress_bytes`](Compressor::decompress_bytes) reconstructs the
/// normalized data, not necessarily the raw input.
pub trait Compressor {
    /// Compresses a given byte slice and returns the encoded data.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input cannot be coded at all.
    fn compress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses a given byte slice and returns the decoded data.
    ///
    /// # Errors
    ///
    /// Returns an error if the input data was malformed, or if the codec lacks the state
    /// needed to decode it.
    fn decompress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// The view of `data` that a round trip is expected to reproduce.
    fn normalize<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        data
    }

    /// Human readable name, used in diagnostics.
    fn compressor_name(&self) -> String {
        core::any::type_name::<Self>().to_string()
    }

    /// Performs a round-trip test on the compressor.
    ///
    /// Use for sanity checking the compressor and decompressor.
    fn test_roundtrip<'orig>(&mut self, data: &'orig [u8]) -> Result<RoundTripTestResult<'orig>> {
        let original = self.normalize(data);
        let compressed = self.compress_bytes(data)?;
        let decompressed = self.decompress_bytes(&compressed)?;
        let equal = original == decompressed.as_slice();

        Ok(RoundTripTestResult {
            equal,
            original,
            compressed,
            decompressed,
        })
    }
}

/// Represents the result of a round-trip test.
///
/// Use accessor methods to retrieve the [`result`][RoundTripTestResult::is_successful],
/// the [`original data`][RoundTripTestResult::get_original],
/// the [`compressed data`][RoundTripTestResult::get_compressed],
/// and the [`decompressed data`][RoundTripTestResult::get_decompressed].
#[derive(Clone, Debug, Hash)]
pub struct RoundTripTestResult<'orig> {
    pub(crate) equal: bool,
    pub(crate) original: &'orig [u8],
    pub(crate) compressed: Vec<u8>,
    pub(crate) decompressed: Vec<u8>,
}

impl<'orig> RoundTripTestResult<'orig> {
    /// Whether the normalized original and decompressed data were equal.
    pub const fn is_successful(&self) -> bool {
        self.equal
    }

    /// The normalized original data.
    pub const fn get_original(&self) -> &'orig [u8] {
        self.original
    }

    pub fn get_compressed(&self) -> &[u8] {
        self.compressed.as_slice()
    }

    pub fn get_decompressed(&self) -> &[u8] {
        self.decompressed.as_slice()
    }
}
