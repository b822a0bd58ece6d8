//! Packing of coded symbols into a byte-aligned payload, and the inverse.
//!
//! Layout: byte 0 holds the number of zero bits appended at the end (0..=7). The coded bits
//! follow from byte 1 onward, most significant bit first.

use crate::{
    algorithms::{
        code_table::{Code, CodeBook},
        frequency::Symbol,
    },
    compressor::{CodecError, Result},
};

if_tracing! {
    use tracing::{debug, info};
}

/// Length of the padding header in bytes.
pub const HEADER_LEN: usize = 1;

/// Number of zero bits needed to bring `bit_len` up to a byte boundary.
///
/// Already aligned lengths need no padding.
pub const fn pad_amount(bit_len: usize) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

/// Appends bits MSB-first into a byte buffer.
struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    fn with_header(capacity: usize) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_LEN + capacity);
        bytes.resize(HEADER_LEN, 0);
        Self {
            bytes,
            current: 0,
            filled: 0,
        }
    }

    fn write_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Flushes the partial byte with zero bits and records the pad count in the header.
    fn finish(mut self) -> Vec<u8> {
        let payload_bits = (self.bytes.len() - HEADER_LEN) * 8 + self.filled as usize;
        let pad = pad_amount(payload_bits);
        for _ in 0..pad {
            self.write_bit(false);
        }
        self.bytes[0] = pad;
        self.bytes
    }
}

/// Encodes `symbols` with `book` and packs the result behind a padding header.
///
/// # Errors
///
/// Returns [`CodecError::UnknownSymbol`] if a symbol has no code in `book`.
pub fn pack(symbols: &[Symbol], book: &CodeBook) -> Result<Vec<u8>> {
    if_tracing! {
        debug!(target = "bitstream", input_len = symbols.len(), "pack start");
    }

    let mut writer = BitWriter::with_header(symbols.len() / 2);
    for &symbol in symbols {
        let code = book.code(symbol).ok_or(CodecError::UnknownSymbol(symbol))?;
        writer.write_code(code);
    }
    let packed = writer.finish();

    if_tracing! {
        info!(target = "bitstream", input_len = symbols.len(), output_len = packed.len(), pad = packed[0], "pack complete");
    }

    Ok(packed)
}

/// Strips the padding header and decodes the remaining bits with `book`.
///
/// # Errors
///
/// Returns [`CodecError::CorruptPadding`] if the header is missing or out of range, the padding
/// bits are not zero, or the bitstream does not split exactly into codes from `book`.
pub fn unpack(bytes: &[u8], book: &CodeBook) -> Result<Vec<Symbol>> {
    if_tracing! {
        debug!(target = "bitstream", input_len = bytes.len(), "unpack start");
    }

    let (&pad, payload) = bytes
        .split_first()
        .ok_or_else(|| CodecError::CorruptPadding("missing padding header".to_string()))?;
    if pad > 7 {
        return Err(CodecError::CorruptPadding(format!("padding header {} is out of range 0..=7", pad)));
    }

    let total_bits = payload.len() * 8;
    let pad = pad as usize;
    if pad > total_bits {
        return Err(CodecError::CorruptPadding(format!(
            "padding header removes {} bits but only {} follow it",
            pad, total_bits
        )));
    }
    let data_bits = total_bits - pad;

    let bit_at = |i: usize| (payload[i / 8] >> (7 - i % 8)) & 1 == 1;

    if (data_bits..total_bits).any(|i| bit_at(i)) {
        return Err(CodecError::CorruptPadding("padding bits are not zero".to_string()));
    }

    let mut decoded = Vec::with_capacity(data_bits / book.max_len().max(1));
    let mut candidate = Code::new();
    for i in 0..data_bits {
        candidate.push(bit_at(i));
        if let Some(symbol) = book.symbol(&candidate) {
            decoded.push(symbol);
            candidate.clear();
        } else if candidate.len() >= book.max_len() {
            return Err(CodecError::CorruptPadding(format!(
                "bits {}..={} match no code",
                i + 1 - candidate.len(),
                i
            )));
        }
    }

    if !candidate.is_empty() {
        return Err(CodecError::CorruptPadding(format!(
            "{} trailing bits match no code",
            candidate.len()
        )));
    }

    if_tracing! {
        info!(target = "bitstream", input_len = bytes.len(), output_len = decoded.len(), "unpack complete");
    }

    Ok(decoded)
}
