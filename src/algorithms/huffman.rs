use core::fmt::{self, Display};

use crate::{
    algorithms::{
        bitstream,
        code_table::CodeBook,
        frequency::{self, FrequencyMap},
        tree,
    },
    compressor::{CodecError, Compressor, Result},
};

if_tracing! {
    use tracing::{Level, info, span};
}

/// Byte-level Huffman codec.
///
/// The packed payload carries no code table, so the codec keeps the [`CodeBook`] built by its
/// most recent compression. Decompression needs that book (or one handed in with
/// [`set_code_book`](HuffmanCoding::set_code_book)).
#[derive(Clone, Debug, Default)]
pub struct HuffmanCoding {
    book: Option<CodeBook>,
}

impl HuffmanCoding {
    pub const fn new() -> Self {
        Self { book: None }
    }

    pub const fn code_book(&self) -> Option<&CodeBook> {
        self.book.as_ref()
    }

    pub fn set_code_book(&mut self, book: CodeBook) {
        self.book = Some(book);
    }

    /// Builds a code book for `data` as-is and packs it. Returns the book alongside the bytes.
    pub fn huffman_encode(data: &[u8]) -> Result<(CodeBook, Vec<u8>)> {
        let freqs = FrequencyMap::from_symbols(data);
        let root = tree::build_tree(&freqs)?;
        let book = CodeBook::from_tree(&root);
        let packed = bitstream::pack(data, &book)?;
        Ok((book, packed))
    }

    pub fn huffman_decode(data: &[u8], book: &CodeBook) -> Result<Vec<u8>> {
        bitstream::unpack(data, book)
    }
}

impl Compressor for HuffmanCoding {
    fn compress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if_tracing! {
            let span = span!(Level::INFO, "huffman", func = "compress");
            let _enter = span.enter();
        }

        let text = self.normalize(data);
        let (book, packed) = Self::huffman_encode(text)?;

        if_tracing! {
            info!(input_len = data.len(), trimmed_len = text.len(), symbols = book.len(), output_len = packed.len(), "huffman compress finished");
        }

        self.book = Some(book);
        Ok(packed)
    }

    fn decompress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if_tracing! {
            let span = span!(Level::INFO, "huffman", func = "decompress");
            let _enter = span.enter();
        }

        let book = self.book.as_ref().ok_or(CodecError::MissingCodeTable)?;
        let decoded = Self::huffman_decode(data, book)?;

        if_tracing! {
            info!(input_len = data.len(), output_len = decoded.len(), "huffman decompress finished");
        }

        Ok(decoded)
    }

    fn normalize<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        frequency::normalize(data)
    }

    fn compressor_name(&self) -> String {
        self.to_string()
    }
}

impl Display for HuffmanCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Huffman Coding")
    }
}
