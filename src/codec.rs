//! File-level compress/decompress on top of [`HuffmanCoding`].
//!
//! `compress("notes.txt")` writes `notes.bin` and, unless disabled, a `notes.codes.json` table
//! file. `decompress("notes.bin")` writes `notes_decompressed.txt`.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    algorithms::{
        code_table::{Code, CodeBook},
        frequency::Symbol,
        huffman::HuffmanCoding,
    },
    compressor::{CodecError, Compressor, Result},
};

if_tracing! {
    use tracing::info;
}

pub const COMPRESSED_EXTENSION: &str = "bin";
pub const DECOMPRESSED_SUFFIX: &str = "_decompressed";
pub const DECOMPRESSED_EXTENSION: &str = "txt";
pub const TABLE_SUFFIX: &str = ".codes.json";

/// Knobs for [`HuffmanCodec`], filled from command line flags.
#[derive(Clone, Debug)]
pub struct CodecOptions {
    /// Write the code table next to every compressed file.
    pub write_table_file: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self { write_table_file: true }
    }
}

/// On-disk form of a [`CodeBook`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CodeTableFile {
    /// Version of the tool that wrote the table.
    pub version: String,
    pub codes: Vec<CodeTableEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CodeTableEntry {
    pub symbol: Symbol,
    pub code: Code,
}

impl From<&CodeBook> for CodeTableFile {
    fn from(book: &CodeBook) -> Self {
        CodeTableFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            codes: book
                .iter()
                .map(|(symbol, code)| CodeTableEntry {
                    symbol,
                    code: code.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<CodeTableFile> for CodeBook {
    type Error = CodecError;

    fn try_from(file: CodeTableFile) -> Result<Self> {
        CodeBook::from_entries(file.codes.into_iter().map(|entry| (entry.symbol, entry.code)))
    }
}

/// `notes.txt` -> `notes.bin`
pub fn compressed_path(input: &Path) -> PathBuf {
    input.with_extension(COMPRESSED_EXTENSION)
}

/// `notes.bin` -> `notes_decompressed.txt`
pub fn decompressed_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(DECOMPRESSED_SUFFIX);
    name.push(".");
    name.push(DECOMPRESSED_EXTENSION);
    input.with_file_name(name)
}

/// `notes.bin` -> `notes.codes.json`
pub fn table_path(compressed: &Path) -> PathBuf {
    let mut name = compressed.file_stem().map(OsString::from).unwrap_or_default();
    name.push(TABLE_SUFFIX);
    compressed.with_file_name(name)
}

/// One compression session: the table produced by [`compress`](HuffmanCodec::compress) is what
/// [`decompress`](HuffmanCodec::decompress) decodes with.
#[derive(Debug, Default)]
pub struct HuffmanCodec {
    coding: HuffmanCoding,
    options: CodecOptions,
}

impl HuffmanCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            coding: HuffmanCoding::new(),
            options,
        }
    }

    pub const fn code_book(&self) -> Option<&CodeBook> {
        self.coding.code_book()
    }

    /// Compresses the text file at `input` into a sibling `.bin` file and returns its path.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and with [`CodecError::EmptyAlphabet`] if the file is empty or only
    /// whitespace.
    pub fn compress(&mut self, input: &Path) -> Result<PathBuf> {
        let output = compressed_path(input);
        let text = fs::read(input)?;
        let packed = self.coding.compress_bytes(&text)?;
        fs::write(&output, &packed)?;

        if self.options.write_table_file {
            self.save_code_table(&table_path(&output))?;
        }

        if_tracing! {
            info!(event = "compress_complete", input = %input.display(), output = %output.display(), input_len = text.len(), output_len = packed.len(), "compress finished");
        }

        Ok(output)
    }

    /// Decompresses a file written by [`compress`](HuffmanCodec::compress) into a sibling
    /// `_decompressed.txt` file and returns its path.
    ///
    /// # Errors
    ///
    /// Fails with [`CodecError::MissingCodeTable`] if this codec holds no table, with
    /// [`CodecError::CorruptPadding`] if the file does not decode, and on I/O errors.
    pub fn decompress(&mut self, input: &Path) -> Result<PathBuf> {
        if self.coding.code_book().is_none() {
            return Err(CodecError::MissingCodeTable);
        }
        let output = decompressed_path(input);
        let packed = fs::read(input)?;
        let text = self.coding.decompress_bytes(&packed)?;
        fs::write(&output, &text)?;

        if_tracing! {
            info!(event = "decompress_complete", input = %input.display(), output = %output.display(), input_len = packed.len(), output_len = text.len(), "decompress finished");
        }

        Ok(output)
    }

    /// Writes the current code table as JSON.
    ///
    /// # Errors
    ///
    /// Fails with [`CodecError::MissingCodeTable`] if there is nothing to save.
    pub fn save_code_table(&self, path: &Path) -> Result<()> {
        let book = self.coding.code_book().ok_or(CodecError::MissingCodeTable)?;
        let json = serde_json::to_string_pretty(&CodeTableFile::from(book))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replaces the current code table with one read from a JSON table file.
    pub fn load_code_table(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path)?;
        let file: CodeTableFile = serde_json::from_slice(&data)?;
        self.coding.set_code_book(CodeBook::try_from(file)?);
        Ok(())
    }
}
