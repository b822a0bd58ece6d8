//! cli component of the huffpack project.
//!
//! `$exename` stands for the executable name, `huffpack` on linux or `huffpack.exe` on windows.
//! `<description>` denotes a required argument, `[description]` an optional one.
//!
//! # Compression
//!
//! > `$exename compress <path to text file> [--no-table-file]`
//!
//! trailing whitespace is trimmed from the input, the rest is huffman coded and written next to
//! the input with its extension replaced by `.bin`. the compressed file only holds a padding
//! header and the coded bits, so the code table is written to `{file stem}.codes.json` beside it.
//! `--no-table-file` skips that, leaving a file nothing can decode.
//!
//! # Decompression
//!
//! > `$exename decompress <path to .bin file> [--table <path to table file>]`
//!
//! the table is read from `--table` if given, otherwise from `{file stem}.codes.json` next to the
//! input. the output is written to `{file stem}_decompressed.txt` next to the input.
//!
//! # Testing
//!
//! > `$exename test <path to text file>`
//!
//! compresses the file and decompresses the result with the same in-memory table, then compares
//! the output against the trimmed input.
//!
//! > `$exename corpus <path to folder>`
//!
//! runs the in-memory roundtrip over every file below the folder and prints sizes and ratios.
//! nothing is written to disk.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::codec::CodecOptions;

pub mod compress;
pub mod corpus;
pub mod decompress;

/// CLI arguments for the huffpack application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands for huffpack
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a text file into a sibling .bin file
    #[command(visible_alias = "c", alias = "comp")]
    Compress(CompressArgs),

    /// Decompress a .bin file into a sibling _decompressed.txt file
    #[command(visible_alias = "d", alias = "decomp")]
    Decompress(DecompressArgs),

    /// Compress and decompress a file in memory and compare the result
    Test(TestArgs),

    /// Roundtrip every file in a folder and report compression ratios
    Corpus(CorpusArgs),
}

/// Arguments specific to the compress command
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Path to the input text file
    pub input: PathBuf,

    /// Do not write the {stem}.codes.json table file
    #[arg(long)]
    pub no_table_file: bool,
}

impl CompressArgs {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            write_table_file: !self.no_table_file,
        }
    }
}

/// Arguments specific to the decompress command
#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// Path to a file produced by the compress command
    pub input: PathBuf,

    /// Code table file to decode with. Defaults to {stem}.codes.json next to the input
    #[arg(long)]
    pub table: Option<PathBuf>,
}

/// Arguments specific to the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Path to the input text file
    pub input: PathBuf,
}

/// Arguments specific to the corpus command
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Folder to walk
    #[arg(default_value = "./test_data")]
    pub input: PathBuf,
}
