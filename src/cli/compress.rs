use anyhow::{Context, Result};

use crate::cli::CompressArgs;
use crate::codec::{HuffmanCodec, table_path};

pub fn compress(args: CompressArgs) -> Result<()> {
    let mut codec = HuffmanCodec::new(args.codec_options());
    let output = codec
        .compress(&args.input)
        .with_context(|| format!("failed to compress {}", args.input.display()))?;

    println!("Compression complete: {}", output.display());
    if let Some(book) = codec.code_book() {
        println!("{} distinct symbols, longest code {} bits", book.len(), book.max_len());
    }
    if args.no_table_file {
        println!("no code table written, {} cannot be decompressed later", output.display());
    } else {
        println!("code table: {}", table_path(&output).display());
    }
    Ok(())
}
