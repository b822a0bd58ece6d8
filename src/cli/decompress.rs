use anyhow::{Context, Result};

use crate::cli::DecompressArgs;
use crate::codec::{HuffmanCodec, table_path};

pub fn decompress(args: DecompressArgs) -> Result<()> {
    let table = args.table.clone().unwrap_or_else(|| table_path(&args.input));
    if_tracing! {
        tracing::debug!(event = "load_table", table = %table.display());
    }

    let mut codec = HuffmanCodec::default();
    codec
        .load_code_table(&table)
        .with_context(|| format!("failed to load code table {}", table.display()))?;
    let output = codec
        .decompress(&args.input)
        .with_context(|| format!("failed to decompress {}", args.input.display()))?;

    println!("Decompression complete: {}", output.display());
    Ok(())
}
