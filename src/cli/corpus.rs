use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use crate::{
    algorithms::huffman::HuffmanCoding,
    cli::CorpusArgs,
    compressor::{CodecError, Compressor, RoundTripTestResult},
};

if_tracing! {
    use tracing::{Level, span};
}

pub fn corpus(args: CorpusArgs) -> Result<()> {
    let mut failed = 0usize;
    let mut total = 0usize;
    eprintln!("corpus {} with {}", args.input.display(), HuffmanCoding::new().compressor_name());

    for entry in WalkDir::new(&args.input).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("failed to walk {}", args.input.display()));
            }
            Err(e) => {
                eprintln!("======== FAILED {} ========\n\terror: {}", e.path().unwrap_or(args.input.as_path()).display(), e);
                failed += 1;
                total += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let input = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        total += 1;

        if_tracing! {
            let file_span = span!(Level::INFO, "corpus_file", path = %path.display());
            let _enter = file_span.enter();
        }

        let mut coding = HuffmanCoding::new();
        let started = std::time::Instant::now();
        let result = coding.test_roundtrip(&input);
        let elapsed = started.elapsed();

        if !print_results(path, result, elapsed) {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed the roundtrip", failed, total);
    }
    println!("Corpus complete: {} files", total);
    Ok(())
}

/// Prints one report block and returns whether the file passed.
fn print_results(path: &Path, result: crate::compressor::Result<RoundTripTestResult<'_>>, elapsed: Duration) -> bool {
    let eq = match result {
        Ok(eq) => eq,
        Err(CodecError::EmptyAlphabet) => {
            eprintln!("======== SKIPPED {} ========\n\tempty after trimming", path.display());
            return true;
        }
        Err(e) => {
            eprintln!("======== FAILED {} ========\n\terror: {}", path.display(), e);
            return false;
        }
    };

    let original_size = eq.get_original().len();
    let compressed_size = eq.get_compressed().len();
    let decompressed_size = eq.get_decompressed().len();

    let ratio = if original_size == 0 {
        1.0
    } else {
        compressed_size as f64 / original_size as f64
    };

    let bytes_saved = original_size as isize - compressed_size as isize;
    let percent_saved = if original_size == 0 {
        0.0
    } else {
        (bytes_saved as f64) / (original_size as f64) * 100.0
    };

    let passed = eq.is_successful();
    eprintln!(
        "======== {} {} ========\n\t{:.0?} roundtrip\n\toriginal: {} bytes (trimmed)\n\tcompressed: {} bytes\n\tdecompressed: {} bytes\n\tratio: {:.1}% (compressed/original)\n\tsaved: {:+} bytes ({:+.1}%)",
        if passed { "PASSED" } else { "FAILED" },
        path.display(),
        elapsed,
        original_size,
        compressed_size,
        decompressed_size,
        ratio * 100.0,
        bytes_saved,
        percent_saved,
    );
    passed
}
