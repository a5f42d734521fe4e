//! Whole-buffer Brotli decoding.

use brotli::enc::StandardAlloc;
use brotli::{BrotliDecompressStream, BrotliResult, BrotliState};
use std::io;

const OUTPUT_CHUNK_SIZE: usize = 64 * 1024;

/// Decompress a complete Brotli stream held in memory.
///
/// The whole input must be exactly one stream: truncated data, malformed
/// data and bytes left over after the end of the stream all yield an
/// `InvalidData` I/O error, and no partial output is returned.
pub fn decompress_brotli(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut state = BrotliState::new(
        StandardAlloc::default(),
        StandardAlloc::default(),
        StandardAlloc::default(),
    );

    let mut available_in = data.len();
    let mut input_offset = 0usize;
    let mut total_out = 0usize;
    let mut chunk = vec![0u8; OUTPUT_CHUNK_SIZE];
    let mut decompressed = Vec::with_capacity(data.len().saturating_mul(3));

    loop {
        let mut available_out = chunk.len();
        let mut output_offset = 0usize;

        let result = BrotliDecompressStream(
            &mut available_in,
            &mut input_offset,
            data,
            &mut available_out,
            &mut output_offset,
            chunk.as_mut_slice(),
            &mut total_out,
            &mut state,
        );
        decompressed.extend_from_slice(&chunk[..output_offset]);

        match result {
            BrotliResult::NeedsMoreOutput => continue,
            BrotliResult::ResultSuccess if available_in == 0 => return Ok(decompressed),
            BrotliResult::ResultSuccess => {
                return Err(invalid_data(format!(
                    "{} trailing bytes after end of Brotli stream",
                    available_in
                )))
            }
            BrotliResult::NeedsMoreInput => {
                return Err(invalid_data("unexpected end of Brotli stream".to_string()))
            }
            BrotliResult::ResultFailure => {
                return Err(invalid_data("invalid Brotli data".to_string()))
            }
        }
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
