pub mod codec;
pub mod file_decompressor;
pub mod report;

pub use codec::decompress_brotli;
pub use file_decompressor::{
    output_path_for, strip_compression_suffix, DecompressionEvent, FileDecompressor, PlannedFile,
    SUFFIX_LEN,
};
pub use report::{DecompressionReport, FileOutcome};

#[cfg(test)]
pub(crate) fn compress_brotli(data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 9, 22);
        writer.write_all(data).unwrap();
    }
    compressed
}
