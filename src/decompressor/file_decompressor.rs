use crate::decompressor::codec::decompress_brotli;
use crate::decompressor::report::{DecompressionReport, FileOutcome};
use crate::error::{Result, UnbrError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Length of the compression suffix (`.br`) in characters.
pub const SUFFIX_LEN: usize = 3;

/// Drops the trailing compression suffix from `name`.
///
/// Exactly the last [`SUFFIX_LEN`] characters are removed whatever they are.
/// Returns `None` when nothing would be left.
pub fn strip_compression_suffix(name: &str) -> Option<&str> {
    let (cut, _) = name.char_indices().rev().nth(SUFFIX_LEN - 1)?;
    if cut == 0 {
        return None;
    }
    Some(&name[..cut])
}

pub fn output_path_for(build_dir: &Path, name: &str) -> Result<PathBuf> {
    strip_compression_suffix(name)
        .map(|stripped| build_dir.join(stripped))
        .ok_or_else(|| UnbrError::InvalidFileName {
            name: name.to_string(),
        })
}

/// Notifications emitted while walking the file list.
///
/// Returning an error from the callback stops the run before the next file.
#[derive(Debug)]
pub enum DecompressionEvent<'a> {
    Checking { index: usize, total: usize, filename: &'a str },
    Decompressing { filename: &'a str, input_path: &'a Path },
    Finished(&'a FileOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub filename: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub present: bool,
}

pub struct FileDecompressor {
    build_dir: PathBuf,
    preserve_mtime: bool,
}

impl FileDecompressor {
    pub fn new<P: Into<PathBuf>>(build_dir: P) -> Self {
        Self {
            build_dir: build_dir.into(),
            preserve_mtime: false,
        }
    }

    pub fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Resolves paths for every name without touching file contents.
    pub fn plan(&self, filenames: &[String]) -> Result<Vec<PlannedFile>> {
        filenames
            .iter()
            .map(|filename| {
                let input_path = self.build_dir.join(filename);
                let output_path = output_path_for(&self.build_dir, filename)?;
                Ok(PlannedFile {
                    filename: filename.clone(),
                    present: input_path.is_file(),
                    input_path,
                    output_path,
                })
            })
            .collect()
    }

    /// Processes `filenames` in order.
    ///
    /// Missing inputs are recorded and skipped. The first read, decode or
    /// write failure aborts the run; outputs written before it stay on disk.
    pub fn decompress_files<F>(
        &self,
        filenames: &[String],
        mut on_event: F,
    ) -> Result<DecompressionReport>
    where
        F: FnMut(DecompressionEvent<'_>) -> Result<()>,
    {
        let start_time = Instant::now();
        let mut outcomes = Vec::with_capacity(filenames.len());

        for (index, filename) in filenames.iter().enumerate() {
            on_event(DecompressionEvent::Checking {
                index,
                total: filenames.len(),
                filename: filename.as_str(),
            })?;

            let outcome = self.decompress_file(filename, &mut on_event)?;
            on_event(DecompressionEvent::Finished(&outcome))?;
            outcomes.push(outcome);
        }

        Ok(DecompressionReport::new(
            self.build_dir.clone(),
            outcomes,
            start_time.elapsed(),
        ))
    }

    fn decompress_file<F>(&self, filename: &str, on_event: &mut F) -> Result<FileOutcome>
    where
        F: FnMut(DecompressionEvent<'_>) -> Result<()>,
    {
        let input_path = self.build_dir.join(filename);
        let output_path = output_path_for(&self.build_dir, filename)?;

        if !input_path.is_file() {
            log::debug!("{} is missing, skipping", input_path.display());
            return Ok(FileOutcome::NotFound {
                filename: filename.to_string(),
                input_path,
            });
        }

        on_event(DecompressionEvent::Decompressing {
            filename,
            input_path: &input_path,
        })?;

        let compressed = fs::read(&input_path).map_err(|source| UnbrError::Read {
            path: input_path.clone(),
            source,
        })?;

        let decompressed =
            decompress_brotli(&compressed).map_err(|source| UnbrError::Decompression {
                path: input_path.clone(),
                source,
            })?;

        fs::write(&output_path, &decompressed).map_err(|source| UnbrError::Write {
            path: output_path.clone(),
            source,
        })?;

        if self.preserve_mtime {
            self.copy_mtime(&input_path, &output_path);
        }

        log::debug!(
            "{}: {} -> {} bytes",
            filename,
            compressed.len(),
            decompressed.len()
        );

        Ok(FileOutcome::Decompressed {
            filename: filename.to_string(),
            input_path,
            output_path,
            compressed_bytes: compressed.len() as u64,
            decompressed_bytes: decompressed.len() as u64,
        })
    }

    fn copy_mtime(&self, source: &Path, dest: &Path) {
        if let Ok(modified_time) = fs::metadata(source).and_then(|m| m.modified()) {
            if let Err(e) =
                filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(modified_time))
            {
                log::warn!("could not set mtime on {}: {}", dest.display(), e);
            }
        }
    }
}
