use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Decompressed {
        filename: String,
        input_path: PathBuf,
        output_path: PathBuf,
        compressed_bytes: u64,
        decompressed_bytes: u64,
    },
    NotFound {
        filename: String,
        input_path: PathBuf,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Decompressed { filename, .. } | FileOutcome::NotFound { filename, .. } => {
                filename
            }
        }
    }

    pub fn is_decompressed(&self) -> bool {
        matches!(self, FileOutcome::Decompressed { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompressionReport {
    pub build_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl DecompressionReport {
    pub fn new(build_dir: PathBuf, outcomes: Vec<FileOutcome>, duration: Duration) -> Self {
        Self {
            build_dir,
            outcomes,
            duration,
            completed_at: Utc::now(),
        }
    }

    pub fn decompressed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_decompressed()).count()
    }

    pub fn not_found_count(&self) -> usize {
        self.outcomes.len() - self.decompressed_count()
    }

    pub fn compressed_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Decompressed {
                    compressed_bytes, ..
                } => *compressed_bytes,
                FileOutcome::NotFound { .. } => 0,
            })
            .sum()
    }

    pub fn decompressed_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Decompressed {
                    decompressed_bytes, ..
                } => *decompressed_bytes,
                FileOutcome::NotFound { .. } => 0,
            })
            .sum()
    }
}
