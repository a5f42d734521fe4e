use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnbrError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to decompress {}: {source}", .path.display())]
    Decompression {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid compressed file name: {name}")]
    InvalidFileName { name: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl UnbrError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            UnbrError::Cancelled => 130,
            UnbrError::Config { .. } | UnbrError::InvalidFileName { .. } => 2,
            UnbrError::Decompression { .. } => 3,
            UnbrError::Write { .. } => 4,
            UnbrError::Read { .. } => 5,
            UnbrError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for UnbrError {
    fn user_message(&self) -> String {
        match self {
            UnbrError::Decompression { path, .. } => {
                format!("Corrupt or truncated Brotli data in {}", path.display())
            }
            UnbrError::Write { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => {
                    format!("Output location does not exist: {}", path.display())
                }
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied writing: {}", path.display())
                }
                _ => format!("Could not write {}: {}", path.display(), source),
            },
            UnbrError::Read { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            UnbrError::InvalidFileName { name } => {
                format!("'{}' is too short to carry a compression suffix", name)
            }
            UnbrError::Config { message } => format!("Configuration error: {}", message),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            UnbrError::Decompression { .. } => Some(
                "Rebuild the project or re-download the artifact; files written before this one were kept.".to_string()
            ),
            UnbrError::Write { .. } => Some(
                "Make sure the build directory exists and is writable.".to_string()
            ),
            UnbrError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate it with --generate-config.".to_string()
            ),
            UnbrError::InvalidFileName { .. } => Some(
                "List compressed files by their full name, e.g. BasicChessWeb.wasm.br".to_string()
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UnbrError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_user_friendly_messages() {
        let error = UnbrError::Decompression {
            path: PathBuf::from("Build/BasicChessWeb.wasm.br"),
            source: io::Error::new(io::ErrorKind::InvalidData, "Invalid Data"),
        };
        assert!(error.user_message().contains("Corrupt or truncated"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_missing_output_directory_message() {
        let error = UnbrError::Write {
            path: PathBuf::from("missing/out.wasm"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.user_message().contains("does not exist"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(UnbrError::Cancelled.exit_code(), 130);
        assert_eq!(UnbrError::Config { message: "bad".into() }.exit_code(), 2);
        let corrupt = UnbrError::Decompression {
            path: PathBuf::from("a.br"),
            source: io::Error::new(io::ErrorKind::InvalidData, "x"),
        };
        assert_eq!(corrupt.exit_code(), 3);
    }
}
