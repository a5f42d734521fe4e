use crate::decompressor::strip_compression_suffix;
use crate::error::{Result, UnbrError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BUILD_DIR: &str = "Build";

pub const DEFAULT_FILES: [&str; 3] = [
    "BasicChessWeb.data.br",
    "BasicChessWeb.framework.js.br",
    "BasicChessWeb.wasm.br",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    pub directory: PathBuf,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub preserve_mtime: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_BUILD_DIR),
            files: DEFAULT_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UnbrError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| UnbrError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| UnbrError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["unbr.toml", ".unbr.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.build_dir {
            self.build.directory = directory.clone();
        }

        if let Some(ref files) = cli_args.files {
            if !files.is_empty() {
                self.build.files = files.clone();
            }
        }

        if let Some(preserve) = cli_args.preserve_mtime {
            self.output.preserve_mtime = preserve;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| UnbrError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| UnbrError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.build.files.is_empty() {
            return Err(UnbrError::Config {
                message: "At least one compressed file must be listed".to_string(),
            });
        }

        if self.build.directory.as_os_str().is_empty() {
            return Err(UnbrError::Config {
                message: "Build directory must not be empty".to_string(),
            });
        }

        for name in &self.build.files {
            if name.contains('/') || name.contains('\\') {
                return Err(UnbrError::Config {
                    message: format!(
                        "File names are relative to the build directory and must not contain path separators: {}",
                        name
                    ),
                });
            }

            if strip_compression_suffix(name).is_none() {
                return Err(UnbrError::InvalidFileName { name: name.clone() });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub build_dir: Option<PathBuf>,
    pub files: Option<Vec<String>>,
    pub preserve_mtime: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_build_dir(mut self, build_dir: Option<PathBuf>) -> Self {
        self.build_dir = build_dir;
        self
    }

    pub fn with_files(mut self, files: Option<Vec<String>>) -> Self {
        self.files = files;
        self
    }

    pub fn with_preserve_mtime(mut self, preserve: Option<bool>) -> Self {
        self.preserve_mtime = preserve;
        self
    }
}
