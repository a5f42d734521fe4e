pub mod cli;
pub mod config;
pub mod decompressor;
pub mod error;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{BuildConfig, CliOverrides, Config, OutputConfig};
pub use error::{Result, UnbrError, UserFriendlyError};

pub use decompressor::{
    decompress_brotli, output_path_for, strip_compression_suffix, DecompressionEvent,
    DecompressionReport, FileDecompressor, FileOutcome, PlannedFile,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;

/// Main library interface: runs the configured file list through the decompressor.
pub struct Unbr {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl Unbr {
    /// Create an instance that listens for Ctrl+C.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an instance with a caller-supplied shutdown handle.
    pub fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(
            config,
            cli_args.output_format.into(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    fn file_decompressor(&self) -> FileDecompressor {
        FileDecompressor::new(&self.config.build.directory)
            .with_preserve_mtime(self.config.output.preserve_mtime)
    }

    /// Decompress every configured file, printing a notice per file and a
    /// completion notice at the end.
    pub fn decompress_all(&self) -> Result<DecompressionReport> {
        let files = &self.config.build.files;
        let decompressor = self.file_decompressor();
        self.output_formatter.debug(&format!(
            "Build directory: {}",
            decompressor.build_dir().display()
        ));

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        let result = decompressor.decompress_files(files, |event| {
            match event {
                DecompressionEvent::Checking {
                    index, filename, ..
                } => {
                    self.shutdown.check_shutdown(filename)?;
                    ui::progress::update_file_progress(&file_progress, index, filename);
                }
                DecompressionEvent::Decompressing { filename, input_path } => {
                    output.debug(&format!("Reading {}", input_path.display()));
                    output.decompressing(filename);
                }
                DecompressionEvent::Finished(outcome) => {
                    output.file_outcome(outcome);
                    file_progress.inc(1);
                }
            }
            Ok(())
        });

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                file_progress.abandon();
                self.progress_manager.clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Decompressed {} files", report.decompressed_count()),
            report.duration,
        );
        self.progress_manager.clear();

        self.output_formatter.print_completion();
        self.output_formatter.print_report(&report);

        Ok(report)
    }

    /// Resolve the paths that a run would touch without writing anything.
    pub fn plan(&self) -> Result<Vec<PlannedFile>> {
        self.file_decompressor().plan(&self.config.build.files)
    }

    /// Write the default configuration as TOML to `output_path`.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &UnbrError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompressor::compress_brotli;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_unbr(build_dir: &Path, files: &[&str]) -> Unbr {
        let mut config = Config::default();
        config.build.directory = build_dir.to_path_buf();
        if !files.is_empty() {
            config.build.files = files.iter().map(|f| f.to_string()).collect();
        }
        Unbr::with_shutdown(
            config,
            OutputMode::Plain,
            0,
            true,
            GracefulShutdown::without_handler(),
        )
    }

    #[test]
    fn test_only_data_file_present() {
        let temp_dir = TempDir::new().unwrap();
        let content = b"UnityWebData1.0\0".repeat(64);
        fs::write(
            temp_dir.path().join("BasicChessWeb.data.br"),
            compress_brotli(&content),
        )
        .unwrap();

        let report = quiet_unbr(temp_dir.path(), &[]).decompress_all().unwrap();

        assert_eq!(report.decompressed_count(), 1);
        assert_eq!(report.not_found_count(), 2);
        assert_eq!(
            fs::read(temp_dir.path().join("BasicChessWeb.data")).unwrap(),
            content
        );

        let mut entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["BasicChessWeb.data", "BasicChessWeb.data.br"]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.br"), compress_brotli(b"a")).unwrap();

        let unbr = quiet_unbr(temp_dir.path(), &["a.br"]);
        unbr.shutdown.request_shutdown();

        assert!(matches!(unbr.decompress_all(), Err(UnbrError::Cancelled)));
        assert!(!temp_dir.path().join("a").exists());
    }

    #[test]
    fn test_plan_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("BasicChessWeb.wasm.br"),
            compress_brotli(b"\0asm"),
        )
        .unwrap();

        let plan = quiet_unbr(temp_dir.path(), &[]).plan().unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.iter().filter(|p| p.present).count(), 1);
        assert!(!temp_dir.path().join("BasicChessWeb.wasm").exists());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("unbr.toml");

        Unbr::generate_sample_config(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.build.files.len(), 3);
    }
}
