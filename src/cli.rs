use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unbr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decompress Brotli-compressed WebGL build artifacts")]
#[command(
    long_about = "unbr looks for the listed .br files inside the build directory and writes \
                  each decompressed artifact next to it with the .br suffix removed. \
                  Missing files are reported and skipped."
)]
#[command(after_help = "EXAMPLES:\n  \
    unbr\n  \
    unbr --build-dir WebBuild/Build\n  \
    unbr Game.data.br Game.wasm.br --output-format plain\n  \
    unbr --generate-config --config unbr.toml")]
pub struct Cli {
    /// Compressed file names inside the build directory (defaults to the configured list)
    pub files: Vec<String>,

    /// Build directory holding the compressed artifacts
    #[arg(short, long, env = "UNBR_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for notices
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Copy the compressed file's modification time onto the output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub preserve_mtime: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show what would be decompressed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        config.merge_with_cli_args(&self.create_cli_overrides());
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let files = if self.files.is_empty() {
            None
        } else {
            Some(self.files.clone())
        };

        CliOverrides::new()
            .with_build_dir(self.build_dir.clone())
            .with_files(files)
            .with_preserve_mtime(self.preserve_mtime.then_some(true))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["unbr"]).unwrap();
        assert!(cli.files.is_empty());
        assert!(cli.build_dir.is_none());
        assert!(matches!(cli.output_format, OutputFormat::Human));
        assert!(cli.create_cli_overrides().files.is_none());
    }

    #[test]
    fn test_parse_files_and_build_dir() {
        let cli = Cli::try_parse_from([
            "unbr",
            "--build-dir",
            "web/Build",
            "Game.data.br",
            "Game.wasm.br",
            "--output-format",
            "plain",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.build_dir, Some(PathBuf::from("web/Build")));
        assert_eq!(
            overrides.files,
            Some(vec!["Game.data.br".to_string(), "Game.wasm.br".to_string()])
        );
        assert_eq!(OutputMode::from(cli.output_format), OutputMode::Plain);
    }

    #[test]
    fn test_preserve_mtime_is_a_bare_flag() {
        let cli = Cli::try_parse_from(["unbr", "--preserve-mtime"]).unwrap();
        assert_eq!(cli.create_cli_overrides().preserve_mtime, Some(true));

        let cli = Cli::try_parse_from(["unbr"]).unwrap();
        assert_eq!(cli.create_cli_overrides().preserve_mtime, None);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["unbr", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["unbr", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["unbr", "--quiet"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }
}
