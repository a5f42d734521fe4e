use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use unbr::{Cli, OutputFormatter, OutputMode, Unbr, UnbrError};

fn main() {
    setup_logging();
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let unbr = match Unbr::from_cli(&cli) {
        Ok(unbr) => unbr,
        Err(e) => {
            print_startup_error(&cli, &e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&unbr);
    }

    match unbr.decompress_all() {
        Ok(report) => {
            log::info!(
                "decompressed {} of {} files",
                report.decompressed_count(),
                report.outcomes.len()
            );
            0
        }
        Err(e) => {
            unbr.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("unbr.toml"));

    match write_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!("  unbr --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {:#}", e);
            1
        }
    }
}

fn write_sample_config(path: &Path) -> anyhow::Result<()> {
    Unbr::generate_sample_config(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn handle_dry_run(unbr: &Unbr) -> i32 {
    let formatter = unbr.output_formatter();

    formatter.warning("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let plan = match unbr.plan() {
        Ok(plan) => plan,
        Err(e) => {
            unbr.handle_error(&e);
            return e.exit_code();
        }
    };

    formatter.print_plan(&unbr.config().build.directory, &plan);
    formatter.print_separator();

    let present = plan.iter().filter(|p| p.present).count();
    formatter.success(&format!(
        "{} of {} files would be decompressed",
        present,
        plan.len()
    ));

    0
}

fn print_startup_error(cli: &Cli, error: &UnbrError) {
    let formatter = OutputFormatter::new(OutputMode::from(cli.output_format), 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging() {
    let env = env_logger::Env::default().default_filter_or("unbr=warn");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use unbr::{Config, GracefulShutdown};

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "unbr",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[build]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nope").join("test.toml");

        let cli = Cli::parse_from([
            "unbr",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        assert_eq!(handle_generate_config(&cli), 1);
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.build.directory = temp_dir.path().to_path_buf();

        let unbr = Unbr::with_shutdown(
            config,
            OutputMode::Plain,
            0,
            true,
            GracefulShutdown::without_handler(),
        );

        assert_eq!(handle_dry_run(&unbr), 0);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
