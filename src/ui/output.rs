use crate::decompressor::{DecompressionReport, FileOutcome, PlannedFile};
use crate::error::{UnbrError, UserFriendlyError};
use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PACKAGE: Emoji = Emoji("📦 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => console::colors_enabled() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    // Per-file notices

    pub fn decompressing(&self, filename: &str) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}Decompressing {}...", PACKAGE, style(filename).bold());
                } else {
                    println!("Decompressing {}...", filename);
                }
            }
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "file",
                "status": "decompressing",
                "filename": filename,
            })),
            OutputMode::Plain => println!("DECOMPRESSING: {}", filename),
        }
    }

    pub fn file_outcome(&self, outcome: &FileOutcome) {
        if !self.should_show_message(0) {
            return;
        }

        match (self.mode, outcome) {
            (OutputMode::Json, _) => {
                let mut value = serde_json::to_value(outcome).unwrap_or_default();
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), serde_json::json!("file"));
                }
                self.print_json_object(&value);
            }
            (
                OutputMode::Human,
                FileOutcome::Decompressed {
                    filename,
                    output_path,
                    ..
                },
            ) => {
                if self.use_colors {
                    println!(
                        "{}{} → {}",
                        CHECKMARK,
                        style(filename).green().bold(),
                        output_path.display()
                    );
                } else {
                    println!("✓ {} → {}", filename, output_path.display());
                }
            }
            (OutputMode::Human, FileOutcome::NotFound { filename, .. }) => {
                if self.use_colors {
                    println!("{}{} not found", CROSS, style(filename).yellow());
                } else {
                    println!("✗ {} not found", filename);
                }
            }
            (
                OutputMode::Plain,
                FileOutcome::Decompressed {
                    filename,
                    output_path,
                    ..
                },
            ) => println!("SUCCESS: {} -> {}", filename, output_path.display()),
            (OutputMode::Plain, FileOutcome::NotFound { filename, .. }) => {
                println!("NOT FOUND: {}", filename)
            }
        }
    }

    pub fn print_completion(&self) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", SPARKLES, style("Decompression complete!").green().bold());
                } else {
                    println!("Decompression complete!");
                }
            }
            OutputMode::Json => self.print_json_message("complete", "Decompression complete!"),
            OutputMode::Plain => println!("COMPLETED: Decompression complete!"),
        }
    }

    pub fn print_user_friendly_error(&self, error: &UnbrError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Summary after a completed run. Suppressed by `--quiet` in every mode.
    pub fn print_report(&self, report: &DecompressionReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Json => {
                let mut value = serde_json::to_value(report).unwrap_or_default();
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), serde_json::json!("report"));
                }
                self.print_json_object(&value);
            }
            _ if !self.should_show_message(1) => {}
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_plan(&self, build_dir: &Path, plan: &[PlannedFile]) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "plan",
                "build_dir": build_dir,
                "files": plan.iter().map(|p| serde_json::json!({
                    "filename": p.filename,
                    "input_path": p.input_path,
                    "output_path": p.output_path,
                    "present": p.present,
                })).collect::<Vec<_>>(),
            })),
            _ => {
                println!("  Build directory: {}", build_dir.display());
                for planned in plan {
                    println!(
                        "  {} → {} ({})",
                        planned.input_path.display(),
                        planned.output_path.display(),
                        if planned.present { "present" } else { "missing" }
                    );
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &DecompressionReport) {
        self.print_separator();
        println!("  Build directory:  {}", report.build_dir.display());
        println!("  Decompressed:     {}", report.decompressed_count());
        println!("  Not found:        {}", report.not_found_count());
        println!(
            "  Bytes in / out:   {} / {}",
            format_bytes(report.compressed_bytes()),
            format_bytes(report.decompressed_bytes())
        );
        println!("  Time taken:       {}", format_duration(report.duration));
        self.print_separator();
    }

    fn print_plain_report(&self, report: &DecompressionReport) {
        println!("REPORT: {}", report.build_dir.display());
        println!("Decompressed: {}", report.decompressed_count());
        println!("Not found: {}", report.not_found_count());
        println!(
            "Bytes: {} -> {}",
            report.compressed_bytes(),
            report.decompressed_bytes()
        );
        println!("Duration: {:?}", report.duration);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

// Keeps notices from tearing the progress bar
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn decompressing(&self, filename: &str) {
        self.suspend_and_print(|f| f.decompressing(filename));
    }

    pub fn file_outcome(&self, outcome: &FileOutcome) {
        self.suspend_and_print(|f| f.file_outcome(outcome));
    }

    pub fn debug(&self, message: &str) {
        self.suspend_and_print(|f| f.debug(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert_eq!(formatter.mode, OutputMode::Plain);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }
}
