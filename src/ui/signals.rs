use crate::error::{Result, UnbrError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Ctrl+C flag polled before each file.
///
/// The first interrupt lets the file in progress finish its
/// read-decompress-write sequence; a second one exits immediately.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    current_file: Arc<Mutex<Option<String>>>,
}

impl GracefulShutdown {
    /// Installs the process-wide Ctrl+C handler. Can only succeed once per process.
    pub fn new() -> Result<Self> {
        let shutdown = Self::without_handler();

        let running = shutdown.running.clone();
        let current_file = shutdown.current_file.clone();

        ctrlc::set_handler(move || {
            if running.swap(false, Ordering::SeqCst) {
                let in_progress = current_file.lock().ok().and_then(|name| name.clone());
                match in_progress {
                    Some(name) => eprintln!(
                        "\n🛑 Finishing {} before stopping... (press Ctrl+C again to force exit)",
                        name
                    ),
                    None => eprintln!("\n🛑 Stopping... (press Ctrl+C again to force exit)"),
                }
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| UnbrError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(shutdown)
    }

    /// Instance without a signal handler, for tests and embedding.
    pub fn without_handler() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            current_file: Arc::new(Mutex::new(None)),
        }
    }

    /// Fails with [`UnbrError::Cancelled`] once an interrupt arrived, otherwise
    /// records `next_file` as the file about to be processed.
    pub fn check_shutdown(&self, next_file: &str) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            log::debug!("cancelled before {}", next_file);
            return Err(UnbrError::Cancelled);
        }

        if let Ok(mut current) = self.current_file.lock() {
            *current = Some(next_file.to_string());
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn current_file(&self) -> Option<String> {
        self.current_file.lock().ok().and_then(|name| name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_records_current_file() {
        let shutdown = GracefulShutdown::without_handler();
        assert_eq!(shutdown.current_file(), None);

        shutdown.check_shutdown("Game.data.br").unwrap();
        assert_eq!(shutdown.current_file().as_deref(), Some("Game.data.br"));

        shutdown.check_shutdown("Game.wasm.br").unwrap();
        assert_eq!(shutdown.current_file().as_deref(), Some("Game.wasm.br"));
    }

    #[test]
    fn test_interrupt_cancels_next_file() {
        let shutdown = GracefulShutdown::without_handler();
        shutdown.check_shutdown("Game.data.br").unwrap();

        shutdown.request_shutdown();
        assert!(matches!(
            shutdown.check_shutdown("Game.wasm.br"),
            Err(UnbrError::Cancelled)
        ));
        assert_eq!(shutdown.current_file().as_deref(), Some("Game.data.br"));
    }
}
