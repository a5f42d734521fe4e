//! Shared fixtures for the CLI tests.

use assert_cmd::Command;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DATA: &str = "BasicChessWeb.data.br";
pub const FRAMEWORK: &str = "BasicChessWeb.framework.js.br";
pub const WASM: &str = "BasicChessWeb.wasm.br";

pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 9, 22);
        writer.write_all(data).unwrap();
    }
    compressed
}

/// Temporary working directory with a `Build/` folder inside.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        fs::create_dir(root.path().join("Build")).expect("Failed to create Build directory");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.path().join("Build")
    }

    pub fn write_compressed(&self, name: &str, content: &[u8]) {
        fs::write(self.build_dir().join(name), compress(content)).unwrap();
    }

    pub fn write_truncated(&self, name: &str) {
        let payload: Vec<u8> = (0..40_000u32).flat_map(|i| i.to_le_bytes()).collect();
        let compressed = compress(&payload);
        fs::write(
            self.build_dir().join(name),
            &compressed[..compressed.len() / 2],
        )
        .unwrap();
    }

    pub fn read_output(&self, name: &str) -> Vec<u8> {
        fs::read(self.build_dir().join(name)).unwrap()
    }

    /// Command running the binary inside the temp root with a clean environment.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("unbr").expect("Failed to locate unbr binary");
        cmd.current_dir(self.root())
            .env_remove("UNBR_BUILD_DIR")
            .env_remove("CLICOLOR_FORCE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
