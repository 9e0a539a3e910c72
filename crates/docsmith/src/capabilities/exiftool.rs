//! Metadata extraction via the `exiftool` command-line tool.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use crate::Result;
use crate::capabilities::MetadataReader;
use crate::error::DocsmithError;

/// Default timeout for exiftool invocations (30 seconds)
const EXIFTOOL_TIMEOUT_SECONDS: u64 = 30;

/// [`MetadataReader`] that shells out to `exiftool -json`.
///
/// Fully best-effort: a missing binary, non-zero exit, timeout, or
/// unparseable output all yield `None` (logged at debug level). The binary
/// is resolved through `PATH` unless an explicit command is given.
pub struct ExifToolReader {
    command: String,
    timeout: Duration,
}

impl ExifToolReader {
    pub fn new() -> Self {
        Self {
            command: "exiftool".to_string(),
            timeout: Duration::from_secs(EXIFTOOL_TIMEOUT_SECONDS),
        }
    }

    /// Use a specific executable instead of resolving `exiftool` from `PATH`.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::new()
        }
    }

    async fn run(&self, path: &Path) -> Result<serde_json::Map<String, Value>> {
        let child = Command::new(&self.command)
            .arg("-json")
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| std::io::Error::other(format!("Failed to execute exiftool: {}", e)))?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(std::io::Error::other(format!("Failed to wait for exiftool: {}", e)).into());
            }
            Err(_) => {
                return Err(DocsmithError::parsing(format!(
                    "exiftool timed out after {} seconds",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocsmithError::parsing(format!("exiftool failed: {}", stderr)));
        }

        // exiftool -json emits one array entry per input file.
        let parsed: Value = serde_json::from_slice(&output.stdout)?;
        parsed
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| DocsmithError::parsing("exiftool output was not a JSON object array"))
    }
}

impl Default for ExifToolReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataReader for ExifToolReader {
    async fn read(&self, path: &Path) -> Option<serde_json::Map<String, Value>> {
        match self.run(path).await {
            Ok(fields) => Some(fields),
            Err(e) => {
                tracing::debug!("exiftool metadata unavailable for {:?}: {}", path, e);
                None
            }
        }
    }
}
