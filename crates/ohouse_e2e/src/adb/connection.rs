//! ADB command execution against a single device

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::config::TIMING_CONFIG;
use crate::error::{E2eError, Result};

/// Runs `adb` commands addressed to a device and returns their stdout.
#[async_trait]
pub trait AdbExecutor: Send + Sync {
    async fn run(&self, device_id: &str, args: &[&str]) -> Result<String>;
}

/// Device listing entry from `adb devices`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub device_id: String,
    pub status: String,
}

/// `adb` invoked as a child process
#[derive(Debug, Clone)]
pub struct AdbCommand {
    adb_path: String,
    timeout: Duration,
}

impl AdbCommand {
    pub fn new() -> Self {
        Self::with_path("adb")
    }

    pub fn with_path(adb_path: impl Into<String>) -> Self {
        Self {
            adb_path: adb_path.into(),
            timeout: TIMING_CONFIG.adb.command_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn output(&self, args: &[&str]) -> Result<String> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.adb_path)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| E2eError::timeout(format!("adb {}", args.join(" ")), self.timeout))?
        .map_err(E2eError::Io)?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{}{}", stdout, stderr);
        Err(E2eError::CommandFailed(format!(
            "adb {}: {}",
            args.join(" "),
            combined.trim()
        )))
    }

    /// List attached devices
    pub async fn list_devices(&self) -> Result<Vec<DeviceEntry>> {
        let stdout = self.output(&["devices"]).await?;
        Ok(parse_devices(&stdout))
    }
}

impl Default for AdbCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdbExecutor for AdbCommand {
    async fn run(&self, device_id: &str, args: &[&str]) -> Result<String> {
        let full_args = adb_args(device_id, args);
        debug!("adb {}", full_args.join(" "));
        self.output(&full_args).await
    }
}

/// `-s <device>` prefix followed by `args`. An empty device id leaves the
/// choice to adb (single attached device).
fn adb_args<'a>(device_id: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    let mut full_args = Vec::with_capacity(args.len() + 2);
    if !device_id.is_empty() {
        full_args.push("-s");
        full_args.push(device_id);
    }
    full_args.extend_from_slice(args);
    full_args
}

fn parse_devices(stdout: &str) -> Vec<DeviceEntry> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let device_id = parts.next()?;
            let status = parts.next()?;
            Some(DeviceEntry {
                device_id: device_id.to_string(),
                status: status.to_string(),
            })
        })
        .collect()
}
