//! ADB (Android Debug Bridge) module for device management
//!
//! This module provides:
//! - `connection`: `adb` command execution
//! - `device`: the device control facade (install check, reset, version info)

mod connection;
mod device;

pub use connection::{AdbCommand, AdbExecutor, DeviceEntry};
pub use device::{AdbDevice, VersionInfo};

#[cfg(test)]
pub(crate) use device::tests::FakeAdb;
