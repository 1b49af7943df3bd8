//! ohouse_e2e: end-to-end login tests for the Ohouse Android app
//!
//! This library drives the app (`net.bucketplace`) through its login flow:
//! - ADB utilities for install checks, state reset and version logging
//! - An Appium (UiAutomator2) session client with retry on transient failures
//! - Locators and polling wait primitives
//! - Screen objects for the intro, email login and home screens
//! - The `login_pass` and `login_fail` scenarios
//!
//! # Example
//!
//! ```no_run
//! use ohouse_e2e::{
//!     AdbCommand, AdbDevice, AppConfig, AppiumConnector, Credentials, RunConfig, Scenario,
//! };
//!
//! #[tokio::main]
//! async fn main() -> ohouse_e2e::Result<()> {
//!     let config = RunConfig::default()
//!         .with_device_id("emulator-5554")
//!         .with_pass_credentials(Credentials::new("qa@example.com", "secret"));
//!     let device = AdbDevice::new(
//!         AdbCommand::with_path(&config.adb_path),
//!         &config.device_id,
//!         AppConfig::default(),
//!     );
//!     let connector = AppiumConnector::new(config.appium_url(), AppConfig::default())?;
//!
//!     let outcome = Scenario::new(&device, &connector, &config).login_pass().await?;
//!     println!("Outcome: {:?}", outcome);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Device and automation backends
pub mod adb;
pub mod session;

// UI layer
pub mod locator;
pub mod screens;
pub mod wait;

pub mod scenario;

// Re-export commonly used types and functions
pub use error::{E2eError, Result};

// Config re-exports
pub use config::{
    parse_reset_flag, AppConfig, Credentials, RunConfig, TimingConfig, OHOUSE_INTRO_ACTIVITY,
    OHOUSE_LAUNCH_ACTIVITY, OHOUSE_PACKAGE, TIMING_CONFIG,
};

// ADB re-exports
pub use adb::{AdbCommand, AdbDevice, AdbExecutor, DeviceEntry, VersionInfo};

// Session re-exports
pub use session::{
    create_session, is_transient_session_error, AppiumConnector, AutomationBackend,
    ElementHandle, Session, SessionConnector,
};

pub use locator::{Locator, UiSelector};
pub use wait::Ui;

// Scenario re-exports
pub use scenario::{Completion, Scenario, ScenarioOutcome, SkipReason};
