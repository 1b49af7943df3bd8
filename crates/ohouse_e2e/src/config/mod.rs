//! Configuration module for ohouse_e2e
//!
//! This module contains:
//! - `app`: package and activity names of the app under test
//! - `run`: per-run settings (device, credentials, endpoints)
//! - `timing`: timing configurations for waits, retries and adb commands

mod app;
mod run;
mod timing;

pub use app::{AppConfig, OHOUSE_INTRO_ACTIVITY, OHOUSE_LAUNCH_ACTIVITY, OHOUSE_PACKAGE};
pub use run::{
    parse_reset_flag, Credentials, RunConfig, DEFAULT_APPIUM_HOST, DEFAULT_APPIUM_PORT,
};
pub use timing::{
    AdbTimingConfig, SessionTimingConfig, TimingConfig, WaitTimingConfig, TIMING_CONFIG,
};
