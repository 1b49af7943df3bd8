//! Automation session module
//!
//! This module provides:
//! - `backend`: the command surface screens are written against, and `Session`
//! - `appium`: the Appium (UiAutomator2) HTTP implementation
//! - `capabilities`: session capabilities for the app under test
//! - `retry`: session acquisition with retry on transient adb failures

mod appium;
mod backend;
mod capabilities;
mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use appium::AppiumConnector;
pub use backend::{AutomationBackend, ElementHandle, Session, SessionConnector, StartActivity};
pub use capabilities::{AndroidCapabilities, NEW_COMMAND_TIMEOUT_SECS};
pub use retry::{
    create_session, create_session_with_delay, is_transient_session_error, TRANSIENT_SIGNATURES,
};
