//! Timing configuration for waits, retries and device commands

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

fn env_secs(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &f64| v.is_finite() && *v >= 0.0)
        .unwrap_or(default)
}

/// Polling configuration for element waits
#[derive(Debug, Clone)]
pub struct WaitTimingConfig {
    pub poll_interval: f64,
    pub popup_pause: f64,
}

impl Default for WaitTimingConfig {
    fn default() -> Self {
        Self {
            poll_interval: env_secs("OHOUSE_E2E_POLL_INTERVAL", 0.25),
            popup_pause: env_secs("OHOUSE_E2E_POPUP_PAUSE", 0.5),
        }
    }
}

impl WaitTimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval)
    }

    pub fn popup_pause(&self) -> Duration {
        Duration::from_secs_f64(self.popup_pause)
    }
}

/// Session acquisition timing
#[derive(Debug, Clone)]
pub struct SessionTimingConfig {
    pub retry_delay: f64,
    pub max_attempts: u32,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            retry_delay: env_secs("OHOUSE_E2E_SESSION_RETRY_DELAY", 2.0),
            max_attempts: 3,
        }
    }
}

impl SessionTimingConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay)
    }
}

/// ADB command timing
#[derive(Debug, Clone)]
pub struct AdbTimingConfig {
    pub command_timeout: f64,
}

impl Default for AdbTimingConfig {
    fn default() -> Self {
        Self {
            command_timeout: env_secs("OHOUSE_E2E_ADB_TIMEOUT", 30.0),
        }
    }
}

impl AdbTimingConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.command_timeout)
    }
}

/// Master timing configuration
#[derive(Debug, Clone, Default)]
pub struct TimingConfig {
    pub wait: WaitTimingConfig,
    pub session: SessionTimingConfig,
    pub adb: AdbTimingConfig,
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}
