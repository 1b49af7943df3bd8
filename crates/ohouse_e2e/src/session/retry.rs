//! Session acquisition with bounded retry on transient ADB failures

use std::time::Duration;
use tracing::{info, warn};

use super::backend::{Session, SessionConnector};
use crate::config::TIMING_CONFIG;
use crate::error::{E2eError, Result};

/// Error text fragments that mark a session failure as transient: socket
/// buffer exhaustion and an unavailable adb daemon.
pub const TRANSIENT_SIGNATURES: &[&str] = &[
    "ENOBUFS",
    "daemon not running",
    "cannot connect to daemon",
];

/// Retry eligibility is decided on the rendered error message, not on a
/// structured code. Appium and adb report these conditions only as text.
pub fn is_transient_session_error(err: &E2eError) -> bool {
    let message = err.to_string();
    TRANSIENT_SIGNATURES
        .iter()
        .any(|signature| message.contains(signature))
}

/// Open a session, retrying transient failures after the configured delay.
pub async fn create_session<C>(connector: &C, device_id: &str, max_attempts: u32) -> Result<Session>
where
    C: SessionConnector + ?Sized,
{
    create_session_with_delay(
        connector,
        device_id,
        max_attempts,
        TIMING_CONFIG.session.retry_delay(),
    )
    .await
}

/// [`create_session`] with an explicit back-off between attempts
pub async fn create_session_with_delay<C>(
    connector: &C,
    device_id: &str,
    max_attempts: u32,
    delay: Duration,
) -> Result<Session>
where
    C: SessionConnector + ?Sized,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if attempt > 1 {
            info!("Retrying session creation {}/{}", attempt, max_attempts);
        }

        let err = match connector.connect(device_id).await {
            Ok(session) => return Ok(session),
            Err(e) => e,
        };

        if !is_transient_session_error(&err) || attempt >= max_attempts {
            return Err(err);
        }

        warn!(
            "Transient error while creating session (ENOBUFS or adb daemon issue), retrying in {:?}: {}",
            delay, err
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
