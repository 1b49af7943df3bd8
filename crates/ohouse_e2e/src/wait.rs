//! Element wait and polling primitives shared by all screens

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::TIMING_CONFIG;
use crate::error::{E2eError, Result};
use crate::locator::Locator;
use crate::session::{AutomationBackend, ElementHandle};

/// Wait/poll capability over one backend. Screens hold one of these instead
/// of talking to the backend directly for anything time-dependent.
#[derive(Clone, Copy)]
pub struct Ui<'a> {
    backend: &'a dyn AutomationBackend,
    poll_interval: Duration,
}

impl<'a> Ui<'a> {
    pub fn new(backend: &'a dyn AutomationBackend) -> Self {
        Self {
            backend,
            poll_interval: TIMING_CONFIG.wait.poll_interval(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn backend(&self) -> &'a dyn AutomationBackend {
        self.backend
    }

    /// First element matching `locator`, if it is currently displayed
    async fn displayed_element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
        let Some(element) = self.backend.find_elements(locator).await?.into_iter().next() else {
            return Ok(None);
        };
        if self.backend.is_displayed(&element).await? {
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }

    /// Poll until the first element matching `locator` is displayed
    pub async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
        let start = Instant::now();

        loop {
            match self.displayed_element(locator).await {
                Ok(Some(element)) => return Ok(element),
                Ok(None) => {}
                Err(e) => debug!("{} not ready: {}", locator, e),
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(E2eError::timeout(
                    format!("element {} still not displayed", locator),
                    elapsed,
                ));
            }
            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// Re-evaluate `predicate` every `interval` until it yields `true`.
    /// A predicate error counts as `false`.
    pub async fn wait_until_true<F, Fut>(
        &self,
        mut predicate: F,
        timeout: Duration,
        interval: Duration,
        message: &str,
    ) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();

        loop {
            match predicate().await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!("condition check failed: {}", e),
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(E2eError::timeout(message, elapsed));
            }
            tokio::time::sleep(interval.min(timeout - elapsed)).await;
        }
    }

    /// Number of elements currently matching `locator`; 0 on any backend error
    pub async fn count_matches(&self, locator: &Locator) -> usize {
        match self.backend.find_elements(locator).await {
            Ok(elements) => elements.len(),
            Err(e) => {
                debug!("count of {} failed, reporting 0: {}", locator, e);
                0
            }
        }
    }

    /// Try each `(locator, timeout)` stage in order and return the first
    /// element that becomes visible. Only the last stage's failure surfaces.
    pub async fn first_visible(&self, chain: &[(Locator, Duration)]) -> Result<ElementHandle> {
        let Some(((last, last_timeout), fallbacks)) = chain.split_last() else {
            return Err(E2eError::InvalidConfig("empty locator chain".to_string()));
        };

        for (locator, timeout) in fallbacks {
            match self.wait_visible(locator, *timeout).await {
                Ok(element) => return Ok(element),
                Err(e) => debug!("falling back from {}: {}", locator, e),
            }
        }

        self.wait_visible(last, *last_timeout).await
    }

    pub async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
