//! Scriptable in-memory backend for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::backend::{AutomationBackend, ElementHandle, Session, SessionConnector, StartActivity};
use crate::error::{E2eError, Result};
use crate::locator::Locator;

#[derive(Debug, Clone)]
struct FakeElement {
    id: String,
    appears_at: Duration,
    displayed: bool,
    enabled_at: Option<Duration>,
}

#[derive(Debug, Default)]
struct FakeState {
    elements: HashMap<String, Vec<FakeElement>>,
    failing_locators: Vec<String>,
    fail_all: bool,
    fail_delete: bool,
    package: String,
    activities: Vec<(Duration, String)>,
    events: Vec<String>,
    find_calls: HashMap<String, usize>,
    deletes: u32,
}

/// Elements appear on a timeline measured from construction, so tests
/// under a paused clock control when each locator starts resolving.
#[derive(Debug, Clone)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
    created: Instant,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            created: Instant::now(),
        }
    }
}

impl FakeBackend {
    fn elapsed(&self) -> Duration {
        self.created.elapsed()
    }

    fn push_element(&self, locator: &Locator, element: FakeElement) {
        self.state
            .lock()
            .unwrap()
            .elements
            .entry(locator.to_string())
            .or_default()
            .push(element);
    }

    /// Displayed and enabled from the start
    pub fn element(self, locator: impl Into<Locator>, id: &str) -> Self {
        self.element_after(locator, id, Duration::ZERO)
    }

    pub fn element_after(self, locator: impl Into<Locator>, id: &str, at: Duration) -> Self {
        self.push_element(
            &locator.into(),
            FakeElement {
                id: id.to_string(),
                appears_at: at,
                displayed: true,
                enabled_at: Some(Duration::ZERO),
            },
        );
        self
    }

    /// Present in the hierarchy but not displayed
    pub fn hidden_element(self, locator: impl Into<Locator>, id: &str) -> Self {
        self.push_element(
            &locator.into(),
            FakeElement {
                id: id.to_string(),
                appears_at: Duration::ZERO,
                displayed: false,
                enabled_at: Some(Duration::ZERO),
            },
        );
        self
    }

    /// Displayed from the start, enabled only after `at` (never if `None`)
    pub fn element_enabled_after(
        self,
        locator: impl Into<Locator>,
        id: &str,
        at: Option<Duration>,
    ) -> Self {
        self.push_element(
            &locator.into(),
            FakeElement {
                id: id.to_string(),
                appears_at: Duration::ZERO,
                displayed: true,
                enabled_at: at,
            },
        );
        self
    }

    pub fn failing_locator(self, locator: impl Into<Locator>) -> Self {
        let key = locator.into().to_string();
        self.state.lock().unwrap().failing_locators.push(key);
        self
    }

    /// Every command except session deletion fails
    pub fn fail_all(self) -> Self {
        self.state.lock().unwrap().fail_all = true;
        self
    }

    pub fn fail_delete(self) -> Self {
        self.state.lock().unwrap().fail_delete = true;
        self
    }

    pub fn package(self, package: &str) -> Self {
        self.state.lock().unwrap().package = package.to_string();
        self
    }

    pub fn activity_at(self, at: Duration, activity: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .activities
            .push((at, activity.to_string()));
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn find_calls(&self, locator: impl Into<Locator>) -> usize {
        let key = locator.into().to_string();
        self.state
            .lock()
            .unwrap()
            .find_calls
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    pub fn deletes(&self) -> u32 {
        self.state.lock().unwrap().deletes
    }

    pub fn into_session(self) -> Session {
        Session::new("fake-session", Box::new(self))
    }

    fn check(&self) -> Result<()> {
        if self.state.lock().unwrap().fail_all {
            return Err(injected());
        }
        Ok(())
    }

    fn record(&self, event: String) {
        self.state.lock().unwrap().events.push(event);
    }

    fn lookup(&self, element: &ElementHandle) -> Result<FakeElement> {
        let state = self.state.lock().unwrap();
        state
            .elements
            .values()
            .flatten()
            .find(|e| e.id == element.id())
            .cloned()
            .ok_or_else(|| E2eError::WebDriver {
                error: "stale element reference".to_string(),
                message: element.id().to_string(),
            })
    }
}

fn injected() -> E2eError {
    E2eError::WebDriver {
        error: "unknown error".to_string(),
        message: "injected failure".to_string(),
    }
}

#[async_trait]
impl AutomationBackend for FakeBackend {
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        self.check()?;
        let key = locator.to_string();
        let now = self.elapsed();
        let mut state = self.state.lock().unwrap();
        *state.find_calls.entry(key.clone()).or_default() += 1;

        if state.failing_locators.contains(&key) {
            return Err(injected());
        }

        Ok(state
            .elements
            .get(&key)
            .map(|list| {
                list.iter()
                    .filter(|e| e.appears_at <= now)
                    .map(|e| ElementHandle::new(e.id.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
        self.check()?;
        Ok(self.lookup(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool> {
        self.check()?;
        let now = self.elapsed();
        Ok(self
            .lookup(element)?
            .enabled_at
            .map(|at| at <= now)
            .unwrap_or(false))
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.check()?;
        self.record(format!("click:{}", element.id()));
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<()> {
        self.check()?;
        self.record(format!("clear:{}", element.id()));
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()> {
        self.check()?;
        self.record(format!("keys:{}:{}", element.id(), text));
        Ok(())
    }

    async fn back(&self) -> Result<()> {
        self.check()?;
        self.record("back".to_string());
        Ok(())
    }

    async fn current_package(&self) -> Result<String> {
        self.check()?;
        Ok(self.state.lock().unwrap().package.clone())
    }

    async fn current_activity(&self) -> Result<String> {
        self.check()?;
        let now = self.elapsed();
        let state = self.state.lock().unwrap();
        Ok(state
            .activities
            .iter()
            .filter(|(at, _)| *at <= now)
            .last()
            .map(|(_, activity)| activity.clone())
            .unwrap_or_default())
    }

    async fn start_activity(&self, request: &StartActivity) -> Result<()> {
        self.check()?;
        let now = self.elapsed();
        let mut state = self.state.lock().unwrap();
        state.events.push(format!(
            "start_activity:{}/{}",
            request.app_package, request.app_activity
        ));
        state.package = request.app_wait_package.clone();
        state
            .activities
            .push((now, request.app_wait_activity.clone()));
        Ok(())
    }

    async fn delete_session(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        state.events.push("delete".to_string());
        if state.fail_delete {
            return Err(injected());
        }
        Ok(())
    }
}

/// Hands out sessions over a shared [`FakeBackend`]
pub(crate) struct FakeConnector {
    backend: FakeBackend,
    connects: AtomicU32,
}

impl FakeConnector {
    pub fn new(backend: FakeBackend) -> Self {
        Self {
            backend,
            connects: AtomicU32::new(0),
        }
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionConnector for FakeConnector {
    async fn connect(&self, _device_id: &str) -> Result<Session> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.backend.clone().into_session())
    }
}
