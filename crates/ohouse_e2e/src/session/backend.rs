//! Automation backend abstraction and session lifetime

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::Result;
use crate::locator::Locator;

/// Element reference returned by a find request. Only meaningful inside the
/// session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Explicit activity launch, waiting for a (possibly different) activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartActivity {
    pub app_package: String,
    pub app_activity: String,
    pub app_wait_package: String,
    pub app_wait_activity: String,
}

/// Commands issued against one live automation session
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>>;

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool>;

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool>;

    async fn click(&self, element: &ElementHandle) -> Result<()>;

    async fn clear(&self, element: &ElementHandle) -> Result<()>;

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()>;

    /// Android back navigation
    async fn back(&self) -> Result<()>;

    async fn current_package(&self) -> Result<String>;

    async fn current_activity(&self) -> Result<String>;

    async fn start_activity(&self, request: &StartActivity) -> Result<()>;

    async fn delete_session(&self) -> Result<()>;
}

/// Opens sessions for a device
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, device_id: &str) -> Result<Session>;
}

/// One live connection to the automation backend.
///
/// Released by consuming it with [`Session::release`], so it cannot be
/// released twice.
pub struct Session {
    id: String,
    backend: Box<dyn AutomationBackend>,
}

impl Session {
    pub fn new(id: impl Into<String>, backend: Box<dyn AutomationBackend>) -> Self {
        Self {
            id: id.into(),
            backend,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn backend(&self) -> &dyn AutomationBackend {
        self.backend.as_ref()
    }

    pub async fn release(self) -> Result<()> {
        match self.backend.delete_session().await {
            Ok(()) => {
                info!("Session {} released", self.id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to release session {}: {}", self.id, e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
