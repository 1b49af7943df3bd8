//! Home screen reached after a successful login

use std::time::Duration;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::locator::{Locator, UiSelector};
use crate::wait::Ui;

const BOTTOM_NAV_TIMEOUT: Duration = Duration::from_secs(12);
const COMPOSE_VIEW_TIMEOUT: Duration = Duration::from_secs(8);

const COMPOSE_VIEW_CLASS: &str = "androidx.compose.ui.platform.ComposeView";

/// Which landmark confirmed the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeLandmark {
    BottomNavigation,
    ComposeView,
}

pub struct HomeScreen<'a> {
    ui: Ui<'a>,
    app: &'a AppConfig,
}

impl<'a> HomeScreen<'a> {
    pub fn new(ui: Ui<'a>, app: &'a AppConfig) -> Self {
        Self { ui, app }
    }

    /// Confirm the home screen by its bottom navigation bar, falling back to
    /// a Compose root view. Fails only if neither shows up.
    pub async fn ensure_reached(&self) -> Result<HomeLandmark> {
        let bottom_nav = Locator::id(self.app.resource_id("bottomNavigation"));
        match self.ui.wait_visible(&bottom_nav, BOTTOM_NAV_TIMEOUT).await {
            Ok(_) => {
                info!("Home reached (bottom navigation visible)");
                return Ok(HomeLandmark::BottomNavigation);
            }
            Err(e) => debug!("bottom navigation not found, checking ComposeView: {}", e),
        }

        let compose_view: Locator = UiSelector::new().class_name(COMPOSE_VIEW_CLASS).into();
        self.ui
            .wait_visible(&compose_view, COMPOSE_VIEW_TIMEOUT)
            .await?;

        info!("Home reached (ComposeView visible)");
        Ok(HomeLandmark::ComposeView)
    }
}
