//! Dismissal of popups that appear irregularly right after login
//!
//! Both handlers are best-effort: they report whether they dismissed
//! something and never fail.

use tracing::{debug, info};

use crate::config::{AppConfig, TIMING_CONFIG};
use crate::error::Result;
use crate::locator::{Locator, UiSelector};
use crate::wait::Ui;

/// Android autofill "save password?" dialog, "Not now" button. Matched by
/// resource id since the label depends on the system language.
pub const AUTOFILL_SAVE_NO_ID: &str = "android:id/autofill_save_no";

/// In-app bottom sheets have no stable id. Two or more app buttons on
/// screen is taken to mean one is open. This is a guess with no confirmed
/// ground truth; it can fire on ordinary screens with several buttons.
pub const BOTTOM_SHEET_MIN_BUTTONS: usize = 2;

pub struct PopupHandler<'a> {
    ui: Ui<'a>,
    app: &'a AppConfig,
}

impl<'a> PopupHandler<'a> {
    pub fn new(ui: Ui<'a>, app: &'a AppConfig) -> Self {
        Self { ui, app }
    }

    /// Tap "Not now" on the system password-save prompt if it is showing
    pub async fn dismiss_system_save_prompt_if_present(&self) -> bool {
        match self.try_dismiss_save_prompt().await {
            Ok(dismissed) => dismissed,
            Err(e) => {
                debug!("save prompt check failed (ignored): {}", e);
                false
            }
        }
    }

    async fn try_dismiss_save_prompt(&self) -> Result<bool> {
        let backend = self.ui.backend();
        let Some(button) = backend
            .find_elements(&Locator::id(AUTOFILL_SAVE_NO_ID))
            .await?
            .into_iter()
            .next()
        else {
            return Ok(false);
        };

        if !backend.is_displayed(&button).await? {
            return Ok(false);
        }

        info!("Password manager save prompt detected, tapping 'Not now'");
        backend.click(&button).await?;
        self.ui.pause(TIMING_CONFIG.wait.popup_pause()).await;
        Ok(true)
    }

    /// Send back navigation when the bottom-sheet heuristic fires
    pub async fn dismiss_in_app_sheet_if_present(&self) -> bool {
        let buttons: Locator = UiSelector::new()
            .class_name("android.widget.Button")
            .package_name(&self.app.package)
            .into();

        let count = self.ui.count_matches(&buttons).await;
        if count < BOTTOM_SHEET_MIN_BUTTONS {
            return false;
        }

        info!("{} app buttons on screen, assuming a bottom sheet; pressing back", count);
        if let Err(e) = self.ui.backend().back().await {
            debug!("back navigation failed (ignored): {}", e);
            return false;
        }
        self.ui.pause(TIMING_CONFIG.wait.popup_pause()).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::FakeBackend;

    fn app_buttons() -> Locator {
        UiSelector::new()
            .class_name("android.widget.Button")
            .package_name("net.bucketplace")
            .into()
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_prompt_dismissed_when_displayed() {
        let app = AppConfig::default();
        let fake = FakeBackend::default().element(Locator::id(AUTOFILL_SAVE_NO_ID), "not-now");
        let popups = PopupHandler::new(Ui::new(&fake), &app);

        assert!(popups.dismiss_system_save_prompt_if_present().await);
        assert_eq!(fake.events(), vec!["click:not-now"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_prompt_ignored_when_absent_or_hidden() {
        let app = AppConfig::default();
        let fake = FakeBackend::default();
        let popups = PopupHandler::new(Ui::new(&fake), &app);
        assert!(!popups.dismiss_system_save_prompt_if_present().await);

        let fake = FakeBackend::default().hidden_element(Locator::id(AUTOFILL_SAVE_NO_ID), "not-now");
        let popups = PopupHandler::new(Ui::new(&fake), &app);
        assert!(!popups.dismiss_system_save_prompt_if_present().await);
        assert!(fake.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_prompt_errors_swallowed() {
        let app = AppConfig::default();
        let fake = FakeBackend::default().fail_all();
        let popups = PopupHandler::new(Ui::new(&fake), &app);
        assert!(!popups.dismiss_system_save_prompt_if_present().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sheet_heuristic_presses_back_at_threshold() {
        let app = AppConfig::default();
        let fake = FakeBackend::default()
            .element(app_buttons(), "confirm")
            .element(app_buttons(), "cancel");
        let popups = PopupHandler::new(Ui::new(&fake), &app);

        assert!(popups.dismiss_in_app_sheet_if_present().await);
        assert_eq!(fake.events(), vec!["back"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sheet_heuristic_below_threshold() {
        let app = AppConfig::default();
        let fake = FakeBackend::default().element(app_buttons(), "only");
        let popups = PopupHandler::new(Ui::new(&fake), &app);

        assert!(!popups.dismiss_in_app_sheet_if_present().await);
        assert!(fake.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sheet_heuristic_errors_swallowed() {
        let app = AppConfig::default();
        let fake = FakeBackend::default().fail_all();
        let popups = PopupHandler::new(Ui::new(&fake), &app);
        assert!(!popups.dismiss_in_app_sheet_if_present().await);
    }
}
