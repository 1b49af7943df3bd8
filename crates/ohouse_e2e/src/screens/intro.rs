//! Intro screen: the entry point with the social/email login buttons

use std::time::Duration;
use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::locator::{Locator, UiSelector};
use crate::session::StartActivity;
use crate::wait::Ui;

const ACTIVITY_TIMEOUT: Duration = Duration::from_secs(15);
const ACTIVITY_POLL: Duration = Duration::from_millis(300);
const LOGO_TIMEOUT: Duration = Duration::from_secs(10);
const BUTTON_TIMEOUT: Duration = Duration::from_millis(2500);
const TEXT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(8);
const INPUT_FIELD_TIMEOUT: Duration = Duration::from_secs(8);

pub const EMAIL_LOGIN_LABEL: &str = "이메일로 로그인";

pub struct IntroScreen<'a> {
    ui: Ui<'a>,
    app: &'a AppConfig,
}

impl<'a> IntroScreen<'a> {
    pub fn new(ui: Ui<'a>, app: &'a AppConfig) -> Self {
        Self { ui, app }
    }

    /// Bring the app to the intro activity, launching it if another app is
    /// in the foreground, and wait for the logo container to render.
    pub async fn ensure_reached(&self) -> Result<()> {
        let backend = self.ui.backend();

        let current = backend.current_package().await?;
        if current != self.app.package {
            info!(
                "Foreground app is {:?}, launching {} and waiting for the intro activity",
                current, self.app.launch_activity
            );
            backend
                .start_activity(&StartActivity {
                    app_package: self.app.package.clone(),
                    app_activity: self.app.launch_activity.clone(),
                    app_wait_package: self.app.package.clone(),
                    app_wait_activity: self.app.intro_activity.clone(),
                })
                .await?;
        }

        let intro = self.app.intro_activity.as_str();
        self.ui
            .wait_until_true(
                || async move { backend.current_activity().await.map(|a| a == intro) },
                ACTIVITY_TIMEOUT,
                ACTIVITY_POLL,
                "did not switch to the intro activity",
            )
            .await?;

        self.ui
            .wait_visible(&Locator::id(self.app.resource_id("logoContainer")), LOGO_TIMEOUT)
            .await?;

        info!("Intro screen reached");
        Ok(())
    }

    /// Tap "email login" and wait for the email login form.
    ///
    /// Locator priority: the button id, then its label id, then the label
    /// text. The last stage is allowed to fail the call.
    pub async fn goto_email_login(&self) -> Result<()> {
        info!("Navigating to the email login screen");

        let chain = [
            (
                Locator::id(self.app.resource_id("emailLoginButton")),
                BUTTON_TIMEOUT,
            ),
            (
                Locator::id(self.app.resource_id("emailLoginText")),
                BUTTON_TIMEOUT,
            ),
            (
                UiSelector::new().text(EMAIL_LOGIN_LABEL).into(),
                TEXT_FALLBACK_TIMEOUT,
            ),
        ];
        let target = self.ui.first_visible(&chain).await?;
        self.ui.backend().click(&target).await?;

        self.ui
            .wait_visible(
                &Locator::id(self.app.resource_id("inputField")),
                INPUT_FIELD_TIMEOUT,
            )
            .await?;

        info!("Email login screen reached");
        Ok(())
    }
}
