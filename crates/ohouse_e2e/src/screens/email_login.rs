//! Email login screen
//!
//! Covers entering credentials, submitting, and the rate-limit tooltip the
//! app shows after repeated failures.

use std::time::Duration;
use tracing::info;

use crate::config::{AppConfig, Credentials};
use crate::error::{E2eError, Result};
use crate::locator::{Locator, UiSelector};
use crate::session::{AutomationBackend, ElementHandle};
use crate::wait::Ui;

const FIELD_TIMEOUT: Duration = Duration::from_secs(8);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
const SUBMIT_POLL: Duration = Duration::from_millis(300);

pub const EMAIL_FIELD_LABEL: &str = "이메일";
pub const PASSWORD_FIELD_LABEL: &str = "비밀번호";

/// Matched with `textContains` since the full text carries an attempt
/// counter ("(1/10)", "(2/10)", ...).
pub const LOGIN_LIMITED_TEXT: &str = "로그인이 제한돼요";

/// First element matching `locator` when it is both displayed and enabled
async fn usable_element(
    backend: &dyn AutomationBackend,
    locator: &Locator,
) -> Result<Option<ElementHandle>> {
    let Some(element) = backend.find_elements(locator).await?.into_iter().next() else {
        return Ok(None);
    };
    if backend.is_displayed(&element).await? && backend.is_enabled(&element).await? {
        Ok(Some(element))
    } else {
        Ok(None)
    }
}

/// What `login` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAttempt {
    /// Credentials were incomplete; the form was not touched
    Skipped,
    Submitted,
}

pub struct EmailLoginScreen<'a> {
    ui: Ui<'a>,
    app: &'a AppConfig,
}

impl<'a> EmailLoginScreen<'a> {
    pub fn new(ui: Ui<'a>, app: &'a AppConfig) -> Self {
        Self { ui, app }
    }

    fn input_field(&self, label: &str) -> Locator {
        UiSelector::new()
            .resource_id(self.app.resource_id("inputField"))
            .text(label)
            .into()
    }

    fn failure_tooltip() -> Locator {
        UiSelector::new()
            .class_name("android.widget.TextView")
            .text_contains(LOGIN_LIMITED_TEXT)
            .into()
    }

    async fn fill(&self, field: &ElementHandle, value: &str) -> Result<()> {
        let backend = self.ui.backend();
        backend.click(field).await?;
        backend.clear(field).await?;
        backend.send_keys(field, value).await
    }

    /// Fill both fields and submit once the login button is enabled.
    /// Incomplete credentials skip the whole step.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginAttempt> {
        if !credentials.is_complete() {
            info!("No credentials configured, skipping the login form");
            return Ok(LoginAttempt::Skipped);
        }

        let email_field = self
            .ui
            .wait_visible(&self.input_field(EMAIL_FIELD_LABEL), FIELD_TIMEOUT)
            .await?;
        let password_field = self
            .ui
            .wait_visible(&self.input_field(PASSWORD_FIELD_LABEL), FIELD_TIMEOUT)
            .await?;

        self.fill(&email_field, &credentials.email).await?;
        self.fill(&password_field, &credentials.password).await?;

        let backend = self.ui.backend();
        let login_button = Locator::id(self.app.resource_id("loginButton"));
        let login_button = &login_button;
        self.ui
            .wait_until_true(
                || async move {
                    usable_element(backend, login_button)
                        .await
                        .map(|button| button.is_some())
                },
                SUBMIT_TIMEOUT,
                SUBMIT_POLL,
                "login button never became enabled",
            )
            .await?;

        let button = usable_element(backend, login_button)
            .await?
            .ok_or_else(|| E2eError::Session("login button disappeared before click".to_string()))?;
        backend.click(&button).await?;
        info!("Login submitted");
        Ok(LoginAttempt::Submitted)
    }

    /// Whether the rate-limit tooltip is on screen right now. Never fails.
    pub async fn is_failure_tooltip_visible(&self) -> bool {
        self.ui.count_matches(&Self::failure_tooltip()).await > 0
    }

    /// Wait for the rate-limit tooltip
    pub async fn ensure_failure_tooltip_shown(&self, timeout: Duration) -> Result<()> {
        self.ui
            .wait_visible(&Self::failure_tooltip(), timeout)
            .await?;
        info!("Login rate-limit tooltip shown");
        Ok(())
    }
}
