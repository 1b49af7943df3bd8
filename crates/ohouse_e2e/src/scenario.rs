//! End-to-end login scenarios
//!
//! Both scenarios share the same prelude: log the installed version, skip
//! when the app is missing, optionally reset app state, open a session.
//! Once a session exists it is released on every exit path.

use std::time::Duration;
use tracing::info;

use crate::adb::{AdbDevice, AdbExecutor};
use crate::config::{AppConfig, RunConfig, TIMING_CONFIG};
use crate::error::Result;
use crate::screens::{EmailLoginScreen, HomeScreen, IntroScreen, LoginAttempt, PopupHandler};
use crate::session::{create_session, Session, SessionConnector};
use crate::wait::Ui;

const FAILURE_TOOLTIP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The package is not installed; no session was opened
    AppNotInstalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Navigation succeeded but no credentials were configured
    LoginNotAttempted,
    Passed,
}

/// How a scenario ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOutcome {
    Skipped(SkipReason),
    Completed(Completion),
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Completed(Completion::Passed))
    }
}

pub struct Scenario<'a, E, C: ?Sized> {
    device: &'a AdbDevice<E>,
    connector: &'a C,
    config: &'a RunConfig,
}

impl<'a, E, C> Scenario<'a, E, C>
where
    E: AdbExecutor,
    C: SessionConnector + ?Sized,
{
    pub fn new(device: &'a AdbDevice<E>, connector: &'a C, config: &'a RunConfig) -> Self {
        Self {
            device,
            connector,
            config,
        }
    }

    fn app(&self) -> &'a AppConfig {
        self.device.app()
    }

    /// Version log, install check, optional reset and session acquisition.
    /// `None` when the app is not installed.
    async fn open(&self) -> Result<Option<Session>> {
        self.device.log_version_info().await;

        if !self.device.is_installed().await {
            info!(
                "Package {} is not installed, skipping scenario",
                self.app().package
            );
            return Ok(None);
        }

        if self.config.reset_app {
            self.device.reset_app_state().await;
        }

        let session = create_session(
            self.connector,
            self.device.device_id(),
            TIMING_CONFIG.session.max_attempts,
        )
        .await?;
        Ok(Some(session))
    }

    /// Intro → email login → login → popups → home
    pub async fn login_pass(&self) -> Result<ScenarioOutcome> {
        let Some(session) = self.open().await? else {
            return Ok(ScenarioOutcome::Skipped(SkipReason::AppNotInstalled));
        };
        let result = self.login_pass_steps(&session).await;
        finish(session, result).await
    }

    async fn login_pass_steps(&self, session: &Session) -> Result<ScenarioOutcome> {
        let ui = Ui::new(session.backend());
        let app = self.app();

        let intro = IntroScreen::new(ui, app);
        intro.ensure_reached().await?;
        intro.goto_email_login().await?;

        let credentials = &self.config.pass_credentials;
        if !credentials.is_complete() {
            info!("No credentials set (OH_EMAIL / OH_PASSWORD); stopping at the email login screen");
            return Ok(ScenarioOutcome::Completed(Completion::LoginNotAttempted));
        }

        EmailLoginScreen::new(ui, app).login(credentials).await?;

        let popups = PopupHandler::new(ui, app);
        popups.dismiss_system_save_prompt_if_present().await;
        popups.dismiss_in_app_sheet_if_present().await;

        HomeScreen::new(ui, app).ensure_reached().await?;
        info!("Login scenario passed");
        Ok(ScenarioOutcome::Completed(Completion::Passed))
    }

    /// Intro → email login → login with failing credentials → rate-limit tooltip
    pub async fn login_fail(&self) -> Result<ScenarioOutcome> {
        let Some(session) = self.open().await? else {
            return Ok(ScenarioOutcome::Skipped(SkipReason::AppNotInstalled));
        };
        let result = self.login_fail_steps(&session).await;
        finish(session, result).await
    }

    async fn login_fail_steps(&self, session: &Session) -> Result<ScenarioOutcome> {
        let ui = Ui::new(session.backend());
        let app = self.app();

        let intro = IntroScreen::new(ui, app);
        intro.ensure_reached().await?;
        intro.goto_email_login().await?;

        let login = EmailLoginScreen::new(ui, app);
        if login.login(&self.config.fail_credentials).await? == LoginAttempt::Skipped {
            info!("No failure credentials set (FAIL_EMAIL / FAIL_PASSWORD); stopping at the email login screen");
            return Ok(ScenarioOutcome::Completed(Completion::LoginNotAttempted));
        }

        login
            .ensure_failure_tooltip_shown(FAILURE_TOOLTIP_TIMEOUT)
            .await?;
        info!("Login failure tooltip scenario passed");
        Ok(ScenarioOutcome::Completed(Completion::Passed))
    }
}

/// Release the session, then hand back the step result. Release failures
/// are logged by [`Session::release`] and do not replace the step result.
async fn finish(session: Session, result: Result<ScenarioOutcome>) -> Result<ScenarioOutcome> {
    let _ = session.release().await;
    result
}
