//! Device control facade for the app under test
//!
//! Every operation here is best-effort: failures of the underlying `adb`
//! command are logged and mapped to a neutral value instead of propagated.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use super::connection::AdbExecutor;
use crate::config::AppConfig;

lazy_static! {
    static ref VERSION_NAME_RE: Regex = Regex::new(r"versionName=(.+)").unwrap();
    static ref VERSION_CODE_RE: Regex = Regex::new(r"versionCode=(\d+)").unwrap();
}

/// Installed version of the app, as reported by `dumpsys package`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub version_name: Option<String>,
    pub version_code: Option<String>,
}

impl VersionInfo {
    /// Extract the first `versionName=` and `versionCode=` values
    pub fn parse(dumpsys: &str) -> Self {
        let capture = |re: &Regex| {
            re.captures(dumpsys)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            version_name: capture(&VERSION_NAME_RE),
            version_code: capture(&VERSION_CODE_RE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.version_name.is_none() && self.version_code.is_none()
    }
}

/// One device and one app, driven through an [`AdbExecutor`]
pub struct AdbDevice<E> {
    executor: E,
    device_id: String,
    app: AppConfig,
}

impl<E: AdbExecutor> AdbDevice<E> {
    pub fn new(executor: E, device_id: impl Into<String>, app: AppConfig) -> Self {
        Self {
            executor,
            device_id: device_id.into(),
            app,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn shell(&self, args: &[&str]) -> crate::Result<String> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("shell");
        full.extend_from_slice(args);
        self.executor.run(&self.device_id, &full).await
    }

    /// Whether the package is installed. An `adb` failure counts as "not installed".
    pub async fn is_installed(&self) -> bool {
        match self.shell(&["pm", "path", &self.app.package]).await {
            Ok(out) => out.contains("package:"),
            Err(e) => {
                debug!("pm path failed, treating {} as not installed: {}", self.app.package, e);
                false
            }
        }
    }

    /// Force-stop the app and wipe its data. Each step is attempted even if
    /// the other fails.
    pub async fn force_stop_and_clear(&self) {
        info!("Resetting app state (force-stop + pm clear) for {}", self.app.package);

        if let Err(e) = self.shell(&["am", "force-stop", &self.app.package]).await {
            debug!("am force-stop failed (ignored): {}", e);
        }
        if let Err(e) = self.shell(&["pm", "clear", &self.app.package]).await {
            debug!("pm clear failed (ignored): {}", e);
        }
    }

    /// Ask the activity manager to kill background processes. Not supported
    /// on every image; failure is only logged.
    pub async fn kill_background_apps(&self) {
        info!("Killing background apps (am kill-all)");

        if let Err(e) = self.shell(&["am", "kill-all"]).await {
            warn!("am kill-all failed (ignored): {}", e);
        }
    }

    /// Background cleanup followed by an app data reset
    pub async fn reset_app_state(&self) {
        self.kill_background_apps().await;
        self.force_stop_and_clear().await;
    }

    /// Installed version, empty when `dumpsys` fails or has no version fields
    pub async fn read_version_info(&self) -> VersionInfo {
        match self.shell(&["dumpsys", "package", &self.app.package]).await {
            Ok(out) => VersionInfo::parse(&out),
            Err(e) => {
                warn!("Could not read version info for {}: {}", self.app.package, e);
                VersionInfo::default()
            }
        }
    }

    /// Log the installed version. Never fails.
    pub async fn log_version_info(&self) -> VersionInfo {
        let info = self.read_version_info().await;

        if let Some(name) = &info.version_name {
            info!("Installed {} versionName: {}", self.app.package, name);
        }
        if let Some(code) = &info.version_code {
            info!("Installed {} versionCode: {}", self.app.package, code);
        }
        if info.is_empty() {
            info!("No version information found for {}", self.app.package);
        }

        info
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{E2eError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted executor keyed by the joined argument list
    #[derive(Default)]
    pub(crate) struct FakeAdb {
        pub responses: HashMap<String, std::result::Result<String, String>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeAdb {
        pub fn respond(mut self, cmd: &str, out: &str) -> Self {
            self.responses.insert(cmd.to_string(), Ok(out.to_string()));
            self
        }

        pub fn fail(mut self, cmd: &str, err: &str) -> Self {
            self.responses.insert(cmd.to_string(), Err(err.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AdbExecutor for FakeAdb {
        async fn run(&self, device_id: &str, args: &[&str]) -> Result<String> {
            assert_eq!(device_id, "emulator-5554");
            let key = args.join(" ");
            self.calls.lock().unwrap().push(key.clone());
            match self.responses.get(&key) {
                Some(Ok(out)) => Ok(out.clone()),
                Some(Err(err)) => Err(E2eError::CommandFailed(err.clone())),
                None => Err(E2eError::CommandFailed(format!("unexpected: {}", key))),
            }
        }
    }

    fn device(adb: FakeAdb) -> AdbDevice<FakeAdb> {
        AdbDevice::new(adb, "emulator-5554", AppConfig::default())
    }

    #[tokio::test]
    async fn test_is_installed() {
        let d = device(
            FakeAdb::default().respond("shell pm path net.bucketplace", "package:/data/app/base.apk\n"),
        );
        assert!(d.is_installed().await);

        let d = device(FakeAdb::default().respond("shell pm path net.bucketplace", ""));
        assert!(!d.is_installed().await);
    }

    #[tokio::test]
    async fn test_is_installed_command_failure_is_false() {
        let d = device(FakeAdb::default().fail("shell pm path net.bucketplace", "device offline"));
        assert!(!d.is_installed().await);
    }

    #[tokio::test]
    async fn test_force_stop_failure_does_not_block_clear() {
        let d = device(
            FakeAdb::default()
                .fail("shell am force-stop net.bucketplace", "boom")
                .respond("shell pm clear net.bucketplace", "Success"),
        );
        d.force_stop_and_clear().await;
        assert_eq!(
            d.executor().calls(),
            vec![
                "shell am force-stop net.bucketplace",
                "shell pm clear net.bucketplace"
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_app_state_survives_all_failures() {
        let d = device(FakeAdb::default());
        d.reset_app_state().await;
        assert_eq!(d.executor().calls().len(), 3);
        assert_eq!(d.executor().calls()[0], "shell am kill-all");
    }

    #[test]
    fn test_version_info_parse() {
        let dumpsys = "Packages:\n  Package [net.bucketplace]\n    versionCode=1234567 minSdk=26 targetSdk=34\n    versionName=10.2.1\n";
        let info = VersionInfo::parse(dumpsys);
        assert_eq!(info.version_name.as_deref(), Some("10.2.1"));
        assert_eq!(info.version_code.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_version_info_missing_fields() {
        let info = VersionInfo::parse("versionName=9.0.0\n");
        assert_eq!(info.version_name.as_deref(), Some("9.0.0"));
        assert!(info.version_code.is_none());
        assert!(VersionInfo::parse("nothing here").is_empty());
    }

    #[tokio::test]
    async fn test_read_version_info_failure_is_empty() {
        let d = device(FakeAdb::default().fail("shell dumpsys package net.bucketplace", "boom"));
        assert!(d.log_version_info().await.is_empty());
    }
}
