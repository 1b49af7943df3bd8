//! Appium session capabilities for the UiAutomator2 driver

use serde::Serialize;

use crate::config::AppConfig;

/// Seconds Appium keeps an idle session alive
pub const NEW_COMMAND_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AndroidCapabilities {
    #[serde(rename = "platformName")]
    pub platform_name: String,
    #[serde(rename = "appium:automationName")]
    pub automation_name: String,
    #[serde(rename = "appium:deviceName")]
    pub device_name: String,
    #[serde(rename = "appium:udid")]
    pub udid: String,
    #[serde(rename = "appium:appPackage")]
    pub app_package: String,
    #[serde(rename = "appium:appActivity")]
    pub app_activity: String,
    #[serde(rename = "appium:noReset")]
    pub no_reset: bool,
    #[serde(rename = "appium:newCommandTimeout")]
    pub new_command_timeout: u64,
}

impl AndroidCapabilities {
    pub fn new(device_id: &str, app: &AppConfig) -> Self {
        Self {
            platform_name: "Android".to_string(),
            automation_name: "UiAutomator2".to_string(),
            device_name: device_id.to_string(),
            udid: device_id.to_string(),
            app_package: app.package.clone(),
            app_activity: app.launch_activity.clone(),
            no_reset: true,
            new_command_timeout: NEW_COMMAND_TIMEOUT_SECS,
        }
    }

    /// W3C `POST /session` body
    pub fn to_request(&self) -> serde_json::Value {
        serde_json::json!({
            "capabilities": {
                "alwaysMatch": self,
                "firstMatch": [{}],
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_request() {
        let caps = AndroidCapabilities::new("emulator-5554", &AppConfig::default());
        let body = caps.to_request();
        let always = &body["capabilities"]["alwaysMatch"];

        assert_eq!(always["platformName"], "Android");
        assert_eq!(always["appium:automationName"], "UiAutomator2");
        assert_eq!(always["appium:udid"], "emulator-5554");
        assert_eq!(always["appium:deviceName"], "emulator-5554");
        assert_eq!(always["appium:appPackage"], "net.bucketplace");
        assert_eq!(
            always["appium:appActivity"],
            "se.ohou.screen.splash.SplashActivity"
        );
        assert_eq!(always["appium:noReset"], true);
        assert_eq!(always["appium:newCommandTimeout"], 300);
    }
}
