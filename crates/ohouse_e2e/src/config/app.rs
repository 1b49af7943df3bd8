//! Identity of the app under test
//!
//! Sources for the defaults:
//! - package: `adb shell pm list packages | grep bucketplace`
//! - launch activity: `adb shell cmd package resolve-activity --brief net.bucketplace`
//! - intro activity: current activity reported by Appium on the intro screen

/// Ohouse Android package name
pub const OHOUSE_PACKAGE: &str = "net.bucketplace";

/// Launcher activity, used as `appium:appActivity`
pub const OHOUSE_LAUNCH_ACTIVITY: &str = "se.ohou.screen.splash.SplashActivity";

/// Activity hosting the social/email login entry buttons
pub const OHOUSE_INTRO_ACTIVITY: &str = "se.ohou.screen.intro.IntroActivity";

/// Package and activity names shared by the device facade, the session
/// capabilities and the screen objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub package: String,
    pub launch_activity: String,
    pub intro_activity: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            package: OHOUSE_PACKAGE.to_string(),
            launch_activity: OHOUSE_LAUNCH_ACTIVITY.to_string(),
            intro_activity: OHOUSE_INTRO_ACTIVITY.to_string(),
        }
    }
}

impl AppConfig {
    /// Fully qualified resource id inside the app package, e.g.
    /// `net.bucketplace:id/loginButton`
    pub fn resource_id(&self, name: &str) -> String {
        format!("{}:id/{}", self.package, name)
    }
}
