//! Per-run configuration: device, credentials and endpoints

pub const DEFAULT_APPIUM_HOST: &str = "127.0.0.1";
pub const DEFAULT_APPIUM_PORT: u16 = 4723;

/// Email/password pair for one scenario
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are present. Anything less means "skip the login step".
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// Everything a scenario needs besides the device and the backend
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub device_id: String,
    pub reset_app: bool,
    pub pass_credentials: Credentials,
    pub fail_credentials: Credentials,
    pub appium_host: String,
    pub appium_port: u16,
    pub adb_path: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            reset_app: true,
            pass_credentials: Credentials::default(),
            fail_credentials: Credentials::default(),
            appium_host: DEFAULT_APPIUM_HOST.to_string(),
            appium_port: DEFAULT_APPIUM_PORT,
            adb_path: "adb".to_string(),
        }
    }
}

impl RunConfig {
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn with_reset_app(mut self, reset_app: bool) -> Self {
        self.reset_app = reset_app;
        self
    }

    pub fn with_pass_credentials(mut self, credentials: Credentials) -> Self {
        self.pass_credentials = credentials;
        self
    }

    pub fn with_fail_credentials(mut self, credentials: Credentials) -> Self {
        self.fail_credentials = credentials;
        self
    }

    pub fn appium_url(&self) -> String {
        format!("http://{}:{}", self.appium_host, self.appium_port)
    }
}

/// Reset is on unless the value is exactly `false` (any case, no padding)
pub fn parse_reset_flag(value: &str) -> bool {
    !value.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reset_flag() {
        assert!(parse_reset_flag("true"));
        assert!(parse_reset_flag(""));
        assert!(parse_reset_flag("0"));
        assert!(parse_reset_flag("no"));
        assert!(!parse_reset_flag("false"));
        assert!(!parse_reset_flag("FALSE"));
        assert!(!parse_reset_flag("False"));
    }

    #[test]
    fn test_parse_reset_flag_keeps_padding() {
        assert!(parse_reset_flag(" false"));
        assert!(parse_reset_flag("false\n"));
    }

    #[test]
    fn test_credentials_complete() {
        assert!(Credentials::new("a@b.c", "pw").is_complete());
        assert!(!Credentials::new("", "pw").is_complete());
        assert!(!Credentials::new("a@b.c", "").is_complete());
        assert!(!Credentials::default().is_complete());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let dbg = format!("{:?}", Credentials::new("a@b.c", "hunter2"));
        assert!(dbg.contains("a@b.c"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_appium_url_default() {
        assert_eq!(RunConfig::default().appium_url(), "http://127.0.0.1:4723");
    }
}
