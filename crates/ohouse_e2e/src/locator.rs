//! Element locators and the UiAutomator selector builder

use std::fmt;

/// How to find an element on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Fully qualified resource id, e.g. `net.bucketplace:id/loginButton`
    Id(String),
    /// UiAutomator selector expression, e.g. `new UiSelector().text("OK")`
    UiAutomator(String),
}

impl Locator {
    pub fn id(resource_id: impl Into<String>) -> Self {
        Self::Id(resource_id.into())
    }

    /// W3C `using` strategy understood by the UiAutomator2 driver
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::UiAutomator(_) => "-android uiautomator",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::UiAutomator(v) => v,
        }
    }
}

impl From<UiSelector> for Locator {
    fn from(selector: UiSelector) -> Self {
        Self::UiAutomator(selector.build())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "id={}", v),
            Self::UiAutomator(v) => write!(f, "android={}", v),
        }
    }
}

/// Builder for `new UiSelector()...` expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiSelector {
    parts: Vec<(&'static str, String)>,
}

impl UiSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, method: &'static str, arg: impl Into<String>) -> Self {
        self.parts.push((method, arg.into()));
        self
    }

    pub fn resource_id(self, id: impl Into<String>) -> Self {
        self.with("resourceId", id)
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.with("text", text)
    }

    pub fn text_contains(self, text: impl Into<String>) -> Self {
        self.with("textContains", text)
    }

    pub fn class_name(self, class: impl Into<String>) -> Self {
        self.with("className", class)
    }

    pub fn package_name(self, package: impl Into<String>) -> Self {
        self.with("packageName", package)
    }

    pub fn build(&self) -> String {
        let mut expr = String::from("new UiSelector()");
        for (method, arg) in &self.parts {
            let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
            expr.push_str(&format!(".{}(\"{}\")", method, escaped));
        }
        expr
    }
}
