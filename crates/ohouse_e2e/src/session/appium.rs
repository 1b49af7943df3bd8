//! Appium HTTP client (W3C WebDriver + Appium Android extensions)

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::backend::{AutomationBackend, ElementHandle, Session, SessionConnector, StartActivity};
use super::capabilities::AndroidCapabilities;
use crate::config::AppConfig;
use crate::error::{E2eError, Result};
use crate::locator::Locator;

/// W3C element reference key
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Pre-W3C (JSONWP) element reference key
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Upper bound for a single HTTP round trip. Session creation installs the
/// UiAutomator2 server on first use and can take a while.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Creates Appium sessions for the app under test
#[derive(Debug, Clone)]
pub struct AppiumConnector {
    base_url: String,
    http: reqwest::Client,
    app: AppConfig,
}

impl AppiumConnector {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:4723`
    pub fn new(base_url: impl Into<String>, app: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            app,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /status` reports ready. Any failure counts as not ready.
    pub async fn is_ready(&self) -> bool {
        let url = format!("{}/status", self.base_url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Appium status request failed: {}", e);
                return false;
            }
        };

        match read_value(resp).await {
            Ok(value) => value.get("ready").and_then(Value::as_bool).unwrap_or(true),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl SessionConnector for AppiumConnector {
    async fn connect(&self, device_id: &str) -> Result<Session> {
        let caps = AndroidCapabilities::new(device_id, &self.app);
        let url = format!("{}/session", self.base_url);

        debug!("POST {} for device {}", url, device_id);
        let resp = self.http.post(&url).json(&caps.to_request()).send().await?;
        let value = read_value(resp).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| E2eError::Session("No session ID in response".to_string()))?
            .to_string();

        info!("Appium session {} created for {}", session_id, device_id);

        let backend = AppiumSession {
            http: self.http.clone(),
            session_url: format!("{}/session/{}", self.base_url, session_id),
        };
        Ok(Session::new(session_id, Box::new(backend)))
    }
}

/// Commands bound to one Appium session id
struct AppiumSession {
    http: reqwest::Client,
    session_url: String,
}

impl AppiumSession {
    fn element_url(&self, element: &ElementHandle, command: &str) -> String {
        format!("{}/element/{}/{}", self.session_url, element.id(), command)
    }

    async fn get(&self, url: String) -> Result<Value> {
        let resp = self.http.get(&url).send().await?;
        read_value(resp).await
    }

    async fn post(&self, url: String, body: Value) -> Result<Value> {
        let resp = self.http.post(&url).json(&body).send().await?;
        read_value(resp).await
    }
}

#[async_trait]
impl AutomationBackend for AppiumSession {
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let body = json!({ "using": locator.strategy(), "value": locator.value() });
        let value = self
            .post(format!("{}/elements", self.session_url), body)
            .await?;
        parse_elements(value)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
        let value = self.get(self.element_url(element, "displayed")).await?;
        expect_bool(value)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool> {
        let value = self.get(self.element_url(element, "enabled")).await?;
        expect_bool(value)
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.post(self.element_url(element, "click"), json!({}))
            .await
            .map(|_| ())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<()> {
        self.post(self.element_url(element, "clear"), json!({}))
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let body = json!({ "text": text, "value": chars });
        self.post(self.element_url(element, "value"), body)
            .await
            .map(|_| ())
    }

    async fn back(&self) -> Result<()> {
        self.post(format!("{}/back", self.session_url), json!({}))
            .await
            .map(|_| ())
    }

    async fn current_package(&self) -> Result<String> {
        let value = self
            .get(format!("{}/appium/device/current_package", self.session_url))
            .await?;
        expect_string(value)
    }

    async fn current_activity(&self) -> Result<String> {
        let value = self
            .get(format!("{}/appium/device/current_activity", self.session_url))
            .await?;
        expect_string(value)
    }

    async fn start_activity(&self, request: &StartActivity) -> Result<()> {
        let body = json!({
            "appPackage": request.app_package,
            "appActivity": request.app_activity,
            "appWaitPackage": request.app_wait_package,
            "appWaitActivity": request.app_wait_activity,
        });
        self.post(
            format!("{}/appium/device/start_activity", self.session_url),
            body,
        )
        .await
        .map(|_| ())
    }

    async fn delete_session(&self) -> Result<()> {
        let resp = self.http.delete(&self.session_url).send().await?;
        read_value(resp).await.map(|_| ())
    }
}

async fn read_value(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().await?;

    let body: Value = match serde_json::from_str(&text) {
        Ok(body) => body,
        Err(_) if !status.is_success() => {
            return Err(E2eError::WebDriver {
                error: format!("http {}", status.as_u16()),
                message: text.trim().to_string(),
            })
        }
        Err(e) => return Err(E2eError::Json(e)),
    };

    unwrap_value(status.is_success(), body)
}

/// Pull `value` out of a WebDriver response body, turning W3C error
/// payloads into [`E2eError::WebDriver`].
fn unwrap_value(success: bool, mut body: Value) -> Result<Value> {
    let value = body
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(E2eError::WebDriver {
            error: error.to_string(),
            message,
        });
    }

    if !success {
        return Err(E2eError::WebDriver {
            error: "unknown error".to_string(),
            message: value.to_string(),
        });
    }

    Ok(value)
}

fn parse_elements(value: Value) -> Result<Vec<ElementHandle>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(E2eError::Session(format!(
                "Expected element list, got {}",
                other
            )))
        }
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            item.get(W3C_ELEMENT_KEY)
                .or_else(|| item.get(LEGACY_ELEMENT_KEY))
                .and_then(Value::as_str)
                .map(ElementHandle::new)
        })
        .collect())
}

fn expect_bool(value: Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| E2eError::Session(format!("Expected boolean, got {}", value)))
}

fn expect_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(E2eError::Session(format!("Expected string, got {}", other))),
    }
}
