use gloo_net::http::Request;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wildfire_core::api::{Backend, Endpoint, Reply};
use wildfire_core::ViewConfig;

/// `fetch`-backed transport rooted at the configured API base.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    base: String,
}

impl HttpBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Backend for HttpBackend {
    async fn post(&self, endpoint: Endpoint, body: serde_json::Value) -> Result<Reply, String> {
        let response = Request::post(&endpoint.url(&self.base))
            .json(&body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(Reply::new(response.status()))
    }

    async fn get(&self, endpoint: Endpoint) -> Result<serde_json::Value, String> {
        let response = Request::get(&endpoint.url(&self.base))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.ok() {
            return Err(format!("status {}", response.status()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| e.to_string())
    }
}

fn window_global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value)
}

/// Reads `window.APP_CONFIG` and `window.CURRENT_USER`, both optional.
pub fn load_config() -> ViewConfig {
    let mut config = match window_global("APP_CONFIG") {
        Some(raw) => serde_wasm_bindgen::from_value(raw).unwrap_or_else(|e| {
            log::warn!("ignoring malformed APP_CONFIG: {e}");
            ViewConfig::default()
        }),
        None => ViewConfig::default(),
    };

    if let Some(user) = window_global("CURRENT_USER").and_then(|v| v.as_string()) {
        config.current_user = user;
    }
    config
}
