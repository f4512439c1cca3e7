use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("payload parse error: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("charting library failed to load from every source")]
    LibraryLoadFailed,
    #[error("payload has no candlestick data")]
    NoData,
    #[error("no render session for container {0}")]
    NoSession(String),
    #[error("js error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<JsValue> for ChartError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        ChartError::Js(msg)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ChartError> for JsValue {
    fn from(err: ChartError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
