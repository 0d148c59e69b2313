use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring the game into the page.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("no document body")]
    NoBody,

    #[error("2d canvas context unavailable")]
    NoContext,

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for ArenaError {
    fn from(value: JsValue) -> Self {
        ArenaError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ArenaError> for JsValue {
    fn from(err: ArenaError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
