//! Shape Slash core crate.
//!
//! Shapes drift toward the player in the middle of the screen; drawing a
//! matching gesture (circle, line or "v") destroys the oldest shape of that
//! kind. The gesture classifier and the arena rules are plain Rust and testable
//! natively; the browser glue lives in [`arena`] and [`leaderboard`].

use wasm_bindgen::prelude::*;

pub mod arena;
pub mod error;
pub mod gesture;
#[cfg(feature = "leaderboard")]
pub mod leaderboard;
mod logging;

pub use error::ArenaError;
pub use gesture::{
    ChevronStrategy, ClassifierConfig, DetectorPriority, NormalizedStroke, Point, ShapeLabel,
    Stroke, StrokeCapture, StrokeClassifier,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    arena::start_arena()
}

/// Classifies a stroke given as parallel coordinate arrays with the default
/// configuration. Returns the shape tag (`"circle"`, `"line"`, `"v"`) or an
/// empty string when nothing matches. Extra values in the longer array are
/// ignored.
#[wasm_bindgen]
pub fn classify_points(xs: &[f64], ys: &[f64]) -> String {
    let stroke: Stroke = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| Point::new(x, y))
        .collect();
    StrokeClassifier::default()
        .classify(&stroke)
        .map(|label| label.as_str().to_string())
        .unwrap_or_default()
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
