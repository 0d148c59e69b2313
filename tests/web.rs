// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_mounts_canvas() {
    shape_slash::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("game").is_some());
    // a second start is a no-op
    shape_slash::start_game().unwrap();
}

#[wasm_bindgen_test]
fn classify_points_works_in_browser() {
    let xs: Vec<f64> = (0..10).map(|i| i as f64 * 10.0).collect();
    let ys = vec![5.0; 10];
    assert_eq!(shape_slash::classify_points(&xs, &ys), "line");
}
