//! Browser front-end for the arena: canvas rendering, pointer input, sound
//! and HUD. Game rules live in [`state`]; this module only feeds it frames and
//! gestures and turns its events into feedback.
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, EventTarget, HtmlAudioElement, HtmlCanvasElement, PointerEvent,
    Window, window,
};

use crate::error::ArenaError;
use crate::gesture::{Point, ShapeLabel, StrokeCapture, StrokeClassifier};

pub mod pose;
pub mod state;

pub use pose::{PlayerAnimator, PlayerPose};
pub use state::{ArenaConfig, ArenaEvent, ArenaState, Shape, SpawnRng, Viewport};

const CANVAS_ID: &str = "game";
const SCORE_ID: &str = "score";
const STROKE_COLORS: [&str; 3] = ["#ff3b3b", "#ffd93b", "#3b82ff"];
const HEART_SIZE: f64 = 30.0;
const HEART_PADDING: f64 = 10.0;
const MUSIC_VOLUME: f64 = 0.4;

// --- Sound ------------------------------------------------------------------

/// Sound effects; any clip that fails to load is simply skipped.
struct Sfx {
    pop: Option<HtmlAudioElement>,
    defeat: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
}

impl Sfx {
    fn load() -> Self {
        let clip = |src: &str| HtmlAudioElement::new_with_src(src).ok();
        let music = clip("./public/level.wav");
        if let Some(m) = &music {
            m.set_loop(true);
            m.set_volume(MUSIC_VOLUME);
        }
        Self {
            pop: clip("./public/pop.mp3"),
            defeat: clip("./public/defeat.wav"),
            music,
        }
    }

    fn restart(clip: &Option<HtmlAudioElement>) {
        if let Some(a) = clip {
            a.set_current_time(0.0);
            // autoplay may be refused until the first user gesture
            let _ = a.play();
        }
    }

    fn start_music(&self) {
        if let Some(m) = &self.music {
            if m.paused() {
                let _ = m.play();
            }
        }
    }

    fn stop_music(&self) {
        if let Some(m) = &self.music {
            let _ = m.pause();
        }
    }
}

// --- Runtime ----------------------------------------------------------------

struct ArenaRuntime {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    state: ArenaState,
    capture: StrokeCapture,
    classifier: StrokeClassifier,
    player: PlayerAnimator,
    fx_rng: SpawnRng, // cosmetic draws only, separate from spawns
    stroke_color: &'static str,
    sfx: Sfx,
    last_frame_ms: Option<f64>,
}

thread_local! {
    static ARENA: RefCell<Option<ArenaRuntime>> = const { RefCell::new(None) };
}

/// Creates (or reuses) the `#game` canvas and starts the arena loop.
pub fn start_arena() -> Result<(), JsValue> {
    if ARENA.with(|a| a.borrow().is_some()) {
        log::warn!("arena already running");
        return Ok(());
    }
    let win = window().ok_or(ArenaError::NoWindow)?;
    let doc = win.document().ok_or(ArenaError::NoDocument)?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "position:fixed; left:0; top:0; touch-action:none;")?;
        doc.body().ok_or(ArenaError::NoBody)?.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(ArenaError::NoContext)?
        .dyn_into()?;

    let viewport = fit_screen(&win, &canvas, &ctx)?;
    let seed = spawn_seed();
    let runtime = ArenaRuntime {
        canvas: canvas.clone(),
        ctx,
        viewport,
        state: ArenaState::new(ArenaConfig::default(), SpawnRng::new(seed)),
        capture: StrokeCapture::new(),
        classifier: StrokeClassifier::default(),
        player: PlayerAnimator::new(),
        fx_rng: SpawnRng::new(seed.rotate_left(16) ^ 0x9E37_79B9),
        stroke_color: STROKE_COLORS[0],
        sfx: Sfx::load(),
        last_frame_ms: None,
    };
    ARENA.with(|a| a.replace(Some(runtime)));
    log::info!(
        "arena started ({:.0}x{:.0})",
        viewport.width,
        viewport.height
    );

    let target: &EventTarget = canvas.as_ref();
    listen(target, "pointerdown", |evt| {
        with_arena(|rt| {
            if rt.state.lives() > 0 {
                rt.sfx.start_music();
            }
            let pick = rt.fx_rng.next_index(STROKE_COLORS.len());
            rt.stroke_color = STROKE_COLORS[pick];
            rt.capture.begin();
            rt.capture.add_point(canvas_point(&rt.canvas, &evt));
        });
    })?;
    listen(target, "pointermove", |evt| {
        with_arena(|rt| {
            if rt.capture.is_drawing() {
                rt.capture.add_point(canvas_point(&rt.canvas, &evt));
            }
        });
    })?;
    listen(target, "pointerup", |_| with_arena(finish_stroke))?;
    listen(target, "pointercancel", |_| with_arena(finish_stroke))?;

    let on_resize = Closure::wrap(Box::new(move || {
        with_arena(|rt| {
            if let Some(win) = window() {
                match fit_screen(&win, &rt.canvas, &rt.ctx) {
                    Ok(vp) => rt.viewport = vp,
                    Err(err) => log::warn!("resize failed: {err}"),
                }
            }
        });
    }) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    start_arena_loop();
    Ok(())
}

fn with_arena(f: impl FnOnce(&mut ArenaRuntime)) {
    ARENA.with(|cell| {
        if let Some(rt) = cell.borrow_mut().as_mut() {
            f(rt);
        }
    });
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(PointerEvent) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(PointerEvent)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn canvas_point(canvas: &HtmlCanvasElement, evt: &PointerEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(
        f64::from(evt.client_x()) - rect.left(),
        f64::from(evt.client_y()) - rect.top(),
    )
}

fn finish_stroke(rt: &mut ArenaRuntime) {
    rt.player.swing(crate::performance_now(), &mut rt.fx_rng);
    if !rt.capture.is_drawing() {
        return;
    }
    let stroke = rt.capture.finish();
    let label = rt.classifier.classify(&stroke);
    if let Some(event) = rt.state.apply_gesture(label) {
        on_event(rt, &event);
    }
}

fn on_event(rt: &mut ArenaRuntime, event: &ArenaEvent) {
    match event {
        ArenaEvent::Spawned { id, kind } => log::trace!("spawned {kind} #{id}"),
        ArenaEvent::Destroyed { kind, score, .. } => {
            log::debug!("destroyed {kind}, score {score}");
            Sfx::restart(&rt.sfx.pop);
        }
        ArenaEvent::PlayerHit { kind, lives, .. } => {
            log::debug!("hit by {kind}, {lives} lives left");
        }
        ArenaEvent::GameOver { .. } => {
            rt.player.kill();
            rt.sfx.stop_music();
            Sfx::restart(&rt.sfx.defeat);
        }
    }
}

/// Sizes the canvas to the window at device-pixel resolution and returns the
/// logical viewport.
fn fit_screen(
    win: &Window,
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
) -> Result<Viewport, ArenaError> {
    let width = win.inner_width()?.as_f64().unwrap_or(800.0);
    let height = win.inner_height()?.as_f64().unwrap_or(600.0);
    let dpr = match win.device_pixel_ratio() {
        r if r > 0.0 => r,
        _ => 1.0,
    };
    canvas.set_attribute(
        "style",
        &format!("position:fixed; left:0; top:0; width:{width}px; height:{height}px; touch-action:none;"),
    )?;
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    Ok(Viewport::new(width, height))
}

fn spawn_seed() -> u32 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 4];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u32::from_le_bytes(buf);
        }
    }
    crate::performance_now() as u32
}

// --- Frame loop -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_arena_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_arena(|rt| arena_tick(rt, ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(c)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(c.as_ref().unchecked_ref());
    }
}

fn arena_tick(rt: &mut ArenaRuntime, now: f64) {
    let delta = rt.last_frame_ms.map_or(0.0, |last| now - last);
    rt.last_frame_ms = Some(now);
    rt.player.update(now);
    for event in rt.state.tick(delta, rt.viewport) {
        on_event(rt, &event);
    }
    if let Err(err) = render(rt) {
        log::error!("render failed: {err:?}");
    }
    update_hud(rt);
}

// --- Rendering --------------------------------------------------------------

fn render(rt: &mut ArenaRuntime) -> Result<(), JsValue> {
    let vp = rt.viewport;
    let ctx = &rt.ctx;
    ctx.clear_rect(0.0, 0.0, vp.width, vp.height);

    ctx.save();
    let shake = rt.state.shake();
    if shake > 0.0 {
        let sx = (rt.fx_rng.next_f64() - 0.5) * shake;
        let sy = (rt.fx_rng.next_f64() - 0.5) * shake;
        ctx.translate(sx, sy)?;
    }
    for shape in rt.state.shapes() {
        draw_shape(ctx, shape)?;
    }
    draw_trail(ctx, rt.capture.points(), rt.stroke_color);
    draw_player(ctx, vp.center(), rt.player.pose())?;
    ctx.restore();

    let flash = rt.state.flash();
    if flash > 0.0 {
        ctx.set_fill_style_str(&format!("rgba(255, 0, 0, {flash})"));
        ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
    }
    draw_hearts(ctx, vp, rt.state.lives())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let s = shape.size;
    ctx.save();
    ctx.translate(shape.pos.x, shape.pos.y)?;
    ctx.set_stroke_style_str("#333");
    ctx.set_line_width(4.0);
    ctx.set_line_cap("round");
    ctx.begin_path();
    match shape.kind {
        ShapeLabel::Circle => ctx.arc(0.0, 0.0, s, 0.0, TAU)?,
        ShapeLabel::Line => {
            ctx.move_to(0.0, -s);
            ctx.line_to(0.0, s);
        }
        ShapeLabel::Chevron => {
            ctx.move_to(-s, -s / 2.0);
            ctx.line_to(0.0, s);
            ctx.line_to(s, -s / 2.0);
        }
    }
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_trail(ctx: &CanvasRenderingContext2d, points: &[Point], color: &str) {
    let [first, rest @ ..] = points else {
        return;
    };
    if rest.is_empty() {
        return;
    }
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(4.0);
    ctx.stroke();
}

fn draw_player(
    ctx: &CanvasRenderingContext2d,
    center: Point,
    pose: PlayerPose,
) -> Result<(), JsValue> {
    let r = state::PLAYER_HIT_RADIUS * 0.6;
    ctx.begin_path();
    ctx.arc(center.x, center.y, r, 0.0, TAU)?;
    ctx.set_fill_style_str(if pose == PlayerPose::Dead { "#555" } else { "#f4a261" });
    ctx.fill();

    // swing arm, angled down or up from the body
    let arm = match pose {
        PlayerPose::SwingLow => Some(0.6),
        PlayerPose::SwingHigh => Some(-0.6),
        PlayerPose::Idle | PlayerPose::Dead => None,
    };
    if let Some(angle) = arm {
        let (sin, cos) = f64::sin_cos(angle);
        ctx.begin_path();
        ctx.move_to(center.x + r * cos, center.y + r * sin);
        ctx.line_to(center.x + 2.0 * r * cos, center.y + 2.0 * r * sin);
        ctx.set_stroke_style_str("#f4a261");
        ctx.set_line_width(8.0);
        ctx.stroke();
    }
    Ok(())
}

fn draw_hearts(ctx: &CanvasRenderingContext2d, vp: Viewport, lives: u32) -> Result<(), JsValue> {
    ctx.set_font(&format!("{HEART_SIZE}px sans-serif"));
    ctx.set_text_align("left");
    ctx.set_fill_style_str("#ff4d4d");
    for i in 0..lives {
        let x = vp.width - HEART_PADDING - f64::from(i + 1) * (HEART_SIZE + HEART_PADDING);
        ctx.fill_text("♥", x, HEART_PADDING + HEART_SIZE)?;
    }
    Ok(())
}

fn update_hud(rt: &ArenaRuntime) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(SCORE_ID))
    {
        el.set_text_content(Some(&format!("Score: {}", rt.state.score())));
    }
}
