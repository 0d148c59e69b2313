//! Arena game state: incoming shapes, lives, score and hit feedback.
//!
//! Everything the frame loop mutates lives in [`ArenaState`] and changes only
//! through [`ArenaState::tick`] and [`ArenaState::apply_gesture`], which
//! report what happened as [`ArenaEvent`]s for the audio / effects layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gesture::{Point, ShapeLabel};

pub const MAX_SHAPES: usize = 6;
pub const START_LIVES: u32 = 8;
pub const HIT_SCORE: u32 = 10;
/// Seconds until difficulty saturates.
pub const TIME_TO_MAX_S: f64 = 120.0;
/// Shape speed in pixels per frame at difficulty 0 and 1.
pub const MIN_SPEED: f64 = 0.4;
pub const MAX_SPEED: f64 = 2.2;
pub const BASE_SPAWN_INTERVAL_MS: f64 = 2000.0;
/// Interval shrinks by this much at full difficulty.
pub const SPAWN_INTERVAL_RAMP_MS: f64 = 1300.0;
/// Spawn ring radius as a fraction of the smaller viewport side.
pub const SPAWN_RING_MIN: f64 = 0.35;
pub const SPAWN_RING_MAX: f64 = 0.45;
pub const SHAPE_MIN_SIZE: f64 = 30.0;
pub const SHAPE_SIZE_RANGE: f64 = 20.0;
pub const PLAYER_HIT_RADIUS: f64 = 80.0;
pub const HIT_SHAKE: f64 = 15.0;
pub const SHAKE_DECAY: f64 = 0.9;
pub const SHAKE_CUTOFF: f64 = 0.5;
pub const HIT_FLASH: f64 = 0.4;
pub const FLASH_FADE: f64 = 0.05;

/// Rules and pacing of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    pub max_shapes: usize,
    pub start_lives: u32,
    pub hit_score: u32,
    pub time_to_max_s: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub base_spawn_interval_ms: f64,
    pub spawn_interval_ramp_ms: f64,
    pub spawn_ring_min: f64,
    pub spawn_ring_max: f64,
    pub player_hit_radius: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            max_shapes: MAX_SHAPES,
            start_lives: START_LIVES,
            hit_score: HIT_SCORE,
            time_to_max_s: TIME_TO_MAX_S,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_interval_ramp_ms: SPAWN_INTERVAL_RAMP_MS,
            spawn_ring_min: SPAWN_RING_MIN,
            spawn_ring_max: SPAWN_RING_MAX,
            player_hit_radius: PLAYER_HIT_RADIUS,
        }
    }
}

/// Small LCG for spawn placement. Not for anything security related.
#[derive(Clone, Debug)]
pub struct SpawnRng {
    state: u32,
}

impl SpawnRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from(self.state) / 4_294_967_296.0
    }

    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// Logical (CSS pixel) size of the playfield; the player sits at its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A shape drifting toward the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: u32,
    pub kind: ShapeLabel,
    pub pos: Point,
    pub size: f64,
    pub speed: f64, // pixels per frame, fixed at spawn
}

impl Shape {
    fn step_toward(&mut self, target: Point) {
        let dx = target.x - self.pos.x;
        let dy = target.y - self.pos.y;
        let dist = dx.hypot(dy);
        let dist = if dist > 0.0 { dist } else { 1.0 };
        self.pos.x += dx / dist * self.speed;
        self.pos.y += dy / dist * self.speed;
    }
}

/// Outcome notifications for the feedback layer (sound, HUD, logging).
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaEvent {
    Spawned { id: u32, kind: ShapeLabel },
    Destroyed { id: u32, kind: ShapeLabel, score: u32 },
    PlayerHit { id: u32, kind: ShapeLabel, lives: u32 },
    GameOver { score: u32 },
}

/// Complete state of one run.
#[derive(Debug)]
pub struct ArenaState {
    config: ArenaConfig,
    rng: SpawnRng,
    shapes: Vec<Shape>,
    lives: u32,
    score: u32,
    elapsed_ms: f64,
    since_spawn_ms: f64,
    next_id: u32,
    game_over: bool,
    // --- Cosmetic feedback, decays every frame ---
    shake: f64,
    flash: f64,
}

impl ArenaState {
    pub fn new(config: ArenaConfig, rng: SpawnRng) -> Self {
        Self {
            lives: config.start_lives,
            config,
            rng,
            shapes: Vec::new(),
            score: 0,
            elapsed_ms: 0.0,
            since_spawn_ms: 0.0,
            next_id: 0,
            game_over: false,
            shake: 0.0,
            flash: 0.0,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Current screen-shake amplitude in pixels.
    pub fn shake(&self) -> f64 {
        self.shake
    }

    /// Current red flash opacity in `[0, 1]`.
    pub fn flash(&self) -> f64 {
        self.flash
    }

    /// Ramps linearly from 0 to 1 over `time_to_max_s`.
    pub fn difficulty(&self) -> f64 {
        (self.elapsed_ms / 1000.0 / self.config.time_to_max_s).min(1.0)
    }

    pub fn current_speed(&self) -> f64 {
        let c = &self.config;
        c.min_speed + (c.max_speed - c.min_speed) * self.difficulty()
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.config.base_spawn_interval_ms - self.config.spawn_interval_ramp_ms * self.difficulty()
    }

    /// Adds a shape at `pos` moving at the current speed. Returns `None` when
    /// the arena is already full.
    pub fn insert_shape(&mut self, kind: ShapeLabel, pos: Point, size: f64) -> Option<u32> {
        if self.shapes.len() >= self.config.max_shapes {
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let speed = self.current_speed();
        self.shapes.push(Shape {
            id,
            kind,
            pos,
            size,
            speed,
        });
        Some(id)
    }

    fn spawn(&mut self, viewport: Viewport) -> Option<ArenaEvent> {
        if self.shapes.len() >= self.config.max_shapes {
            return None;
        }
        let angle = self.rng.next_f64() * std::f64::consts::TAU;
        let side = viewport.width.min(viewport.height);
        let (lo, hi) = (side * self.config.spawn_ring_min, side * self.config.spawn_ring_max);
        let radius = lo + self.rng.next_f64() * (hi - lo);
        let kind = ShapeLabel::ALL[self.rng.next_index(ShapeLabel::ALL.len())];
        let size = SHAPE_MIN_SIZE + self.rng.next_f64() * SHAPE_SIZE_RANGE;
        let center = viewport.center();
        let pos = Point::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius);
        let id = self.insert_shape(kind, pos, size)?;
        Some(ArenaEvent::Spawned { id, kind })
    }

    /// Advances one frame: spawning, movement, collisions and effect decay.
    /// Once the run is over only the cosmetic effects keep fading.
    pub fn tick(&mut self, delta_ms: f64, viewport: Viewport) -> Vec<ArenaEvent> {
        self.decay_effects();
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        self.elapsed_ms += delta_ms;
        self.since_spawn_ms += delta_ms;
        if self.since_spawn_ms >= self.spawn_interval_ms() {
            events.extend(self.spawn(viewport));
            self.since_spawn_ms = 0.0;
        }

        let center = viewport.center();
        let radius = self.config.player_hit_radius;
        let mut i = self.shapes.len();
        while i > 0 {
            i -= 1;
            self.shapes[i].step_toward(center);
            if self.lives > 0 && self.shapes[i].pos.distance(center) < radius {
                let shape = self.shapes.remove(i);
                self.lives -= 1;
                self.shake = HIT_SHAKE;
                self.flash = HIT_FLASH;
                events.push(ArenaEvent::PlayerHit {
                    id: shape.id,
                    kind: shape.kind,
                    lives: self.lives,
                });
            }
        }

        if self.lives == 0 {
            self.game_over = true;
            log::info!("game over with score {}", self.score);
            events.push(ArenaEvent::GameOver { score: self.score });
        }
        events
    }

    /// Removes the oldest shape of the drawn kind and awards score. Gestures
    /// that match nothing (or arrive after game over) change nothing.
    pub fn apply_gesture(&mut self, label: Option<ShapeLabel>) -> Option<ArenaEvent> {
        let kind = label?;
        if self.game_over {
            return None;
        }
        let idx = self.shapes.iter().position(|s| s.kind == kind)?;
        let shape = self.shapes.remove(idx);
        self.score += self.config.hit_score;
        Some(ArenaEvent::Destroyed {
            id: shape.id,
            kind,
            score: self.score,
        })
    }

    fn decay_effects(&mut self) {
        if self.shake > 0.0 {
            self.shake *= SHAKE_DECAY;
            if self.shake < SHAKE_CUTOFF {
                self.shake = 0.0;
            }
        }
        self.flash = (self.flash - FLASH_FADE).max(0.0);
    }
}
