//! Player pose: a short swing on every finished stroke, and a final pose once
//! the run is lost.

use super::state::SpawnRng;

/// How long a swing pose stays up before returning to idle.
pub const SWING_MS: f64 = 150.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerPose {
    #[default]
    Idle,
    SwingLow,
    SwingHigh,
    Dead,
}

/// Tracks the current pose and when a swing ends.
#[derive(Clone, Debug, Default)]
pub struct PlayerAnimator {
    pose: PlayerPose,
    swing_until_ms: f64,
}

impl PlayerAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> PlayerPose {
        self.pose
    }

    /// Picks one of the two swing poses at random. No effect once dead.
    pub fn swing(&mut self, now_ms: f64, rng: &mut SpawnRng) {
        if self.pose == PlayerPose::Dead {
            return;
        }
        self.pose = if rng.next_f64() > 0.5 {
            PlayerPose::SwingLow
        } else {
            PlayerPose::SwingHigh
        };
        self.swing_until_ms = now_ms + SWING_MS;
    }

    /// Returns an expired swing to idle.
    pub fn update(&mut self, now_ms: f64) {
        if matches!(self.pose, PlayerPose::SwingLow | PlayerPose::SwingHigh)
            && now_ms >= self.swing_until_ms
        {
            self.pose = PlayerPose::Idle;
        }
    }

    pub fn kill(&mut self) {
        self.pose = PlayerPose::Dead;
    }
}
