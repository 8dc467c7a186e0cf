//! Platform abstraction layer
//!
//! Pointer input as the simulation sees it, plus a seeded scripted source
//! that stands in for a window when running headless.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Discrete input events delivered once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Primary button; diagnostic only
    PrimaryPress(Vec2),
    /// Secondary button; drops a ball at the pointer
    SecondaryPress(Vec2),
    /// Window closed
    Quit,
    /// Escape key
    Cancel,
}

impl PointerEvent {
    /// True for events that end the frame loop
    pub fn ends_session(&self) -> bool {
        matches!(self, PointerEvent::Quit | PointerEvent::Cancel)
    }
}

/// Seeded stand-in for a user clicking around the machine
#[derive(Debug, Clone)]
pub struct ScriptedPointer {
    rng: Pcg32,
    /// Frames between secondary clicks (0 = never click)
    spawn_every: u64,
    /// Frames to run before sending `Quit`
    frames: u64,
    /// Clicks land uniformly inside this box
    drop_min: Vec2,
    drop_max: Vec2,
    frame: u64,
}

impl ScriptedPointer {
    pub fn new(seed: u64, spawn_every: u64, frames: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spawn_every,
            frames,
            drop_min: Vec2::new(60.0, 60.0),
            drop_max: Vec2::new(1290.0, 200.0),
            frame: 0,
        }
    }

    /// Restrict clicks to the box spanned by `min` and `max`
    pub fn with_drop_zone(mut self, min: Vec2, max: Vec2) -> Self {
        self.drop_min = min.min(max);
        self.drop_max = min.max(max);
        self
    }

    /// Events for the next frame
    pub fn poll(&mut self) -> Vec<PointerEvent> {
        self.frame += 1;
        if self.frame > self.frames {
            return vec![PointerEvent::Quit];
        }
        if self.spawn_every == 0 || self.frame % self.spawn_every != 0 {
            return Vec::new();
        }
        let x = self.sample(self.drop_min.x, self.drop_max.x);
        let y = self.sample(self.drop_min.y, self.drop_max.y);
        vec![PointerEvent::SecondaryPress(Vec2::new(x, y))]
    }

    fn sample(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            lo
        }
    }
}
