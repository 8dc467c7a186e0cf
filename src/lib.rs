//! Goldberg Machine - a 2D chain-reaction rigid-body scene
//!
//! Core modules:
//! - `sim`: World wrapper, entity factory, scene assembly, stepping
//! - `settings`: Typed scene presets (balls, ramps, dominoes, pendulum)
//! - `platform`: Pointer input events and a scripted event source
//! - `error`: Startup and runtime error taxonomy

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::SceneError;
pub use settings::SceneConfig;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Window dimensions the default layout is drawn for
    pub const SCREEN_WIDTH: u32 = 1200;
    pub const SCREEN_HEIGHT: u32 = 800;

    /// Frame rate the fixed quantum is derived from
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep
    pub const TIME_STEP: f32 = 1.0 / FPS as f32;

    /// Gravity in pixels/s² (y grows downward)
    pub const GRAVITY: (f32, f32) = (0.0, 981.0);
    /// Fraction of velocity a body keeps after one second of free flight
    pub const DAMPING: f32 = 0.99;
    /// Per-step multiplier applied to every dynamic body's angular velocity
    pub const ANGULAR_DAMPING: f32 = 0.99;

    /// Display color of every ball
    pub const BALL_COLOR: [u8; 4] = [248, 196, 113, 255];
    /// Wood color used for ramps
    pub const WOOD_COLOR: [u8; 4] = [101, 67, 33, 255];

    /// Dynamic bodies above this count make a 60 Hz step noticeably slow
    pub const DYNAMIC_BODY_SOFT_LIMIT: usize = 2000;
}

/// Angle of the vector from `start` to `end`
#[inline]
pub fn segment_angle(start: Vec2, end: Vec2) -> f32 {
    let d = end - start;
    d.y.atan2(d.x)
}

/// True if every component of the vector is finite
#[inline]
pub fn is_finite_point(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
