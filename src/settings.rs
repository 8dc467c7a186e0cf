//! Scene presets
//!
//! Immutable records handed to the scene assembler and the spawn handler.
//! Defaults reproduce the stock machine; a JSON file can override any
//! subset of fields. Everything is validated once, before any entity exists.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SceneError;
use crate::is_finite_point;
use crate::sim::world::Color;

fn ensure_positive(entity: &'static str, field: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            entity,
            format!("{field} must be positive, got {value}"),
        ))
    }
}

fn ensure_non_negative(entity: &'static str, field: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            entity,
            format!("{field} must be non-negative, got {value}"),
        ))
    }
}

fn ensure_finite(entity: &'static str, field: &str, point: Vec2) -> Result<(), SceneError> {
    if is_finite_point(point) {
        Ok(())
    } else {
        Err(SceneError::invalid(
            entity,
            format!("{field} must be finite, got {point}"),
        ))
    }
}

fn ensure_segment(entity: &'static str, start: Vec2, end: Vec2) -> Result<(), SceneError> {
    ensure_finite(entity, "start", start)?;
    ensure_finite(entity, "end", end)?;
    if start == end {
        return Err(SceneError::invalid(
            entity,
            format!("zero-length segment at {start}"),
        ));
    }
    Ok(())
}

fn ensure_fraction(entity: &'static str, field: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            entity,
            format!("{field} must be in (0, 1], got {value}"),
        ))
    }
}

/// Global world parameters, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Gravity in pixels/s² (y down)
    pub gravity: Vec2,
    /// Fraction of velocity kept per second of free motion
    pub damping: f32,
    /// Fixed step in seconds
    pub time_step: f32,
    /// Multiplier applied to every dynamic angular velocity after each step
    pub angular_damping: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(GRAVITY.0, GRAVITY.1),
            damping: DAMPING,
            time_step: TIME_STEP,
            angular_damping: ANGULAR_DAMPING,
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_finite("world", "gravity", self.gravity)?;
        ensure_fraction("world", "damping", self.damping)?;
        ensure_positive("world", "time_step", self.time_step)?;
        ensure_fraction("world", "angular_damping", self.angular_damping)
    }
}

/// Ball parameters; the color is the same for every ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPreset {
    pub mass: f32,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
}

impl Default for BallPreset {
    /// The primary ball spawned on secondary clicks
    fn default() -> Self {
        Self {
            mass: 0.10,
            radius: 11.5,
            friction: 0.4,
            elasticity: 0.75,
        }
    }
}

impl BallPreset {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_positive("ball", "mass", self.mass)?;
        ensure_positive("ball", "radius", self.radius)?;
        ensure_non_negative("ball", "friction", self.friction)?;
        ensure_non_negative("ball", "elasticity", self.elasticity)
    }
}

/// Static ramp material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentPreset {
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub color: Color,
}

impl Default for SegmentPreset {
    /// Wood
    fn default() -> Self {
        Self {
            radius: 5.0,
            friction: 0.4,
            elasticity: 0.5,
            color: Color(WOOD_COLOR),
        }
    }
}

impl SegmentPreset {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_positive("segment", "radius", self.radius)?;
        ensure_non_negative("segment", "friction", self.friction)?;
        ensure_non_negative("segment", "elasticity", self.elasticity)
    }
}

/// One play-field wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPreset {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    pub friction: f32,
    pub elasticity: f32,
}

impl BoundaryPreset {
    pub fn new(start: Vec2, end: Vec2, elasticity: f32) -> Self {
        Self {
            start,
            end,
            thickness: 5.0,
            friction: 0.5,
            elasticity,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_segment("boundary", self.start, self.end)?;
        ensure_positive("boundary", "thickness", self.thickness)?;
        ensure_non_negative("boundary", "friction", self.friction)?;
        ensure_non_negative("boundary", "elasticity", self.elasticity)
    }
}

/// Left, right, top and bottom walls. Side walls keep balls in play; the
/// floor absorbs more energy.
pub fn default_boundaries() -> Vec<BoundaryPreset> {
    vec![
        BoundaryPreset::new(Vec2::new(0.0, 38.0), Vec2::new(0.0, 690.0), 0.8),
        BoundaryPreset::new(Vec2::new(1353.0, 38.0), Vec2::new(1353.0, 690.0), 0.8),
        BoundaryPreset::new(Vec2::new(0.0, 38.0), Vec2::new(1353.0, 38.0), 0.8),
        BoundaryPreset::new(Vec2::new(0.0, 690.0), Vec2::new(1353.0, 690.0), 0.4),
    ]
}

/// Ramps and shelves, all built from the wood preset
pub fn default_ramps() -> Vec<[Vec2; 2]> {
    vec![
        [Vec2::new(6.0, 70.0), Vec2::new(223.0, 120.0)],
        [Vec2::new(223.0, 120.0), Vec2::new(433.0, 120.0)],
        // Shelf under the ball stack
        [Vec2::new(40.0, 300.0), Vec2::new(200.0, 300.0)],
        // Chute from the stick down to the domino shelf
        [Vec2::new(380.0, 260.0), Vec2::new(560.0, 380.0)],
        // Domino shelf
        [Vec2::new(560.0, 450.0), Vec2::new(1010.0, 450.0)],
    ]
}

/// A column of resting balls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallStack {
    /// Centre of the lowest ball
    pub base: Vec2,
    pub count: usize,
    /// Vertical clearance between neighbouring balls
    pub gap: f32,
}

impl Default for BallStack {
    fn default() -> Self {
        Self {
            base: Vec2::new(120.0, 283.0),
            count: 6,
            gap: 0.5,
        }
    }
}

impl BallStack {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_finite("ball stack", "base", self.base)?;
        ensure_non_negative("ball stack", "gap", self.gap)
    }
}

/// Bar pinned to the world at `pivot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickPreset {
    pub start: Vec2,
    pub end: Vec2,
    pub pivot: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub color: Color,
}

impl Default for StickPreset {
    fn default() -> Self {
        Self {
            start: Vec2::new(440.0, 180.0),
            end: Vec2::new(540.0, 180.0),
            pivot: Vec2::new(490.0, 180.0),
            mass: 1.0,
            radius: 4.0,
            friction: 0.5,
            elasticity: 0.3,
            color: Color(WOOD_COLOR),
        }
    }
}

impl StickPreset {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_segment("stick", self.start, self.end)?;
        ensure_finite("stick", "pivot", self.pivot)?;
        ensure_positive("stick", "mass", self.mass)?;
        ensure_positive("stick", "radius", self.radius)?;
        ensure_non_negative("stick", "friction", self.friction)?;
        ensure_non_negative("stick", "elasticity", self.elasticity)
    }
}

/// Plank balanced on a pivot at its midpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverPreset {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    pub mass: f32,
    #[serde(default = "default_lever_friction")]
    pub friction: f32,
    #[serde(default = "default_lever_elasticity")]
    pub elasticity: f32,
    #[serde(default = "default_lever_color")]
    pub color: Color,
}

fn default_lever_friction() -> f32 {
    0.6
}

fn default_lever_elasticity() -> f32 {
    0.2
}

fn default_lever_color() -> Color {
    Color(WOOD_COLOR)
}

impl LeverPreset {
    pub fn new(start: Vec2, end: Vec2, thickness: f32, mass: f32) -> Self {
        Self {
            start,
            end,
            thickness,
            mass,
            friction: default_lever_friction(),
            elasticity: default_lever_elasticity(),
            color: default_lever_color(),
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_segment("lever", self.start, self.end)?;
        ensure_positive("lever", "thickness", self.thickness)?;
        ensure_positive("lever", "mass", self.mass)?;
        ensure_non_negative("lever", "friction", self.friction)?;
        ensure_non_negative("lever", "elasticity", self.elasticity)
    }
}

/// Row of identical dominoes standing on a shelf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominoPreset {
    pub count: usize,
    /// Centre of the first domino; every domino shares its y
    pub start: Vec2,
    pub width: f32,
    pub height: f32,
    pub mass: f32,
    pub friction: f32,
    pub elasticity: f32,
    /// Gap between neighbours as a fraction of the height
    pub spacing_factor: f32,
    pub color: Color,
}

impl Default for DominoPreset {
    fn default() -> Self {
        Self {
            count: 12,
            start: Vec2::new(600.0, 419.5),
            width: 10.0,
            height: 50.0,
            mass: 0.2,
            friction: 0.6,
            elasticity: 0.1,
            spacing_factor: 0.5,
            color: Color([70, 110, 160, 255]),
        }
    }
}

impl DominoPreset {
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_finite("domino", "start", self.start)?;
        ensure_positive("domino", "width", self.width)?;
        ensure_positive("domino", "height", self.height)?;
        ensure_positive("domino", "mass", self.mass)?;
        ensure_positive("domino", "spacing_factor", self.spacing_factor)?;
        ensure_non_negative("domino", "friction", self.friction)?;
        ensure_non_negative("domino", "elasticity", self.elasticity)
    }
}

/// The swinging bob of a pendulum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumMass {
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub color: Color,
}

impl Default for PendulumMass {
    fn default() -> Self {
        Self {
            pos: Vec2::new(1030.0, 420.0),
            mass: 1.0,
            radius: 18.0,
            friction: 0.5,
            elasticity: 0.4,
            color: Color([150, 150, 160, 255]),
        }
    }
}

/// Rope drawn from the bob up to the anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopePreset {
    pub radius: f32,
    pub color: Color,
}

impl Default for RopePreset {
    fn default() -> Self {
        Self {
            radius: 2.0,
            color: Color([60, 60, 60, 255]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumPreset {
    /// Pivot point the rope hangs from
    pub anchor: Vec2,
    pub pendulum_mass: PendulumMass,
    pub rope: RopePreset,
}

impl Default for PendulumPreset {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(1030.0, 250.0),
            pendulum_mass: PendulumMass::default(),
            rope: RopePreset::default(),
        }
    }
}

impl PendulumPreset {
    /// Rope end in bob-local coordinates
    pub fn rope_offset(&self) -> Vec2 {
        self.anchor - self.pendulum_mass.pos
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let bob = &self.pendulum_mass;
        ensure_segment("pendulum", bob.pos, self.anchor)?;
        ensure_positive("pendulum", "mass", bob.mass)?;
        ensure_positive("pendulum", "radius", bob.radius)?;
        ensure_positive("pendulum", "rope radius", self.rope.radius)?;
        ensure_non_negative("pendulum", "friction", bob.friction)?;
        ensure_non_negative("pendulum", "elasticity", bob.elasticity)
    }
}

/// Complete description of the machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub world: WorldParams,
    /// Preset for balls in the initial stack and spawned by the user
    pub primary_ball: BallPreset,
    /// Material for every ramp
    pub wood: SegmentPreset,
    pub boundaries: Vec<BoundaryPreset>,
    pub ramps: Vec<[Vec2; 2]>,
    pub ball_stack: BallStack,
    pub stick: StickPreset,
    pub dominoes: DominoPreset,
    pub pendulum: PendulumPreset,
    /// Optional see-saws; the stock machine has none
    pub levers: Vec<LeverPreset>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            world: WorldParams::default(),
            primary_ball: BallPreset::default(),
            wood: SegmentPreset::default(),
            boundaries: default_boundaries(),
            ramps: default_ramps(),
            ball_stack: BallStack::default(),
            stick: StickPreset::default(),
            dominoes: DominoPreset::default(),
            pendulum: PendulumPreset::default(),
            levers: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Check every preset; the first violation wins
    pub fn validate(&self) -> Result<(), SceneError> {
        self.world.validate()?;
        self.primary_ball.validate()?;
        self.wood.validate()?;
        for boundary in &self.boundaries {
            boundary.validate()?;
        }
        for [start, end] in &self.ramps {
            ensure_segment("segment", *start, *end)?;
        }
        self.ball_stack.validate()?;
        self.stick.validate()?;
        self.dominoes.validate()?;
        self.pendulum.validate()?;
        for lever in &self.levers {
            lever.validate()?;
        }
        Ok(())
    }

    /// Parse JSON overrides; missing fields keep their defaults
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, SceneError> {
        let config: SceneConfig =
            serde_json::from_str(text).map_err(|e| SceneError::malformed(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a scene file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SceneError::from_io(path, e))?;
        let config = Self::from_json(&text, path)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn test_stock_machine_shape() {
        let config = SceneConfig::default();
        assert_eq!(config.boundaries.len(), 4);
        assert_eq!(config.dominoes.count, 12);
        assert_eq!(config.ball_stack.count, 6);
        assert!(config.levers.is_empty());
        // Floor is less bouncy than the other walls
        assert!(config.boundaries[3].elasticity < config.boundaries[0].elasticity);
    }

    #[test]
    fn test_zero_ball_mass_rejected() {
        let mut config = SceneConfig::default();
        config.primary_ball.mass = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidEntityParameters { entity: "ball", .. }
        ));
    }

    #[test]
    fn test_degenerate_ramp_rejected() {
        let mut config = SceneConfig::default();
        config.ramps.push([Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_damping_out_of_range_rejected() {
        let mut config = SceneConfig::default();
        config.world.angular_damping = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let text = r#"{ "primary_ball": { "radius": 20 }, "dominoes": { "count": 3 } }"#;
        let config = SceneConfig::from_json(text, Path::new("scene.json")).unwrap();
        assert_eq!(config.primary_ball.radius, 20.0);
        assert_eq!(config.primary_ball.mass, BallPreset::default().mass);
        assert_eq!(config.dominoes.count, 3);
        assert_eq!(config.boundaries, default_boundaries());
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let err = SceneConfig::from_json("{ not json", Path::new("scene.json")).unwrap_err();
        assert!(matches!(err, SceneError::ConfigMalformed { .. }));
    }

    #[test]
    fn test_missing_scene_file() {
        let err = SceneConfig::load("/definitely/not/here/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_pendulum_rope_offset() {
        let pendulum = PendulumPreset::default();
        let offset = pendulum.rope_offset();
        assert_eq!(pendulum.pendulum_mass.pos + offset, pendulum.anchor);
    }

    #[test]
    fn test_lever_json_defaults() {
        let text = r#"{ "levers": [ { "start": [100, 500], "end": [300, 500], "thickness": 6, "mass": 2 } ] }"#;
        let config = SceneConfig::from_json(text, Path::new("scene.json")).unwrap();
        assert_eq!(config.levers.len(), 1);
        assert_eq!(config.levers[0].friction, default_lever_friction());
    }
}
