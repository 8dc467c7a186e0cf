//! Hole geometry loading
//!
//! A geometry file lists funnel-shaped holes, either as a JSON array of
//! records or as an object keyed by hole name. File order is kept.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::world::Color;
use crate::error::SceneError;
use crate::is_finite_point;

/// One funnel: two slanted walls and a bottom, all thick segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleDescriptor {
    #[serde(default)]
    pub name: String,
    pub left_wall: [Vec2; 2],
    pub right_wall: [Vec2; 2],
    pub bottom: [Vec2; 2],
    /// Segment thickness
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub color: Color,
}

impl HoleDescriptor {
    /// The three walls in creation order: left, right, bottom
    pub fn walls(&self) -> [[Vec2; 2]; 3] {
        [self.left_wall, self.right_wall, self.bottom]
    }

    fn check(&self) -> Result<(), String> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(format!("radius must be positive, got {}", self.radius));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(format!("friction must be non-negative, got {}", self.friction));
        }
        if !(self.elasticity.is_finite() && self.elasticity >= 0.0) {
            return Err(format!(
                "elasticity must be non-negative, got {}",
                self.elasticity
            ));
        }
        for (label, [a, b]) in ["left_wall", "right_wall", "bottom"]
            .into_iter()
            .zip(self.walls())
        {
            if !is_finite_point(a) || !is_finite_point(b) {
                return Err(format!("{label} has a non-finite point"));
            }
            if a == b {
                return Err(format!("{label} has zero length"));
            }
        }
        Ok(())
    }
}

/// Load every hole from a geometry file.
///
/// All or nothing: any bad record fails the whole file.
pub fn load_holes(path: impl AsRef<Path>) -> Result<Vec<HoleDescriptor>, SceneError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| SceneError::from_io(path, e))?;
    let holes = parse_holes(&text, path)?;
    log::info!("Loaded {} holes from {}", holes.len(), path.display());
    Ok(holes)
}

/// Parse geometry text; `origin` names the source in errors
pub fn parse_holes(text: &str, origin: &Path) -> Result<Vec<HoleDescriptor>, SceneError> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| SceneError::malformed(origin, e.to_string()))?;

    let records: Vec<(Option<String>, Value)> = match document {
        Value::Array(items) => items.into_iter().map(|v| (None, v)).collect(),
        Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        other => {
            return Err(SceneError::malformed(
                origin,
                format!("expected a list or map of holes, found {}", kind_of(&other)),
            ));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, (key, value))| {
            let label = key.clone().unwrap_or_else(|| format!("#{index}"));
            let mut hole: HoleDescriptor = serde_json::from_value(value)
                .map_err(|e| SceneError::malformed(origin, format!("hole {label}: {e}")))?;
            if let Some(key) = key {
                hole.name = key;
            } else if hole.name.is_empty() {
                hole.name = format!("hole{index}");
            }
            hole.check()
                .map_err(|reason| SceneError::malformed(origin, format!("hole {label}: {reason}")))?;
            Ok(hole)
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_HOLE: &str = r#"[
        {
            "left_wall": [[0, 0], [0, 10]],
            "right_wall": [[10, 0], [10, 10]],
            "bottom": [[0, 10], [10, 10]],
            "radius": 2,
            "friction": 0.4,
            "elasticity": 0.5,
            "color": [0, 0, 0, 255]
        }
    ]"#;

    fn origin() -> &'static Path {
        Path::new("holes.json")
    }

    #[test]
    fn test_parse_single_hole() {
        let holes = parse_holes(ONE_HOLE, origin()).unwrap();
        assert_eq!(holes.len(), 1);
        let hole = &holes[0];
        assert_eq!(hole.name, "hole0");
        assert_eq!(hole.left_wall, [Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0)]);
        assert_eq!(hole.bottom[1], Vec2::new(10.0, 10.0));
        assert_eq!(hole.radius, 2.0);
        assert_eq!(hole.color, Color([0, 0, 0, 255]));
    }

    #[test]
    fn test_named_map_keeps_file_order() {
        let text = r#"{
            "zeta": { "left_wall": [[0,0],[0,1]], "right_wall": [[1,0],[1,1]], "bottom": [[0,1],[1,1]],
                      "radius": 1, "friction": 0.1, "elasticity": 0.1, "color": [1,2,3,4] },
            "alpha": { "left_wall": [[5,0],[5,1]], "right_wall": [[6,0],[6,1]], "bottom": [[5,1],[6,1]],
                       "radius": 1, "friction": 0.1, "elasticity": 0.1, "color": [1,2,3,4] }
        }"#;
        let holes = parse_holes(text, origin()).unwrap();
        let names: Vec<_> = holes.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_radius_is_malformed() {
        let text = ONE_HOLE.replace("\"radius\": 2,", "");
        let err = parse_holes(&text, origin()).unwrap_err();
        match err {
            SceneError::ConfigMalformed { reason, .. } => assert!(reason.contains("radius")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        // A wall with a single point
        let text = ONE_HOLE.replace("[[0, 0], [0, 10]]", "[[0, 0]]");
        assert!(matches!(
            parse_holes(&text, origin()),
            Err(SceneError::ConfigMalformed { .. })
        ));

        // Color channel out of range
        let text = ONE_HOLE.replace("[0, 0, 0, 255]", "[0, 0, 0, 256]");
        assert!(matches!(
            parse_holes(&text, origin()),
            Err(SceneError::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn test_negative_radius_is_malformed() {
        let text = ONE_HOLE.replace("\"radius\": 2", "\"radius\": -2");
        assert!(matches!(
            parse_holes(&text, origin()),
            Err(SceneError::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn test_scalar_document_is_malformed() {
        let err = parse_holes("42", origin()).unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_holes("/no/such/dir/holes.json").unwrap_err();
        assert!(matches!(err, SceneError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_bundled_asset() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/holes.json");
        let holes = load_holes(path).unwrap();
        assert!(!holes.is_empty());
        assert!(holes.iter().all(|h| !h.name.is_empty()));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("goldberg-holes-{}.json", std::process::id()));
        std::fs::write(&path, ONE_HOLE).unwrap();
        let holes = load_holes(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(holes.len(), 1);
    }
}
