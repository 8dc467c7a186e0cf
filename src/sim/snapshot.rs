//! Completed-state snapshots for drawing
//!
//! A snapshot is an owned copy of every body, collider and pivot taken
//! between steps, so a renderer never reads the world mid-step.

use serde::Serialize;

use super::world::{BodyView, ColliderView, ConstraintView, World};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    /// Steps completed when the snapshot was taken
    pub step: u64,
    pub bodies: Vec<BodyView>,
    pub colliders: Vec<ColliderView>,
    pub constraints: Vec<ConstraintView>,
}

impl SceneSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl World {
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            step: self.steps(),
            bodies: self.bodies().collect(),
            colliders: self.colliders().collect(),
            constraints: self.constraints().collect(),
        }
    }
}
