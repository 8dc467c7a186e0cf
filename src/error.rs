//! Error taxonomy for scene loading, assembly and stepping.
//!
//! Every variant is fatal: startup errors abort before the first step and
//! step failures halt the frame loop.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::BodyId;

/// Errors raised while loading, building or stepping a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The geometry or scene file does not exist.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The file exists but does not describe a valid document.
    #[error("malformed config {}: {reason}", path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entity was described with out-of-range values.
    #[error("invalid {entity} parameters: {reason}")]
    InvalidEntityParameters { entity: &'static str, reason: String },

    /// The engine left a body in a non-finite state.
    #[error("physics step {step} left body {body} with a non-finite state")]
    EngineStepFailure { step: u64, body: BodyId },
}

impl SceneError {
    pub(crate) fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        SceneError::InvalidEntityParameters {
            entity,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SceneError::ConfigMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map a failed file read onto `ConfigNotFound` or `Io`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SceneError::ConfigNotFound { path }
        } else {
            SceneError::Io { path, source }
        }
    }

    /// True for errors raised before any entity is created
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            SceneError::ConfigNotFound { .. } | SceneError::ConfigMalformed { .. } | SceneError::Io { .. }
        )
    }
}
