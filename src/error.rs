//! Engine error taxonomy
//!
//! Two failure classes exist: fatal construction errors (the rendering
//! backend cannot be brought up) and commands issued after teardown. The
//! animation tick itself is total: update rules never fail, they skip
//! disposed renderables instead.

use thiserror::Error;

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the weather engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The hosting 3D runtime is unavailable. Fatal to this engine
    /// instance; surfaced once at construction, never retried internally.
    #[error("render backend unavailable: {reason}")]
    Init { reason: String },

    /// A command was issued after `teardown()`. The caller should stop
    /// issuing commands to this instance.
    #[error("engine has been torn down")]
    Disposed,
}

impl EngineError {
    /// Build an `Init` error from any displayable cause
    pub fn init(reason: impl Into<String>) -> Self {
        EngineError::Init {
            reason: reason.into(),
        }
    }
}
