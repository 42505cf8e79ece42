use serde::{Deserialize, Serialize};

use crate::particles::renderable::Renderable;

/// Closed set of particle-group categories. The kind selects the update
/// rule and never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Rain,
    Snow,
    Sun,
    Ray,
    Lightning,
    Cloud,
    Floating,
    Mist,
}

impl ParticleKind {
    /// Kinds backed by a mutable position buffer rather than a mesh
    pub fn is_point_cloud(&self) -> bool {
        matches!(
            self,
            ParticleKind::Rain | ParticleKind::Snow | ParticleKind::Floating | ParticleKind::Mist
        )
    }
}

/// Per-group motion parameters. Flat struct; each kind reads the fields
/// its rule needs. `flash_until` is the deferred lightning-flash expiry,
/// keyed by the engine's tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// Fall or drift rate for rain/snow/mist/floating
    pub speed: f32,
    /// Self-rotation rate for sun/ray
    pub rotation_speed: f32,
    /// Horizontal drift rate for clouds
    pub drift_speed: f32,
    /// Tick at which an active lightning flash reverts to transparent
    pub flash_until: Option<u64>,
}

impl Motion {
    pub fn falling(speed: f32) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn spinning(rotation_speed: f32) -> Self {
        Self {
            rotation_speed,
            ..Self::default()
        }
    }

    pub fn drifting(drift_speed: f32) -> Self {
        Self {
            drift_speed,
            ..Self::default()
        }
    }
}

/// One managed unit of animated geometry with a single motion rule
#[derive(Debug)]
pub struct ParticleGroup {
    pub kind: ParticleKind,
    pub renderable: Renderable,
    pub motion: Motion,
}

impl ParticleGroup {
    pub fn new(kind: ParticleKind, renderable: Renderable, motion: Motion) -> Self {
        Self {
            kind,
            renderable,
            motion,
        }
    }
}
