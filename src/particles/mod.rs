//! Particle groups, the registry arena, effect builders, and motion rules

pub mod effects;
pub mod group;
pub mod registry;
pub mod renderable;
pub mod update;

pub use group::{Motion, ParticleGroup, ParticleKind};
pub use registry::ParticleRegistry;
pub use renderable::{Geometry, Material, MeshGroup, MeshInstance, PointCloud, Renderable, Shape, Transform};
pub use update::{update_groups, FRAME_DT};
