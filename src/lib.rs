//! Tempest Engine: a real-time particle engine for stylized weather
//!
//! The engine renders one of six weather effects (rain, snow, sun,
//! clouds, thunderstorm, mist) into a 3D scene and advances it once per
//! display frame. External collaborators select effects, toggle pause,
//! and cycle camera views through [`WeatherEngine`]'s command surface;
//! everything renderable is owned by the engine's particle registry.

pub mod engine;
pub mod error;
pub mod particles;
pub mod renderer;
pub mod scene;
pub mod weather;

pub use engine::{Playback, WeatherEngine};
pub use error::{EngineError, EngineResult};
pub use particles::{ParticleKind, ParticleRegistry};
pub use scene::{Camera, Scene, ViewController};
pub use weather::WeatherCondition;

/// Engine configuration handed to construction
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Effect built at startup
    pub initial_condition: WeatherCondition,
    /// Intensity multiplier for particle counts
    pub intensity: f32,
    /// Fixed RNG seed for deterministic runs; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "Tempest Engine".to_string(),
            window_width: 1280,
            window_height: 720,
            initial_condition: WeatherCondition::Sunny,
            intensity: 1.0,
            rng_seed: None,
        }
    }
}
