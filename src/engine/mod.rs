//! Engine command surface and per-frame orchestration
//!
//! All state is mutated inside the per-frame tick or in direct response
//! to an external command, never concurrently. The UI/network layer
//! lives elsewhere and talks to the engine only through these commands.

pub mod scheduler;
pub mod stats;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::window::Window;

use crate::error::{EngineError, EngineResult};
use crate::particles::effects;
use crate::particles::update::update_groups;
use crate::particles::ParticleRegistry;
use crate::renderer::RenderHost;
use crate::scene::{Camera, Scene, ViewController, ViewPreset};
use crate::weather::WeatherCondition;
use crate::EngineConfig;

pub use scheduler::{Playback, Scheduler};
pub use stats::StatsCollector;

/// The weather engine: one scene, one camera, the particle arena, and the
/// animation loop state. Owns every renderable resource transitively; no
/// external collaborator holds references past a teardown or effect
/// switch.
pub struct WeatherEngine {
    scene: Scene,
    camera: Camera,
    views: ViewController,
    registry: ParticleRegistry,
    scheduler: Scheduler,
    stats: StatsCollector,
    rng: StdRng,
    ticks: u64,
    effect: WeatherCondition,
    intensity: f32,
    host: Option<RenderHost>,
    disposed: bool,
}

impl WeatherEngine {
    /// Bring up the engine with a GPU render host bound to `window`.
    /// Fails with [`EngineError::Init`] when the backend is unavailable;
    /// there is no retry; the engine simply does not start.
    pub fn new(config: &EngineConfig, window: Arc<Window>) -> EngineResult<Self> {
        let host = RenderHost::initialize(window, config.window_width, config.window_height)?;
        Ok(Self::assemble(config, Some(host)))
    }

    /// Engine without a render surface: the full simulation runs, render
    /// calls are skipped. Used by tests and host-less embedding.
    pub fn headless(config: &EngineConfig) -> Self {
        Self::assemble(config, None)
    }

    fn assemble(config: &EngineConfig, host: Option<RenderHost>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Self {
            scene: Scene::new(),
            camera: Camera::new(config.window_width, config.window_height),
            views: ViewController::new(),
            registry: ParticleRegistry::new(),
            scheduler: Scheduler::new(),
            stats: StatsCollector::new(),
            rng,
            ticks: 0,
            effect: config.initial_condition,
            intensity: config.intensity,
            host,
            disposed: false,
        };
        engine.scheduler.start();
        engine.apply(config.initial_condition, config.intensity);
        engine
    }

    fn ensure_live(&self) -> EngineResult<()> {
        if self.disposed {
            Err(EngineError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Replace the whole particle population with the named effect.
    /// Idempotent: selecting the current effect rebuilds it from scratch.
    pub fn select_effect(
        &mut self,
        condition: WeatherCondition,
        intensity: f32,
    ) -> EngineResult<()> {
        self.ensure_live()?;
        self.apply(condition, intensity);
        Ok(())
    }

    /// Resolve a free-text condition description, then select the effect.
    /// Returns the resolved tag for the caller's status display.
    pub fn select_effect_described(
        &mut self,
        description: &str,
        intensity: f32,
    ) -> EngineResult<WeatherCondition> {
        let condition = WeatherCondition::from_description(description);
        self.select_effect(condition, intensity)?;
        Ok(condition)
    }

    fn apply(&mut self, condition: WeatherCondition, intensity: f32) {
        effects::apply_effect(
            condition,
            intensity,
            &mut self.scene,
            &mut self.registry,
            &mut self.rng,
        );
        self.effect = condition;
        self.intensity = intensity;
        log::info!(
            "weather set to {} ({} groups, {} particles)",
            condition,
            self.registry.len(),
            self.registry.particle_count()
        );
    }

    /// One frame: advance the simulation when running, then draw. A
    /// paused tick still renders the frozen scene; after a stop (only
    /// reachable through teardown) nothing happens at all.
    pub fn tick(&mut self) -> EngineResult<()> {
        self.ensure_live()?;
        match self.scheduler.playback() {
            Playback::Stopped => return Ok(()),
            Playback::Paused => {}
            Playback::Running => {
                self.ticks += 1;
                update_groups(&mut self.registry, self.ticks, &mut self.rng);
                self.stats.sample_frame();
            }
        }
        self.render();
        Ok(())
    }

    fn render(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if let Err(e) = host.render_frame(&self.scene, &self.camera, &mut self.registry) {
            match e {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => host.reconfigure(),
                wgpu::SurfaceError::OutOfMemory => {
                    log::error!("render surface out of memory");
                }
                other => log::warn!("dropped frame: {other:?}"),
            }
        }
    }

    /// Flip Running <-> Paused; returns the new state for status displays
    pub fn toggle_pause(&mut self) -> EngineResult<Playback> {
        self.ensure_live()?;
        Ok(self.scheduler.toggle())
    }

    /// Advance the camera to the next fixed preset
    pub fn cycle_view(&mut self) -> EngineResult<&'static ViewPreset> {
        self.ensure_live()?;
        Ok(self.views.cycle(&mut self.camera))
    }

    /// Jump the camera back to the front preset
    pub fn reset_view(&mut self) -> EngineResult<&'static ViewPreset> {
        self.ensure_live()?;
        Ok(self.views.reset(&mut self.camera))
    }

    /// Track a host viewport change. Safe to call at any time; zero-sized
    /// viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        self.ensure_live()?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.camera.resize(width, height);
        if let Some(host) = self.host.as_mut() {
            host.resize(width, height);
        }
        Ok(())
    }

    /// Release everything: stop the loop, dispose all particle groups,
    /// drop the GPU host. A second call is a no-op; any later command
    /// answers [`EngineError::Disposed`].
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.stop();
        self.registry.clear();
        self.scene.clear_fog();
        if let Some(host) = self.host.take() {
            host.teardown();
        }
        self.disposed = true;
        log::info!("engine torn down after {} ticks", self.ticks);
    }

    // Read-only queries

    pub fn current_fps(&self) -> u32 {
        self.stats.fps()
    }

    pub fn current_particle_count(&self) -> usize {
        self.registry.particle_count()
    }

    pub fn current_effect(&self) -> WeatherCondition {
        self.effect
    }

    pub fn current_intensity(&self) -> f32 {
        self.intensity
    }

    pub fn current_view_index(&self) -> usize {
        self.views.index()
    }

    pub fn playback(&self) -> Playback {
        self.scheduler.playback()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn registry(&self) -> &ParticleRegistry {
        &self.registry
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for WeatherEngine {
    fn drop(&mut self) {
        // Scoped release even when the host forgets to call teardown
        self.teardown();
    }
}
