//! Per-kind motion rules, applied once per animation tick
//!
//! Motion constants are per-tick quantities. The oscillation clock is
//! derived from the tick counter, so headless runs are exact and
//! independent of wall time.

use rand::rngs::StdRng;
use rand::Rng;

use crate::particles::group::{Motion, ParticleGroup, ParticleKind};
use crate::particles::registry::ParticleRegistry;
use crate::particles::renderable::{Geometry, MeshGroup, MeshInstance, PointCloud};

/// Simulated seconds per tick; drives the sway/jitter oscillators
pub const FRAME_DT: f32 = 1.0 / 60.0;
/// Falling particles below this wrap back to their spawn height
pub const RESPAWN_FLOOR: f32 = -10.0;
pub const RAIN_RESPAWN_HEIGHT: f32 = 25.0;
pub const SNOW_RESPAWN_HEIGHT: f32 = 20.0;
/// Respawned particles land in a 20x20 horizontal footprint
pub const SPAWN_HALF_EXTENT: f32 = 10.0;
/// Lateral sway amplitude for snow
pub const SWAY_AMPLITUDE: f32 = 0.02;
/// Per-tick chance of a lightning flash
pub const FLASH_PROBABILITY: f64 = 0.008;
/// Flash duration in ticks (150 ms at 60 fps)
pub const FLASH_TICKS: u64 = 9;
/// Clouds drifting past +x wrap to -x here
pub const CLOUD_WRAP_X: f32 = 12.0;

/// Advance every live group by one tick. Groups whose renderable has been
/// disposed are skipped; the pass never fails.
pub fn update_groups(registry: &mut ParticleRegistry, tick: u64, rng: &mut StdRng) {
    let time = tick as f32 * FRAME_DT;
    for group in registry.groups_mut() {
        update_group(group, tick, time, rng);
    }
}

fn update_group(group: &mut ParticleGroup, tick: u64, time: f32, rng: &mut StdRng) {
    let ParticleGroup {
        kind,
        renderable,
        motion,
    } = group;
    let Some(geometry) = renderable.geometry_mut() else {
        return;
    };
    match (*kind, geometry) {
        (ParticleKind::Rain, Geometry::Points(points)) => update_rain(points, motion.speed, rng),
        (ParticleKind::Snow, Geometry::Points(points)) => {
            update_snow(points, motion.speed, time, rng)
        }
        (ParticleKind::Sun, Geometry::Mesh(mesh)) => {
            mesh.transform.rotation.y += motion.rotation_speed;
            // Slow secondary wobble at half rate
            mesh.transform.rotation.z += motion.rotation_speed * 0.5;
        }
        (ParticleKind::Ray, Geometry::Mesh(mesh)) => {
            mesh.transform.rotation.z += motion.rotation_speed;
        }
        (ParticleKind::Lightning, Geometry::Mesh(mesh)) => {
            update_lightning(mesh, motion, tick, rng)
        }
        (ParticleKind::Cloud, Geometry::Group(cloud)) => update_cloud(cloud, motion.drift_speed),
        (ParticleKind::Floating | ParticleKind::Mist, Geometry::Points(points)) => {
            update_drift(points, motion.speed, time)
        }
        // A kind paired with geometry it has no rule for is left alone
        _ => {}
    }
}

/// Straight fall with wrap-around respawn at a fresh horizontal position
fn update_rain(points: &mut PointCloud, speed: f32, rng: &mut StdRng) {
    let positions = points.positions_mut();
    for i in (0..positions.len()).step_by(3) {
        positions[i + 1] -= speed;
        if positions[i + 1] < RESPAWN_FLOOR {
            positions[i + 1] = RAIN_RESPAWN_HEIGHT;
            positions[i] = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
            positions[i + 2] = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        }
    }
}

/// Fall with lateral sinusoidal sway, phase-shifted per particle
fn update_snow(points: &mut PointCloud, speed: f32, time: f32, rng: &mut StdRng) {
    let positions = points.positions_mut();
    for i in (0..positions.len()).step_by(3) {
        let phase = time + (i / 3) as f32;
        positions[i] += phase.sin() * SWAY_AMPLITUDE;
        positions[i + 1] -= speed;
        positions[i + 2] += phase.cos() * SWAY_AMPLITUDE;
        if positions[i + 1] < RESPAWN_FLOOR {
            positions[i + 1] = SNOW_RESPAWN_HEIGHT;
            positions[i] = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
            positions[i + 2] = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        }
    }
}

/// Expiry is checked before a new roll, so a flash lasts exactly
/// [`FLASH_TICKS`] unless re-triggered, which restarts the window.
fn update_lightning(mesh: &mut MeshInstance, motion: &mut Motion, tick: u64, rng: &mut StdRng) {
    if let Some(until) = motion.flash_until {
        if tick >= until {
            mesh.material.opacity = 0.0;
            motion.flash_until = None;
        }
    }
    if rng.gen_bool(FLASH_PROBABILITY) {
        mesh.material.opacity = 1.0;
        motion.flash_until = Some(tick + FLASH_TICKS);
    }
}

/// Horizontal drift; the wrap is exact, and the cloud's shape is stable
/// for its whole lifetime
fn update_cloud(cloud: &mut MeshGroup, drift_speed: f32) {
    cloud.transform.position.x += drift_speed;
    if cloud.transform.position.x > CLOUD_WRAP_X {
        cloud.transform.position.x = -CLOUD_WRAP_X;
    }
}

/// Gravity-free sinusoidal jitter on all three axes
fn update_drift(points: &mut PointCloud, speed: f32, time: f32) {
    let positions = points.positions_mut();
    for i in (0..positions.len()).step_by(3) {
        let index = (i / 3) as f32;
        positions[i] += (time + index).sin() * speed;
        positions[i + 1] += (time + index * 0.5).cos() * speed * 0.5;
        positions[i + 2] += (time + index * 0.3).sin() * speed;
    }
}
