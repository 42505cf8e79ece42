//! Effect factory: one builder per canonical weather condition
//!
//! Every builder first clears the registry (disposing all renderables)
//! and resets the scene atmosphere, so effect switches are atomic and a
//! stale group is never observable alongside a new one.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::particles::group::{Motion, ParticleGroup, ParticleKind};
use crate::particles::registry::ParticleRegistry;
use crate::particles::renderable::{
    Material, MeshGroup, MeshInstance, PointCloud, Renderable, Shape, Transform,
};
use crate::scene::{rgb, Scene};
use crate::weather::WeatherCondition;

pub const RAIN_PARTICLES: usize = 800;
pub const SNOW_PARTICLES: usize = 400;
pub const MIST_PARTICLES: usize = 300;
pub const SUNNY_FLOATING_PARTICLES: usize = 150;
pub const CLOUDY_FLOATING_PARTICLES: usize = 200;
pub const SUN_RAY_COUNT: usize = 12;
/// Cloud instances for rain, snow, and mist skies
pub const STORM_CLOUD_COUNT: usize = 4;
/// Cloud instances for an overcast sky
pub const OVERCAST_CLOUD_COUNT: usize = 6;

const SUN_POSITION: Vec3 = Vec3::new(4.0, 6.0, -2.0);
const LIGHTNING_POSITION: Vec3 = Vec3::new(2.0, 4.0, -1.0);

/// Rebuild the particle population for `condition`. The intensity
/// multiplier scales point-cloud particle counts; cloud, ray, sun, and
/// lightning instances are fixed.
pub fn apply_effect(
    condition: WeatherCondition,
    intensity: f32,
    scene: &mut Scene,
    registry: &mut ParticleRegistry,
    rng: &mut StdRng,
) {
    registry.clear();
    scene.reset_atmosphere();

    match condition {
        WeatherCondition::Rain => build_rain(registry, rng, intensity),
        WeatherCondition::Snow => build_snow(registry, rng, intensity),
        WeatherCondition::Sunny => build_sunny(registry, rng, intensity),
        WeatherCondition::Cloudy => build_cloudy(scene, registry, rng, intensity),
        WeatherCondition::Thunderstorm => build_thunderstorm(scene, registry, rng, intensity),
        WeatherCondition::Mist => build_mist(scene, registry, rng, intensity),
    }

    log::debug!(
        "built {} effect: {} groups, {} particles",
        condition,
        registry.len(),
        registry.particle_count()
    );
}

fn build_rain(registry: &mut ParticleRegistry, rng: &mut StdRng, intensity: f32) {
    let positions = scatter_fall_field(rng, scaled(RAIN_PARTICLES, intensity), 10.0);
    registry.add(ParticleGroup::new(
        ParticleKind::Rain,
        Renderable::points(PointCloud::new(positions, rgb(0x87ceeb), 0.2, 0.8)),
        Motion::falling(0.3),
    ));
    spawn_clouds(registry, rng, rgb(0x555555), STORM_CLOUD_COUNT);
}

fn build_snow(registry: &mut ParticleRegistry, rng: &mut StdRng, intensity: f32) {
    let positions = scatter_fall_field(rng, scaled(SNOW_PARTICLES, intensity), 10.0);
    registry.add(ParticleGroup::new(
        ParticleKind::Snow,
        Renderable::points(PointCloud::new(positions, rgb(0xffffff), 0.3, 0.9)),
        Motion::falling(0.08),
    ));
    spawn_clouds(registry, rng, rgb(0xcccccc), STORM_CLOUD_COUNT);
}

fn build_sunny(registry: &mut ParticleRegistry, rng: &mut StdRng, intensity: f32) {
    let gold = rgb(0xffd700);

    registry.add(ParticleGroup::new(
        ParticleKind::Sun,
        Renderable::mesh(MeshInstance {
            shape: Shape::Sphere { radius: 1.2 },
            material: Material {
                color: gold,
                opacity: 0.9,
            },
            transform: Transform::at(SUN_POSITION),
        }),
        Motion::spinning(0.01),
    ));

    // Thin rotating planes fanned out at 30 degree increments
    for i in 0..SUN_RAY_COUNT {
        let mut transform = Transform::at(SUN_POSITION);
        transform.rotation.z = i as f32 * std::f32::consts::PI / 6.0;
        registry.add(ParticleGroup::new(
            ParticleKind::Ray,
            Renderable::mesh(MeshInstance {
                shape: Shape::Plane {
                    width: 0.1,
                    height: 4.0,
                },
                material: Material {
                    color: gold,
                    opacity: 0.4,
                },
                transform,
            }),
            Motion::spinning(0.008),
        ));
    }

    spawn_floating(
        registry,
        rng,
        gold,
        scaled(SUNNY_FLOATING_PARTICLES, intensity),
        0.05,
    );
}

fn build_cloudy(
    scene: &mut Scene,
    registry: &mut ParticleRegistry,
    rng: &mut StdRng,
    intensity: f32,
) {
    let sky = rgb(0x87ceeb);
    scene.clear_color = sky;
    scene.set_fog(sky, 15.0, 60.0);

    spawn_clouds(registry, rng, rgb(0xb0c4de), OVERCAST_CLOUD_COUNT);
    spawn_floating(
        registry,
        rng,
        rgb(0xb0c4de),
        scaled(CLOUDY_FLOATING_PARTICLES, intensity),
        0.03,
    );
}

fn build_thunderstorm(
    scene: &mut Scene,
    registry: &mut ParticleRegistry,
    rng: &mut StdRng,
    intensity: f32,
) {
    let dark = rgb(0x1a1a1a);
    scene.clear_color = dark;
    scene.set_fog(dark, 5.0, 40.0);

    // Full rain population, storm clouds included
    build_rain(registry, rng, intensity);

    // The flash plane sits transparent until the updater triggers it
    registry.add(ParticleGroup::new(
        ParticleKind::Lightning,
        Renderable::mesh(MeshInstance {
            shape: Shape::Plane {
                width: 0.3,
                height: 8.0,
            },
            material: Material {
                color: rgb(0xffffff),
                opacity: 0.0,
            },
            transform: Transform::at(LIGHTNING_POSITION),
        }),
        Motion::default(),
    ));
}

fn build_mist(
    scene: &mut Scene,
    registry: &mut ParticleRegistry,
    rng: &mut StdRng,
    intensity: f32,
) {
    let gray = rgb(0xd3d3d3);
    scene.clear_color = gray;
    scene.set_fog(gray, 5.0, 30.0);

    // Large, faint points confined near the ground
    let count = scaled(MIST_PARTICLES, intensity);
    let mut positions = Vec::with_capacity(count * 3);
    for _ in 0..count {
        positions.push(rng.gen_range(-12.5..12.5));
        positions.push(rng.gen_range(0.0..8.0));
        positions.push(rng.gen_range(-12.5..12.5));
    }
    registry.add(ParticleGroup::new(
        ParticleKind::Mist,
        Renderable::points(PointCloud::new(positions, rgb(0xffffff), 0.5, 0.4)),
        Motion::falling(0.02),
    ));

    spawn_clouds(registry, rng, rgb(0xa9a9a9), STORM_CLOUD_COUNT);
}

/// Build `count` cloud instances: clusters of 3-7 overlapping spheres,
/// grouped, squashed vertically, and scattered over the sky
fn spawn_clouds(registry: &mut ParticleRegistry, rng: &mut StdRng, color: Vec3, count: usize) {
    for _ in 0..count {
        let puff_count = rng.gen_range(3..=7);
        let mut children = Vec::with_capacity(puff_count);
        for _ in 0..puff_count {
            children.push(MeshInstance {
                shape: Shape::Sphere {
                    radius: rng.gen_range(0.8..1.5),
                },
                material: Material {
                    color,
                    opacity: rng.gen_range(0.7..0.9),
                },
                transform: Transform::at(Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-1.0..1.0),
                )),
            });
        }

        let spread = rng.gen_range(1.5..2.5);
        let mut transform = Transform::at(Vec3::new(
            rng.gen_range(-7.5..7.5),
            rng.gen_range(3.0..7.0),
            rng.gen_range(-7.5..7.5),
        ));
        transform.scale = Vec3::new(spread, spread * rng.gen_range(0.4..1.0), spread);

        registry.add(ParticleGroup::new(
            ParticleKind::Cloud,
            Renderable::group(MeshGroup {
                children,
                transform,
            }),
            Motion::drifting(rng.gen_range(0.005..0.015)),
        ));
    }
}

/// Slow ambient points scattered through the middle of the scene
fn spawn_floating(
    registry: &mut ParticleRegistry,
    rng: &mut StdRng,
    color: Vec3,
    count: usize,
    speed: f32,
) {
    let mut positions = Vec::with_capacity(count * 3);
    for _ in 0..count {
        positions.push(rng.gen_range(-9.0..9.0));
        positions.push(rng.gen_range(-6.0..6.0));
        positions.push(rng.gen_range(-9.0..9.0));
    }
    registry.add(ParticleGroup::new(
        ParticleKind::Floating,
        Renderable::points(PointCloud::new(positions, color, 0.15, 0.6)),
        Motion::falling(speed),
    ));
}

/// Seed positions for a falling field: the 20x20 footprint at height 5-25
fn scatter_fall_field(rng: &mut StdRng, count: usize, half_extent: f32) -> Vec<f32> {
    let mut positions = Vec::with_capacity(count * 3);
    for _ in 0..count {
        positions.push(rng.gen_range(-half_extent..half_extent));
        positions.push(rng.gen_range(5.0..25.0));
        positions.push(rng.gen_range(-half_extent..half_extent));
    }
    positions
}

/// Apply the intensity multiplier to a particle count
fn scaled(count: usize, intensity: f32) -> usize {
    (count as f32 * intensity.max(0.0)).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::renderable::Geometry;
    use rand::SeedableRng;

    fn setup() -> (Scene, ParticleRegistry, StdRng) {
        (
            Scene::new(),
            ParticleRegistry::new(),
            StdRng::seed_from_u64(42),
        )
    }

    fn kind_count(registry: &ParticleRegistry, kind: ParticleKind) -> usize {
        registry.groups().iter().filter(|g| g.kind == kind).count()
    }

    #[test]
    fn test_sunny_population_and_count() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Sunny,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );

        assert_eq!(kind_count(&registry, ParticleKind::Sun), 1);
        assert_eq!(kind_count(&registry, ParticleKind::Ray), SUN_RAY_COUNT);
        assert_eq!(kind_count(&registry, ParticleKind::Floating), 1);
        // 1 sun + 12 rays + 150 floating points
        assert_eq!(registry.particle_count(), 163);
        assert!(scene.fog.is_none());
    }

    #[test]
    fn test_rain_population() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Rain,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );

        assert_eq!(kind_count(&registry, ParticleKind::Rain), 1);
        assert_eq!(kind_count(&registry, ParticleKind::Cloud), STORM_CLOUD_COUNT);
        assert_eq!(registry.particle_count(), RAIN_PARTICLES + STORM_CLOUD_COUNT);
    }

    #[test]
    fn test_thunderstorm_composition_and_fog() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Thunderstorm,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );

        assert_eq!(kind_count(&registry, ParticleKind::Rain), 1);
        assert_eq!(kind_count(&registry, ParticleKind::Cloud), STORM_CLOUD_COUNT);
        assert_eq!(kind_count(&registry, ParticleKind::Lightning), 1);

        let fog = scene.fog.expect("thunderstorm sets fog");
        assert_eq!(fog.near, 5.0);
        assert_eq!(fog.far, 40.0);
        assert_eq!(scene.clear_color, rgb(0x1a1a1a));

        // Lightning starts fully transparent
        let lightning = registry
            .groups()
            .iter()
            .find(|g| g.kind == ParticleKind::Lightning)
            .unwrap();
        match lightning.renderable.geometry() {
            Some(Geometry::Mesh(mesh)) => assert_eq!(mesh.material.opacity, 0.0),
            _ => panic!("lightning should be a mesh"),
        }
    }

    #[test]
    fn test_switch_replaces_population_without_leaks() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Thunderstorm,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );
        let storm_groups = registry.len();

        // Repeated switches to the same effect keep the composition stable
        for _ in 0..3 {
            apply_effect(
                WeatherCondition::Thunderstorm,
                1.0,
                &mut scene,
                &mut registry,
                &mut rng,
            );
            assert_eq!(registry.len(), storm_groups);
        }

        // Switching away leaves nothing of the storm behind
        apply_effect(
            WeatherCondition::Sunny,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );
        assert_eq!(kind_count(&registry, ParticleKind::Rain), 0);
        assert_eq!(kind_count(&registry, ParticleKind::Lightning), 0);
        assert_eq!(kind_count(&registry, ParticleKind::Cloud), 0);
        // The storm's fog does not survive the switch
        assert!(scene.fog.is_none());
    }

    #[test]
    fn test_mist_particles_confined_to_ground_layer() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Mist,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );

        let mist = registry
            .groups()
            .iter()
            .find(|g| g.kind == ParticleKind::Mist)
            .unwrap();
        match mist.renderable.geometry() {
            Some(Geometry::Points(points)) => {
                assert_eq!(points.len(), MIST_PARTICLES);
                for chunk in points.positions().chunks(3) {
                    assert!(chunk[1] >= 0.0 && chunk[1] < 8.0);
                }
            }
            _ => panic!("mist should be a point cloud"),
        }
        assert!(scene.fog.is_some());
    }

    #[test]
    fn test_intensity_scales_point_counts_only() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Rain,
            0.5,
            &mut scene,
            &mut registry,
            &mut rng,
        );
        assert_eq!(
            registry.particle_count(),
            RAIN_PARTICLES / 2 + STORM_CLOUD_COUNT
        );

        apply_effect(
            WeatherCondition::Sunny,
            2.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );
        assert_eq!(kind_count(&registry, ParticleKind::Ray), SUN_RAY_COUNT);
        assert_eq!(registry.particle_count(), 1 + 12 + 300);
    }

    #[test]
    fn test_cloud_clusters_within_documented_ranges() {
        let (mut scene, mut registry, mut rng) = setup();
        apply_effect(
            WeatherCondition::Cloudy,
            1.0,
            &mut scene,
            &mut registry,
            &mut rng,
        );

        let clouds: Vec<_> = registry
            .groups()
            .iter()
            .filter(|g| g.kind == ParticleKind::Cloud)
            .collect();
        assert_eq!(clouds.len(), OVERCAST_CLOUD_COUNT);

        for cloud in clouds {
            assert!(cloud.motion.drift_speed >= 0.005 && cloud.motion.drift_speed < 0.015);
            match cloud.renderable.geometry() {
                Some(Geometry::Group(group)) => {
                    assert!((3..=7).contains(&group.children.len()));
                    for puff in &group.children {
                        match puff.shape {
                            Shape::Sphere { radius } => {
                                assert!((0.8..1.5).contains(&radius))
                            }
                            _ => panic!("cloud puffs are spheres"),
                        }
                        assert!(puff.material.opacity >= 0.7 && puff.material.opacity < 0.9);
                    }
                    let scale = group.transform.scale;
                    assert!(scale.x >= 1.5 && scale.x < 2.5);
                    assert!(scale.y >= scale.x * 0.4 && scale.y <= scale.x);
                    assert!(group.transform.position.y >= 3.0 && group.transform.position.y < 7.0);
                }
                _ => panic!("clouds are mesh groups"),
            }
        }
    }
}
