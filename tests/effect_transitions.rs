//! Effect switching and long-run scenario properties

use tempest_engine::particles::Geometry;
use tempest_engine::{EngineConfig, ParticleKind, WeatherCondition, WeatherEngine};

fn engine_with(condition: WeatherCondition, seed: u64) -> WeatherEngine {
    WeatherEngine::headless(&EngineConfig {
        initial_condition: condition,
        rng_seed: Some(seed),
        ..EngineConfig::default()
    })
}

fn kind_count(engine: &WeatherEngine, kind: ParticleKind) -> usize {
    engine
        .registry()
        .groups()
        .iter()
        .filter(|g| g.kind == kind)
        .count()
}

#[test]
fn test_particle_counts_per_effect() {
    let mut engine = engine_with(WeatherCondition::Sunny, 9);
    let expected = [
        (WeatherCondition::Rain, 800 + 4),
        (WeatherCondition::Snow, 400 + 4),
        (WeatherCondition::Sunny, 1 + 12 + 150),
        (WeatherCondition::Cloudy, 6 + 200),
        (WeatherCondition::Thunderstorm, 800 + 4 + 1),
        (WeatherCondition::Mist, 300 + 4),
    ];
    for (condition, count) in expected {
        engine.select_effect(condition, 1.0).unwrap();
        assert_eq!(engine.current_particle_count(), count, "{condition}");
        assert_eq!(engine.current_effect(), condition);
    }
}

#[test]
fn test_repeated_switches_do_not_leak_groups() {
    let mut engine = engine_with(WeatherCondition::Rain, 11);
    let baseline = engine.registry().len();

    for _ in 0..5 {
        engine.select_effect(WeatherCondition::Rain, 1.0).unwrap();
        assert_eq!(engine.registry().len(), baseline);
    }

    // Cycling through every effect and back also returns to baseline
    for condition in [
        WeatherCondition::Snow,
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Thunderstorm,
        WeatherCondition::Mist,
        WeatherCondition::Rain,
    ] {
        engine.select_effect(condition, 1.0).unwrap();
        // Nothing in the registry may be disposed: clear-then-rebuild is atomic
        assert!(engine
            .registry()
            .groups()
            .iter()
            .all(|g| !g.renderable.is_disposed()));
    }
    assert_eq!(engine.registry().len(), baseline);
}

#[test]
fn test_thunderstorm_scenario_1000_ticks() {
    let mut engine = engine_with(WeatherCondition::Thunderstorm, 2024);

    let mut flash_ticks = 0u32;
    for _ in 0..1000 {
        engine.tick().unwrap();

        // Composition is stable throughout the run
        assert_eq!(kind_count(&engine, ParticleKind::Rain), 1);
        assert_eq!(kind_count(&engine, ParticleKind::Cloud), 4);
        assert_eq!(kind_count(&engine, ParticleKind::Lightning), 1);
        assert_eq!(engine.registry().len(), 6);

        let lightning = engine
            .registry()
            .groups()
            .iter()
            .find(|g| g.kind == ParticleKind::Lightning)
            .unwrap();
        match lightning.renderable.geometry() {
            Some(Geometry::Mesh(mesh)) => {
                // Transparent except while a flash window is open
                assert!(mesh.material.opacity == 0.0 || mesh.material.opacity == 1.0);
                if mesh.material.opacity == 1.0 {
                    flash_ticks += 1;
                    assert!(lightning.motion.flash_until.is_some());
                }
            }
            _ => panic!("lightning should be a mesh"),
        }

        // Rain buffer honors the respawn bounds every tick
        let rain = engine
            .registry()
            .groups()
            .iter()
            .find(|g| g.kind == ParticleKind::Rain)
            .unwrap();
        match rain.renderable.geometry() {
            Some(Geometry::Points(points)) => {
                for chunk in points.positions().chunks(3) {
                    assert!(chunk[1] >= -10.3 && chunk[1] <= 25.0);
                    assert!(chunk[0] >= -10.0 && chunk[0] <= 10.0);
                    assert!(chunk[2] >= -10.0 && chunk[2] <= 10.0);
                }
            }
            _ => panic!("rain should be a point cloud"),
        }
    }

    // Lit for a handful of short windows, dark the rest of the time
    assert!(flash_ticks < 500, "flash windows must be transient");
}

#[test]
fn test_cloud_drift_is_monotone_mod_wrap() {
    let mut engine = engine_with(WeatherCondition::Cloudy, 5);

    let cloud_x = |engine: &WeatherEngine| -> Vec<f32> {
        engine
            .registry()
            .groups()
            .iter()
            .filter(|g| g.kind == ParticleKind::Cloud)
            .map(|g| match g.renderable.geometry() {
                Some(Geometry::Group(group)) => group.transform.position.x,
                _ => panic!("cloud should be a mesh group"),
            })
            .collect()
    };

    let mut previous = cloud_x(&engine);
    for _ in 0..2000 {
        engine.tick().unwrap();
        let current = cloud_x(&engine);
        for (before, after) in previous.iter().zip(&current) {
            // Either a forward drift step or an exact wrap to the far edge
            assert!(
                after > before || (*after - (-12.0)).abs() < 1e-6,
                "cloud went backwards: {before} -> {after}"
            );
            assert!(*after <= 12.0 + 0.015);
        }
        previous = current;
    }
}

#[test]
fn test_intensity_rescales_on_selection() {
    let mut engine = engine_with(WeatherCondition::Rain, 3);
    assert_eq!(engine.current_particle_count(), 804);

    engine.select_effect(WeatherCondition::Rain, 0.25).unwrap();
    assert_eq!(engine.current_particle_count(), 200 + 4);

    engine.select_effect(WeatherCondition::Rain, 1.0).unwrap();
    assert_eq!(engine.current_particle_count(), 804);
}
