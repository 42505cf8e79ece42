use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default background when no effect overrides it (sky blue)
pub const DEFAULT_CLEAR_COLOR: u32 = 0x87ceeb;

/// Convert a packed 0xRRGGBB color to float RGB in [0, 1]
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Vec3,
    /// Distance at which fog starts
    pub near: f32,
    /// Distance at which fog fully occludes
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Light position; the light shines from here toward the origin
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

/// The fixed lighting rig owned by the scene for its lifetime: one ambient
/// term, one directional "sun", one point "atmosphere" light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    pub atmosphere: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: rgb(0x404040),
                intensity: 0.4,
            },
            sun: DirectionalLight {
                color: rgb(0xffffff),
                intensity: 1.0,
                position: Vec3::new(10.0, 10.0, 5.0),
            },
            atmosphere: PointLight {
                color: rgb(0x87ceeb),
                intensity: 0.5,
                range: 50.0,
                position: Vec3::new(0.0, 5.0, 0.0),
            },
        }
    }
}

/// Root container of the renderable world. Holds the background clear
/// color, at most one active fog, and the lighting rig. Exactly one scene
/// is live per engine instance; the particle registry is the arena for
/// everything else that gets drawn.
#[derive(Debug, Clone)]
pub struct Scene {
    pub clear_color: Vec3,
    pub fog: Option<Fog>,
    pub lights: Lighting,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            clear_color: rgb(DEFAULT_CLEAR_COLOR),
            fog: None,
            lights: Lighting::default(),
        }
    }

    pub fn set_fog(&mut self, color: Vec3, near: f32, far: f32) {
        self.fog = Some(Fog { color, near, far });
    }

    pub fn clear_fog(&mut self) {
        self.fog = None;
    }

    /// Restore the default clear color and remove fog. Runs at the top of
    /// every effect switch so each effect starts from the same atmosphere.
    pub fn reset_atmosphere(&mut self) {
        self.clear_color = rgb(DEFAULT_CLEAR_COLOR);
        self.fog = None;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_unpacks_channels() {
        let c = rgb(0x87ceeb);
        assert!((c.x - 135.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 206.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 235.0 / 255.0).abs() < 1e-6);
        assert_eq!(rgb(0x000000), Vec3::ZERO);
        assert_eq!(rgb(0xffffff), Vec3::ONE);
    }

    #[test]
    fn test_reset_atmosphere_clears_overrides() {
        let mut scene = Scene::new();
        scene.clear_color = rgb(0x1a1a1a);
        scene.set_fog(rgb(0x1a1a1a), 5.0, 40.0);

        scene.reset_atmosphere();
        assert_eq!(scene.clear_color, rgb(DEFAULT_CLEAR_COLOR));
        assert!(scene.fog.is_none());
    }
}
