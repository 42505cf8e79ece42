use glam::Vec3;

use crate::scene::Camera;

/// A fixed camera preset; every preset looks at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPreset {
    pub name: &'static str,
    pub position: Vec3,
}

/// The four presets, cycled in this order
pub const VIEW_PRESETS: [ViewPreset; 4] = [
    ViewPreset {
        name: "Front View",
        position: Vec3::new(0.0, 2.0, 8.0),
    },
    ViewPreset {
        name: "Side View",
        position: Vec3::new(8.0, 2.0, 0.0),
    },
    ViewPreset {
        name: "Top View",
        position: Vec3::new(0.0, 8.0, 0.0),
    },
    ViewPreset {
        name: "Angled View",
        position: Vec3::new(-5.0, 5.0, 5.0),
    },
];

/// Cycles the camera through the fixed presets. Pure camera mutation; no
/// effect on particle state.
#[derive(Debug, Default)]
pub struct ViewController {
    index: usize,
}

impl ViewController {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static ViewPreset {
        &VIEW_PRESETS[self.index]
    }

    /// Advance to the next preset, wrapping after the last
    pub fn cycle(&mut self, camera: &mut Camera) -> &'static ViewPreset {
        self.index = (self.index + 1) % VIEW_PRESETS.len();
        self.apply(camera)
    }

    /// Jump straight back to the front preset
    pub fn reset(&mut self, camera: &mut Camera) -> &'static ViewPreset {
        self.index = 0;
        self.apply(camera)
    }

    fn apply(&self, camera: &mut Camera) -> &'static ViewPreset {
        let preset = &VIEW_PRESETS[self.index];
        camera.position = preset.position;
        camera.look_at(Vec3::ZERO);
        preset
    }
}
