//! Scene graph: the renderable world, its camera, and the view presets

pub mod camera;
pub mod scene;
pub mod view;

pub use camera::Camera;
pub use scene::{rgb, AmbientLight, DirectionalLight, Fog, Lighting, PointLight, Scene};
pub use view::{ViewController, ViewPreset, VIEW_PRESETS};
