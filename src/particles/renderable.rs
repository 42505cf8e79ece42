use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation (radians), and non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Flat-shaded translucent material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub opacity: f32,
}

/// Parametric shapes the renderer knows how to tessellate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Plane { width: f32, height: f32 },
}

/// One shaped mesh with its own material and transform
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub shape: Shape,
    pub material: Material,
    pub transform: Transform,
}

/// Several meshes sharing a parent transform (cloud clusters). Child
/// transforms are local to the group.
#[derive(Debug, Clone)]
pub struct MeshGroup {
    pub children: Vec<MeshInstance>,
    pub transform: Transform,
}

/// A flat buffer of xyz triples, one per particle, mutated in place every
/// frame. The dirty flag marks the buffer for re-upload after mutation.
#[derive(Debug, Clone)]
pub struct PointCloud {
    positions: Vec<f32>,
    pub color: Vec3,
    pub point_size: f32,
    pub opacity: f32,
    dirty: bool,
}

impl PointCloud {
    pub fn new(positions: Vec<f32>, color: Vec3, point_size: f32, opacity: f32) -> Self {
        debug_assert!(positions.len() % 3 == 0);
        Self {
            positions,
            color,
            point_size,
            opacity,
            // Fresh buffers need their first upload
            dirty: true,
        }
    }

    /// Number of particles (position triples) in the buffer
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Mutable access marks the buffer dirty for the next upload
    pub fn positions_mut(&mut self) -> &mut [f32] {
        self.dirty = true;
        &mut self.positions
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn release(&mut self) {
        self.positions = Vec::new();
    }
}

/// The concrete geometry behind a renderable
#[derive(Debug, Clone)]
pub enum Geometry {
    Points(PointCloud),
    Mesh(MeshInstance),
    Group(MeshGroup),
}

/// Owned geometry plus a disposed flag. Disposal releases backing buffers;
/// update rules and the renderer treat a disposed renderable as absent
/// rather than faulting.
#[derive(Debug, Clone)]
pub struct Renderable {
    geometry: Geometry,
    disposed: bool,
}

impl Renderable {
    pub fn points(points: PointCloud) -> Self {
        Self {
            geometry: Geometry::Points(points),
            disposed: false,
        }
    }

    pub fn mesh(mesh: MeshInstance) -> Self {
        Self {
            geometry: Geometry::Mesh(mesh),
            disposed: false,
        }
    }

    pub fn group(group: MeshGroup) -> Self {
        Self {
            geometry: Geometry::Group(group),
            disposed: false,
        }
    }

    /// `None` once the renderable has been disposed
    pub fn geometry(&self) -> Option<&Geometry> {
        (!self.disposed).then_some(&self.geometry)
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        (!self.disposed).then_some(&mut self.geometry)
    }

    /// Release backing buffers and mark disposed. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        match &mut self.geometry {
            Geometry::Points(points) => points.release(),
            Geometry::Mesh(_) => {}
            Geometry::Group(group) => group.children.clear(),
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// How many particles this renderable contributes to the live count:
    /// point clouds report one per position triple, mesh kinds report 1.
    pub fn particle_contribution(&self) -> usize {
        if self.disposed {
            return 0;
        }
        match &self.geometry {
            Geometry::Points(points) => points.len(),
            Geometry::Mesh(_) | Geometry::Group(_) => 1,
        }
    }
}
