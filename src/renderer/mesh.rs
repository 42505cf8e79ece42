//! CPU-side tessellation of the parametric shapes into lit vertices

use glam::{Mat3, Mat4, Vec3};

use crate::particles::renderable::Shape;

/// Interleaved vertex shared by the point and mesh pipelines
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const SPHERE_RINGS: u32 = 12;
const SPHERE_SECTORS: u32 = 16;

/// Append a world-space triangle list for `shape` under `model`
pub fn tessellate_shape(out: &mut Vec<Vertex>, shape: &Shape, model: &Mat4, color: [f32; 4]) {
    match *shape {
        Shape::Sphere { radius } => tessellate_sphere(out, radius, model, color),
        Shape::Plane { width, height } => tessellate_plane(out, width, height, model, color),
    }
}

fn push_vertex(out: &mut Vec<Vertex>, position: Vec3, normal: Vec3, color: [f32; 4]) {
    out.push(Vertex {
        position: position.to_array(),
        normal: normal.to_array(),
        color,
    });
}

fn tessellate_sphere(out: &mut Vec<Vertex>, radius: f32, model: &Mat4, color: [f32; 4]) {
    // Non-uniform scales (cloud squash) need the inverse-transpose for normals
    let normal_matrix = Mat3::from_mat4(*model).inverse().transpose();

    let point = |ring: u32, sector: u32| -> (Vec3, Vec3) {
        let theta = std::f32::consts::PI * ring as f32 / SPHERE_RINGS as f32;
        let phi = std::f32::consts::TAU * sector as f32 / SPHERE_SECTORS as f32;
        let unit = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        (
            model.transform_point3(unit * radius),
            (normal_matrix * unit).normalize_or_zero(),
        )
    };

    for ring in 0..SPHERE_RINGS {
        for sector in 0..SPHERE_SECTORS {
            let a = point(ring, sector);
            let b = point(ring + 1, sector);
            let c = point(ring + 1, sector + 1);
            let d = point(ring, sector + 1);

            push_vertex(out, a.0, a.1, color);
            push_vertex(out, b.0, b.1, color);
            push_vertex(out, c.0, c.1, color);

            push_vertex(out, a.0, a.1, color);
            push_vertex(out, c.0, c.1, color);
            push_vertex(out, d.0, d.1, color);
        }
    }
}

fn tessellate_plane(out: &mut Vec<Vertex>, width: f32, height: f32, model: &Mat4, color: [f32; 4]) {
    let normal_matrix = Mat3::from_mat4(*model).inverse().transpose();
    let normal = (normal_matrix * Vec3::Z).normalize_or_zero();

    let (hw, hh) = (width * 0.5, height * 0.5);
    let corners = [
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    ];
    for index in [0, 1, 2, 0, 2, 3] {
        push_vertex(out, model.transform_point3(corners[index]), normal, color);
    }
}
