//! Vertex data for the shared cube and the flat ground quads.
//!
//! Every voxel instance draws the same cube; the ground plane and the contact-shadow
//! disc both draw a unit quad in the XZ plane that the shader scales.

use crate::engine_state::voxels::CUBE_SIZE;

/// A mesh vertex with a face normal.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Vertex buffer layout.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Face normals in the order the cube faces are emitted: +X, -X, +Y, -Y, +Z, -Z.
const FACE_NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

/// The shared voxel cube: edge `CUBE_SIZE`, centred on the origin, four vertices per
/// face so each face keeps its own normal.
pub fn cube_vertices() -> [Vertex; 24] {
    let h = CUBE_SIZE / 2.0;
    let mut vertices = [Vertex::new([0.0; 3], [0.0; 3]); 24];

    for (face, normal) in FACE_NORMALS.iter().enumerate() {
        let n = cgmath::Vector3::from(*normal);
        // Two tangents chosen so (u, v, n) is right-handed and corners wind CCW seen from outside
        let u = if n.y.abs() > 0.5 {
            cgmath::Vector3::new(1.0, 0.0, 0.0)
        } else {
            cgmath::Vector3::new(0.0, 1.0, 0.0)
        };
        let v = n.cross(u);

        let centre = n * h;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (corner, (su, sv)) in corners.iter().enumerate() {
            let p = centre + u * (su * h) + v * (sv * h);
            vertices[face * 4 + corner] = Vertex::new(p.into(), *normal);
        }
    }

    vertices
}

/// Two triangles per face.
pub fn cube_indices() -> [u16; 36] {
    let mut indices = [0u16; 36];
    for face in 0..6u16 {
        let base = face * 4;
        let i = face as usize * 6;
        indices[i..i + 6].copy_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

/// Unit quad in the XZ plane facing +Y, centred on the origin.
pub const GROUND_QUAD: [Vertex; 4] = [
    Vertex::new([-0.5, 0.0, 0.5], [0.0, 1.0, 0.0]),
    Vertex::new([0.5, 0.0, 0.5], [0.0, 1.0, 0.0]),
    Vertex::new([0.5, 0.0, -0.5], [0.0, 1.0, 0.0]),
    Vertex::new([-0.5, 0.0, -0.5], [0.0, 1.0, 0.0]),
];

pub const GROUND_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
