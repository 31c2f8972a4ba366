use std::f32::consts::TAU;

use nalgebra::{Vector3, Vector4};

use crate::{
    buffers::{Channels, VertexBuffer},
    mesh::Mesh,
    vertex::{Color32, Vertex},
    Pos,
};

/// Builds a mesh one vertex and face at a time. Only the channels passed to
/// [`MeshBuilder::new`] are stored.
pub struct MeshBuilder {
    vertices: VertexBuffer,
    faces: Vec<u32>,
}

impl MeshBuilder {
    pub fn new(channels: Channels) -> Self {
        Self {
            vertices: VertexBuffer::with_channels(channels),
            faces: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(&vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_face(&mut self, face: [u32; 3]) {
        self.faces.extend_from_slice(&face);
    }

    pub fn add_quad(&mut self, quad: [u32; 4]) {
        self.add_face([quad[0], quad[1], quad[2]]);
        self.add_face([quad[2], quad[1], quad[3]]);
    }

    pub fn build(self) -> Mesh {
        Mesh::new(self.vertices, self.faces)
    }
}

impl MeshBuilder {
    /// Adds an axis aligned box made of 8 shared corners and 12 outward
    /// facing triangles. Corner `i` sits at `min` offset along x, y and z by
    /// bits 0, 1 and 2 of `i`.
    pub fn add_cuboid(&mut self, min: Pos, max: Pos) {
        let size = max - min;
        let base = self.vertices.len() as u32;
        for i in 0..8 {
            let bits = Vector3::new(i & 1, (i >> 1) & 1, (i >> 2) & 1).map(|x| x as f32);
            let position = min + size.component_mul(&bits);
            self.add_vertex(
                Vertex::new(position)
                    .with_normal((bits * 2.0).add_scalar(-1.0).normalize())
                    .with_color(Color32::new(
                        (bits.x * 255.0) as u8,
                        (bits.y * 255.0) as u8,
                        (bits.z * 255.0) as u8,
                        255,
                    ))
                    .with_tex_coord(Vector4::new(bits.x, bits.y, bits.z, 0.0)),
            );
        }

        for quad in [
            [0, 4, 2, 6],
            [1, 3, 5, 7],
            [0, 1, 4, 5],
            [2, 6, 3, 7],
            [0, 2, 1, 3],
            [4, 5, 6, 7],
        ] {
            self.add_quad(quad.map(|x| base + x));
        }
    }

    /// Adds a capped cylinder standing on `bottom` and extending up along y.
    pub fn add_cylinder(
        &mut self,
        bottom: Pos,
        height: f32,
        (bottom_radius, top_radius): (f32, f32),
        precision: u32,
    ) {
        let top = bottom + Vector3::new(0.0, height, 0.0);
        let bottom_center = self.add_vertex(Vertex::new(bottom).with_normal(-Vector3::y()));
        let top_center = self.add_vertex(Vertex::new(top).with_normal(Vector3::y()));

        let mut ring = Vec::with_capacity(precision as usize);
        for i in 0..precision {
            let progress = i as f32 / precision as f32;
            let angle = TAU * progress;
            let normal = Vector3::new(angle.sin(), 0.0, angle.cos());

            let vertex = |center: Pos, radius: f32, v: f32| {
                Vertex::new(center + normal * radius)
                    .with_normal(normal)
                    .with_tex_coord(Vector4::new(progress, v, 0.0, 0.0))
            };
            let top = self.add_vertex(vertex(top, top_radius, 1.0));
            let bottom = self.add_vertex(vertex(bottom, bottom_radius, 0.0));
            ring.push((top, bottom));
        }

        for (i, &(top, bottom)) in ring.iter().enumerate() {
            let (last_top, last_bottom) = ring[(i + ring.len() - 1) % ring.len()];
            self.add_quad([last_bottom, bottom, last_top, top]);
            self.add_face([top, top_center, last_top]);
            self.add_face([bottom_center, bottom, last_bottom]);
        }
    }
}
