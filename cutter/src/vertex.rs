use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::Pos;

/// A single vertex with every channel filled in. Channels a mesh doesn't
/// have are set to their neutral values (see [`Vertex::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Pos,
    pub normal: Vector3<f32>,
    pub color: Color32,
    pub tex_coord: Vector4<f32>,
}

/// An 8-bit per channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color32(pub [u8; 4]);

impl Vertex {
    /// Creates a vertex at the given position with a zero normal, opaque
    /// white color and zero texture coordinate.
    pub fn new(position: Pos) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            color: Color32::WHITE,
            tex_coord: Vector4::zeros(),
        }
    }

    pub fn with_normal(self, normal: Vector3<f32>) -> Self {
        Self { normal, ..self }
    }

    pub fn with_color(self, color: Color32) -> Self {
        Self { color, ..self }
    }

    pub fn with_tex_coord(self, tex_coord: Vector4<f32>) -> Self {
        Self { tex_coord, ..self }
    }

    /// Linearly interpolates every channel. Returns `a` exactly at `t = 0`
    /// and `b` exactly at `t = 1`.
    pub fn lerp(a: &Vertex, b: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: a.position.lerp(&b.position, t),
            normal: a.normal.lerp(&b.normal, t),
            color: Color32::lerp(a.color, b.color, t),
            tex_coord: a.tex_coord.lerp(&b.tex_coord, t),
        }
    }
}

impl Color32 {
    pub const WHITE: Self = Self([255; 4]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Interpolates in the packed representation, `t` is clamped to [0, 1]
    /// and each channel is truncated back to a byte.
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self(std::array::from_fn(|i| channel(a.0[i], b.0[i])))
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }
}

impl Default for Color32 {
    fn default() -> Self {
        Self::WHITE
    }
}
