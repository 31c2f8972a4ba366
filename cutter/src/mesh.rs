use std::{collections::HashMap, sync::Arc};

use crate::{
    buffers::{Channels, VertexBuffer},
    error::{CutError, Result},
    Pos,
};

/// An immutable triangle mesh. Cloning is cheap, every clone shares the same
/// vertex and index buffers.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    inner: Arc<MeshInner>,
}

#[derive(Debug, Default)]
struct MeshInner {
    vertices: VertexBuffer,
    indices: Box<[u32]>,
    submeshes: Box<[SubMesh]>,
}

/// A range of the index buffer interpreted as a triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    pub start: usize,
    pub count: usize,
}

impl Mesh {
    /// Creates a new mesh with a single submesh spanning every index.
    pub fn new(vertices: VertexBuffer, indices: Vec<u32>) -> Self {
        let submesh = SubMesh {
            start: 0,
            count: indices.len(),
        };
        Self::with_submeshes(vertices, indices, vec![submesh])
    }

    pub fn with_submeshes(
        vertices: VertexBuffer,
        indices: Vec<u32>,
        submeshes: Vec<SubMesh>,
    ) -> Self {
        Self {
            inner: Arc::new(MeshInner {
                vertices,
                indices: indices.into_boxed_slice(),
                submeshes: submeshes.into_boxed_slice(),
            }),
        }
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.inner.vertices
    }

    pub fn positions(&self) -> &[Pos] {
        self.inner.vertices.positions()
    }

    pub fn channels(&self) -> Channels {
        self.inner.vertices.channels()
    }

    pub fn indices(&self) -> &[u32] {
        &self.inner.indices
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.inner.submeshes
    }

    /// Indices of the first submesh, which is what gets cut.
    pub fn triangle_indices(&self) -> Result<&[u32]> {
        let submesh = self.submeshes().first().ok_or(CutError::NoSubMesh)?;
        submesh
            .start
            .checked_add(submesh.count)
            .and_then(|end| self.indices().get(submesh.start..end))
            .ok_or(CutError::SubMeshOutOfRange {
                start: submesh.start,
                end: submesh.start.saturating_add(submesh.count),
                len: self.indices().len(),
            })
    }

    /// Triangles of the first submesh. Empty if the submesh is malformed,
    /// use [`Mesh::validate`] to find out why.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangle_indices()
            .unwrap_or_default()
            .chunks_exact(3)
            .map(|x| [x[0], x[1], x[2]])
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices().map(|x| x.len() / 3).unwrap_or(0)
    }

    /// Checks that the first submesh is a well formed triangle list over the
    /// vertex buffer.
    pub fn validate(&self) -> Result<()> {
        let indices = self.triangle_indices()?;
        if indices.len() % 3 != 0 {
            return Err(CutError::IndexCountNotTriangles(indices.len()));
        }

        let vertex_count = self.vertex_count();
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(CutError::IndexOutOfRange {
                index,
                position,
                vertex_count,
            });
        }

        Ok(())
    }

    pub fn face_verts(&self, [a, b, c]: [u32; 3]) -> [Pos; 3] {
        let v = self.positions();
        [v[a as usize], v[b as usize], v[c as usize]]
    }

    /// Unnormalized face normal, its length is twice the triangle's area.
    pub fn face_cross(&self, face: [u32; 3]) -> Pos {
        let [v0, v1, v2] = self.face_verts(face);
        (v1 - v0).cross(&(v2 - v0))
    }

    pub fn face_normal(&self, face: [u32; 3]) -> Pos {
        self.face_cross(face).normalize()
    }

    /// Total surface area of the first submesh.
    pub fn area(&self) -> f32 {
        self.triangles()
            .map(|face| self.face_cross(face).norm() / 2.0)
            .sum()
    }

    /// Checks that every edge is shared by exactly two triangles.
    pub fn is_manifold(&self) -> bool {
        let mut edges = HashMap::<_, u8>::new();

        for [a, b, c] in self.triangles() {
            for (a, b) in [(a, b), (b, c), (c, a)] {
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        edges.values().all(|&count| count == 2)
    }

    /// Get the minimum and maximum of each component of every vertex in the
    /// mesh. These points define the bounding box of the model.
    pub fn bounds(&self) -> (Pos, Pos) {
        self.positions().iter().fold(
            (Pos::repeat(f32::MAX), Pos::repeat(f32::MIN)),
            |(min, max), v| (min.inf(v), max.sup(v)),
        )
    }
}
