use tracing::{debug, trace, warn};

use crate::{
    classify,
    config::{CutConfig, Execution},
    error::Result,
    mesh::Mesh,
    plane::Plane,
    retriangulate::retriangulate,
};

/// The two halves of a cut mesh. Both share the source's channel layout and
/// hold every original vertex followed by the appended intersection vertices.
#[derive(Debug, Clone)]
pub struct CutResult {
    pub above: Mesh,
    pub below: Mesh,
    /// Number of triangles that crossed the plane.
    pub straddling: usize,
    /// Number of vertices appended after the original ones.
    pub appended: usize,
}

/// Keeps a source mesh and cutting config around and rebuilds the two
/// halves whenever either of them changes.
#[derive(Debug, Default)]
pub struct MeshCutter {
    config: CutConfig,
    mesh: Option<Mesh>,
    output: Option<CutResult>,
}

impl CutResult {
    /// Whether the plane crossed the mesh at all.
    pub fn intersected(&self) -> bool {
        self.straddling > 0
    }
}

/// Cuts `mesh` along `plane`. The mesh is checked first, so a malformed mesh
/// produces an error without doing any work.
pub fn cut_mesh(mesh: &Mesh, plane: &Plane, execution: Execution) -> Result<CutResult> {
    mesh.validate()
        .inspect_err(|err| warn!("Refusing to cut malformed mesh: {err}"))?;

    let indices = mesh.triangle_indices()?;
    let distances = classify::signed_distances(plane, mesh.positions(), execution)?;
    let classification = classify::classify(&distances, indices, execution)?;

    if !classification.intersected() {
        trace!(
            triangles = indices.len() / 3,
            "Plane doesn't intersect mesh, skipping retriangulation"
        );
        return Ok(CutResult {
            above: Mesh::new(mesh.vertices().extend_with(&[])?, classification.above),
            below: Mesh::new(mesh.vertices().extend_with(&[])?, classification.below),
            straddling: 0,
            appended: 0,
        });
    }

    let straddling = classification.cuts.len();
    let out = retriangulate(classification, mesh.vertices(), execution)?;
    debug!(
        triangles = indices.len() / 3,
        straddling,
        appended = out.appended.len(),
        "Cut mesh"
    );

    Ok(CutResult {
        above: Mesh::new(mesh.vertices().extend_with(&out.appended)?, out.above),
        below: Mesh::new(mesh.vertices().extend_with(&out.appended)?, out.below),
        straddling,
        appended: out.appended.len(),
    })
}

impl MeshCutter {
    pub fn new(config: CutConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &CutConfig {
        &self.config
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Replaces the config and recomputes the output.
    pub fn set_config(&mut self, config: CutConfig) -> Result<bool> {
        self.config = config;
        self.invalidate()
    }

    /// Replaces the source mesh and recomputes the output.
    pub fn set_mesh(&mut self, mesh: Option<Mesh>) -> Result<bool> {
        self.mesh = mesh;
        self.invalidate()
    }

    /// Recomputes both halves from the current mesh and config, returning
    /// whether anything was computed. Without a source mesh this does
    /// nothing. On error the previous output is kept.
    pub fn invalidate(&mut self) -> Result<bool> {
        let Some(mesh) = &self.mesh else {
            return Ok(false);
        };

        let result = cut_mesh(mesh, &self.config.plane(), self.config.execution)?;
        self.output = Some(result);
        Ok(true)
    }

    pub fn output(&self) -> Option<&CutResult> {
        self.output.as_ref()
    }

    pub fn above(&self) -> Option<&Mesh> {
        self.output.as_ref().map(|x| &x.above)
    }

    pub fn below(&self) -> Option<&Mesh> {
        self.output.as_ref().map(|x| &x.below)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use nalgebra::{Vector3, Vector4};
    use proptest::prelude::*;

    use super::*;
    use crate::{
        buffers::{Channels, VertexBuffer},
        builder::MeshBuilder,
        error::CutError,
        mesh::SubMesh,
        vertex::Color32,
        Pos,
    };

    type PosKey = [u32; 3];

    fn cube(channels: Channels) -> Mesh {
        let mut builder = MeshBuilder::new(channels);
        builder.add_cuboid(Pos::zeros(), Pos::repeat(1.0));
        builder.build()
    }

    fn cylinder() -> Mesh {
        let mut builder = MeshBuilder::new(Channels::all());
        builder.add_cylinder(Pos::new(0.0, -1.0, 0.0), 2.0, (1.0, 0.6), 12);
        builder.build()
    }

    fn pos_key(p: &Pos) -> PosKey {
        // Adding zero folds -0.0 into 0.0.
        [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
    }

    /// Edges used by exactly one triangle, with vertices welded by position.
    fn boundary_edges(mesh: &Mesh) -> HashSet<(PosKey, PosKey)> {
        let key = |i: u32| pos_key(&mesh.positions()[i as usize]);
        let mut edges = HashMap::<_, u32>::new();
        for [a, b, c] in mesh.triangles() {
            for (a, b) in [(a, b), (b, c), (c, a)] {
                let (a, b) = (key(a), key(b));
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        edges
            .into_iter()
            .filter(|(_, count)| *count == 1)
            .map(|(edge, _)| edge)
            .collect()
    }

    fn appended_positions(source: &Mesh, half: &Mesh) -> Vec<Pos> {
        half.positions()[source.vertex_count()..].to_vec()
    }

    #[test]
    fn cuts_unit_cube() {
        let cube = cube(Channels::POSITION);
        let plane = Plane::new(Vector3::y(), -0.5);
        let out = cut_mesh(&cube, &plane, Execution::Serial).unwrap();

        assert!(out.intersected());
        assert_eq!(out.straddling, 8);
        assert_eq!(out.appended, 16);
        assert_eq!(out.above.triangle_count(), 14);
        assert_eq!(out.below.triangle_count(), 14);
        assert_eq!(out.above.vertex_count(), 24);
        assert_eq!(out.above.channels(), Channels::POSITION);

        let appended = appended_positions(&cube, &out.above);
        assert!(appended.iter().all(|p| p.y == 0.5));

        // One distinct crossing per cut edge, four vertical and four diagonal.
        let distinct = appended.iter().map(pos_key).collect::<HashSet<_>>();
        assert_eq!(distinct.len(), 8);

        let seam = boundary_edges(&out.above);
        assert_eq!(seam.len(), 8);
        assert_eq!(seam, boundary_edges(&out.below));
        assert!((out.above.area() - 3.0).abs() < 1e-5);
        assert!((out.below.area() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn plane_missing_mesh() {
        let cube = cube(Channels::all());
        let plane = Plane::new(Vector3::y(), 5.0);
        let out = cut_mesh(&cube, &plane, Execution::Parallel).unwrap();

        assert!(!out.intersected());
        assert_eq!(out.appended, 0);
        assert_eq!(out.above.indices(), cube.indices());
        assert_eq!(out.above.vertices(), cube.vertices());
        assert_eq!(out.below.triangle_count(), 0);
        assert_eq!(out.below.vertex_count(), cube.vertex_count());

        let out = cut_mesh(&cube, &plane.flipped(), Execution::Serial).unwrap();
        assert_eq!(out.above.triangle_count(), 0);
        assert_eq!(out.below.indices(), cube.indices());
    }

    #[test]
    fn keeps_channel_layout() {
        let cube = cube(Channels::NORMAL | Channels::TEX_COORD);
        let plane = Plane::new(Vector3::new(1.0, 1.0, 0.0), -0.8);
        let out = cut_mesh(&cube, &plane, Execution::Serial).unwrap();

        for half in [&out.above, &out.below] {
            assert_eq!(half.channels(), cube.channels());
            assert_eq!(half.vertices().normals().unwrap().len(), half.vertex_count());
            assert!(half.vertices().colors().is_none());
        }
    }

    #[test]
    fn rejects_malformed_mesh() {
        let vertices = VertexBuffer::new(vec![Pos::zeros(), Pos::x(), Pos::y()]);
        let mesh = Mesh::new(vertices, vec![0, 1, 7]);
        let plane = Plane::new(Vector3::y(), -0.5);

        let err = cut_mesh(&mesh, &plane, Execution::Serial).unwrap_err();
        assert!(matches!(err, CutError::IndexOutOfRange { index: 7, .. }));

        let vertices = VertexBuffer::new(vec![Pos::zeros(), Pos::x(), Pos::y()]);
        let submesh = SubMesh {
            start: usize::MAX,
            count: 3,
        };
        let mesh = Mesh::with_submeshes(vertices, vec![0, 1, 2], vec![submesh]);
        let err = cut_mesh(&mesh, &plane, Execution::Serial).unwrap_err();
        assert!(matches!(err, CutError::SubMeshOutOfRange { len: 3, .. }));
    }

    #[test]
    fn interpolates_attributes() {
        let vertices = VertexBuffer::new(vec![
            Pos::new(0.0, 0.0, 0.0),
            Pos::new(2.0, 0.0, 0.0),
            Pos::new(0.0, 2.0, 0.0),
        ])
        .with_normals(vec![Vector3::z(), Vector3::z(), Vector3::x()])
        .unwrap()
        .with_colors(vec![
            Color32::new(200, 100, 50, 255),
            Color32::new(0, 255, 0, 255),
            Color32::BLACK,
        ])
        .unwrap()
        .with_tex_coords(vec![Vector4::zeros(), Vector4::x(), Vector4::y()])
        .unwrap();
        let mesh = Mesh::new(vertices, vec![0, 1, 2]);

        // y = 1, vertex 2 is alone above and both edges are cut halfway.
        let plane = Plane::new(Vector3::y(), -1.0);
        let out = cut_mesh(&mesh, &plane, Execution::Serial).unwrap();

        for half in [&out.above, &out.below] {
            let buffer = half.vertices();
            assert_eq!(buffer.positions()[3..], [Pos::new(0.0, 1.0, 0.0), Pos::new(1.0, 1.0, 0.0)]);
            assert_eq!(
                buffer.normals().unwrap()[3..],
                [Vector3::new(0.5, 0.0, 0.5), Vector3::new(0.5, 0.0, 0.5)]
            );
            assert_eq!(
                buffer.colors().unwrap()[3..],
                [Color32::new(100, 50, 25, 255), Color32::new(0, 127, 0, 255)]
            );
            assert_eq!(
                buffer.tex_coords().unwrap()[3..],
                [Vector4::new(0.0, 0.5, 0.0, 0.0), Vector4::new(0.5, 0.5, 0.0, 0.0)]
            );
            assert_eq!(buffer.vertex(1).color, Color32::new(0, 255, 0, 255));
        }
    }

    #[test]
    fn cutter_without_mesh_is_noop() {
        let mut cutter = MeshCutter::default();
        assert!(!cutter.invalidate().unwrap());
        assert!(cutter.output().is_none());
    }

    #[test]
    fn cutter_keeps_output_on_error() {
        let mut cutter = MeshCutter::new(CutConfig {
            point: Pos::repeat(0.5),
            ..Default::default()
        });
        assert!(cutter.set_mesh(Some(cube(Channels::POSITION))).unwrap());
        assert_eq!(cutter.output().map(|x| x.straddling), Some(8));

        let broken = Mesh::new(VertexBuffer::new(vec![Pos::zeros()]), vec![0, 0]);
        assert!(cutter.set_mesh(Some(broken)).is_err());
        assert_eq!(cutter.above().map(Mesh::triangle_count), Some(14));

        assert!(cutter.set_mesh(None).is_ok());
        assert!(cutter.below().is_some());
    }

    #[test]
    fn cutter_follows_config() {
        let mut cutter = MeshCutter::new(CutConfig {
            point: Pos::new(0.0, -1.0, 0.0),
            ..Default::default()
        });
        cutter.set_mesh(Some(cube(Channels::POSITION))).unwrap();
        assert_eq!(cutter.above().map(Mesh::triangle_count), Some(12));

        let config = CutConfig {
            normal: Vector3::new(0.0, 0.0, 2.0),
            point: Pos::new(0.0, 0.0, 0.25),
            offset: 0.5,
            execution: Execution::Parallel,
        };
        assert!(cutter.set_config(config).unwrap());
        assert_eq!(cutter.output().map(|x| x.straddling), Some(8));
        assert_eq!(cutter.config().above_offset(), Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(cutter.config().below_offset(), Vector3::new(0.0, 0.0, -0.5));
    }

    prop_compose! {
        fn arb_plane()(
            normal in (-1.0_f32..1.0, -1.0_f32..1.0, -1.0_f32..1.0)
                .prop_filter("normal too short", |(x, y, z)| x * x + y * y + z * z > 0.01),
            offset in -1.2_f32..1.2,
        ) -> Plane {
            Plane::new(Vector3::new(normal.0, normal.1, normal.2), offset)
        }
    }

    prop_compose! {
        fn arb_point()(x in -1.0_f32..1.0, y in -1.0_f32..1.0, z in -1.0_f32..1.0) -> Pos {
            Pos::new(x, y, z)
        }
    }

    proptest! {
        #[test]
        fn cut_is_consistent(plane in arb_plane()) {
            for mesh in [cube(Channels::all()), cylinder()] {
                let out = cut_mesh(&mesh, &plane, Execution::Serial).unwrap();

                // Every straddling triangle turns into three.
                let total = out.above.triangle_count() + out.below.triangle_count();
                prop_assert_eq!(total, mesh.triangle_count() + 2 * out.straddling);
                prop_assert_eq!(out.appended, 2 * out.straddling);

                let area = out.above.area() + out.below.area();
                prop_assert!((area - mesh.area()).abs() < 1e-3 * mesh.area());

                for p in appended_positions(&mesh, &out.above) {
                    prop_assert!(plane.signed_distance(&p).abs() < 1e-4);
                }

                prop_assert_eq!(boundary_edges(&out.above), boundary_edges(&out.below));
            }
        }

        #[test]
        fn parallel_matches_serial(plane in arb_plane()) {
            let mesh = cylinder();
            let serial = cut_mesh(&mesh, &plane, Execution::Serial).unwrap();
            let parallel = cut_mesh(&mesh, &plane, Execution::Parallel).unwrap();

            prop_assert_eq!(serial.above.indices(), parallel.above.indices());
            prop_assert_eq!(serial.below.indices(), parallel.below.indices());
            prop_assert_eq!(serial.above.vertices(), parallel.above.vertices());
        }

        #[test]
        fn keeps_orientation(
            a in arb_point(),
            b in arb_point(),
            c in arb_point(),
            plane in arb_plane(),
        ) {
            let source = (b - a).cross(&(c - a));
            prop_assume!(source.norm() > 1e-3);

            let mesh = Mesh::new(VertexBuffer::new(vec![a, b, c]), vec![0, 1, 2]);
            let out = cut_mesh(&mesh, &plane, Execution::Serial).unwrap();

            for half in [&out.above, &out.below] {
                for face in half.triangles() {
                    let cross = half.face_cross(face);
                    if cross.norm() > 1e-5 {
                        prop_assert!(cross.dot(&source) > 0.0);
                    }
                }
            }
        }
    }
}
