//! Splits triangle meshes along a plane into two new meshes, one for each
//! side. Straddling triangles are retriangulated with new vertices placed
//! where their edges cross the plane, interpolating every vertex channel.
//! See [`cutter::cut_mesh`] for the whole pipeline or [`cutter::MeshCutter`]
//! to keep the halves of a mesh up to date as the plane changes.

use nalgebra::Vector3;

pub mod buffers;
pub mod builder;
pub mod classify;
pub mod config;
pub mod cut;
pub mod cutter;
pub mod error;
pub mod mesh;
pub mod plane;
pub mod retriangulate;
pub mod vertex;

pub type Pos = Vector3<f32>;
