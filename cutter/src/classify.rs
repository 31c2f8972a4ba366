//! Sorting triangles into the half-spaces of a plane.

use rayon::prelude::*;

use crate::{
    config::Execution,
    cut::TriangleCut,
    error::Result,
    plane::{Plane, Side},
    Pos,
};

/// Where a single triangle ended up relative to the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Above([u32; 3]),
    Below([u32; 3]),
    Straddling(TriangleCut),
}

/// Result of classifying every triangle of a mesh.
#[derive(Debug, Default)]
pub struct Classification {
    /// Triangles entirely above the plane, as a flat index list.
    pub above: Vec<u32>,
    /// Triangles entirely below (or on) the plane.
    pub below: Vec<u32>,
    /// One cut per straddling triangle, in triangle order.
    pub cuts: Vec<TriangleCut>,
}

impl Classification {
    /// True if any triangle crosses the plane.
    pub fn intersected(&self) -> bool {
        !self.cuts.is_empty()
    }
}

/// Signed distance of every position to the plane.
pub fn signed_distances(
    plane: &Plane,
    positions: &[Pos],
    execution: Execution,
) -> Result<Vec<f32>> {
    let distance = |p: &Pos| plane.signed_distance(p);
    let mut out: Vec<f32> = Vec::new();
    out.try_reserve_exact(positions.len())?;
    match execution {
        Execution::Serial => out.extend(positions.iter().map(distance)),
        Execution::Parallel => out.par_extend(positions.par_iter().map(distance)),
    }

    Ok(out)
}

/// Places a single triangle given the signed distances of all vertices.
/// Indices must already be validated against `distances`.
pub fn place_triangle(distances: &[f32], triangle: [u32; 3]) -> Placement {
    let sides = triangle.map(|i| Side::of_distance(distances[i as usize]));
    match sides {
        [Side::Above, Side::Above, Side::Above] => Placement::Above(triangle),
        [Side::Below, Side::Below, Side::Below] => Placement::Below(triangle),
        _ => Placement::Straddling(TriangleCut::new(triangle, sides, distances)),
    }
}

/// Classifies every triangle of `indices` (a validated triangle list),
/// keeping the original triangle order within each output.
pub fn classify(distances: &[f32], indices: &[u32], execution: Execution) -> Result<Classification> {
    let place = |x: &[u32]| place_triangle(distances, [x[0], x[1], x[2]]);
    let mut placements: Vec<Placement> = Vec::new();
    placements.try_reserve_exact(indices.len() / 3)?;
    match execution {
        Execution::Serial => placements.extend(indices.chunks_exact(3).map(place)),
        Execution::Parallel => placements.par_extend(indices.par_chunks_exact(3).map(place)),
    }

    let (mut above_count, mut below_count, mut cut_count) = (0, 0, 0);
    for placement in &placements {
        match placement {
            Placement::Above(_) => above_count += 1,
            Placement::Below(_) => below_count += 1,
            Placement::Straddling(_) => cut_count += 1,
        }
    }

    let mut out = Classification::default();
    out.above.try_reserve_exact(above_count * 3)?;
    out.below.try_reserve_exact(below_count * 3)?;
    out.cuts.try_reserve_exact(cut_count)?;

    for placement in placements {
        match placement {
            Placement::Above(face) => out.above.extend_from_slice(&face),
            Placement::Below(face) => out.below.extend_from_slice(&face),
            Placement::Straddling(cut) => out.cuts.push(cut),
        }
    }

    Ok(out)
}
