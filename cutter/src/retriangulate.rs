//! Splitting straddling triangles into pieces on either side of the plane.

use rayon::prelude::*;

use crate::{
    buffers::VertexBuffer,
    classify::Classification,
    config::Execution,
    cut::TriangleCut,
    error::{CutError, Result},
    plane::Side,
    vertex::Vertex,
};

/// The pieces a single straddling triangle is split into. `single` lies on
/// the side of the isolated vertex and `pair` (a quad split along `q1`) on
/// the other side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitTriangle {
    pub vertices: [Vertex; 2],
    pub isolated: Side,
    pub single: [u32; 3],
    pub pair: [[u32; 3]; 2],
}

/// Final index lists for both sides plus the vertices appended after the
/// original ones.
#[derive(Debug, Default)]
pub struct Retriangulation {
    pub above: Vec<u32>,
    pub below: Vec<u32>,
    pub appended: Vec<Vertex>,
}

impl SplitTriangle {
    /// Splits the triangle described by `cut`. The two new vertices get
    /// indices `first` and `first + 1`.
    pub fn new(cut: &TriangleCut, vertices: &VertexBuffer, first: u32) -> Self {
        let TriangleCut { cut1, cut2 } = cut;
        let q1 = Vertex::lerp(
            &vertices.vertex(cut1.from as usize),
            &vertices.vertex(cut1.to as usize),
            cut1.t,
        );
        let q2 = Vertex::lerp(
            &vertices.vertex(cut2.from as usize),
            &vertices.vertex(cut2.to as usize),
            cut2.t,
        );
        let (q1_idx, q2_idx) = (first, first + 1);

        let isolated = cut.isolated_side();
        let (single, pair) = match isolated {
            Side::Above => {
                let (v0, v1, v2) = (cut1.from, cut1.to, cut2.to);
                ([v0, q1_idx, q2_idx], [[v1, v2, q1_idx], [v2, q2_idx, q1_idx]])
            }
            Side::Below => {
                let (v0, v1, v2) = (cut1.to, cut1.from, cut2.from);
                ([v0, q2_idx, q1_idx], [[v1, q1_idx, v2], [v2, q1_idx, q2_idx]])
            }
        };

        Self {
            vertices: [q1, q2],
            isolated,
            single,
            pair,
        }
    }

    fn above(&self) -> &[[u32; 3]] {
        match self.isolated {
            Side::Above => std::slice::from_ref(&self.single),
            Side::Below => &self.pair,
        }
    }

    fn below(&self) -> &[[u32; 3]] {
        match self.isolated {
            Side::Above => &self.pair,
            Side::Below => std::slice::from_ref(&self.single),
        }
    }
}

/// Splits every cut triangle and appends the pieces after the whole
/// triangles of `classification`. New vertices are numbered from
/// `vertices.len()` in cut order, `q1` before `q2`.
pub fn retriangulate(
    classification: Classification,
    vertices: &VertexBuffer,
    execution: Execution,
) -> Result<Retriangulation> {
    let Classification {
        mut above,
        mut below,
        cuts,
    } = classification;

    let base = appended_base(vertices.len(), cuts.len())?;
    let split_cut = |(i, cut): (usize, &TriangleCut)| {
        SplitTriangle::new(cut, vertices, base + 2 * i as u32)
    };
    let mut splits: Vec<SplitTriangle> = Vec::new();
    splits.try_reserve_exact(cuts.len())?;
    match execution {
        Execution::Serial => splits.extend(cuts.iter().enumerate().map(split_cut)),
        Execution::Parallel => splits.par_extend(cuts.par_iter().enumerate().map(split_cut)),
    }

    let isolated_above = splits.iter().filter(|x| x.isolated.is_above()).count();
    let isolated_below = splits.len() - isolated_above;
    above.try_reserve_exact(3 * (isolated_above + 2 * isolated_below))?;
    below.try_reserve_exact(3 * (2 * isolated_above + isolated_below))?;

    let mut appended = Vec::new();
    appended.try_reserve_exact(2 * splits.len())?;

    for split in &splits {
        appended.extend_from_slice(&split.vertices);
        above.extend(split.above().iter().flatten());
        below.extend(split.below().iter().flatten());
    }

    Ok(Retriangulation {
        above,
        below,
        appended,
    })
}

/// Index of the first appended vertex. Fails if the vertices appended for
/// `cuts` split triangles would not fit in 32-bit indices.
fn appended_base(vertex_count: usize, cuts: usize) -> Result<u32> {
    let total = cuts
        .checked_mul(2)
        .and_then(|x| x.checked_add(vertex_count))
        .unwrap_or(usize::MAX);
    u32::try_from(total).map_err(|_| CutError::TooManyVertices(total))?;
    Ok(vertex_count as u32)
}
