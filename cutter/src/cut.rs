//! Descriptions of where a straddling triangle crosses the plane.

use crate::plane::Side;

/// The point where an edge crosses the plane. `from` is always the endpoint
/// above the plane and `to` the one below, and the crossing is at
/// `lerp(vertex[from], vertex[to], t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCut {
    pub from: u32,
    pub to: u32,
    pub t: f32,
}

/// The two crossed edges of a straddling triangle. Both edges touch the
/// triangle's isolated vertex, so either `cut1.from == cut2.from` (isolated
/// vertex above) or `cut1.to == cut2.to` (isolated vertex below).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleCut {
    pub cut1: EdgeCut,
    pub cut2: EdgeCut,
}

impl EdgeCut {
    /// Builds the crossing of the edge between an `above` and a `below`
    /// vertex from their signed distances.
    pub fn new(above: u32, below: u32, distances: &[f32]) -> Self {
        let (d_above, d_below) = (distances[above as usize], distances[below as usize]);
        Self {
            from: above,
            to: below,
            t: d_above / (d_above - d_below),
        }
    }
}

impl TriangleCut {
    /// Creates the cut for a triangle whose vertex `sides` are mixed.
    pub fn new(triangle: [u32; 3], sides: [Side; 3], distances: &[f32]) -> Self {
        debug_assert!(
            !(sides[0] == sides[1] && sides[1] == sides[2]),
            "triangle doesn't straddle the plane"
        );

        // The isolated vertex is the one whose side differs from the other
        // two. Walking the winding from it gives `m1` then `m2`.
        let isolated = if sides[1] == sides[2] {
            0
        } else if sides[0] == sides[2] {
            1
        } else {
            2
        };
        let iso = triangle[isolated];
        let m1 = triangle[(isolated + 1) % 3];
        let m2 = triangle[(isolated + 2) % 3];

        match sides[isolated] {
            Side::Above => Self {
                cut1: EdgeCut::new(iso, m1, distances),
                cut2: EdgeCut::new(iso, m2, distances),
            },
            Side::Below => Self {
                cut1: EdgeCut::new(m2, iso, distances),
                cut2: EdgeCut::new(m1, iso, distances),
            },
        }
    }

    /// The side holding this triangle's isolated vertex.
    pub fn isolated_side(&self) -> Side {
        if self.cut1.from == self.cut2.from {
            Side::Above
        } else {
            Side::Below
        }
    }

    /// Index of the vertex alone on its side of the plane.
    pub fn isolated(&self) -> u32 {
        match self.isolated_side() {
            Side::Above => self.cut1.from,
            Side::Below => self.cut1.to,
        }
    }
}
