use nalgebra::{Unit, Vector3};

use crate::Pos;

/// A cutting plane, stored as a unit normal and a signed offset so that
/// points on the plane satisfy `dot(normal, p) + offset == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Unit<Vector3<f32>>,
    offset: f32,
}

/// The half-space a vertex falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Above,
    Below,
}

impl Plane {
    /// Creates a plane from a (not necessarily normalized) normal and offset.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        Self {
            normal: Unit::new_normalize(normal),
            offset,
        }
    }

    /// Creates the plane with the given normal passing through `point`.
    pub fn from_normal_and_point(normal: Vector3<f32>, point: Pos) -> Self {
        let normal = Unit::new_normalize(normal);
        Self {
            normal,
            offset: -normal.dot(&point),
        }
    }

    pub fn normal(&self) -> &Unit<Vector3<f32>> {
        &self.normal
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The same plane facing the other way, which swaps the two sides.
    pub fn flipped(&self) -> Self {
        Self {
            normal: Unit::new_unchecked(-self.normal.into_inner()),
            offset: -self.offset,
        }
    }

    pub fn signed_distance(&self, point: &Pos) -> f32 {
        self.normal.dot(point) + self.offset
    }

    /// Points exactly on the plane count as below.
    pub fn side(&self, point: &Pos) -> Side {
        Side::of_distance(self.signed_distance(point))
    }
}

impl Side {
    /// Only strictly positive distances are above, so `0.0` (and NaN) are
    /// below. There is no tolerance around the plane.
    #[inline]
    pub fn of_distance(distance: f32) -> Self {
        if distance > 0.0 {
            Side::Above
        } else {
            Side::Below
        }
    }

    pub fn is_above(self) -> bool {
        self == Side::Above
    }
}
