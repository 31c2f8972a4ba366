use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{plane::Plane, Pos};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CutConfig {
    /// Direction the above side faces.
    pub normal: Vector3<f32>,
    /// Any point on the cutting plane.
    pub point: Pos,
    /// How far each output mesh should be pushed away from the plane when
    /// displayed.
    pub offset: f32,
    pub execution: Execution,
}

/// Whether the per-triangle passes run on the current thread or on the
/// rayon thread pool. Both produce identical output.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Serial,
    Parallel,
}

impl CutConfig {
    pub fn plane(&self) -> Plane {
        Plane::from_normal_and_point(self.normal, self.point)
    }

    /// Translation for the mesh above the plane.
    pub fn above_offset(&self) -> Vector3<f32> {
        self.normal.normalize() * self.offset
    }

    /// Translation for the mesh below the plane.
    pub fn below_offset(&self) -> Vector3<f32> {
        self.normal.normalize() * -self.offset
    }
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            normal: Vector3::y(),
            point: Pos::zeros(),
            offset: 0.1,
            execution: Execution::Serial,
        }
    }
}
