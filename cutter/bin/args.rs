use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cutter::config::{CutConfig, Execution};
use nalgebra::{ArrayStorage, Const, Matrix, Scalar, Vector3, U1};
use num_traits::Zero;

#[derive(Debug, Parser)]
/// Cuts a generated mesh along a plane and reports what each half contains.
pub struct Args {
    #[arg(long, value_enum, default_value_t = Shape::Cube)]
    /// Mesh to generate and cut.
    pub shape: Shape,
    #[arg(long, default_value_t = 32)]
    /// Number of segments around the cylinder.
    pub precision: u32,
    #[arg(long)]
    /// Attach normals, colors and texture coordinates to every vertex.
    pub attributes: bool,

    #[arg(long, default_value = "0, 1, 0", value_parser = vector_value_parser::<f32, 3>)]
    /// Normal of the cutting plane, pointing towards the above side.
    pub normal: Vector3<f32>,
    #[arg(long, default_value = "0, 0.5, 0", value_parser = vector_value_parser::<f32, 3>)]
    /// Any point on the cutting plane.
    pub point: Vector3<f32>,
    #[arg(long, default_value_t = 0.1)]
    /// Distance each half is moved away from the plane for display.
    pub offset: f32,

    #[arg(long)]
    /// Classify and split triangles on the rayon thread pool.
    pub parallel: bool,
    #[arg(short, long)]
    /// Log everything the cutter does.
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shape {
    Cube,
    Cylinder,
}

impl Args {
    pub fn cut_config(&self) -> CutConfig {
        CutConfig {
            normal: self.normal,
            point: self.point,
            offset: self.offset,
            execution: if self.parallel {
                Execution::Parallel
            } else {
                Execution::Serial
            },
        }
    }
}

fn vector_value_parser<T, const N: usize>(
    raw: &str,
) -> Result<Matrix<T, Const<N>, U1, ArrayStorage<T, N, 1>>>
where
    T: FromStr + Scalar + Zero,
    T::Err: Send + Sync + std::error::Error + 'static,
{
    let mut vec = Matrix::<T, Const<N>, U1, ArrayStorage<T, N, 1>>::zeros();

    let mut parts = raw.splitn(N, ',');
    for i in 0..N {
        let element = parts.next().context("Missing vector element")?.trim();
        vec[i] = element
            .parse()
            .context("Can't convert element from string")?;
    }

    Ok(vec)
}
