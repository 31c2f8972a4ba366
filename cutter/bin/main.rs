use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use args::{Args, Shape};
use cutter::{
    buffers::Channels,
    builder::MeshBuilder,
    cutter::{CutResult, MeshCutter},
    mesh::Mesh,
    Pos,
};

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("cutter", level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mesh = build_mesh(&args);
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Generated {:?}",
        args.shape
    );

    let now = Instant::now();
    let mut cutter = MeshCutter::new(args.cut_config());
    cutter.set_mesh(Some(mesh))?;
    let elapsed = now.elapsed();

    let Some(result) = cutter.output() else {
        return Ok(());
    };

    if !result.intersected() {
        println!("Plane doesn't intersect the mesh.");
    }

    print_half("Above", &result.above, cutter.config().above_offset());
    print_half("Below", &result.below, cutter.config().below_offset());
    print_summary(result);
    println!("Done. Elapsed: {:.3}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}

fn build_mesh(args: &Args) -> Mesh {
    let channels = if args.attributes {
        Channels::all()
    } else {
        Channels::POSITION
    };

    let mut builder = MeshBuilder::new(channels);
    match args.shape {
        Shape::Cube => builder.add_cuboid(Pos::zeros(), Pos::repeat(1.0)),
        Shape::Cylinder => builder.add_cylinder(Pos::zeros(), 1.0, (0.5, 0.5), args.precision),
    }
    builder.build()
}

fn print_half(name: &str, mesh: &Mesh, offset: Pos) {
    println!(
        "{name}: {{ vert: {}, face: {}, area: {:.4}, offset: [{:.3}, {:.3}, {:.3}] }}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.area(),
        offset.x,
        offset.y,
        offset.z
    );
}

fn print_summary(result: &CutResult) {
    println!(
        " \\ {} straddling triangles, {} new vertices",
        result.straddling, result.appended
    );
}
