//! Demonstration of mesh generation

use rust_delaunay_sphere::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Generating sphere mesh...");

    let config = MeshConfigBuilder::new()
        .detail(MeshDetail::Low)
        .sector_count(6)?
        .radius(10.0)?
        .build()?;

    let mesh = generate_mesh(&config)?;

    println!("\nMesh statistics:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Indices: {}", mesh.indices.len());

    // Memory estimate
    let mem_positions = mesh.positions.len() * 12; // 3 floats * 4 bytes
    let mem_normals = mesh.normals.len() * 12;
    let mem_indices = mesh.indices.len() * 4;
    let total = mem_positions + mem_normals + mem_indices;
    println!("\nMemory usage:");
    println!("  Positions: {} bytes", mem_positions);
    println!("  Normals: {} bytes", mem_normals);
    println!("  Indices: {} bytes", mem_indices);
    println!("  Total: {} bytes ({:.2} MB)", total, total as f32 / 1024.0 / 1024.0);

    println!("\n=== Testing all detail presets ===");
    for detail in [MeshDetail::Low, MeshDetail::Medium, MeshDetail::High] {
        let config = MeshConfigBuilder::new().detail(detail).sector_count(8)?.build()?;
        let triangulation = TriangulationEngine::new(config)?.generate()?;
        let report = validate(&triangulation);

        println!(
            "{}: {} points, {} triangles, {}",
            detail.name(),
            config.point_count(),
            triangulation.triangle_count(),
            report.summary()
        );
    }

    Ok(())
}
