//! Per-sector statistics for a range of sector counts

use rust_delaunay_sphere::*;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let point_count = 20_000;

    for sectors in [3, 4, 8, 16] {
        let started = Instant::now();
        let triangulation = generate(point_count, sectors)?;
        let elapsed = started.elapsed();

        println!(
            "\n{} sectors: {} triangles in {:.1} ms",
            sectors,
            triangulation.triangle_count(),
            elapsed.as_secs_f64() * 1000.0
        );

        for summary in triangulation.sectors() {
            let stats = summary.stats;
            println!(
                "  sector {:2}: {:6} points, {:6} flips, {:6} triangles, {:7} simplices, depth {}",
                summary.layout.sector.index(),
                stats.inserted,
                stats.flips,
                stats.triangles,
                stats.history_size,
                stats.max_depth
            );
        }

        let report = validate(&triangulation);
        println!("  {}", report);
    }

    // Jittered lattice, reproducible per seed
    let config = MeshConfigBuilder::new()
        .detail(MeshDetail::Custom { point_count })
        .jitter(0.3)?
        .seed(42)
        .build()?;
    let jittered = TriangulationEngine::new(config)?.generate()?;
    println!(
        "\nJittered (seed {}): {} triangles, {}",
        config.seed,
        jittered.triangle_count(),
        validate(&jittered).summary()
    );

    Ok(())
}
