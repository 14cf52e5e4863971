//! Fibonacci Lattice Point Distribution
//!
//! Generates near-uniform point distributions on the unit sphere using the
//! Fibonacci spiral (golden angle) method.
//!
//! # Algorithm
//!
//! For point `i` of `n`, with `t = i + 0.5`:
//! - Polar angle: `φ = acos(1 - 2t / n)`, evenly spaced in z
//! - Azimuth: `θ = π(1 + √5) t`, golden angle increments
//!
//! An optional tangential jitter breaks up the visible spiral pattern while
//! keeping the spacing even. Without jitter the lattice is a closed-form
//! function of `(i, n)` and bit-identical across calls.
//!
//! # References
//!
//! - [Fibonacci Lattice Optimization](https://extremelearning.com.au/how-to-evenly-distribute-points-on-a-sphere-more-effectively-than-the-canonical-fibonacci-lattice/)

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::{PI, TAU};

/// Point `index` of an `count`-point Fibonacci lattice
#[inline]
pub fn fibonacci_point(index: usize, count: usize) -> DVec3 {
    let t = index as f64 + 0.5;
    let phi = (1.0 - 2.0 * t / count as f64).acos();
    let theta = PI * (1.0 + 5.0f64.sqrt()) * t;

    DVec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos())
}

/// Generate points on the unit sphere using the Fibonacci lattice
///
/// # Arguments
///
/// * `count` - Number of points to generate
/// * `jitter` - Tangential jitter as a fraction of the average spacing (0 disables)
/// * `seed` - Seed for deterministic jitter
///
/// # Example
///
/// ```rust
/// use rust_delaunay_sphere::generation::generate_fibonacci_sphere_points;
///
/// let points = generate_fibonacci_sphere_points(1000, 0.0, 0);
/// assert_eq!(points.len(), 1000);
/// ```
pub fn generate_fibonacci_sphere_points(count: usize, jitter: f64, seed: u64) -> Vec<DVec3> {
    if count == 0 {
        return Vec::new();
    }

    let lattice = (0..count).map(|i| fibonacci_point(i, count));
    if jitter <= 0.0 {
        return lattice.collect();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Average angular spacing between points (approximate)
    let avg_spacing = (4.0 * PI / count as f64).sqrt();
    let jitter_amount = avg_spacing * jitter;

    lattice
        .map(|base| {
            let jitter_theta: f64 = rng.gen_range(0.0..TAU);
            let jitter_mag: f64 = rng.gen::<f64>() * jitter_amount;

            // Orthonormal basis of the tangent plane
            let up = if base.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
            let tangent1 = base.cross(up).normalize();
            let tangent2 = base.cross(tangent1).normalize();

            (base
                + tangent1 * jitter_mag * jitter_theta.cos()
                + tangent2 * jitter_mag * jitter_theta.sin())
            .normalize()
        })
        .collect()
}
