//! Benchmarks for the intersection marker.
//!
//! Run with: cargo bench -p marker-kernel
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p marker-kernel -- --save-baseline main
//! 2. After changes: cargo bench -p marker-kernel -- --baseline main

#![allow(missing_docs, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use marker_kernel::intersect::triangles_overlap;
use marker_kernel::{mark_intersections, KernelKind, MarkerConfig, MeshInstance};
use marker_types::{Matrix4, Point3, Polygon, PolygonMesh, Vector3};
use nalgebra::Translation3;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a UV sphere: one quad polygon per patch, fan-split into two
/// triangles (triangles at the poles).
fn uv_sphere(rings: u32, segments: u32, radius: f64) -> PolygonMesh {
    let mut mesh = PolygonMesh::new();

    for r in 0..=rings {
        let phi = std::f64::consts::PI * f64::from(r) / f64::from(rings);
        for s in 0..segments {
            let theta = std::f64::consts::TAU * f64::from(s) / f64::from(segments);
            mesh.vertices.push(Point3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ));
        }
    }

    let index = |r: u32, s: u32| r * segments + (s % segments);
    for r in 0..rings {
        for s in 0..segments {
            let (i0, i1) = (index(r, s), index(r, s + 1));
            let (i2, i3) = (index(r + 1, s + 1), index(r + 1, s));
            let center = Point3::from(
                (mesh.vertices[i0 as usize].coords + mesh.vertices[i2 as usize].coords) * 0.5,
            );
            let normal = center.coords / radius;
            let triangles = if r == 0 {
                vec![[i0, i3, i2]]
            } else if r == rings - 1 {
                vec![[i0, i1, i2]]
            } else {
                vec![[i0, i1, i2], [i0, i2, i3]]
            };
            mesh.polygons
                .push(Polygon::new(Vector3::new(normal.x, normal.y, normal.z), triangles));
        }
    }

    mesh
}

fn overlapping_spheres() -> (PolygonMesh, PolygonMesh) {
    (uv_sphere(24, 32, 1.0), uv_sphere(24, 32, 1.0))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_marking(c: &mut Criterion) {
    let (mesh_a, mesh_b) = overlapping_spheres();
    let shift: Matrix4<f64> = Translation3::new(0.8, 0.0, 0.0).to_homogeneous();

    let mut group = c.benchmark_group("mark_intersections");

    for (name, kind) in [("octree", KernelKind::Octree), ("kdtree", KernelKind::KdTree)] {
        for (mode, parallel) in [("serial", false), ("parallel", true)] {
            let config = MarkerConfig::default().with_kernel(kind).with_parallel(parallel);
            group.bench_function(format!("{name}/{mode}"), |bencher| {
                bencher.iter(|| {
                    let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
                    let b = MeshInstance::with_computed_bounds(&mesh_b, shift);
                    mark_intersections(black_box(&a), black_box(&b), &config)
                });
            });
        }
    }

    group.bench_function("brute_force", |bencher| {
        let a = MeshInstance::with_computed_bounds(&mesh_a, Matrix4::identity());
        let b = MeshInstance::with_computed_bounds(&mesh_b, shift);
        let epsilon = 1e-9 * a.bounds.union(&b.bounds).diagonal();
        let soup_a = mesh_a.world_triangles(&a.transform);
        let soup_b = mesh_b.world_triangles(&b.transform);
        bencher.iter(|| {
            let mut hits = 0_usize;
            for ta in &soup_a {
                for tb in &soup_b {
                    if triangles_overlap(black_box(ta), black_box(tb), epsilon) {
                        hits += 1;
                    }
                }
            }
            hits
        });
    });

    group.finish();
}

criterion_group!(benches, bench_marking);
criterion_main!(benches);
