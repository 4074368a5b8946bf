//! Placement throughput: a full round's population in arenas of rising size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use impostor_logic::config::SpawnConfig;
use impostor_logic::geometry::{Bounds, Vec3};
use impostor_logic::placement::{FlatGround, SpatialPlacement};
use impostor_logic::population::{resolve_civilian_count, resolve_impostor_count};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn place_population(c: &mut Criterion) {
    let config = SpawnConfig::default();
    let placement = SpatialPlacement::new(config.placement);
    let mut group = c.benchmark_group("place_population");

    for side in [30.0f32, 60.0, 120.0] {
        let bounds = Bounds::new(Vec3::ZERO, Vec3::new(side, 4.0, side));
        let area = bounds.planar_area();
        let count = resolve_civilian_count(config.civilian_count, area, &config.density)
            + resolve_impostor_count(config.impostor_count, area, false, &config.density);

        group.bench_with_input(BenchmarkId::from_parameter(side as u32), &count, |b, &count| {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            b.iter(|| {
                let mut occupied = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    placement.place(&bounds, &mut occupied, &FlatGround::default(), &mut rng);
                }
                black_box(occupied)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, place_population);
criterion_main!(benches);
