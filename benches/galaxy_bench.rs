use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nebula::galaxy::{generate, GalaxyParameters};
use nebula::scene::{ParticleField, ParticleFieldParameters};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("galaxy_generate");

    for count in [1_000_u32, 100_000, 1_000_000] {
        let params = GalaxyParameters {
            count,
            ..Default::default()
        };
        group.bench_function(format!("{count}_particles"), |b| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generate(black_box(&params), &mut rng)))
        });
    }
    group.finish();
}

fn wobble_benchmark(c: &mut Criterion) {
    let mut field = ParticleField::generate(
        ParticleFieldParameters::default(),
        &mut StdRng::seed_from_u64(1),
    );
    let mut t = 0.0_f32;
    c.bench_function("particle_wobble_20k", |b| {
        b.iter(|| {
            t += 0.016;
            field.wobble(black_box(t));
        })
    });
}

criterion_group!(benches, generate_benchmark, wobble_benchmark);
criterion_main!(benches);
