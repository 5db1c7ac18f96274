use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ecfft_algebra::Curve;
use ecfft_params::{build_coset, compute_chain, find_generator, GroupOrder, Preset};
use num_bigint::BigUint;
use rand::{rngs::StdRng, SeedableRng};

fn setup(curve: &Curve, order: &GroupOrder, seed: u64) -> ecfft_params::CosetDomain {
    let mut rng = StdRng::seed_from_u64(seed);
    let g = find_generator(curve, order, &mut rng).unwrap();
    build_coset(curve, &g, &mut rng).unwrap()
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("isogeny_chain");
    group.sample_size(10);

    let toy = Curve::from_coefficients(
        BigUint::from(401u32),
        BigUint::from(1u32),
        BigUint::from(5u32),
    )
    .unwrap();
    let toy_order = GroupOrder::resolve(&toy, None).unwrap();

    let bn = Preset::Bn254.curve().unwrap();
    let bn_order = Preset::Bn254.order().unwrap();

    for (name, curve, order) in [("toy401", &toy, &toy_order), ("bn254", &bn, &bn_order)] {
        let coset = setup(curve, order, 7);
        let levels = order.log_n() as usize - 1;

        group.bench_function(BenchmarkId::new("compute_chain", name), |b| {
            b.iter_batched(
                || coset.halves(),
                |halves| black_box(compute_chain(levels, halves, curve).unwrap()),
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("coset_bn254", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        let g = find_generator(&bn, &bn_order, &mut rng).unwrap();
        b.iter(|| black_box(build_coset(&bn, &g, &mut rng).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_chain);
criterion_main!(benches);
