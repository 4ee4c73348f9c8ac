use bnp_support::convergence::{zero_crossings, AngularCoefficients, LeastSquaresSlope};
use bnp_support::cosmology::{to_source_frame, DetectorFrameSamples, FailurePolicy};
use bnp_support::{invert_redshift, Bounds, Cosmology, DistanceModel, Matrix, PriorElicitation};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_prior(c: &mut Criterion) {
    let mut group = c.benchmark_group("prior");
    group.sample_size(20);
    let bounds = Bounds::new(vec![(5.0, 80.0), (-1.0, 1.0)]).unwrap();
    group.bench_function("std_reestimate_2d", |b| {
        b.iter(|| {
            let prior = PriorElicitation::new(&bounds)
                .std(&[10.0, 0.3])
                .seed(1)
                .elicit()
                .unwrap();
            black_box(prior.lambda[(0, 0)])
        });
    });
    group.bench_function("cov_reestimate_2d", |b| {
        let cov = Matrix::from_row_slice(2, 2, &[100.0, 0.5, 0.5, 0.09]);
        b.iter(|| {
            let prior = PriorElicitation::new(&bounds)
                .cov(cov.clone())
                .seed(1)
                .elicit()
                .unwrap();
            black_box(prior.lambda[(1, 1)])
        });
    });
    group.finish();
}

fn bench_redshift(c: &mut Criterion) {
    let mut group = c.benchmark_group("redshift");
    let cosmology = Cosmology::default();
    let dl = cosmology.luminosity_distance(0.8);
    group.bench_function("invert_single", |b| {
        b.iter(|| black_box(invert_redshift(&cosmology, black_box(dl)).unwrap()));
    });

    let samples = DetectorFrameSamples {
        luminosity_distance: (1..=1000).map(|i| 10.0 * i as f64).collect(),
        m1_detector: vec![40.0; 1000],
        m2_detector: vec![30.0; 1000],
        spins: None,
        sky: None,
    };
    group.sample_size(20);
    group.bench_function("source_frame_1000", |b| {
        b.iter(|| to_source_frame(&samples, &cosmology, FailurePolicy::Skip).unwrap().len());
    });
    group.finish();
}

fn bench_slopes(c: &mut Criterion) {
    let series: Vec<f64> = (0..5000).map(|i| (i as f64 / 300.0).sin() / (1.0 + i as f64)).collect();
    c.bench_function("least_squares_slope_5000_w1000", |b| {
        b.iter(|| {
            let slopes = LeastSquaresSlope.angular_coefficients(black_box(&series), 1000);
            zero_crossings(&slopes).len()
        });
    });
}

criterion_group!(benches, bench_prior, bench_redshift, bench_slopes);
criterion_main!(benches);
