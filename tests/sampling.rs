//! Grid and rejection sampling properties.

use bnp_support::statistics::stream_rng;
use bnp_support::{grid, rejection_sample, Bounds, RejectionSampler, SamplingError};

#[test]
fn grid_has_product_size_and_interior_points() {
    let bounds = Bounds::new(vec![(0.0, 1.0), (-3.0, 5.0), (10.0, 10.5)]).unwrap();
    let counts = [3, 7, 2];
    let g = grid(&bounds, &counts).unwrap();

    assert_eq!(g.len(), 3 * 7 * 2);
    assert_eq!(g.points.dim(), 3);
    for row in g.points.rows() {
        assert!(bounds.contains(row), "{row:?} is not interior");
    }
    for (d, (&(lo, hi), &c)) in bounds.iter().zip(&counts).enumerate() {
        let expected = (hi - lo) / (c + 1) as f64;
        assert!((g.spacings[d] - expected).abs() < 1e-12);
        assert_eq!(g.axis(d).len(), c);
    }
    let volume: f64 = g.spacings.iter().product();
    assert!((g.cell_volume() - volume).abs() < 1e-15);

    // Last axis varies fastest.
    assert_eq!(g.points.row(0)[2], g.axis(2)[0]);
    assert_eq!(g.points.row(1)[2], g.axis(2)[1]);
    assert_eq!(g.points.row(1)[1], g.axis(1)[0]);
}

#[test]
fn grid_rejects_bad_counts() {
    let bounds = Bounds::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap();
    assert_eq!(grid(&bounds, &[4, 0]).unwrap_err(), SamplingError::EmptyAxis { dim: 1 });
    assert!(matches!(grid(&bounds, &[4]), Err(SamplingError::Input(_))));
}

#[test]
fn uniform_rejection_mean_approaches_half() {
    let bounds = Bounds::interval(0.0, 1.0).unwrap();
    let mut rng = stream_rng(2024, 0);
    let mut errors = Vec::new();
    for n in [100, 10_000, 200_000] {
        let xs = rejection_sample(n, |_| 1.0, &bounds, &mut rng).unwrap();
        assert_eq!(xs.len(), n);
        assert!(xs.iter().all(|&x| x > 0.0 && x < 1.0));
        let mean = xs.iter().sum::<f64>() / n as f64;
        errors.push((mean - 0.5).abs());
    }
    // Standard error is 0.29 / sqrt(n).
    assert!(errors[1] < 0.015);
    assert!(errors[2] < 0.003);
}

#[test]
fn selection_function_shapes_the_draws() {
    let bounds = Bounds::interval(0.0, 2.0).unwrap();
    let mut rng = stream_rng(7, 1);
    let xs = RejectionSampler::new()
        .sample_selected(5_000, |_| 1.0, |x| if x < 1.0 { 1.0 } else { 0.0 }, &bounds, &mut rng)
        .unwrap();
    assert!(xs.iter().all(|&x| x < 1.0));
}

#[test]
fn rejection_sampler_is_bounded() {
    let bounds = Bounds::interval(0.0, 1.0).unwrap();
    let mut rng = stream_rng(3, 0);
    // A needle the probe grid sees but candidates almost never hit.
    let needle = |x: f64| if (x - 0.5).abs() < 1e-9 { 1.0 } else { 0.0 };
    let sampler = RejectionSampler::new().probes(3).max_rounds(5);
    let err = sampler.sample(10, needle, &bounds, &mut rng).unwrap_err();
    assert!(matches!(err, SamplingError::Exhausted { requested: 10, rounds: 5, .. }));

    let zero = RejectionSampler::new().sample(10, |_| 0.0, &bounds, &mut rng);
    assert_eq!(zero.unwrap_err(), SamplingError::InvalidEnvelope(0.0));

    let square = Bounds::new(vec![(0.0, 1.0), (0.0, 1.0)]).unwrap();
    assert_eq!(
        RejectionSampler::new().sample(1, |_| 1.0, &square, &mut rng).unwrap_err(),
        SamplingError::NotOneDimensional(2)
    );
}
