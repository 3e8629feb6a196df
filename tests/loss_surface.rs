use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use loss_landscape::circle::make_circle;
use loss_landscape::loss::{mesh_loss_out_generator, mse, SampleSet};

fn random_samples(rng: &mut StdRng, n: usize) -> SampleSet {
    SampleSet::from_pairs((0..n).map(|_| (rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0))))
}

#[test]
fn surface_entries_are_non_negative() {
    let mut rng = StdRng::seed_from_u64(11);

    for n in [1, 2, 17] {
        let samples = random_samples(&mut rng, n);
        let surface = mesh_loss_out_generator(&samples, (-5., 5.), (-20., 20.), 25).unwrap();

        assert_eq!(surface.loss.dim(), (25, 25));
        assert!(surface.loss.iter().all(|&l| l >= 0.));
    }
}

#[test]
fn surface_is_bit_for_bit_deterministic() {
    let mut rng = StdRng::seed_from_u64(5);
    let samples = random_samples(&mut rng, 40);

    let a = mesh_loss_out_generator(&samples, (-2., 3.), (0.5, 1.5), 33).unwrap();
    let b = mesh_loss_out_generator(&samples, (-2., 3.), (0.5, 1.5), 33).unwrap();

    assert!(a
        .loss
        .iter()
        .zip(b.loss.iter())
        .all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn single_point_surface_matches_mse_at_range_start() {
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..5 {
        let samples = random_samples(&mut rng, 8);
        let (w_min, b_min) = (rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));

        let surface = mesh_loss_out_generator(&samples, (w_min, w_min + 1.), (b_min, b_min + 2.), 1)
            .unwrap();

        assert_eq!(surface.loss.dim(), (1, 1));
        assert_eq!(surface.loss[[0, 0]], mse(&samples, w_min, b_min).unwrap());
    }
}

#[test]
fn minimum_sits_near_least_squares_fit() {
    let samples = SampleSet::from_pairs((0..20).map(|i| {
        let x = i as f64 / 4.;
        (x, 1.5 * x + 0.5)
    }));

    let surface = mesh_loss_out_generator(&samples, (0., 3.), (-1., 2.), 31).unwrap();
    let best = surface.min_loss().unwrap();

    assert_abs_diff_eq!(best.w, 1.5, epsilon = 1e-9);
    assert_abs_diff_eq!(best.b, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(best.loss, 0., epsilon = 1e-12);
}

#[test]
fn circle_output_length_matches_request() {
    let mut rng = StdRng::seed_from_u64(21);

    for n in [1, 2, 4, 99] {
        let samples = make_circle(n, 0.2, 1., (0., 0.), &mut rng).unwrap();

        assert_eq!(samples.x.len(), n);
        assert_eq!(samples.y.len(), n);
    }
}
