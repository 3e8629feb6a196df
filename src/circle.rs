use std::f64::consts::PI;

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{Error, Result};
use crate::loss::linspace;

/// Parallel coordinate sequences in no particular order.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CircleSamples {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Points at angles evenly spaced over `[0, 2π]`. Both ends are included,
/// so the first and last point coincide.
pub fn circle_points(n_samples: usize, radius: f64, center: (f64, f64)) -> Vec<(f64, f64)> {
    linspace(0., 2. * PI, n_samples)
        .iter()
        .map(|&t| (radius * t.cos() + center.0, radius * t.sin() + center.1))
        .collect()
}

/// Noisy circle for the fitting demos.
///
/// Every point is shifted by an independent `Uniform[0, 1)` draw on each
/// axis and the points are then shuffled. `noise` does not scale that shift:
/// it is accepted for call compatibility and otherwise ignored. A negative
/// `radius` is not rejected and mirrors the circle through its center.
pub fn make_circle<R: Rng + ?Sized>(
    n_samples: usize,
    noise: f64,
    radius: f64,
    center: (f64, f64),
    rng: &mut R,
) -> Result<CircleSamples> {
    if n_samples == 0 {
        return Err(Error::invalid("n_samples must be positive"));
    }

    warn!("make_circle: noise = {noise} ignored, perturbation drawn from [0, 1)");

    let uniform = Uniform::new(0f64, 1f64);

    let mut points: Vec<(f64, f64)> = circle_points(n_samples, radius, center)
        .into_iter()
        .map(|(x, y)| (x + uniform.sample(rng), y + uniform.sample(rng)))
        .collect();

    points.shuffle(rng);

    let (x, y) = points.into_iter().unzip();

    Ok(CircleSamples { x, y })
}

/// Mean squared radial residual of the circle `(a, b, r)`.
pub fn circle_loss(x: &[f64], y: &[f64], a: f64, b: f64, r: f64) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::invalid(format!(
            "coordinate length mismatch: {} x, {} y",
            x.len(),
            y.len()
        )));
    }

    if x.is_empty() {
        return Err(Error::invalid("empty sample set"));
    }

    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(&x, &y)| ((x - a).hypot(y - b) - r).powi(2))
        .sum();

    Ok(sum / x.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn four_points_repeat_the_start() {
        let points = circle_points(4, 1., (0., 0.));
        let expected = [
            (1., 0.),
            (-0.5, 3f64.sqrt() / 2.),
            (-0.5, -(3f64.sqrt()) / 2.),
            (1., 0.),
        ];

        assert_eq!(points.len(), 4);
        for (&(x, y), &(ex, ey)) in points.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(x, ex, epsilon = 1e-12);
            assert_abs_diff_eq!(y, ey, epsilon = 1e-12);
        }
    }

    #[test]
    fn raw_points_lie_on_circle() {
        let center = (3., -2.);

        for (x, y) in circle_points(37, 2.5, center) {
            assert_abs_diff_eq!((x - center.0).hypot(y - center.1), 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn noisy_points_stay_within_unit_shift() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = (3., 3.);
        let samples = make_circle(200, 0.5, 2., center, &mut rng).unwrap();

        assert_eq!(samples.x.len(), 200);
        assert_eq!(samples.y.len(), 200);

        // every shifted point is some raw point plus an offset in [0, 1)^2
        let raw = circle_points(200, 2., center);
        for (&x, &y) in samples.x.iter().zip(samples.y.iter()) {
            assert!(raw.iter().any(|&(rx, ry)| {
                let (dx, dy) = (x - rx, y - ry);
                (0. ..1.).contains(&dx) && (0. ..1.).contains(&dy)
            }));
        }
    }

    #[test]
    fn points_are_shuffled_as_whole_pairs() {
        let mut rng = StdRng::seed_from_u64(13);
        let (n, radius) = (40, 50.);
        let samples = make_circle(n, 0., radius, (0., 0.), &mut rng).unwrap();

        // raw points sit far more than 1 apart, so each output pair maps back
        // to exactly one angular index (the repeated start/end point aside)
        let raw = circle_points(n, radius, (0., 0.));
        let mut used = vec![false; n];

        let order: Vec<usize> = samples
            .x
            .iter()
            .zip(samples.y.iter())
            .map(|(&x, &y)| {
                let idx = (0..n)
                    .find(|&k| {
                        let (dx, dy) = (x - raw[k].0, y - raw[k].1);
                        !used[k] && (0. ..1.).contains(&dx) && (0. ..1.).contains(&dy)
                    })
                    .expect("sample does not come from any unused raw point");
                used[idx] = true;
                idx
            })
            .collect();

        assert!(used.iter().all(|&u| u));
        assert_ne!(order, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_samples() {
        let a = make_circle(50, 0., 1., (0., 0.), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = make_circle(50, 0., 1., (0., 0.), &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn noise_argument_does_not_change_output() {
        let a = make_circle(30, 0.1, 1., (0., 0.), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = make_circle(30, 10., 1., (0., 0.), &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn zero_samples_rejected() {
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            make_circle(0, 0.1, 1., (0., 0.), &mut rng),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn circle_loss_is_zero_on_exact_circle() {
        let (x, y): (Vec<f64>, Vec<f64>) = circle_points(16, 3., (1., 2.)).into_iter().unzip();

        assert_abs_diff_eq!(circle_loss(&x, &y, 1., 2., 3.).unwrap(), 0., epsilon = 1e-20);
        assert_abs_diff_eq!(circle_loss(&x, &y, 1., 2., 1.).unwrap(), 4., epsilon = 1e-9);
        assert!(circle_loss(&[], &[], 0., 0., 1.).is_err());
        assert!(circle_loss(&[1.], &[], 0., 0., 1.).is_err());
    }
}
