use std::time::Duration;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use loss_landscape::circle::{circle_loss, make_circle};
use loss_landscape::plots::{AxisLimits, CircleFit};
use loss_landscape::render::{Animator, Frame, SvgRenderer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = "plots/circle_fit")]
    out_dir: String,

    #[clap(short, long, default_value_t = 100)]
    n_samples: usize,

    /// kept for parity with the notebook, the perturbation is always [0, 1)
    #[clap(long, default_value_t = 0.1)]
    noise: f64,

    #[clap(short, long, default_value_t = 2.)]
    radius: f64,

    #[clap(long, default_value_t = 3.)]
    center_x: f64,

    #[clap(long, default_value_t = 3.)]
    center_y: f64,

    #[clap(short, long, default_value_t = 300)]
    epochs: usize,

    #[clap(short, long, default_value_t = 0.05)]
    learning_rate: f64,

    /// mini-batch size, full batch when omitted
    #[clap(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: Option<u64>,

    #[clap(short, long, default_value_t = 25)]
    interval: usize,

    #[clap(long, default_value_t = 0)]
    pause_ms: u64,

    #[clap(long, default_value_t = 7)]
    seed: u64,
}

/// Gradient of the mean squared radial residual with respect to `(a, b, r)`.
fn gradient(x: &[f64], y: &[f64], fit: CircleFit) -> (f64, f64, f64) {
    let n = x.len() as f64;

    x.iter()
        .zip(y)
        .fold((0., 0., 0.), |(da, db, dr), (&x, &y)| {
            let (dx, dy) = (x - fit.a, y - fit.b);
            let dist = dx.hypot(dy).max(f64::EPSILON);
            let residual = dist - fit.r;

            (
                da - 2. * residual * dx / dist / n,
                db - 2. * residual * dy / dist / n,
                dr - 2. * residual / n,
            )
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);

    let samples = make_circle(
        args.n_samples,
        args.noise,
        args.radius,
        (args.center_x, args.center_y),
        &mut rng,
    )?;

    let renderer = SvgRenderer::new(&args.out_dir, "circle_fit")?.with_size((600, 600));
    let mut animator = Animator::new(
        renderer,
        args.interval,
        Duration::from_millis(args.pause_ms),
    )?;

    let mut fit = CircleFit { a: 0., b: 0., r: 1. };
    let mut indices: Vec<usize> = (0..samples.len()).collect();

    for epoch in 0..=args.epochs {
        let (batch_x, batch_y): (Vec<f64>, Vec<f64>) = match args.batch_size {
            Some(size) if (size as usize) < samples.len() => {
                indices.shuffle(&mut rng);
                indices[..size as usize]
                    .iter()
                    .map(|&i| (samples.x[i], samples.y[i]))
                    .unzip()
            }
            _ => (samples.x.clone(), samples.y.clone()),
        };

        let loss = circle_loss(&samples.x, &samples.y, fit.a, fit.b, fit.r)?;

        let rendered = animator.step(
            epoch,
            &Frame::CircleFit {
                x: &samples.x,
                y: &samples.y,
                fit,
                loss,
                epoch,
                batch: args
                    .batch_size
                    .map(|_| (batch_x.as_slice(), batch_y.as_slice())),
                axis_limits: AxisLimits::default(),
            },
        )?;

        if rendered {
            info!(
                "epoch {epoch}: a = {:.3}, b = {:.3}, r = {:.3}, loss = {loss:.4}",
                fit.a, fit.b, fit.r
            );
        }

        let (da, db, dr) = gradient(&batch_x, &batch_y, fit);
        fit.a -= args.learning_rate * da;
        fit.b -= args.learning_rate * db;
        fit.r -= args.learning_rate * dr;
    }

    println!(
        "fitted circle: a = {:.3}, b = {:.3}, r = {:.3} ({} frames in {})",
        fit.a,
        fit.b,
        fit.r,
        animator.renderer().frames_written(),
        args.out_dir
    );

    Ok(())
}
