use std::time::Duration;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

use loss_landscape::loss::{
    loss_curve, mesh_loss_out_generator, mse, SampleSet, DEFAULT_CURVE_SCOPE, DEFAULT_CURVE_SIZE,
};
use loss_landscape::plots::{ColorMap, ViewAngle};
use loss_landscape::render::{Animator, Frame, SvgRenderer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = "plots/linear_fit")]
    out_dir: String,

    #[clap(long, default_value_t = 50)]
    samples: usize,

    #[clap(long, default_value_t = 1.5)]
    true_w: f64,

    #[clap(long, default_value_t = 0.5)]
    true_b: f64,

    #[clap(short, long, default_value_t = 200)]
    epochs: usize,

    #[clap(short, long, default_value_t = 0.02)]
    learning_rate: f64,

    #[clap(short, long, default_value_t = 20)]
    interval: usize,

    #[clap(long, default_value_t = 0)]
    pause_ms: u64,

    #[clap(long, default_value_t = 42)]
    seed: u64,

    /// fit `w * x` only and draw the W-Loss curve instead of the surface
    #[clap(long)]
    no_bias: bool,

    #[clap(long, default_value_t = 60)]
    grid_size: usize,

    #[clap(long, default_value_t = -1., allow_hyphen_values = true)]
    w_min: f64,

    #[clap(long, default_value_t = 4.)]
    w_max: f64,

    #[clap(long, default_value_t = -3., allow_hyphen_values = true)]
    b_min: f64,

    #[clap(long, default_value_t = 4.)]
    b_max: f64,

    #[clap(long, default_value = "coolwarm")]
    color_map: ColorMap,
}

fn generate_dataset(args: &Args, rng: &mut StdRng) -> Result<SampleSet, Box<dyn std::error::Error>> {
    let uniform = Uniform::new(0., 5.);
    let normal = Normal::new(0., 0.5)?;

    let b = if args.no_bias { 0. } else { args.true_b };

    let pairs: Vec<(f64, f64)> = (0..args.samples)
        .map(|_| {
            let x: f64 = uniform.sample(rng);
            (x, args.true_w * x + b + normal.sample(rng))
        })
        .collect();

    Ok(SampleSet::from_pairs(pairs))
}

fn gradient(samples: &SampleSet, w: f64, b: f64) -> (f64, f64) {
    let n = samples.len() as f64;

    samples
        .x()
        .iter()
        .zip(samples.y().iter())
        .fold((0., 0.), |(dw, db), (&x, &y)| {
            let residual = w * x + b - y;
            (dw + 2. * residual * x / n, db + 2. * residual / n)
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let samples = generate_dataset(&args, &mut rng)?;

    let renderer = SvgRenderer::new(&args.out_dir, "linear_fit")?;
    let mut animator = Animator::new(
        renderer,
        args.interval,
        Duration::from_millis(args.pause_ms),
    )?;

    let curve = loss_curve(&samples, DEFAULT_CURVE_SCOPE, DEFAULT_CURVE_SIZE)?;
    let surface = mesh_loss_out_generator(
        &samples,
        (args.w_min, args.w_max),
        (args.b_min, args.b_max),
        args.grid_size,
    )?;

    if let Some(best) = surface.min_loss() {
        info!(
            "grid minimum at w = {:.3}, b = {:.3}, loss = {:.4}",
            best.w, best.b, best.loss
        );
    }

    let (mut w, mut b) = (0., 0.);

    for epoch in 0..=args.epochs {
        let loss = mse(&samples, w, b)?;

        let predictions = samples.predict(w, b).to_vec();

        let mut frames = vec![Frame::DataFit {
            samples: &samples,
            predictions: &predictions,
            epoch,
        }];

        if args.no_bias {
            frames.push(Frame::LossCurve {
                curve: &curve,
                current_weight: w,
                current_loss: loss,
                epoch,
            });
        } else {
            frames.push(Frame::Contour {
                surface: &surface,
                current: (w, b),
                color_map: args.color_map,
                x_label: "W",
                y_label: "b",
            });
            frames.push(Frame::Surface3d {
                surface: &surface,
                current: (w, b),
                current_loss: loss,
                view: ViewAngle::default(),
                color_map: args.color_map,
            });
        }

        if animator.step_frames(epoch, &frames)? {
            info!("epoch {epoch}: w = {w:.3}, b = {b:.3}, loss = {loss:.4}");
        }

        let (dw, db) = gradient(&samples, w, b);
        w -= args.learning_rate * dw;
        if !args.no_bias {
            b -= args.learning_rate * db;
        }
    }

    println!(
        "fitted w: {w:.3}, b: {b:.3} ({} frames in {})",
        animator.renderer().frames_written(),
        args.out_dir
    );

    Ok(())
}
