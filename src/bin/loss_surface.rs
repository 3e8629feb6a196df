use clap::Parser;
use log::info;

use loss_landscape::loss::{mesh_loss_out_generator, SampleSet};
use loss_landscape::plots::{ColorMap, ViewAngle};
use loss_landscape::render::{Frame, Renderer, SvgRenderer};

#[derive(Debug, serde::Deserialize)]
struct Record {
    x: f64,
    y: f64,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value = "data/linear_samples.csv")]
    data_path: String,

    #[clap(short, long, default_value = "plots/loss_surface")]
    out_dir: String,

    #[clap(short, long, default_value_t = 100)]
    size: usize,

    #[clap(long, default_value_t = -1., allow_hyphen_values = true)]
    w_min: f64,

    #[clap(long, default_value_t = 4.)]
    w_max: f64,

    #[clap(long, default_value_t = -3., allow_hyphen_values = true)]
    b_min: f64,

    #[clap(long, default_value_t = 4.)]
    b_max: f64,

    #[clap(long, default_value_t = 30., allow_hyphen_values = true)]
    elevation: f64,

    #[clap(long, default_value_t = 45., allow_hyphen_values = true)]
    azimuth: f64,

    #[clap(short, long, default_value = "coolwarm")]
    color_map: ColorMap,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let records = csv::Reader::from_path(&args.data_path)?
        .deserialize()
        .collect::<Result<Vec<Record>, _>>()?;

    info!("loaded {} samples from {}", records.len(), args.data_path);

    let samples = SampleSet::from_pairs(records.iter().map(|r| (r.x, r.y)));

    let surface = mesh_loss_out_generator(
        &samples,
        (args.w_min, args.w_max),
        (args.b_min, args.b_max),
        args.size,
    )?;

    let best = surface.min_loss().ok_or("empty loss surface")?;

    println!(
        "minimum on grid: w = {:.3}, b = {:.3}, loss = {:.4}",
        best.w, best.b, best.loss
    );

    let mut renderer = SvgRenderer::new(&args.out_dir, "loss_surface")?.with_size((1024, 768));

    renderer.render(&Frame::Contour {
        surface: &surface,
        current: (best.w, best.b),
        color_map: args.color_map,
        x_label: "W",
        y_label: "b",
    })?;

    renderer.render(&Frame::Surface3d {
        surface: &surface,
        current: (best.w, best.b),
        current_loss: best.loss,
        view: ViewAngle {
            elevation: args.elevation,
            azimuth: args.azimuth,
        },
        color_map: args.color_map,
    })?;

    Ok(())
}
