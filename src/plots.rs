use std::ops::Range;
use std::str::FromStr;

use itertools::izip;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::loss::{LossCurve, LossSurface, SampleSet};

pub const NAVY: RGBColor = RGBColor(0, 0, 128);

/// Number of colour bands in a filled contour.
pub const CONTOUR_LEVELS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    CoolWarm,
    Viridis,
    Greys,
}

impl ColorMap {
    fn anchors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorMap::CoolWarm => &[(59, 76, 192), (221, 221, 221), (180, 4, 38)],
            ColorMap::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
            ColorMap::Greys => &[(255, 255, 255), (0, 0, 0)],
        }
    }

    /// Colour at `t`, clamped into `[0, 1]`.
    pub fn color(&self, t: f64) -> RGBColor {
        let anchors = self.anchors();
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };

        let scaled = t * (anchors.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(anchors.len() - 2);
        let frac = scaled - lo as f64;

        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        let (r0, g0, b0) = anchors[lo];
        let (r1, g1, b1) = anchors[lo + 1];

        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

impl FromStr for ColorMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coolwarm" => Ok(ColorMap::CoolWarm),
            "viridis" => Ok(ColorMap::Viridis),
            "greys" | "grays" => Ok(ColorMap::Greys),
            other => Err(format!("unknown colour map: {other}")),
        }
    }
}

/// 3D camera angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngle {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for ViewAngle {
    fn default() -> Self {
        Self {
            elevation: 30.,
            azimuth: 45.,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self {
            x_min: -1.,
            x_max: 8.,
            y_min: -1.,
            y_max: 8.,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleFit {
    pub a: f64,
    pub b: f64,
    pub r: f64,
}

pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

pub fn find_max_min<T: std::cmp::PartialOrd + Copy>(
    mut data: impl Iterator<Item = T>,
) -> Option<MinMax<T>> {
    let init = data.next()?;
    let mut min_max = MinMax {
        min: init,
        max: init,
    };

    for x in data {
        min_max = MinMax {
            min: if x < min_max.min { x } else { min_max.min },
            max: if x > min_max.max { x } else { min_max.max },
        };
    }

    Some(min_max)
}

// plotters cannot map a zero-width range
fn widened(min: f64, max: f64, pad: f64) -> Range<f64> {
    if max - min > f64::EPSILON {
        (min - pad)..(max + pad)
    } else {
        (min - pad.max(0.5))..(max + pad.max(0.5))
    }
}

fn grid_step(values: &ndarray::Array1<f64>) -> f64 {
    if values.len() > 1 {
        (values[1] - values[0]).abs()
    } else {
        1.
    }
}

pub fn plot_loss_curve<DB>(
    curve: &LossCurve,
    current_weight: f64,
    current_loss: f64,
    epoch: usize,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let w_range = find_max_min(
        curve
            .w_values
            .iter()
            .cloned()
            .chain(std::iter::once(current_weight)),
    )
    .ok_or("empty loss curve")?;

    let loss_max = curve
        .errors
        .iter()
        .cloned()
        .fold(current_loss, f64::max);

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("W-Loss Plot", ("Arial", 20))
        .set_all_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(
            widened(w_range.min, w_range.max, 0.),
            widened(0., loss_max * 1.05, 0.),
        )?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("W")
        .y_labels(10)
        .y_desc("Loss")
        .draw()?;

    chart_context
        .draw_series(LineSeries::new(
            curve.w_values.iter().cloned().zip(curve.errors.iter().cloned()),
            &NAVY,
        ))?
        .label(format!("epoch : {epoch}"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], NAVY));

    chart_context.draw_series(std::iter::once(Circle::new(
        (current_weight, current_loss),
        4f32,
        RED.filled(),
    )))?;

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

pub fn plot_data_fit<DB>(
    samples: &SampleSet,
    predictions: &[f64],
    epoch: usize,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    if predictions.len() != samples.len() {
        return Err(format!(
            "{} predictions for {} samples",
            predictions.len(),
            samples.len()
        )
        .into());
    }

    drawing_area.fill(&WHITE)?;

    let x_range = find_max_min(samples.x().iter().cloned()).ok_or("empty sample set")?;
    let y_range = find_max_min(samples.y().iter().cloned()).ok_or("empty sample set")?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("Data fit", ("Arial", 20))
        .set_all_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(
            widened(x_range.min, x_range.max, 0.5),
            widened(y_range.min, y_range.max, 0.5),
        )?;

    chart_context
        .configure_mesh()
        .x_labels(10)
        .x_desc("x")
        .y_labels(10)
        .y_desc("y")
        .draw()?;

    chart_context
        .draw_series(
            samples
                .x()
                .iter()
                .zip(samples.y().iter())
                .map(|(&x, &y)| Circle::new((x, y), 3f32, NAVY.filled())),
        )?
        .label(format!("epoch : {epoch}"))
        .legend(|(x, y)| Circle::new((x, y), 3f32, NAVY.filled()));

    chart_context.draw_series(LineSeries::new(
        izip!(samples.x().iter(), predictions.iter()).map(|(&x, &y)| (x, y)),
        &RED,
    ))?;

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE)
        .draw()?;

    Ok(())
}

pub fn plot_loss_surface_3d<DB>(
    surface: &LossSurface,
    (current_weight, current_b): (f64, f64),
    current_loss: f64,
    view: ViewAngle,
    color_map: ColorMap,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let w_range = find_max_min(surface.w_values.iter().cloned()).ok_or("empty loss surface")?;
    let b_range = find_max_min(surface.b_values.iter().cloned()).ok_or("empty loss surface")?;
    let loss_max = surface.max_loss().max(current_loss);

    let mut chart_context = ChartBuilder::on(drawing_area)
        .caption("W-Loss Plot", ("Arial", 20))
        .margin(20)
        .build_cartesian_3d(
            widened(w_range.min, w_range.max, 0.),
            widened(0., loss_max, 0.),
            widened(b_range.min, b_range.max, 0.),
        )?;

    chart_context.with_projection(|mut pb| {
        pb.pitch = view.elevation.to_radians();
        pb.yaw = view.azimuth.to_radians();
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart_context
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()?;

    let size = surface.size();
    let scale = |loss: f64| if loss_max > 0. { loss / loss_max } else { 0. };

    let cells = (0..size.saturating_sub(1))
        .flat_map(move |j| (0..size - 1).map(move |i| (j, i)))
        .map(|(j, i)| {
            let corners = [(j, i), (j, i + 1), (j + 1, i + 1), (j + 1, i)];

            let points: Vec<_> = corners
                .iter()
                .map(|&(r, c)| (surface.w_values[c], surface.loss[[r, c]], surface.b_values[r]))
                .collect();

            let mean = corners
                .iter()
                .map(|&(r, c)| surface.loss[[r, c]])
                .sum::<f64>()
                / 4.;

            Polygon::new(points, color_map.color(scale(mean)).mix(0.85).filled())
        });

    chart_context.draw_series(cells)?;

    chart_context.draw_series(LineSeries::new(
        vec![
            (current_weight, 0., current_b),
            (current_weight, loss_max, current_b),
        ],
        RED.stroke_width(2),
    ))?;

    chart_context.draw_series(std::iter::once(Text::new(
        format!("W: {current_weight:.1}, b: {current_b:.1}, Loss: {current_loss:.2}"),
        (current_weight, current_loss, current_b),
        ("Arial", 14).into_font().color(&RED),
    )))?;

    Ok(())
}

/// Filled contour: each grid cell is painted with its loss quantized into
/// [`CONTOUR_LEVELS`] bands.
pub fn plot_contour<DB>(
    surface: &LossSurface,
    (current_weight, current_b): (f64, f64),
    color_map: ColorMap,
    x_label: &str,
    y_label: &str,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let w_range = find_max_min(surface.w_values.iter().cloned()).ok_or("empty loss surface")?;
    let b_range = find_max_min(surface.b_values.iter().cloned()).ok_or("empty loss surface")?;
    let loss_range = find_max_min(surface.loss.iter().cloned()).ok_or("empty loss surface")?;

    let (half_w, half_b) = (
        grid_step(&surface.w_values) / 2.,
        grid_step(&surface.b_values) / 2.,
    );

    let mut chart_context = ChartBuilder::on(drawing_area)
        .set_all_label_area_size(50)
        .margin(20)
        .build_cartesian_2d(
            (w_range.min - half_w)..(w_range.max + half_w),
            (b_range.min - half_b)..(b_range.max + half_b),
        )?;

    chart_context
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    let span = loss_range.max - loss_range.min;
    let band = |loss: f64| {
        let t = if span > 0. {
            (loss - loss_range.min) / span
        } else {
            0.
        };
        let level = ((t * CONTOUR_LEVELS as f64).floor() as usize).min(CONTOUR_LEVELS - 1);

        level as f64 / (CONTOUR_LEVELS - 1) as f64
    };

    chart_context.draw_series(surface.loss.indexed_iter().map(|((j, i), &loss)| {
        let (w, b) = (surface.w_values[i], surface.b_values[j]);

        Rectangle::new(
            [(w - half_w, b - half_b), (w + half_w, b + half_b)],
            color_map.color(band(loss)).filled(),
        )
    }))?;

    let position = format!("{current_weight:.2}, {current_b:.2}");

    chart_context
        .draw_series(std::iter::once(Circle::new(
            (current_weight, current_b),
            5f32,
            WHITE.filled(),
        )))?
        .label(position.clone())
        .legend(|(x, y)| Circle::new((x, y), 5f32, WHITE.filled()));

    chart_context.draw_series(std::iter::once(Text::new(
        position,
        (current_weight, current_b),
        ("Arial", 14).into_font().color(&WHITE),
    )))?;

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(BLACK.mix(0.3))
        .label_font(("Arial", 14).into_font().color(&WHITE))
        .draw()?;

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn plot_circle_fit<DB>(
    x: &[f64],
    y: &[f64],
    fit: CircleFit,
    loss: f64,
    epoch: usize,
    batch: Option<(&[f64], &[f64])>,
    limits: AxisLimits,
    drawing_area: &DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    drawing_area.fill(&WHITE)?;

    let mut chart_context = ChartBuilder::on(drawing_area)
        .set_all_label_area_size(40)
        .margin(20)
        .build_cartesian_2d(limits.x_min..limits.x_max, limits.y_min..limits.y_max)?;

    chart_context.configure_mesh().draw()?;

    const OUTLINE_POINTS: usize = 200;

    let outline = (0..=OUTLINE_POINTS).map(|k| {
        let t = 2. * std::f64::consts::PI * k as f64 / OUTLINE_POINTS as f64;
        (fit.a + fit.r * t.cos(), fit.b + fit.r * t.sin())
    });

    chart_context
        .draw_series(LineSeries::new(outline, &GREEN))?
        .label(format!(
            "epoch : {epoch}, a: {:.2}, b: {:.2}, r: {:.2}, loss: {loss:.2}",
            fit.a, fit.b, fit.r
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart_context.draw_series(
        x.iter()
            .zip(y)
            .map(|(&x, &y)| Circle::new((x, y), 3f32, NAVY.filled())),
    )?;

    if let Some((batch_x, batch_y)) = batch {
        chart_context.draw_series(
            batch_x
                .iter()
                .zip(batch_y)
                .map(|(&x, &y)| Circle::new((x, y), 3f32, RED.filled())),
        )?;
    }

    chart_context
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    Ok(())
}
