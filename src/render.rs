//! Rendering seam between the numeric routines and the charts.
//!
//! Training loops describe what they want drawn as a [`Frame`] and hand it
//! to a [`Renderer`]. [`Animator`] adds the epoch cadence and the pause
//! between frames, so the numeric code never touches display timing and can
//! be exercised headlessly.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::loss::{LossCurve, LossSurface, SampleSet};
use crate::plots::{self, AxisLimits, CircleFit, ColorMap, ViewAngle};

#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    LossCurve {
        curve: &'a LossCurve,
        current_weight: f64,
        current_loss: f64,
        epoch: usize,
    },
    DataFit {
        samples: &'a SampleSet,
        predictions: &'a [f64],
        epoch: usize,
    },
    Surface3d {
        surface: &'a LossSurface,
        current: (f64, f64),
        current_loss: f64,
        view: ViewAngle,
        color_map: ColorMap,
    },
    Contour {
        surface: &'a LossSurface,
        current: (f64, f64),
        color_map: ColorMap,
        x_label: &'a str,
        y_label: &'a str,
    },
    CircleFit {
        x: &'a [f64],
        y: &'a [f64],
        fit: CircleFit,
        loss: f64,
        epoch: usize,
        batch: Option<(&'a [f64], &'a [f64])>,
        axis_limits: AxisLimits,
    },
}

impl Frame<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::LossCurve { .. } => "loss_curve",
            Frame::DataFit { .. } => "data_fit",
            Frame::Surface3d { .. } => "surface_3d",
            Frame::Contour { .. } => "contour",
            Frame::CircleFit { .. } => "circle_fit",
        }
    }
}

/// Draws a frame onto any plotters drawing area.
pub fn draw_frame<DB>(
    frame: &Frame,
    drawing_area: &DrawingArea<DB, Shift>,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    <DB as DrawingBackend>::ErrorType: 'static,
{
    match *frame {
        Frame::LossCurve {
            curve,
            current_weight,
            current_loss,
            epoch,
        } => plots::plot_loss_curve(curve, current_weight, current_loss, epoch, drawing_area),
        Frame::DataFit {
            samples,
            predictions,
            epoch,
        } => plots::plot_data_fit(samples, predictions, epoch, drawing_area),
        Frame::Surface3d {
            surface,
            current,
            current_loss,
            view,
            color_map,
        } => plots::plot_loss_surface_3d(
            surface,
            current,
            current_loss,
            view,
            color_map,
            drawing_area,
        ),
        Frame::Contour {
            surface,
            current,
            color_map,
            x_label,
            y_label,
        } => plots::plot_contour(surface, current, color_map, x_label, y_label, drawing_area),
        Frame::CircleFit {
            x,
            y,
            fit,
            loss,
            epoch,
            batch,
            axis_limits,
        } => plots::plot_circle_fit(x, y, fit, loss, epoch, batch, axis_limits, drawing_area),
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        (**self).render(frame)
    }
}

/// Writes each frame to its own numbered SVG file.
pub struct SvgRenderer {
    dir: PathBuf,
    prefix: String,
    size: (u32, u32),
    frames: usize,
}

impl SvgRenderer {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            prefix: prefix.into(),
            size: (800, 600),
            frames: 0,
        })
    }

    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    fn frame_path(&self, frame: &Frame) -> PathBuf {
        self.dir.join(format!(
            "{}_{:04}_{}.svg",
            self.prefix,
            self.frames,
            frame.kind()
        ))
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let path = self.frame_path(frame);

        {
            let drawing_area = SVGBackend::new(&path, self.size).into_drawing_area();

            draw_frame(frame, &drawing_area)?;

            drawing_area
                .present()
                .map_err(|e| Error::Plot(e.to_string()))?;
        }

        self.frames += 1;
        info!("wrote {} frame to {}", frame.kind(), path.display());

        Ok(())
    }
}

/// Renders every `interval`-th epoch and pauses once after each rendered epoch.
pub struct Animator<R> {
    renderer: R,
    interval: usize,
    pause: Duration,
}

impl<R: Renderer> Animator<R> {
    pub fn new(renderer: R, interval: usize, pause: Duration) -> Result<Self> {
        if interval == 0 {
            return Err(Error::invalid("render interval must be positive"));
        }

        Ok(Self {
            renderer,
            interval,
            pause,
        })
    }

    pub fn is_due(&self, epoch: usize) -> bool {
        epoch % self.interval == 0
    }

    /// Returns whether the frame was rendered.
    pub fn step(&mut self, epoch: usize, frame: &Frame) -> Result<bool> {
        self.step_frames(epoch, std::slice::from_ref(frame))
    }

    /// Renders all `frames` for a due epoch, then pauses once.
    pub fn step_frames(&mut self, epoch: usize, frames: &[Frame]) -> Result<bool> {
        if !self.is_due(epoch) {
            return Ok(false);
        }

        for frame in frames {
            self.renderer.render(frame)?;
        }

        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }

        Ok(true)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_inner(self) -> R {
        self.renderer
    }
}
