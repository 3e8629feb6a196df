//! Mean-squared-error evaluation of the linear model `w * x + b` over
//! single points, 1-D weight sweeps and full `(w, b)` grids.

use log::debug;
use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

/// Weight range swept by the one-weight loss curve.
pub const DEFAULT_CURVE_SCOPE: (f64, f64) = (-1., 2.);
pub const DEFAULT_CURVE_SIZE: usize = 100;

/// Paired inputs and targets, fixed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl SampleSet {
    pub fn new(x: impl Into<Array1<f64>>, y: impl Into<Array1<f64>>) -> Result<Self> {
        let (x, y) = (x.into(), y.into());

        if x.len() != y.len() {
            return Err(Error::invalid(format!(
                "sample length mismatch: {} inputs, {} targets",
                x.len(),
                y.len()
            )));
        }

        Ok(Self { x, y })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

        Self {
            x: Array1::from(x),
            y: Array1::from(y),
        }
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Model output `w * x + b` for every input.
    pub fn predict(&self, w: f64, b: f64) -> Array1<f64> {
        self.x.mapv(|x| w * x + b)
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::invalid("empty sample set"))
        } else {
            Ok(())
        }
    }
}

/// `size` evenly spaced values from `start` to `end`, both ends included.
/// A single point collapses to `start`.
pub fn linspace(start: f64, end: f64, size: usize) -> Array1<f64> {
    Array1::linspace(start, end, size)
}

pub fn mse(samples: &SampleSet, w: f64, b: f64) -> Result<f64> {
    samples.ensure_not_empty()?;

    Ok(mean_squared_error(samples, w, b))
}

fn mean_squared_error(samples: &SampleSet, w: f64, b: f64) -> f64 {
    let sum: f64 = samples
        .x
        .iter()
        .zip(samples.y.iter())
        .map(|(&x, &y)| (w * x + b - y).powi(2))
        .sum();

    sum / samples.len() as f64
}

/// Loss of the bias-free model over a sweep of weights.
#[derive(Debug, Clone, PartialEq)]
pub struct LossCurve {
    pub w_values: Array1<f64>,
    pub errors: Array1<f64>,
}

pub fn loss_curve(samples: &SampleSet, w_scope: (f64, f64), size: usize) -> Result<LossCurve> {
    samples.ensure_not_empty()?;

    if size == 0 {
        return Err(Error::invalid("loss curve size must be positive"));
    }

    let w_values = linspace(w_scope.0, w_scope.1, size);
    let errors = w_values.mapv(|w| mean_squared_error(samples, w, 0.));

    Ok(LossCurve { w_values, errors })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub w: f64,
    pub b: f64,
    pub loss: f64,
}

/// MSE over a weight/bias mesh. `loss[[j, i]]` holds the loss at
/// `(w_values[i], b_values[j])`: rows follow `b`, columns follow `w`.
#[derive(Debug, Clone, PartialEq)]
pub struct LossSurface {
    pub w_values: Array1<f64>,
    pub b_values: Array1<f64>,
    pub loss: Array2<f64>,
}

impl LossSurface {
    pub fn size(&self) -> usize {
        self.w_values.len()
    }

    /// Coordinate matrices laid out like `loss`.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = self.loss.dim();

        let w_mesh = Array2::from_shape_fn(shape, |(_, i)| self.w_values[i]);
        let b_mesh = Array2::from_shape_fn(shape, |(j, _)| self.b_values[j]);

        (w_mesh, b_mesh)
    }

    pub fn min_loss(&self) -> Option<GridPoint> {
        self.loss
            .indexed_iter()
            .map(|((j, i), &loss)| GridPoint {
                w: self.w_values[i],
                b: self.b_values[j],
                loss,
            })
            .reduce(|best, p| if p.loss < best.loss { p } else { best })
    }

    pub fn max_loss(&self) -> f64 {
        self.loss.iter().cloned().fold(0., f64::max)
    }
}

pub fn mesh_loss_out_generator(
    samples: &SampleSet,
    w_scope: (f64, f64),
    b_scope: (f64, f64),
    size: usize,
) -> Result<LossSurface> {
    samples.ensure_not_empty()?;

    if size == 0 {
        return Err(Error::invalid("grid size must be positive"));
    }

    let w_values = linspace(w_scope.0, w_scope.1, size);
    let b_values = linspace(b_scope.0, b_scope.1, size);

    let loss = Array2::from_shape_fn((size, size), |(j, i)| {
        mean_squared_error(samples, w_values[i], b_values[j])
    });

    debug!(
        "evaluated {size}x{size} loss surface over {} samples, w in {w_scope:?}, b in {b_scope:?}",
        samples.len()
    );

    Ok(LossSurface {
        w_values,
        b_values,
        loss,
    })
}
