use crate::expression::{Expression, ExpressionError};
use crate::settings::PlotParams;
use ndarray::Array2;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error("color map index {0} is out of range")]
    UnknownColorMap(i64),
}

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
///
/// The last sample is exactly `stop`. One sample yields `[start]` and zero
/// samples an empty vector. Reversed bounds sample in descending order.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut samples: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            samples[n - 1] = stop;
            samples
        }
    }
}

/// The two sample axes of a surface. The meshgrid is implicit: point
/// `(j, i)` is `(xs[i], ys[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }

    pub fn from_params(params: &PlotParams) -> Self {
        let n = params.samples();
        Self::new(
            linspace(params.xmin, params.xmax, n),
            linspace(params.ymin, params.ymax, n),
        )
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Materializes the `(x, y)` coordinate matrices, each shaped
    /// `(ys.len(), xs.len())`.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.ys.len(), self.xs.len());
        (
            Array2::from_shape_fn(shape, |(_, i)| self.xs[i]),
            Array2::from_shape_fn(shape, |(j, _)| self.ys[j]),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }
}

/// A function sampled over a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    grid: Grid,
    z: Array2<f64>,
}

impl Surface {
    pub fn new(grid: Grid, z: Array2<f64>) -> Self {
        Self { grid, z }
    }

    /// Parses the function text and evaluates it over the grid described by
    /// `params`.
    pub fn sample(params: &PlotParams) -> Result<Self, PlotError> {
        let expression = Expression::parse(&params.function)?;
        let grid = Grid::from_params(params);
        let z = expression.eval_grid(&grid);
        log::debug!(
            "sampled '{}' on a {}x{} grid",
            expression,
            grid.xs.len(),
            grid.ys.len()
        );
        Ok(Self { grid, z })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn z(&self) -> &Array2<f64> {
        &self.z
    }

    /// Bounds of the finite z values, `None` if there are none.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
