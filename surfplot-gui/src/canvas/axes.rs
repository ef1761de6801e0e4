use std::f64::consts::FRAC_PI_2;
use surfplot_core::{ColorMap, Surface};

/// How a surface is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub cmap: ColorMap,
    pub edge_color: Option<(u8, u8, u8)>,
    pub line_width: f64,
}

impl SurfaceStyle {
    pub fn new(cmap: ColorMap) -> Self {
        Self {
            cmap,
            edge_color: None,
            line_width: 0.0,
        }
    }

    pub fn edges(mut self, color: (u8, u8, u8), line_width: f64) -> Self {
        self.edge_color = Some(color);
        self.line_width = line_width;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceArtist {
    pub surface: Surface,
    pub style: SurfaceStyle,
}

/// One grid cell, corners in data coordinates `(x, y, z)`, with the color
/// map position of its mean height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cell {
    pub corners: [(f64, f64, f64); 4],
    pub t: f64,
}

impl Cell {
    pub fn center(&self) -> (f64, f64, f64) {
        let sum = self
            .corners
            .iter()
            .fold((0.0, 0.0, 0.0), |acc, c| (acc.0 + c.0, acc.1 + c.1, acc.2 + c.2));
        (sum.0 / 4.0, sum.1 / 4.0, sum.2 / 4.0)
    }
}

impl SurfaceArtist {
    /// Quads between neighbouring samples. Cells touching a non-finite
    /// height are left out.
    pub(crate) fn cells(&self, z_limits: (f64, f64)) -> Vec<Cell> {
        let xs = self.surface.grid().xs();
        let ys = self.surface.grid().ys();
        let z = self.surface.z();
        let span = z_limits.1 - z_limits.0;
        let mut cells = Vec::with_capacity(xs.len().saturating_sub(1) * ys.len().saturating_sub(1));
        for j in 1..ys.len() {
            for i in 1..xs.len() {
                let corners = [
                    (xs[i - 1], ys[j - 1], z[[j - 1, i - 1]]),
                    (xs[i], ys[j - 1], z[[j - 1, i]]),
                    (xs[i], ys[j], z[[j, i]]),
                    (xs[i - 1], ys[j], z[[j, i - 1]]),
                ];
                if corners.iter().any(|c| !c.2.is_finite()) {
                    continue;
                }
                let mean = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
                let t = if span > 0.0 {
                    (mean - z_limits.0) / span
                } else {
                    0.5
                };
                cells.push(Cell { corners, t });
            }
        }
        cells
    }
}

/// Data limits of the three axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

/// A 3D axes: the artists to draw plus axis labels.
///
/// The canvas clears it before every call to the draw callback, so nothing
/// here survives a redraw.
#[derive(Debug, Default)]
pub struct Axes3d {
    surfaces: Vec<SurfaceArtist>,
    xlabel: String,
    ylabel: String,
    zlabel: String,
}

impl Axes3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.xlabel.clear();
        self.ylabel.clear();
        self.zlabel.clear();
    }

    pub fn plot_surface(&mut self, surface: Surface, style: SurfaceStyle) {
        self.surfaces.push(SurfaceArtist { surface, style });
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = label.into();
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = label.into();
    }

    pub fn set_zlabel(&mut self, label: impl Into<String>) {
        self.zlabel = label.into();
    }

    pub fn labels(&self) -> [&str; 3] {
        [
            self.xlabel.as_str(),
            self.ylabel.as_str(),
            self.zlabel.as_str(),
        ]
    }

    pub fn surfaces(&self) -> &[SurfaceArtist] {
        &self.surfaces
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Union of the surfaces' extents. Empty axes span `[0, 1]`; a degenerate
    /// extent is widened by half a unit each side.
    pub fn limits(&self) -> Limits {
        let mut x = None;
        let mut y = None;
        let mut z = None;
        for artist in &self.surfaces {
            let grid = artist.surface.grid();
            for v in grid.xs() {
                x = widen(x, *v);
            }
            for v in grid.ys() {
                y = widen(y, *v);
            }
            if let Some((lo, hi)) = artist.surface.z_range() {
                z = widen(widen(z, lo), hi);
            }
        }
        Limits {
            x: finish(x),
            y: finish(y),
            z: finish(z),
        }
    }
}

fn widen(range: Option<(f64, f64)>, v: f64) -> Option<(f64, f64)> {
    if !v.is_finite() {
        return range;
    }
    Some(match range {
        None => (v, v),
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
    })
}

fn finish(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some(range) => range,
    }
}

/// Camera orientation, in radians, and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub yaw: f64,
    pub pitch: f64,
    pub scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            yaw: 0.5,
            pitch: 0.3,
            scale: 0.9,
        }
    }
}

impl ViewState {
    const ROTATE_PER_POINT: f64 = 0.01;

    /// Applies a pointer drag. Pitch stops at straight up and straight down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += f64::from(dx) * Self::ROTATE_PER_POINT;
        self.pitch =
            (self.pitch + f64::from(dy) * Self::ROTATE_PER_POINT).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.scale = (self.scale * (1.0 + f64::from(scroll) * 0.001)).clamp(0.2, 4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use surfplot_core::Grid;

    fn surface(z: ndarray::Array2<f64>) -> Surface {
        Surface::new(Grid::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0]), z)
    }

    #[test]
    fn cells_skip_non_finite_corners() {
        let artist = SurfaceArtist {
            surface: surface(array![[0.0, 1.0, f64::NAN], [2.0, 3.0, 4.0]]),
            style: SurfaceStyle::new(ColorMap::Viridis),
        };
        let cells = artist.cells((0.0, 4.0));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].t, 1.5 / 4.0);
        assert_eq!(cells[0].center(), (0.5, 15.0, 1.5));
    }

    #[test]
    fn flat_surface_uses_middle_of_color_map() {
        let artist = SurfaceArtist {
            surface: surface(array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]),
            style: SurfaceStyle::new(ColorMap::Jet),
        };
        assert!(artist.cells((1.0, 1.0)).iter().all(|cell| cell.t == 0.5));
    }

    #[test]
    fn limits_cover_all_surfaces() {
        let mut axes = Axes3d::new();
        assert_eq!(axes.limits().x, (0.0, 1.0));
        axes.plot_surface(
            surface(array![[0.0, 1.0, f64::INFINITY], [2.0, 3.0, 4.0]]),
            SurfaceStyle::new(ColorMap::Viridis),
        );
        let limits = axes.limits();
        assert_eq!(limits.x, (0.0, 2.0));
        assert_eq!(limits.y, (10.0, 20.0));
        assert_eq!(limits.z, (0.0, 4.0));
    }

    #[test]
    fn clear_drops_artists_and_labels() {
        let mut axes = Axes3d::new();
        axes.set_xlabel("x");
        axes.plot_surface(
            surface(array![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]),
            SurfaceStyle::new(ColorMap::Magma).edges((0, 0, 0), 0.25),
        );
        axes.clear();
        assert!(axes.is_empty());
        assert_eq!(axes.labels(), ["", "", ""]);
        assert_eq!(axes.limits().z, (0.0, 1.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut view = ViewState::default();
        view.rotate(0.0, 10_000.0);
        assert_eq!(view.pitch, FRAC_PI_2);
        view.zoom(1e9);
        assert_eq!(view.scale, 4.0);
    }
}
