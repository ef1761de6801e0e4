use crate::colormap::ColorMap;
use crate::surface::PlotError;

/// A snapshot of every plot option, taken at the start of a draw.
///
/// `Default` holds the values the plotter starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotParams {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub resolution: i64,
    pub cmap_index: i64,
    pub function: String,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            xmin: -50.0,
            xmax: 50.0,
            ymin: -50.0,
            ymax: 50.0,
            resolution: 20,
            cmap_index: 0,
            function: "x**2 + y**2".to_string(),
        }
    }
}

impl PlotParams {
    pub fn color_map(&self) -> Result<ColorMap, PlotError> {
        ColorMap::from_index(self.cmap_index).ok_or(PlotError::UnknownColorMap(self.cmap_index))
    }

    /// Samples per axis; a non-positive resolution yields an empty grid.
    pub fn samples(&self) -> usize {
        usize::try_from(self.resolution).unwrap_or(0)
    }
}
