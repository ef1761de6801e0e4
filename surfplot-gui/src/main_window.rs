//! The surface plotter: plot options, the sidebar that edits them and the
//! draw callback that turns them into a surface.

use crate::app::Application;
use crate::builder::{BuildError, ComboBox, Slider, SpinBox, TextBox, WidgetBuilder};
use crate::canvas::{Axes3d, RedrawHandle, SurfaceStyle};
use crate::dialogs::ErrorDialog;
use crate::widget::Widget;
use surfplot_core::{ColorMap, Observable, PlotError, PlotParams, Surface};

const EDGE_COLOR: (u8, u8, u8) = (0, 0, 0);
const EDGE_WIDTH: f64 = 0.25;

/// Every option the sidebar edits.
pub struct PlotOptions {
    pub xmin: Observable<f64>,
    pub xmax: Observable<f64>,
    pub ymin: Observable<f64>,
    pub ymax: Observable<f64>,
    pub resolution: Observable<i64>,
    pub cmap_idx: Observable<i64>,
    pub plotting_function: Observable<String>,
}

impl PlotOptions {
    pub fn new(defaults: &PlotParams) -> Self {
        Self {
            xmin: Observable::new(defaults.xmin),
            xmax: Observable::new(defaults.xmax),
            ymin: Observable::new(defaults.ymin),
            ymax: Observable::new(defaults.ymax),
            resolution: Observable::new(defaults.resolution),
            cmap_idx: Observable::new(defaults.cmap_index),
            plotting_function: Observable::new(defaults.function.clone()),
        }
    }

    pub fn snapshot(&self) -> PlotParams {
        PlotParams {
            xmin: self.xmin.value(),
            xmax: self.xmax.value(),
            ymin: self.ymin.value(),
            ymax: self.ymax.value(),
            resolution: self.resolution.value(),
            cmap_index: self.cmap_idx.value(),
            function: self.plotting_function.value(),
        }
    }
}

pub struct SurfacePlotter {
    options: PlotOptions,
}

impl SurfacePlotter {
    pub fn new(defaults: PlotParams) -> Self {
        Self {
            options: PlotOptions::new(&defaults),
        }
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Samples the current function and adds it to `axes`.
    pub fn plot(&self, axes: &mut Axes3d) -> Result<(), PlotError> {
        let params = self.options.snapshot();
        let cmap = params.color_map()?;
        let surface = Surface::sample(&params)?;
        axes.set_xlabel("x");
        axes.set_ylabel("y");
        axes.set_zlabel("z");
        axes.plot_surface(surface, SurfaceStyle::new(cmap).edges(EDGE_COLOR, EDGE_WIDTH));
        Ok(())
    }
}

impl Default for SurfacePlotter {
    fn default() -> Self {
        Self::new(PlotParams::default())
    }
}

struct PlotSettingsPanel;

impl Widget<SurfacePlotter> for PlotSettingsPanel {
    fn build(&self, builder: &mut WidgetBuilder<'_, SurfacePlotter>) -> Result<(), BuildError> {
        let options = builder.context().options();
        let bounds = [
            ("minimum X", &options.xmin),
            ("maximum X", &options.xmax),
            ("minimum Y", &options.ymin),
            ("maximum Y", &options.ymax),
        ];
        for (prefix, option) in bounds {
            builder.add_spinbox(SpinBox::new().prefix(prefix), option.clone())?;
        }
        builder.add_space();
        builder.add_slider(
            Slider::new().label("Resolution").range(10, 100).interval(2),
            options.resolution.clone(),
        )?;
        builder.add_space();
        builder.add_combobox(
            ComboBox::new(ColorMap::names()).label("Color Map"),
            options.cmap_idx.clone(),
        );
        builder.add_stretch();
        Ok(())
    }
}

impl Application for SurfacePlotter {
    fn connect_redraw(&self, redraw: &RedrawHandle) {
        // The function text only takes effect through the Redraw button.
        let options = &self.options;
        for option in [&options.xmin, &options.xmax, &options.ymin, &options.ymax] {
            let redraw = redraw.clone();
            option.connect(move |_| {
                redraw.redraw();
            });
        }
        for option in [&options.resolution, &options.cmap_idx] {
            let redraw = redraw.clone();
            option.connect(move |_| {
                redraw.redraw();
            });
        }
    }

    fn build_sidebar(&self, builder: &mut WidgetBuilder<'_, Self>) -> Result<(), BuildError> {
        builder.add_textbox(
            TextBox::new().prefix("Function to plot"),
            self.options.plotting_function.clone(),
        );
        builder.add_space();
        builder.add_group("Plot Settings", &PlotSettingsPanel)?;
        builder.add_space();
        let redraw = builder.redraw();
        builder.add_button("Redraw", move || {
            redraw.redraw();
        });
        builder.add_stretch();
        Ok(())
    }

    fn draw(&self, axes: &mut Axes3d, errors: &ErrorDialog) {
        if let Err(err) = self.plot(axes) {
            log::warn!(
                "failed to plot '{}': {err}",
                self.options.plotting_function.value()
            );
            axes.clear();
            errors.show_error(&format!("Oops!\n\nError plotting function\n\n{err}"));
        }
    }

    fn started(&self) {
        log::info!(
            "plotting '{}' on [{}, {}] x [{}, {}]",
            self.options.plotting_function.value(),
            self.options.xmin.value(),
            self.options.xmax.value(),
            self.options.ymin.value(),
            self.options.ymax.value()
        );
    }
}
