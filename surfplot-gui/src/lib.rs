pub mod app;
pub mod builder;
pub mod canvas;
pub mod dialogs;
pub mod main_window;
pub mod sidebar;
pub mod widget;

pub use app::{Application, ApplicationWindow};
pub use builder::{BuildError, ComboBox, Slider, SpinBox, TextBox, WidgetBuilder};
pub use canvas::{Axes3d, PlotCanvas, RedrawHandle, RenderError, SurfaceStyle, ViewState};
pub use dialogs::{ErrorDialog, Notification};
pub use main_window::{PlotOptions, SurfacePlotter};
pub use sidebar::Sidebar;
pub use widget::{Control, Ground, Widget};

use eframe::egui;
use surfplot_core::PlotParams;

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "Custom 3d plotter".to_string(),
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Opens the plotter window and blocks until it is closed.
pub fn run_gui(config: GuiConfig, defaults: PlotParams) -> Result<(), GuiError> {
    let window = ApplicationWindow::new(SurfacePlotter::new(defaults))?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&config.title)
            .with_inner_size([config.width, config.height]),
        ..Default::default()
    };

    log::info!(
        "opening '{}' at {}x{}",
        config.title,
        config.width,
        config.height
    );
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(window)
        }),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}
