pub mod axes;
mod rendering;

pub use axes::{Axes3d, Limits, SurfaceArtist, SurfaceStyle, ViewState};

use crate::dialogs::ErrorDialog;
use eframe::egui;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const EXPORT_FALLBACK_SIZE: (u32, u32) = (1200, 800);

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("figure size {0}x{1} is empty")]
    EmptyFigure(u32, u32),
}

type DrawCallback = Box<dyn FnMut(&mut Axes3d)>;

/// A figure with a single 3D axes and an injected draw callback.
///
/// `redraw` is the only way content reaches the axes: it clears them, hands
/// them to the callback and marks the raster stale. The raster itself is
/// rebuilt lazily on the next frame, at the pane's pixel size.
pub struct PlotCanvas {
    axes: Axes3d,
    draw: DrawCallback,
    view: ViewState,
    texture: Option<egui::TextureHandle>,
    raster_size: (u32, u32),
    stale: bool,
    redraws: u64,
    ctx: Option<egui::Context>,
}

impl PlotCanvas {
    pub fn new(draw: impl FnMut(&mut Axes3d) + 'static) -> Self {
        Self {
            axes: Axes3d::new(),
            draw: Box::new(draw),
            view: ViewState::default(),
            texture: None,
            raster_size: (0, 0),
            stale: true,
            redraws: 0,
            ctx: None,
        }
    }

    pub fn redraw(&mut self) {
        self.axes.clear();
        (self.draw)(&mut self.axes);
        self.redraws += 1;
        self.stale = true;
        log::debug!(
            "redraw #{} produced {} surface(s)",
            self.redraws,
            self.axes.surfaces().len()
        );
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }

    pub fn axes(&self) -> &Axes3d {
        &self.axes
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn reset_view(&mut self) {
        self.view = ViewState::default();
        self.stale = true;
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub(crate) fn show(&mut self, ui: &mut egui::Ui, errors: &ErrorDialog) {
        if self.ctx.is_none() {
            self.ctx = Some(ui.ctx().clone());
        }
        egui::TopBottomPanel::bottom("plot_toolbar").show_inside(ui, |ui| {
            self.show_toolbar(ui, errors);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show_inside(ui, |ui| self.show_figure(ui, errors));
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui, errors: &ErrorDialog) {
        ui.horizontal(|ui| {
            if ui
                .button("Home")
                .on_hover_text("Reset original view")
                .clicked()
            {
                self.reset_view();
            }
            if ui
                .button("Save")
                .on_hover_text("Save the figure as PNG")
                .clicked()
            {
                self.save_figure(errors);
            }
            ui.separator();
            ui.label(format!(
                "azimuth {:.0}°, elevation {:.0}°, zoom {:.2}",
                self.view.yaw.to_degrees(),
                self.view.pitch.to_degrees(),
                self.view.scale
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak("drag to rotate, scroll to zoom");
            });
        });
    }

    fn show_figure(&mut self, ui: &mut egui::Ui, errors: &ErrorDialog) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
        if response.dragged() {
            let delta = response.drag_delta();
            self.view.rotate(delta.x, delta.y);
            self.stale = true;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.view.zoom(scroll);
                self.stale = true;
            }
        }

        let ppp = ui.ctx().pixels_per_point();
        let size = (
            (rect.width() * ppp).round().max(0.0) as u32,
            (rect.height() * ppp).round().max(0.0) as u32,
        );
        if size.0 == 0 || size.1 == 0 {
            return;
        }
        if self.stale || self.raster_size != size {
            self.refresh_texture(ui.ctx(), size, errors);
        }
        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(texture.id(), rect, uv, egui::Color32::WHITE);
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context, size: (u32, u32), errors: &ErrorDialog) {
        self.stale = false;
        self.raster_size = size;
        match rendering::rasterize(&self.axes, &self.view, size) {
            Ok(rgb) => {
                let image =
                    egui::ColorImage::from_rgb([size.0 as usize, size.1 as usize], &rgb);
                match &mut self.texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture =
                            Some(ctx.load_texture("plot_canvas", image, egui::TextureOptions::LINEAR));
                    }
                }
            }
            Err(err) => {
                log::error!("failed to render plot: {err}");
                errors.show_error(&format!("Could not render the plot.\n\n{err}"));
            }
        }
    }

    fn save_figure(&self, errors: &ErrorDialog) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("figure.png")
            .save_file()
        else {
            return;
        };
        let size = if self.raster_size.0 > 0 && self.raster_size.1 > 0 {
            self.raster_size
        } else {
            EXPORT_FALLBACK_SIZE
        };
        match rendering::export_png(&self.axes, &self.view, &path, size) {
            Ok(()) => log::info!("saved figure to {}", path.display()),
            Err(err) => {
                log::error!("failed to save figure to {}: {err}", path.display());
                errors.show_error(&format!("Could not save the figure.\n\n{err}"));
            }
        }
    }
}

/// Weak handle that lets options and buttons trigger a canvas redraw
/// without owning the canvas.
#[derive(Clone, Default)]
pub struct RedrawHandle {
    canvas: Weak<RefCell<PlotCanvas>>,
}

impl RedrawHandle {
    pub fn new(canvas: &Rc<RefCell<PlotCanvas>>) -> Self {
        Self {
            canvas: Rc::downgrade(canvas),
        }
    }

    /// Redraws synchronously. Returns `false` if the canvas is gone or is
    /// already in the middle of a redraw.
    pub fn redraw(&self) -> bool {
        let Some(canvas) = self.canvas.upgrade() else {
            return false;
        };
        let Ok(mut canvas) = canvas.try_borrow_mut() else {
            log::warn!("redraw requested while the canvas is busy, skipped");
            return false;
        };
        canvas.redraw();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use surfplot_core::{ColorMap, PlotParams, Surface};

    #[test]
    fn redraw_clears_before_calling_back() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut canvas = PlotCanvas::new(move |axes| {
            assert!(axes.is_empty());
            counter.set(counter.get() + 1);
            let surface = Surface::sample(&PlotParams::default()).unwrap();
            axes.plot_surface(surface, SurfaceStyle::new(ColorMap::Viridis));
        });

        canvas.redraw();
        canvas.redraw();

        assert_eq!(calls.get(), 2);
        assert_eq!(canvas.redraw_count(), 2);
        assert_eq!(canvas.axes().surfaces().len(), 1);
    }

    #[test]
    fn handle_outliving_canvas_is_inert() {
        let canvas = Rc::new(RefCell::new(PlotCanvas::new(|_| {})));
        let handle = RedrawHandle::new(&canvas);
        assert!(handle.redraw());
        drop(canvas);
        assert!(!handle.redraw());
        assert!(!RedrawHandle::default().redraw());
    }

    #[test]
    fn reentrant_redraw_is_skipped() {
        let slot: Rc<RefCell<Option<RedrawHandle>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let nested = Rc::new(Cell::new(None));
        let nested_result = Rc::clone(&nested);
        let canvas = Rc::new(RefCell::new(PlotCanvas::new(move |_| {
            if let Some(handle) = inner.borrow().as_ref() {
                nested_result.set(Some(handle.redraw()));
            }
        })));
        let handle = RedrawHandle::new(&canvas);
        *slot.borrow_mut() = Some(handle.clone());

        assert!(handle.redraw());
        assert_eq!(nested.get(), Some(false));
        assert_eq!(canvas.borrow().redraw_count(), 1);
    }

    #[test]
    fn reset_view_restores_default() {
        let mut canvas = PlotCanvas::new(|_| {});
        canvas.view.rotate(120.0, -40.0);
        assert_ne!(canvas.view(), ViewState::default());
        canvas.reset_view();
        assert_eq!(canvas.view(), ViewState::default());
    }
}
