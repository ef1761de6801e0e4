use crate::builder::{BuildError, WidgetBuilder};
use crate::canvas::{Axes3d, PlotCanvas, RedrawHandle};
use crate::dialogs::ErrorDialog;
use crate::sidebar::Sidebar;
use eframe::egui;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Plotting logic hosted by an [`ApplicationWindow`].
///
/// The window owns the canvas and the sidebar; the application owns the
/// options and decides what gets drawn.
pub trait Application: Sized + 'static {
    /// Connects the options that should redraw the plot on change.
    fn connect_redraw(&self, redraw: &RedrawHandle);

    fn build_sidebar(&self, builder: &mut WidgetBuilder<'_, Self>) -> Result<(), BuildError>;

    /// Draw callback of the canvas. The axes arrive cleared.
    fn draw(&self, axes: &mut Axes3d, errors: &ErrorDialog);

    /// Called once, on the first frame.
    fn started(&self) {}
}

/// Sidebar on the left, plot on the right.
pub struct ApplicationWindow<A: Application> {
    app: Rc<A>,
    sidebar: Sidebar,
    canvas: Rc<RefCell<PlotCanvas>>,
    errors: ErrorDialog,
    redraw: RedrawHandle,
    started: bool,
}

impl<A: Application> ApplicationWindow<A> {
    /// Builds the window around `app` and draws the initial plot.
    pub fn new(app: A) -> Result<Self, BuildError> {
        let app = Rc::new(app);
        let errors = ErrorDialog::new();

        let draw_app = Rc::clone(&app);
        let draw_errors = errors.clone();
        let canvas = Rc::new(RefCell::new(PlotCanvas::new(move |axes| {
            draw_app.draw(axes, &draw_errors)
        })));
        let redraw = RedrawHandle::new(&canvas);
        app.connect_redraw(&redraw);

        let mut builder = WidgetBuilder::new(app.as_ref(), redraw.clone());
        app.build_sidebar(&mut builder)?;
        let sidebar = Sidebar::new(builder.finish());

        redraw.redraw();
        Ok(Self {
            app,
            sidebar,
            canvas,
            errors,
            redraw,
            started: false,
        })
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn errors(&self) -> &ErrorDialog {
        &self.errors
    }

    pub fn canvas(&self) -> Ref<'_, PlotCanvas> {
        self.canvas.borrow()
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn redraw(&self) -> bool {
        self.redraw.redraw()
    }
}

impl<A: Application> eframe::App for ApplicationWindow<A> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.app.started();
        }
        self.sidebar.show(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                self.canvas.borrow_mut().show(ui, &self.errors);
            });
        self.errors.render(ctx);
    }
}
