use crate::widget::Ground;

const MIN_WIDTH: f32 = 300.0;

/// Left panel hosting the controls produced by the widget builder.
pub struct Sidebar {
    ground: Ground,
}

impl Sidebar {
    pub fn new(ground: Ground) -> Self {
        Self { ground }
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub(crate) fn show(&self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .resizable(true)
            .min_width(MIN_WIDTH)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0))
            .show(ctx, |ui| {
                let height = ui.available_height();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        // Pins controls after a stretch to the bottom edge.
                        ui.set_max_height(height);
                        self.ground.show(ui);
                    });
            });
    }
}
