use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Queue of modal error messages shown over the whole window.
///
/// Clones share the same queue, so the draw callback can report errors that
/// the window renders on its next frame.
#[derive(Debug, Clone, Default)]
pub struct ErrorDialog {
    queue: Rc<RefCell<VecDeque<Notification>>>,
}

impl ErrorDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_error(&self, message: &str) {
        log::debug!("queued error dialog: {}", message.replace('\n', " "));
        self.queue.borrow_mut().push_back(Notification {
            title: "Error".to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_open(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn current(&self) -> Option<Notification> {
        self.queue.borrow().front().cloned()
    }

    pub fn dismiss(&self) -> Option<Notification> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn render(&self, ctx: &egui::Context) {
        let Some(notification) = self.current() else {
            return;
        };

        let screen_rect = ctx.screen_rect();
        egui::Area::new(egui::Id::new("error_blocker"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                ui.allocate_rect(screen_rect, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(160));
            });

        let mut dismissed = false;
        egui::Area::new(egui::Id::new("error_dialog"))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::CENTER_CENTER)
            .fixed_pos(screen_rect.center())
            .show(ctx, |ui| {
                egui::Frame::window(ui.style())
                    .rounding(egui::Rounding::same(6.0))
                    .show(ui, |ui| {
                        ui.set_max_width(420.0);
                        ui.heading(&notification.title);
                        ui.add_space(6.0);
                        ui.label(&notification.message);
                        ui.add_space(6.0);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            if ui.button("OK").clicked() {
                                dismissed = true;
                            }
                        });
                    });
            });
        if dismissed {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_queue_in_order() {
        let dialog = ErrorDialog::new();
        assert!(!dialog.is_open());

        let shared = dialog.clone();
        shared.show_error("first");
        dialog.show_error("second");

        assert_eq!(dialog.pending(), 2);
        let current = dialog.current().unwrap();
        assert_eq!(current.title, "Error");
        assert_eq!(current.message, "first");
        assert_eq!(dialog.dismiss().unwrap().message, "first");
        assert_eq!(shared.current().unwrap().message, "second");
        dialog.dismiss();
        assert!(!shared.is_open());
        assert!(dialog.dismiss().is_none());
    }
}
