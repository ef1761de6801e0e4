//! Retained controls produced by the widget builder.
//!
//! egui redraws everything each frame, so the builder does not create
//! toolkit widgets. It records a [`Ground`], a vertical list of controls that
//! each own the state they display and a handle to the option they are bound
//! to. `Ground::show` turns that list into egui widgets every frame.

use crate::builder::{BuildError, WidgetBuilder};
use std::cell::{Cell, RefCell};
use std::ops::RangeInclusive;
use std::rc::Rc;
use surfplot_core::{Observable, SubscriptionId};

const SPACE: f32 = 16.0;
const BUTTON_HEIGHT: f32 = 24.0;

/// A composable unit of the sidebar.
///
/// Implementors describe their content by calling the builder; the builder
/// takes care of binding each control to its option.
pub trait Widget<C> {
    fn build(&self, builder: &mut WidgetBuilder<'_, C>) -> Result<(), BuildError>;
}

/// A vertical layout of controls.
#[derive(Default)]
pub struct Ground {
    controls: Vec<Control>,
}

impl Ground {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, control: Control) {
        self.controls.push(control);
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Finds the first button labelled `label`, searching groups too.
    pub fn find_button(&self, label: &str) -> Option<&ButtonControl> {
        self.controls.iter().find_map(|control| match control {
            Control::Button(button) if button.label == label => Some(button),
            Control::Group(group) => group.ground.find_button(label),
            _ => None,
        })
    }

    /// Renders the controls top-down. Controls after the first stretch are
    /// pinned to the bottom of the available space.
    pub(crate) fn show(&self, ui: &mut egui::Ui) {
        let split = self
            .controls
            .iter()
            .position(|control| matches!(control, Control::Stretch));
        let (head, tail) = match split {
            Some(idx) => (&self.controls[..idx], &self.controls[idx + 1..]),
            None => (&self.controls[..], &[][..]),
        };
        for control in head {
            control.show(ui);
        }
        if tail.is_empty() {
            return;
        }
        if ui.available_height().is_finite() {
            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                for control in tail.iter().rev() {
                    control.show(ui);
                }
            });
        } else {
            for control in tail {
                control.show(ui);
            }
        }
    }
}

pub enum Control {
    Label(String),
    Button(ButtonControl),
    Space,
    Stretch,
    TextBox(TextBoxControl),
    SpinBox(SpinBoxControl),
    Slider(SliderControl),
    ComboBox(ComboBoxControl),
    Group(GroupControl),
}

impl Control {
    fn show(&self, ui: &mut egui::Ui) {
        match self {
            Control::Label(text) => {
                ui.label(text);
            }
            Control::Button(button) => button.show(ui),
            Control::Space => ui.add_space(SPACE),
            // Handled by `Ground::show`.
            Control::Stretch => {}
            Control::TextBox(textbox) => textbox.show(ui),
            Control::SpinBox(spinbox) => spinbox.show(ui),
            Control::Slider(slider) => slider.show(ui),
            Control::ComboBox(combobox) => combobox.show(ui),
            Control::Group(group) => group.show(ui),
        }
    }
}

fn show_label(ui: &mut egui::Ui, label: Option<&str>) {
    if let Some(label) = label {
        ui.label(label);
    }
}

/// Ties a control to its option. The observer mirroring the option into the
/// control is disconnected when the control is dropped.
pub struct Binding<T: Clone + 'static> {
    option: Observable<T>,
    mirror: SubscriptionId,
}

impl<T: Clone + 'static> Binding<T> {
    pub(crate) fn new(option: Observable<T>, mirror: SubscriptionId) -> Self {
        Self { option, mirror }
    }

    pub fn option(&self) -> &Observable<T> {
        &self.option
    }

    fn change(&self, value: T) {
        self.option.change(value);
    }
}

impl<T: Clone + 'static> Drop for Binding<T> {
    fn drop(&mut self) {
        self.option.disconnect(self.mirror);
    }
}

pub struct ButtonControl {
    pub(crate) label: String,
    pub(crate) action: Rc<dyn Fn()>,
}

impl ButtonControl {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn click(&self) {
        (self.action)();
    }

    fn show(&self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), BUTTON_HEIGHT);
        if ui
            .add_sized(size, egui::Button::new(&self.label).min_size(size))
            .clicked()
        {
            self.click();
        }
    }
}

/// Single-line text field; commits to its option when editing finishes.
pub struct TextBoxControl {
    pub(crate) label: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) postfix: Option<String>,
    pub(crate) readonly: bool,
    pub(crate) buffer: Rc<RefCell<String>>,
    pub(crate) binding: Binding<String>,
}

impl TextBoxControl {
    pub fn text(&self) -> String {
        self.buffer.borrow().clone()
    }

    /// Replaces the edit buffer without committing it.
    pub fn edit(&self, text: impl Into<String>) {
        *self.buffer.borrow_mut() = text.into();
    }

    pub fn finish_editing(&self) {
        if self.readonly {
            return;
        }
        let text = self.text();
        self.binding.change(text);
    }

    fn show(&self, ui: &mut egui::Ui) {
        show_label(ui, self.label.as_deref());
        ui.horizontal(|ui| {
            if let Some(prefix) = &self.prefix {
                ui.label(prefix);
            }
            let reserved = if self.postfix.is_some() { 48.0 } else { 0.0 };
            let mut text = self.text();
            let response = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .interactive(!self.readonly)
                    .desired_width((ui.available_width() - reserved).max(40.0)),
            );
            if response.changed() {
                self.edit(text);
            }
            if response.lost_focus() {
                self.finish_editing();
            }
            if let Some(postfix) = &self.postfix {
                ui.label(postfix);
            }
        });
    }
}

pub enum SpinValue {
    Int {
        binding: Binding<i64>,
        shown: Rc<Cell<i64>>,
        range: RangeInclusive<i64>,
        step: i64,
    },
    Real {
        binding: Binding<f64>,
        shown: Rc<Cell<f64>>,
        range: RangeInclusive<f64>,
        step: f64,
        decimals: usize,
    },
}

/// Numeric field with step buttons, integer or real.
pub struct SpinBoxControl {
    pub(crate) label: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) postfix: Option<String>,
    pub(crate) value: SpinValue,
}

impl SpinBoxControl {
    pub fn displayed(&self) -> f64 {
        match &self.value {
            SpinValue::Int { shown, .. } => shown.get() as f64,
            SpinValue::Real { shown, .. } => shown.get(),
        }
    }

    /// Applies a user edit: rounds to the control's precision, clamps to its
    /// range and forwards the result to the option. Non-finite reals are
    /// ignored.
    pub fn set_value(&self, value: f64) {
        match &self.value {
            SpinValue::Int { binding, range, .. } => {
                let value = (value.round() as i64).clamp(*range.start(), *range.end());
                binding.change(value);
            }
            SpinValue::Real {
                binding,
                range,
                decimals,
                ..
            } => {
                if !value.is_finite() {
                    return;
                }
                // Values too large to scale already have no fractional digits.
                let scale = 10f64.powi(*decimals as i32);
                let scaled = value * scale;
                let value = if scaled.is_finite() {
                    scaled.round() / scale
                } else {
                    value
                };
                binding.change(value.clamp(*range.start(), *range.end()));
            }
        }
    }

    pub fn step_by(&self, steps: i32) {
        let delta = match &self.value {
            SpinValue::Int { step, .. } => *step as f64,
            SpinValue::Real { step, .. } => *step,
        };
        self.set_value(self.displayed() + delta * f64::from(steps));
    }

    fn show(&self, ui: &mut egui::Ui) {
        show_label(ui, self.label.as_deref());
        ui.horizontal(|ui| {
            if let Some(prefix) = &self.prefix {
                ui.label(prefix);
            }
            let mut edited = None;
            match &self.value {
                SpinValue::Int {
                    shown, range, step, ..
                } => {
                    let mut value = shown.get();
                    let response = ui.add(
                        egui::DragValue::new(&mut value)
                            .clamp_range(range.clone())
                            .speed(*step as f64),
                    );
                    if response.changed() {
                        edited = Some(value as f64);
                    }
                }
                SpinValue::Real {
                    shown,
                    range,
                    step,
                    decimals,
                    ..
                } => {
                    let mut value = shown.get();
                    let response = ui.add(
                        egui::DragValue::new(&mut value)
                            .clamp_range(range.clone())
                            .speed(*step)
                            .max_decimals(*decimals),
                    );
                    if response.changed() {
                        edited = Some(value);
                    }
                }
            }
            if let Some(value) = edited {
                self.set_value(value);
            }
            if ui.small_button("-").clicked() {
                self.step_by(-1);
            }
            if ui.small_button("+").clicked() {
                self.step_by(1);
            }
            if let Some(postfix) = &self.postfix {
                ui.label(postfix);
            }
        });
    }
}

/// Horizontal integer slider snapping to its tick interval.
pub struct SliderControl {
    pub(crate) label: Option<String>,
    pub(crate) binding: Binding<i64>,
    pub(crate) shown: Rc<Cell<i64>>,
    pub(crate) range: RangeInclusive<i64>,
    pub(crate) interval: i64,
}

impl SliderControl {
    pub fn displayed(&self) -> i64 {
        self.shown.get()
    }

    fn snap(&self, value: i64) -> i64 {
        let (min, max) = (*self.range.start(), *self.range.end());
        let ticks = ((value - min) as f64 / self.interval as f64).round() as i64;
        (min + ticks * self.interval).clamp(min, max)
    }

    pub fn set_value(&self, value: i64) {
        self.binding.change(self.snap(value));
    }

    fn show(&self, ui: &mut egui::Ui) {
        show_label(ui, self.label.as_deref());
        let mut value = self.shown.get();
        let response = ui.add(
            egui::Slider::new(&mut value, self.range.clone()).step_by(self.interval as f64),
        );
        if response.changed() {
            self.set_value(value);
        }
    }
}

/// Drop-down list; the bound option holds the selected index.
pub struct ComboBoxControl {
    pub(crate) id: egui::Id,
    pub(crate) label: Option<String>,
    pub(crate) items: Vec<String>,
    pub(crate) binding: Binding<i64>,
    pub(crate) shown: Rc<Cell<i64>>,
}

impl ComboBoxControl {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected(&self) -> Option<&str> {
        usize::try_from(self.shown.get())
            .ok()
            .and_then(|idx| self.items.get(idx))
            .map(String::as_str)
    }

    pub fn select(&self, index: usize) {
        self.binding.change(index as i64);
    }

    fn show(&self, ui: &mut egui::Ui) {
        show_label(ui, self.label.as_deref());
        let current = self.shown.get();
        let mut chosen = None;
        egui::ComboBox::from_id_source(self.id)
            .selected_text(self.selected().unwrap_or_default())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for (idx, item) in self.items.iter().enumerate() {
                    if ui
                        .selectable_label(idx as i64 == current, item)
                        .clicked()
                    {
                        chosen = Some(idx);
                    }
                }
            });
        if let Some(idx) = chosen {
            self.select(idx);
        }
    }
}

pub struct GroupControl {
    pub(crate) label: String,
    pub(crate) ground: Ground,
}

impl GroupControl {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    fn show(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&self.label).strong());
            self.ground.show(ui);
        });
    }
}
