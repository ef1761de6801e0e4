//! Declarative façade for populating a [`Ground`] with bound controls.
//!
//! Each `add_*` call appends one control and binds it to an option in both
//! directions: the control's change event calls `Observable::change`, and an
//! observer on the option mirrors external updates into the control.

use crate::canvas::RedrawHandle;
use crate::widget::{
    Binding, ButtonControl, ComboBoxControl, Control, Ground, GroupControl, SliderControl,
    SpinBoxControl, SpinValue, TextBoxControl, Widget,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use surfplot_core::{AnyOption, Observable};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BuildError {
    #[error("invalid spin box kind \"{0}\"")]
    InvalidSpinKind(&'static str),
    #[error("invalid range: minimum {minimum} is greater than maximum {maximum}")]
    InvalidRange { minimum: f64, maximum: f64 },
    #[error("slider interval must be positive, got {0}")]
    InvalidInterval(i64),
}

#[derive(Debug, Clone, Default)]
pub struct TextBox {
    pub label: Option<String>,
    pub prefix: Option<String>,
    pub postfix: Option<String>,
    pub readonly: bool,
}

impl TextBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}

/// Spin box settings. Unset limits fall back to the kind's native range:
/// `i32::MIN..=i32::MAX` with step 1 for integers, unbounded with step 0.1
/// and 5 decimals for reals.
#[derive(Debug, Clone, Default)]
pub struct SpinBox {
    pub label: Option<String>,
    pub prefix: Option<String>,
    pub postfix: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub step: Option<f64>,
    pub decimals: Option<usize>,
}

impl SpinBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = Some(postfix.into());
        self
    }

    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Slider {
    pub label: Option<String>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub interval: Option<i64>,
}

impl Slider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComboBox {
    pub label: Option<String>,
    pub items: Vec<String>,
}

impl ComboBox {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            label: None,
            items: items.into_iter().map(|item| item.to_string()).collect(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Builds a [`Ground`] for a widget whose options live in the context `C`.
pub struct WidgetBuilder<'a, C> {
    context: &'a C,
    redraw: RedrawHandle,
    ground: Ground,
    ids: Rc<Cell<u64>>,
}

impl<'a, C> WidgetBuilder<'a, C> {
    pub fn new(context: &'a C, redraw: RedrawHandle) -> Self {
        Self {
            context,
            redraw,
            ground: Ground::new(),
            ids: Rc::new(Cell::new(0)),
        }
    }

    /// Builds `widget` into a fresh ground.
    pub fn compose(
        context: &'a C,
        redraw: RedrawHandle,
        widget: &impl Widget<C>,
    ) -> Result<Ground, BuildError> {
        let mut builder = Self::new(context, redraw);
        widget.build(&mut builder)?;
        Ok(builder.finish())
    }

    pub fn context(&self) -> &'a C {
        self.context
    }

    /// Handle that redraws the plot canvas of the enclosing window.
    pub fn redraw(&self) -> RedrawHandle {
        self.redraw.clone()
    }

    pub fn finish(self) -> Ground {
        self.ground
    }

    fn nested(&self) -> WidgetBuilder<'a, C> {
        WidgetBuilder {
            context: self.context,
            redraw: self.redraw.clone(),
            ground: Ground::new(),
            ids: Rc::clone(&self.ids),
        }
    }

    fn next_id(&self, kind: &str) -> egui::Id {
        let id = self.ids.get();
        self.ids.set(id + 1);
        egui::Id::new((kind, id))
    }

    /// Builds `widget` inline, without a frame around it.
    pub fn add(&mut self, widget: &impl Widget<C>) -> Result<(), BuildError> {
        widget.build(self)
    }

    pub fn add_space(&mut self) {
        self.ground.push(Control::Space);
    }

    pub fn add_stretch(&mut self) {
        self.ground.push(Control::Stretch);
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        self.ground.push(Control::Label(label.into()));
    }

    pub fn add_button(&mut self, label: impl Into<String>, action: impl Fn() + 'static) {
        self.ground.push(Control::Button(ButtonControl {
            label: label.into(),
            action: Rc::new(action),
        }));
    }

    pub fn add_textbox(&mut self, settings: TextBox, option: Observable<String>) {
        let buffer = Rc::new(RefCell::new(option.value()));
        let binding = mirror(option, &buffer, |buffer, value: &String| {
            *buffer.borrow_mut() = value.clone();
        });
        self.ground.push(Control::TextBox(TextBoxControl {
            label: settings.label,
            prefix: settings.prefix,
            postfix: settings.postfix,
            readonly: settings.readonly,
            buffer,
            binding,
        }));
    }

    /// Adds a numeric field. Only integer and real options can back a spin
    /// box; anything else is a configuration error.
    pub fn add_spinbox(
        &mut self,
        settings: SpinBox,
        option: impl Into<AnyOption>,
    ) -> Result<(), BuildError> {
        let value = match option.into() {
            AnyOption::Int(option) => {
                let minimum = settings.minimum.map_or(i64::from(i32::MIN), |v| v.round() as i64);
                let maximum = settings.maximum.map_or(i64::from(i32::MAX), |v| v.round() as i64);
                check_range(minimum as f64, maximum as f64)?;
                let step = settings.step.map_or(1, |v| (v.round() as i64).max(1));
                let shown = Rc::new(Cell::new(option.value()));
                let binding = mirror(option, &shown, |shown, value: &i64| shown.set(*value));
                SpinValue::Int {
                    binding,
                    shown,
                    range: minimum..=maximum,
                    step,
                }
            }
            AnyOption::Real(option) => {
                let minimum = settings.minimum.unwrap_or(f64::NEG_INFINITY);
                let maximum = settings.maximum.unwrap_or(f64::INFINITY);
                check_range(minimum, maximum)?;
                let shown = Rc::new(Cell::new(option.value()));
                let binding = mirror(option, &shown, |shown, value: &f64| shown.set(*value));
                SpinValue::Real {
                    binding,
                    shown,
                    range: minimum..=maximum,
                    step: settings.step.unwrap_or(0.1),
                    decimals: settings.decimals.unwrap_or(5),
                }
            }
            other => return Err(BuildError::InvalidSpinKind(other.kind())),
        };
        self.ground.push(Control::SpinBox(SpinBoxControl {
            label: settings.label,
            prefix: settings.prefix,
            postfix: settings.postfix,
            value,
        }));
        Ok(())
    }

    pub fn add_slider(&mut self, settings: Slider, option: Observable<i64>) -> Result<(), BuildError> {
        let minimum = settings.minimum.unwrap_or(1);
        let maximum = settings.maximum.unwrap_or(10);
        check_range(minimum as f64, maximum as f64)?;
        let interval = settings.interval.unwrap_or(1);
        if interval <= 0 {
            return Err(BuildError::InvalidInterval(interval));
        }
        let shown = Rc::new(Cell::new(option.value()));
        let binding = mirror(option, &shown, |shown, value: &i64| shown.set(*value));
        self.ground.push(Control::Slider(SliderControl {
            label: settings.label,
            binding,
            shown,
            range: minimum..=maximum,
            interval,
        }));
        Ok(())
    }

    pub fn add_combobox(&mut self, settings: ComboBox, option: Observable<i64>) {
        let shown = Rc::new(Cell::new(option.value()));
        let binding = mirror(option, &shown, |shown, value: &i64| shown.set(*value));
        let id = self.next_id("combobox");
        self.ground.push(Control::ComboBox(ComboBoxControl {
            id,
            label: settings.label,
            items: settings.items,
            binding,
            shown,
        }));
    }

    /// Adds a framed group whose content is built from a nested widget.
    pub fn add_group(
        &mut self,
        label: impl Into<String>,
        content: &impl Widget<C>,
    ) -> Result<(), BuildError> {
        let mut nested = self.nested();
        content.build(&mut nested)?;
        self.ground.push(Control::Group(GroupControl {
            label: label.into(),
            ground: nested.finish(),
        }));
        Ok(())
    }
}

fn check_range(minimum: f64, maximum: f64) -> Result<(), BuildError> {
    if minimum.is_nan() || maximum.is_nan() || minimum > maximum {
        return Err(BuildError::InvalidRange { minimum, maximum });
    }
    Ok(())
}

/// Mirrors option updates into a control's displayed state.
///
/// The observer holds the state weakly and is disconnected when the returned
/// binding is dropped with its control.
fn mirror<T, S>(
    option: Observable<T>,
    state: &Rc<S>,
    apply: impl Fn(&S, &T) + 'static,
) -> Binding<T>
where
    T: Clone + 'static,
    S: 'static,
{
    let state: Weak<S> = Rc::downgrade(state);
    let id = option.connect(move |value| {
        if let Some(state) = state.upgrade() {
            apply(&state, value);
        }
    });
    Binding::new(option, id)
}
