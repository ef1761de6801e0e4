//! Core model of the surface plotter: observable options, the restricted
//! expression language, grid sampling and color maps.
//!
//! Nothing in this crate depends on the GUI toolkit; the `surfplot-gui` crate
//! binds these types to widgets and to the plot canvas.

pub mod colormap;
pub mod expression;
pub mod option;
pub mod settings;
pub mod surface;

pub use colormap::ColorMap;
pub use expression::{Expression, ExpressionError, MAX_DEPTH};
pub use option::{AnyOption, Observable, SubscriptionId};
pub use settings::PlotParams;
pub use surface::{linspace, Grid, PlotError, Surface};
