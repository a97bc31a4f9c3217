//! Composable pure filter stages over explicit pixel buffers
//!
//! Each stage is a function from inputs to a new value with no hidden
//! state: estimate a background reference, build a classification mask,
//! refine it against image gradients, smooth it, and feather the boundary.
//! The [`crate::processor`] module sequences these stages; they can also be
//! called individually for custom pipelines.
//!
//! Masks are represented internally as `ndarray::Array2<f32>` in `[0, 1]`,
//! indexed `[row, column]` (so shape is `(height, width)`).

pub mod background;
pub mod classify;
pub mod edge;
pub mod feather;
pub mod smooth;

pub use background::{estimate_background, BackgroundReference};
pub use classify::{classify_adaptive, classify_fixed, distance_field};
pub use edge::{gradient_magnitude, refine_boundary};
pub use feather::feather;
pub use smooth::smooth;

/// Continuous foreground mask: `0.0` = background, `1.0` = foreground
pub type MaskField = ndarray::Array2<f32>;
