//! Shared enums used by the correlation core and the settings layer.

mod enums;

pub use enums::{Padding, PeakMode, ScaleMode, WeightingKind};
