//! Spherical brush editing with surface-grow and surface-erode rules.

mod brush;

pub use brush::{BrushMode, BrushRegion, SculptEdit, sculpt};
