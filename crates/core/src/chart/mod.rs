//! Chart rendering layer: scales, axis domains, zoom state, viewport
//! rescaling, tooltip lookup and the drawing surface abstraction.

pub mod domain;
pub mod renderer;
pub mod scale;
pub mod surface;
pub mod tooltip;
pub mod viewport;
pub mod zoom;
