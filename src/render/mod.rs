//! Card compositing: fixed layout constants, the raster surface, and the CPU layer compositor.

/// CPU layer compositor.
pub mod cpu;
/// Fixed drawing constants.
pub mod layout;
/// Composed raster output.
pub mod surface;
