//! Rendering module for pxconv.
//!
//! Turns command lists back into pixel grids for previewing.

mod png;

pub use png::{render_commands, scale_pixels, write_png};
