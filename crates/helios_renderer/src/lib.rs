//! Helios renderer - camera and per-pixel dispatch.
//!
//! Turns a camera pose and a read-only scene into a full frame of packed
//! RGB pixels: one primary ray per pixel, direct lighting with shadow
//! queries, and a rayon parallel-for over the flat pixel range.

mod camera;
mod framebuffer;
mod renderer;

pub use camera::Camera;
pub use framebuffer::Framebuffer;
pub use renderer::{LightingMode, RenderError, Renderer};
