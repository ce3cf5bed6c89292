//! wgpu render backend for the still-life scene.
//!
//! [`WgpuBackend`] implements the `stilllife-render` backend traits. Named
//! uniform writes are mirrored into two uniform blocks: per-frame globals
//! (camera and lights) and per-draw object state. Each `draw_mesh` snapshots
//! the object block and the texture bound to `objectTexture`; the snapshots
//! are encoded into a single pass by [`WgpuBackend::render_frame`].
//!
//! # Invariants
//! - Draws are encoded in issue order. Translucent objects rely on it.
//! - A draw whose texture is missing or destroyed samples the 1x1 white fallback.
//! - Uniform state persists across frames until overwritten.

mod gpu;
mod mirror;
mod shaders;
mod texture;

pub use gpu::{GpuError, WgpuBackend, request_device};

pub fn crate_info() -> &'static str {
    "stilllife-render-wgpu v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("wgpu"));
    }
}
