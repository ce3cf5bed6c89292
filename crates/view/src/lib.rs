//! View management: the fly camera, projection switching and the per-frame
//! `view` / `projection` / `viewPosition` uniforms.
//!
//! # Invariants
//! - Camera motion lives outside the scene. The scene never reads the camera;
//!   it only sees the uniforms pushed by [`ViewManager::prepare_scene_view`].
//! - Pitch stays within ±89 degrees.

mod camera;
mod manager;

pub use camera::Camera;
pub use manager::{
    FAR_PLANE, NEAR_PLANE, ORTHO_HALF_EXTENT, ProjectionMode, ViewManager, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};

pub fn crate_info() -> &'static str {
    "stilllife-view v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("view"));
    }
}
