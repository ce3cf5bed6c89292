//! The still-life scene: what gets loaded and what gets drawn.
//!
//! [`SceneManager::prepare_scene`] loads textures, defines materials,
//! configures lights and uploads the base meshes. [`SceneManager::render_scene`]
//! walks the [`Tableau`] and issues one transform/surface/material/draw group
//! per object.
//!
//! # Invariants
//! - Rendering is stateless: every frame re-executes the whole tableau and
//!   nothing is carried between frames on the scene side.
//! - Backend uniforms persist between draws. An object that sets no material
//!   or UV scale draws with the values left by the previous object.
//! - No error escapes preparation or rendering. A texture that fails to load
//!   is logged and objects using its tag draw untextured.

mod lights;
mod manager;
pub mod presets;
mod tableau;

pub use lights::{DirectionalLight, LightingSetup, PointLight};
pub use manager::{PrepareReport, SceneManager, TextureFailure};
pub use tableau::{SceneObject, Tableau};

pub fn crate_info() -> &'static str {
    "stilllife-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
