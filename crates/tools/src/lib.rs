//! Developer tooling: read-only scene and view inspection.
//!
//! # Invariants
//! - Tools never mutate the scene or the camera.

mod inspector;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary, ViewSummary};

pub fn crate_info() -> &'static str {
    "stilllife-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
