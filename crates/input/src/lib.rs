//! Viewer input: raw keys and mouse motion mapped to shared actions.
//!
//! # Invariants
//! - Consumers see [`Action`]s, never platform events. The desktop app
//!   translates window-system key codes into [`Key`] before calling in.
//! - Movement is continuous while a key is held; mode switches fire once
//!   per press.

pub mod action;
mod bindings;

pub use action::{Action, CameraMovement};
pub use bindings::{InputState, Key};

pub fn crate_info() -> &'static str {
    "stilllife-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
