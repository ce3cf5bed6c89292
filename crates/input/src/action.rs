use serde::{Deserialize, Serialize};

/// Direction of a camera translation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A high-level viewer action.
///
/// The view manager consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Translate the camera for one frame.
    Move(CameraMovement),
    /// Rotate the camera by a mouse delta in pixels.
    Look { dx: f32, dy: f32 },
    /// Change movement speed by scroll notches.
    AdjustSpeed(f32),
    /// Switch to perspective projection and reset the camera.
    UsePerspective,
    /// Switch to orthographic projection and reset the camera.
    UseOrthographic,
    ToggleInspector,
    Quit,
    /// Input with no binding.
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move(CameraMovement::Forward);
        assert!(matches!(a, Action::Move(CameraMovement::Forward)));
    }

    #[test]
    fn action_look_carries_delta() {
        let a = Action::Look { dx: 3.0, dy: -1.5 };
        assert_eq!(a, Action::Look { dx: 3.0, dy: -1.5 });
    }

    #[test]
    fn projection_actions_are_distinct() {
        assert_ne!(Action::UsePerspective, Action::UseOrthographic);
    }
}
