use crate::action::{Action, CameraMovement};
use std::collections::BTreeSet;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    P,
    O,
    Escape,
    F1,
}

impl Key {
    fn movement(self) -> Option<CameraMovement> {
        match self {
            Key::W => Some(CameraMovement::Forward),
            Key::S => Some(CameraMovement::Backward),
            Key::A => Some(CameraMovement::Left),
            Key::D => Some(CameraMovement::Right),
            Key::Q => Some(CameraMovement::Down),
            Key::E => Some(CameraMovement::Up),
            _ => None,
        }
    }

    fn one_shot(self) -> Action {
        match self {
            Key::P => Action::UsePerspective,
            Key::O => Action::UseOrthographic,
            Key::Escape => Action::Quit,
            Key::F1 => Action::ToggleInspector,
            _ => Action::Noop,
        }
    }
}

/// Held-key tracking and per-frame action collection.
#[derive(Debug, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns the action a fresh press triggers.
    pub fn key(&mut self, key: Key, pressed: bool) -> Action {
        if !pressed {
            self.held.remove(&key);
            return Action::Noop;
        }
        let fresh = self.held.insert(key);
        if !fresh {
            return Action::Noop;
        }
        let action = key.one_shot();
        if action != Action::Noop {
            tracing::debug!("{key:?} -> {action:?}");
        }
        action
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Movement actions for every held movement key, in a stable order.
    pub fn movement_actions(&self) -> Vec<Action> {
        self.held
            .iter()
            .filter_map(|k| k.movement())
            .map(Action::Move)
            .collect()
    }

    /// Forget held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn look(dx: f64, dy: f64) -> Action {
        Action::Look {
            dx: dx as f32,
            dy: dy as f32,
        }
    }

    pub fn scroll(notches: f32) -> Action {
        if notches == 0.0 {
            Action::Noop
        } else {
            Action::AdjustSpeed(notches)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_move_every_frame() {
        let mut input = InputState::new();
        assert_eq!(input.key(Key::W, true), Action::Noop);
        assert_eq!(input.key(Key::E, true), Action::Noop);
        let moves = input.movement_actions();
        assert_eq!(
            moves,
            vec![
                Action::Move(CameraMovement::Forward),
                Action::Move(CameraMovement::Up)
            ]
        );
        assert_eq!(input.movement_actions(), moves);

        input.key(Key::W, false);
        assert_eq!(input.movement_actions(), vec![Action::Move(CameraMovement::Up)]);
    }

    #[test]
    fn mode_switch_fires_once_per_press() {
        let mut input = InputState::new();
        assert_eq!(input.key(Key::O, true), Action::UseOrthographic);
        assert_eq!(input.key(Key::O, true), Action::Noop);
        input.key(Key::O, false);
        assert_eq!(input.key(Key::P, true), Action::UsePerspective);
        assert_eq!(input.key(Key::Escape, true), Action::Quit);
    }

    #[test]
    fn q_moves_down() {
        let mut input = InputState::new();
        input.key(Key::Q, true);
        assert!(input.is_held(Key::Q));
        assert_eq!(
            input.movement_actions(),
            vec![Action::Move(CameraMovement::Down)]
        );
        input.clear();
        assert!(input.movement_actions().is_empty());
    }

    #[test]
    fn scroll_and_look() {
        assert_eq!(InputState::scroll(0.0), Action::Noop);
        assert_eq!(InputState::scroll(-1.0), Action::AdjustSpeed(-1.0));
        assert_eq!(InputState::look(2.0, -4.0), Action::Look { dx: 2.0, dy: -4.0 });
    }
}
