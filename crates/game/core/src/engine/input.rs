//! Keyboard input as the engine sees it.

use std::str::FromStr;

use crate::mode::Hotkey;
use crate::state::Direction;
use crate::world::HeldKeys;

/// A key the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    Move(Direction),
    Hotkey(Hotkey),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unbound key '{0}'")]
pub struct UnboundKey(pub String);

impl FromStr for InputKey {
    type Err = UnboundKey;

    /// Parses DOM-style key names (`ArrowUp`, `w`, `Escape`, ...).
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let bound = match key.to_ascii_lowercase().as_str() {
            "arrowup" | "w" => Self::Move(Direction::Up),
            "arrowdown" | "s" => Self::Move(Direction::Down),
            "arrowleft" | "a" => Self::Move(Direction::Left),
            "arrowright" | "d" => Self::Move(Direction::Right),
            "e" | "enter" | " " => Self::Hotkey(Hotkey::Interact),
            "i" => Self::Hotkey(Hotkey::Inventory),
            "g" => Self::Hotkey(Hotkey::Equipment),
            "c" => Self::Hotkey(Hotkey::Character),
            "q" | "j" => Self::Hotkey(Hotkey::Quests),
            "m" => Self::Hotkey(Hotkey::Map),
            "escape" | "esc" => Self::Hotkey(Hotkey::Escape),
            "`" | "f1" => Self::Hotkey(Hotkey::DevToggle),
            _ => return Err(UnboundKey(key.to_owned())),
        };
        Ok(bound)
    }
}

/// Held movement keys and keyboard focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub held: HeldKeys,
    pub text_focus: bool,
}

impl InputState {
    pub fn press(&mut self, direction: Direction) {
        self.held.insert(HeldKeys::from_direction(direction));
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.remove(HeldKeys::from_direction(direction));
    }

    pub fn release_all(&mut self) {
        self.held = HeldKeys::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_wasd_keys_map_to_directions() {
        assert_eq!("ArrowLeft".parse(), Ok(InputKey::Move(Direction::Left)));
        assert_eq!("W".parse(), Ok(InputKey::Move(Direction::Up)));
        assert_eq!("Escape".parse(), Ok(InputKey::Hotkey(Hotkey::Escape)));
        assert_eq!(
            "F13".parse::<InputKey>(),
            Err(UnboundKey("F13".to_owned()))
        );
    }

    #[test]
    fn held_keys_track_press_and_release() {
        let mut input = InputState::default();
        input.press(Direction::Up);
        input.press(Direction::Right);
        input.release(Direction::Up);
        assert_eq!(input.held, HeldKeys::RIGHT);
        input.release_all();
        assert!(!input.held.is_moving());
    }
}
