//! Movement key state
//!
//! Hosts forward raw key-down/key-up codes. Arrow keys and WASD are
//! recognized; anything else is ignored.

/// Movement directions, in the fixed order input is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Resolution order. When several keys are held, the facing target of the
    /// last one in this list wins.
    pub const ALL: [Key; 4] = [Key::Up, Key::Down, Key::Left, Key::Right];

    /// Map a DOM-style key or code string to a movement key
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowUp" | "w" | "W" | "KeyW" => Some(Key::Up),
            "ArrowDown" | "s" | "S" | "KeyS" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "d" | "D" | "KeyD" => Some(Key::Right),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Key::Up => 0,
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
        }
    }

    /// Unit step on the (x, z) plane. Upstream is -z.
    pub fn direction(self) -> (f32, f32) {
        match self {
            Key::Up => (0.0, -1.0),
            Key::Down => (0.0, 1.0),
            Key::Left => (-1.0, 0.0),
            Key::Right => (1.0, 0.0),
        }
    }

    /// Facing angle while this key drives the player
    pub fn facing(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Key::Up => 0.0,
            Key::Down => PI,
            Key::Left => FRAC_PI_2,
            Key::Right => -FRAC_PI_2,
        }
    }
}

/// Currently held movement keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 4],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns false for unrecognized codes.
    pub fn key_down(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.held[key.index()] = true;
                true
            }
            None => false,
        }
    }

    /// Record a key release. Returns false for unrecognized codes.
    pub fn key_up(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.held[key.index()] = false;
                true
            }
            None => false,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held[key.index()] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.held[key.index()] = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Held keys in resolution order
    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(|k| self.is_held(*k))
    }

    pub fn any_held(&self) -> bool {
        self.held.iter().any(|h| *h)
    }

    /// Release everything (session teardown, focus loss)
    pub fn clear(&mut self) {
        self.held = [false; 4];
    }
}
