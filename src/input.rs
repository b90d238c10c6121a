//! Input events delivered to widgets: mouse, wheel, text input and key presses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ModifierKey>", into = "Vec<ModifierKey>")]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Get the platform-specific "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Named modifier, used for the serialized form of [`Modifiers`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Ctrl,
    Shift,
    Alt,
    Meta,
    /// The platform command modifier
    Cmd,
}

impl From<Vec<ModifierKey>> for Modifiers {
    fn from(keys: Vec<ModifierKey>) -> Self {
        keys.into_iter().fold(Modifiers::NONE, |acc, key| {
            acc | match key {
                ModifierKey::Ctrl => Modifiers::CTRL,
                ModifierKey::Shift => Modifiers::SHIFT,
                ModifierKey::Alt => Modifiers::ALT,
                ModifierKey::Meta => Modifiers::META,
                ModifierKey::Cmd => Modifiers::cmd(),
            }
        })
    }
}

impl From<Modifiers> for Vec<ModifierKey> {
    fn from(mods: Modifiers) -> Self {
        [
            (mods.ctrl(), ModifierKey::Ctrl),
            (mods.shift(), ModifierKey::Shift),
            (mods.alt(), ModifierKey::Alt),
            (mods.meta(), ModifierKey::Meta),
        ]
        .into_iter()
        .filter_map(|(held, key)| held.then_some(key))
        .collect()
    }
}

/// Keys the text widgets react to.
///
/// Serialized as a lowercase name (`"left"`, `"backspace"`) or a single
/// character (`"a"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    /// A character key (normalized to lowercase)
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Char(c) => return write!(f, "{}", c),
            Key::Enter => "enter",
            Key::Escape => "escape",
            Key::Tab => "tab",
            Key::Backspace => "backspace",
            Key::Delete => "delete",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Home => "home",
            Key::End => "end",
        };
        f.write_str(name)
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c.to_ascii_lowercase()));
        }
        match s.to_ascii_lowercase().as_str() {
            "enter" | "return" => Ok(Key::Enter),
            "escape" | "esc" => Ok(Key::Escape),
            "tab" => Ok(Key::Tab),
            "backspace" => Ok(Key::Backspace),
            "delete" | "del" => Ok(Key::Delete),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "home" => Ok(Key::Home),
            "end" => Ok(Key::End),
            "space" => Ok(Key::Char(' ')),
            _ => Err(format!("unknown key: {}", s)),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// A key press with the modifiers held at the time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDown {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyDown {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// An event handed to a widget's `capture_event`. Coordinates are window pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    MouseDown {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    MouseUp {
        x: i32,
        y: i32,
    },
    MouseMove {
        x: i32,
        y: i32,
    },
    /// Positive `dy` scrolls towards the top
    MouseWheel {
        #[serde(default)]
        dx: i32,
        dy: i32,
    },
    TextInput {
        text: String,
    },
    KeyDown(KeyDown),
}

impl InputEvent {
    pub fn click(x: i32, y: i32) -> Self {
        InputEvent::MouseDown {
            x,
            y,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown(KeyDown::plain(key))
    }

    pub fn text(text: impl Into<String>) -> Self {
        InputEvent::TextInput { text: text.into() }
    }
}

/// Clipboard and selection shortcuts resolved from key presses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Copy,
    Cut,
    Paste,
    SelectAll,
}

impl Shortcut {
    fn letter(self) -> char {
        match self {
            Shortcut::Copy => 'c',
            Shortcut::Cut => 'x',
            Shortcut::Paste => 'v',
            Shortcut::SelectAll => 'a',
        }
    }
}

/// Maps key presses to [`Shortcut`]s using a command modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShortcutMap {
    command: Modifiers,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::platform()
    }
}

impl ShortcutMap {
    /// Cmd on macOS, Ctrl elsewhere
    pub fn platform() -> Self {
        Self {
            command: Modifiers::cmd(),
        }
    }

    pub fn with_command(command: Modifiers) -> Self {
        Self { command }
    }

    pub fn command(&self) -> Modifiers {
        self.command
    }

    pub fn is_shortcut(&self, key: &KeyDown, shortcut: Shortcut) -> bool {
        key.modifiers.contains(self.command)
            && !self.command.is_empty()
            && key.key == Key::Char(shortcut.letter())
    }

    /// First shortcut matching `key`, if any
    pub fn resolve(&self, key: &KeyDown) -> Option<Shortcut> {
        [
            Shortcut::Copy,
            Shortcut::Cut,
            Shortcut::Paste,
            Shortcut::SelectAll,
        ]
        .into_iter()
        .find(|&s| self.is_shortcut(key, s))
    }
}
