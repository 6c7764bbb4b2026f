use crate::input::KeyEvent;
use crossterm::event::{KeyCode, KeyModifiers};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Commands that can be bound to keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// No-op: explicitly unbinds a key (removes inherited/default binding)
    Noop,

    // General commands
    Quit,
    FocusNext,
    FocusPrevious,

    // On-screen keyboard commands
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    PressKey,
    CloseKeyboard,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noop" | "none" | "unbound" => Ok(Command::Noop),
            "quit" => Ok(Command::Quit),
            "focus_next" => Ok(Command::FocusNext),
            "focus_previous" => Ok(Command::FocusPrevious),
            "move_left" => Ok(Command::MoveLeft),
            "move_right" => Ok(Command::MoveRight),
            "move_up" => Ok(Command::MoveUp),
            "move_down" => Ok(Command::MoveDown),
            "press_key" => Ok(Command::PressKey),
            "close_keyboard" => Ok(Command::CloseKeyboard),
            _ => Err(format!("Unknown command: {s}")),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Command::Noop => "noop",
            Command::Quit => "quit",
            Command::FocusNext => "focus_next",
            Command::FocusPrevious => "focus_previous",
            Command::MoveLeft => "move_left",
            Command::MoveRight => "move_right",
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::PressKey => "press_key",
            Command::CloseKeyboard => "close_keyboard",
        };
        write!(f, "{s}")
    }
}

impl Command {
    /// Short description for the status bar hints
    pub fn description(&self) -> &'static str {
        match self {
            Command::Noop => "unbound",
            Command::Quit => "quit",
            Command::FocusNext => "next field",
            Command::FocusPrevious => "previous field",
            Command::MoveLeft => "left",
            Command::MoveRight => "right",
            Command::MoveUp => "up",
            Command::MoveDown => "down",
            Command::PressKey => "press",
            Command::CloseKeyboard => "close keyboard",
        }
    }
}

/// Key bindings for a single layer
pub type KeyMap = HashMap<KeyEvent, Command>;

/// Key binding configuration. The `keyboard` layer applies on top of
/// `general` while the on-screen keyboard is visible.
#[derive(Debug, Clone)]
pub struct KeysConfig {
    pub general: KeyMap,
    pub keyboard: KeyMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeysConfigRaw {
    #[serde(default)]
    general: HashMap<String, String>,
    #[serde(default)]
    keyboard: HashMap<String, String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeysConfig {
    pub fn new() -> Self {
        Self {
            general: Self::default_general(),
            keyboard: Self::default_keyboard(),
        }
    }

    /// Effective keymap: general, overridden by the keyboard layer when visible.
    pub fn keymap(&self, keyboard_visible: bool) -> KeyMap {
        let mut combined = KeyMap::new();
        Self::apply_layer(&mut combined, &self.general);
        if keyboard_visible {
            Self::apply_layer(&mut combined, &self.keyboard);
        }
        combined
    }

    /// Find the key bound to a command, preferring the shortest representation.
    pub fn find_key(keymap: &KeyMap, command: &Command) -> Option<KeyEvent> {
        keymap
            .iter()
            .filter(|(_, cmd)| *cmd == command)
            .map(|(key, _)| *key)
            .min_by_key(|key| {
                let s = key.to_string();
                (s.len(), s)
            })
    }

    fn apply_layer(base: &mut KeyMap, layer: &KeyMap) {
        for (key, command) in layer {
            if *command == Command::Noop {
                base.remove(key);
            } else {
                base.insert(*key, command.clone());
            }
        }
    }

    fn default_general() -> KeyMap {
        let mut map = KeyMap::new();
        map.insert(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Command::Quit,
        );
        map.insert(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            Command::Quit,
        );
        map.insert(
            KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            Command::FocusNext,
        );
        map.insert(
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE),
            Command::FocusPrevious,
        );
        map
    }

    fn default_keyboard() -> KeyMap {
        let mut map = KeyMap::new();
        map.insert(
            KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            Command::MoveLeft,
        );
        map.insert(
            KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
            Command::MoveRight,
        );
        map.insert(
            KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            Command::MoveUp,
        );
        map.insert(
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            Command::MoveDown,
        );
        map.insert(
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            Command::PressKey,
        );
        map.insert(
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
            Command::PressKey,
        );
        map.insert(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            Command::CloseKeyboard,
        );
        map
    }

    /// Parse a string representation of keybindings into a `KeyMap`
    fn parse_keymap(raw_map: &HashMap<String, String>) -> Result<KeyMap, String> {
        let mut keymap = KeyMap::new();
        for (key_str, command_str) in raw_map {
            let key_event =
                KeyEvent::from_str(key_str).map_err(|e| format!("Invalid key '{key_str}': {e}"))?;
            let command = Command::from_str(command_str)
                .map_err(|e| format!("Invalid command '{command_str}': {e}"))?;
            keymap.insert(key_event, command);
        }
        Ok(keymap)
    }

    /// Merge user configuration with defaults.
    ///
    /// Keep `Noop` values so the keyboard layer can explicitly unbind general mappings.
    fn from_raw(raw: &KeysConfigRaw) -> Result<Self, String> {
        let mut config = Self::default();
        config.general.extend(Self::parse_keymap(&raw.general)?);
        config.keyboard.extend(Self::parse_keymap(&raw.keyboard)?);
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for KeysConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = KeysConfigRaw::deserialize(deserializer)?;
        KeysConfig::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}
