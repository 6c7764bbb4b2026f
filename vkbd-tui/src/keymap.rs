use crossterm::event::KeyEvent as TermKeyEvent;
use vkbd_core::{
    action::Action,
    config::{KeysConfig, keys::Command},
    input::KeyEvent,
    layout::Direction,
    state::AppState,
};

/// Resolve a terminal key event into an Action. Keys never type into the
/// buffer; they only drive focus and the on-screen key selection.
pub fn resolve_action(key: TermKeyEvent, state: &AppState, keys: &KeysConfig) -> Option<Action> {
    let keymap = keys.keymap(state.keyboard.is_visible());
    let command = keymap.get(&KeyEvent::from(key))?;
    command_to_action(command)
}

fn command_to_action(command: &Command) -> Option<Action> {
    match command {
        Command::Noop => None,
        Command::Quit => Some(Action::Quit),
        Command::FocusNext => Some(Action::FocusNext),
        Command::FocusPrevious => Some(Action::FocusPrevious),
        Command::MoveLeft => Some(Action::MoveSelection(Direction::Left)),
        Command::MoveRight => Some(Action::MoveSelection(Direction::Right)),
        Command::MoveUp => Some(Action::MoveSelection(Direction::Up)),
        Command::MoveDown => Some(Action::MoveSelection(Direction::Down)),
        Command::PressKey => Some(Action::PressSelected),
        Command::CloseKeyboard => Some(Action::CloseKeyboard),
    }
}
