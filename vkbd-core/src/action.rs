use crate::layout::Direction;

/// Every user interaction produces an Action. The UI never mutates the
/// keyboard or document directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    // Field focus
    FocusNext,
    FocusPrevious,
    FocusField(usize),

    // Keyboard
    MoveSelection(Direction),
    PressSelected,
    PressKey(usize),
    CloseKeyboard,
}
