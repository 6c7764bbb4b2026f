use std::ops::ControlFlow;
use vkbd_core::{action::Action, layout, state::AppState};

/// Apply one action to the state. `Break` ends the event loop.
pub fn process_action(action: Action, state: &mut AppState) -> ControlFlow<()> {
    match action {
        Action::Quit => return ControlFlow::Break(()),
        Action::FocusNext => handle_focus_relative(state, true),
        Action::FocusPrevious => handle_focus_relative(state, false),
        Action::FocusField(index) => state.document.focus(index, &mut state.keyboard),
        Action::MoveSelection(direction) => {
            state.selected_key =
                layout::neighbor(state.keyboard.layout(), state.selected_key, direction);
        }
        Action::PressSelected => {
            let index = state.selected_key;
            handle_press(state, index);
        }
        Action::PressKey(index) => {
            state.selected_key = index;
            handle_press(state, index);
        }
        Action::CloseKeyboard => {
            state.keyboard.close();
            state.document.blur();
        }
    }
    ControlFlow::Continue(())
}

fn handle_focus_relative(state: &mut AppState, forward: bool) {
    let len = state.document.len();
    if len == 0 {
        return;
    }
    let next = match (state.document.focused(), forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(current), true) => (current + 1) % len,
        (Some(current), false) => (current + len - 1) % len,
    };
    state.document.focus(next, &mut state.keyboard);
}

fn handle_press(state: &mut AppState, index: usize) {
    state.keyboard.press(index);
    // done hides the keyboard; the field it was typing into loses focus with it
    if !state.keyboard.is_visible() {
        state.document.blur();
    }
}
