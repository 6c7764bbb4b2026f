use ratatui::layout::{Constraint, Layout, Rect};
use vkbd_core::keyboard::VirtualKeyboard;

pub mod field_list;
pub mod keyboard;
pub mod status_bar;
pub mod text_field;

/// Areas the screen is split into for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub fields: Rect,
    /// Present only while the keyboard is visible.
    pub keyboard: Option<Rect>,
    pub status: Rect,
}

/// Fields fill the top, the keyboard takes a full-width block at the bottom
/// above a one-line status bar.
pub fn screen_layout(area: Rect, keyboard: &VirtualKeyboard) -> ScreenLayout {
    if keyboard.is_visible() {
        let height = keyboard::keyboard_height(keyboard);
        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Length(1),
        ])
        .split(area);
        ScreenLayout {
            fields: chunks[0],
            keyboard: Some(chunks[1]),
            status: chunks[2],
        }
    } else {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        ScreenLayout {
            fields: chunks[0],
            keyboard: None,
            status: chunks[1],
        }
    }
}
