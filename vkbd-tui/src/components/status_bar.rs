use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use vkbd_core::{
    config::{KeysConfig, keys::Command},
    state::AppState,
};

use crate::theme::Theme;

const HIDDEN_HINTS: &[Command] = &[Command::FocusNext, Command::FocusPrevious, Command::Quit];
const VISIBLE_HINTS: &[Command] = &[
    Command::MoveLeft,
    Command::MoveRight,
    Command::MoveUp,
    Command::MoveDown,
    Command::PressKey,
    Command::CloseKeyboard,
    Command::FocusNext,
];

/// `(key, description)` pairs for the commands bound in the current mode.
pub fn hints(state: &AppState, keys: &KeysConfig) -> Vec<(String, &'static str)> {
    let visible = state.keyboard.is_visible();
    let keymap = keys.keymap(visible);
    let commands = if visible { VISIBLE_HINTS } else { HIDDEN_HINTS };
    commands
        .iter()
        .filter_map(|command| {
            KeysConfig::find_key(&keymap, command)
                .map(|key| (key.to_string(), command.description()))
        })
        .collect()
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, keys: &KeysConfig, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, description)) in hints(state, keys).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(theme.muted)));
        }
        spans.push(Span::styled(
            key,
            Style::default().fg(theme.hint).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {description}")));
    }
    if state.keyboard.caps_lock() {
        spans.push(Span::styled(
            "  CAPS",
            Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
