mod actions;

pub use actions::process_action;

use crate::{components, keymap, theme::Theme};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Position, Rect},
};
use vkbd_core::{action::Action, config::KeysConfig, state::AppState};

/// Where fields and keys were drawn in the last frame, for mouse hit testing.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    pub fields: Vec<Rect>,
    pub keys: Vec<(usize, Rect)>,
}

impl HitMap {
    /// Action for a left click at a screen cell, keys taking precedence.
    pub fn action_at(&self, column: u16, row: u16) -> Option<Action> {
        let position = Position::new(column, row);
        if let Some((index, _)) = self.keys.iter().find(|(_, r)| r.contains(position)) {
            return Some(Action::PressKey(*index));
        }
        self.fields
            .iter()
            .position(|r| r.contains(position))
            .map(Action::FocusField)
    }
}

pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    theme: &Theme,
    keys: &KeysConfig,
    marker_class: &str,
) -> anyhow::Result<()> {
    let mut hits = HitMap::default();

    loop {
        terminal.draw(|f| hits = draw(f, state, theme, keys, marker_class))?;

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                keymap::resolve_action(key, state, keys)
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                hits.action_at(mouse.column, mouse.row)
            }
            _ => None,
        };

        if let Some(action) = action {
            log::debug!("action {action:?}");
            if process_action(action, state).is_break() {
                return Ok(());
            }
        }
    }
}

pub fn draw(
    f: &mut Frame,
    state: &AppState,
    theme: &Theme,
    keys: &KeysConfig,
    marker_class: &str,
) -> HitMap {
    let layout = components::screen_layout(f.area(), &state.keyboard);

    components::field_list::draw(f, layout.fields, &state.document, marker_class, theme);
    let mut hits = HitMap {
        fields: components::field_list::field_rects(layout.fields, state.document.len()),
        keys: Vec::new(),
    };

    if let Some(area) = layout.keyboard {
        components::keyboard::draw(f, area, &state.keyboard, state.selected_key, theme);
        hits.keys = components::keyboard::key_rects(area, &state.keyboard);
    }

    components::status_bar::draw(f, layout.status, state, keys, theme);
    hits
}
