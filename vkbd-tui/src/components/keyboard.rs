use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};
use vkbd_core::{
    keyboard::{KeyElement, KeyLabel, VirtualKeyboard},
    layout::{self, KeyClass},
};

use crate::theme::Theme;

pub const KEY_HEIGHT: u16 = 3;
const KEY_WIDTH: u16 = 5;
const WIDE_KEY_WIDTH: u16 = 10;
const EXTRA_WIDE_KEY_WIDTH: u16 = 30;

pub fn key_width(key: &KeyElement) -> u16 {
    if key.classes.contains(KeyClass::EXTRA_WIDE) {
        EXTRA_WIDE_KEY_WIDTH
    } else if key.classes.contains(KeyClass::WIDE) {
        WIDE_KEY_WIDTH
    } else {
        KEY_WIDTH
    }
}

/// Rows of keys plus the surrounding border.
pub fn keyboard_height(keyboard: &VirtualKeyboard) -> u16 {
    let rows = u16::try_from(layout::rows(keyboard.layout()).len()).unwrap_or(u16::MAX);
    rows.saturating_mul(KEY_HEIGHT).saturating_add(2)
}

fn container() -> Block<'static> {
    Block::default().borders(Borders::TOP | Borders::BOTTOM)
}

/// Screen rectangle of every key that fits in `area`, as `(key index, rect)`.
/// Rows are centered; keys running past the right edge are clipped or dropped.
pub fn key_rects(area: Rect, keyboard: &VirtualKeyboard) -> Vec<(usize, Rect)> {
    let inner = container().inner(area);
    let keys = keyboard.keys();
    let mut rects = Vec::with_capacity(keys.len());

    for (row_idx, row) in layout::rows(keyboard.layout()).iter().enumerate() {
        let y_offset = u16::try_from(row_idx)
            .unwrap_or(u16::MAX)
            .saturating_mul(KEY_HEIGHT);
        let y = inner.y.saturating_add(y_offset);
        if y.saturating_add(KEY_HEIGHT) > inner.bottom() {
            break;
        }

        let row_width: u16 = row.iter().map(|&i| key_width(&keys[i])).sum();
        let mut x = inner.x + inner.width.saturating_sub(row_width) / 2;
        for &index in row {
            if x >= inner.right() {
                break;
            }
            let width = key_width(&keys[index]).min(inner.right() - x);
            rects.push((index, Rect::new(x, y, width, KEY_HEIGHT)));
            x = x.saturating_add(width);
        }
    }

    rects
}

fn label_text(key: &KeyElement) -> &str {
    match &key.label {
        KeyLabel::Text(text) => text.as_str(),
        KeyLabel::Icon(icon) => icon,
    }
}

fn key_style(key: &KeyElement, selected: bool, theme: &Theme) -> (Style, Style) {
    let mut border = Style::default().fg(theme.border);
    let mut label = Style::default();

    if key.classes.contains(KeyClass::DARK) {
        label = label.bg(theme.dark);
    }
    if key.classes.contains(KeyClass::ACTIVE) {
        border = border.fg(theme.secondary);
        label = label.fg(theme.secondary).add_modifier(Modifier::BOLD);
    }
    if selected {
        border = border.fg(theme.accent);
        label = label
            .fg(theme.highlight_fg)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD);
    }
    (border, label)
}

/// Draw the keyboard into `area`. Does nothing while the keyboard is hidden.
pub fn draw(f: &mut Frame, area: Rect, keyboard: &VirtualKeyboard, selected: usize, theme: &Theme) {
    if !keyboard.is_visible() {
        return;
    }
    f.render_widget(Clear, area);
    let title = if keyboard.caps_lock() {
        " keyboard · CAPS "
    } else {
        " keyboard "
    };
    f.render_widget(
        container()
            .title(title)
            .border_style(Style::default().fg(theme.border)),
        area,
    );

    for (index, rect) in key_rects(area, keyboard) {
        let key = &keyboard.keys()[index];
        let (border, label) = key_style(key, index == selected, theme);
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let paragraph = Paragraph::new(label_text(key))
            .style(label)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, rect);
    }
}
