use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use vkbd_core::document::{Document, Element};

use super::text_field::{last_lines, visible_tail};
use crate::theme::Theme;

/// Two bordered rows plus three lines of text.
pub const FIELD_HEIGHT: u16 = 5;

/// Rectangles of the fields that fit in `area`, top to bottom.
pub fn field_rects(area: Rect, count: usize) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(count);
    let mut y = area.y;
    for _ in 0..count {
        if y.saturating_add(FIELD_HEIGHT) > area.bottom() {
            break;
        }
        rects.push(Rect::new(area.x, y, area.width, FIELD_HEIGHT));
        y += FIELD_HEIGHT;
    }
    rects
}

fn field_title(element: &Element, wired: bool) -> String {
    if wired {
        format!(" {} ", element.label())
    } else {
        format!(" {} (no keyboard) ", element.label())
    }
}

pub fn draw(f: &mut Frame, area: Rect, document: &Document, marker_class: &str, theme: &Theme) {
    let focused = document.focused();
    for (index, rect) in field_rects(area, document.len()).into_iter().enumerate() {
        let Some(element) = document.element(index) else {
            continue;
        };
        let is_focused = focused == Some(index);
        let wired = element.has_class(marker_class);

        let border_style = if is_focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(field_title(element, wired))
            .border_style(border_style);
        let inner = block.inner(rect);

        let value = element.value();
        let lines = last_lines(&value, usize::from(inner.height.max(1)));
        let last = lines.len().saturating_sub(1);
        let mut cursor = None;
        let rendered: Vec<Line> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let (tail, cursor_col) = visible_tail(line, inner.width);
                if i == last {
                    let row = u16::try_from(i).unwrap_or(u16::MAX);
                    cursor = Some((
                        inner.x.saturating_add(cursor_col),
                        inner.y.saturating_add(row),
                    ));
                }
                let style = if wired {
                    Style::default()
                } else {
                    Style::default().fg(theme.muted)
                };
                Line::from(Span::styled(tail.to_string(), style))
            })
            .collect();

        f.render_widget(Paragraph::new(rendered).block(block), rect);

        if is_focused
            && inner.width > 0
            && inner.height > 0
            && let Some(position) = cursor
        {
            f.set_cursor_position(position);
        }
    }
}
