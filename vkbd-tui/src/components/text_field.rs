use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The end of `line` that fits in `max_width` columns while leaving one column
/// free for the cursor, plus the cursor column after it.
pub fn visible_tail(line: &str, max_width: u16) -> (&str, u16) {
    let budget = usize::from(max_width).saturating_sub(1);
    let mut width = 0;
    let mut start = line.len();
    for (idx, grapheme) in line.grapheme_indices(true).rev() {
        let g_width = grapheme.width();
        if width + g_width > budget {
            break;
        }
        width += g_width;
        start = idx;
    }
    let cursor_col = u16::try_from(width).unwrap_or(u16::MAX);
    (&line[start..], cursor_col)
}

/// The last `max_lines` lines of `text`. A trailing newline starts a fresh
/// empty line, as it does in a text area.
pub fn last_lines(text: &str, max_lines: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.split('\n').collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].to_vec()
}
