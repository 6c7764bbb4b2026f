use bitflags::bitflags;
use serde::Serialize;

/// What pressing a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    Character,
    Backspace,
    CapsLock,
    Enter,
    Space,
    Done,
}

impl KeyRole {
    /// Glyph drawn instead of a text label. Character keys have none.
    pub const fn icon(self) -> Option<&'static str> {
        match self {
            Self::Character => None,
            Self::Backspace => Some("⌫"),
            Self::CapsLock => Some("⇪"),
            Self::Enter => Some("⏎"),
            Self::Space => Some("␣"),
            Self::Done => Some("✔"),
        }
    }

    /// Presentation classes a freshly rendered key of this role carries.
    pub const fn classes(self) -> KeyClass {
        match self {
            Self::Character => KeyClass::empty(),
            Self::Backspace | Self::Enter => KeyClass::WIDE,
            Self::CapsLock => KeyClass::WIDE.union(KeyClass::ACTIVATABLE),
            Self::Space => KeyClass::EXTRA_WIDE,
            Self::Done => KeyClass::WIDE.union(KeyClass::DARK),
        }
    }
}

bitflags! {
    /// Presentation classes of a single rendered key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyClass: u8 {
        const WIDE = 1;
        const EXTRA_WIDE = 1 << 1;
        const ACTIVATABLE = 1 << 2;
        const ACTIVE = 1 << 3;
        const DARK = 1 << 4;
    }
}

/// Static definition of one renderable key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    pub symbol: &'static str,
    pub role: KeyRole,
}

impl KeyDescriptor {
    pub const fn new(symbol: &'static str, role: KeyRole) -> Self {
        Self { symbol, role }
    }

    pub const fn character(symbol: &'static str) -> Self {
        Self::new(symbol, KeyRole::Character)
    }

    /// Whether the keyboard wraps to a new row after this key.
    pub fn breaks_row(&self) -> bool {
        ROW_BREAK_AFTER.contains(&self.symbol)
    }
}

/// Symbols after which the layout wraps to the next row.
pub const ROW_BREAK_AFTER: &[&str] = &["backspace", "p", "enter", "?"];

pub const DEFAULT_LAYOUT: &[KeyDescriptor] = &[
    KeyDescriptor::character("1"),
    KeyDescriptor::character("2"),
    KeyDescriptor::character("3"),
    KeyDescriptor::character("4"),
    KeyDescriptor::character("5"),
    KeyDescriptor::character("6"),
    KeyDescriptor::character("7"),
    KeyDescriptor::character("8"),
    KeyDescriptor::character("9"),
    KeyDescriptor::character("0"),
    KeyDescriptor::new("backspace", KeyRole::Backspace),
    KeyDescriptor::character("q"),
    KeyDescriptor::character("w"),
    KeyDescriptor::character("e"),
    KeyDescriptor::character("r"),
    KeyDescriptor::character("t"),
    KeyDescriptor::character("y"),
    KeyDescriptor::character("u"),
    KeyDescriptor::character("i"),
    KeyDescriptor::character("o"),
    KeyDescriptor::character("p"),
    KeyDescriptor::new("caps", KeyRole::CapsLock),
    KeyDescriptor::character("a"),
    KeyDescriptor::character("s"),
    KeyDescriptor::character("d"),
    KeyDescriptor::character("f"),
    KeyDescriptor::character("g"),
    KeyDescriptor::character("h"),
    KeyDescriptor::character("j"),
    KeyDescriptor::character("k"),
    KeyDescriptor::character("l"),
    KeyDescriptor::new("enter", KeyRole::Enter),
    KeyDescriptor::new("done", KeyRole::Done),
    KeyDescriptor::character("z"),
    KeyDescriptor::character("x"),
    KeyDescriptor::character("c"),
    KeyDescriptor::character("v"),
    KeyDescriptor::character("b"),
    KeyDescriptor::character("n"),
    KeyDescriptor::character("m"),
    KeyDescriptor::character(","),
    KeyDescriptor::character("."),
    KeyDescriptor::character("?"),
    KeyDescriptor::new("space", KeyRole::Space),
];

/// Split a layout into rows of key indices at the row-break keys.
pub fn rows(layout: &[KeyDescriptor]) -> Vec<Vec<usize>> {
    let mut rows = Vec::new();
    let mut current = Vec::new();
    for (index, key) in layout.iter().enumerate() {
        current.push(index);
        if key.breaks_row() {
            rows.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Locate a key index as `(row, column)`.
pub fn position_of(rows: &[Vec<usize>], index: usize) -> Option<(usize, usize)> {
    rows.iter().enumerate().find_map(|(row_idx, row)| {
        row.iter()
            .position(|&key| key == index)
            .map(|col| (row_idx, col))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Key index reached by moving the selection one step from `index`.
///
/// Left/right walk the flat order and stop at either end. Up/down keep the
/// column, clamped to the length of the target row.
pub fn neighbor(layout: &[KeyDescriptor], index: usize, direction: Direction) -> usize {
    if layout.is_empty() {
        return 0;
    }
    let index = index.min(layout.len() - 1);
    match direction {
        Direction::Left => index.saturating_sub(1),
        Direction::Right => (index + 1).min(layout.len() - 1),
        Direction::Up | Direction::Down => {
            let rows = rows(layout);
            let Some((row, col)) = position_of(&rows, index) else {
                return index;
            };
            let target = if direction == Direction::Up {
                row.checked_sub(1)
            } else {
                Some(row + 1).filter(|&r| r < rows.len())
            };
            match target.and_then(|r| rows.get(r)) {
                Some(target_row) => target_row[col.min(target_row.len() - 1)],
                None => index,
            }
        }
    }
}

/// Serializable view of one key for layout listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyListing {
    pub symbol: &'static str,
    pub role: KeyRole,
    pub row: usize,
}

pub fn listing(layout: &[KeyDescriptor]) -> Vec<KeyListing> {
    rows(layout)
        .into_iter()
        .enumerate()
        .flat_map(|(row, indices)| {
            indices.into_iter().map(move |index| KeyListing {
                symbol: layout[index].symbol,
                role: layout[index].role,
                row,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(row: &[usize]) -> Vec<&'static str> {
        row.iter().map(|&i| DEFAULT_LAYOUT[i].symbol).collect()
    }

    #[test]
    fn test_default_layout_has_44_keys() {
        assert_eq!(DEFAULT_LAYOUT.len(), 44);
    }

    #[test]
    fn test_rows_break_after_marker_keys() {
        let rows = rows(DEFAULT_LAYOUT);
        assert_eq!(rows.len(), 5);
        assert_eq!(symbols(&rows[0]).last(), Some(&"backspace"));
        assert_eq!(symbols(&rows[1]).last(), Some(&"p"));
        assert_eq!(symbols(&rows[2]).first(), Some(&"caps"));
        assert_eq!(symbols(&rows[2]).last(), Some(&"enter"));
        assert_eq!(symbols(&rows[3]).first(), Some(&"done"));
        assert_eq!(symbols(&rows[3]).last(), Some(&"?"));
        assert_eq!(symbols(&rows[4]), vec!["space"]);
    }

    #[test]
    fn test_rows_cover_every_key_once_in_order() {
        let flat: Vec<usize> = rows(DEFAULT_LAYOUT).into_iter().flatten().collect();
        assert_eq!(flat, (0..DEFAULT_LAYOUT.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_special_roles() {
        let role = |symbol: &str| {
            DEFAULT_LAYOUT
                .iter()
                .find(|k| k.symbol == symbol)
                .map(|k| k.role)
        };
        assert_eq!(role("backspace"), Some(KeyRole::Backspace));
        assert_eq!(role("caps"), Some(KeyRole::CapsLock));
        assert_eq!(role("enter"), Some(KeyRole::Enter));
        assert_eq!(role("space"), Some(KeyRole::Space));
        assert_eq!(role("done"), Some(KeyRole::Done));
        assert_eq!(role("?"), Some(KeyRole::Character));
    }

    #[test]
    fn test_role_classes() {
        assert!(KeyRole::Character.classes().is_empty());
        assert_eq!(KeyRole::Backspace.classes(), KeyClass::WIDE);
        assert!(KeyRole::CapsLock.classes().contains(KeyClass::ACTIVATABLE));
        assert!(KeyRole::Done.classes().contains(KeyClass::DARK));
        assert_eq!(KeyRole::Space.classes(), KeyClass::EXTRA_WIDE);
        assert!(KeyRole::Character.icon().is_none());
        assert!(KeyRole::Done.icon().is_some());
    }

    #[test]
    fn test_neighbor_left_right_clamps() {
        assert_eq!(neighbor(DEFAULT_LAYOUT, 0, Direction::Left), 0);
        assert_eq!(neighbor(DEFAULT_LAYOUT, 0, Direction::Right), 1);
        let last = DEFAULT_LAYOUT.len() - 1;
        assert_eq!(neighbor(DEFAULT_LAYOUT, last, Direction::Right), last);
    }

    #[test]
    fn test_neighbor_up_down_keeps_column() {
        // "1" is column 0 of row 0, "q" is column 0 of row 1
        assert_eq!(neighbor(DEFAULT_LAYOUT, 0, Direction::Down), 11);
        assert_eq!(neighbor(DEFAULT_LAYOUT, 11, Direction::Up), 0);
        assert_eq!(neighbor(DEFAULT_LAYOUT, 0, Direction::Up), 0);
    }

    #[test]
    fn test_neighbor_down_clamps_to_shorter_row() {
        // "?" sits at column 10 of row 3; the space row has a single key
        let question = DEFAULT_LAYOUT.iter().position(|k| k.symbol == "?").unwrap();
        let space = DEFAULT_LAYOUT.len() - 1;
        assert_eq!(neighbor(DEFAULT_LAYOUT, question, Direction::Down), space);
        assert_eq!(neighbor(DEFAULT_LAYOUT, space, Direction::Down), space);
    }

    #[test]
    fn test_listing_assigns_rows() {
        let listing = listing(DEFAULT_LAYOUT);
        assert_eq!(listing.len(), DEFAULT_LAYOUT.len());
        assert_eq!(listing[0].row, 0);
        assert_eq!(listing.last().map(|k| k.row), Some(4));
        let json = serde_json::to_string(&listing[10]).unwrap();
        assert_eq!(json, r#"{"symbol":"backspace","role":"backspace","row":0}"#);
    }
}
