//! The virtual keyboard widget.
//!
//! A single [`VirtualKeyboard`] owns the rendered key tree, the text buffer and
//! the caps-lock flag, and is shared by every host field that opts in via the
//! marker class. Hosts drive it through [`VirtualKeyboard::open`],
//! [`VirtualKeyboard::close`] and [`VirtualKeyboard::press`].

use bitflags::bitflags;
use std::{cell::RefCell, rc::Rc};

use crate::document::Document;
use crate::layout::{DEFAULT_LAYOUT, KeyClass, KeyDescriptor, KeyRole};

/// Host-supplied handler receiving the current buffer contents.
pub type Callback = Box<dyn FnMut(&str)>;

bitflags! {
    /// Classes on the keyboard's root container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RootClass: u8 {
        const KEYBOARD = 1;
        const HIDDEN = 1 << 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLabel {
    Text(String),
    Icon(&'static str),
}

/// One rendered key.
#[derive(Debug, Clone)]
pub struct KeyElement {
    pub descriptor: KeyDescriptor,
    pub label: KeyLabel,
    pub classes: KeyClass,
    pub line_break_after: bool,
}

impl KeyElement {
    fn render(descriptor: KeyDescriptor) -> Self {
        let label = match descriptor.role.icon() {
            Some(icon) => KeyLabel::Icon(icon),
            None => KeyLabel::Text(descriptor.symbol.to_lowercase()),
        };
        Self {
            descriptor,
            label,
            classes: descriptor.role.classes(),
            line_break_after: descriptor.breaks_row(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub buffer: String,
    pub caps_lock: bool,
    pub visible: bool,
}

#[derive(Default)]
pub struct CallbackSlots {
    pub on_input: Option<Callback>,
    pub on_close: Option<Callback>,
}

impl std::fmt::Debug for CallbackSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSlots")
            .field("on_input", &self.on_input.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    Input,
    Close,
}

#[derive(Debug)]
pub struct VirtualKeyboard {
    layout: &'static [KeyDescriptor],
    keys: Vec<KeyElement>,
    state: KeyboardState,
    callbacks: CallbackSlots,
}

impl VirtualKeyboard {
    /// Build the key tree, mount it into `document`, and wire every element
    /// carrying `marker_class` so that focusing it opens the keyboard.
    ///
    /// Call once per document: a second call mounts a second tree and adds a
    /// second listener to each marked element.
    pub fn initialize(document: &mut Document, marker_class: &str) -> Self {
        let keyboard = Self::detached();
        document.mount_keyboard();

        let mut wired = 0;
        for element in document.elements_with_class_mut(marker_class) {
            let target = element.value_handle();
            element.add_focus_listener(Box::new(move |keyboard: &mut VirtualKeyboard| {
                let current = target.borrow().clone();
                keyboard.open(Some(&current), Some(write_back(&target)), None);
            }));
            wired += 1;
        }
        log::info!("keyboard mounted, {wired} field(s) wired via .{marker_class}");

        keyboard
    }

    /// A keyboard with its key tree built but not attached to any document.
    pub fn detached() -> Self {
        Self {
            layout: DEFAULT_LAYOUT,
            keys: DEFAULT_LAYOUT.iter().copied().map(KeyElement::render).collect(),
            state: KeyboardState::default(),
            callbacks: CallbackSlots::default(),
        }
    }

    pub fn open(
        &mut self,
        initial_value: Option<&str>,
        on_input: Option<Callback>,
        on_close: Option<Callback>,
    ) {
        self.state.buffer = initial_value.unwrap_or_default().to_string();
        self.callbacks = CallbackSlots { on_input, on_close };
        self.state.visible = true;
        log::debug!("keyboard opened with {} chars", self.state.buffer.len());
    }

    /// Hide the keyboard and reset the buffer. Installed callbacks are dropped
    /// so a later press cannot reach a field that is no longer focused.
    pub fn close(&mut self) {
        self.state.buffer.clear();
        self.callbacks = CallbackSlots::default();
        self.state.visible = false;
        log::debug!("keyboard closed");
    }

    /// Press the key at `index` in the layout. Ignored while hidden.
    pub fn press(&mut self, index: usize) {
        if !self.state.visible {
            log::trace!("press on hidden keyboard ignored");
            return;
        }
        let Some(key) = self.keys.get(index) else {
            return;
        };
        let descriptor = key.descriptor;
        log::debug!("press {:?} {:?}", descriptor.role, descriptor.symbol);

        match descriptor.role {
            KeyRole::Character => {
                if self.state.caps_lock {
                    self.state.buffer.push_str(&descriptor.symbol.to_uppercase());
                } else {
                    self.state.buffer.push_str(&descriptor.symbol.to_lowercase());
                }
                self.trigger_event(KeyboardEvent::Input);
            }
            KeyRole::Backspace => {
                self.state.buffer.pop();
                self.trigger_event(KeyboardEvent::Input);
            }
            KeyRole::Enter => {
                self.state.buffer.push('\n');
                self.trigger_event(KeyboardEvent::Input);
            }
            KeyRole::Space => {
                self.state.buffer.push(' ');
                self.trigger_event(KeyboardEvent::Input);
            }
            KeyRole::CapsLock => {
                self.toggle_caps_lock();
                let active = self.state.caps_lock;
                self.keys[index].classes.set(KeyClass::ACTIVE, active);
            }
            KeyRole::Done => {
                let value = std::mem::take(&mut self.state.buffer);
                let mut callbacks = std::mem::take(&mut self.callbacks);
                self.close();
                Self::dispatch(&mut callbacks, KeyboardEvent::Close, &value);
            }
        }
    }

    /// Press the first key whose symbol matches. Returns whether one was found.
    pub fn press_symbol(&mut self, symbol: &str) -> bool {
        match self.index_of(symbol) {
            Some(index) => {
                self.press(index);
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.descriptor.symbol == symbol)
    }

    fn trigger_event(&mut self, event: KeyboardEvent) {
        Self::dispatch(&mut self.callbacks, event, &self.state.buffer);
    }

    fn dispatch(callbacks: &mut CallbackSlots, event: KeyboardEvent, value: &str) {
        let slot = match event {
            KeyboardEvent::Input => &mut callbacks.on_input,
            KeyboardEvent::Close => &mut callbacks.on_close,
        };
        match slot {
            Some(callback) => callback(value),
            None => log::trace!("no {event:?} handler installed"),
        }
    }

    fn toggle_caps_lock(&mut self) {
        self.state.caps_lock = !self.state.caps_lock;
        let caps = self.state.caps_lock;
        for key in &mut self.keys {
            if let KeyLabel::Text(text) = &mut key.label {
                *text = if caps {
                    text.to_uppercase()
                } else {
                    text.to_lowercase()
                };
            }
        }
    }

    pub fn layout(&self) -> &'static [KeyDescriptor] {
        self.layout
    }

    pub fn keys(&self) -> &[KeyElement] {
        &self.keys
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn caps_lock(&self) -> bool {
        self.state.caps_lock
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn root_classes(&self) -> RootClass {
        if self.state.visible {
            RootClass::KEYBOARD
        } else {
            RootClass::KEYBOARD | RootClass::HIDDEN
        }
    }
}

fn write_back(target: &Rc<RefCell<String>>) -> Callback {
    let target = Rc::clone(target);
    Box::new(move |value: &str| {
        value.clone_into(&mut target.borrow_mut());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    type Calls = Rc<RefCell<Vec<String>>>;

    fn recorder() -> (Calls, Callback) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (
            calls,
            Box::new(move |value: &str| sink.borrow_mut().push(value.to_string())),
        )
    }

    fn open_recording(keyboard: &mut VirtualKeyboard, initial: &str) -> (Calls, Calls) {
        let (inputs, on_input) = recorder();
        let (closes, on_close) = recorder();
        keyboard.open(Some(initial), Some(on_input), Some(on_close));
        (inputs, closes)
    }

    fn text_labels(keyboard: &VirtualKeyboard) -> Vec<String> {
        keyboard
            .keys()
            .iter()
            .filter_map(|k| match &k.label {
                KeyLabel::Text(t) => Some(t.clone()),
                KeyLabel::Icon(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_starts_hidden_and_empty() {
        let keyboard = VirtualKeyboard::detached();
        assert!(!keyboard.is_visible());
        assert!(keyboard.root_classes().contains(RootClass::HIDDEN));
        assert_eq!(keyboard.buffer(), "");
        assert!(!keyboard.caps_lock());
        assert_eq!(keyboard.keys().len(), DEFAULT_LAYOUT.len());
    }

    #[test]
    fn test_rendered_labels() {
        let keyboard = VirtualKeyboard::detached();
        let q = &keyboard.keys()[keyboard.index_of("q").unwrap()];
        assert_eq!(q.label, KeyLabel::Text("q".to_string()));
        let done = &keyboard.keys()[keyboard.index_of("done").unwrap()];
        assert!(matches!(done.label, KeyLabel::Icon(_)));
        assert!(done.classes.contains(KeyClass::DARK));
        let breaks: Vec<_> = keyboard
            .keys()
            .iter()
            .filter(|k| k.line_break_after)
            .map(|k| k.descriptor.symbol)
            .collect();
        assert_eq!(breaks, vec!["backspace", "p", "enter", "?"]);
    }

    #[test]
    fn test_open_sets_buffer_and_shows() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(Some("abc"), None, None);
        assert!(keyboard.is_visible());
        assert_eq!(keyboard.root_classes(), RootClass::KEYBOARD);
        assert_eq!(keyboard.buffer(), "abc");
    }

    #[test]
    fn test_open_without_initial_value_is_empty() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(Some("old"), None, None);
        keyboard.open(None, None, None);
        assert!(keyboard.is_visible());
        assert_eq!(keyboard.buffer(), "");
    }

    #[test]
    fn test_characters_follow_caps_at_press_time() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, _) = open_recording(&mut keyboard, "");
        for symbol in ["a", "b", "caps", "c", "d", "caps", "e"] {
            assert!(keyboard.press_symbol(symbol));
        }
        assert_eq!(keyboard.buffer(), "abCDe");
        assert_eq!(
            *inputs.borrow(),
            vec!["a", "ab", "abC", "abCD", "abCDe"],
            "caps toggles must not fire on_input"
        );
    }

    #[test]
    fn test_backspace_on_empty_buffer() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, _) = open_recording(&mut keyboard, "");
        keyboard.press_symbol("backspace");
        assert_eq!(keyboard.buffer(), "");
        assert_eq!(*inputs.borrow(), vec![""]);
    }

    #[test]
    fn test_backspace_removes_one_char() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(Some("héé"), None, None);
        keyboard.press_symbol("backspace");
        assert_eq!(keyboard.buffer(), "hé");
    }

    #[test]
    fn test_space_then_enter() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, _) = open_recording(&mut keyboard, "");
        keyboard.press_symbol("space");
        keyboard.press_symbol("enter");
        assert_eq!(keyboard.buffer(), " \n");
        assert_eq!(*inputs.borrow(), vec![" ", " \n"]);
    }

    #[test]
    fn test_caps_twice_restores_labels() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(None, None, None);
        let original = text_labels(&keyboard);

        keyboard.press_symbol("caps");
        assert!(keyboard.caps_lock());
        let caps_key = &keyboard.keys()[keyboard.index_of("caps").unwrap()];
        assert!(caps_key.classes.contains(KeyClass::ACTIVE));
        let upper = text_labels(&keyboard);
        assert!(upper.contains(&"Q".to_string()));
        assert!(upper.contains(&"?".to_string()));

        keyboard.press_symbol("caps");
        assert!(!keyboard.caps_lock());
        let caps_key = &keyboard.keys()[keyboard.index_of("caps").unwrap()];
        assert!(!caps_key.classes.contains(KeyClass::ACTIVE));
        assert_eq!(text_labels(&keyboard), original);
    }

    #[test]
    fn test_caps_does_not_touch_icon_labels() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(None, None, None);
        let icons_before: Vec<_> = keyboard.keys().iter().map(|k| k.label.clone()).collect();
        keyboard.press_symbol("caps");
        for (before, after) in icons_before.iter().zip(keyboard.keys()) {
            if let KeyLabel::Icon(_) = before {
                assert_eq!(before, &after.label);
            }
        }
    }

    #[test]
    fn test_done_reports_buffer_and_hides() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, closes) = open_recording(&mut keyboard, "abc");
        keyboard.press_symbol("done");
        assert_eq!(*closes.borrow(), vec!["abc"]);
        assert!(inputs.borrow().is_empty());
        assert!(!keyboard.is_visible());
        assert_eq!(keyboard.buffer(), "");
    }

    #[test]
    fn test_close_resets_buffer() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(Some("something typed"), None, None);
        keyboard.close();
        assert_eq!(keyboard.buffer(), "");
        assert!(!keyboard.is_visible());
        keyboard.close();
        assert_eq!(keyboard.buffer(), "");
        assert!(!keyboard.is_visible());
    }

    #[test]
    fn test_close_drops_callbacks() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, closes) = open_recording(&mut keyboard, "");
        keyboard.close();
        keyboard.open(None, None, None);
        keyboard.press_symbol("a");
        keyboard.press_symbol("done");
        assert!(inputs.borrow().is_empty());
        assert!(closes.borrow().is_empty());
    }

    #[test]
    fn test_missing_callbacks_are_noops() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(Some("x"), None, None);
        keyboard.press_symbol("y");
        keyboard.press_symbol("done");
        assert!(!keyboard.is_visible());
    }

    #[test]
    fn test_press_while_hidden_is_ignored() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.press_symbol("a");
        keyboard.press_symbol("caps");
        assert_eq!(keyboard.buffer(), "");
        assert!(!keyboard.caps_lock());
    }

    #[test]
    fn test_reopen_replaces_callbacks() {
        let mut keyboard = VirtualKeyboard::detached();
        let (first, _) = open_recording(&mut keyboard, "");
        let (second, _) = open_recording(&mut keyboard, "z");
        keyboard.press_symbol("a");
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec!["za"]);
    }

    #[test]
    fn test_press_symbol_unknown() {
        let mut keyboard = VirtualKeyboard::detached();
        keyboard.open(None, None, None);
        assert!(!keyboard.press_symbol("F1"));
        keyboard.press(999);
        assert_eq!(keyboard.buffer(), "");
    }

    #[test]
    fn test_typing_scenario() {
        let mut keyboard = VirtualKeyboard::detached();
        let (inputs, closes) = open_recording(&mut keyboard, "");

        keyboard.press_symbol("h");
        assert_eq!(keyboard.buffer(), "h");
        assert_eq!(inputs.borrow().last().map(String::as_str), Some("h"));

        keyboard.press_symbol("caps");
        keyboard.press_symbol("i");
        assert_eq!(keyboard.buffer(), "hI");

        keyboard.press_symbol("backspace");
        assert_eq!(keyboard.buffer(), "h");

        keyboard.press_symbol("done");
        assert_eq!(*closes.borrow(), vec!["h"]);
        assert!(!keyboard.is_visible());
    }

    #[test]
    fn test_initialize_wires_marked_fields_only() {
        let mut document = Document::new();
        let marked = document.add_element(
            Element::new("name", "Name")
                .with_class("use-keyboard-input")
                .with_value("Jo"),
        );
        let plain = document.add_element(Element::new("plain", "Plain").with_value("x"));
        let mut keyboard = VirtualKeyboard::initialize(&mut document, "use-keyboard-input");
        assert_eq!(document.mounted_keyboards(), 1);

        document.focus(plain, &mut keyboard);
        assert!(!keyboard.is_visible());

        document.focus(marked, &mut keyboard);
        assert!(keyboard.is_visible());
        assert_eq!(keyboard.buffer(), "Jo");

        keyboard.press_symbol("e");
        assert_eq!(document.element(marked).unwrap().value(), "Joe");
        keyboard.press_symbol("done");
        assert_eq!(document.element(marked).unwrap().value(), "Joe");
        assert_eq!(document.element(plain).unwrap().value(), "x");
    }

    #[test]
    fn test_elements_added_after_initialize_are_not_wired() {
        let mut document = Document::new();
        let mut keyboard = VirtualKeyboard::initialize(&mut document, "kb");
        let late = document.add_element(Element::new("late", "Late").with_class("kb"));
        document.focus(late, &mut keyboard);
        assert!(!keyboard.is_visible());
    }

    #[test]
    fn test_initialize_twice_duplicates_tree_and_listeners() {
        let mut document = Document::new();
        let index = document.add_element(Element::new("a", "A").with_class("kb"));
        let _first = VirtualKeyboard::initialize(&mut document, "kb");
        let _second = VirtualKeyboard::initialize(&mut document, "kb");
        assert_eq!(document.mounted_keyboards(), 2);
        assert_eq!(document.element(index).unwrap().focus_listener_count(), 2);
    }

    #[test]
    fn test_last_focused_field_wins() {
        let mut document = Document::new();
        let a = document.add_element(Element::new("a", "A").with_class("kb"));
        let b = document.add_element(Element::new("b", "B").with_class("kb"));
        let mut keyboard = VirtualKeyboard::initialize(&mut document, "kb");

        document.focus(a, &mut keyboard);
        document.focus(b, &mut keyboard);
        keyboard.press_symbol("z");

        assert_eq!(document.element(a).unwrap().value(), "");
        assert_eq!(document.element(b).unwrap().value(), "z");
    }
}
