use std::{cell::RefCell, rc::Rc};

use crate::config::FieldConfig;
use crate::keyboard::VirtualKeyboard;

/// Runs when an element receives focus, with the keyboard injected by the host.
pub type FocusListener = Box<dyn Fn(&mut VirtualKeyboard)>;

/// A focusable, text-bearing host element.
pub struct Element {
    id: String,
    label: String,
    classes: Vec<String>,
    value: Rc<RefCell<String>>,
    listeners: Vec<FocusListener>,
}

impl Element {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            classes: Vec::new(),
            value: Rc::new(RefCell::new(String::new())),
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        *self.value.borrow_mut() = value.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    /// Shared handle to the element's value, for callbacks that write back into it.
    pub fn value_handle(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.value)
    }

    pub fn add_focus_listener(&mut self, listener: FocusListener) {
        self.listeners.push(listener);
    }

    pub fn focus_listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("classes", &self.classes)
            .field("value", &self.value.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// The host surface: an ordered set of elements plus any mounted keyboards.
#[derive(Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
    focused: Option<usize>,
    mounted_keyboards: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document with one element per configured field. Keyboard-enabled
    /// fields carry `marker_class`.
    pub fn from_fields(fields: &[FieldConfig], marker_class: &str) -> Self {
        let mut document = Self::new();
        for (index, field) in fields.iter().enumerate() {
            let mut element =
                Element::new(format!("field-{index}"), &field.label).with_value(&field.value);
            if field.keyboard {
                element = element.with_class(marker_class);
            }
            document.add_element(element);
        }
        document
    }

    /// Append an element and return its index.
    pub fn add_element(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn elements_with_class<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    pub fn elements_with_class_mut<'a>(
        &'a mut self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.iter_mut().filter(move |e| e.has_class(class))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Give focus to an element and run its focus listeners against `keyboard`.
    /// Out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize, keyboard: &mut VirtualKeyboard) {
        let Some(element) = self.elements.get(index) else {
            return;
        };
        self.focused = Some(index);
        log::debug!("focus {} ({} listeners)", element.id, element.listeners.len());
        for listener in &element.listeners {
            listener(keyboard);
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub(crate) fn mount_keyboard(&mut self) {
        self.mounted_keyboards += 1;
    }

    pub fn mounted_keyboards(&self) -> usize {
        self.mounted_keyboards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_element_builder() {
        let element = Element::new("a", "Name")
            .with_class("use-keyboard-input")
            .with_value("hello");
        assert_eq!(element.id(), "a");
        assert_eq!(element.label(), "Name");
        assert!(element.has_class("use-keyboard-input"));
        assert!(!element.has_class("other"));
        assert_eq!(element.value(), "hello");
    }

    #[test]
    fn test_value_handle_is_shared() {
        let element = Element::new("a", "Name");
        let handle = element.value_handle();
        *handle.borrow_mut() = "written".to_string();
        assert_eq!(element.value(), "written");
    }

    #[test]
    fn test_from_fields_tags_keyboard_fields() {
        let config = Config::default();
        let document = Document::from_fields(&config.fields, "marker");
        assert_eq!(document.len(), config.fields.len());
        for (element, field) in document.elements().iter().zip(&config.fields) {
            assert_eq!(element.has_class("marker"), field.keyboard);
            assert_eq!(element.label(), field.label);
        }
        let wired = config.fields.iter().filter(|f| f.keyboard).count();
        assert_eq!(document.elements_with_class("marker").count(), wired);
    }

    #[test]
    fn test_focus_out_of_range_is_ignored() {
        let mut document = Document::new();
        let mut keyboard = VirtualKeyboard::initialize(&mut document, "marker");
        document.focus(3, &mut keyboard);
        assert_eq!(document.focused(), None);
        assert!(!keyboard.is_visible());
    }

    #[test]
    fn test_focus_and_blur() {
        let mut document = Document::new();
        document.add_element(Element::new("a", "A"));
        let mut keyboard = VirtualKeyboard::initialize(&mut document, "marker");
        document.focus(0, &mut keyboard);
        assert_eq!(document.focused(), Some(0));
        document.blur();
        assert_eq!(document.focused(), None);
    }
}
