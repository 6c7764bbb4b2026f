use crate::{config::Config, document::Document, keyboard::VirtualKeyboard};
use serde::Serialize;

/// Everything the terminal host renders and mutates.
#[derive(Debug)]
pub struct AppState {
    pub document: Document,
    pub keyboard: VirtualKeyboard,
    /// Key highlighted for keyboard-driven presses.
    pub selected_key: usize,
}

/// Final contents of one field, reported when the host exits.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldValue {
    pub label: String,
    pub value: String,
}

impl AppState {
    pub fn new(document: Document, keyboard: VirtualKeyboard) -> Self {
        Self {
            document,
            keyboard,
            selected_key: 0,
        }
    }

    /// Build the document from the configured fields and attach a keyboard to it.
    pub fn from_config(config: &Config) -> Self {
        let marker = &config.keyboard.marker_class;
        let mut document = Document::from_fields(&config.fields, marker);
        let keyboard = VirtualKeyboard::initialize(&mut document, marker);
        Self::new(document, keyboard)
    }

    pub fn field_values(&self) -> Vec<FieldValue> {
        self.document
            .elements()
            .iter()
            .map(|e| FieldValue {
                label: e.label().to_string(),
                value: e.value(),
            })
            .collect()
    }
}
