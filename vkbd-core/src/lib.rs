pub mod action;
pub mod config;
pub mod document;
pub mod input;
pub mod keyboard;
pub mod layout;
pub mod state;

// Re-export commonly used types at crate root
pub use action::Action;
pub use config::Config;
pub use document::{Document, Element};
pub use input::KeyEvent;
pub use keyboard::{Callback, VirtualKeyboard};
pub use layout::{DEFAULT_LAYOUT, Direction, KeyDescriptor, KeyRole};
pub use state::{AppState, FieldValue};
