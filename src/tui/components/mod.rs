//! Reusable TUI components

pub mod form_field;
pub mod list_view;
pub mod status_display;

pub use form_field::{Dropdown, FormField, TextCursor};
pub use list_view::{ListView, MenuItem};
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
