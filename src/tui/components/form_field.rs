//! Rendering and editing helpers for profile form inputs.
//!
//! The form controller owns every value; these helpers only compute the
//! next value for an edit and draw what they are handed.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::profile::{ChoiceOption, FieldDescriptor, FieldKind};
use crate::tui::ui::{byte_index, place_cursor, Styles};

/// Cursor within a text input, counted in characters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextCursor {
    pub position: usize,
}

impl TextCursor {
    pub fn at_end(value: &str) -> Self {
        Self {
            position: value.chars().count(),
        }
    }

    /// Value with `c` inserted at the cursor
    pub fn inserted(&self, value: &str, c: char) -> String {
        let mut next = value.to_string();
        next.insert(byte_index(value, self.position), c);
        next
    }

    /// Value with the character before the cursor removed
    pub fn deleted_back(&self, value: &str) -> Option<String> {
        if self.position == 0 {
            return None;
        }
        let mut next = value.to_string();
        next.remove(byte_index(value, self.position - 1));
        Some(next)
    }

    /// Value with the character under the cursor removed
    pub fn deleted_forward(&self, value: &str) -> Option<String> {
        if self.position >= value.chars().count() {
            return None;
        }
        let mut next = value.to_string();
        next.remove(byte_index(value, self.position));
        Some(next)
    }

    pub fn move_left(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn move_right(&mut self, value: &str) {
        if self.position < value.chars().count() {
            self.position += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.position = 0;
    }

    pub fn move_to_end(&mut self, value: &str) {
        self.position = value.chars().count();
    }
}

/// One bordered input drawn from its descriptor and current value
pub struct FormField<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub value: &'a str,
    pub is_focused: bool,
}

impl<'a> FormField<'a> {
    pub fn new(descriptor: &'a FieldDescriptor, value: &'a str, is_focused: bool) -> Self {
        Self {
            descriptor,
            value,
            is_focused,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, cursor: TextCursor) {
        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let show_placeholder = self.value.is_empty() && !self.descriptor.kind.is_choice();
        let (text, text_style) = if show_placeholder {
            (self.descriptor.placeholder(), Styles::inactive())
        } else if !self.descriptor.editable {
            (self.descriptor.kind.display(self.value), Styles::disabled())
        } else {
            (self.descriptor.kind.display(self.value), Styles::default())
        };

        let title = if self.descriptor.kind.is_choice() {
            format!("{} ▼", self.descriptor.placeholder())
        } else {
            self.descriptor.placeholder()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        f.render_widget(Paragraph::new(text).style(text_style).block(block), area);

        let typing = matches!(self.descriptor.kind, FieldKind::Text | FieldKind::Secret);
        if self.is_focused && typing && self.descriptor.editable {
            place_cursor(f, area, cursor.position);
        }
    }
}

/// Open option list for a choice input
pub struct Dropdown {
    pub options: Vec<ChoiceOption>,
    pub state: ListState,
    prompt: &'static str,
}

impl Dropdown {
    /// Open on the options of `kind`, highlighting the stored value.
    /// Returns `None` for inputs that are not dropdowns.
    pub fn open(kind: &FieldKind, current: &str) -> Option<Self> {
        let FieldKind::Choice {
            prompt, options, ..
        } = kind
        else {
            return None;
        };

        let mut state = ListState::default();
        if !options.is_empty() {
            let index = options.iter().position(|o| o.code == current).unwrap_or(0);
            state.select(Some(index));
        }

        Some(Self {
            options: options.clone(),
            state,
            prompt,
        })
    }

    pub fn up(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let next = if selected == 0 {
            self.options.len() - 1
        } else {
            selected - 1
        };
        self.state.select(Some(next));
    }

    pub fn down(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some((selected + 1) % self.options.len()));
    }

    /// Code of the highlighted option
    pub fn selected_code(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(|o| o.code.as_str())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.state.selected();
        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(option.label.clone()).style(style)
            })
            .collect();

        let block = Block::default()
            .title(self.prompt)
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        f.render_widget(Clear, area);
        f.render_stateful_widget(List::new(items).block(block), area, &mut self.state);
    }
}
