//! Generic list view component

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::tui::{traits::Navigable, ui::Styles};

/// Selectable list of items rendered through a caller-supplied formatter
pub struct ListView<T> {
    pub items: Vec<T>,
    pub state: ListState,
    pub title: String,
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>, title: &str) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            title: title.to_string(),
        }
    }

    /// Replace items, keeping the selection when it is still in range
    pub fn set_items(&mut self, items: Vec<T>) {
        let selected = self.state.selected();
        self.items = items;

        let next = match selected {
            Some(idx) if idx < self.items.len() => Some(idx),
            _ if !self.items.is_empty() => Some(0),
            _ => None,
        };
        self.state.select(next);
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn render<'a, F>(&mut self, f: &mut Frame, area: Rect, item_formatter: F)
    where
        F: Fn(usize, &T, bool) -> ListItem<'a>,
    {
        let selected = self.state.selected();
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| item_formatter(i, item, Some(i) == selected))
            .collect();

        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let list = List::new(items)
            .block(block)
            .highlight_style(Styles::selected());

        f.render_stateful_widget(list, area, &mut self.state);
    }
}

impl<T> Navigable for ListView<T> {
    fn navigate_up(&mut self) {
        self.previous();
    }

    fn navigate_down(&mut self) {
        self.next();
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.items.len()
    }
}

/// Menu entry with an optional shortcut key and the action it triggers
#[derive(Debug, Clone)]
pub struct MenuItem<A> {
    pub label: String,
    pub description: String,
    pub shortcut: Option<char>,
    pub action: A,
}

impl<A> MenuItem<A> {
    pub fn new(label: &str, action: A) -> Self {
        Self {
            label: label.to_string(),
            description: String::new(),
            shortcut: None,
            action,
        }
    }

    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn matches_shortcut(&self, key: char) -> bool {
        self.shortcut
            .map(|s| s.eq_ignore_ascii_case(&key))
            .unwrap_or(false)
    }
}

impl<A> ListView<MenuItem<A>> {
    /// Select by shortcut key; returns whether an item matched
    pub fn select_by_shortcut(&mut self, key: char) -> bool {
        match self.items.iter().position(|item| item.matches_shortcut(key)) {
            Some(i) => {
                self.state.select(Some(i));
                true
            }
            None => false,
        }
    }
}
