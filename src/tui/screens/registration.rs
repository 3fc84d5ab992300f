//! Registration and profile update screen
//!
//! Draws whatever descriptors the form hands out and turns key presses into
//! edits on the form. Values live in the form only; the screen keeps focus,
//! cursor and the open dropdown.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{Map, Value};

use crate::api::ApiError;
use crate::models::{Mode, NavTarget};
use crate::tui::{
    components::{Dropdown, FormField, TextCursor},
    traits::{FormHandler, Screen, ScreenAction},
    ui::{centered_rect, Styles},
};
use crate::views::{MountId, ProfileLoad, RegistrationForm};

const FIELD_HEIGHT: u16 = 3;
const HEADING_HEIGHT: u16 = 1;
const REQUIRED_LEGEND: &str = "(*) Campos Obligatorios";

enum Row {
    Heading(&'static str),
    Field(usize),
}

impl Row {
    fn height(&self) -> u16 {
        match self {
            Row::Heading(_) => HEADING_HEIGHT,
            Row::Field(_) => FIELD_HEIGHT,
        }
    }
}

pub struct RegistrationScreen {
    form: RegistrationForm,
    current_field: usize,
    cursor: TextCursor,
    dropdown: Option<Dropdown>,
}

impl RegistrationScreen {
    pub fn new(form: RegistrationForm) -> Self {
        let mut screen = Self {
            form,
            current_field: 0,
            cursor: TextCursor::default(),
            dropdown: None,
        };
        screen.reset_cursor();
        screen
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn mount_id(&self) -> MountId {
        self.form.mount_id()
    }

    /// Hand a profile fetch result to the form
    pub fn on_profile_loaded(
        &mut self,
        mount: MountId,
        result: Result<Map<String, Value>, ApiError>,
    ) -> ProfileLoad {
        let outcome = self.form.on_profile_loaded(mount, result);
        if outcome.is_applied() {
            self.reset_cursor();
        }
        outcome
    }

    fn field_count(&self) -> usize {
        self.form.layout().len()
    }

    fn submit_index(&self) -> usize {
        self.field_count()
    }

    fn cancel_index(&self) -> usize {
        self.field_count() + 1
    }

    /// Current value of the focused input, if focus is on one
    fn focused_value(&self) -> Option<String> {
        self.form
            .descriptors()
            .get(self.current_field)
            .map(|descriptor| self.form.value(descriptor.field))
    }

    fn reset_cursor(&mut self) {
        self.cursor = TextCursor::at_end(&self.focused_value().unwrap_or_default());
    }

    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut index = 0;
        for section in &self.form.layout().sections {
            rows.push(Row::Heading(section.title));
            for _ in &section.fields {
                rows.push(Row::Field(index));
                index += 1;
            }
        }
        rows
    }

    /// Replace the focused text value through the form, moving the cursor
    /// only when the form took the edit
    fn edit_text<F>(&mut self, next_value: F, cursor_delta: isize) -> ScreenAction
    where
        F: FnOnce(&TextCursor, &str) -> Option<String>,
    {
        let Some(descriptor) = self.form.descriptors().get(self.current_field).copied() else {
            return ScreenAction::None;
        };
        if descriptor.kind.is_choice() {
            return ScreenAction::None;
        }
        let field = descriptor.field;
        let current = self.form.value(field);

        if let Some(next) = next_value(&self.cursor, &current) {
            if self.form.edit(field, &next) {
                self.cursor.position = self.cursor.position.saturating_add_signed(cursor_delta);
            }
        }
        ScreenAction::None
    }

    fn move_cursor<F>(&mut self, movement: F)
    where
        F: FnOnce(&mut TextCursor, &str),
    {
        if let Some(value) = self.focused_value() {
            movement(&mut self.cursor, &value);
        }
    }

    fn open_dropdown(&mut self) -> ScreenAction {
        let Some(descriptor) = self.form.descriptors().get(self.current_field).copied() else {
            return ScreenAction::None;
        };
        if !descriptor.editable {
            return ScreenAction::None;
        }
        let current = self.form.value(descriptor.field);
        self.dropdown = Dropdown::open(&descriptor.kind, &current);
        ScreenAction::None
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent) -> ScreenAction {
        let Some(dropdown) = self.dropdown.as_mut() else {
            return ScreenAction::None;
        };
        match key.code {
            KeyCode::Up => dropdown.up(),
            KeyCode::Down => dropdown.down(),
            KeyCode::Enter => {
                let code = dropdown.selected_code().map(str::to_string);
                let field = self
                    .form
                    .descriptors()
                    .get(self.current_field)
                    .map(|descriptor| descriptor.field);
                if let (Some(code), Some(field)) = (code, field) {
                    self.form.edit(field, &code);
                }
                self.dropdown = None;
            }
            KeyCode::Esc => self.dropdown = None,
            _ => {}
        }
        ScreenAction::None
    }

    fn activate(&mut self) -> ScreenAction {
        if self.current_field == self.submit_index() {
            // The write keeps running after this screen is gone; its
            // outcome comes back as a view event.
            drop(self.form.submit());
            return ScreenAction::SetStatus("Enviando datos...".to_string());
        }
        if self.current_field == self.cancel_index() {
            self.form.cancel();
            return ScreenAction::None;
        }

        let is_choice = self
            .form
            .descriptors()
            .get(self.current_field)
            .map(|descriptor| descriptor.kind.is_choice())
            .unwrap_or(false);
        if is_choice {
            self.open_dropdown()
        } else {
            self.next_field();
            ScreenAction::None
        }
    }

    fn draw_fields(&self, f: &mut Frame, area: Rect) {
        let rows = self.rows();
        let focused_row = rows
            .iter()
            .position(|row| matches!(row, Row::Field(i) if *i == self.current_field))
            .unwrap_or(rows.len().saturating_sub(1));

        // Scroll so the focused row is the last one that still fits
        let mut first = 0;
        while first < focused_row
            && rows[first..=focused_row].iter().map(Row::height).sum::<u16>() > area.height
        {
            first += 1;
        }

        let descriptors = self.form.descriptors();
        let mut y = area.y;
        for row in &rows[first..] {
            let height = row.height();
            if y + height > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x, y, area.width, height);
            match row {
                Row::Heading(title) => {
                    f.render_widget(Paragraph::new(*title).style(Styles::title()), rect);
                }
                Row::Field(index) => {
                    if let Some(descriptor) = descriptors.get(*index) {
                        let value = self.form.value(descriptor.field);
                        let focused = *index == self.current_field && self.dropdown.is_none();
                        FormField::new(descriptor, &value, focused).render(f, rect, self.cursor);
                    }
                }
            }
            y += height;
        }
    }

    fn draw_buttons(&self, f: &mut Frame, area: Rect) {
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let labels = [
            (self.form.submit_label(), self.submit_index()),
            ("Cancelar", self.cancel_index()),
        ];
        for ((label, index), rect) in labels.into_iter().zip(buttons.iter()) {
            let style = if self.current_field == index {
                Styles::selected()
            } else {
                Styles::default()
            };
            f.render_widget(
                Paragraph::new(label)
                    .style(style)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                *rect,
            );
        }
    }
}

impl FormHandler for RegistrationScreen {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.get_field_count() {
            self.current_field = field;
            self.dropdown = None;
            self.reset_cursor();
        }
    }

    fn get_field_count(&self) -> usize {
        self.field_count() + 2
    }
}

impl Screen for RegistrationScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(self.form.title())
            .style(Styles::title())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(REQUIRED_LEGEND)
                    .title_alignment(Alignment::Right),
            );
        f.render_widget(header, chunks[0]);

        self.draw_fields(f, chunks[1]);
        self.draw_buttons(f, chunks[2]);

        if let Some(dropdown) = self.dropdown.as_mut() {
            dropdown.render(f, centered_rect(40, 60, area));
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        if self.dropdown.is_some() {
            return Ok(self.handle_dropdown_key(key));
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                ScreenAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.previous_field();
                ScreenAction::None
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Esc => {
                self.form.cancel();
                ScreenAction::None
            }
            KeyCode::Char(c) => self.edit_text(|cursor, value| Some(cursor.inserted(value, c)), 1),
            KeyCode::Backspace => self.edit_text(TextCursor::deleted_back, -1),
            KeyCode::Delete => self.edit_text(TextCursor::deleted_forward, 0),
            KeyCode::Left => {
                self.move_cursor(|cursor, _| cursor.move_left());
                ScreenAction::None
            }
            KeyCode::Right => {
                self.move_cursor(TextCursor::move_right);
                ScreenAction::None
            }
            KeyCode::Home => {
                self.move_cursor(|cursor, _| cursor.move_to_start());
                ScreenAction::None
            }
            KeyCode::End => {
                self.move_cursor(TextCursor::move_to_end);
                ScreenAction::None
            }
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn title(&self) -> String {
        match self.form.mode() {
            Mode::Create => NavTarget::Register(self.form.identity().role).to_string(),
            Mode::Update => NavTarget::UpdateProfile.to_string(),
        }
    }

    fn help(&self) -> &'static str {
        "Tab/↓: siguiente campo\nShift+Tab/↑: campo anterior\nEnter: abrir lista o confirmar\nEsc: cancelar"
    }

    fn on_exit(&mut self) {
        self.form.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::models::{Identity, Mode, Role};
    use crate::profile::FieldName;
    use crate::views::test_support::memory_context;
    use crate::views::ViewEvent;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut RegistrationScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(press(KeyCode::Char(c))).unwrap();
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_typing_edits_focused_field() {
        let (ctx, _transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        let mut screen = RegistrationScreen::new(form);

        type_text(&mut screen, "3001234567");
        screen.handle_key_event(press(KeyCode::Backspace)).unwrap();
        assert_eq!(screen.form().value(FieldName::Phone), "300123456");

        screen.handle_key_event(press(KeyCode::Tab)).unwrap();
        type_text(&mut screen, "secreto");
        screen.handle_key_event(press(KeyCode::Home)).unwrap();
        screen.handle_key_event(press(KeyCode::Delete)).unwrap();
        assert_eq!(screen.form().value(FieldName::Password), "ecreto");
    }

    #[tokio::test]
    async fn test_read_only_phone_ignores_typing() {
        let (ctx, _transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("3001234567", Role::Rider), Mode::Update, ctx);
        let mut screen = RegistrationScreen::new(form);

        type_text(&mut screen, "99");
        assert_eq!(screen.form().value(FieldName::Phone), "3001234567");
    }

    #[tokio::test]
    async fn test_dropdown_selects_trunk_code() {
        let (ctx, _transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("", Role::Driver), Mode::Create, ctx);
        let mut screen = RegistrationScreen::new(form);

        let trunk = screen
            .form()
            .descriptors()
            .iter()
            .position(|descriptor| descriptor.field == FieldName::Trunk)
            .unwrap();
        screen.set_current_field(trunk);

        screen.handle_key_event(press(KeyCode::Enter)).unwrap();
        screen.handle_key_event(press(KeyCode::Down)).unwrap();
        screen.handle_key_event(press(KeyCode::Enter)).unwrap();
        assert_eq!(screen.form().value(FieldName::Trunk), "P");

        // Letters never reach a dropdown
        type_text(&mut screen, "x");
        assert_eq!(screen.form().value(FieldName::Trunk), "P");
    }

    #[tokio::test]
    async fn test_submit_button_writes_and_navigates() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::InsertUser, json!([{"bool": true}]))
            .await;
        let form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        let mut screen = RegistrationScreen::new(form);
        type_text(&mut screen, "3001234567");

        let submit = screen.submit_index();
        screen.set_current_field(submit);
        let action = screen.handle_key_event(press(KeyCode::Enter)).unwrap();
        assert!(matches!(action, ScreenAction::SetStatus(_)));

        let mut navigated = None;
        let mut finished = false;
        while navigated.is_none() || !finished {
            match rx.recv().await {
                Some(ViewEvent::Navigate(target)) => navigated = Some(target),
                Some(ViewEvent::WriteFinished { outcome, .. }) => {
                    assert!(outcome.is_accepted());
                    finished = true;
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(navigated, Some(NavTarget::Login));

        let (endpoint, body) = transport.last_sent().await.unwrap();
        assert_eq!(endpoint, Endpoint::InsertUser);
        assert_eq!(body["cellphone"], "3001234567");
    }

    #[tokio::test]
    async fn test_draw_driver_create_form() {
        let (ctx, _transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("", Role::Driver), Mode::Create, ctx);
        let mut screen = RegistrationScreen::new(form);
        let mut terminal = Terminal::new(TestBackend::new(80, 60)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                screen.draw(f, area);
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Celular*"));
        assert!(text.contains("Datos del Automovil"));
        assert!(text.contains("Placa*"));
        assert!(text.contains("Registrar Usuario"));
        assert!(text.contains("Cancelar"));
        assert!(text.contains("(*) Campos Obligatorios"));
    }

    #[tokio::test]
    async fn test_exit_unmounts_form() {
        let (ctx, _transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        let mut screen = RegistrationScreen::new(form);
        screen.on_exit();
        assert!(!screen.form().is_mounted());
    }
}
