//! Sign-in screen: phone number plus role, or start a registration

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{Identity, NavTarget, Role};
use crate::tui::{
    traits::{FormHandler, Screen, ScreenAction},
    ui::{centered_rect, InputField, Styles},
};

const PHONE: usize = 0;
const ROLE: usize = 1;
const SIGN_IN: usize = 2;
const REGISTER: usize = 3;
const FOCUS_COUNT: usize = 4;

pub struct LoginScreen {
    phone: InputField,
    role: Role,
    current_field: usize,
}

impl LoginScreen {
    pub fn new(prefill: Option<&Identity>) -> Self {
        let mut phone = InputField::new("Celular").with_placeholder("Numero de celular");
        if let Some(identity) = prefill {
            phone = phone.with_value(&identity.phone_number);
        }
        phone.set_focus(true);

        Self {
            phone,
            role: prefill.map(|identity| identity.role).unwrap_or(Role::Rider),
            current_field: PHONE,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phone(&self) -> &str {
        self.phone.value.trim()
    }

    fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::Rider => Role::Driver,
            Role::Driver => Role::Rider,
        };
    }

    fn sign_in(&self) -> ScreenAction {
        if self.phone.is_empty() {
            return ScreenAction::SetError("Ingresa tu numero de celular".to_string());
        }
        ScreenAction::SignIn(Identity::new(self.phone(), self.role))
    }

    fn activate(&mut self) -> ScreenAction {
        match self.current_field {
            PHONE => {
                self.next_field();
                ScreenAction::None
            }
            ROLE => {
                self.toggle_role();
                ScreenAction::None
            }
            SIGN_IN => self.sign_in(),
            _ => ScreenAction::Navigate(NavTarget::Register(self.role)),
        }
    }

    fn draw_role(&self, f: &mut Frame, area: Rect) {
        let spans: Vec<Span> = Role::all()
            .iter()
            .flat_map(|role| {
                let style = if *role == self.role {
                    Styles::selected()
                } else {
                    Styles::inactive()
                };
                [Span::styled(format!(" {} ", role.as_str()), style), Span::raw("  ")]
            })
            .collect();

        let border = if self.current_field == ROLE {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title("Ingresar como")
            .borders(Borders::ALL)
            .border_style(border);
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_button(&self, f: &mut Frame, area: Rect, label: &str, index: usize) {
        let style = if self.current_field == index {
            Styles::selected()
        } else {
            Styles::default()
        };
        let button = Paragraph::new(label.to_string())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, area);
    }
}

impl FormHandler for LoginScreen {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < FOCUS_COUNT {
            self.current_field = field;
            self.phone.set_focus(field == PHONE);
        }
    }

    fn get_field_count(&self) -> usize {
        FOCUS_COUNT
    }
}

impl Screen for LoginScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let panel = centered_rect(60, 80, area);
        f.render_widget(
            Block::default()
                .title(Span::styled("Ingreso", Styles::title()))
                .borders(Borders::ALL),
            panel,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(panel);

        self.phone.render(f, chunks[0]);
        self.draw_role(f, chunks[1]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        self.draw_button(f, buttons[0], "Entrar", SIGN_IN);
        self.draw_button(f, buttons[1], "Registrarse", REGISTER);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
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
            KeyCode::Esc => ScreenAction::Quit,
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.current_field == ROLE => {
                self.toggle_role();
                ScreenAction::None
            }
            KeyCode::Left if self.current_field == PHONE => {
                self.phone.move_cursor_left();
                ScreenAction::None
            }
            KeyCode::Right if self.current_field == PHONE => {
                self.phone.move_cursor_right();
                ScreenAction::None
            }
            KeyCode::Backspace if self.current_field == PHONE => {
                self.phone.delete_char();
                ScreenAction::None
            }
            KeyCode::Char(c) if self.current_field == PHONE => {
                self.phone.insert_char(c);
                ScreenAction::None
            }
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn title(&self) -> String {
        NavTarget::Login.to_string()
    }

    fn help(&self) -> &'static str {
        "Tab/↑/↓: cambiar de campo\n←/→/Espacio: cambiar rol\nEnter: Entrar o Registrarse\nEsc: salir"
    }
}
