//! Role menu shown after signing in

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};

use crate::models::{Identity, NavTarget, Role};
use crate::tui::{
    components::{ListView, MenuItem},
    traits::{Navigable, Screen, ScreenAction},
    ui::Styles,
};

pub struct MenuScreen {
    identity: Identity,
    menu: ListView<MenuItem<NavTarget>>,
}

impl MenuScreen {
    pub fn new(identity: Identity) -> Self {
        let trips_description = match identity.role {
            Role::Rider => "Consulta los viajes que has solicitado",
            Role::Driver => "Consulta los servicios que has prestado",
        };

        let items = vec![
            MenuItem::new("Mis viajes", NavTarget::Trips)
                .with_shortcut('V')
                .with_description(trips_description),
            MenuItem::new("Actualizar datos", NavTarget::UpdateProfile)
                .with_shortcut('A')
                .with_description("Revisa y cambia la informacion de tu cuenta"),
            MenuItem::new("Cerrar sesion", NavTarget::Login)
                .with_shortcut('S')
                .with_description("Vuelve a la pantalla de ingreso"),
        ];

        Self {
            identity,
            menu: ListView::new(items, "Menu"),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(self.identity.role.as_str(), Styles::title()),
            Span::raw("  "),
            Span::styled(self.identity.phone_number.as_str(), Styles::info()),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let instructions = Paragraph::new(vec![Line::from(vec![
            Span::styled("↑/↓", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" moverse, "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" elegir, "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" salir"),
        ])])
        .style(Styles::inactive())
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(instructions, area);
    }
}

impl Screen for MenuScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        self.draw_header(f, chunks[0]);

        self.menu.render(f, chunks[1], |_, item, is_selected| {
            let style = if is_selected {
                Styles::selected()
            } else {
                Style::default()
            };
            let shortcut = item.shortcut.map(|c| format!("[{}] ", c)).unwrap_or_default();
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(shortcut, Styles::info()),
                    Span::styled(item.label.clone(), style.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(Span::styled(
                    format!("     {}", item.description),
                    if is_selected { style } else { Styles::inactive() },
                )),
            ])
        });

        self.draw_instructions(f, chunks[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        let action = match key.code {
            KeyCode::Up => {
                self.menu.navigate_up();
                ScreenAction::None
            }
            KeyCode::Down => {
                self.menu.navigate_down();
                ScreenAction::None
            }
            KeyCode::Home => {
                self.menu.navigate_to_first();
                ScreenAction::None
            }
            KeyCode::End => {
                self.menu.navigate_to_last();
                ScreenAction::None
            }
            KeyCode::Enter => self
                .menu
                .selected()
                .map(|item| ScreenAction::Navigate(item.action))
                .unwrap_or(ScreenAction::None),
            KeyCode::Char('q') => ScreenAction::Quit,
            KeyCode::Char(c) if self.menu.select_by_shortcut(c) => self
                .menu
                .selected()
                .map(|item| ScreenAction::Navigate(item.action))
                .unwrap_or(ScreenAction::None),
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn title(&self) -> String {
        NavTarget::menu_for(self.identity.role).to_string()
    }

    fn help(&self) -> &'static str {
        "↑/↓: moverse\nEnter: elegir opcion\nV: mis viajes\nA: actualizar datos\nS: cerrar sesion\nq: salir"
    }
}
