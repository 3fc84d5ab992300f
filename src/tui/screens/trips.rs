//! Trip history screen

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::api::ApiError;
use crate::models::{NavTarget, Role, Trip};
use crate::tui::{
    components::ListView,
    traits::{Navigable, Screen, ScreenAction},
    ui::Styles,
};
use crate::views::{MountId, TripCard, TripList, TripListState};

/// Title and body lines of one rendered card
#[derive(Debug, Clone)]
struct CardText {
    title: String,
    lines: Vec<String>,
}

impl From<TripCard<'_>> for CardText {
    fn from(card: TripCard<'_>) -> Self {
        Self {
            title: card.title(),
            lines: card.lines(),
        }
    }
}

pub struct TripsScreen {
    list: TripList,
    cards: ListView<CardText>,
}

impl TripsScreen {
    pub fn new(list: TripList) -> Self {
        let title = match list.identity().role {
            Role::Rider => "Mis viajes",
            Role::Driver => "Mis servicios",
        };
        Self {
            list,
            cards: ListView::new(Vec::new(), title),
        }
    }

    pub fn list(&self) -> &TripList {
        &self.list
    }

    pub fn mount_id(&self) -> MountId {
        self.list.mount_id()
    }

    /// Hand a trip fetch result to the list and rebuild the cards
    pub fn on_trips_loaded(&mut self, mount: MountId, result: Result<Vec<Trip>, ApiError>) -> bool {
        let changed = self.list.on_trips_loaded(mount, result);
        if changed {
            let cards = self.list.cards().into_iter().map(CardText::from).collect();
            self.cards.set_items(cards);
        }
        changed
    }

    fn draw_message(&self, f: &mut Frame, area: Rect, message: &str, style: Style) {
        let paragraph = Paragraph::new(message.to_string())
            .style(style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(self.cards.title.clone())
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_widget(paragraph, area);
    }
}

impl Screen for TripsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        match self.list.state() {
            TripListState::Loading => {
                self.draw_message(f, chunks[0], "Cargando viajes...", Styles::warning())
            }
            TripListState::Failed(error) => {
                let message = format!("No se pudieron cargar los viajes: {}", error);
                self.draw_message(f, chunks[0], &message, Styles::error())
            }
            TripListState::Loaded(trips) if trips.is_empty() => {
                self.draw_message(f, chunks[0], "No hay viajes registrados", Styles::inactive())
            }
            TripListState::Loaded(_) => {
                self.cards.render(f, chunks[0], |_, card, is_selected| {
                    let title_style = if is_selected {
                        Styles::selected()
                    } else {
                        Styles::title()
                    };
                    let mut lines = vec![Line::from(Span::styled(
                        card.title.clone(),
                        title_style.add_modifier(Modifier::BOLD),
                    ))];
                    lines.extend(
                        card.lines
                            .iter()
                            .map(|line| Line::from(format!("   {}", line))),
                    );
                    lines.push(Line::from(""));
                    ListItem::new(lines)
                });
            }
        }

        let footer = Paragraph::new("↑/↓: moverse   Esc/Enter: volver al menu")
            .style(Styles::inactive())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Up => self.cards.navigate_up(),
            KeyCode::Down => self.cards.navigate_down(),
            KeyCode::Home => self.cards.navigate_to_first(),
            KeyCode::End => self.cards.navigate_to_last(),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => self.list.back(),
            _ => {}
        }
        Ok(ScreenAction::None)
    }

    fn title(&self) -> String {
        NavTarget::Trips.to_string()
    }

    fn help(&self) -> &'static str {
        "↑/↓: moverse entre viajes\nInicio/Fin: primero/ultimo\nEsc/Enter: volver al menu"
    }

    fn on_exit(&mut self) {
        self.list.unmount();
    }
}
