//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::components::StatusDisplay;
use super::events::{AppEvent, EventSource};
use super::screens::{LoginScreen, MenuScreen, RegistrationScreen, TripsScreen};
use super::traits::{Screen, ScreenAction};
use super::ui::centered_rect;
use crate::api::{RideClient, WriteOutcome};
use crate::models::{Identity, Mode, NavTarget, Role};
use crate::views::{ProfileLoad, RegistrationForm, TripList, ViewContext, ViewEvent};

/// The screen currently mounted
pub enum ActiveScreen {
    Login(LoginScreen),
    Menu(MenuScreen),
    Registration(RegistrationScreen),
    Trips(TripsScreen),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Login(screen) => screen,
            ActiveScreen::Menu(screen) => screen,
            ActiveScreen::Registration(screen) => screen,
            ActiveScreen::Trips(screen) => screen,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Login(screen) => screen,
            ActiveScreen::Menu(screen) => screen,
            ActiveScreen::Registration(screen) => screen,
            ActiveScreen::Trips(screen) => screen,
        }
    }
}

/// Main TUI application state
pub struct App {
    ctx: ViewContext,
    events: EventSource,
    /// Who signed in on the login screen
    pub session: Option<Identity>,
    pub screen: ActiveScreen,
    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    /// Create the application on the login screen, optionally prefilled
    pub fn new(client: RideClient, tick: Duration, prefill: Option<Identity>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            ctx: ViewContext::new(client, tx),
            events: EventSource::new(tick, rx),
            session: None,
            screen: ActiveScreen::Login(LoginScreen::new(prefill.as_ref())),
            status: StatusDisplay::new().with_timestamps(),
            should_quit: false,
            show_help_popup: false,
        }
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            terminal.draw(|f| self.draw(f))?;

            match self.events.next()? {
                AppEvent::Key(key) => self.handle_key_event(key)?,
                AppEvent::View(event) => self.handle_view_event(event),
                AppEvent::Tick => {}
            }

            if self.should_quit {
                break;
            }
        }

        self.screen.as_screen_mut().on_exit();
        info!("Application loop completed");
        Ok(())
    }

    /// Sign in directly, skipping the login screen
    pub fn sign_in(&mut self, identity: Identity) {
        info!("Signed in as {} ({})", identity.phone_number, identity.role);
        let role = identity.role;
        self.status
            .set_info(format!("Sesion iniciada como {}", identity.role));
        self.session = Some(identity);
        self.navigate(NavTarget::menu_for(role));
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            return Ok(());
        }

        let action = self.screen.as_screen_mut().handle_key_event(key)?;
        self.apply(action);
        Ok(())
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Navigate(target) => self.navigate(target),
            ScreenAction::SignIn(identity) => self.sign_in(identity),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_loading(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
    }

    /// Route a view event to the mounted screen
    pub fn handle_view_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Navigate(target) => self.navigate(target),
            ViewEvent::ProfileLoaded { mount, result } => match &mut self.screen {
                ActiveScreen::Registration(screen) if screen.mount_id() == mount => {
                    match screen.on_profile_loaded(mount, result) {
                        ProfileLoad::Applied => self.status.set_success("Datos cargados"),
                        ProfileLoad::Failed(error) => self
                            .status
                            .set_error(format!("No se pudieron cargar los datos: {}", error)),
                        ProfileLoad::Stale => {}
                    }
                }
                _ => debug!("Profile for {} arrived after its form was closed", mount),
            },
            ViewEvent::TripsLoaded { mount, result } => match &mut self.screen {
                ActiveScreen::Trips(screen) if screen.mount_id() == mount => {
                    if screen.on_trips_loaded(mount, result) {
                        let count = screen.list().trips().len();
                        if count > 0 {
                            self.status.set_info(format!("{} viajes", count));
                        }
                    }
                }
                _ => debug!("Trips for {} arrived after their list was closed", mount),
            },
            ViewEvent::WriteFinished { kind, outcome } => match outcome {
                WriteOutcome::Accepted => {
                    self.status
                        .set_success(format!("{} actualizados exitosamente", kind.subject()));
                }
                WriteOutcome::Rejected => {
                    self.status
                        .set_warning(format!("{} sin actualizar", kind.subject()));
                }
                WriteOutcome::Failed(e) => {
                    self.status
                        .set_error(format!("{} sin actualizar: {}", kind.subject(), e));
                }
            },
        }
    }

    /// Unmount the current screen and mount the one for `target`
    pub fn navigate(&mut self, target: NavTarget) {
        let next = match target {
            NavTarget::Login => {
                let last = self.session.take();
                ActiveScreen::Login(LoginScreen::new(last.as_ref()))
            }
            NavTarget::Menu(role) => match self.identity_as(role) {
                Some(identity) => ActiveScreen::Menu(MenuScreen::new(identity)),
                None => return self.require_session(target),
            },
            NavTarget::Register(role) => {
                let identity = Identity::new("", role);
                let form = RegistrationForm::mount(identity, Mode::Create, self.ctx.clone());
                ActiveScreen::Registration(RegistrationScreen::new(form))
            }
            NavTarget::UpdateProfile => match self.session.clone() {
                Some(identity) => {
                    let form = RegistrationForm::mount(identity, Mode::Update, self.ctx.clone());
                    self.status.set_loading("Cargando datos...");
                    ActiveScreen::Registration(RegistrationScreen::new(form))
                }
                None => return self.require_session(target),
            },
            NavTarget::Trips => match self.session.clone() {
                Some(identity) => {
                    ActiveScreen::Trips(TripsScreen::new(TripList::mount(identity, self.ctx.clone())))
                }
                None => return self.require_session(target),
            },
        };

        info!("Navigating to {}", target);
        self.screen.as_screen_mut().on_exit();
        self.screen = next;
        self.show_help_popup = false;
    }

    /// Session identity under the given role
    fn identity_as(&self, role: Role) -> Option<Identity> {
        self.session
            .as_ref()
            .map(|identity| Identity::new(identity.phone_number.clone(), role))
    }

    fn require_session(&mut self, target: NavTarget) {
        warn!("Cannot open {} without a session", target);
        self.status.set_error("Inicia sesion primero");
        self.navigate(NavTarget::Login);
    }

    /// Wait for the next view event and handle it
    pub async fn process_next_view_event(&mut self) -> bool {
        match self.events.next_view().await {
            Some(event) => {
                self.handle_view_event(event);
                true
            }
            None => false,
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.screen.as_screen_mut().draw(f, chunks[0]);
        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let title = format!(
            "ridehail - {} | F1: Ayuda | Ctrl+C: Salir",
            self.screen.as_screen().title()
        );
        self.status.render_with_title(f, area, &title);
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 50, area);
        f.render_widget(Clear, popup_area);

        let help_content = format!(
            "Atajos globales:\nF1 - Mostrar/ocultar esta ayuda\nCtrl+C - Salir\n\n{}",
            self.screen.as_screen().help()
        );
        let help_popup = Paragraph::new(help_content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Ayuda")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }
}
