//! Event sources for the ridehail TUI
//!
//! Merges terminal key presses with the events views send back from their
//! background requests.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tracing::warn;

use crate::views::ViewEvent;

/// Application events handled by the main loop
#[derive(Debug)]
pub enum AppEvent {
    /// Key pressed in the terminal
    Key(KeyEvent),
    /// Message from a mounted view or one of its requests
    View(ViewEvent),
    /// Nothing happened within one tick
    Tick,
}

pub struct EventSource {
    tick: Duration,
    views: UnboundedReceiver<ViewEvent>,
}

impl EventSource {
    pub fn new(tick: Duration, views: UnboundedReceiver<ViewEvent>) -> Self {
        Self { tick, views }
    }

    /// Next view event if one is already queued
    pub fn try_next_view(&mut self) -> Option<ViewEvent> {
        match self.views.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("View event channel closed");
                None
            }
        }
    }

    /// Wait for the next view event
    pub async fn next_view(&mut self) -> Option<ViewEvent> {
        self.views.recv().await
    }

    /// Queued view events first, then up to one tick of terminal input
    pub fn next(&mut self) -> Result<AppEvent> {
        if let Some(view_event) = self.try_next_view() {
            return Ok(AppEvent::View(view_event));
        }

        if event::poll(self.tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(AppEvent::Key(key));
                }
            }
        }

        Ok(AppEvent::Tick)
    }
}
