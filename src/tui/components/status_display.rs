//! Status bar messages

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl StatusType {
    fn prefix(&self) -> &'static str {
        match self {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Warning => "⚠",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        }
    }

    fn style(&self) -> Style {
        match self {
            StatusType::Info => Styles::info(),
            StatusType::Success => Styles::success(),
            StatusType::Warning | StatusType::Loading => Styles::warning(),
            StatusType::Error => Styles::error(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: Local::now(),
        }
    }
}

/// Current message plus a bounded history of replaced ones
pub struct StatusDisplay {
    current_message: Option<StatusMessage>,
    message_history: Vec<StatusMessage>,
    max_history: usize,
    show_timestamp: bool,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 50,
            show_timestamp: false,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Info));
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Success));
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Warning));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Error));
    }

    pub fn set_loading(&mut self, message: impl Into<String>) {
        self.set_message(StatusMessage::new(message.into(), StatusType::Loading));
    }

    pub fn clear(&mut self) {
        self.archive_current();
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    pub fn render_with_title(&self, f: &mut Frame, area: Rect, title: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => (self.format_message(message), message.status_type.style()),
            None => ("Listo".to_string(), Styles::default()),
        };

        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(content).style(style).block(block), area);
    }

    fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = message.status_type.prefix();
        if self.show_timestamp {
            format!(
                "{} [{}] {}",
                prefix,
                message.timestamp.format("%H:%M:%S"),
                message.message
            )
        } else {
            format!("{} {}", prefix, message.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaced_messages_move_to_history() {
        let mut status = StatusDisplay::new();
        status.set_loading("Cargando viajes...");
        status.set_success("Datos actualizados exitosamente");

        let current = status.get_current().unwrap();
        assert_eq!(current.status_type, StatusType::Success);
        assert_eq!(status.get_history().len(), 1);
        assert_eq!(status.get_history()[0].message, "Cargando viajes...");

        status.clear();
        assert!(status.get_current().is_none());
        assert_eq!(status.get_history().len(), 2);
    }

    #[test]
    fn test_format_includes_prefix() {
        let status = StatusDisplay::new();
        let message = StatusMessage::new("Sin conexion".to_string(), StatusType::Error);
        assert_eq!(status.format_message(&message), "✗ Sin conexion");
    }
}
