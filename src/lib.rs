//! Ride-hailing terminal client
//!
//! Rider and driver registration, profile updates and trip history against
//! a JSON backend, driven from a ratatui terminal UI or one-shot CLI
//! commands.

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod profile;
pub mod tui;
pub mod views;
