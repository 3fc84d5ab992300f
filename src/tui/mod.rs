//! Ridehail terminal user interface
//!
//! Hosts the headless views: a login screen, the per-role menu, the
//! registration/profile form and the trip list. Views report navigation and
//! load results over a channel that the main loop drains between key presses.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{ActiveScreen, App};
pub use events::{AppEvent, EventSource};
pub use traits::{Screen, ScreenAction};
