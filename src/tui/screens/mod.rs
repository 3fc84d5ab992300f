//! Screen implementations for the ridehail TUI

pub mod login;
pub mod menu;
pub mod registration;
pub mod trips;

pub use login::LoginScreen;
pub use menu::MenuScreen;
pub use registration::RegistrationScreen;
pub use trips::TripsScreen;
