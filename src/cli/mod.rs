pub mod app;
pub mod commands;
pub mod display;
pub mod session;

pub use app::{Cli, Commands, ListFormat, LogLevel, ShowFormat};
pub use session::Session;
