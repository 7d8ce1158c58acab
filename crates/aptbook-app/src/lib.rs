//! Client application: cache, alarm engine, tick loop, views and CLI.

pub mod actions;
pub mod alarm;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod ticker;
pub mod views;

pub use alarm::{AlarmEngine, AlarmKey, Reminder};
pub use cache::AppointmentCache;
pub use config::{AppConfig, ConfigError};
pub use error::{AppError, AppResult};
pub use notify::{NotifyConfig, ReminderNotifier};
pub use session::Session;
pub use ticker::{Ticker, TickerConfig, TickerHandle};
