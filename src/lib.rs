// Personal Finance Dashboard - Core Library
// Exposes the record store and dashboard for the CLI/TUI, the web server and tests

pub mod config;
pub mod dashboard;
pub mod error;
pub mod record;
pub mod store;
pub mod views;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use dashboard::{ActionStatus, Dashboard, DashboardView, EntryForm, RawAmount};
pub use error::{Field, StoreError, ValidationError};
pub use record::{parse_amount, parse_calendar_day, parse_date, validate_entry, Record};
pub use store::{RecordStore, Totals};
pub use views::{build_charts, Charts, Figure, Trace};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
