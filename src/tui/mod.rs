//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Profile form with inline validation errors
//! - Quote result with the derived features

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::Theme;
pub use worker::{QuoteProgress, QuoteWorker, QuoteWorkerHandle};
