//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::Theme;

pub const DISCLAIMER: &str =
    "Disclaimer: This is a predictive model and the results are an estimation, not a guaranteed quote.";

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Theme::border());

    let p = Paragraph::new(Line::from(Span::styled(DISCLAIMER, Theme::text_muted())))
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
