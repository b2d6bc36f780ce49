//! Quote result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::Quote;
use crate::tui::styles::Theme;

/// Quote screen state
#[derive(Debug, Clone, Default)]
pub enum QuoteState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting on the predictor
    Predicting { progress: f64 },
    /// Finished with a quote
    Complete { quote: Box<Quote> },
    /// Prediction failed
    Error { message: String },
}

/// User-facing text for a failed prediction.
#[must_use]
pub fn error_text(message: &str) -> String {
    format!("An error occurred during prediction: {message}")
}

/// Render the quote view
pub fn render_quote(f: &mut Frame, area: Rect, state: &QuoteState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_quote_header(f, chunks[0]);
    match state {
        QuoteState::Idle => render_idle(f, chunks[1]),
        QuoteState::Predicting { progress } => render_progress(f, chunks[1], *progress),
        QuoteState::Complete { quote } => render_result(f, chunks[1], quote),
        QuoteState::Error { message } => render_error(f, chunks[1], message),
    }
    render_quote_footer(f, chunks[2], state);
}

fn render_quote_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Premium Quote", Theme::title()),
        Span::styled(" │ Predicted category", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form and press Enter to predict",
            Theme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", Theme::text_secondary()),
        Span::styled("Predicting", Theme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage, chunks[0]);

    let progress = progress.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(Theme::info())
        .percent((progress * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "Waiting for the model...",
        Theme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, quote: &Quote) {
    let block = Block::default()
        .title(Span::styled(" Quote Result ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category
            Constraint::Length(4), // Confidence
            Constraint::Length(3), // BMI
            Constraint::Min(0),    // Derived features
        ])
        .margin(1)
        .split(inner);

    let category = &quote.prediction.predicted_category;
    let category_style = Theme::category(category);
    let headline = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Predicted Insurance Premium Category: {category}"),
            category_style,
        )),
        Line::from(Span::styled(
            quote.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            Theme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    if let Some(confidence) = quote.prediction.confidence {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(" Confidence ", Theme::text_secondary()))
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .gauge_style(category_style)
            .percent((confidence.clamp(0.0, 1.0) * 100.0) as u16)
            .label(format!("{:.1}%", confidence * 100.0));
        f.render_widget(gauge, chunks[1]);
    }

    let bmi = Paragraph::new(Line::from(vec![
        Span::styled("BMI: ", Theme::text_secondary()),
        Span::styled(format!("{:.2} ", quote.features.bmi()), Theme::text()),
        Span::styled(
            format!("({})", quote.bmi_category),
            Theme::bmi_category(quote.bmi_category),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(bmi, chunks[2]);

    let features = &quote.features;
    let details = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Age group: ", Theme::text_secondary()),
            Span::styled(features.age_group().to_string(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Lifestyle risk: ", Theme::text_secondary()),
            Span::styled(
                features.lifestyle_risk().to_string(),
                Theme::lifestyle_risk(features.lifestyle_risk()),
            ),
        ]),
        Line::from(vec![
            Span::styled("City tier: ", Theme::text_secondary()),
            Span::styled(features.city_tier().to_string(), Theme::text()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(details, chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", Theme::danger())),
        Line::from(""),
        Line::from(Span::styled(error_text(message), Theme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::danger()),
    );

    f.render_widget(content, area);
}

fn render_quote_footer(f: &mut Frame, area: Rect, state: &QuoteState) {
    let content = match state {
        QuoteState::Complete { .. } | QuoteState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", Theme::key_hint()),
            Span::styled("New Quote ", Theme::key_desc()),
            Span::styled("[Ctrl+Q] ", Theme::key_hint()),
            Span::styled("Quit", Theme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled("Processing...", Theme::text_muted())]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}
