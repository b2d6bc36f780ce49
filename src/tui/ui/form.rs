//! Profile input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{CityTiers, Occupation, ProfileInput, ValidationError, ValidationErrors};
use crate::tui::styles::Theme;

const AGE: usize = 0;
const WEIGHT: usize = 1;
const HEIGHT: usize = 2;
const INCOME: usize = 3;
const SMOKER: usize = 4;
const CITY: usize = 5;
const OCCUPATION: usize = 6;

/// Selector entry for cities outside both tier lists.
pub const OTHER_CITY: &str = "Other";

/// How a field accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    YesNo,
    /// Free text, with Left/Right cycling through known cities
    City,
    Occupation,
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
    default: &'static str,
}

impl FormField {
    fn new(label: &'static str, hint: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            label,
            hint,
            kind,
            value: default.to_string(),
            default,
        }
    }
}

/// Profile form state
pub struct ProfileFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    cities: Vec<String>,
}

impl Default for ProfileFormState {
    fn default() -> Self {
        Self::new(&CityTiers::default())
    }
}

impl ProfileFormState {
    /// Build the form; the city selector offers every listed city plus "Other".
    #[must_use]
    pub fn new(tiers: &CityTiers) -> Self {
        let mut cities: Vec<String> = tiers.known_cities().into_iter().map(String::from).collect();
        cities.push(OTHER_CITY.to_string());
        let default_city = "Mumbai";

        let mut state = Self {
            fields: vec![
                FormField::new("Age", "years (1-120)", FieldKind::Integer, "30"),
                FormField::new("Weight (kg)", "0-150", FieldKind::Decimal, "70"),
                FormField::new("Height (m)", "0-2.5", FieldKind::Decimal, "1.75"),
                FormField::new("Annual Income (LPA)", "0-100", FieldKind::Decimal, "10"),
                FormField::new("Smoker", "[←→] Yes/No", FieldKind::YesNo, "No"),
                FormField::new("City", "type or [←→] to pick", FieldKind::City, default_city),
                FormField::new(
                    "Occupation",
                    "[←→] to pick",
                    FieldKind::Occupation,
                    Occupation::Retired.as_str(),
                ),
            ],
            selected_field: 0,
            error_message: None,
            cities,
        };
        if !state.cities.iter().any(|c| c == default_city) {
            state.fields[CITY].value = state.cities[0].clone();
        }
        state
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = match field.kind {
            FieldKind::Integer => c.is_ascii_digit() || c == '-',
            FieldKind::Decimal => c.is_ascii_digit() || c == '.' || c == '-',
            FieldKind::City => !c.is_control(),
            FieldKind::YesNo => {
                match c {
                    'y' | 'Y' => field.value = "Yes".to_string(),
                    'n' | 'N' => field.value = "No".to_string(),
                    ' ' => Self::toggle(&mut field.value),
                    _ => return,
                }
                self.error_message = None;
                return;
            }
            FieldKind::Occupation => false,
        };
        if accepted {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if matches!(field.kind, FieldKind::Integer | FieldKind::Decimal | FieldKind::City) {
            field.value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if matches!(field.kind, FieldKind::Integer | FieldKind::Decimal | FieldKind::City) {
            field.value.clear();
        }
    }

    /// Step a selector field forward or back. No-op on text fields.
    pub fn cycle(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::YesNo => Self::toggle(&mut field.value),
            FieldKind::City => {
                field.value = step(&self.cities, &field.value, forward);
            }
            FieldKind::Occupation => {
                let names: Vec<&str> = Occupation::ALL.iter().map(Occupation::as_str).collect();
                field.value = step(&names, &field.value, forward);
            }
            FieldKind::Integer | FieldKind::Decimal => return,
        }
        self.error_message = None;
    }

    fn toggle(value: &mut String) {
        *value = if value == "Yes" { "No" } else { "Yes" }.to_string();
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        self.clear_sensitive();
        for field in self.fields.iter_mut() {
            field.value = field.default.to_string();
        }
    }

    /// Wipe all field buffers from memory.
    ///
    /// Called once a quote is underway so the raw inputs do not linger in UI
    /// state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse the form into raw profile input. Range checks are left to
    /// `UserProfile`; this only rejects text that is not a number.
    ///
    /// # Errors
    /// Returns one `NotANumber` per unparseable numeric field.
    pub fn to_profile_input(&self) -> Result<ProfileInput, ValidationErrors> {
        let mut errors = Vec::new();

        let age = self.fields[AGE].value.trim().parse::<i64>().map_err(|_| {
            errors.push(ValidationError::NotANumber {
                field: "age",
                input: self.fields[AGE].value.clone(),
            })
        });
        let mut decimal = |index: usize, name: &'static str| {
            self.fields[index].value.trim().parse::<f64>().map_err(|_| {
                errors.push(ValidationError::NotANumber {
                    field: name,
                    input: self.fields[index].value.clone(),
                })
            })
        };
        let weight_kg = decimal(WEIGHT, "weight_kg");
        let height_m = decimal(HEIGHT, "height_m");
        let income_lpa = decimal(INCOME, "income_lpa");

        match (age, weight_kg, height_m, income_lpa) {
            (Ok(age), Ok(weight_kg), Ok(height_m), Ok(income_lpa)) => Ok(ProfileInput {
                age,
                weight_kg,
                height_m,
                income_lpa,
                is_smoker: self.fields[SMOKER].value == "Yes",
                city: self.fields[CITY].value.clone(),
                occupation: self.fields[OCCUPATION].value.clone(),
            }),
            _ => Err(ValidationErrors::from_vec(errors)
                .unwrap_or_else(|| ValidationError::Malformed("unparseable form".into()).into())),
        }
    }
}

fn step<S: AsRef<str>>(options: &[S], current: &str, forward: bool) -> String {
    if options.is_empty() {
        return current.to_string();
    }
    let len = options.len();
    let next = match options.iter().position(|o| o.as_ref() == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    options[next].as_ref().to_string()
}

/// Render the profile input form
pub fn render_profile_form(f: &mut Frame, area: Rect, state: &ProfileFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Insurance Premium Predictor", Theme::title()),
        Span::styled(" │ Enter your details", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &ProfileFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (Theme::border_focused(), Theme::focused())
        } else {
            (Theme::border(), Theme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let is_selector = matches!(field.kind, FieldKind::YesNo | FieldKind::Occupation);
        let mut spans = vec![Span::raw(" ")];
        if is_selector && is_selected {
            spans.push(Span::styled("◀ ", Theme::cursor()));
        }
        if field.value.is_empty() {
            spans.push(Span::styled(field.hint, Theme::text_muted()));
        } else {
            spans.push(Span::styled(field.value.as_str(), Theme::text()));
        }
        if is_selected {
            if is_selector {
                spans.push(Span::styled(" ▶", Theme::cursor()));
            } else {
                spans.push(Span::styled("▌", Theme::cursor()));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &ProfileFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", Theme::danger()),
            Span::styled(err.clone(), Theme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", Theme::key_hint()),
            Span::styled("Navigate ", Theme::key_desc()),
            Span::styled("[←→] ", Theme::key_hint()),
            Span::styled("Change ", Theme::key_desc()),
            Span::styled("[Enter] ", Theme::key_hint()),
            Span::styled("Predict ", Theme::key_desc()),
            Span::styled("[Ctrl+R] ", Theme::key_hint()),
            Span::styled("Reset ", Theme::key_desc()),
            Span::styled("[Ctrl+Q] ", Theme::key_hint()),
            Span::styled("Quit", Theme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let form = ProfileFormState::default();
        let input = form.to_profile_input().expect("defaults parse");
        assert_eq!(input.age, 30);
        assert_eq!(input.height_m, 1.75);
        assert!(!input.is_smoker);
        assert_eq!(input.city, "Mumbai");
        assert_eq!(input.occupation, "retired");
    }

    #[test]
    fn test_numeric_fields_filter_characters() {
        let mut form = ProfileFormState::default();
        form.clear_field();
        for c in "4x2.".chars() {
            form.input_char(c);
        }
        assert_eq!(form.fields[AGE].value, "42");
    }

    #[test]
    fn test_unparseable_numbers_are_reported_per_field() {
        let mut form = ProfileFormState::default();
        form.fields[WEIGHT].value = "7.0.1".to_string();
        form.fields[INCOME].value.clear();

        let errors = form.to_profile_input().expect_err("should fail");
        let fields: Vec<_> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, ["weight_kg", "income_lpa"]);
    }

    #[test]
    fn test_selectors_cycle_and_wrap() {
        let mut form = ProfileFormState::default();

        form.selected_field = SMOKER;
        form.cycle(true);
        assert_eq!(form.fields[SMOKER].value, "Yes");
        form.input_char('n');
        assert_eq!(form.fields[SMOKER].value, "No");

        form.selected_field = OCCUPATION;
        form.cycle(false);
        assert_eq!(form.fields[OCCUPATION].value, "private_job");
        form.cycle(true);
        assert_eq!(form.fields[OCCUPATION].value, "retired");
        form.input_char('x');
        assert_eq!(form.fields[OCCUPATION].value, "retired");

        form.selected_field = CITY;
        form.cycle(true);
        assert_eq!(form.fields[CITY].value, "Delhi");
        form.cycle(false);
        form.cycle(false);
        assert_eq!(form.fields[CITY].value, OTHER_CITY);
    }

    #[test]
    fn test_city_accepts_free_text() {
        let mut form = ProfileFormState::default();
        form.selected_field = CITY;
        form.clear_field();
        for c in "Navi Mumbai".chars() {
            form.input_char(c);
        }
        assert_eq!(form.to_profile_input().expect("parse").city, "Navi Mumbai");
    }

    #[test]
    fn test_clear_sensitive_and_reset() {
        let mut form = ProfileFormState::default();
        form.selected_field = INCOME;
        form.error_message = Some("x".into());

        form.clear_sensitive();
        assert!(form.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(form.selected_field, 0);
        assert!(form.error_message.is_none());

        form.reset();
        assert_eq!(form.fields[AGE].value, "30");
        assert_eq!(form.fields[SMOKER].value, "No");
    }
}
