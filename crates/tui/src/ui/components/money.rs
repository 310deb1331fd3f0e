use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Formats a price as `$1,234.50`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// A price span; zero is dimmed since it means "not entered yet".
#[must_use]
pub fn styled_price(amount: f64, theme: &Theme) -> Span<'static> {
    let color = if amount > 0.0 { theme.text } else { theme.dim };
    Span::styled(format_price(amount), Style::default().fg(color))
}

/// Bold span for totals.
#[must_use]
pub fn styled_total(amount: f64, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_price(amount),
        Style::default()
            .fg(theme.positive)
            .add_modifier(Modifier::BOLD),
    )
}
