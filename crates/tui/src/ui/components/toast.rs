use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

/// Draws the toast in the bottom-right corner, above the hints bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let (icon, color) = match toast.level {
        ToastLevel::Info => ("i", theme.text),
        ToastLevel::Success => ("✓", theme.positive),
        ToastLevel::Error => ("✗", theme.error),
    };

    // Icon, space and the two borders.
    let wanted = toast.message.chars().count() + 6;
    let width = u16::try_from(wanted).unwrap_or(u16::MAX).min(area.width);
    let rect = Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(4),
        width,
        height: 3.min(area.height),
    };

    let line = Line::from(vec![
        Span::styled(format!("{icon} "), Style::default().fg(color)),
        Span::raw(toast.message.as_str()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(line).block(block), rect);
}
