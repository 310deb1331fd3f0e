use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, NewListField, SelectorTab},
    ui::{components::tabs::render_tabs, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_tabs(frame, layout[0], state.selector.tab, &theme);
    match state.selector.tab {
        SelectorTab::Shop => render_lists(frame, layout[1], state, &theme),
        SelectorTab::Plan => render_new_list(frame, layout[1], state, &theme),
    }
}

fn render_lists(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(" Listas ");

    if state.selector.lists.is_empty() {
        let empty = Paragraph::new(Line::from(
            "Todavía no hay listas. Pulsa Tab para crear una.",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.dim))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items = state
        .selector
        .lists
        .iter()
        .map(|list| ListItem::new(Line::from(list.as_str())))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selector.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_new_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(" Nueva lista ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let selector = &state.selector;
    let field_style = |field: NewListField| {
        if selector.focus == field {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        }
    };

    let cursor = if selector.focus == NewListField::Name {
        "▏"
    } else {
        ""
    };
    let name = Line::from(vec![
        Span::styled("Nombre: ", Style::default().fg(theme.dim)),
        Span::styled(
            format!("{}{cursor}", selector.name),
            field_style(NewListField::Name),
        ),
    ]);
    frame.render_widget(Paragraph::new(name), rows[0]);

    let options = selector.base_options();
    let base_label = options
        .get(selector.base)
        .map(String::as_str)
        .unwrap_or_default();
    let base = Line::from(vec![
        Span::styled("Base:   ", Style::default().fg(theme.dim)),
        Span::styled(format!("‹ {base_label} ›"), field_style(NewListField::Base)),
    ]);
    frame.render_widget(Paragraph::new(base), rows[2]);

    let note = Line::from(Span::styled(
        format!(
            "Se guardan hasta {} listas; al crear una más se elimina la más antigua.",
            engine::MAX_LISTS
        ),
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(note), rows[3]);
}
