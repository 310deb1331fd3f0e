use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, PlanColumn, PlanMode, PlanState},
    config::PlanStyle,
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Some(plan) = state.plan.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_grid(frame, layout[0], plan, state.plan_style, &theme);
    render_input(frame, layout[1], plan, &theme);
}

fn render_grid(
    frame: &mut Frame<'_>,
    area: Rect,
    plan: &PlanState,
    style: PlanStyle,
    theme: &Theme,
) {
    let style_label = match style {
        PlanStyle::Grid => "edición en tabla",
        PlanStyle::Instant => "edición inmediata",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" {} · {style_label} ", plan.view.list()));

    if plan.view.rows().is_empty() {
        let empty = Paragraph::new(Line::from(
            "No hay productos. Pulsa i para una fila nueva o a para agregar.",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.dim))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        PlanColumn::ALL
            .iter()
            .map(|column| Cell::from(column.label()))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::BOLD),
    );

    let editing = match &plan.mode {
        PlanMode::EditCell(buffer) => Some(buffer.as_str()),
        PlanMode::Browse | PlanMode::QuickAdd(_) => None,
    };

    let rows = plan.view.rows().iter().enumerate().map(|(idx, row)| {
        let cells = PlanColumn::ALL.iter().map(|column| {
            let selected = idx == plan.row && *column == plan.column;
            let text = match (selected, editing) {
                (true, Some(buffer)) => format!("{buffer}▏"),
                _ => match column {
                    PlanColumn::Name if row.name.is_empty() => "…".to_string(),
                    PlanColumn::Name => row.name.clone(),
                    PlanColumn::Category => row.category.to_string(),
                    PlanColumn::Quantity => engine::codec::format_decimal(row.quantity),
                    PlanColumn::Unit => row.unit.to_string(),
                },
            };
            let cell_style = if selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(theme.text)
            };
            Cell::from(text).style(cell_style)
        });
        Row::new(cells.collect::<Vec<_>>())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block);

    let mut table_state = TableState::default();
    table_state.select(Some(plan.row));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, plan: &PlanState, theme: &Theme) {
    let (title, text) = match &plan.mode {
        PlanMode::QuickAdd(buffer) => (
            " Agregar: [cantidad] [unidad] nombre [#categoría] ",
            Span::styled(format!("{buffer}▏"), Style::default().fg(theme.accent)),
        ),
        PlanMode::EditCell(_) => (
            " Editando ",
            Span::styled(
                format!("{}: Enter acepta, Esc cancela.", plan.column.label()),
                Style::default().fg(theme.dim),
            ),
        ),
        PlanMode::Browse => (
            " Ayuda ",
            Span::styled(
                "Enter edita el texto; +/- o espacio cambian categoría y unidad.",
                Style::default().fg(theme.dim),
            ),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(title);
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}
