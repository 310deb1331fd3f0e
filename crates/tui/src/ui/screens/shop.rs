use engine::{Item, Totals};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, ShopMode, ShopRow, ShopState},
    ui::{
        components::money::{styled_price, styled_total},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let Some(shop) = state.shop.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(layout[0]);

    render_items(frame, columns[0], shop, &theme);
    render_totals(frame, columns[1], shop.view.totals(state.zero_groups), &theme);
    render_input(frame, layout[1], shop, &theme);
}

fn render_items(frame: &mut Frame<'_>, area: Rect, shop: &ShopState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" {} ", shop.view.list()));

    let sections = shop.view.sections();
    if sections.is_empty() {
        let empty = Paragraph::new(Line::from("La lista está vacía. Pulsa a para agregar."))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.dim))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::new();
    for section in &sections {
        let marker = if shop.collapsed.contains(&section.category) {
            "▸"
        } else {
            "▾"
        };
        lines.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("{marker} {} ", section.category),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({})", section.progress()),
                Style::default().fg(theme.dim),
            ),
        ])));
        if !shop.collapsed.contains(&section.category) {
            lines.extend(section.items.iter().map(|item| item_line(item, theme)));
        }
    }

    let mut list_state = ListState::default();
    list_state.select(Some(shop.cursor));

    let list = List::new(lines)
        .block(block)
        .highlight_style(Style::default().fg(theme.accent))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn item_line(item: &Item, theme: &Theme) -> ListItem<'static> {
    let (checkbox, name_style) = if item.is_checked {
        (
            "[x]",
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ]", Style::default().fg(theme.text))
    };
    ListItem::new(Line::from(vec![
        Span::raw(format!("  {checkbox} ")),
        Span::styled(item.name.clone(), name_style),
        Span::styled(
            format!(
                "  {} {}  ",
                engine::codec::format_decimal(item.quantity),
                item.unit
            ),
            Style::default().fg(theme.dim),
        ),
        styled_price(item.price, theme),
    ]))
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, totals: Option<Totals>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(" Total ");

    let Some(totals) = totals else {
        let empty = Paragraph::new(Line::from("No hay total para mostrar."))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.dim))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines: Vec<Line> = totals
        .by_category
        .iter()
        .map(|group| {
            Line::from(vec![
                Span::raw(format!("{}  ", group.category)),
                styled_price(group.total, theme),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Total: ", Style::default().add_modifier(Modifier::BOLD)),
        styled_total(totals.grand_total, theme),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, shop: &ShopState, theme: &Theme) {
    let (title, text) = match &shop.mode {
        ShopMode::Browse => {
            let text = match shop.current() {
                Some(ShopRow::Header(_)) => "Enter pliega o despliega la sección.",
                Some(ShopRow::Item(_)) => "Enter marca el producto, p pone el precio.",
                None => "",
            };
            (" Ayuda ", Span::styled(text, Style::default().fg(theme.dim)))
        }
        ShopMode::EditPrice(buffer) => (
            " Precio ",
            Span::styled(format!("${buffer}▏"), Style::default().fg(theme.accent)),
        ),
        ShopMode::QuickAdd(buffer) => (
            " Agregar: [cantidad] [unidad] nombre [#categoría] ",
            Span::styled(format!("{buffer}▏"), Style::default().fg(theme.accent)),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(title);
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}
