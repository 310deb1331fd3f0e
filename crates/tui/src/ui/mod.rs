pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::ViewMode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, NewListField, PlanMode, SelectorTab, ShopMode};

use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    // Main layout: info bar, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    match state.session.view_mode() {
        ViewMode::None => screens::selector::render(frame, layout[1], state),
        ViewMode::Shop => screens::shop::render(frame, layout[1], state),
        ViewMode::Plan => screens::plan::render(frame, layout[1], state),
    }
    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let list = state.session.current_list().unwrap_or("-");
    let mode = match state.session.view_mode() {
        ViewMode::None => "Listas",
        ViewMode::Shop => "Comprar",
        ViewMode::Plan => "Planificar",
    };
    let dirty = match state.session.view_mode() {
        ViewMode::Shop => state.shop.as_ref().is_some_and(|shop| shop.view.is_dirty()),
        ViewMode::Plan => state.plan.as_ref().is_some_and(|plan| plan.view.is_dirty()),
        ViewMode::None => false,
    };

    let mut line = vec![
        Span::styled("Datos", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.backend)),
        Span::styled("Lista", Style::default().fg(theme.dim)),
        Span::raw(format!(": {list}  ")),
        Span::styled("Modo", Style::default().fg(theme.dim)),
        Span::raw(format!(": {mode}")),
    ];
    if dirty {
        line.push(Span::raw("  "));
        line.push(Span::styled("● sin guardar", Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints_to_spans(&context_hints(state), theme);
    parts.push(hint_separator(theme));
    let quit = if state.is_typing() { "Ctrl+C" } else { "q" };
    parts.extend(hints_to_spans(&[KeyHint::new(quit, "salir")], theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for the current screen and mode.
fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.session.view_mode() {
        ViewMode::None => selector_hints(state),
        ViewMode::Shop => match state.shop.as_ref().map(|shop| &shop.mode) {
            Some(ShopMode::EditPrice(_) | ShopMode::QuickAdd(_)) => editing_hints(),
            _ => vec![
                KeyHint::new("↑↓", "mover"),
                KeyHint::new("Enter", "marcar"),
                KeyHint::new("p", "precio"),
                KeyHint::new("a", "agregar"),
                KeyHint::new("s", "guardar"),
                KeyHint::new("x", "descartar"),
                KeyHint::new("m", "planificar"),
                KeyHint::new("b", "volver"),
            ],
        },
        ViewMode::Plan => match state.plan.as_ref().map(|plan| &plan.mode) {
            Some(PlanMode::EditCell(_) | PlanMode::QuickAdd(_)) => editing_hints(),
            _ => vec![
                KeyHint::new("↑↓←→", "mover"),
                KeyHint::new("Enter", "editar"),
                KeyHint::new("+/-", "cambiar"),
                KeyHint::new("i", "nueva fila"),
                KeyHint::new("d", "borrar"),
                KeyHint::new("a", "agregar"),
                KeyHint::new("s", "guardar"),
                KeyHint::new("x", "descartar"),
                KeyHint::new("m", "comprar"),
                KeyHint::new("b", "volver"),
            ],
        },
    }
}

fn selector_hints(state: &AppState) -> Vec<KeyHint> {
    match (state.selector.tab, state.selector.focus) {
        (SelectorTab::Shop, _) => vec![
            KeyHint::new("↑↓", "elegir"),
            KeyHint::new("Enter", "abrir"),
            KeyHint::new("Tab", "nueva lista"),
            KeyHint::new("r", "recargar"),
        ],
        (SelectorTab::Plan, NewListField::Name) => vec![
            KeyHint::new("Tab", "base"),
            KeyHint::new("Enter", "crear"),
            KeyHint::new("Esc", "volver"),
        ],
        (SelectorTab::Plan, NewListField::Base) => vec![
            KeyHint::new("←→", "cambiar base"),
            KeyHint::new("Enter", "crear"),
            KeyHint::new("Esc", "volver"),
        ],
    }
}

fn editing_hints() -> Vec<KeyHint> {
    vec![
        KeyHint::new("Enter", "aceptar"),
        KeyHint::new("Esc", "cancelar"),
    ]
}
