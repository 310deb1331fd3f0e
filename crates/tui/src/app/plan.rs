use engine::{ItemField, PlanRow, PlanningView, RowKey};

use crate::{config::PlanStyle, error::Result, quick_add, ui::keymap::AppAction};

use super::{App, ToastLevel, is_amount_char, message_for_error, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanColumn {
    Name,
    Category,
    Quantity,
    Unit,
}

impl PlanColumn {
    pub const ALL: [PlanColumn; 4] = [
        PlanColumn::Name,
        PlanColumn::Category,
        PlanColumn::Quantity,
        PlanColumn::Unit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Producto",
            Self::Category => "Categoría",
            Self::Quantity => "Cantidad",
            Self::Unit => "Unidad",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Category => 1,
            Self::Quantity => 2,
            Self::Unit => 3,
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = if forward {
            (self.index() + 1) % len
        } else {
            (self.index() + len - 1) % len
        };
        Self::ALL[idx]
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanMode {
    Browse,
    EditCell(String),
    QuickAdd(String),
}

#[derive(Debug)]
pub struct PlanState {
    pub view: PlanningView,
    pub row: usize,
    pub column: PlanColumn,
    pub mode: PlanMode,
}

impl PlanState {
    pub fn new(view: PlanningView) -> Self {
        Self {
            view,
            row: 0,
            column: PlanColumn::Name,
            mode: PlanMode::Browse,
        }
    }

    pub fn current(&self) -> Option<&PlanRow> {
        self.view.rows().get(self.row)
    }

    fn current_key(&self) -> Option<RowKey> {
        self.current().map(|row| row.key)
    }

    fn move_row(&mut self, down: bool) {
        let len = self.view.rows().len();
        self.row = if down {
            (self.row + 1).min(len.saturating_sub(1))
        } else {
            self.row.saturating_sub(1)
        };
    }

    fn clamp_row(&mut self) {
        self.row = self.row.min(self.view.rows().len().saturating_sub(1));
    }

    /// Text the cell editor starts from.
    fn cell_text(&self) -> String {
        match (self.current(), self.column) {
            (Some(row), PlanColumn::Name) => row.name.clone(),
            (Some(row), PlanColumn::Quantity) => engine::codec::format_decimal(row.quantity),
            _ => String::new(),
        }
    }

    /// The select value after cycling the current cell, as a by-name field.
    fn cycled_field(&self, forward: bool) -> Option<ItemField> {
        let row = self.current()?;
        match (self.column, forward) {
            (PlanColumn::Category, true) => Some(ItemField::Category(row.category.cycle_next())),
            (PlanColumn::Category, false) => Some(ItemField::Category(row.category.cycle_prev())),
            (PlanColumn::Unit, true) => Some(ItemField::Unit(row.unit.cycle_next())),
            (PlanColumn::Unit, false) => Some(ItemField::Unit(row.unit.cycle_prev())),
            _ => None,
        }
    }

    /// Applies a field edit to the grid only.
    fn set_in_grid(&mut self, key: RowKey, field: ItemField) -> engine::ResultEngine<()> {
        match field {
            ItemField::Category(category) => {
                self.view.set_category(key, category);
            }
            ItemField::Unit(unit) => {
                self.view.set_unit(key, unit);
            }
            ItemField::Quantity(quantity) => {
                self.view.set_quantity(key, quantity)?;
            }
            ItemField::Price(_) | ItemField::Checked(_) => {}
        }
        Ok(())
    }
}

impl App {
    pub(super) async fn handle_plan(&mut self, action: AppAction) -> Result<()> {
        let Some(plan) = self.state.plan.as_mut() else {
            return Ok(());
        };
        match plan.mode.clone() {
            PlanMode::Browse => self.handle_plan_browse(action).await,
            PlanMode::EditCell(buffer) => self.handle_plan_cell(action, buffer).await,
            PlanMode::QuickAdd(buffer) => self.handle_plan_quick_add(action, buffer).await,
        }
        Ok(())
    }

    async fn handle_plan_browse(&mut self, action: AppAction) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        match action {
            AppAction::Up | AppAction::Input('k') => plan.move_row(false),
            AppAction::Down | AppAction::Input('j') => plan.move_row(true),
            AppAction::Left | AppAction::PrevField | AppAction::Input('h') => {
                plan.column = plan.column.step(false);
            }
            AppAction::Right | AppAction::NextField | AppAction::Input('l') => {
                plan.column = plan.column.step(true);
            }
            AppAction::Submit if plan.column.is_text() && plan.current().is_some() => {
                plan.mode = PlanMode::EditCell(plan.cell_text());
            }
            AppAction::Submit | AppAction::Input(' ' | '+') => self.cycle_cell(true).await,
            AppAction::Input('-') => self.cycle_cell(false).await,
            AppAction::Input('i') => {
                plan.view.insert_row();
                plan.row = plan.view.rows().len() - 1;
                plan.column = PlanColumn::Name;
                plan.mode = PlanMode::EditCell(String::new());
            }
            AppAction::Input('d') => self.delete_plan_row().await,
            AppAction::Input('a') => plan.mode = PlanMode::QuickAdd(String::new()),
            AppAction::Input('s') => self.save_plan().await,
            AppAction::Input('x') => {
                plan.view.discard();
                plan.clamp_row();
                self.state.toast(ToastLevel::Info, "Cambios descartados.");
            }
            AppAction::Input('m') => {
                let dirty = plan.view.is_dirty();
                self.switch_view(dirty).await;
            }
            AppAction::Input('b') | AppAction::Cancel => {
                if plan.view.is_dirty() {
                    self.state.toast(
                        ToastLevel::Error,
                        "Hay cambios sin guardar: s guarda, x descarta.",
                    );
                } else {
                    self.back_to_selector().await;
                }
            }
            _ => {}
        }
    }

    async fn handle_plan_cell(&mut self, action: AppAction, mut buffer: String) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => plan.mode = PlanMode::Browse,
            AppAction::Backspace => {
                buffer.pop();
                plan.mode = PlanMode::EditCell(buffer);
            }
            AppAction::Input(ch) if plan.column == PlanColumn::Name || is_amount_char(ch) => {
                buffer.push(ch);
                plan.mode = PlanMode::EditCell(buffer);
            }
            AppAction::Submit => {
                let Some(key) = plan.current_key() else {
                    plan.mode = PlanMode::Browse;
                    return;
                };
                match plan.column {
                    PlanColumn::Name => {
                        plan.view.set_name(key, &buffer);
                        plan.mode = PlanMode::Browse;
                    }
                    PlanColumn::Quantity => {
                        let Some(quantity) = parse_amount(&buffer) else {
                            self.state.toast(ToastLevel::Error, "Cantidad no válida.");
                            return;
                        };
                        plan.mode = PlanMode::Browse;
                        self.apply_plan_field(key, ItemField::Quantity(quantity))
                            .await;
                    }
                    PlanColumn::Category | PlanColumn::Unit => plan.mode = PlanMode::Browse,
                }
            }
            _ => {}
        }
    }

    async fn handle_plan_quick_add(&mut self, action: AppAction, mut buffer: String) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => plan.mode = PlanMode::Browse,
            AppAction::Backspace => {
                buffer.pop();
                plan.mode = PlanMode::QuickAdd(buffer);
            }
            AppAction::Input(ch) => {
                buffer.push(ch);
                plan.mode = PlanMode::QuickAdd(buffer);
            }
            AppAction::Submit => {
                let new_item = match quick_add::parse(&buffer) {
                    Ok(new_item) => new_item,
                    Err(message) => {
                        self.state.toast(ToastLevel::Error, message);
                        return;
                    }
                };
                match plan.view.quick_add(&self.engine, new_item).await {
                    Ok(added) => {
                        plan.mode = PlanMode::Browse;
                        plan.clamp_row();
                        self.state
                            .toast(ToastLevel::Success, format!("\"{}\" agregado.", added.name));
                    }
                    Err(err) => self.state.toast(ToastLevel::Error, message_for_error(&err)),
                }
            }
            _ => {}
        }
    }

    async fn cycle_cell(&mut self, forward: bool) {
        let Some(plan) = self.state.plan.as_ref() else {
            return;
        };
        let (Some(key), Some(field)) = (plan.current_key(), plan.cycled_field(forward)) else {
            return;
        };
        self.apply_plan_field(key, field).await;
    }

    /// Grid style edits the row in place. Instant style writes the field to
    /// every stored item with the row's name, then reloads; it refuses while
    /// other grid edits are pending because the reload would drop them.
    async fn apply_plan_field(&mut self, key: RowKey, field: ItemField) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        let stored = plan.view.loaded().iter().any(|item| item.id == key);
        if self.state.plan_style == PlanStyle::Grid || !stored {
            if let Err(err) = plan.set_in_grid(key, field) {
                self.state.toast(ToastLevel::Error, message_for_error(&err));
            }
            return;
        }
        if plan.view.is_dirty() {
            self.state.toast(
                ToastLevel::Error,
                "Guarda primero los cambios pendientes (s).",
            );
            return;
        }
        match plan.view.apply_now(&self.engine, key, field).await {
            Ok(matched) => {
                plan.clamp_row();
                tracing::debug!(matched, "instant edit written");
            }
            Err(err) => self.state.toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    async fn delete_plan_row(&mut self) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        let Some(key) = plan.current_key() else {
            return;
        };
        let stored = plan.view.loaded().iter().any(|item| item.id == key);
        if self.state.plan_style == PlanStyle::Grid || !stored {
            plan.view.remove_row(key);
            plan.clamp_row();
            return;
        }
        if plan.view.is_dirty() {
            self.state.toast(
                ToastLevel::Error,
                "Guarda primero los cambios pendientes (s).",
            );
            return;
        }
        match plan.view.remove_now(&self.engine, key).await {
            Ok(removed) => {
                plan.clamp_row();
                self.state
                    .toast(ToastLevel::Success, format!("{removed} producto(s) eliminado(s)."));
            }
            Err(err) => self.state.toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    /// Writes the grid. On failure the grid keeps its edits.
    async fn save_plan(&mut self) {
        let Some(plan) = self.state.plan.as_mut() else {
            return;
        };
        if !plan.view.is_dirty() {
            self.state.toast(ToastLevel::Info, "Nada que guardar.");
            return;
        }
        match plan.view.save(&self.engine).await {
            Ok(()) => {
                plan.clamp_row();
                self.state.toast(ToastLevel::Success, "Lista guardada.");
            }
            Err(err) => {
                tracing::warn!(list = plan.view.list(), error = %err, "planning save failed");
                self.state.toast(ToastLevel::Error, message_for_error(&err));
            }
        }
    }
}
