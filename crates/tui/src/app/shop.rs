use std::collections::HashSet;

use engine::{Category, ItemId, ShoppingView};

use crate::{error::Result, quick_add, ui::keymap::AppAction};

use super::{App, ToastLevel, is_amount_char, message_for_error, parse_amount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopMode {
    Browse,
    EditPrice(String),
    QuickAdd(String),
}

/// A visible line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopRow {
    Header(Category),
    Item(ItemId),
}

#[derive(Debug)]
pub struct ShopState {
    pub view: ShoppingView,
    pub cursor: usize,
    pub collapsed: HashSet<Category>,
    pub mode: ShopMode,
}

impl ShopState {
    pub fn new(view: ShoppingView) -> Self {
        Self {
            view,
            cursor: 0,
            collapsed: HashSet::new(),
            mode: ShopMode::Browse,
        }
    }

    /// Section headers, each followed by its items unless collapsed.
    pub fn rows(&self) -> Vec<ShopRow> {
        let mut rows = Vec::new();
        for section in self.view.sections() {
            let collapsed = self.collapsed.contains(&section.category);
            rows.push(ShopRow::Header(section.category));
            if !collapsed {
                rows.extend(section.items.iter().map(|item| ShopRow::Item(item.id)));
            }
        }
        rows
    }

    pub fn current(&self) -> Option<ShopRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if down {
            (self.cursor + 1).min(len - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows().len().saturating_sub(1));
    }

    fn toggle_section(&mut self, category: Category) {
        if !self.collapsed.remove(&category) {
            self.collapsed.insert(category);
        }
        self.clamp_cursor();
    }

    fn price_of(&self, id: ItemId) -> Option<f64> {
        self.view
            .effective_items()
            .into_iter()
            .find(|item| item.id == id)
            .map(|item| item.price)
    }
}

impl App {
    pub(super) async fn handle_shop(&mut self, action: AppAction) -> Result<()> {
        let Some(shop) = self.state.shop.as_mut() else {
            return Ok(());
        };
        match shop.mode.clone() {
            ShopMode::Browse => self.handle_shop_browse(action).await,
            ShopMode::EditPrice(buffer) => self.handle_shop_price(action, buffer),
            ShopMode::QuickAdd(buffer) => self.handle_shop_quick_add(action, buffer).await,
        }
        Ok(())
    }

    async fn handle_shop_browse(&mut self, action: AppAction) {
        let Some(shop) = self.state.shop.as_mut() else {
            return;
        };
        match action {
            AppAction::Up | AppAction::Input('k') => shop.move_cursor(false),
            AppAction::Down | AppAction::Input('j') => shop.move_cursor(true),
            AppAction::Submit | AppAction::Input(' ') => match shop.current() {
                Some(ShopRow::Header(category)) => shop.toggle_section(category),
                Some(ShopRow::Item(id)) => {
                    shop.view.toggle(id);
                }
                None => {}
            },
            AppAction::Input('p') => {
                if let Some(ShopRow::Item(id)) = shop.current() {
                    let current = shop.price_of(id).unwrap_or_default();
                    let buffer = if current > 0.0 {
                        engine::codec::format_decimal(current)
                    } else {
                        String::new()
                    };
                    shop.mode = ShopMode::EditPrice(buffer);
                }
            }
            AppAction::Input('a') => shop.mode = ShopMode::QuickAdd(String::new()),
            AppAction::Input('s') => self.save_shop().await,
            AppAction::Input('x') => {
                shop.view.discard();
                self.state.toast(ToastLevel::Info, "Cambios descartados.");
            }
            AppAction::Input('m') => {
                let dirty = shop.view.is_dirty();
                self.switch_view(dirty).await;
            }
            AppAction::Input('b') | AppAction::Cancel => {
                if shop.view.is_dirty() {
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

    fn handle_shop_price(&mut self, action: AppAction, mut buffer: String) {
        let Some(shop) = self.state.shop.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => shop.mode = ShopMode::Browse,
            AppAction::Backspace => {
                buffer.pop();
                shop.mode = ShopMode::EditPrice(buffer);
            }
            AppAction::Input(ch) if is_amount_char(ch) => {
                buffer.push(ch);
                shop.mode = ShopMode::EditPrice(buffer);
            }
            AppAction::Submit => {
                let Some(ShopRow::Item(id)) = shop.current() else {
                    shop.mode = ShopMode::Browse;
                    return;
                };
                let Some(price) = parse_amount(&buffer) else {
                    self.state.toast(ToastLevel::Error, "Precio no válido.");
                    return;
                };
                match shop.view.set_price(id, price) {
                    Ok(_) => shop.mode = ShopMode::Browse,
                    Err(err) => self.state.toast(ToastLevel::Error, message_for_error(&err)),
                }
            }
            _ => {}
        }
    }

    async fn handle_shop_quick_add(&mut self, action: AppAction, mut buffer: String) {
        let Some(shop) = self.state.shop.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => shop.mode = ShopMode::Browse,
            AppAction::Backspace => {
                buffer.pop();
                shop.mode = ShopMode::QuickAdd(buffer);
            }
            AppAction::Input(ch) => {
                buffer.push(ch);
                shop.mode = ShopMode::QuickAdd(buffer);
            }
            AppAction::Submit => {
                let new_item = match quick_add::parse(&buffer) {
                    Ok(new_item) => new_item,
                    Err(message) => {
                        self.state.toast(ToastLevel::Error, message);
                        return;
                    }
                };
                match shop.view.quick_add(&self.engine, new_item).await {
                    Ok(added) => {
                        shop.mode = ShopMode::Browse;
                        shop.clamp_cursor();
                        self.state
                            .toast(ToastLevel::Success, format!("\"{}\" agregado.", added.name));
                    }
                    Err(err) => self.state.toast(ToastLevel::Error, message_for_error(&err)),
                }
            }
            _ => {}
        }
    }

    /// Writes the buffered edits. On failure they stay in place for a retry.
    async fn save_shop(&mut self) {
        let Some(shop) = self.state.shop.as_mut() else {
            return;
        };
        if !shop.view.is_dirty() {
            self.state.toast(ToastLevel::Info, "Nada que guardar.");
            return;
        }
        match shop.view.save(&self.engine).await {
            Ok(()) => {
                shop.clamp_cursor();
                self.state.toast(ToastLevel::Success, "Lista guardada.");
            }
            Err(err) => {
                tracing::warn!(list = shop.view.list(), error = %err, "shopping save failed");
                self.state.toast(ToastLevel::Error, message_for_error(&err));
            }
        }
    }
}
