use engine::{Seed, ViewMode};

use crate::{error::Result, ui::keymap::AppAction};

use super::{App, ToastLevel, message_for_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorTab {
    Shop,
    Plan,
}

impl SelectorTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Shop => "Comprar",
            Self::Plan => "Planificar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewListField {
    Name,
    Base,
}

#[derive(Debug)]
pub struct SelectorState {
    pub tab: SelectorTab,
    /// Newest first.
    pub lists: Vec<String>,
    pub selected: usize,
    pub name: String,
    /// Index into [`SelectorState::base_options`].
    pub base: usize,
    pub focus: NewListField,
}

impl SelectorState {
    pub fn new(default_name: String) -> Self {
        Self {
            tab: SelectorTab::Shop,
            lists: Vec::new(),
            selected: 0,
            name: default_name,
            base: 0,
            focus: NewListField::Name,
        }
    }

    /// Takes the names in ascending order and shows the newest first.
    pub fn set_lists(&mut self, mut lists: Vec<String>) {
        lists.reverse();
        self.lists = lists;
        self.selected = self.selected.min(self.lists.len().saturating_sub(1));
        self.base = self.base.min(self.base_count() - 1);
    }

    /// Labels of the new-list base selector.
    pub fn base_options(&self) -> Vec<String> {
        let mut options = vec![
            "Vacía".to_string(),
            "Plantilla por defecto".to_string(),
        ];
        options.extend(self.lists.iter().map(|list| format!("Copia de {list}")));
        options
    }

    pub fn seed(&self) -> Seed {
        match self.base {
            0 => Seed::Empty,
            1 => Seed::DefaultTemplate,
            n => self
                .lists
                .get(n - 2)
                .map_or(Seed::Empty, |list| Seed::CopyOf(list.clone())),
        }
    }

    pub fn selected_list(&self) -> Option<&str> {
        self.lists.get(self.selected).map(String::as_str)
    }

    fn base_count(&self) -> usize {
        self.lists.len() + 2
    }

    fn cycle_base(&mut self, forward: bool) {
        let count = self.base_count();
        self.base = if forward {
            (self.base + 1) % count
        } else {
            (self.base + count - 1) % count
        };
    }

    fn select_next(&mut self) {
        if self.lists.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.lists.len() - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

impl App {
    pub(super) async fn handle_selector(&mut self, action: AppAction) -> Result<()> {
        match self.state.selector.tab {
            SelectorTab::Shop => self.handle_selector_shop(action).await,
            SelectorTab::Plan => self.handle_selector_plan(action).await,
        }
        Ok(())
    }

    async fn handle_selector_shop(&mut self, action: AppAction) {
        let selector = &mut self.state.selector;
        match action {
            AppAction::Up | AppAction::Input('k') => selector.select_prev(),
            AppAction::Down | AppAction::Input('j') => selector.select_next(),
            AppAction::NextField | AppAction::PrevField | AppAction::Right => {
                selector.tab = SelectorTab::Plan;
                selector.focus = NewListField::Name;
            }
            AppAction::Input('r') => self.refresh_lists().await,
            AppAction::Submit => {
                let Some(list) = selector.selected_list().map(ToString::to_string) else {
                    self.state
                        .toast(ToastLevel::Info, "Todavía no hay listas: crea una en Planificar.");
                    return;
                };
                self.open_list(&list, ViewMode::Shop).await;
            }
            _ => {}
        }
    }

    async fn handle_selector_plan(&mut self, action: AppAction) {
        let selector = &mut self.state.selector;
        match (selector.focus, action) {
            (_, AppAction::Submit) => self.create_list().await,
            (_, AppAction::Cancel) => selector.tab = SelectorTab::Shop,
            (NewListField::Name, AppAction::NextField | AppAction::Down) => {
                selector.focus = NewListField::Base;
            }
            (NewListField::Name, AppAction::PrevField) => selector.tab = SelectorTab::Shop,
            (NewListField::Name, AppAction::Backspace) => {
                selector.name.pop();
            }
            (NewListField::Name, AppAction::Input(ch)) => selector.name.push(ch),
            (NewListField::Base, AppAction::NextField) => selector.tab = SelectorTab::Shop,
            (NewListField::Base, AppAction::PrevField | AppAction::Up) => {
                selector.focus = NewListField::Name;
            }
            (NewListField::Base, AppAction::Right | AppAction::Input(' ' | 'l')) => {
                selector.cycle_base(true);
            }
            (NewListField::Base, AppAction::Left | AppAction::Input('h')) => {
                selector.cycle_base(false);
            }
            _ => {}
        }
    }

    async fn create_list(&mut self) {
        let name = self.state.selector.name.clone();
        let seed = self.state.selector.seed();
        match self.engine.new_list(&name, seed).await {
            Ok(outcome) => {
                let mut message = format!("Lista \"{}\" creada.", outcome.name);
                if let Some(evicted) = &outcome.evicted {
                    message.push_str(&format!(" Se eliminó \"{evicted}\"."));
                }
                self.state.toast(ToastLevel::Success, message);
                if let Some(err) = &outcome.eviction_error {
                    self.state.toast(
                        ToastLevel::Error,
                        format!("Lista creada, pero no se pudo eliminar la más antigua: {err}"),
                    );
                }
                let default_name = self.default_list_name();
                let selector = &mut self.state.selector;
                selector.name = default_name;
                selector.base = 0;
                selector.focus = NewListField::Name;
                selector.tab = SelectorTab::Shop;
                self.open_list(&outcome.name, ViewMode::Plan).await;
            }
            Err(err) => {
                tracing::warn!(list = %name, error = %err, "list not created");
                self.state.toast(ToastLevel::Error, message_for_error(&err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector_with(lists: &[&str]) -> SelectorState {
        let mut selector = SelectorState::new("Lista 2024-06-01".to_string());
        selector.set_lists(lists.iter().map(ToString::to_string).collect());
        selector
    }

    #[test]
    fn lists_show_newest_first() {
        let selector = selector_with(&["Lista 2024-05-01", "Lista 2024-06-01"]);
        assert_eq!(selector.selected_list(), Some("Lista 2024-06-01"));
    }

    #[test]
    fn base_options_map_to_seeds() {
        let mut selector = selector_with(&["A", "B"]);
        assert_eq!(selector.base_options().len(), 4);
        assert_eq!(selector.seed(), Seed::Empty);
        selector.cycle_base(true);
        assert_eq!(selector.seed(), Seed::DefaultTemplate);
        selector.cycle_base(true);
        assert_eq!(selector.seed(), Seed::CopyOf("B".to_string()));
        selector.cycle_base(false);
        selector.cycle_base(false);
        selector.cycle_base(false);
        assert_eq!(selector.seed(), Seed::CopyOf("A".to_string()));
    }

    #[test]
    fn shrinking_lists_clamps_selection() {
        let mut selector = selector_with(&["A", "B", "C"]);
        selector.selected = 2;
        selector.base = 4;
        selector.set_lists(vec!["A".to_string()]);
        assert_eq!(selector.selected, 0);
        assert_eq!(selector.base, 2);
    }
}
