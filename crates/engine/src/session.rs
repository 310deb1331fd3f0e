//! Per-user session context: which list is open and in which view.

/// View the open list is shown in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    None,
    Plan,
    Shop,
}

impl ViewMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::None => "-",
            ViewMode::Plan => "Plan",
            ViewMode::Shop => "Shop",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    current_list: Option<String>,
    view_mode: ViewMode,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, list: impl Into<String>, mode: ViewMode) {
        self.current_list = Some(list.into());
        self.view_mode = mode;
    }

    /// Back to the list selector.
    pub fn close(&mut self) {
        self.current_list = None;
        self.view_mode = ViewMode::None;
    }

    #[must_use]
    pub fn current_list(&self) -> Option<&str> {
        self.current_list.as_deref()
    }

    /// Mode of the open list. A list opened without a mode is shown for shopping.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        match (self.current_list.is_some(), self.view_mode) {
            (true, ViewMode::None) => ViewMode::Shop,
            (_, mode) => mode,
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_close() {
        let mut session = Session::new();
        assert_eq!(session.current_list(), None);
        assert_eq!(session.view_mode(), ViewMode::None);

        session.open("Lista 2024-06-01", ViewMode::Plan);
        assert_eq!(session.current_list(), Some("Lista 2024-06-01"));
        assert_eq!(session.view_mode(), ViewMode::Plan);

        session.close();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn open_without_mode_defaults_to_shop() {
        let mut session = Session::new();
        session.open("Lista", ViewMode::None);
        assert_eq!(session.view_mode(), ViewMode::Shop);
    }
}
