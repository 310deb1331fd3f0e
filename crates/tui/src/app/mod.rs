use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{
    AnyStore, Backend, Engine, EngineError, PlanningView, Session, ShoppingView, ViewMode,
    ZeroGroups,
};

use crate::{
    config::{AppConfig, PlanStyle},
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

mod plan;
mod selector;
mod shop;

pub use plan::{PlanColumn, PlanMode, PlanState};
pub use selector::{NewListField, SelectorState, SelectorTab};
pub use shop::{ShopMode, ShopRow, ShopState};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub session: Session,
    pub selector: SelectorState,
    pub shop: Option<ShopState>,
    pub plan: Option<PlanState>,
    pub toast: Option<ToastState>,
    pub backend: Backend,
    pub plan_style: PlanStyle,
    pub zero_groups: ZeroGroups,
}

impl AppState {
    /// `true` while a text field has focus, so letters are not shortcuts.
    pub fn is_typing(&self) -> bool {
        match self.session.view_mode() {
            ViewMode::None => {
                self.selector.tab == SelectorTab::Plan && self.selector.focus == NewListField::Name
            }
            ViewMode::Shop => self
                .shop
                .as_ref()
                .is_some_and(|shop| shop.mode != ShopMode::Browse),
            ViewMode::Plan => self
                .plan
                .as_ref()
                .is_some_and(|plan| plan.mode != PlanMode::Browse),
        }
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }
}

pub struct App {
    config: AppConfig,
    engine: Engine<AnyStore>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    /// Opens the configured store and reads the lists once. Any failure here
    /// (bad credentials, unreachable spreadsheet) stops the program.
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let store = AnyStore::open(&config.storage)?;
        let backend = store.backend();
        let engine = Engine::builder().store(store).build()?;
        let lists = engine.lists().await?;
        tracing::info!(%backend, lists = lists.len(), "connected to spreadsheet");

        let mut selector = SelectorState::new(config.default_list_name(today()));
        selector.set_lists(lists);
        let zero_groups = if config.hide_zero_totals {
            ZeroGroups::Hide
        } else {
            ZeroGroups::Keep
        };
        let state = AppState {
            session: Session::new(),
            selector,
            shop: None,
            plan: None,
            toast: None,
            backend,
            plan_style: config.plan_style,
            zero_groups,
        };

        Ok(Self {
            config,
            engine,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key).await?;
            }
            self.state.expire_toast();
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key, self.state.is_typing());
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }
        match self.state.session.view_mode() {
            ViewMode::None => self.handle_selector(action).await,
            ViewMode::Shop => self.handle_shop(action).await,
            ViewMode::Plan => self.handle_plan(action).await,
        }
    }

    /// Loads `list` into the requested view. On failure the user lands back
    /// on the selector with a message.
    async fn open_list(&mut self, list: &str, mode: ViewMode) {
        let loaded = match mode {
            ViewMode::Plan => PlanningView::load(&self.engine, list)
                .await
                .map(|view| self.state.plan = Some(PlanState::new(view))),
            ViewMode::Shop | ViewMode::None => ShoppingView::load(&self.engine, list)
                .await
                .map(|view| self.state.shop = Some(ShopState::new(view))),
        };
        match loaded {
            Ok(()) => {
                tracing::debug!(list, mode = mode.label(), "list opened");
                self.state.session.open(list, mode);
            }
            Err(err) => {
                tracing::warn!(list, error = %err, "could not open list");
                self.state.toast(ToastLevel::Error, message_for_error(&err));
                self.back_to_selector().await;
            }
        }
    }

    async fn back_to_selector(&mut self) {
        self.state.session.close();
        self.state.shop = None;
        self.state.plan = None;
        self.refresh_lists().await;
    }

    /// Reopens the current list in the other view. Refused while edits are pending.
    async fn switch_view(&mut self, dirty: bool) {
        if dirty {
            self.state.toast(
                ToastLevel::Error,
                "Hay cambios sin guardar: s guarda, x descarta.",
            );
            return;
        }
        let Some(list) = self.state.session.current_list().map(ToString::to_string) else {
            return;
        };
        let mode = match self.state.session.view_mode() {
            ViewMode::Plan => ViewMode::Shop,
            ViewMode::Shop | ViewMode::None => ViewMode::Plan,
        };
        self.state.shop = None;
        self.state.plan = None;
        self.open_list(&list, mode).await;
    }

    async fn refresh_lists(&mut self) {
        match self.engine.lists().await {
            Ok(lists) => self.state.selector.set_lists(lists),
            Err(err) => self
                .state
                .toast(ToastLevel::Error, message_for_error(&err)),
        }
    }

    fn default_list_name(&self) -> String {
        self.config.default_list_name(today())
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// User-facing text for an engine failure.
pub fn message_for_error(err: &EngineError) -> String {
    match err {
        EngineError::ListNotFound(name) => format!("La lista \"{name}\" ya no existe."),
        EngineError::ListExists(name) => format!("Ya existe una lista \"{name}\"."),
        EngineError::InvalidName(message) | EngineError::InvalidAmount(message) => {
            format!("Dato no válido: {message}")
        }
        EngineError::Unauthorized(_) => {
            "La hoja de cálculo rechazó las credenciales.".to_string()
        }
        other if other.is_connection() => {
            "Sin conexión con la hoja de cálculo. Inténtalo de nuevo.".to_string()
        }
        other => format!("No se pudo acceder a la hoja de cálculo: {other}"),
    }
}

/// Parses a price or quantity typed by the user (`12,50` or `12.50`).
/// Empty input reads as zero.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Whether `ch` may be typed into an amount field.
fn is_amount_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == ',' || ch == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_both_separators() {
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount(" 3.25 "), Some(3.25));
        assert_eq!(parse_amount(""), Some(0.0));
        assert_eq!(parse_amount("1,2,3"), None);
        assert!(is_amount_char(','));
        assert!(!is_amount_char('-'));
    }

    #[test]
    fn messages_name_the_list() {
        let message = message_for_error(&EngineError::ListNotFound("Junio".to_string()));
        assert!(message.contains("Junio"));
    }

    #[tokio::test]
    async fn memory_backend_connects_with_no_lists() {
        let config = AppConfig {
            storage: engine::StorageConfig {
                backend: Backend::Memory,
                ..engine::StorageConfig::default()
            },
            ..AppConfig::default()
        };
        let app = App::connect(config).await.unwrap();
        assert!(app.state.selector.lists.is_empty());
        assert_eq!(app.state.session.view_mode(), ViewMode::None);
    }
}
