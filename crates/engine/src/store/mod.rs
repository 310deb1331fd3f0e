//! Spreadsheet storage seam.
//!
//! A spreadsheet is a set of named tabs, each holding a grid of cell texts.
//! Lists map 1:1 to tabs; the engine only ever reads a whole tab or replaces
//! a whole tab.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::{EngineError, ResultEngine, codec::Grid};

mod csv_dir;
mod memory;
mod sheets;

pub use csv_dir::CsvDirStore;
pub use memory::MemoryStore;
pub use sheets::{DEFAULT_SHEETS_URL, SheetsStore};

/// How the backing store treats written cell text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueInput {
    /// Store the text exactly as given.
    Raw,
    /// Let the store parse numeric-looking text (`0,5`) as numbers.
    #[default]
    UserEntered,
}

impl ValueInput {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueInput::Raw => "RAW",
            ValueInput::UserEntered => "USER_ENTERED",
        }
    }
}

/// Tab-level access to a spreadsheet.
///
/// Implementations report a missing tab as [`EngineError::ListNotFound`],
/// rejected credentials as [`EngineError::Unauthorized`] and any other
/// transport failure as [`EngineError::Storage`] (or one of the transparent
/// I/O variants).
#[allow(async_fn_in_trait)]
pub trait SheetStore {
    /// Titles of every tab, in the store's own order.
    async fn tab_titles(&self) -> ResultEngine<Vec<String>>;

    /// Creates an empty tab. Fails if the title is taken.
    async fn add_tab(&self, title: &str) -> ResultEngine<()>;

    async fn delete_tab(&self, title: &str) -> ResultEngine<()>;

    /// Whole content of a tab; an empty tab yields an empty grid.
    async fn read_tab(&self, title: &str) -> ResultEngine<Grid>;

    /// Clears the tab, then writes `grid` starting at the top-left cell.
    async fn write_tab(&self, title: &str, grid: &Grid, input: ValueInput) -> ResultEngine<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Memory,
    #[default]
    Csv,
    Sheets,
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "csv" => Ok(Backend::Csv),
            "sheets" => Ok(Backend::Sheets),
            other => Err(EngineError::Storage(format!("unknown backend: {other}"))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Memory => "memory",
            Backend::Csv => "csv",
            Backend::Sheets => "sheets",
        })
    }
}

/// Where lists are stored. Read from the config file / environment by the
/// binaries; the Sheets token never comes from the command line.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Directory of the `csv` backend, one `<list>.csv` per list.
    pub data_dir: PathBuf,
    pub spreadsheet_id: String,
    pub access_token: String,
    pub sheets_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Csv,
            data_dir: PathBuf::from("data/lists"),
            spreadsheet_id: String::new(),
            access_token: String::new(),
            sheets_url: DEFAULT_SHEETS_URL.to_string(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("data_dir", &self.data_dir)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"<redacted>")
            .field("sheets_url", &self.sheets_url)
            .finish()
    }
}

/// Any of the built-in backends, picked at runtime from [`StorageConfig`].
#[derive(Debug)]
pub enum AnyStore {
    Memory(MemoryStore),
    Csv(CsvDirStore),
    Sheets(SheetsStore),
}

impl AnyStore {
    pub fn open(config: &StorageConfig) -> ResultEngine<Self> {
        match config.backend {
            Backend::Memory => Ok(AnyStore::Memory(MemoryStore::new())),
            Backend::Csv => Ok(AnyStore::Csv(CsvDirStore::open(&config.data_dir)?)),
            Backend::Sheets => Ok(AnyStore::Sheets(SheetsStore::new(
                &config.sheets_url,
                &config.spreadsheet_id,
                &config.access_token,
            )?)),
        }
    }

    #[must_use]
    pub fn backend(&self) -> Backend {
        match self {
            AnyStore::Memory(_) => Backend::Memory,
            AnyStore::Csv(_) => Backend::Csv,
            AnyStore::Sheets(_) => Backend::Sheets,
        }
    }
}

impl SheetStore for AnyStore {
    async fn tab_titles(&self) -> ResultEngine<Vec<String>> {
        match self {
            AnyStore::Memory(store) => store.tab_titles().await,
            AnyStore::Csv(store) => store.tab_titles().await,
            AnyStore::Sheets(store) => store.tab_titles().await,
        }
    }

    async fn add_tab(&self, title: &str) -> ResultEngine<()> {
        match self {
            AnyStore::Memory(store) => store.add_tab(title).await,
            AnyStore::Csv(store) => store.add_tab(title).await,
            AnyStore::Sheets(store) => store.add_tab(title).await,
        }
    }

    async fn delete_tab(&self, title: &str) -> ResultEngine<()> {
        match self {
            AnyStore::Memory(store) => store.delete_tab(title).await,
            AnyStore::Csv(store) => store.delete_tab(title).await,
            AnyStore::Sheets(store) => store.delete_tab(title).await,
        }
    }

    async fn read_tab(&self, title: &str) -> ResultEngine<Grid> {
        match self {
            AnyStore::Memory(store) => store.read_tab(title).await,
            AnyStore::Csv(store) => store.read_tab(title).await,
            AnyStore::Sheets(store) => store.read_tab(title).await,
        }
    }

    async fn write_tab(&self, title: &str, grid: &Grid, input: ValueInput) -> ResultEngine<()> {
        match self {
            AnyStore::Memory(store) => store.write_tab(title, grid, input).await,
            AnyStore::Csv(store) => store.write_tab(title, grid, input).await,
            AnyStore::Sheets(store) => store.write_tab(title, grid, input).await,
        }
    }
}
