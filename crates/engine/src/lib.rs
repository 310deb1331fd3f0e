pub use error::EngineError;
pub use item::{Category, Item, ItemField, ItemId, NewItem, Unit, sort_items};
pub use ops::{Engine, EngineBuilder, NewListOutcome, Seed};
pub use planning::{PlanRow, PlanningView, RowKey};
pub use session::{Session, ViewMode};
pub use shopping::{Section, ShoppingView};
pub use store::{
    AnyStore, Backend, CsvDirStore, MemoryStore, SheetStore, SheetsStore, StorageConfig,
    ValueInput,
};
pub use template::default_template;
pub use totals::{CategoryTotal, Totals, ZeroGroups, summarize};

pub mod codec;
mod error;
mod item;
mod ops;
mod planning;
mod session;
mod shopping;
pub mod store;
mod template;
mod totals;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Lists kept at once; creating one more evicts the first by name.
pub const MAX_LISTS: usize = 10;

/// Tabs a fresh spreadsheet ships with (lowercase), never listed.
pub(crate) const RESERVED_TAB_NAMES: [&str; 2] = ["hoja1", "sheet1"];
