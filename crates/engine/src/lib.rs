//! Core of the smartspend expense tracker.
//!
//! State lives in an injected [`KeyValueStore`]: a session marker naming the
//! signed-in [`Identity`], and per-identity lists of [`Expense`]s and
//! [`Category`]s. The [`Engine`] loads the [`Ledger`] of the active identity
//! and writes it back after every change.

pub use categories::{Category, default_categories};
pub use error::EngineError;
pub use expenses::{Expense, parse_amount};
pub use identity::{Credentials, Identity};
pub use ledger::{Ledger, RECENT_LIMIT};
pub use preferences::Theme;
pub use scoped::{PersistPolicy, ScopedStore};
pub use session::{Session, SessionStore};
pub use stats::{CategoryTotal, category_totals, format_amount, grand_total};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use tracker::{Engine, EngineBuilder};

pub mod categories;
mod error;
pub mod expenses;
pub mod identity;
mod ledger;
pub mod preferences;
pub mod scoped;
pub mod session;
pub mod stats;
mod storage;
mod tracker;

type ResultEngine<T> = Result<T, EngineError>;
