//! Per-identity persistence of expenses and categories.
//!
//! Each identity gets its own pair of keys (`expenses_<identity>` and
//! `categories_<identity>`), so two identities never see each other's data.
//! Unreadable persisted values are logged and replaced by the empty list
//! (expenses) or the default set (categories); they are never an error.

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Category, Expense, Identity, ResultEngine, default_categories, storage::SharedStore,
};

/// Whether saving an empty expense list is written through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Every save overwrites the stored list, including an empty one.
    #[default]
    Always,
    /// Empty lists are not written, so the previous stored list survives.
    SkipEmpty,
}

impl PersistPolicy {
    pub fn from_persist_empty(persist_empty: bool) -> Self {
        if persist_empty {
            Self::Always
        } else {
            Self::SkipEmpty
        }
    }
}

pub fn expenses_key(identity: &Identity) -> String {
    format!("expenses_{identity}")
}

pub fn categories_key(identity: &Identity) -> String {
    format!("categories_{identity}")
}

#[derive(Clone)]
pub struct ScopedStore {
    store: SharedStore,
    policy: PersistPolicy,
}

impl ScopedStore {
    pub fn new(store: SharedStore, policy: PersistPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> PersistPolicy {
        self.policy
    }

    pub fn load_expenses(&self, identity: &Identity) -> ResultEngine<Vec<Expense>> {
        Ok(self.read_json(&expenses_key(identity))?.unwrap_or_default())
    }

    pub fn load_categories(&self, identity: &Identity) -> ResultEngine<Vec<Category>> {
        Ok(self
            .read_json(&categories_key(identity))?
            .unwrap_or_else(default_categories))
    }

    /// Returns whether the list was written.
    pub fn save_expenses(&self, identity: &Identity, expenses: &[Expense]) -> ResultEngine<bool> {
        if expenses.is_empty() && self.policy == PersistPolicy::SkipEmpty {
            tracing::trace!("skipping save of empty expense list for {identity}");
            return Ok(false);
        }
        self.write_json(&expenses_key(identity), expenses)?;
        Ok(true)
    }

    pub fn save_categories(
        &self,
        identity: &Identity,
        categories: &[Category],
    ) -> ResultEngine<()> {
        self.write_json(&categories_key(identity), categories)
    }

    /// Drop everything stored for `identity`.
    pub fn purge(&self, identity: &Identity) -> ResultEngine<()> {
        self.store.remove(&expenses_key(identity))?;
        self.store.remove(&categories_key(identity))?;
        tracing::info!("purged stored data for {identity}");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> ResultEngine<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!("ignoring unreadable value under '{key}': {err}");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ResultEngine<()> {
        let payload = serde_json::to_string(value)?;
        self.store.set(key, &payload)?;
        tracing::trace!("synced '{key}'");
        Ok(())
    }
}
