//! In-memory expenses and categories of the active identity.
//!
//! The [`Ledger`] is loaded from the [`ScopedStore`] when an identity becomes
//! active and writes its collections back after every mutation. A mutation
//! whose write fails is rolled back, so memory never runs ahead of storage.
//! Dropping the ledger discards the in-memory copy; the stored copy stays.

use chrono::{DateTime, Utc};

use crate::{
    Category, EngineError, Expense, Identity, ResultEngine,
    categories::normalize_name_key,
    scoped::ScopedStore,
};

/// Default number of expenses shown as "recent".
pub const RECENT_LIMIT: usize = 5;

pub struct Ledger {
    identity: Identity,
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    scoped: ScopedStore,
}

impl Ledger {
    /// Load the ledger of `identity`, seeding default categories if none are saved.
    pub fn open(identity: Identity, scoped: ScopedStore) -> ResultEngine<Self> {
        let expenses = scoped.load_expenses(&identity)?;
        let categories = scoped.load_categories(&identity)?;
        tracing::debug!(
            "loaded ledger for {identity}: {} expenses, {} categories",
            expenses.len(),
            categories.len()
        );
        Ok(Self {
            identity,
            expenses,
            categories,
            scoped,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Expenses, newest first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn recent(&self, limit: usize) -> &[Expense] {
        &self.expenses[..limit.min(self.expenses.len())]
    }

    /// Exact-name lookup, the way expenses reference categories.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn add_expense(&mut self, amount: f64, category: &str) -> ResultEngine<&Expense> {
        self.add_expense_at(amount, category, None, Utc::now())
    }

    pub fn add_expense_with_note(
        &mut self,
        amount: f64,
        category: &str,
        note: Option<&str>,
    ) -> ResultEngine<&Expense> {
        self.add_expense_at(amount, category, note, Utc::now())
    }

    /// Validate and prepend a new expense dated `date`.
    pub fn add_expense_at(
        &mut self,
        amount: f64,
        category: &str,
        note: Option<&str>,
        date: DateTime<Utc>,
    ) -> ResultEngine<&Expense> {
        let category = category.trim();
        if category.is_empty() {
            return Err(EngineError::MissingField(
                "please select a category".to_string(),
            ));
        }
        let note = note
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        let expense = Expense::new(amount, category.to_string(), date, note)?;
        tracing::debug!("adding expense {} ({expense})", expense.id);
        self.expenses.insert(0, expense);
        if let Err(err) = self.sync_expenses() {
            self.expenses.remove(0);
            return Err(err);
        }
        Ok(&self.expenses[0])
    }

    /// Remove the expense with `id`. Unknown ids are ignored.
    pub fn delete_expense(&mut self, id: &str) -> ResultEngine<Option<Expense>> {
        let position = self.expenses.iter().position(|e| e.id == id);
        let removed = position.map(|index| (index, self.expenses.remove(index)));
        match &removed {
            Some((_, expense)) => tracing::debug!("deleted expense {id} ({expense})"),
            None => tracing::debug!("expense {id} not found, nothing deleted"),
        }
        if let Err(err) = self.sync_expenses() {
            if let Some((index, expense)) = removed {
                self.expenses.insert(index, expense);
            }
            return Err(err);
        }
        Ok(removed.map(|(_, expense)| expense))
    }

    pub fn add_category(&mut self, name: &str, icon: &str, color: &str) -> ResultEngine<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidName(
                "category name must not be empty".to_string(),
            ));
        }
        let key = normalize_name_key(name);
        if self.categories.iter().any(|c| c.name_key() == key) {
            return Err(EngineError::ExistingKey(name.to_string()));
        }

        let category = Category::new(name, icon, color);
        tracing::debug!("adding category {} ({})", category.id, category.name);
        self.categories.push(category);
        if let Err(err) = self.sync_categories() {
            self.categories.pop();
            return Err(err);
        }
        let index = self.categories.len() - 1;
        Ok(&self.categories[index])
    }

    /// Remove the category with `id`. Expenses keep the old name.
    pub fn delete_category(&mut self, id: &str) -> ResultEngine<Option<Category>> {
        let position = self.categories.iter().position(|c| c.id == id);
        let removed = position.map(|index| (index, self.categories.remove(index)));
        if let Some((_, category)) = &removed {
            tracing::debug!("deleted category {id} ({})", category.name);
        }
        if let Err(err) = self.sync_categories() {
            if let Some((index, category)) = removed {
                self.categories.insert(index, category);
            }
            return Err(err);
        }
        Ok(removed.map(|(_, category)| category))
    }

    fn sync_expenses(&self) -> ResultEngine<()> {
        self.scoped.save_expenses(&self.identity, &self.expenses)?;
        Ok(())
    }

    fn sync_categories(&self) -> ResultEngine<()> {
        self.scoped.save_categories(&self.identity, &self.categories)
    }
}
