//! The `Engine` ties the session marker to the ledger of the signed-in
//! identity and accepts every intent coming from a front end.

use crate::{
    Category, CategoryTotal, EngineError, Expense, Identity, ResultEngine,
    ledger::Ledger,
    preferences::{self, Theme},
    scoped::{PersistPolicy, ScopedStore},
    session::{Session, SessionStore},
    stats,
    storage::{MemoryStore, SharedStore},
};

pub struct Engine {
    store: SharedStore,
    sessions: SessionStore,
    scoped: ScopedStore,
    ledger: Option<Ledger>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn session(&self) -> Session {
        self.ledger
            .as_ref()
            .map_or(Session::Unauthenticated, |ledger| {
                Session::Authenticated(ledger.identity().clone())
            })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.ledger.as_ref().map(Ledger::identity)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Persist the session marker and load the identity's ledger.
    ///
    /// Any ledger of a previously active identity is discarded.
    pub fn login(&mut self, identity: Identity) -> ResultEngine<&Ledger> {
        self.sessions.login(&identity)?;
        let ledger = Ledger::open(identity, self.scoped.clone())?;
        let ledger = self.ledger.insert(ledger);
        Ok(&*ledger)
    }

    /// Clear the session marker. Stored expenses and categories are kept.
    pub fn logout(&mut self) -> ResultEngine<()> {
        self.sessions.logout()?;
        self.ledger = None;
        Ok(())
    }

    pub fn ledger(&self) -> ResultEngine<&Ledger> {
        self.ledger.as_ref().ok_or(EngineError::NotAuthenticated)
    }

    fn ledger_mut(&mut self) -> ResultEngine<&mut Ledger> {
        self.ledger.as_mut().ok_or(EngineError::NotAuthenticated)
    }

    pub fn add_expense(&mut self, amount: f64, category: &str) -> ResultEngine<Expense> {
        self.add_expense_with_note(amount, category, None)
    }

    pub fn add_expense_with_note(
        &mut self,
        amount: f64,
        category: &str,
        note: Option<&str>,
    ) -> ResultEngine<Expense> {
        self.ledger_mut()?
            .add_expense_with_note(amount, category, note)
            .cloned()
    }

    pub fn delete_expense(&mut self, id: &str) -> ResultEngine<Option<Expense>> {
        self.ledger_mut()?.delete_expense(id)
    }

    pub fn add_category(&mut self, name: &str, icon: &str, color: &str) -> ResultEngine<Category> {
        self.ledger_mut()?.add_category(name, icon, color).cloned()
    }

    pub fn delete_category(&mut self, id: &str) -> ResultEngine<Option<Category>> {
        self.ledger_mut()?.delete_category(id)
    }

    /// Chart data for the active ledger.
    pub fn category_totals(&self) -> ResultEngine<Vec<CategoryTotal>> {
        let ledger = self.ledger()?;
        Ok(stats::category_totals(ledger.expenses(), ledger.categories()))
    }

    /// Remove the active identity's stored data and start from the defaults.
    pub fn wipe(&mut self) -> ResultEngine<()> {
        let identity = self.ledger()?.identity().clone();
        self.scoped.purge(&identity)?;
        self.ledger = Some(Ledger::open(identity, self.scoped.clone())?);
        Ok(())
    }

    pub fn theme(&self) -> ResultEngine<Theme> {
        preferences::load_theme(&self.store)
    }

    pub fn set_theme(&self, theme: Theme) -> ResultEngine<()> {
        preferences::save_theme(&self.store, theme)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<SharedStore>,
    policy: PersistPolicy,
}

impl EngineBuilder {
    /// Pass the key-value store. Defaults to a fresh [`MemoryStore`].
    pub fn store(mut self, store: SharedStore) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    pub fn persist_policy(mut self, policy: PersistPolicy) -> EngineBuilder {
        self.policy = policy;
        self
    }

    /// Construct `Engine`, restoring the previous session if there is one.
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self.store.unwrap_or_else(|| MemoryStore::new().shared());
        let sessions = SessionStore::new(store.clone());
        let scoped = ScopedStore::new(store.clone(), self.policy);

        let ledger = match sessions.restore()? {
            Session::Authenticated(identity) => Some(Ledger::open(identity, scoped.clone())?),
            Session::Unauthenticated => None,
        };

        Ok(Engine {
            store,
            sessions,
            scoped,
            ledger,
        })
    }
}
