//! Who is signed in, persisted under a single key.

use crate::{Identity, ResultEngine, storage::SharedStore};

pub const SESSION_KEY: &str = "userEmail";
pub const REMEMBERED_KEY: &str = "rememberedEmail";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Authenticated(Identity),
    Unauthenticated,
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Persists the session marker. Logging out never touches scoped data.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Read the session marker left by a previous run.
    pub fn restore(&self) -> ResultEngine<Session> {
        let session = self
            .store
            .get(SESSION_KEY)?
            .as_deref()
            .and_then(Identity::from_stored)
            .map_or(Session::Unauthenticated, Session::Authenticated);
        Ok(session)
    }

    pub fn login(&self, identity: &Identity) -> ResultEngine<Session> {
        self.store.set(SESSION_KEY, identity.as_str())?;
        tracing::info!("signed in as {identity}");
        Ok(Session::Authenticated(identity.clone()))
    }

    /// Remove only the session marker.
    pub fn logout(&self) -> ResultEngine<Session> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("signed out");
        Ok(Session::Unauthenticated)
    }

    /// Remember the email for the next sign-in form. The password is not kept.
    pub fn remember(&self, identity: &Identity) -> ResultEngine<()> {
        self.store.set(REMEMBERED_KEY, identity.as_str())
    }

    pub fn forget_remembered(&self) -> ResultEngine<()> {
        self.store.remove(REMEMBERED_KEY)
    }

    pub fn remembered(&self) -> ResultEngine<Option<Identity>> {
        Ok(self
            .store
            .get(REMEMBERED_KEY)?
            .as_deref()
            .and_then(Identity::from_stored))
    }
}
