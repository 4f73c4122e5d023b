use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};

use engine::{
    Category, Engine, EngineError, Identity, KeyValueStore, MemoryStore, PersistPolicy,
    ScopedStore, Session, default_categories, scoped,
};

/// Memory store whose writes to ledger keys fail while `full` is set.
#[derive(Clone, Default)]
struct FullDisk {
    inner: MemoryStore,
    full: Arc<AtomicBool>,
}

impl FullDisk {
    fn fill(&self, full: bool) {
        self.full.store(full, Ordering::SeqCst);
    }

    fn rejects(&self, key: &str) -> bool {
        self.full.load(Ordering::SeqCst)
            && (key.starts_with("expenses_") || key.starts_with("categories_"))
    }
}

impl KeyValueStore for FullDisk {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngineError> {
        if self.rejects(key) {
            return Err(EngineError::Storage("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), EngineError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, EngineError> {
        self.inner.keys()
    }
}

fn on_full_disk(email: &str) -> (Engine, FullDisk) {
    let disk = FullDisk::default();
    let mut engine = Engine::builder()
        .store(Arc::new(disk.clone()))
        .build()
        .unwrap();
    engine.login(identity(email)).unwrap();
    (engine, disk)
}

fn identity(raw: &str) -> Identity {
    Identity::parse(raw).unwrap()
}

fn engine_with_store(policy: PersistPolicy) -> (Engine, MemoryStore) {
    let store = MemoryStore::new();
    let engine = Engine::builder()
        .store(store.shared())
        .persist_policy(policy)
        .build()
        .unwrap();
    (engine, store)
}

fn signed_in(email: &str) -> (Engine, MemoryStore) {
    let (mut engine, store) = engine_with_store(PersistPolicy::Always);
    engine.login(identity(email)).unwrap();
    (engine, store)
}

fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

#[test]
fn fresh_engine_is_unauthenticated() {
    let (engine, _store) = engine_with_store(PersistPolicy::Always);
    assert_eq!(engine.session(), Session::Unauthenticated);
    assert!(engine.identity().is_none());
    assert!(matches!(engine.ledger(), Err(EngineError::NotAuthenticated)));
}

#[test]
fn intents_require_login() {
    let (mut engine, _store) = engine_with_store(PersistPolicy::Always);
    assert_eq!(
        engine.add_expense(1.0, "Other").unwrap_err(),
        EngineError::NotAuthenticated
    );
    assert_eq!(
        engine.delete_category("1").unwrap_err(),
        EngineError::NotAuthenticated
    );
}

#[test]
fn login_seeds_default_categories() {
    let (engine, _store) = signed_in("alice@example.com");
    let ledger = engine.ledger().unwrap();
    assert!(ledger.expenses().is_empty());
    assert_eq!(ledger.categories(), default_categories().as_slice());
}

#[test]
fn add_expense_on_empty_ledger() {
    let (mut engine, store) = signed_in("alice@example.com");

    let expense = engine.add_expense(12.5, "Food & Dining").unwrap();

    let ledger = engine.ledger().unwrap();
    assert_eq!(ledger.expenses().len(), 1);
    let only = &ledger.expenses()[0];
    assert_eq!(only.amount, 12.5);
    assert_eq!(only.category, "Food & Dining");
    assert_eq!(only.id, expense.id);
    assert!(!only.id.is_empty());

    let stored = store
        .get("expenses_alice@example.com")
        .unwrap()
        .expect("expenses synced");
    assert!(stored.contains("Food & Dining"));
}

#[test]
fn invalid_amounts_leave_list_unchanged() {
    let (mut engine, _store) = signed_in("alice@example.com");
    engine.add_expense(3.0, "Other").unwrap();

    for amount in [0.0, -4.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            engine.add_expense(amount, "Other"),
            Err(EngineError::InvalidAmount(_))
        ));
    }
    assert!(engine::parse_amount("abc").is_err());
    assert_eq!(engine.ledger().unwrap().expenses().len(), 1);
}

#[test]
fn ids_are_unique() {
    let (mut engine, _store) = signed_in("alice@example.com");
    let first = engine.add_expense(1.0, "Other").unwrap();
    let second = engine.add_expense(1.0, "Other").unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn duplicate_category_names_are_rejected_case_insensitively() {
    let (mut engine, _store) = signed_in("alice@example.com");

    engine.add_category("Gym", "🏋️", "hsl(15, 80%, 55%)").unwrap();
    let err = engine
        .add_category("gym", "🏋️", "hsl(15, 80%, 55%)")
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("gym".to_string()));
    let gyms = engine
        .ledger()
        .unwrap()
        .categories()
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case("gym"))
        .count();
    assert_eq!(gyms, 1);
}

#[test]
fn new_category_is_appended() {
    let (mut engine, _store) = signed_in("alice@example.com");
    let added = engine.add_category("  Travel ", "✈️", "hsl(15, 80%, 55%)").unwrap();

    let categories = engine.ledger().unwrap().categories();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories.last(), Some(&added));
    assert_eq!(added.name, "Travel");
}

#[test]
fn deleting_referenced_category_leaves_orphan_expense() {
    let (mut engine, _store) = signed_in("alice@example.com");
    engine.add_expense(20.0, "Health").unwrap();

    let removed = engine.delete_category("6").unwrap();

    assert_eq!(removed.map(|c| c.name), Some("Health".to_string()));
    let ledger = engine.ledger().unwrap();
    assert!(ledger.categories().iter().all(|c| c.name != "Health"));
    assert_eq!(ledger.expenses()[0].category, "Health");

    let totals = engine.category_totals().unwrap();
    assert_eq!(totals[0].name, "Health");
    assert_eq!(totals[0].icon, engine::categories::FALLBACK_ICON);
}

#[test]
fn delete_unknown_expense_is_noop() {
    let (mut engine, _store) = signed_in("alice@example.com");
    engine.add_expense(1.0, "Other").unwrap();
    engine.add_expense(2.0, "Shopping").unwrap();
    let before = engine.ledger().unwrap().expenses().to_vec();

    assert_eq!(engine.delete_expense("missing").unwrap(), None);

    assert_eq!(engine.ledger().unwrap().expenses(), before.as_slice());
}

#[test]
fn delete_expense_removes_match() {
    let (mut engine, _store) = signed_in("alice@example.com");
    let keep = engine.add_expense(1.0, "Other").unwrap();
    let gone = engine.add_expense(2.0, "Other").unwrap();

    let removed = engine.delete_expense(&gone.id).unwrap();

    assert_eq!(removed, Some(gone));
    assert_eq!(engine.ledger().unwrap().expenses(), [keep].as_slice());
}

#[test]
fn category_totals_sorted_by_total() {
    let (mut engine, _store) = signed_in("alice@example.com");
    engine.add_category("A", "", "").unwrap();
    engine.add_category("B", "", "").unwrap();
    engine.add_expense(5.0, "A").unwrap();
    engine.add_expense(2.0, "B").unwrap();
    engine.add_expense(3.0, "A").unwrap();

    let totals: Vec<(String, f64)> = engine
        .category_totals()
        .unwrap()
        .into_iter()
        .map(|t| (t.name, t.total))
        .collect();

    assert_eq!(totals, vec![("A".to_string(), 8.0), ("B".to_string(), 2.0)]);
}

#[test]
fn identities_never_see_each_other() {
    let store = MemoryStore::new();
    let mut engine = Engine::builder().store(store.shared()).build().unwrap();

    engine.login(identity("alice@example.com")).unwrap();
    engine.add_expense(9.0, "Other").unwrap();
    engine.add_category("Alice only", "", "").unwrap();

    engine.login(identity("bob@example.com")).unwrap();
    let bob = engine.ledger().unwrap();
    assert!(bob.expenses().is_empty());
    assert_eq!(bob.categories(), default_categories().as_slice());

    let scoped = ScopedStore::new(store.shared(), PersistPolicy::Always);
    assert!(scoped.load_expenses(&identity("bob@example.com")).unwrap().is_empty());
    assert_eq!(
        scoped.load_expenses(&identity("alice@example.com")).unwrap().len(),
        1
    );
}

#[test]
fn logout_keeps_data_for_next_login() {
    let (mut engine, store) = signed_in("alice@example.com");
    engine.add_expense(7.25, "Shopping").unwrap();

    engine.logout().unwrap();
    assert_eq!(engine.session(), Session::Unauthenticated);
    assert_eq!(store.get("userEmail").unwrap(), None);

    engine.login(identity("alice@example.com")).unwrap();
    let ledger = engine.ledger().unwrap();
    assert_eq!(ledger.expenses().len(), 1);
    assert_eq!(ledger.expenses()[0].amount, 7.25);
}

#[test]
fn session_is_restored_on_build() {
    let (mut engine, store) = signed_in("alice@example.com");
    engine.add_expense(4.0, "Health").unwrap();
    drop(engine);

    let engine = Engine::builder().store(store.shared()).build().unwrap();

    assert_eq!(
        engine.session(),
        Session::Authenticated(identity("alice@example.com"))
    );
    assert_eq!(engine.ledger().unwrap().expenses().len(), 1);
}

#[test]
fn categories_round_trip() {
    let store = MemoryStore::new();
    let scoped = ScopedStore::new(store.shared(), PersistPolicy::Always);
    let alice = identity("alice@example.com");
    let categories = vec![
        Category::new("Gym", "🏋️", "hsl(15, 80%, 55%)"),
        Category::new("Books", "📚", "hsl(200, 70%, 50%)"),
    ];

    scoped.save_categories(&alice, &categories).unwrap();

    assert_eq!(scoped.load_categories(&alice).unwrap(), categories);
}

#[test]
fn expenses_round_trip_when_non_empty() {
    let (mut engine, store) = signed_in("alice@example.com");
    engine.add_expense(1.5, "Other").unwrap();
    engine.add_expense(2.5, "Health").unwrap();
    let in_memory = engine.ledger().unwrap().expenses().to_vec();

    let scoped = ScopedStore::new(store.shared(), PersistPolicy::Always);
    assert_eq!(
        scoped.load_expenses(&identity("alice@example.com")).unwrap(),
        in_memory
    );
}

#[test]
fn deleting_last_expense_persists_empty_list_by_default() {
    let (mut engine, store) = signed_in("alice@example.com");
    let only = engine.add_expense(5.0, "Other").unwrap();

    engine.delete_expense(&only.id).unwrap();

    assert_eq!(
        store.get("expenses_alice@example.com").unwrap().as_deref(),
        Some("[]")
    );
    engine.login(identity("alice@example.com")).unwrap();
    assert!(engine.ledger().unwrap().expenses().is_empty());
}

#[test]
fn skip_empty_policy_leaves_stale_expenses() {
    let (mut engine, store) = engine_with_store(PersistPolicy::SkipEmpty);
    engine.login(identity("alice@example.com")).unwrap();
    let only = engine.add_expense(5.0, "Other").unwrap();

    engine.delete_expense(&only.id).unwrap();
    assert!(engine.ledger().unwrap().expenses().is_empty());

    engine.logout().unwrap();
    engine.login(identity("alice@example.com")).unwrap();
    let reloaded = engine.ledger().unwrap().expenses();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, only.id);

    let scoped = ScopedStore::new(store.shared(), PersistPolicy::SkipEmpty);
    assert!(!scoped.save_expenses(&identity("alice@example.com"), &[]).unwrap());
}

#[test]
fn corrupt_stored_data_falls_back_silently() {
    let store = MemoryStore::new();
    store.set("userEmail", "alice@example.com").unwrap();
    store.set("expenses_alice@example.com", "not json").unwrap();
    store.set("categories_alice@example.com", "[{\"id\":1}]").unwrap();

    let engine = Engine::builder().store(store.shared()).build().unwrap();

    let ledger = engine.ledger().unwrap();
    assert!(ledger.expenses().is_empty());
    assert_eq!(ledger.categories(), default_categories().as_slice());
}

#[test]
fn expenses_keep_given_dates_newest_first() {
    let store = MemoryStore::new();
    let scoped = ScopedStore::new(store.shared(), PersistPolicy::Always);
    let mut ledger = engine::Ledger::open(identity("alice@example.com"), scoped).unwrap();

    ledger
        .add_expense_at(1.0, "Other", None, at("2024-01-01T08:00:00Z"))
        .unwrap();
    ledger
        .add_expense_at(2.0, "Other", Some("coffee"), at("2024-01-02T08:00:00Z"))
        .unwrap();

    let dates: Vec<DateTime<Utc>> = ledger.expenses().iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![at("2024-01-02T08:00:00Z"), at("2024-01-01T08:00:00Z")]
    );
    assert_eq!(ledger.expenses()[0].note.as_deref(), Some("coffee"));
}

#[test]
fn wipe_clears_only_active_identity() {
    let store = MemoryStore::new();
    let mut engine = Engine::builder().store(store.shared()).build().unwrap();
    engine.login(identity("bob@example.com")).unwrap();
    engine.add_expense(1.0, "Other").unwrap();
    engine.login(identity("alice@example.com")).unwrap();
    engine.add_expense(2.0, "Other").unwrap();

    engine.wipe().unwrap();

    assert!(engine.ledger().unwrap().expenses().is_empty());
    assert_eq!(
        store.get(&scoped::expenses_key(&identity("alice@example.com"))).unwrap(),
        None
    );
    assert!(
        store
            .get(&scoped::expenses_key(&identity("bob@example.com")))
            .unwrap()
            .is_some()
    );
    assert_eq!(engine.identity(), Some(&identity("alice@example.com")));
}

#[test]
fn theme_preference_is_device_wide() {
    let (mut engine, _store) = signed_in("alice@example.com");
    engine.set_theme(engine::Theme::Dark).unwrap();
    engine.logout().unwrap();
    assert_eq!(engine.theme().unwrap(), engine::Theme::Dark);
}

#[test]
fn failed_add_leaves_ledger_unchanged() {
    let (mut engine, disk) = on_full_disk("alice@example.com");
    disk.fill(true);

    let storage = EngineError::Storage("disk full".to_string());
    assert_eq!(engine.add_expense(4.0, "Other").unwrap_err(), storage);
    assert_eq!(
        engine.add_category("Gym", "🏋️", "hsl(15, 80%, 55%)").unwrap_err(),
        storage
    );
    let ledger = engine.ledger().unwrap();
    assert!(ledger.expenses().is_empty());
    assert_eq!(ledger.categories(), default_categories().as_slice());

    disk.fill(false);
    engine.add_category("Gym", "🏋️", "hsl(15, 80%, 55%)").unwrap();
    engine.add_expense(4.0, "Gym").unwrap();
    assert_eq!(engine.ledger().unwrap().expenses().len(), 1);
}

#[test]
fn failed_delete_restores_position() {
    let (mut engine, disk) = on_full_disk("alice@example.com");
    engine.add_expense(1.0, "Other").unwrap();
    let middle = engine.add_expense(2.0, "Other").unwrap();
    engine.add_expense(3.0, "Other").unwrap();
    let expenses = engine.ledger().unwrap().expenses().to_vec();
    let categories = engine.ledger().unwrap().categories().to_vec();
    disk.fill(true);

    assert!(matches!(
        engine.delete_expense(&middle.id),
        Err(EngineError::Storage(_))
    ));
    assert!(matches!(
        engine.delete_category("3"),
        Err(EngineError::Storage(_))
    ));

    let ledger = engine.ledger().unwrap();
    assert_eq!(ledger.expenses(), expenses.as_slice());
    assert_eq!(ledger.categories(), categories.as_slice());

    disk.fill(false);
    assert_eq!(engine.delete_expense(&middle.id).unwrap(), Some(middle));
}
