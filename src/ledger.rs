//! Personal collection state: owned cards, favorite sets and the ownership gate.
//!
//! The gate is a soft confirmation step that keeps stray selections from
//! editing the collection. It compares a plain shared word and is not access
//! control.

use crate::error::{LedgerError, StoreError};
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info, warn};

pub const OWNED_CARDS_KEY: &str = "ownedCards";
pub const FAVORITE_SETS_KEY: &str = "favoriteSets";
pub const ACCESS_GRANTED_KEY: &str = "accessGranted";

/// Document written by the export action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "ownedCards")]
    pub owned_cards: BTreeMap<String, bool>,
    #[serde(rename = "favoriteSets")]
    pub favorite_sets: Vec<String>,
}

pub struct Ledger<S: KeyValueStore> {
    store: S,
    owned: BTreeMap<String, bool>,
    favorites: Vec<String>,
    access_granted: bool,
    access_code: String,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Reads all three keys. Malformed values fall back to their defaults.
    pub fn load(store: S, access_code: impl Into<String>) -> Self {
        let owned = read_json(&store, OWNED_CARDS_KEY).unwrap_or_default();
        let favorites = read_json(&store, FAVORITE_SETS_KEY).unwrap_or_default();
        let access_granted = store.get(ACCESS_GRANTED_KEY).as_deref() == Some("true");

        Ledger {
            store,
            owned,
            favorites,
            access_granted,
            access_code: access_code.into(),
        }
    }

    pub fn is_owned(&self, card_id: &str) -> bool {
        self.owned.get(card_id).copied().unwrap_or(false)
    }

    pub fn is_favorite(&self, set_id: &str) -> bool {
        self.favorites.iter().any(|id| id == set_id)
    }

    pub fn access_granted(&self) -> bool {
        self.access_granted
    }

    pub fn owned_count<'a, I>(&self, card_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        card_ids.into_iter().filter(|id| self.is_owned(id)).count()
    }

    pub fn toggle_favorite(&mut self, set_id: &str) -> Result<bool, LedgerError> {
        let mut favorites = self.favorites.clone();
        let now_favorite = match favorites.iter().position(|id| id == set_id) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(set_id.to_string());
                true
            }
        };
        // Memory only changes once the new snapshot is stored.
        write_json(&mut self.store, FAVORITE_SETS_KEY, &favorites)?;
        self.favorites = favorites;
        info!(set_id, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    pub fn toggle_ownership(&mut self, card_id: &str) -> Result<bool, LedgerError> {
        if !self.access_granted {
            return Err(LedgerError::AccessDenied);
        }
        let now_owned = !self.is_owned(card_id);
        let mut owned = self.owned.clone();
        owned.insert(card_id.to_string(), now_owned);
        write_json(&mut self.store, OWNED_CARDS_KEY, &owned)?;
        self.owned = owned;
        info!(card_id, owned = now_owned, "ownership toggled");
        Ok(now_owned)
    }

    /// Sets the gate from `candidate` and returns the resulting value.
    pub fn submit_access_code(&mut self, candidate: &str) -> bool {
        self.access_granted = candidate == self.access_code;
        let flag = if self.access_granted { "true" } else { "false" };
        if let Err(err) = self.store.set(ACCESS_GRANTED_KEY, flag) {
            error!(%err, "could not persist access gate");
        }
        self.access_granted
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            owned_cards: self.owned.clone(),
            favorite_sets: self.favorites.clone(),
        }
    }

    pub fn export_to(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.export_document())?;
        writer.flush().map_err(io_err)?;
        info!(path = %path.display(), "collection exported");
        Ok(())
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn read_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "malformed stored value, using default");
            None
        }
    }
}

fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize,
{
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    /// Reads like a `MemoryStore` but refuses every write.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: format!("{}.json", key).into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    const CODE: &str = "binder";

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::load(MemoryStore::new(), CODE)
    }

    #[test]
    fn lookups_default_to_false() {
        let ledger = ledger();
        assert!(!ledger.is_owned("base1-1"));
        assert!(!ledger.is_favorite("base1"));
        assert!(!ledger.access_granted());
    }

    #[test]
    fn toggling_favorite_twice_restores_membership() {
        let mut ledger = ledger();
        assert!(ledger.toggle_favorite("base1").unwrap());
        assert!(ledger.is_favorite("base1"));
        assert_eq!(
            ledger.store().get(FAVORITE_SETS_KEY).as_deref(),
            Some(r#"["base1"]"#)
        );

        assert!(!ledger.toggle_favorite("base1").unwrap());
        assert!(!ledger.is_favorite("base1"));
        assert_eq!(ledger.store().get(FAVORITE_SETS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn ownership_toggle_is_rejected_without_access() {
        let mut ledger = ledger();
        let err = ledger.toggle_ownership("base1-1").unwrap_err();
        assert!(matches!(err, LedgerError::AccessDenied));
        assert!(!ledger.is_owned("base1-1"));
        assert_eq!(ledger.store().get(OWNED_CARDS_KEY), None);
    }

    #[test]
    fn ownership_toggle_flips_only_the_target_card() {
        let mut store = MemoryStore::new();
        store
            .set(OWNED_CARDS_KEY, r#"{"base1-1":true,"base1-2":false}"#)
            .unwrap();
        let mut ledger = Ledger::load(store, CODE);
        assert!(ledger.submit_access_code(CODE));

        assert!(ledger.toggle_ownership("base1-2").unwrap());
        assert!(ledger.is_owned("base1-1"));
        assert!(ledger.is_owned("base1-2"));
        assert!(!ledger.is_owned("base1-3"));

        assert!(!ledger.toggle_ownership("base1-1").unwrap());
        assert!(!ledger.is_owned("base1-1"));
        assert_eq!(
            ledger.store().get(OWNED_CARDS_KEY).as_deref(),
            Some(r#"{"base1-1":false,"base1-2":true}"#)
        );
    }

    #[test]
    fn wrong_code_closes_the_gate_and_persists_false() {
        let mut store = MemoryStore::new();
        store.set(ACCESS_GRANTED_KEY, "true").unwrap();
        let mut ledger = Ledger::load(store, CODE);
        assert!(ledger.access_granted());

        assert!(!ledger.submit_access_code("wrong"));
        assert!(!ledger.access_granted());
        assert_eq!(
            ledger.store().get(ACCESS_GRANTED_KEY).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn access_code_is_case_sensitive() {
        let mut ledger = ledger();
        assert!(!ledger.submit_access_code("BINDER"));
        assert!(ledger.submit_access_code("binder"));
        assert_eq!(ledger.store().get(ACCESS_GRANTED_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn malformed_stored_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(OWNED_CARDS_KEY, "{not json").unwrap();
        store.set(FAVORITE_SETS_KEY, r#"{"wrong":"shape"}"#).unwrap();
        store.set(ACCESS_GRANTED_KEY, "yes").unwrap();

        let ledger = Ledger::load(store, CODE);
        assert!(!ledger.is_owned("base1-1"));
        assert!(ledger.export_document().favorite_sets.is_empty());
        assert!(!ledger.access_granted());
    }

    #[test]
    fn owned_count_only_counts_owned_entries() {
        let mut ledger = ledger();
        ledger.submit_access_code(CODE);
        ledger.toggle_ownership("a").unwrap();
        ledger.toggle_ownership("b").unwrap();
        ledger.toggle_ownership("b").unwrap();
        assert_eq!(ledger.owned_count(["a", "b", "c"]), 1);
    }

    #[test]
    fn export_writes_owned_cards_and_favorites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut ledger = ledger();
        ledger.submit_access_code(CODE);
        ledger.toggle_ownership("base1-4").unwrap();
        ledger.toggle_favorite("base1").unwrap();

        ledger.export_to(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({
                "ownedCards": { "base1-4": true },
                "favoriteSets": ["base1"]
            })
        );
    }

    #[test]
    fn failed_writes_leave_collection_unchanged() {
        let mut inner = MemoryStore::new();
        inner.set(OWNED_CARDS_KEY, r#"{"base1-1":true}"#).unwrap();
        inner.set(ACCESS_GRANTED_KEY, "true").unwrap();
        let mut ledger = Ledger::load(ReadOnlyStore { inner }, CODE);

        let err = ledger.toggle_favorite("base1").unwrap_err();
        assert!(matches!(err, LedgerError::Store(StoreError::Io { .. })));
        assert!(!ledger.is_favorite("base1"));

        assert!(ledger.toggle_ownership("base1-1").is_err());
        assert!(ledger.toggle_ownership("base1-2").is_err());
        assert!(ledger.is_owned("base1-1"));
        assert!(!ledger.is_owned("base1-2"));
        assert_eq!(
            ledger.export_document(),
            ExportDocument {
                owned_cards: BTreeMap::from([("base1-1".to_string(), true)]),
                favorite_sets: Vec::new(),
            }
        );
    }

    #[test]
    fn export_into_missing_directory_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.json");
        let err = ledger().export_to(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { path: p, .. } if p == path));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn export_reports_errors_raised_when_flushing() {
        let path = Path::new("/dev/full");
        let err = ledger().export_to(path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
