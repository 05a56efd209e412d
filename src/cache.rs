use crate::card::Card;
use crate::card_set::CardSet;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Entries {
    sets: Option<Vec<CardSet>>,
    set_cards: HashMap<String, Vec<Card>>,
    types: Option<Vec<String>>,
}

/// Session cache of catalog data. Entries never expire; `invalidate` is the
/// only way to drop them.
#[derive(Default)]
pub struct CatalogCache {
    entries: Mutex<Entries>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // Entries stay consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sets(&self) -> Option<Vec<CardSet>> {
        self.lock().sets.clone()
    }

    pub fn store_sets(&self, sets: Vec<CardSet>) {
        self.lock().sets = Some(sets);
    }

    pub fn cards_for_set(&self, set_id: &str) -> Option<Vec<Card>> {
        self.lock().set_cards.get(set_id).cloned()
    }

    pub fn store_cards_for_set(&self, set_id: &str, cards: Vec<Card>) {
        self.lock().set_cards.insert(set_id.to_string(), cards);
    }

    pub fn types(&self) -> Option<Vec<String>> {
        self.lock().types.clone()
    }

    pub fn store_types(&self, types: Vec<String>) {
        self.lock().types = Some(types);
    }

    pub fn invalidate(&self) {
        *self.lock() = Entries::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{card, set};

    #[test]
    fn invalidate_drops_every_entry() {
        let cache = CatalogCache::new();
        cache.store_sets(vec![set("base1", Some("Base"), "1999/01/09")]);
        cache.store_cards_for_set("base1", vec![card("base1-1", "base1", "Alakazam")]);
        cache.store_types(vec!["Psychic".into()]);
        assert_eq!(cache.sets().map(|s| s.len()), Some(1));

        cache.invalidate();

        assert!(cache.sets().is_none());
        assert!(cache.cards_for_set("base1").is_none());
        assert!(cache.types().is_none());
    }
}
