use crate::api::CatalogTransport;
use crate::card::Card;
use crate::card_set::CardSet;
use crate::catalog::{CardPage, CatalogClient};
use crate::error::{CatalogError, LedgerError, StoreError};
use crate::ledger::Ledger;
use crate::reconciler::{Direction, FilterCriteria, PageQuery, PaginationCursor, Reconciler};
use crate::series::{organize_series, SeriesIndex};
use crate::store::KeyValueStore;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Albums,
    SetDetail(String),
    Cards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumsTab {
    All,
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    All,
    OwnedOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Blocking(String),
    Info(String),
}

/// Everything the running app knows: catalog data, personal ledger, filter
/// state and the view being shown.
pub struct Session<T: CatalogTransport, S: KeyValueStore> {
    catalog: CatalogClient<T>,
    ledger: Ledger<S>,
    reconciler: Reconciler,
    sets: Vec<CardSet>,
    series: SeriesIndex,
    cards: Vec<Card>,
    types: Vec<String>,
    view: View,
    albums_tab: AlbumsTab,
    view_mode: ViewMode,
    notices: Vec<Notice>,
    export_path: PathBuf,
}

impl<T: CatalogTransport, S: KeyValueStore> Session<T, S> {
    pub fn new(
        catalog: CatalogClient<T>,
        ledger: Ledger<S>,
        export_path: impl Into<PathBuf>,
    ) -> Self {
        Session {
            catalog,
            ledger,
            reconciler: Reconciler::new(),
            sets: Vec::new(),
            series: SeriesIndex::new(),
            cards: Vec::new(),
            types: Vec::new(),
            view: View::Albums,
            albums_tab: AlbumsTab::All,
            view_mode: ViewMode::All,
            notices: Vec::new(),
            export_path: export_path.into(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn sets(&self) -> &[CardSet] {
        &self.sets
    }

    pub fn series(&self) -> &SeriesIndex {
        &self.series
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.reconciler.criteria()
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.reconciler.cursor()
    }

    pub fn albums_tab(&self) -> AlbumsTab {
        self.albums_tab
    }

    pub fn set_albums_tab(&mut self, tab: AlbumsTab) {
        self.albums_tab = tab;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn find_set(&self, set_id: &str) -> Option<&CardSet> {
        self.sets.iter().find(|s| s.id == set_id)
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn favorite_sets(&self) -> Vec<&CardSet> {
        self.sets
            .iter()
            .filter(|s| self.ledger.is_favorite(&s.id))
            .collect()
    }

    /// Cards of the open set, narrowed to owned ones in `OwnedOnly` mode.
    pub fn visible_cards(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| self.view_mode == ViewMode::All || self.ledger.is_owned(&c.id))
            .collect()
    }

    /// Sorted distinct illustrators on the current card page.
    pub fn illustrators(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter_map(|c| c.artist.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify_error(&mut self, message: &str, err: &dyn std::error::Error) {
        error!(%err, "{}", message);
        self.notices.push(Notice::Error(message.to_string()));
    }

    pub async fn load_sets(&mut self) {
        match self.catalog.fetch_sets().await {
            Ok(sets) => self.sets = sets,
            Err(err) => {
                self.notify_error("Failed to load sets. Please try again later.", &err);
                self.sets = Vec::new();
            }
        }
        self.series = organize_series(&self.sets);
    }

    pub async fn navigate_to(&mut self, view: View) {
        self.reconciler.restart();
        match view {
            View::Albums => {
                if self.sets.is_empty() {
                    self.load_sets().await;
                }
                self.view = View::Albums;
            }
            View::SetDetail(set_id) => self.open_set(&set_id).await,
            View::Cards => {
                self.view = View::Cards;
                self.load_cards_page().await;
            }
        }
    }

    /// Unknown ids leave the current view in place.
    pub async fn open_set(&mut self, set_id: &str) {
        if self.find_set(set_id).is_none() {
            let err = CatalogError::SetNotFound(set_id.to_string());
            self.notify_error("Set not found", &err);
            return;
        }
        self.cards = match self.catalog.fetch_cards_for_set(set_id).await {
            Ok(cards) => cards,
            Err(err) => {
                self.notify_error("Failed to load cards. Please try again later.", &err);
                Vec::new()
            }
        };
        self.view = View::SetDetail(set_id.to_string());
    }

    /// Loads the type list and the current card page together.
    pub async fn load_cards_page(&mut self) {
        let query = self.reconciler.current_query();
        let (types, outcome) = futures::join!(
            self.catalog.fetch_type_taxonomy(),
            self.catalog.fetch_cards(&query.criteria, query.page)
        );
        self.types = types;
        self.settle_cards(&query, outcome);
    }

    pub async fn apply_filters(&mut self, criteria: FilterCriteria) {
        let query = self.reconciler.apply_filters(criteria);
        self.run_query(query).await;
    }

    pub async fn reset_filters(&mut self) {
        let query = self.reconciler.reset_filters();
        self.run_query(query).await;
    }

    /// Returns false when the step was out of range and nothing was fetched.
    pub async fn advance_page(&mut self, direction: Direction) -> bool {
        match self.reconciler.advance_page(direction) {
            Some(query) => {
                self.run_query(query).await;
                true
            }
            None => false,
        }
    }

    async fn run_query(&mut self, query: PageQuery) {
        let outcome = self.catalog.fetch_cards(&query.criteria, query.page).await;
        self.settle_cards(&query, outcome);
    }

    pub(crate) fn settle_cards(
        &mut self,
        query: &PageQuery,
        outcome: Result<CardPage, CatalogError>,
    ) {
        self.cards = match self.reconciler.settle(query, outcome) {
            Ok(cards) => cards,
            Err(err) => {
                self.notify_error("Failed to load cards. Please try again later.", &err);
                Vec::new()
            }
        };
    }

    /// Drops cached catalog data and reloads what the current view shows.
    pub async fn refresh(&mut self) {
        info!(view = ?self.view, "manual refresh");
        self.catalog.invalidate();
        match self.view.clone() {
            View::Albums => self.load_sets().await,
            View::SetDetail(set_id) => self.open_set(&set_id).await,
            View::Cards => self.load_cards_page().await,
        }
    }

    pub fn toggle_favorite(&mut self, set_id: &str) -> Option<bool> {
        match self.ledger.toggle_favorite(set_id) {
            Ok(favorite) => Some(favorite),
            Err(err) => {
                self.notify_error("Could not save favorites.", &err);
                None
            }
        }
    }

    pub fn toggle_ownership(&mut self, card_id: &str) -> Option<bool> {
        match self.ledger.toggle_ownership(card_id) {
            Ok(owned) => Some(owned),
            Err(LedgerError::AccessDenied) => {
                self.notices
                    .push(Notice::Blocking(LedgerError::AccessDenied.to_string()));
                None
            }
            Err(err) => {
                self.notify_error("Could not save your collection.", &err);
                None
            }
        }
    }

    pub fn submit_access_code(&mut self, candidate: &str) -> bool {
        let granted = self.ledger.submit_access_code(candidate);
        self.notices.push(if granted {
            Notice::Info("Access granted".to_string())
        } else {
            Notice::Error("Wrong code".to_string())
        });
        granted
    }

    pub fn export(&mut self) -> Result<PathBuf, StoreError> {
        match self.ledger.export_to(&self.export_path) {
            Ok(()) => {
                self.notices.push(Notice::Info(format!(
                    "Collection exported to {}",
                    self.export_path.display()
                )));
                Ok(self.export_path.clone())
            }
            Err(err) => {
                self.notify_error("Export failed.", &err);
                Err(err)
            }
        }
    }
}
