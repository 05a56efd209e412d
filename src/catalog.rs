use crate::api::{self, CatalogTransport, QueryParams, CARDS, SETS, TYPES};
use crate::cache::CatalogCache;
use crate::card::Card;
use crate::card_set::CardSet;
use crate::error::CatalogError;
use crate::reconciler::FilterCriteria;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Cards per page in the card browser.
pub const PAGE_SIZE: u32 = 20;
/// Page size used when collecting a whole resource.
pub const BULK_PAGE_SIZE: u32 = 250;

#[derive(Debug, Clone, PartialEq)]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub total_count: Option<u64>,
}

pub struct CatalogClient<T: CatalogTransport> {
    transport: T,
    cache: CatalogCache,
}

impl<T: CatalogTransport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        CatalogClient {
            transport,
            cache: CatalogCache::new(),
        }
    }

    pub async fn fetch_sets(&self) -> Result<Vec<CardSet>, CatalogError> {
        if let Some(sets) = self.cache.sets() {
            return Ok(sets);
        }
        let sets: Vec<CardSet> = self.fetch_all(SETS, None).await?;
        debug!(count = sets.len(), "sets fetched");
        self.cache.store_sets(sets.clone());
        Ok(sets)
    }

    pub async fn fetch_cards_for_set(&self, set_id: &str) -> Result<Vec<Card>, CatalogError> {
        if let Some(cards) = self.cache.cards_for_set(set_id) {
            return Ok(cards);
        }
        let query = api::exact_clause("set.id", set_id);
        let cards: Vec<Card> = self.fetch_all(CARDS, Some(query)).await?;
        debug!(set_id, count = cards.len(), "set cards fetched");
        self.cache.store_cards_for_set(set_id, cards.clone());
        Ok(cards)
    }

    pub async fn fetch_cards(
        &self,
        criteria: &FilterCriteria,
        page: u32,
    ) -> Result<CardPage, CatalogError> {
        let mut params: QueryParams = vec![
            ("page".to_string(), page.to_string()),
            ("pageSize".to_string(), PAGE_SIZE.to_string()),
        ];
        if let Some(q) = card_query(criteria) {
            params.push(("q".to_string(), q));
        }
        let body = self.transport.get(CARDS, &params).await?;
        let envelope = api::parse_envelope::<Card>(CARDS, &body)?;
        Ok(CardPage {
            cards: envelope.data,
            total_count: envelope.total_count,
        })
    }

    /// Type names for the filter form. Failures yield an empty list.
    pub async fn fetch_type_taxonomy(&self) -> Vec<String> {
        if let Some(types) = self.cache.types() {
            return types;
        }
        let fetched = match self.transport.get(TYPES, &QueryParams::new()).await {
            Ok(body) => api::parse_envelope::<String>(TYPES, &body).map(|e| e.data),
            Err(err) => Err(err),
        };
        match fetched {
            Ok(types) => {
                self.cache.store_types(types.clone());
                types
            }
            Err(err) => {
                warn!(%err, "type list unavailable");
                Vec::new()
            }
        }
    }

    /// Manual refresh: forget everything fetched so far.
    pub fn invalidate(&self) {
        debug!("catalog cache invalidated");
        self.cache.invalidate();
    }

    async fn fetch_all<R: DeserializeOwned>(
        &self,
        resource: &str,
        query: Option<String>,
    ) -> Result<Vec<R>, CatalogError> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut params: QueryParams = Vec::new();
            if let Some(q) = &query {
                params.push(("q".to_string(), q.clone()));
            }
            params.push(("page".to_string(), page.to_string()));
            params.push(("pageSize".to_string(), BULK_PAGE_SIZE.to_string()));

            let body = self.transport.get(resource, &params).await?;
            let envelope = api::parse_envelope::<R>(resource, &body)?;
            let received = envelope.data.len();
            items.extend(envelope.data);

            let complete = match envelope.total_count {
                Some(total) => items.len() as u64 >= total,
                None => true,
            };
            if received == 0 || complete {
                return Ok(items);
            }
            page += 1;
        }
    }
}

/// Conjunction of the non-empty criteria, or `None` for an unfiltered query.
pub fn card_query(criteria: &FilterCriteria) -> Option<String> {
    let mut clauses = Vec::new();

    let name = criteria.name.trim();
    if !name.is_empty() {
        clauses.push(api::substring_clause("name", name));
    }
    if let Some(set) = criteria.set.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push(api::exact_clause("set.id", set));
    }
    if !criteria.types.is_empty() {
        clauses.push(api::any_of_clause("types", &criteria.types));
    }
    let illustrator = criteria.illustrator.trim();
    if !illustrator.is_empty() {
        clauses.push(api::substring_clause("artist", illustrator));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}
