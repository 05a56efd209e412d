//! Filter and pagination state for the card browser.
//!
//! Queries are split into an issue step (which decides what to fetch) and a
//! settle step (which commits the outcome). Responses commit in the order
//! they settle, so when two queries overlap the one that resolves last wins.
//! A superseded query that settles last is still committed and logged.

use crate::card::Card;
use crate::catalog::{CardPage, PAGE_SIZE};
use crate::error::CatalogError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: String,
    pub set: Option<String>,
    /// At most one entry is produced by the filter form; picking a type replaces it.
    pub types: Vec<String>,
    pub illustrator: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.set.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.types.is_empty()
            && self.illustrator.trim().is_empty()
    }

    pub fn with_type(mut self, card_type: Option<String>) -> Self {
        self.types = card_type.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    current_page: u32,
    total_pages: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        PaginationCursor {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl PaginationCursor {
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    fn reset(&mut self) {
        self.current_page = 1;
    }

    fn commit(&mut self, page: u32, total_count: Option<u64>) {
        self.total_pages = total_pages_for(total_count);
        self.current_page = page.clamp(1, self.total_pages);
    }
}

/// `ceil(total / PAGE_SIZE)`, never below one.
pub fn total_pages_for(total_count: Option<u64>) -> u32 {
    match total_count {
        Some(total) if total > 0 => {
            let pages = total.div_ceil(u64::from(PAGE_SIZE));
            u32::try_from(pages).unwrap_or(u32::MAX)
        }
        _ => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// A card query the reconciler wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub criteria: FilterCriteria,
    pub page: u32,
    pub ticket: u64,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    criteria: FilterCriteria,
    cursor: PaginationCursor,
    last_ticket: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor
    }

    /// Replaces the criteria wholesale and restarts at page 1.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> PageQuery {
        if criteria != self.criteria {
            debug!(?criteria, "filter criteria changed");
        }
        self.criteria = criteria;
        self.cursor.reset();
        self.issue(1)
    }

    pub fn reset_filters(&mut self) -> PageQuery {
        self.apply_filters(FilterCriteria::default())
    }

    /// Returns `None` when the step would leave `[1, total_pages]`.
    /// The cursor only moves once the returned query settles successfully.
    pub fn advance_page(&mut self, direction: Direction) -> Option<PageQuery> {
        let target = match direction {
            Direction::Previous if self.cursor.has_previous() => self.cursor.current_page - 1,
            Direction::Next if self.cursor.has_next() => self.cursor.current_page + 1,
            _ => {
                debug!(
                    ?direction,
                    page = self.cursor.current_page,
                    "page step out of range ignored"
                );
                return None;
            }
        };
        Some(self.issue(target))
    }

    /// Query for the current criteria and page, used on (re)load.
    pub fn current_query(&mut self) -> PageQuery {
        self.issue(self.cursor.current_page)
    }

    /// Navigating to the card browser starts from the first page.
    pub fn restart(&mut self) {
        self.cursor.reset();
    }

    fn issue(&mut self, page: u32) -> PageQuery {
        self.last_ticket += 1;
        debug!(ticket = self.last_ticket, page, "card query issued");
        PageQuery {
            criteria: self.criteria.clone(),
            page,
            ticket: self.last_ticket,
        }
    }

    /// Commits a settled query. Success moves the cursor to the query's page
    /// and recomputes the page count; failure leaves the cursor untouched.
    pub fn settle(
        &mut self,
        query: &PageQuery,
        outcome: Result<CardPage, CatalogError>,
    ) -> Result<Vec<Card>, CatalogError> {
        if query.ticket < self.last_ticket {
            warn!(
                ticket = query.ticket,
                latest = self.last_ticket,
                "superseded card query settled; its result is shown"
            );
        }
        let page = outcome?;
        self.criteria = query.criteria.clone();
        self.cursor.commit(query.page, page.total_count);
        debug!(
            ticket = query.ticket,
            page = self.cursor.current_page,
            total_pages = self.cursor.total_pages,
            "card query settled"
        );
        Ok(page.cards)
    }
}
