//! Fixtures and a scripted transport shared by the unit tests.

use crate::api::{CatalogTransport, QueryParams};
use crate::card::{Card, CardImages, SetRef};
use crate::card_set::{parse_release_date, CardSet, SetImages};
use crate::error::CatalogError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub fn set(id: &str, series: Option<&str>, release_date: &str) -> CardSet {
    CardSet {
        id: id.to_string(),
        name: format!("{} set", id),
        series: series.map(str::to_string),
        release_date: parse_release_date(release_date),
        total: 10,
        images: SetImages {
            logo: format!("https://img.test/{}/logo.png", id),
            symbol: String::new(),
        },
    }
}

pub fn card(id: &str, set_id: &str, name: &str) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        set: SetRef {
            id: set_id.to_string(),
            name: format!("{} set", set_id),
        },
        rarity: None,
        artist: None,
        types: Vec::new(),
        subtypes: Vec::new(),
        images: CardImages {
            small: format!("https://img.test/{}.png", id),
            large: format!("https://img.test/{}_hires.png", id),
        },
    }
}

pub fn envelope<T: serde::Serialize>(data: &[T], total_count: Option<u64>) -> String {
    match total_count {
        Some(total) => json!({ "data": data, "totalCount": total }).to_string(),
        None => json!({ "data": data }).to_string(),
    }
}

enum Canned {
    Body(String),
    Fail,
}

/// Answers each resource from a FIFO of canned bodies and records every call.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Canned>>>>,
    calls: Arc<Mutex<Vec<(String, QueryParams)>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, resource: &str, body: String) -> &Self {
        self.push(resource, Canned::Body(body))
    }

    pub fn fail(&self, resource: &str) -> &Self {
        self.push(resource, Canned::Fail)
    }

    fn push(&self, resource: &str, canned: Canned) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push_back(canned);
        self
    }

    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, resource: &str) -> usize {
        self.calls().iter().filter(|(r, _)| r == resource).count()
    }

    pub fn last_param(&self, resource: &str, name: &str) -> Option<String> {
        self.calls()
            .iter()
            .rev()
            .find(|(r, _)| r == resource)
            .and_then(|(_, params)| {
                params
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
            })
    }
}

#[async_trait]
impl CatalogTransport for FakeTransport {
    async fn get(&self, resource: &str, params: &QueryParams) -> Result<String, CatalogError> {
        self.calls
            .lock()
            .unwrap()
            .push((resource.to_string(), params.clone()));
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(resource)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Fail) => Err(CatalogError::Transport {
                resource: resource.to_string(),
                message: "connection reset".to_string(),
            }),
            None => Err(CatalogError::Transport {
                resource: resource.to_string(),
                message: "no canned response".to_string(),
            }),
        }
    }
}
