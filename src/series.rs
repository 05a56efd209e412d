use crate::card_set::{CardSet, OTHER_SERIES};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Sets grouped by series label, each group newest release first.
pub type SeriesIndex = BTreeMap<String, Vec<CardSet>>;

/// Groups `sets` by series. Within a series, sets are ordered by release
/// date descending; equal dates keep their input order.
pub fn organize_series(sets: &[CardSet]) -> SeriesIndex {
    let mut index = SeriesIndex::new();
    for set in sets {
        index
            .entry(set.series_label().to_string())
            .or_default()
            .push(set.clone());
    }
    for group in index.values_mut() {
        group.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    }
    index
}

/// Series names for display: newest leading release first, "Other" last.
pub fn display_order(index: &SeriesIndex) -> Vec<&str> {
    let mut names: Vec<&str> = index.keys().map(String::as_str).collect();
    names.sort_by(|a, b| match (*a == OTHER_SERIES, *b == OTHER_SERIES) {
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        _ => {
            let newest = |name: &str| {
                index
                    .get(name)
                    .and_then(|group| group.first())
                    .and_then(|set| set.release_date)
            };
            newest(*b).cmp(&newest(*a))
        }
    });
    names
}

pub fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
