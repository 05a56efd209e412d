//! Text rendering for the terminal views. Every function here is pure.

use crate::card::Card;
use crate::card_set::CardSet;
use crate::ledger::Ledger;
use crate::reconciler::{FilterCriteria, PaginationCursor};
use crate::series::{display_order, slugify, SeriesIndex};
use crate::session::{AlbumsTab, Notice, ViewMode};
use crate::store::KeyValueStore;
use std::fmt::Write;

pub fn set_line(set: &CardSet, favorite: bool) -> String {
    format!(
        "{} {} [{}] {} • {} cards",
        if favorite { "★" } else { "☆" },
        set.name,
        set.id,
        set.release_label(),
        set.total
    )
}

pub fn card_line(card: &Card, owned: bool) -> String {
    format!(
        "{} {} [{}]{}",
        if owned { "●" } else { "○" },
        card.name,
        card.id,
        if owned { " Owned" } else { "" }
    )
}

pub fn albums<S: KeyValueStore>(
    sets: &[CardSet],
    series: &SeriesIndex,
    tab: AlbumsTab,
    ledger: &Ledger<S>,
) -> String {
    let mut out = String::new();
    match tab {
        AlbumsTab::All => {
            let _ = writeln!(out, "[All Sets]  Favorites");
            for name in display_order(series) {
                let group = &series[name];
                let _ = writeln!(
                    out,
                    "\n== {} ({}) #{}",
                    name,
                    group.len(),
                    slugify(name)
                );
                for set in group {
                    let favorite = ledger.is_favorite(&set.id);
                    let _ = writeln!(out, "  {}", set_line(set, favorite));
                }
            }
        }
        AlbumsTab::Favorites => {
            let _ = writeln!(out, "All Sets  [Favorites]\n\n== Favorite Sets");
            let favorites: Vec<&CardSet> =
                sets.iter().filter(|s| ledger.is_favorite(&s.id)).collect();
            if favorites.is_empty() {
                let _ = writeln!(
                    out,
                    "You haven't added any sets to your favorites yet. Star sets to add them here!"
                );
            }
            for set in favorites {
                let _ = writeln!(out, "  {}", set_line(set, true));
            }
        }
    }
    out
}

pub fn set_detail<S: KeyValueStore>(
    set: &CardSet,
    cards: &[Card],
    mode: ViewMode,
    ledger: &Ledger<S>,
) -> String {
    let owned = ledger.owned_count(cards.iter().map(|c| c.id.as_str()));
    let mut out = String::new();
    let _ = writeln!(out, "{}", set.name);
    let _ = writeln!(
        out,
        "Released on {} • {} cards • {} of {} owned",
        set.release_label(),
        set.total,
        owned,
        cards.len()
    );
    let _ = writeln!(
        out,
        "{}",
        match mode {
            ViewMode::All => "[All Cards]  Owned Only",
            ViewMode::OwnedOnly => "All Cards  [Owned Only]",
        }
    );
    for card in cards {
        let is_owned = ledger.is_owned(&card.id);
        if mode == ViewMode::All || is_owned {
            let _ = writeln!(out, "  {}", card_line(card, is_owned));
        }
    }
    out
}

pub fn card_detail(card: &Card, owned: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.name);
    let _ = writeln!(out, "{} • {}", card.set.name, card.rarity_label());
    let _ = writeln!(out, "Image: {}", card.images.large);
    if !card.subtypes.is_empty() {
        let _ = writeln!(out, "Subtypes: {}", card.subtypes.join(", "));
    }
    if !card.types.is_empty() {
        let _ = writeln!(out, "Types: {}", card.types.join(", "));
    }
    if let Some(artist) = &card.artist {
        let _ = writeln!(out, "Illustrator: {}", artist);
    }
    let _ = writeln!(out, "{}", ownership_action(owned));
    out
}

pub fn ownership_action(owned: bool) -> &'static str {
    if owned {
        "Mark as Not Owned"
    } else {
        "Mark as Owned"
    }
}

pub fn filters(criteria: &FilterCriteria) -> String {
    if criteria.is_empty() {
        return "No filters applied".to_string();
    }
    let or_any = |value: &str, any: &str| {
        if value.trim().is_empty() {
            any.to_string()
        } else {
            value.to_string()
        }
    };
    format!(
        "Name: {} | Type: {} | Set: {} | Illustrator: {}",
        or_any(&criteria.name, "any"),
        criteria.types.first().map(String::as_str).unwrap_or("All Types"),
        or_any(criteria.set.as_deref().unwrap_or(""), "All Sets"),
        or_any(&criteria.illustrator, "any"),
    )
}

pub fn page_indicator(cursor: PaginationCursor) -> String {
    format!(
        "{}Page {} of {}{}",
        if cursor.has_previous() { "< " } else { "  " },
        cursor.current_page(),
        cursor.total_pages(),
        if cursor.has_next() { " >" } else { "" }
    )
}

pub fn cards_page<S: KeyValueStore>(
    cards: &[Card],
    criteria: &FilterCriteria,
    cursor: PaginationCursor,
    ledger: &Ledger<S>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Browse Cards\n{}", filters(criteria));
    if cards.is_empty() {
        let _ = writeln!(out, "  No cards match these filters.");
    }
    for card in cards {
        let _ = writeln!(out, "  {}", card_line(card, ledger.is_owned(&card.id)));
    }
    let _ = writeln!(out, "{}", page_indicator(cursor));
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice {
        Notice::Error(message) => format!("✖ {}", message),
        Notice::Blocking(message) => format!("! {}", message),
        Notice::Info(message) => format!("✔ {}", message),
    }
}
