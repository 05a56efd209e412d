use crate::api::CatalogTransport;
use crate::card_set::CardSet;
use crate::cards_controller::{pick_card, show_card_detail};
use crate::render;
use crate::series::display_order;
use crate::session::{AlbumsTab, Session, View, ViewMode};
use crate::store::KeyValueStore;
use crate::ui::{cancelled, print_notices, with_loader};
use inquire::{InquireError, Select};
use std::error::Error;

pub async fn show_albums<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
) -> Result<(), Box<dyn Error>> {
    with_loader("Loading sets...", session.navigate_to(View::Albums)).await;

    loop {
        print_notices(session);
        println!(
            "{}",
            render::albums(
                session.sets(),
                session.series(),
                session.albums_tab(),
                session.ledger()
            )
        );

        let tab_option = match session.albums_tab() {
            AlbumsTab::All => "Show favorites",
            AlbumsTab::Favorites => "Show all sets",
        };
        let options = vec!["Open set", "Toggle favorite", tab_option, "Refresh", "Back"];
        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", options).prompt();

        match menu_ans {
            Ok("Open set") => {
                if let Some(set_id) = pick_set(session, "Select a set to open:")? {
                    show_set_detail(session, &set_id).await?;
                }
            }
            Ok("Toggle favorite") => {
                if let Some(set_id) = pick_set(session, "Select a set to star or unstar:")? {
                    session.toggle_favorite(&set_id);
                }
            }
            Ok("Show favorites") => session.set_albums_tab(AlbumsTab::Favorites),
            Ok("Show all sets") => session.set_albums_tab(AlbumsTab::All),
            Ok("Refresh") => {
                with_loader("Refreshing...", session.refresh()).await;
            }
            Ok(_) => break,
            Err(err) if cancelled(&err) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

/// Sets in the order the current tab shows them.
fn listed_sets<T: CatalogTransport, S: KeyValueStore>(
    session: &Session<T, S>,
) -> Vec<&CardSet> {
    match session.albums_tab() {
        AlbumsTab::Favorites => session.favorite_sets(),
        AlbumsTab::All => {
            let series = session.series();
            display_order(series)
                .into_iter()
                .flat_map(|name| series[name].iter())
                .collect()
        }
    }
}

fn pick_set<T: CatalogTransport, S: KeyValueStore>(
    session: &Session<T, S>,
    message: &str,
) -> Result<Option<String>, InquireError> {
    let sets = listed_sets(session);
    if sets.is_empty() {
        println!("No sets to show.");
        return Ok(None);
    }
    let labels: Vec<String> = sets
        .iter()
        .map(|s| render::set_line(s, session.ledger().is_favorite(&s.id)))
        .collect();

    match Select::new(message, labels).raw_prompt() {
        Ok(choice) => Ok(sets.get(choice.index).map(|s| s.id.clone())),
        Err(err) if cancelled(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

async fn show_set_detail<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
    set_id: &str,
) -> Result<(), Box<dyn Error>> {
    let target = View::SetDetail(set_id.to_string());
    with_loader("Loading cards...", session.navigate_to(target.clone())).await;
    if session.view() != &target {
        print_notices(session);
        return Ok(());
    }

    loop {
        print_notices(session);
        let Some(set) = session.find_set(set_id) else {
            break;
        };
        println!(
            "{}",
            render::set_detail(set, session.cards(), session.view_mode(), session.ledger())
        );

        let mode_option = match session.view_mode() {
            ViewMode::All => "Owned only",
            ViewMode::OwnedOnly => "All cards",
        };
        let options = vec![
            "Card detail",
            mode_option,
            "Toggle favorite",
            "Refresh",
            "Back to Albums",
        ];
        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", options).prompt();

        match menu_ans {
            Ok("Card detail") => {
                if let Some(card_id) = pick_card(session, true)? {
                    show_card_detail(session, &card_id)?;
                }
            }
            Ok("Owned only") => session.set_view_mode(ViewMode::OwnedOnly),
            Ok("All cards") => session.set_view_mode(ViewMode::All),
            Ok("Toggle favorite") => {
                if let Some(favorite) = session.toggle_favorite(set_id) {
                    let message = if favorite {
                        "★ Added to favorites"
                    } else {
                        "☆ Removed from favorites"
                    };
                    println!("{}", message);
                }
            }
            Ok("Refresh") => {
                with_loader("Refreshing...", session.refresh()).await;
            }
            Ok(_) => break,
            Err(err) if cancelled(&err) => break,
            Err(err) => return Err(err.into()),
        }
    }

    with_loader("Loading sets...", session.navigate_to(View::Albums)).await;
    Ok(())
}
