use crate::api::CatalogTransport;
use crate::reconciler::{Direction, FilterCriteria};
use crate::render;
use crate::session::{Session, View};
use crate::store::KeyValueStore;
use crate::ui::{cancelled, print_notices, prompt_access_code, with_loader};
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};
use std::error::Error;

const ALL_TYPES: &str = "All Types";
const ALL_SETS: &str = "All Sets";

pub async fn browse_cards<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
) -> Result<(), Box<dyn Error>> {
    with_loader("Loading cards...", session.navigate_to(View::Cards)).await;

    loop {
        print_notices(session);
        println!(
            "{}",
            render::cards_page(
                session.cards(),
                session.criteria(),
                session.cursor(),
                session.ledger()
            )
        );

        let cursor = session.cursor();
        let mut options = Vec::new();
        if !session.cards().is_empty() {
            options.push("Card detail");
        }
        if cursor.has_next() {
            options.push("Next page");
        }
        if cursor.has_previous() {
            options.push("Previous page");
        }
        options.extend(["Apply filters", "Reset filters", "Refresh", "Back"]);

        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", options).prompt();

        match menu_ans {
            Ok("Card detail") => {
                if let Some(card_id) = pick_card(session, false)? {
                    show_card_detail(session, &card_id)?;
                }
            }
            Ok("Next page") => {
                with_loader("Loading cards...", session.advance_page(Direction::Next)).await;
            }
            Ok("Previous page") => {
                with_loader("Loading cards...", session.advance_page(Direction::Previous)).await;
            }
            Ok("Apply filters") => match prompt_filters(session) {
                Ok(criteria) => {
                    with_loader("Loading cards...", session.apply_filters(criteria)).await;
                }
                Err(err) if cancelled(&err) => {}
                Err(err) => return Err(err.into()),
            },
            Ok("Reset filters") => {
                with_loader("Loading cards...", session.reset_filters()).await;
            }
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

fn prompt_filters<T: CatalogTransport, S: KeyValueStore>(
    session: &Session<T, S>,
) -> Result<FilterCriteria, InquireError> {
    let current = session.criteria();

    let name = Text::new("Pokémon name:")
        .with_initial_value(&current.name)
        .with_placeholder("Search by name")
        .prompt()?;

    let mut type_options = vec![ALL_TYPES.to_string()];
    type_options.extend(session.types().iter().cloned());
    let type_cursor = current
        .types
        .first()
        .and_then(|t| type_options.iter().position(|o| o == t))
        .unwrap_or(0);
    let card_type = Select::new("Type:", type_options)
        .with_starting_cursor(type_cursor)
        .prompt()?;

    let mut set_options = vec![ALL_SETS.to_string()];
    set_options.extend(
        session
            .sets()
            .iter()
            .map(|s| format!("{} [{}]", s.name, s.id)),
    );
    let set_cursor = current
        .set
        .as_deref()
        .and_then(|id| session.sets().iter().position(|s| s.id == id))
        .map_or(0, |i| i + 1);
    let set_choice = Select::new("Set:", set_options)
        .with_starting_cursor(set_cursor)
        .raw_prompt()?;
    let set = match set_choice.index {
        0 => None,
        i => session.sets().get(i - 1).map(|s| s.id.clone()),
    };

    let illustrators = session.illustrators();
    let suggest = move |input: &str| -> Result<Vec<String>, CustomUserError> {
        let needle = input.to_lowercase();
        Ok(illustrators
            .iter()
            .filter(|a| a.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    };
    let illustrator = Text::new("Illustrator:")
        .with_initial_value(&current.illustrator)
        .with_placeholder("Search by illustrator")
        .with_autocomplete(suggest)
        .prompt()?;

    Ok(FilterCriteria {
        name: name.trim().to_string(),
        set,
        types: Vec::new(),
        illustrator: illustrator.trim().to_string(),
    }
    .with_type((card_type != ALL_TYPES).then_some(card_type)))
}

/// Lets the user pick one of the listed cards; `None` when they back out.
pub fn pick_card<T: CatalogTransport, S: KeyValueStore>(
    session: &Session<T, S>,
    visible_only: bool,
) -> Result<Option<String>, InquireError> {
    let cards: Vec<_> = if visible_only {
        session.visible_cards()
    } else {
        session.cards().iter().collect()
    };
    if cards.is_empty() {
        println!("No cards to show.");
        return Ok(None);
    }
    let labels: Vec<String> = cards
        .iter()
        .map(|c| render::card_line(c, session.ledger().is_owned(&c.id)))
        .collect();

    match Select::new("Select a card to view details:", labels).raw_prompt() {
        Ok(choice) => Ok(cards.get(choice.index).map(|c| c.id.clone())),
        Err(err) if cancelled(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn show_card_detail<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
    card_id: &str,
) -> Result<(), InquireError> {
    loop {
        let Some(card) = session.find_card(card_id) else {
            return Ok(());
        };
        let owned = session.ledger().is_owned(card_id);
        println!("{}", render::card_detail(card, owned));

        let options = vec![render::ownership_action(owned), "Close"];
        match Select::new("Card:", options).prompt() {
            Ok("Close") => return Ok(()),
            Ok(_) => {
                if session.toggle_ownership(card_id).is_some() {
                    print_notices(session);
                    let owned = session.ledger().is_owned(card_id);
                    println!("{}", if owned { "✓ Owned" } else { "✗ Not Owned" });
                    return Ok(());
                }
                print_notices(session);
                let enter_code = match Confirm::new("Enter the secret code now?")
                    .with_default(true)
                    .prompt()
                {
                    Ok(answer) => answer,
                    Err(err) if cancelled(&err) => false,
                    Err(err) => return Err(err),
                };
                if enter_code {
                    prompt_access_code(session)?;
                }
            }
            Err(err) if cancelled(&err) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}
