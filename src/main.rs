mod albums_controller;
mod api;
mod auth;
mod cache;
mod card;
mod card_set;
mod cards_controller;
mod catalog;
mod config;
mod error;
mod ledger;
mod reconciler;
mod render;
mod series;
mod session;
mod store;
#[cfg(test)]
mod testing;
mod ui;

use api::HttpTransport;
use catalog::CatalogClient;
use config::Config;
use inquire::{InquireError, Select};
use ledger::Ledger;
use session::Session;
use std::error::Error;
use store::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = reqwest::Client::builder().build()?;
    let headers = auth::get_api_headers(&config)?;
    let transport = HttpTransport::new(client, headers, config.api_base_url.clone());
    let store = FileStore::open(&config.data_dir)?;
    tracing::info!(data_dir = %store.dir().display(), "collection store opened");
    let ledger = Ledger::load(store, config.access_code.clone());
    let mut session = Session::new(
        CatalogClient::new(transport),
        ledger,
        config.export_path.clone(),
    );

    let user_name = whoami::username();
    println!("Hi, {}! welcome to your binder.", user_name);

    // Sets feed both the albums and the set filter.
    ui::with_loader("Loading sets...", session.load_sets()).await;

    loop {
        ui::print_notices(&mut session);
        let access = if session.ledger().access_granted() {
            "Enter secret code (access granted)"
        } else {
            "Enter secret code"
        };
        let menu_options: Vec<&str> = vec![
            "Albums",
            "Cards",
            access,
            "Export collection",
            "Exit",
        ];
        let menu_ans: Result<&str, InquireError> =
            Select::new("What would you like to do?", menu_options).prompt();

        match menu_ans {
            Ok("Albums") => albums_controller::show_albums(&mut session).await?,
            Ok("Cards") => cards_controller::browse_cards(&mut session).await?,
            Ok("Export collection") => {
                if let Ok(path) = session.export() {
                    tracing::debug!(path = %path.display(), "export finished");
                }
            }
            Ok("Exit") => break,
            Ok(_) => {
                ui::prompt_access_code(&mut session)?;
            }
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => break,
            Err(err @ InquireError::NotTTY) | Err(err @ InquireError::IO(_)) => {
                tracing::error!(%err, "terminal unavailable");
                return Err(err.into());
            }
            Err(err) => {
                tracing::error!(%err, "menu prompt failed");
                println!("There was an error, please try again");
            }
        }
    }

    Ok(())
}
