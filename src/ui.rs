use crate::api::CatalogTransport;
use crate::render;
use crate::session::Session;
use crate::store::KeyValueStore;
use indicatif::ProgressBar;
use inquire::{InquireError, Password, PasswordDisplayMode};
use std::future::Future;
use std::time::Duration;

/// Shows a spinner while `fut` runs.
pub async fn with_loader<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = fut.await;
    spinner.finish_and_clear();
    output
}

pub fn print_notices<T: CatalogTransport, S: KeyValueStore>(session: &mut Session<T, S>) {
    for notice in session.take_notices() {
        println!("{}", render::notice(&notice));
    }
}

pub fn prompt_access_code<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
) -> Result<bool, InquireError> {
    let answer = Password::new("Secret code:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt();
    apply_access_answer(session, answer)
}

/// Submits a code prompt's answer. Esc leaves the gate as it was.
pub fn apply_access_answer<T: CatalogTransport, S: KeyValueStore>(
    session: &mut Session<T, S>,
    answer: Result<String, InquireError>,
) -> Result<bool, InquireError> {
    match answer {
        Ok(code) => {
            let granted = session.submit_access_code(&code);
            print_notices(session);
            Ok(granted)
        }
        Err(err) if cancelled(&err) => Ok(session.ledger().access_granted()),
        Err(err) => Err(err),
    }
}

/// Esc goes back one level; anything else is a real failure.
pub fn cancelled(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled)
}
