//! The combined sign-up / sign-in form.
//!
//! Starts on the tab the location asked for. A successful sign-up moves to
//! the sign-in tab; a successful sign-in hands over to the dashboard.

use anyhow::Result;

use dbdeck_core::routing::AuthTab;

use crate::input::Input;
use crate::{App, DIM, RESET, failure, header, success};

const SWITCH: &str = ":switch";

/// Run the form until sign-in succeeds (`true`) or input ends (`false`).
pub async fn run(app: &App, input: &mut Input, mut tab: AuthTab) -> Result<bool> {
    let auth = app.auth();
    loop {
        println!();
        header("🔐", &tab.to_string());
        println!(
            "  {DIM}Type {SWITCH} to go to {}{RESET}",
            tab.toggled()
        );
        println!();

        let Some(email) = input.prompt("Email: ").await? else {
            return Ok(false);
        };
        let email = email.trim().to_owned();
        if email == SWITCH {
            tab = tab.toggled();
            continue;
        }
        let Some(password) = input.prompt("Password: ").await? else {
            return Ok(false);
        };

        match tab {
            AuthTab::Register => match auth.register(&email, &password).await {
                Ok(outcome) => {
                    success(&outcome.message);
                    tab = AuthTab::Login;
                }
                Err(e) => failure(&e.to_string()),
            },
            AuthTab::Login => match auth.login(&email, &password).await {
                Ok(outcome) => {
                    success(&outcome.message);
                    return Ok(true);
                }
                Err(e) => failure(&e.to_string()),
            },
        }
    }
}
