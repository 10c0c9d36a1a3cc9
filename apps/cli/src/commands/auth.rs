//! # Auth Commands
//!
//! Sign-in and sign-up wait out the simulated latency before printing.
//! Sign-up also applies the form checks the register screen does (email
//! shape, minimum password length) before the request is started.

use storefront_core::validation::{validate_email, validate_password};
use storefront_state::{AuthOutcome, Storefront};

use crate::commands::address_line;
use crate::error::{AppError, AppResult};
use crate::AuthAction;

pub async fn run(storefront: &Storefront, action: AuthAction) -> AppResult<String> {
    match action {
        AuthAction::Login { email, password } => login(storefront, &email, &password).await,
        AuthAction::Register {
            name,
            email,
            password,
        } => register(storefront, &name, &email, &password).await,
        AuthAction::Logout => {
            storefront.session.logout();
            Ok("Signed out".to_string())
        }
        AuthAction::Whoami => Ok(whoami(storefront)),
    }
}

pub async fn login(storefront: &Storefront, email: &str, password: &str) -> AppResult<String> {
    let outcome = storefront.session.begin_login(email, password).wait().await;
    finish(storefront, outcome)
}

pub async fn register(
    storefront: &Storefront,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<String> {
    if !email.is_empty() {
        validate_email(email)?;
    }
    if !password.is_empty() {
        validate_password(password)?;
    }

    let outcome = storefront
        .session
        .begin_register(name, email, password)
        .wait()
        .await;
    finish(storefront, outcome)
}

fn finish(storefront: &Storefront, outcome: AuthOutcome) -> AppResult<String> {
    match outcome {
        AuthOutcome::Authenticated => Ok(format!("Signed in.\n\n{}", whoami(storefront))),
        AuthOutcome::Rejected(reason) => Err(reason.into()),
        AuthOutcome::Cancelled => Err(AppError::internal("Sign-in was cancelled")),
    }
}

pub fn whoami(storefront: &Storefront) -> String {
    let Some(user) = storefront.session.user() else {
        return "Not signed in".to_string();
    };

    let mut lines = vec![format!("{} <{}>", user.name, user.email)];
    if let Some(phone) = &user.phone {
        lines.push(format!("phone: {}", phone));
    }
    if let Some(address) = user.default_address() {
        lines.push(format!("ships to: {}", address_line(address)));
    }
    lines.join("\n")
}
