//! # Theme Commands

use storefront_core::ThemePreference;
use storefront_state::Storefront;

use crate::error::AppResult;
use crate::ThemeAction;

pub fn run(storefront: &Storefront, action: ThemeAction) -> AppResult<String> {
    match action {
        ThemeAction::Show => Ok(show(storefront)),
        ThemeAction::Set { theme } => {
            storefront.theme.set_theme(theme);
            Ok(show(storefront))
        }
    }
}

/// `theme: system (dark, following host)`
pub fn show(storefront: &Storefront) -> String {
    let preference = storefront.theme.preference();
    let effective = storefront.theme.effective_mode();
    match preference {
        ThemePreference::System => format!("theme: system ({}, following host)", effective),
        _ => format!("theme: {}", effective),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::storefront;

    #[tokio::test]
    async fn test_show_and_set() {
        let storefront = storefront().await;
        assert_eq!(show(&storefront), "theme: system (light, following host)");

        let out = run(
            &storefront,
            ThemeAction::Set {
                theme: ThemePreference::Dark,
            },
        )
        .unwrap();
        assert_eq!(out, "theme: dark");
    }
}
