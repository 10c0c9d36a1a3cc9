//! # Profile and Address Book Commands
//!
//! Everything here needs a signed-in session.

use storefront_core::validation::{validate_address, validate_email};
use storefront_core::{Address, User, UserPatch};
use storefront_state::Storefront;

use crate::commands::address_line;
use crate::commands::auth::whoami;
use crate::error::{AppError, AppResult};
use crate::{AddressAction, AddressArgs, ProfileAction};

fn require_user(storefront: &Storefront) -> AppResult<User> {
    storefront
        .session
        .user()
        .ok_or_else(AppError::not_authenticated)
}

pub fn run(storefront: &Storefront, action: ProfileAction) -> AppResult<String> {
    require_user(storefront)?;
    match action {
        ProfileAction::Show => Ok(whoami(storefront)),
        ProfileAction::Update { name, email, phone } => {
            if let Some(email) = &email {
                validate_email(email)?;
            }
            let patch = UserPatch {
                name,
                email,
                phone,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(AppError::validation(
                    "Nothing to update. Pass --name, --email or --phone.",
                ));
            }
            storefront.session.update_user(patch);
            Ok(format!("Profile updated.\n\n{}", whoami(storefront)))
        }
    }
}

pub fn run_address(storefront: &Storefront, action: AddressAction) -> AppResult<String> {
    let user = require_user(storefront)?;
    match action {
        AddressAction::List => Ok(list(&user)),
        AddressAction::Add(args) => {
            let address = new_address(args);
            validate_address(&address)?;
            let id = address.id.clone();
            storefront.session.save_address(address);
            Ok(format!("Saved address {}", id))
        }
        AddressAction::Remove { id } => {
            if !storefront.session.remove_address(&id) {
                return Err(AppError::not_found("Address", &id));
            }
            Ok(format!("Removed address {}", id))
        }
        AddressAction::Default { id } => {
            if !storefront.session.set_default_address(&id) {
                return Err(AppError::not_found("Address", &id));
            }
            Ok(format!("Default address is now {}", id))
        }
    }
}

fn list(user: &User) -> String {
    if user.addresses.is_empty() {
        return "No saved addresses".to_string();
    }
    user.addresses
        .iter()
        .map(address_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn new_address(args: AddressArgs) -> Address {
    Address {
        id: Address::generate_id(),
        name: args.name,
        line1: args.line1,
        line2: args.line2,
        city: args.city,
        state: args.state,
        postal_code: args.postal_code,
        country: args.country,
        phone: args.phone,
        is_default: args.default.then_some(true),
    }
}
