//! # Users and Addresses
//!
//! The signed-in profile and its address book.
//!
//! ## Default Address Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  At most ONE address carries is_default = true.                         │
//! │                                                                         │
//! │  set_default_address("2")   Home ★  Work      ──►  Home    Work ★       │
//! │  upsert_address(new ★)      Home ★  Work      ──►  Home    Work  New ★  │
//! │  remove_address("1")        Home ★  Work      ──►  Work                 │
//! │                                                                         │
//! │  default_address(): the ★ address, else the first one, else None.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Address
// =============================================================================

/// A shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub id: String,

    /// Label shown in the address book ("Home", "Work").
    pub name: String,

    pub line1: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl Address {
    /// Generates an id for a newly entered address.
    pub fn generate_id() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("addr-{}", &id[..12])
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }

    /// Single-line form used in order summaries.
    pub fn one_line(&self) -> String {
        let mut out = self.line1.clone();
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.is_empty()) {
            out.push_str(", ");
            out.push_str(line2);
        }
        format!(
            "{}, {}, {} {}, {}",
            out, self.city, self.state, self.postal_code, self.country
        )
    }
}

// =============================================================================
// User
// =============================================================================

/// A signed-in user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl User {
    /// The address checkout pre-selects: the flagged default, else the first.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default())
            .or_else(|| self.addresses.first())
    }

    pub fn address(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Marks `id` as the default and clears the flag everywhere else.
    ///
    /// Returns `false` (and changes nothing) if the id is unknown.
    pub fn set_default_address(&mut self, id: &str) -> bool {
        if self.address(id).is_none() {
            return false;
        }
        for address in &mut self.addresses {
            address.is_default = Some(address.id == id);
        }
        true
    }

    /// Inserts or replaces an address by id.
    ///
    /// An existing address keeps its position. When the incoming address is
    /// flagged default, every other address loses the flag.
    pub fn upsert_address(&mut self, address: Address) {
        if address.is_default() {
            for existing in self.addresses.iter_mut().filter(|a| a.id != address.id) {
                existing.is_default = Some(false);
            }
        }

        match self.addresses.iter_mut().find(|a| a.id == address.id) {
            Some(slot) => *slot = address,
            None => self.addresses.push(address),
        }
    }

    /// Removes an address. Returns `true` if one was removed.
    pub fn remove_address(&mut self, id: &str) -> bool {
        let before = self.addresses.len();
        self.addresses.retain(|a| a.id != id);
        self.addresses.len() != before
    }

    /// Keeps the first flagged default and clears the rest.
    ///
    /// Applied after the address list is replaced wholesale.
    pub fn normalize_default_addresses(&mut self) {
        let mut seen = false;
        for address in &mut self.addresses {
            if address.is_default() {
                if seen {
                    address.is_default = Some(false);
                }
                seen = true;
            }
        }
    }

    /// Applies a shallow merge: every `Some` field in the patch replaces ours.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(addresses) = patch.addresses {
            self.addresses = addresses;
            self.normalize_default_addresses();
        }
    }
}

// =============================================================================
// User Patch
// =============================================================================

/// Partial profile update. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub addresses: Option<Vec<Address>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.avatar.is_none()
            && self.addresses.is_none()
    }
}

// =============================================================================
// Demo Profile
// =============================================================================

/// The fixed profile every successful sign-in attaches.
pub fn demo_user() -> User {
    User {
        id: "1".to_string(),
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        avatar: Some("https://images.unsplash.com/photo-1599566150163-29194dcaad36".to_string()),
        phone: Some("+1 (555) 123-4567".to_string()),
        addresses: vec![
            Address {
                id: "1".to_string(),
                name: "Home".to_string(),
                line1: "123 Main Street".to_string(),
                line2: Some("Apt 4B".to_string()),
                city: "New York".to_string(),
                state: "NY".to_string(),
                postal_code: "10001".to_string(),
                country: "United States".to_string(),
                phone: Some("+1 (555) 123-4567".to_string()),
                is_default: Some(true),
            },
            Address {
                id: "2".to_string(),
                name: "Work".to_string(),
                line1: "456 Business Ave".to_string(),
                line2: None,
                city: "New York".to_string(),
                state: "NY".to_string(),
                postal_code: "10002".to_string(),
                country: "United States".to_string(),
                phone: Some("+1 (555) 987-6543".to_string()),
                is_default: None,
            },
        ],
    }
}

/// The demo profile with a registrant's name and email.
pub fn registered_user(name: &str, email: &str) -> User {
    User {
        name: name.to_string(),
        email: email.to_string(),
        ..demo_user()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(user: &User) -> Vec<&str> {
        user.addresses
            .iter()
            .filter(|a| a.is_default())
            .map(|a| a.id.as_str())
            .collect()
    }

    fn office(id: &str, is_default: bool) -> Address {
        Address {
            id: id.to_string(),
            name: "Office".to_string(),
            line1: "1 Loop Rd".to_string(),
            line2: None,
            city: "Chicago".to_string(),
            state: "IL".to_string(),
            postal_code: "60601".to_string(),
            country: "United States".to_string(),
            phone: None,
            is_default: Some(is_default),
        }
    }

    #[test]
    fn test_default_address_prefers_flag_then_first() {
        let mut user = demo_user();
        assert_eq!(user.default_address().unwrap().id, "1");

        user.addresses[0].is_default = None;
        assert_eq!(user.default_address().unwrap().id, "1");

        user.addresses.clear();
        assert!(user.default_address().is_none());
    }

    #[test]
    fn test_set_default_leaves_exactly_one() {
        let mut user = demo_user();
        assert!(user.set_default_address("2"));
        assert_eq!(defaults(&user), ["2"]);

        assert!(!user.set_default_address("nope"));
        assert_eq!(defaults(&user), ["2"]);
    }

    #[test]
    fn test_upsert_new_default_clears_others() {
        let mut user = demo_user();
        user.upsert_address(office("3", true));

        assert_eq!(user.addresses.len(), 3);
        assert_eq!(defaults(&user), ["3"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut user = demo_user();
        let mut work = user.address("2").cloned().unwrap();
        work.line1 = "789 New Ave".to_string();
        user.upsert_address(work);

        assert_eq!(user.addresses.len(), 2);
        assert_eq!(user.addresses[1].line1, "789 New Ave");
        assert_eq!(defaults(&user), ["1"]);
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let mut user = demo_user();
        user.apply(UserPatch {
            phone: Some("555-0000".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "John Doe");
        assert_eq!(user.phone.as_deref(), Some("555-0000"));
        assert_eq!(user.addresses.len(), 2);
    }

    #[test]
    fn test_patch_addresses_normalizes_defaults() {
        let mut user = demo_user();
        user.apply(UserPatch {
            addresses: Some(vec![office("a", true), office("b", true)]),
            ..Default::default()
        });

        assert_eq!(defaults(&user), ["a"]);
    }

    #[test]
    fn test_registered_user_keeps_demo_template() {
        let user = registered_user("Ada", "ada@example.com");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.addresses, demo_user().addresses);
    }

    #[test]
    fn test_generated_address_ids_are_unique() {
        let a = Address::generate_id();
        assert!(a.starts_with("addr-"));
        assert_ne!(a, Address::generate_id());
    }

    #[test]
    fn test_one_line() {
        let user = demo_user();
        assert_eq!(
            user.addresses[0].one_line(),
            "123 Main Street, Apt 4B, New York, NY 10001, United States"
        );
    }
}
