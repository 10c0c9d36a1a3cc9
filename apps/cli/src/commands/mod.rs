//! # CLI Commands
//!
//! One module per storefront area. Handlers take the shared [`Storefront`]
//! and return the text to print.
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared formatting)
//! ├── catalog.rs   ◄─── catalog list | show | search | categories
//! ├── cart.rs      ◄─── cart show | add | remove | update | clear
//! ├── auth.rs      ◄─── auth login | register | logout | whoami
//! ├── profile.rs   ◄─── profile show | update, address list | add | remove | default
//! ├── theme.rs     ◄─── theme show | set
//! └── checkout.rs  ◄─── checkout, orders
//! ```
//!
//! [`Storefront`]: storefront_state::Storefront

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod profile;
pub mod theme;

use storefront_core::{Address, Product};

/// `[1] Minimalist Leather Backpack  $129.99 (was $159.99)`
pub(crate) fn product_line(product: &Product) -> String {
    let mut line = format!("[{}] {}  {}", product.id, product.name, product.price);
    if let Some(original) = product.original_price.filter(|o| *o > product.price) {
        line.push_str(&format!(" (was {})", original));
    }
    if !product.in_stock {
        line.push_str("  out of stock");
    }
    line
}

/// `[1] Home *  123 Main Street, Apt 4B, New York, NY 10001, United States`
pub(crate) fn address_line(address: &Address) -> String {
    let marker = if address.is_default() { " *" } else { "" };
    format!("[{}] {}{}  {}", address.id, address.name, marker, address.one_line())
}

#[cfg(test)]
pub(crate) mod test_support {
    use storefront_core::{Catalog, ColorScheme};
    use storefront_db::MemoryStore;
    use storefront_state::{Storefront, StorefrontConfig};

    /// A storefront over an in-memory store with no auth delay.
    pub async fn storefront() -> Storefront {
        let mut config = StorefrontConfig::default();
        config.auth.simulated_latency_ms = 0;
        config.theme.host_scheme = Some(ColorScheme::Light);
        let (storefront, _) = Storefront::open(MemoryStore::new(), &config, Catalog::demo()).await;
        storefront
    }

    pub async fn signed_in() -> Storefront {
        let storefront = storefront().await;
        assert!(storefront.session.login("john@example.com", "secret").await);
        storefront
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Catalog;

    #[test]
    fn test_product_line_shows_discount() {
        let catalog = Catalog::demo();
        let line = product_line(catalog.get_by_id("1").unwrap());
        assert!(line.starts_with("[1] Minimalist Leather Backpack  $129.99"));
        assert!(line.contains("(was "));
    }
}
