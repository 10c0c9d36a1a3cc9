//! # Cart Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart add 1 --qty 2 --color Black ──► CartStore::add_by_id              │
//! │  cart update 1 0                  ──► CartStore::update_quantity (→ 1)  │
//! │  cart remove 1                    ──► CartStore::remove_item            │
//! │  cart clear                       ──► CartStore::clear                  │
//! │  cart show                        ──► lines + checkout summary          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `update` and `remove` on a product that is not in the cart change
//! nothing and still succeed.

use std::fmt::Write;

use storefront_core::Cart;
use storefront_state::Storefront;

use crate::error::AppResult;
use crate::CartAction;

pub fn run(storefront: &Storefront, action: CartAction) -> AppResult<String> {
    match action {
        CartAction::Show => Ok(show(storefront)),
        CartAction::Add {
            id,
            qty,
            color,
            size,
        } => {
            storefront.cart.add_by_id(&id, qty, color, size)?;
            Ok(format!("Added {} x {}\n\n{}", qty, id, show(storefront)))
        }
        CartAction::Remove { id } => {
            storefront.cart.remove_item(&id);
            Ok(show(storefront))
        }
        CartAction::Update { id, qty } => {
            storefront.cart.update_quantity(&id, qty);
            Ok(show(storefront))
        }
        CartAction::Clear => {
            storefront.cart.clear();
            Ok("Cart cleared".to_string())
        }
    }
}

/// Lines priced at the live catalog, then the checkout summary.
pub fn show(storefront: &Storefront) -> String {
    let cart = storefront.cart.snapshot();
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let catalog = storefront.cart.catalog();
    let mut out = String::new();
    for line in cart.lines() {
        let name = catalog
            .get_by_id(&line.product_id)
            .map(|p| p.name.as_str())
            .unwrap_or("(no longer available)");
        let _ = write!(out, "[{}] {} x {}", line.product_id, name, line.quantity);
        if let Some(color) = &line.color {
            let _ = write!(out, "  color: {}", color);
        }
        if let Some(size) = &line.size {
            let _ = write!(out, "  size: {}", size);
        }
        let _ = writeln!(out, "  {}", Cart::line_total(line, catalog));
    }

    let summary = storefront.cart.checkout_summary(storefront.tax_rate());
    let _ = writeln!(out, "\nItems:    {}", cart.item_count());
    let _ = writeln!(out, "Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "Shipping: {}", summary.shipping);
    let _ = writeln!(
        out,
        "Tax:      {} ({}%)",
        summary.tax,
        storefront.tax_rate().percentage()
    );
    let _ = write!(out, "Total:    {}", summary.total);
    out
}
