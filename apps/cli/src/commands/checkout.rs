//! # Checkout Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout --address 2 --payment paypal                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storefront::checkout                                                   │
//! │       ├── no session      ──► NOT_AUTHENTICATED                         │
//! │       ├── empty cart      ──► CHECKOUT_ERROR                            │
//! │       ├── unknown address ──► NOT_FOUND                                 │
//! │       └── ok ──► order recorded, cart emptied, confirmation printed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write;

use storefront_core::{Order, PaymentMethod};
use storefront_state::Storefront;

use crate::error::AppResult;

pub fn place(
    storefront: &Storefront,
    address_id: Option<&str>,
    payment: PaymentMethod,
) -> AppResult<String> {
    let order = storefront.checkout(address_id, payment)?;
    Ok(format!("Order placed!\n\n{}", render_order(&order)))
}

pub fn list_orders(storefront: &Storefront) -> String {
    let orders = storefront.orders.list();
    if orders.is_empty() {
        return "No orders yet".to_string();
    }
    orders
        .iter()
        .map(|o| {
            format!(
                "{}  {}  {} items  {}  {}",
                o.id,
                o.placed_at.format("%Y-%m-%d %H:%M"),
                o.item_count(),
                o.total,
                o.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}  ({})", order.id, order.status);
    for line in &order.items {
        let _ = writeln!(
            out,
            "  {} x {}  {}",
            line.product.name,
            line.quantity,
            line.line_total()
        );
    }
    let _ = writeln!(out, "Ship to: {}", order.shipping_address.one_line());
    let _ = writeln!(out, "Payment: {}", order.payment_method);
    let _ = write!(out, "Total:   {}", order.total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{signed_in, storefront};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_checkout_needs_session() {
        let storefront = storefront().await;
        storefront.cart.add_by_id("1", 1, None, None).unwrap();
        let err = place(&storefront, None, PaymentMethod::Card).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let storefront = signed_in().await;
        let err = place(&storefront, None, PaymentMethod::Card).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutError);
    }

    #[tokio::test]
    async fn test_checkout_records_order() {
        let storefront = signed_in().await;
        storefront.cart.add_by_id("5", 2, None, None).unwrap();

        let out = place(&storefront, Some("2"), PaymentMethod::PayPal).unwrap();
        assert!(out.contains("Ceramic Pour-Over Coffee Maker x 2  $85.98"));
        assert!(out.contains("Ship to: 456 Business Ave"));
        assert!(out.contains("Payment: PayPal"));
        assert!(out.contains("Total:   $94.58"));

        assert!(storefront.cart.is_empty());
        assert_eq!(storefront.orders.len(), 1);
        assert!(list_orders(&storefront).contains("2 items"));
    }

    #[tokio::test]
    async fn test_unknown_address() {
        let storefront = signed_in().await;
        storefront.cart.add_by_id("5", 1, None, None).unwrap();
        let err = place(&storefront, Some("nope"), PaymentMethod::Card).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!storefront.cart.is_empty());
    }
}
