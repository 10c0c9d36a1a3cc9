//! # Checkout
//!
//! Turns a cart into a priced summary and, on confirmation, an order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart (ids only) ──► CheckoutSummary::compute(subtotal, rate)           │
//! │                        subtotal  = Σ current price × qty                │
//! │                        shipping  = free                                 │
//! │                        tax       = subtotal × rate (10% default)        │
//! │                        total     = subtotal + shipping + tax            │
//! │                                                                         │
//! │  place_order(cart, catalog, user, address?, payment, rate)              │
//! │    ├── empty cart          ──► CoreError::EmptyCart                     │
//! │    ├── no usable address   ──► CoreError::AddressNotFound               │
//! │    ├── product gone        ──► CoreError::ProductNotFound               │
//! │    └── ok ──► Order { ORD-XXXXXXXX, Processing, frozen lines }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike the cart, an order freezes a full product copy per line: order
//! history must not move when the catalog does.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, TaxRate};
use crate::product::Product;
use crate::user::{Address, User};

// =============================================================================
// Checkout Summary
// =============================================================================

/// The price breakdown on the checkout screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CheckoutSummary {
    pub fn compute(subtotal: Money, rate: TaxRate) -> Self {
        let shipping = Money::zero();
        let tax = subtotal.calculate_tax(rate);
        CheckoutSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Summary for a cart priced against `catalog`.
    pub fn for_cart(cart: &Cart, catalog: &Catalog, rate: TaxRate) -> Self {
        CheckoutSummary::compute(cart.total_price(catalog), rate)
    }
}

// =============================================================================
// Order Status / Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Card,
    #[serde(rename = "paypal")]
    PayPal,
    ApplePay,
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Card => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::ApplePay => "Apple Pay",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "card" => Ok(PaymentMethod::Card),
            "paypal" => Ok(PaymentMethod::PayPal),
            "apple-pay" | "applepay" => Ok(PaymentMethod::ApplePay),
            "cod" | "cash-on-delivery" => Ok(PaymentMethod::CashOnDelivery),
            other => Err(ValidationError::InvalidFormat {
                field: "payment".to_string(),
                reason: format!("expected card, paypal, apple-pay or cod, got '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A cart line frozen at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// `ORD-` followed by eight uppercase hex digits.
    pub id: String,

    #[ts(type = "string")]
    pub placed_at: DateTime<Utc>,

    pub status: OrderStatus,

    pub items: Vec<OrderLine>,

    pub total: Money,

    pub shipping_address: Address,

    pub payment_method: PaymentMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl Order {
    pub fn generate_id() -> String {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("ORD-{}", &hex[..8])
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| l.quantity as u64).sum()
    }
}

/// Builds an order from the current cart. The cart itself is not touched.
///
/// The shipping address is `address_id` when given, else the user's
/// default address.
pub fn place_order(
    cart: &Cart,
    catalog: &Catalog,
    user: &User,
    address_id: Option<&str>,
    payment_method: PaymentMethod,
    rate: TaxRate,
) -> CoreResult<Order> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let shipping_address = match address_id {
        Some(id) => user.address(id),
        None => user.default_address(),
    }
    .cloned()
    .ok_or_else(|| CoreError::AddressNotFound(address_id.unwrap_or("default").to_string()))?;

    let items = cart
        .lines()
        .iter()
        .map(|line| {
            let product = catalog
                .get_by_id(&line.product_id)
                .cloned()
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
            Ok(OrderLine {
                product,
                quantity: line.quantity,
                color: line.color.clone(),
                size: line.size.clone(),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let summary = CheckoutSummary::for_cart(cart, catalog, rate);

    Ok(Order {
        id: Order::generate_id(),
        placed_at: Utc::now(),
        status: OrderStatus::Processing,
        items,
        total: summary.total,
        shipping_address,
        payment_method,
        tracking_number: None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::demo_user;

    fn cart_with(catalog: &Catalog, items: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in items {
            cart.add_item(catalog.get_by_id(id).unwrap(), *qty, None, None);
        }
        cart
    }

    #[test]
    fn test_summary_at_ten_percent() {
        let summary = CheckoutSummary::compute(Money::from_cents(10000), TaxRate::CHECKOUT_DEFAULT);
        assert_eq!(summary.tax.cents(), 1000);
        assert!(summary.shipping.is_zero());
        assert_eq!(summary.total.cents(), 11000);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let catalog = Catalog::demo();
        let err = place_order(
            &Cart::new(),
            &catalog,
            &demo_user(),
            None,
            PaymentMethod::Card,
            TaxRate::CHECKOUT_DEFAULT,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_order_uses_default_address_and_freezes_lines() {
        let catalog = Catalog::demo();
        let cart = cart_with(&catalog, &[("5", 1), ("8", 1)]);

        let order = place_order(
            &cart,
            &catalog,
            &demo_user(),
            None,
            PaymentMethod::PayPal,
            TaxRate::CHECKOUT_DEFAULT,
        )
        .unwrap();

        assert!(order.id.starts_with("ORD-"));
        assert_eq!(order.id.len(), 12);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.shipping_address.id, "1");
        assert_eq!(order.items[1].product.name, "Minimalist Wall Clock");
        // (42.99 + 49.99) × 1.10 = 102.278 → 102.28
        assert_eq!(order.total.cents(), 10228);
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_explicit_address() {
        let catalog = Catalog::demo();
        let cart = cart_with(&catalog, &[("4", 2)]);
        let user = demo_user();

        let order = place_order(&cart, &catalog, &user, Some("2"), PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT).unwrap();
        assert_eq!(order.shipping_address.name, "Work");

        let err = place_order(&cart, &catalog, &user, Some("9"), PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT).unwrap_err();
        assert!(matches!(err, CoreError::AddressNotFound(id) if id == "9"));
    }

    #[test]
    fn test_no_addresses() {
        let catalog = Catalog::demo();
        let cart = cart_with(&catalog, &[("4", 1)]);
        let mut user = demo_user();
        user.addresses.clear();

        let err = place_order(&cart, &catalog, &user, None, PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT).unwrap_err();
        assert!(matches!(err, CoreError::AddressNotFound(_)));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("apple-pay".parse::<PaymentMethod>().unwrap(), PaymentMethod::ApplePay);
        assert_eq!("COD".parse::<PaymentMethod>().unwrap(), PaymentMethod::CashOnDelivery);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert_eq!(serde_json::to_string(&PaymentMethod::PayPal).unwrap(), "\"paypal\"");
    }
}
