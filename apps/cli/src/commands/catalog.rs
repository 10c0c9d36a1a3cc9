//! # Catalog Commands
//!
//! Read-only browsing of the bundled catalog.

use std::fmt::Write;

use storefront_core::{Product, ProductFilter};
use storefront_state::Storefront;

use crate::commands::product_line;
use crate::error::{AppError, AppResult};
use crate::CatalogAction;

pub fn run(storefront: &Storefront, action: CatalogAction) -> AppResult<String> {
    match action {
        CatalogAction::List { filter, category } => list(storefront, filter, category.as_deref()),
        CatalogAction::Show { id } => show(storefront, &id),
        CatalogAction::Search { query } => Ok(search(storefront, &query)),
        CatalogAction::Categories => Ok(categories(storefront)),
    }
}

/// Applies the filter chip, then narrows to one category if given.
pub fn list(
    storefront: &Storefront,
    filter: ProductFilter,
    category: Option<&str>,
) -> AppResult<String> {
    if let Some(id) = category {
        if storefront.catalog.category(id).is_none() {
            return Err(AppError::not_found("Category", id));
        }
    }

    let products: Vec<&Product> = storefront
        .catalog
        .browse(filter)
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect();

    Ok(render_list(&products))
}

pub fn show(storefront: &Storefront, id: &str) -> AppResult<String> {
    let product = storefront
        .catalog
        .get_by_id(id)
        .ok_or_else(|| AppError::not_found("Product", id))?;

    let mut out = product_line(product);
    let _ = write!(
        out,
        "\n  {:.1} stars ({} reviews)  category: {}",
        product.rating, product.review_count, product.category
    );
    if let Some(discount) = product.discount.filter(|d| *d > 0) {
        let _ = write!(out, "\n  {}% off, save {}", discount, product.savings());
    }
    if let Some(colors) = product.colors.as_ref().filter(|c| !c.is_empty()) {
        let _ = write!(out, "\n  colors: {}", colors.join(", "));
    }
    if let Some(sizes) = product.sizes.as_ref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "\n  sizes: {}", sizes.join(", "));
    }
    let _ = write!(out, "\n\n{}", product.description);
    Ok(out)
}

pub fn search(storefront: &Storefront, query: &str) -> String {
    let results = storefront.catalog.search(query);
    if results.is_empty() {
        return format!("No products match '{}'", query.trim());
    }
    render_list(&results)
}

pub fn categories(storefront: &Storefront) -> String {
    storefront
        .catalog
        .categories()
        .iter()
        .map(|c| format!("{:<12} {} ({} products)", c.id, c.name, c.product_count))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_list(products: &[&Product]) -> String {
    if products.is_empty() {
        return "No products".to_string();
    }
    products
        .iter()
        .map(|p| product_line(p))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::storefront;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_list_price_high_within_category() {
        let storefront = storefront().await;
        let out = list(&storefront, ProductFilter::PriceHigh, Some("electronics")).unwrap();
        let ids: Vec<&str> = out
            .lines()
            .map(|l| l.trim_start_matches('[').split(']').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "3", "7"]);
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let storefront = storefront().await;
        let err = list(&storefront, ProductFilter::All, Some("toys")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_show_lists_variants() {
        let storefront = storefront().await;
        let out = show(&storefront, "4").unwrap();
        assert!(out.contains("Premium Cotton T-Shirt"));
        assert!(out.contains("sizes: S, M, L, XL, XXL"));

        assert!(show(&storefront, "99").is_err());
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let storefront = storefront().await;
        assert_eq!(search(&storefront, " zeppelin "), "No products match 'zeppelin'");
        assert!(search(&storefront, "LEATHER").contains("[1]"));
    }
}
