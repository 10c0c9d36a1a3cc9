//! # Catalog
//!
//! The static product collection and the queries screens run against it.
//!
//! ## Query Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen              Query                        Result                │
//! │  ──────              ─────                        ──────                │
//! │  Product page   ───► get_by_id("3")          ───► Option<&Product>      │
//! │  Category page  ───► get_by_category("home") ───► Vec<&Product>         │
//! │  Home           ───► featured() / new_arrivals()                        │
//! │  Search         ───► search("watch")         ───► name/description/     │
//! │                                                   category match        │
//! │  Search filters ───► browse(PriceLow)        ───► stable price sort     │
//! │                                                                         │
//! │  Unknown ids give None / empty, never an error.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::product::{Banner, Category, Product};

// =============================================================================
// Price Lookup
// =============================================================================

/// Resolves a product's *current* price.
///
/// Cart totals are computed through this at read time, so a catalog price
/// change is reflected in every cart that holds the product.
pub trait PriceLookup {
    /// Returns the current price, or `None` if the product is unknown.
    fn price_of(&self, product_id: &str) -> Option<Money>;
}

impl PriceLookup for Catalog {
    fn price_of(&self, product_id: &str) -> Option<Money> {
        self.get_by_id(product_id).map(|p| p.price)
    }
}

impl PriceLookup for [Product] {
    fn price_of(&self, product_id: &str) -> Option<Money> {
        self.iter().find(|p| p.id == product_id).map(|p| p.price)
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Filter chips on the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProductFilter {
    #[default]
    All,
    Featured,
    New,
    Discount,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl FromStr for ProductFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(ProductFilter::All),
            "featured" => Ok(ProductFilter::Featured),
            "new" => Ok(ProductFilter::New),
            "discount" | "sale" => Ok(ProductFilter::Discount),
            "price_low" => Ok(ProductFilter::PriceLow),
            "price_high" => Ok(ProductFilter::PriceHigh),
            other => Err(ValidationError::InvalidFormat {
                field: "filter".to_string(),
                reason: format!(
                    "unknown filter '{}', expected all, featured, new, discount, price_low or price_high",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Static product collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    banners: Vec<Banner>,
}

impl Catalog {
    /// Creates a catalog over the given fixtures.
    pub fn new(products: Vec<Product>, categories: Vec<Category>, banners: Vec<Banner>) -> Self {
        Catalog {
            products,
            categories,
            banners,
        }
    }

    /// The demo storefront: eight products, six categories, three banners.
    pub fn demo() -> Self {
        Catalog::new(demo_products(), demo_categories(), demo_banners())
    }

    /// All products in fixture order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Looks up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Looks up a product by id.
    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in a category, in fixture order.
    pub fn get_by_category(&self, category_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category_id)
            .collect()
    }

    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_featured()).collect()
    }

    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_new_arrival()).collect()
    }

    pub fn discounted(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_discounted()).collect()
    }

    /// Case-insensitive substring search over name, description and category.
    ///
    /// A blank query returns every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Applies a search-screen filter chip.
    ///
    /// Price sorts are stable, so equal prices keep fixture order.
    pub fn browse(&self, filter: ProductFilter) -> Vec<&Product> {
        match filter {
            ProductFilter::All => self.products.iter().collect(),
            ProductFilter::Featured => self.featured(),
            ProductFilter::New => self.new_arrivals(),
            ProductFilter::Discount => self.discounted(),
            ProductFilter::PriceLow => {
                let mut sorted: Vec<&Product> = self.products.iter().collect();
                sorted.sort_by_key(|p| p.price);
                sorted
            }
            ProductFilter::PriceHigh => {
                let mut sorted: Vec<&Product> = self.products.iter().collect();
                sorted.sort_by_key(|p| std::cmp::Reverse(p.price));
                sorted
            }
        }
    }

    /// Replaces a product's price.
    ///
    /// Returns `false` if the id is unknown.
    pub fn set_price(&mut self, product_id: &str, price: Money) -> bool {
        match self.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                product.price = price;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Demo Fixtures
// =============================================================================

const IMG: &str = "https://images.unsplash.com/photo-";

fn images(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| format!("{IMG}{id}")).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Minimalist Leather Backpack".to_string(),
            price: Money::from_cents(12999),
            original_price: Some(Money::from_cents(15999)),
            description: "A sleek, minimalist backpack crafted from premium full-grain leather. Features a padded laptop compartment, multiple interior pockets, and adjustable shoulder straps for all-day comfort.".to_string(),
            images: images(&[
                "1622560480605-d83c853bc5c3",
                "1548036328-c9fa89d128fa",
                "1544816155-12df9643f363",
            ]),
            rating: 4.8,
            review_count: 124,
            category: "bags".to_string(),
            tags: strings(&["leather", "backpack", "accessories"]),
            colors: Some(strings(&["#6B3E2E", "#000000", "#D3D3D3"])),
            sizes: None,
            in_stock: true,
            featured: Some(true),
            is_new: None,
            discount: Some(19),
        },
        Product {
            id: "2".to_string(),
            name: "Wireless Noise-Cancelling Headphones".to_string(),
            price: Money::from_cents(24999),
            original_price: None,
            description: "Premium wireless headphones with active noise cancellation, 30-hour battery life, and crystal-clear sound quality. Includes a carrying case and charging cable.".to_string(),
            images: images(&[
                "1505740420928-5e560c06d30e",
                "1583394838336-acd977736f90",
                "1487215078519-e21cc028cb29",
            ]),
            rating: 4.7,
            review_count: 89,
            category: "electronics".to_string(),
            tags: strings(&["headphones", "wireless", "audio"]),
            colors: Some(strings(&["#000000", "#FFFFFF", "#C0C0C0"])),
            sizes: None,
            in_stock: true,
            featured: Some(true),
            is_new: None,
            discount: None,
        },
        Product {
            id: "3".to_string(),
            name: "Smart Fitness Watch".to_string(),
            price: Money::from_cents(19999),
            original_price: Some(Money::from_cents(24999)),
            description: "Track your fitness goals with this advanced smartwatch. Features heart rate monitoring, GPS tracking, sleep analysis, and is water-resistant up to 50 meters.".to_string(),
            images: images(&[
                "1579586337278-3befd40fd17a",
                "1508685096489-7aacd43bd3b1",
                "1434494878577-86c23bcb06b9",
            ]),
            rating: 4.5,
            review_count: 76,
            category: "electronics".to_string(),
            tags: strings(&["watch", "fitness", "smart"]),
            colors: Some(strings(&["#000000", "#C0C0C0", "#FF69B4"])),
            sizes: None,
            in_stock: true,
            featured: None,
            is_new: Some(true),
            discount: Some(20),
        },
        Product {
            id: "4".to_string(),
            name: "Premium Cotton T-Shirt".to_string(),
            price: Money::from_cents(2999),
            original_price: None,
            description: "Ultra-soft premium cotton t-shirt with a relaxed fit. Breathable, comfortable, and perfect for everyday wear.".to_string(),
            images: images(&[
                "1521572163474-6864f9cf17ab",
                "1503341504253-dff4815485f1",
                "1529374255404-311a2a4f1fd9",
            ]),
            rating: 4.3,
            review_count: 215,
            category: "clothing".to_string(),
            tags: strings(&["t-shirt", "cotton", "casual"]),
            colors: Some(strings(&["#FFFFFF", "#000000", "#808080", "#ADD8E6"])),
            sizes: Some(strings(&["S", "M", "L", "XL", "XXL"])),
            in_stock: true,
            featured: None,
            is_new: None,
            discount: None,
        },
        Product {
            id: "5".to_string(),
            name: "Ceramic Pour-Over Coffee Maker".to_string(),
            price: Money::from_cents(4299),
            original_price: None,
            description: "Handcrafted ceramic pour-over coffee maker for the perfect cup every time. Includes a reusable stainless steel filter and wooden stand.".to_string(),
            images: images(&[
                "1570968915860-54d5c301fa9f",
                "1606791405792-1004f1d5e60a",
                "1610889556528-9a770e32642f",
            ]),
            rating: 4.6,
            review_count: 58,
            category: "home".to_string(),
            tags: strings(&["coffee", "kitchen", "ceramic"]),
            colors: Some(strings(&["#FFFFFF", "#000000", "#8B4513"])),
            sizes: None,
            in_stock: true,
            featured: None,
            is_new: Some(true),
            discount: None,
        },
        Product {
            id: "6".to_string(),
            name: "Slim Fit Denim Jeans".to_string(),
            price: Money::from_cents(7999),
            original_price: Some(Money::from_cents(9999)),
            description: "Classic slim-fit denim jeans with a comfortable stretch. Features five pockets and a button closure with zip fly.".to_string(),
            images: images(&[
                "1542272604-787c3835535d",
                "1582552938357-32b906df40cb",
                "1604176424472-9d7122c67c3c",
            ]),
            rating: 4.4,
            review_count: 132,
            category: "clothing".to_string(),
            tags: strings(&["jeans", "denim", "pants"]),
            colors: Some(strings(&["#191970", "#000080", "#000000"])),
            sizes: Some(strings(&["28", "30", "32", "34", "36", "38"])),
            in_stock: true,
            featured: None,
            is_new: None,
            discount: Some(20),
        },
        Product {
            id: "7".to_string(),
            name: "Portable Bluetooth Speaker".to_string(),
            price: Money::from_cents(8999),
            original_price: None,
            description: "Compact, waterproof Bluetooth speaker with 20-hour battery life and immersive 360° sound. Perfect for outdoor adventures.".to_string(),
            images: images(&[
                "1608043152269-423dbba4e7e1",
                "1589003077984-894e133dabab",
                "1558537348-c0f8e733989d",
            ]),
            rating: 4.2,
            review_count: 97,
            category: "electronics".to_string(),
            tags: strings(&["speaker", "bluetooth", "audio"]),
            colors: Some(strings(&["#000000", "#FF0000", "#0000FF"])),
            sizes: None,
            in_stock: true,
            featured: None,
            is_new: None,
            discount: None,
        },
        Product {
            id: "8".to_string(),
            name: "Minimalist Wall Clock".to_string(),
            price: Money::from_cents(4999),
            original_price: None,
            description: "Modern minimalist wall clock with a silent sweep mechanism. Made from sustainable bamboo with a clean, Scandinavian design.".to_string(),
            images: images(&[
                "1563861826100-9cb868fdbe1c",
                "1507646227500-4d389b0012be",
                "1565193566173-7a0ee3dbe261",
            ]),
            rating: 4.8,
            review_count: 43,
            category: "home".to_string(),
            tags: strings(&["clock", "decor", "wall"]),
            colors: Some(strings(&["#FFFFFF", "#000000", "#8B4513"])),
            sizes: None,
            in_stock: true,
            featured: Some(true),
            is_new: None,
            discount: None,
        },
    ]
}

fn demo_categories() -> Vec<Category> {
    let category = |id: &str, name: &str, image: &str, product_count: u32| Category {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("{IMG}{image}"),
        product_count,
    };

    vec![
        category("clothing", "Clothing", "1489987707025-afc232f7ea0f", 120),
        category("electronics", "Electronics", "1550009158-9ebf69173e03", 85),
        category("home", "Home & Living", "1583847268964-b28dc8f51f92", 74),
        category("bags", "Bags & Accessories", "1590874103328-eac38a683ce7", 32),
        category("beauty", "Beauty", "1596462502278-27bfdc403348", 56),
        category("sports", "Sports & Outdoors", "1517836357463-d25dfeac3438", 48),
    ]
}

fn demo_banners() -> Vec<Banner> {
    let banner = |id: &str, title: &str, subtitle: &str, image: &str, button: &str, category: &str| {
        Banner {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            image: format!("{IMG}{image}"),
            button_text: button.to_string(),
            link: format!("/category/{category}"),
        }
    };

    vec![
        banner("1", "Summer Collection", "Up to 50% off on selected items", "1607083206968-13611e3d76db", "Shop Now", "clothing"),
        banner("2", "New Electronics", "Latest gadgets and accessories", "1593642702821-c8da6771f0c6", "Explore", "electronics"),
        banner("3", "Home Essentials", "Transform your living space", "1616486338812-3dadae4b4ace", "Discover", "home"),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.get_by_id("3").unwrap().name, "Smart Fitness Watch");
        assert!(catalog.get_by_id("999").is_none());
    }

    #[test]
    fn test_get_by_category() {
        let catalog = Catalog::demo();
        assert_eq!(ids(&catalog.get_by_category("electronics")), ["2", "3", "7"]);
        assert!(catalog.get_by_category("beauty").is_empty());
        assert!(catalog.get_by_category("nope").is_empty());
    }

    #[test]
    fn test_predicate_filters() {
        let catalog = Catalog::demo();
        assert_eq!(ids(&catalog.featured()), ["1", "2", "8"]);
        assert_eq!(ids(&catalog.new_arrivals()), ["3", "5"]);
        assert_eq!(ids(&catalog.discounted()), ["1", "3", "6"]);
    }

    #[test]
    fn test_search_matches_name_description_and_category() {
        let catalog = Catalog::demo();
        assert_eq!(ids(&catalog.search("WATCH")), ["3"]);
        // "bamboo" only appears in a description
        assert_eq!(ids(&catalog.search("bamboo")), ["8"]);
        // category id match
        assert_eq!(ids(&catalog.search("bags")), ["1"]);
        assert_eq!(catalog.search("  ").len(), 8);
        assert!(catalog.search("zzz").is_empty());
    }

    #[test]
    fn test_browse_price_sorts() {
        let catalog = Catalog::demo();
        let low = catalog.browse(ProductFilter::PriceLow);
        assert_eq!(low.first().unwrap().id, "4");
        assert_eq!(low.last().unwrap().id, "2");

        let high = catalog.browse(ProductFilter::PriceHigh);
        assert_eq!(high.first().unwrap().id, "2");
        assert_eq!(high.len(), 8);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("price-low".parse::<ProductFilter>().unwrap(), ProductFilter::PriceLow);
        assert_eq!("Featured".parse::<ProductFilter>().unwrap(), ProductFilter::Featured);
        assert!("cheapest".parse::<ProductFilter>().is_err());
    }

    #[test]
    fn test_price_lookup_reflects_price_change() {
        let mut catalog = Catalog::demo();
        assert_eq!(catalog.price_of("4"), Some(Money::from_cents(2999)));

        assert!(catalog.set_price("4", Money::from_cents(1999)));
        assert_eq!(catalog.price_of("4"), Some(Money::from_cents(1999)));
        assert!(!catalog.set_price("404", Money::zero()));
        assert_eq!(catalog.price_of("404"), None);
    }

    #[test]
    fn test_categories_and_banners() {
        let catalog = Catalog::demo();
        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.category("home").unwrap().name, "Home & Living");
        assert_eq!(catalog.banners()[0].link, "/category/clothing");
    }
}
