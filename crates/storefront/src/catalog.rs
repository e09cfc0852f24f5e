//! Static product catalog.
//!
//! The catalog is built once at startup and never changes while the process
//! runs. Products are handed out as `Arc<Product>` so cart line items can
//! share them without copying.

use std::sync::Arc;

use shoe_store_core::{Price, ProductId};

use crate::models::Product;

/// Size labels offered for every shoe in the store.
pub const STANDARD_SIZES: [&str; 6] = ["7", "8", "9", "10", "11", "12"];

/// Raw catalog entry: id, name, price, image, category, description.
type Entry = (i32, &'static str, u32, &'static str, &'static str, &'static str);

const ENTRIES: [Entry; 6] = [
    (
        1,
        "Classic Runner",
        129,
        "https://images.pexels.com/photos/2529148/pexels-photo-2529148.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Running",
        "Perfect for daily runs and athletic activities. Features advanced cushioning technology and breathable mesh upper.",
    ),
    (
        2,
        "Urban Walker",
        149,
        "https://images.pexels.com/photos/1464625/pexels-photo-1464625.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Casual",
        "Stylish and comfortable for everyday wear. Premium leather construction with modern design elements.",
    ),
    (
        3,
        "Elite Sport",
        199,
        "https://images.pexels.com/photos/2529157/pexels-photo-2529157.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Athletic",
        "High-performance athletic shoe designed for serious athletes. Superior support and energy return technology.",
    ),
    (
        4,
        "Business Pro",
        179,
        "https://images.pexels.com/photos/298863/pexels-photo-298863.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Formal",
        "Professional dress shoe perfect for business settings. Genuine leather with classic styling and comfort features.",
    ),
    (
        5,
        "Adventure Trek",
        169,
        "https://images.pexels.com/photos/1598505/pexels-photo-1598505.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Outdoor",
        "Rugged outdoor shoe built for hiking and adventure. Waterproof construction with superior grip and durability.",
    ),
    (
        6,
        "Street Style",
        139,
        "https://images.pexels.com/photos/2385477/pexels-photo-2385477.jpeg?auto=compress&cs=tinysrgb&w=400",
        "Lifestyle",
        "Trendy lifestyle sneaker with contemporary design. Perfect blend of comfort and street-ready style.",
    ),
];

/// The store's product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(Arc::new).collect(),
        }
    }

    /// The store's built-in shoe catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let products = ENTRIES
            .iter()
            .map(|&(id, name, price, image, category, description)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Price::from_whole(price),
                image: image.to_string(),
                category: category.to_string(),
                description: Some(description.to_string()),
                sizes: STANDARD_SIZES.iter().map(ToString::to_string).collect(),
            })
            .collect();

        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Arc<Product>> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    /// Products whose category matches `category` (case-insensitive).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Arc<Product>> {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);

        let ids: HashSet<ProductId> = catalog.products().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 6, "product ids must be unique");

        for product in catalog.products() {
            assert!(!product.sizes.is_empty());
            assert!(product.sizes.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_get() {
        let catalog = Catalog::builtin();
        let runner = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(runner.name, "Classic Runner");
        assert_eq!(runner.price, Price::from_whole(129));
        assert!(runner.has_size("9"));
        assert!(!runner.has_size("13"));

        assert!(catalog.get(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_get_shares_product() {
        let catalog = Catalog::builtin();
        let a = catalog.get(ProductId::new(2)).unwrap();
        let b = catalog.get(ProductId::new(2)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_in_category() {
        let catalog = Catalog::builtin();
        let outdoor: Vec<_> = catalog.in_category("outdoor").collect();
        assert_eq!(outdoor.len(), 1);
        assert_eq!(outdoor[0].name, "Adventure Trek");

        assert_eq!(catalog.in_category("Sandals").count(), 0);
    }
}
