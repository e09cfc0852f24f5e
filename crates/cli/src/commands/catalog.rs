//! Catalog listing.

use std::io::Write;

use shoe_store_storefront::catalog::Catalog;
use shoe_store_storefront::models::Product;

use super::CliError;

/// Write one line per product, optionally limited to `category`.
pub fn list(out: &mut impl Write, catalog: &Catalog, category: Option<&str>) -> Result<(), CliError> {
    let products: Vec<_> = match category {
        Some(category) => catalog.in_category(category).collect(),
        None => catalog.products().iter().collect(),
    };

    for product in &products {
        writeln!(out, "{}", format_product(product))?;
    }
    writeln!(out, "{} product(s)", products.len())?;

    Ok(())
}

fn format_product(product: &Product) -> String {
    format!(
        "{:>3}  {:<16} {:<10} ${:>7}  sizes {}",
        product.id.as_i32(),
        product.name,
        product.category,
        product.price.to_string(),
        product.sizes.join(",")
    )
}
