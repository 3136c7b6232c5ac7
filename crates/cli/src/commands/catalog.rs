//! Catalog browsing.

#![allow(clippy::print_stdout)]

use topup_core::{CategoryId, Product};

use super::{CliError, CliShop};

fn print_products(products: &[Product]) {
    for product in products {
        println!(
            "{:<12} {:<24} {:>10}",
            product.id.as_str(),
            product.name,
            product.price.to_string()
        );
    }
}

/// Print products, optionally restricted to a category.
pub async fn products(shop: &CliShop, category: Option<&str>) -> Result<(), CliError> {
    let products = match category {
        Some(id) => shop.catalog().products_in(&CategoryId::new(id)).await?,
        None => shop.catalog().products().await,
    };
    print_products(&products);
    Ok(())
}

/// Print categories.
#[allow(clippy::unnecessary_wraps)]
pub fn categories(shop: &CliShop) -> Result<(), CliError> {
    for category in shop.catalog().categories() {
        println!("{:<10} {:<34} {}", category.id.as_str(), category.name, category.price_range);
    }
    Ok(())
}
