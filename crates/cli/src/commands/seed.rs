//! Catalog seeding command.
//!
//! Inserts a small sample catalog covering every category so a fresh
//! install has something to browse.

use gilded_core::{Category, Price};
use gilded_storefront::db::ProductRepository;
use gilded_storefront::models::NewProduct;

use super::CommandError;

/// (name, description, price, category) rows for the sample catalog.
const SAMPLE_PRODUCTS: &[(&str, &str, &str, Category)] = &[
    (
        "Kundan Necklace",
        "Handcrafted kundan necklace with uncut stones.",
        "4999.00",
        Category::Necklace,
    ),
    (
        "Pearl Choker",
        "Freshwater pearl choker on a silk cord.",
        "2250.00",
        Category::Necklace,
    ),
    (
        "Jhumka Earrings",
        "Classic dome jhumkas with bead drops.",
        "1499.00",
        Category::Earring,
    ),
    (
        "Gold Stud Earrings",
        "Minimal 22k gold-plated studs.",
        "899.00",
        Category::Earring,
    ),
    (
        "Meenakari Bangle",
        "Enamelled brass bangle, peacock motif.",
        "1799.00",
        Category::Bangle,
    ),
    (
        "Silver Cuff Bracelet",
        "Open cuff in brushed sterling silver.",
        "2599.00",
        Category::Bracelet,
    ),
];

/// Seed the catalog with sample jewelry.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    for &(name, description, price, category) in SAMPLE_PRODUCTS {
        let price: Price = price
            .parse()
            .map_err(|e| CommandError::InvalidSeed(format!("{name}: {e}")))?;

        let product = products
            .create(&NewProduct {
                name: name.to_owned(),
                description: description.to_owned(),
                price,
                image: String::new(),
                category,
            })
            .await?;

        tracing::info!(product_id = %product.id, name, "Seeded product");
    }

    tracing::info!("Seeded {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}
