//! Catalog product model.

use gilded_core::{Category, Price, ProductId};

/// A catalog product. Created and edited by an administrator, read-only to
/// shoppers.
#[derive(Debug, Clone)]
pub struct Product {
    /// Database ID.
    pub id: ProductId,
    /// Display name, target of catalog substring search.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image reference (path or URL). Storage of the image itself is out of
    /// scope; this is only ever echoed back to templates.
    pub image: String,
    /// Category bucket.
    pub category: Category,
}

/// Field set for creating or fully updating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: Category,
}
