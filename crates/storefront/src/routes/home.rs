//! Catalog browse and search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use gilded_core::Category;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Product};
use crate::state::AppState;

/// Catalog search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// One category's worth of products for display.
pub struct CategoryBucket {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub store_name: String,
    pub query: String,
    pub buckets: Vec<CategoryBucket>,
    pub user: Option<CurrentUser>,
}

/// Group products into category buckets, in the fixed category order.
///
/// With `include_empty` (the no-query browse path) every category appears
/// even when it holds nothing, so the page shows all four sections
/// consistently. Search results keep only non-empty buckets.
#[must_use]
pub fn bucket_by_category(products: Vec<Product>, include_empty: bool) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Category::ALL
        .iter()
        .map(|&category| CategoryBucket {
            category,
            products: Vec::new(),
        })
        .collect();

    for product in products {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.category == product.category) {
            bucket.products.push(product);
        }
    }

    if !include_empty {
        buckets.retain(|bucket| !bucket.products.is_empty());
    }

    buckets
}

/// Display the catalog, optionally filtered by a name substring.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<HomeTemplate> {
    let products = ProductRepository::new(state.pool());
    let trimmed = query.q.trim();

    let buckets = if trimmed.is_empty() {
        bucket_by_category(products.list_all().await?, true)
    } else {
        bucket_by_category(products.search(trimmed).await?, false)
    };

    Ok(HomeTemplate {
        store_name: state.config().store_name.clone(),
        query: trimmed.to_owned(),
        buckets,
        user,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gilded_core::ProductId;

    fn product(name: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_owned(),
            description: String::new(),
            price: "100.00".parse().unwrap(),
            image: String::new(),
            category,
        }
    }

    #[test]
    fn test_browse_path_keeps_all_four_buckets() {
        let buckets = bucket_by_category(vec![product("Kundan Necklace", Category::Necklace)], true);
        assert_eq!(buckets.len(), 4);
        let categories: Vec<Category> = buckets.iter().map(|b| b.category).collect();
        assert_eq!(categories, Category::ALL);
        assert_eq!(buckets[0].products.len(), 1);
        assert!(buckets[1].products.is_empty());
    }

    #[test]
    fn test_search_path_drops_empty_buckets() {
        let buckets = bucket_by_category(
            vec![
                product("Gold Ring", Category::Earring),
                product("Diamond Ring", Category::Bracelet),
            ],
            false,
        );
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].category, Category::Earring);
        assert_eq!(buckets[1].category, Category::Bracelet);
    }
}
