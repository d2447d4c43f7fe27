//! Admin product management route handlers.
//!
//! Any authenticated user may manage the catalog; hardening the admin
//! surface is out of scope for this storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use gilded_core::{Category, Price, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, NewProduct, Product};
use crate::state::AppState;

/// Product create/edit form data.
///
/// `category` and `image` are optional: on edit, a missing category keeps
/// the current one and an empty image keeps the current reference.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub image: String,
    pub category: Option<String>,
}

/// Admin dashboard template (product list).
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub store_name: String,
    pub user: CurrentUser,
    pub products: Vec<Product>,
}

/// Shared create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub store_name: String,
    pub user: CurrentUser,
    pub heading: String,
    pub action: String,
    pub error: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: Category,
    pub categories: Vec<Category>,
}

impl ProductFormTemplate {
    fn empty(store_name: String, user: CurrentUser) -> Self {
        Self {
            store_name,
            user,
            heading: "Add Product".to_owned(),
            action: "/admin/products/new".to_owned(),
            error: None,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            image: String::new(),
            category: Category::default(),
            categories: Category::ALL.to_vec(),
        }
    }

    fn for_product(store_name: String, user: CurrentUser, product: &Product) -> Self {
        Self {
            store_name,
            user,
            heading: "Edit Product".to_owned(),
            action: format!("/admin/products/{}/edit", product.id),
            error: None,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            image: product.image.clone(),
            category: product.category,
            categories: Category::ALL.to_vec(),
        }
    }

    fn with_error(mut self, message: String, form: &ProductForm) -> Self {
        self.error = Some(message);
        self.name = form.name.clone();
        self.description = form.description.clone();
        self.price = form.price.clone();
        self.image = form.image.clone();
        self
    }
}

/// Parse the submitted price, or explain why it's unusable.
fn parse_price(raw: &str) -> std::result::Result<Price, String> {
    raw.trim()
        .parse::<Price>()
        .map_err(|_| "Price must be a decimal number, e.g. 1250.00".to_owned())
}

/// Display the product list.
#[instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<DashboardTemplate> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(DashboardTemplate {
        store_name: state.config().store_name.clone(),
        user,
        products,
    })
}

/// Display the create-product form.
pub async fn new_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ProductFormTemplate {
    ProductFormTemplate::empty(state.config().store_name.clone(), user)
}

/// Handle create-product form submission.
#[instrument(skip(state, user, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let price = match parse_price(&form.price) {
        Ok(price) => price,
        Err(message) => {
            return Ok(
                ProductFormTemplate::empty(state.config().store_name.clone(), user)
                    .with_error(message, &form)
                    .into_response(),
            );
        }
    };

    let category = form
        .category
        .as_deref()
        .and_then(|slug| slug.parse::<Category>().ok())
        .unwrap_or_default();

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: form.name,
            description: form.description,
            price,
            image: form.image,
            category,
        })
        .await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok(Redirect::to("/admin").into_response())
}

/// Display the edit-product form.
#[instrument(skip(state, user))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate::for_product(
        state.config().store_name.clone(),
        user,
        &product,
    ))
}

/// Handle edit-product form submission.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let repo = ProductRepository::new(state.pool());

    let existing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let price = match parse_price(&form.price) {
        Ok(price) => price,
        Err(message) => {
            return Ok(ProductFormTemplate::for_product(
                state.config().store_name.clone(),
                user,
                &existing,
            )
            .with_error(message, &form)
            .into_response());
        }
    };

    // Missing category keeps the current one; an empty image keeps the
    // current reference.
    let category = form
        .category
        .as_deref()
        .and_then(|slug| slug.parse::<Category>().ok())
        .unwrap_or(existing.category);
    let image = if form.image.trim().is_empty() {
        existing.image
    } else {
        form.image
    };

    repo.update(
        id,
        &NewProduct {
            name: form.name,
            description: form.description,
            price,
            image,
            category,
        },
    )
    .await?;

    Ok(Redirect::to("/admin").into_response())
}

/// Delete a product.
#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    tracing::info!(product_id = id, "Product deleted");

    Ok(Redirect::to("/admin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_decimals() {
        assert!(parse_price("1250.00").is_ok());
        assert!(parse_price(" 99.5 ").is_ok());
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("twelve").is_err());
        assert!(parse_price("").is_err());
    }
}
