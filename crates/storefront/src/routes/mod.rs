//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Catalog browse/search (?q=)
//! GET  /health                  - Health check (registered in main)
//!
//! # Auth
//! GET  /auth/login              - Login page (?next=)
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Cart (requires auth)
//! GET  /cart                    - Cart page
//! POST /cart/add/{product_id}   - Add product (qty 1, or increment)
//! POST /cart/items/{line_id}    - Update line: action=inc|dec|remove
//!                                 (JSON response for XMLHttpRequest callers)
//! POST /cart/items/{line_id}/remove - Remove line
//!
//! # Checkout & invoice (requires auth)
//! POST /checkout                - Snapshot cart into pending order, empty cart
//! GET  /invoice                 - HTML invoice of the pending order
//! GET  /invoice/download        - PDF invoice (falls back to HTML invoice)
//!
//! # Admin (requires auth)
//! GET  /admin                   - Product list
//! GET  /admin/products/new      - Create form
//! POST /admin/products/new      - Create product
//! GET  /admin/products/{id}/edit - Edit form
//! POST /admin/products/{id}/edit - Update product
//! POST /admin/products/{id}/delete - Delete product
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod invoice;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{product_id}", post(cart::add))
        .route("/items/{line_id}", post(cart::update))
        .route("/items/{line_id}/remove", post(cart::remove))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/products/new",
            get(admin::new_form).post(admin::create),
        )
        .route(
            "/products/{id}/edit",
            get(admin::edit_form).post(admin::update),
        )
        .route("/products/{id}/delete", post(admin::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        // Auth routes
        .nest("/auth", auth_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout + invoice
        .route("/checkout", post(checkout::checkout))
        .route("/invoice", get(invoice::show))
        .route("/invoice/download", get(invoice::download))
        // Admin product management
        .nest("/admin", admin_routes())
}
