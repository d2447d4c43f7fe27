//! Cart route handlers.
//!
//! All cart routes require authentication. The update endpoint doubles as a
//! machine-readable API: callers sending `X-Requested-With: XMLHttpRequest`
//! get a JSON payload with the recomputed totals and the affected line's new
//! state instead of a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gilded_core::{CartLineId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CartTotals, CurrentUser};
use crate::state::AppState;

/// Requested mutation for a cart line.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    /// Add 1 to the quantity.
    Inc,
    /// Subtract 1; removes the line when the quantity would reach zero.
    Dec,
    /// Delete the line unconditionally.
    Remove,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub action: CartAction,
}

/// JSON payload returned to `XMLHttpRequest` callers after an update.
#[derive(Debug, Serialize)]
pub struct CartUpdateResponse {
    pub ok: bool,
    pub total_price: Decimal,
    pub total_items: i64,
    pub item_id: i64,
    pub line_total: Decimal,
    pub quantity: i64,
    pub removed: bool,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub store_name: String,
    pub user: CurrentUser,
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

/// Whether the request asked for a machine-readable response.
fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Display the cart page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartTemplate> {
    let lines = CartRepository::new(state.pool()).lines_for_user(user.id).await?;
    let totals = CartTotals::of(&lines);

    Ok(CartTemplate {
        store_name: state.config().store_name.clone(),
        user,
        lines,
        totals,
    })
}

/// Add a product to the cart: a new line at quantity 1, or +1 on the
/// existing line for the same product.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<i64>,
) -> Result<Redirect> {
    let product_id = ProductId::new(product_id);

    // Unknown products 404 before any cart mutation.
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    CartRepository::new(state.pool()).add(user.id, product_id).await?;

    Ok(Redirect::to("/cart"))
}

/// Update a cart line (increment, decrement, or remove).
///
/// Browser callers are redirected back to the cart; `XMLHttpRequest`
/// callers receive the recomputed totals as JSON.
#[instrument(skip(state, user, headers))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<UpdateForm>,
) -> Result<Response> {
    let line_id = CartLineId::new(line_id);
    let repo = CartRepository::new(state.pool());

    match form.action {
        CartAction::Inc => {
            repo.increment(user.id, line_id).await?;
        }
        CartAction::Dec => {
            repo.decrement_or_remove(user.id, line_id).await?;
        }
        CartAction::Remove => {
            repo.remove(user.id, line_id).await?;
        }
    }

    if is_xhr(&headers) {
        let lines = repo.lines_for_user(user.id).await?;
        let totals = CartTotals::of(&lines);
        let line = lines.iter().find(|line| line.id == line_id);

        return Ok(Json(CartUpdateResponse {
            ok: true,
            total_price: totals.total_price.amount(),
            total_items: totals.total_items,
            item_id: line_id.as_i64(),
            line_total: line.map_or(Decimal::ZERO, |line| line.line_total().amount()),
            quantity: line.map_or(0, |line| line.quantity),
            removed: line.is_none(),
        })
        .into_response());
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a cart line unconditionally.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(line_id): Path<i64>,
) -> Result<Redirect> {
    CartRepository::new(state.pool())
        .remove(user.id, CartLineId::new(line_id))
        .await?;

    Ok(Redirect::to("/cart"))
}
