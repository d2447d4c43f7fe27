//! Invoice route handlers.
//!
//! Two presentations of the same pending order: an HTML page and a PDF
//! download. With no (or an expired) pending order there is nothing to
//! show, so both redirect to the cart view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use gilded_core::Username;

use crate::db::PendingOrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, OrderSummary};
use crate::state::AppState;

/// Invoice page template.
#[derive(Template, WebTemplate)]
#[template(path = "invoice/show.html")]
pub struct InvoiceTemplate {
    pub store_name: String,
    pub user: CurrentUser,
    pub order: OrderSummary,
}

/// Display the HTML invoice for the user's pending order.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let order = PendingOrderRepository::new(state.pool())
        .get_active(user.id, state.config().pending_order_ttl, chrono::Utc::now())
        .await?;

    let Some(order) = order else {
        return Ok(Redirect::to("/cart").into_response());
    };

    Ok(InvoiceTemplate {
        store_name: state.config().store_name.clone(),
        user,
        order,
    }
    .into_response())
}

/// Download the invoice as a PDF attachment.
///
/// Falls back to the HTML invoice when PDF rendering is unavailable or
/// fails; a missing pending order redirects to the cart, matching the page.
#[instrument(skip(state, user))]
pub async fn download(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let order = PendingOrderRepository::new(state.pool())
        .get_active(user.id, state.config().pending_order_ttl, chrono::Utc::now())
        .await?;

    let Some(order) = order else {
        return Ok(Redirect::to("/cart").into_response());
    };

    Ok(pdf_response(
        &state.config().store_name,
        &user.username,
        &order,
    ))
}

/// Render the PDF attachment response.
#[cfg(feature = "invoice-pdf")]
fn pdf_response(store_name: &str, customer: &Username, order: &OrderSummary) -> Response {
    use axum::http::header;

    use crate::services::invoice::render_pdf;

    match render_pdf(store_name, customer.as_str(), order, chrono::Utc::now()) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"invoice.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to render PDF invoice: {e}");
            Redirect::to("/invoice").into_response()
        }
    }
}

/// PDF rendering compiled out: fall back to the HTML invoice.
#[cfg(not(feature = "invoice-pdf"))]
fn pdf_response(_store_name: &str, _customer: &Username, _order: &OrderSummary) -> Response {
    tracing::warn!("PDF rendering unavailable; falling back to the invoice page");
    Redirect::to("/invoice").into_response()
}
