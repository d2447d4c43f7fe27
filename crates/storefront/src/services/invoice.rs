//! PDF invoice rendering.
//!
//! Renders a pending order as a paginated A4 document: store header,
//! customer and date lines, ruled column table, one row per captured line,
//! and a grand total. A vertical cursor walks down the page and a new page
//! starts whenever the cursor has fallen below the bottom margin before the
//! next row is drawn.
//!
//! Compiled only with the `invoice-pdf` feature; without it the download
//! route falls back to the HTML invoice.

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point};
use thiserror::Error;

use crate::models::OrderSummary;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MARGIN_MM: f32 = 18.0;
const BOTTOM_MARGIN_MM: f32 = 25.0;
const LEFT_MARGIN_MM: f32 = 18.0;
const RIGHT_EDGE_MM: f32 = PAGE_WIDTH_MM - LEFT_MARGIN_MM;

/// Column x offsets (mm from the left edge).
const COL_PRICE_MM: f32 = 118.0;
const COL_QTY_MM: f32 = 150.0;
const COL_SUBTOTAL_MM: f32 = 168.0;

/// Vertical distance between table rows.
const ROW_STEP_MM: f32 = 6.5;

/// Longest product name drawn before truncation.
const MAX_NAME_CHARS: usize = 48;

/// Errors that can occur while rendering the PDF.
#[derive(Debug, Error)]
pub enum InvoiceRenderError {
    /// The PDF backend failed.
    #[error("pdf generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Vertical cursor walking down an A4 page.
///
/// Tracks only the y position; the page break decision ("has the cursor
/// fallen below the bottom margin?") is asked before each row, mirroring
/// how rows are laid out.
#[derive(Debug, Clone, Copy)]
pub struct PageCursor {
    y: f32,
}

impl PageCursor {
    /// Cursor at the top of a fresh page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            y: PAGE_HEIGHT_MM - TOP_MARGIN_MM,
        }
    }

    /// Current y position in mm from the page bottom.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Move down by `step` mm.
    pub fn advance(&mut self, step: f32) {
        self.y -= step;
    }

    /// Whether the next row would land below the bottom margin.
    #[must_use]
    pub fn needs_break(&self) -> bool {
        self.y < BOTTOM_MARGIN_MM
    }

    /// Jump back to the top of a new page.
    pub fn reset(&mut self) {
        self.y = PAGE_HEIGHT_MM - TOP_MARGIN_MM;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a horizontal rule at the given y.
fn rule(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn truncated(name: &str) -> String {
    name.chars().take(MAX_NAME_CHARS).collect()
}

/// Render a pending order as a PDF document.
///
/// # Errors
///
/// Returns [`InvoiceRenderError`] if the PDF backend fails.
pub fn render_pdf(
    store_name: &str,
    customer: &str,
    order: &OrderSummary,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, InvoiceRenderError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("{store_name} - Invoice {}", order.order_id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = PageCursor::new();

    // Header block
    layer.use_text(
        format!("{store_name} - Invoice"),
        16.0,
        Mm(LEFT_MARGIN_MM),
        Mm(cursor.y()),
        &bold,
    );
    cursor.advance(9.0);
    layer.use_text(
        format!("Order: {}", order.order_id),
        10.0,
        Mm(LEFT_MARGIN_MM),
        Mm(cursor.y()),
        &regular,
    );
    cursor.advance(5.5);
    layer.use_text(
        format!("Customer: {customer}"),
        10.0,
        Mm(LEFT_MARGIN_MM),
        Mm(cursor.y()),
        &regular,
    );
    cursor.advance(5.5);
    layer.use_text(
        format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M")),
        10.0,
        Mm(LEFT_MARGIN_MM),
        Mm(cursor.y()),
        &regular,
    );
    cursor.advance(10.0);

    // Column headings
    layer.use_text("Product", 11.0, Mm(LEFT_MARGIN_MM), Mm(cursor.y()), &bold);
    layer.use_text("Price", 11.0, Mm(COL_PRICE_MM), Mm(cursor.y()), &bold);
    layer.use_text("Qty", 11.0, Mm(COL_QTY_MM), Mm(cursor.y()), &bold);
    layer.use_text("Subtotal", 11.0, Mm(COL_SUBTOTAL_MM), Mm(cursor.y()), &bold);
    cursor.advance(2.5);
    rule(&layer, LEFT_MARGIN_MM, RIGHT_EDGE_MM, cursor.y());
    cursor.advance(ROW_STEP_MM);

    // Table rows; break to a new page when the cursor has run out of room.
    for line in &order.lines {
        if cursor.needs_break() {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            cursor.reset();
        }

        layer.use_text(
            truncated(&line.product_name),
            10.0,
            Mm(LEFT_MARGIN_MM),
            Mm(cursor.y()),
            &regular,
        );
        layer.use_text(
            line.unit_price.to_string(),
            10.0,
            Mm(COL_PRICE_MM),
            Mm(cursor.y()),
            &regular,
        );
        layer.use_text(
            line.quantity.to_string(),
            10.0,
            Mm(COL_QTY_MM),
            Mm(cursor.y()),
            &regular,
        );
        layer.use_text(
            line.line_total.to_string(),
            10.0,
            Mm(COL_SUBTOTAL_MM),
            Mm(cursor.y()),
            &regular,
        );
        cursor.advance(ROW_STEP_MM);
    }

    // Grand total under a short rule on the right
    cursor.advance(2.0);
    rule(&layer, COL_PRICE_MM, RIGHT_EDGE_MM, cursor.y());
    cursor.advance(8.0);
    layer.use_text("Total:", 12.0, Mm(COL_QTY_MM), Mm(cursor.y()), &bold);
    layer.use_text(
        order.total_price.to_string(),
        12.0,
        Mm(COL_SUBTOTAL_MM),
        Mm(cursor.y()),
        &bold,
    );

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::OrderLine;

    fn order_with_lines(count: usize) -> OrderSummary {
        let lines: Vec<OrderLine> = (0..count)
            .map(|i| OrderLine {
                product_name: format!("Gold Bangle {i}"),
                unit_price: "100.00".parse().unwrap(),
                quantity: 1,
                line_total: "100.00".parse().unwrap(),
            })
            .collect();
        let total_items = i64::try_from(count).unwrap();
        OrderSummary {
            order_id: format!("INV-1-2026080712000{}", count % 10),
            total_price: "100.00".parse::<gilded_core::Price>().unwrap().times(total_items),
            total_items,
            created_at: Utc::now(),
            lines,
        }
    }

    #[test]
    fn test_cursor_starts_below_top_margin() {
        let cursor = PageCursor::new();
        assert!((cursor.y() - (PAGE_HEIGHT_MM - TOP_MARGIN_MM)).abs() < f32::EPSILON);
        assert!(!cursor.needs_break());
    }

    #[test]
    fn test_cursor_breaks_after_walking_past_bottom_margin() {
        let mut cursor = PageCursor::new();
        let mut rows = 0;
        while !cursor.needs_break() {
            cursor.advance(ROW_STEP_MM);
            rows += 1;
        }
        // (297 - 18 - 25) / 6.5 ≈ 39 rows fit on an empty page
        assert_eq!(rows, 40);

        cursor.reset();
        assert!(!cursor.needs_break());
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let order = order_with_lines(2);
        let bytes = render_pdf("Gilded Jewellery", "asha", &order, Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_order_paginates() {
        let short = render_pdf("Gilded Jewellery", "asha", &order_with_lines(2), Utc::now()).unwrap();
        let long = render_pdf("Gilded Jewellery", "asha", &order_with_lines(80), Utc::now()).unwrap();

        // 80 rows cannot fit on one A4 page; the longer document gains pages.
        let pages = |bytes: &[u8]| {
            bytes
                .windows(b"/Page".len())
                .filter(|w| *w == b"/Page")
                .count()
        };
        assert!(pages(&long) > pages(&short), "expected extra pages");
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_truncated_caps_name_length() {
        let long_name = "x".repeat(200);
        assert_eq!(truncated(&long_name).chars().count(), MAX_NAME_CHARS);
        assert_eq!(truncated("Pearl Drop"), "Pearl Drop");
    }
}
