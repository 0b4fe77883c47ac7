//! PDF renderer
//!
//! One A4 page per order: title and status badge, customer detail block, and
//! an items table with per-row subtotals and the grand total. An order with
//! no items renders an explicit placeholder instead of an empty table.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::report::{OrderReport, ReportOrder, status_label};
use crate::utils::AppError;
use crate::utils::time::format_millis;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_STEP: f32 = 7.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub fn render(report: &OrderReport) -> Result<Vec<u8>, AppError> {
    build(report).map_err(|e| AppError::render(format!("PDF generation failed: {e}")))
}

fn build(report: &OrderReport) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Rapport des commandes",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    if report.orders.is_empty() {
        let layer = doc.get_page(first_page).get_layer(first_layer);
        layer.use_text("Aucune commande", 14.0, Mm(MARGIN), Mm(PAGE_HEIGHT - 40.0), &fonts.regular);
        return doc.save_to_bytes();
    }

    for (i, entry) in report.orders.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        draw_order_page(&layer, &fonts, entry);
    }

    doc.save_to_bytes()
}

fn draw_order_page(layer: &PdfLayerReference, fonts: &Fonts, entry: &ReportOrder) {
    let order = &entry.order;
    let mut y = PAGE_HEIGHT - 25.0;

    // Title and status badge
    layer.use_text(
        format!("Commande #{}", order.id),
        16.0,
        Mm(MARGIN),
        Mm(y),
        &fonts.bold,
    );
    layer.use_text(
        status_label(&order.status),
        12.0,
        Mm(PAGE_WIDTH - 55.0),
        Mm(y),
        &fonts.bold,
    );
    y -= 2.0 * LINE_STEP;

    // Customer block
    let detail_line = |label: &str, value: &str, y: f32| {
        layer.use_text(format!("{label} : {value}"), 11.0, Mm(MARGIN), Mm(y), &fonts.regular);
    };
    detail_line("Client", &order.customer_name, y);
    y -= LINE_STEP;
    detail_line("Téléphone", &order.customer_phone, y);
    y -= LINE_STEP;
    detail_line("Adresse", &order.customer_address, y);
    y -= LINE_STEP;
    detail_line("Date", &format_millis(order.order_date), y);
    y -= LINE_STEP;
    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        detail_line("Notes", notes, y);
        y -= LINE_STEP;
    }
    y -= LINE_STEP;

    if entry.items.is_empty() {
        layer.use_text("Aucun article", 11.0, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= 2.0 * LINE_STEP;
    } else {
        // Items table header
        layer.use_text("Produit", 11.0, Mm(MARGIN), Mm(y), &fonts.bold);
        layer.use_text("Qté", 11.0, Mm(120.0), Mm(y), &fonts.bold);
        layer.use_text("Prix", 11.0, Mm(140.0), Mm(y), &fonts.bold);
        layer.use_text("Sous-total", 11.0, Mm(168.0), Mm(y), &fonts.bold);
        y -= LINE_STEP;

        for item in &entry.items {
            if y < MARGIN + LINE_STEP {
                // Overflowing orders are truncated rather than spilling
                // onto a sibling order's page
                layer.use_text("…", 11.0, Mm(MARGIN), Mm(y), &fonts.regular);
                break;
            }
            layer.use_text(item.display_name(), 11.0, Mm(MARGIN), Mm(y), &fonts.regular);
            layer.use_text(item.quantity.to_string(), 11.0, Mm(120.0), Mm(y), &fonts.regular);
            layer.use_text(format!("{:.2}", item.price), 11.0, Mm(140.0), Mm(y), &fonts.regular);
            layer.use_text(format!("{:.2}", item.subtotal()), 11.0, Mm(168.0), Mm(y), &fonts.regular);
            y -= LINE_STEP;
        }
        y -= LINE_STEP;
    }

    layer.use_text(
        format!("Total : {:.2} DA", entry.total),
        13.0,
        Mm(140.0),
        Mm(y.max(MARGIN)),
        &fonts.bold,
    );
}
