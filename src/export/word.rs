//! Word-compatible renderer
//!
//! Emits styled HTML markup served under a Word mime type, structurally
//! equivalent to the PDF: same sections, same status labels, same totals.

use std::fmt::Write;

use super::report::{OrderReport, ReportOrder, status_label};
use crate::utils::AppError;
use crate::utils::time::format_millis;

pub fn render(report: &OrderReport) -> Result<Vec<u8>, AppError> {
    let mut html = String::new();

    html.push_str(
        "<html><head><meta charset=\"utf-8\"><title>Rapport des commandes</title><style>\
         body{font-family:Arial,sans-serif;margin:24px;}\
         .order{page-break-after:always;margin-bottom:32px;}\
         .status{padding:2px 8px;border-radius:4px;background:#eee;font-weight:bold;}\
         table{border-collapse:collapse;width:100%;margin-top:12px;}\
         th,td{border:1px solid #999;padding:6px;text-align:left;}\
         th{background:#d9d9d9;}\
         .total{text-align:right;font-weight:bold;margin-top:8px;}\
         </style></head><body>",
    );

    if report.orders.is_empty() {
        html.push_str("<p>Aucune commande</p>");
    }

    for entry in &report.orders {
        write_order_section(&mut html, entry)
            .map_err(|e| AppError::render(format!("Document generation failed: {e}")))?;
    }

    html.push_str("</body></html>");
    Ok(html.into_bytes())
}

fn write_order_section(html: &mut String, entry: &ReportOrder) -> std::fmt::Result {
    let order = &entry.order;

    write!(
        html,
        "<div class=\"order\"><h2>Commande #{} <span class=\"status\">{}</span></h2>",
        order.id,
        status_label(&order.status)
    )?;

    write!(
        html,
        "<p>Client : {}<br>Téléphone : {}<br>Adresse : {}<br>Date : {}",
        escape(&order.customer_name),
        escape(&order.customer_phone),
        escape(&order.customer_address),
        format_millis(order.order_date)
    )?;
    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        write!(html, "<br>Notes : {}", escape(notes))?;
    }
    html.push_str("</p>");

    if entry.items.is_empty() {
        html.push_str("<p>Aucun article</p>");
    } else {
        html.push_str(
            "<table><tr><th>Produit</th><th>Qté</th><th>Prix</th><th>Sous-total</th></tr>",
        );
        for item in &entry.items {
            write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                escape(&item.display_name()),
                item.quantity,
                item.price,
                item.subtotal()
            )?;
        }
        html.push_str("</table>");
    }

    write!(html, "<p class=\"total\">Total : {:.2} DA</p></div>", entry.total)?;
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
