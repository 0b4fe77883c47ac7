//! Spreadsheet renderer
//!
//! One row per order: id, customer, phone, address, formatted date, localized
//! status (highlighted per status), and the comma-joined "product ×qty" list.

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};

use super::report::{OrderReport, status_color, status_label};
use crate::utils::AppError;
use crate::utils::time::format_millis;

const HEADERS: [&str; 7] = [
    "ID",
    "Client",
    "Téléphone",
    "Adresse",
    "Date",
    "Statut",
    "Produits",
];

pub fn render(report: &OrderReport) -> Result<Vec<u8>, AppError> {
    build(report).map_err(|e| AppError::render(format!("Excel generation failed: {e}")))
}

fn build(report: &OrderReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Commandes")?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x00D9D9D9))
        .set_border(FormatBorder::Thin);

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    let widths: [f64; 7] = [8.0, 24.0, 16.0, 32.0, 18.0, 14.0, 48.0];
    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (i, entry) in report.orders.iter().enumerate() {
        let row = (i + 1) as u32;
        let order = &entry.order;

        let status_format = Format::new()
            .set_background_color(Color::RGB(status_color(&order.status)))
            .set_border(FormatBorder::Thin);

        let products = entry
            .items
            .iter()
            .map(|item| format!("{} ×{}", item.display_name(), item.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        worksheet.write_number(row, 0, order.id as f64)?;
        worksheet.write_string(row, 1, &order.customer_name)?;
        worksheet.write_string(row, 2, &order.customer_phone)?;
        worksheet.write_string(row, 3, &order.customer_address)?;
        worksheet.write_string(row, 4, &format_millis(order.order_date))?;
        worksheet.write_string_with_format(row, 5, status_label(&order.status), &status_format)?;
        worksheet.write_string(row, 6, &products)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Order;
    use crate::export::report::{ReportItem, ReportOrder};

    fn sample_report() -> OrderReport {
        OrderReport {
            orders: vec![ReportOrder {
                order: Order {
                    id: 1,
                    customer_name: "Amel B.".into(),
                    customer_phone: "0550 00 00 00".into(),
                    customer_address: "Alger".into(),
                    notes: None,
                    status: "pending".into(),
                    source: "website".into(),
                    order_date: 1_700_000_000_000,
                    completed_date: None,
                },
                items: vec![ReportItem {
                    product_name: "Crème hydratante".into(),
                    color_name: None,
                    quantity: 2,
                    price: 1500.0,
                }],
                total: 3000.0,
            }],
        }
    }

    #[test]
    fn produces_an_xlsx_archive() {
        let bytes = render(&sample_report()).unwrap();
        // XLSX is a ZIP container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_report_still_renders() {
        let bytes = render(&OrderReport::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
