//! Three-sheet monthly workbook
//!
//! 1. `Don_dat_hang_theo_ngay`: one row per order, oldest first
//! 2. `Doanh_thu_theo_ngay`: one row per day plus the month total
//! 3. `San_pham_theo_thang`: one row per product plus the unit total
//!
//! The whole workbook is built in memory; callers get bytes or an error,
//! never a partial file.

use super::aggregate::MonthlySummary;
use super::format::{customer_name, customer_phone};
use super::window::MonthWindow;
use crate::db::models::{Customer, Order};
use crate::utils::time::{format_date, local_date};
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const ORDERS_SHEET: &str = "Don_dat_hang_theo_ngay";
pub const REVENUE_SHEET: &str = "Doanh_thu_theo_ngay";
pub const PRODUCTS_SHEET: &str = "San_pham_theo_thang";

const ORDER_COLUMNS: [(&str, f64); 9] = [
    ("Ngày đặt hàng", 15.0),
    ("ID đơn hàng", 18.0),
    ("Tên khách hàng", 25.0),
    ("SĐT khách hàng", 18.0),
    ("Địa chỉ giao hàng", 50.0),
    ("Trạng thái đơn", 18.0),
    ("Tổng giá trị đơn (VNĐ)", 22.0),
    ("Phương thức thanh toán", 22.0),
    ("Ghi chú / yêu cầu đặc biệt", 35.0),
];

const REVENUE_COLUMNS: [(&str, f64); 2] = [("Ngày", 15.0), ("Doanh thu trong ngày", 22.0)];

const PRODUCT_COLUMNS: [(&str, f64); 3] = [
    ("Tên sản phẩm", 40.0),
    ("Mã sản phẩm (SKU)", 20.0),
    ("Số lượng bán trong tháng", 25.0),
];

pub const REVENUE_TOTAL_LABEL: &str = "TỔNG DOANH THU THÁNG";
pub const UNITS_TOTAL_LABEL: &str = "TỔNG SỐ LƯỢNG TẤT CẢ SẢN PHẨM";

const MONEY_FORMAT: &str = "#,##0";
const HEADER_FILL: u32 = 0xE0E0E0;
const TOTAL_FILL: u32 = 0xFFD700;

struct Styles {
    header: Format,
    text: Format,
    centered: Format,
    wrapped: Format,
    money: Format,
    money_right: Format,
    total_label: Format,
    total_value: Format,
}

impl Styles {
    fn new() -> Self {
        let total = Format::new()
            .set_bold()
            .set_font_size(12)
            .set_background_color(Color::RGB(TOTAL_FILL))
            .set_align(FormatAlign::Right);
        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            text: Format::new(),
            centered: Format::new().set_align(FormatAlign::Center),
            wrapped: Format::new().set_text_wrap(),
            money: Format::new().set_num_format(MONEY_FORMAT),
            money_right: Format::new()
                .set_num_format(MONEY_FORMAT)
                .set_align(FormatAlign::Right),
            total_value: total.clone().set_num_format(MONEY_FORMAT),
            total_label: total,
        }
    }
}

/// Render the month as an `.xlsx` file
///
/// `orders` must be the window's orders; `customers` is keyed by
/// `"customer:key"` and feeds the customer name fallback.
pub fn render(
    window: &MonthWindow,
    summary: &MonthlySummary,
    orders: &[Order],
    customers: &HashMap<String, Customer>,
) -> Result<Vec<u8>, XlsxError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(orders_sheet(window, orders, customers, &styles)?);
    workbook.push_worksheet(revenue_sheet(summary, &styles)?);
    workbook.push_worksheet(products_sheet(summary, &styles)?);

    workbook.save_to_buffer()
}

fn sheet_with_header(
    name: &str,
    columns: &[(&str, f64)],
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    for (col, (title, width)) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, *width)?;
        sheet.write_string_with_format(0, col, *title, &styles.header)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(sheet)
}

fn orders_sheet(
    window: &MonthWindow,
    orders: &[Order],
    customers: &HashMap<String, Customer>,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let mut sheet = sheet_with_header(ORDERS_SHEET, &ORDER_COLUMNS, styles)?;

    let mut sorted: Vec<&Order> = orders
        .iter()
        .filter(|order| window.contains(order.created_at))
        .collect();
    sorted.sort_by_key(|order| order.created_at);

    for (idx, order) in sorted.into_iter().enumerate() {
        let row = idx as u32 + 1;
        let date = local_date(order.created_at, window.tz)
            .map(format_date)
            .unwrap_or_default();
        let note = order.note.as_deref().unwrap_or_default();

        sheet.write_string_with_format(row, 0, date, &styles.centered)?;
        sheet.write_string_with_format(row, 1, order.display_code(), &styles.text)?;
        sheet.write_string_with_format(row, 2, customer_name(order, customers), &styles.text)?;
        sheet.write_string_with_format(row, 3, customer_phone(order), &styles.text)?;
        sheet.write_string_with_format(
            row,
            4,
            order.shipping_address.formatted(),
            &styles.wrapped,
        )?;
        sheet.write_string_with_format(row, 5, order.status.label(), &styles.centered)?;
        sheet.write_number_with_format(row, 6, order.total as f64, &styles.money)?;
        sheet.write_string_with_format(row, 7, order.payment_method.label(), &styles.text)?;
        sheet.write_string_with_format(row, 8, note, &styles.wrapped)?;
    }
    Ok(sheet)
}

fn revenue_sheet(summary: &MonthlySummary, styles: &Styles) -> Result<Worksheet, XlsxError> {
    let mut sheet = sheet_with_header(REVENUE_SHEET, &REVENUE_COLUMNS, styles)?;

    for (idx, day) in summary.daily_revenue.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string_with_format(row, 0, day.date.as_str(), &styles.centered)?;
        sheet.write_number_with_format(row, 1, day.revenue as f64, &styles.money_right)?;
    }

    let total_row = summary.daily_revenue.len() as u32 + 1;
    sheet.write_string_with_format(total_row, 0, REVENUE_TOTAL_LABEL, &styles.total_label)?;
    sheet.write_number_with_format(
        total_row,
        1,
        summary.total_revenue as f64,
        &styles.total_value,
    )?;
    Ok(sheet)
}

fn products_sheet(summary: &MonthlySummary, styles: &Styles) -> Result<Worksheet, XlsxError> {
    let mut sheet = sheet_with_header(PRODUCTS_SHEET, &PRODUCT_COLUMNS, styles)?;

    for (idx, product) in summary.product_totals.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string_with_format(row, 0, product.name.as_str(), &styles.text)?;
        sheet.write_string_with_format(row, 1, product.sku.as_str(), &styles.text)?;
        sheet.write_number_with_format(row, 2, product.quantity as f64, &styles.money_right)?;
    }

    let total_row = summary.product_totals.len() as u32 + 1;
    sheet.write_string_with_format(total_row, 0, UNITS_TOTAL_LABEL, &styles.total_label)?;
    sheet.write_string_with_format(total_row, 1, "", &styles.total_label)?;
    sheet.write_number_with_format(
        total_row,
        2,
        summary.total_units as f64,
        &styles.total_value,
    )?;
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::aggregate::aggregate;
    use crate::utils::time::DEFAULT_TIMEZONE;

    #[test]
    fn test_render_produces_zip_container() {
        let window = MonthWindow::new(2, 2024, DEFAULT_TIMEZONE).unwrap();
        let summary = aggregate(&window, &[]);
        let bytes = render(&window, &summary, &[], &HashMap::new()).unwrap();
        // xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_column_tables_match_headers() {
        assert_eq!(ORDER_COLUMNS.len(), 9);
        assert_eq!(ORDER_COLUMNS[6].0, "Tổng giá trị đơn (VNĐ)");
        assert_eq!(REVENUE_COLUMNS[1].0, "Doanh thu trong ngày");
        assert_eq!(PRODUCT_COLUMNS[1].0, "Mã sản phẩm (SKU)");
    }
}
