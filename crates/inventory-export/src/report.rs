//! # Report Renderer
//!
//! Renders a view as a paginated A4 PDF table.
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────────┐  ▲
//! │                Inventory Report              │  │ 10 mm margin, 10 mm title
//! │ ┌──────────┬────────────┬──────────┬───────┐ │  │
//! │ │Item Code │ Name       │ Category │  Qty  │ │  │ shaded header, every page
//! │ ├──────────┼────────────┼──────────┼───────┤ │  │
//! │ │A001      │ Laptop     │ Electron…│     4 │ │  │ 10 mm rows
//! │ │A002      │ Desk       │ Furniture│    15 │ │  │
//! │ │ ...      │            │          │       │ │  │
//! │ └──────────┴────────────┴──────────┴───────┘ │  │ break 20 mm above bottom
//! │                    Page N                    │  │ 15 mm above bottom
//! └──────────────────────────────────────────────┘  ▼
//!   40 mm       50 mm        40 mm      30 mm
//! ```
//!
//! All text uses the Courier family (standard PDF fonts, no embedding).
//! Courier is monospaced at 0.6 em, so centring and truncation are exact.
//! Text is written with WinAnsiEncoding; characters it cannot represent
//! become `?`.
//!
//! Content streams are left uncompressed.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::ExportResult;
use inventory_core::InventoryItem;

/// MIME type of rendered reports.
pub const PDF_MIME: &str = "application/pdf";

/// Title printed at the top of every page.
pub const REPORT_TITLE: &str = "Inventory Report";

// =============================================================================
// Layout (PDF points, origin bottom-left)
// =============================================================================

const MM: f32 = 72.0 / 25.4;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

const MARGIN: f32 = 10.0 * MM;
const ROW_HEIGHT: f32 = 10.0 * MM;
const PAGE_BREAK_ABOVE_BOTTOM: f32 = 20.0 * MM;
const FOOTER_ABOVE_BOTTOM: f32 = 15.0 * MM;
const CELL_PADDING: f32 = 1.0 * MM;

const COLUMN_WIDTHS: [f32; 4] = [40.0 * MM, 50.0 * MM, 40.0 * MM, 30.0 * MM];
const COLUMN_TITLES: [&str; 4] = ["Item Code", "Name", "Category", "Quantity"];

const TITLE_SIZE: i64 = 12;
const HEADER_SIZE: i64 = 10;
const CELL_SIZE: i64 = 10;
const FOOTER_SIZE: i64 = 8;

/// Courier advance width in em.
const COURIER_ADVANCE: f32 = 0.6;

const HEADER_SHADE: f32 = 0.85;

/// Font resource names.
const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";

/// Top edge (distance from page top) of the first body row.
const BODY_TOP: f32 = MARGIN + 2.0 * ROW_HEIGHT;

/// Body rows that fit on one page before the break line.
pub fn rows_per_page() -> usize {
    let usable = PAGE_HEIGHT - PAGE_BREAK_ABOVE_BOTTOM - BODY_TOP;
    ((usable / ROW_HEIGHT).floor() as usize).max(1)
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders `items` as a PDF report, one row per item in input order.
///
/// An empty view still produces one page with title, column header and
/// footer.
pub fn render_pdf(items: &[InventoryItem]) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(font("Courier"));
    let bold = doc.add_object(font("Courier-Bold"));
    let italic = doc.add_object(font("Courier-Oblique"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular,
            FONT_BOLD => bold,
            FONT_ITALIC => italic,
        },
    });

    let empty: &[InventoryItem] = &[];
    let pages: Vec<&[InventoryItem]> = if items.is_empty() {
        vec![empty]
    } else {
        items.chunks(rows_per_page()).collect()
    };

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, rows) in pages.iter().enumerate() {
        let content = page_content(rows, index + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;

    debug!(
        rows = items.len(),
        pages = page_count,
        bytes = bytes.len(),
        "Rendered PDF report"
    );
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Builds the drawing operations for one page.
fn page_content(rows: &[InventoryItem], page_number: usize) -> Content {
    let mut ops = Vec::new();
    let table_left = MARGIN;
    let content_width = PAGE_WIDTH - 2.0 * MARGIN;

    // Title
    centred_text(
        &mut ops,
        FONT_BOLD,
        TITLE_SIZE,
        REPORT_TITLE,
        MARGIN,
        content_width,
        MARGIN,
    );

    // Column header
    let header_top = MARGIN + ROW_HEIGHT;
    ops.push(Operation::new("w", vec![Object::Real(0.5)]));
    ops.push(Operation::new("g", vec![Object::Real(HEADER_SHADE)]));
    let mut x = table_left;
    for (width, title) in COLUMN_WIDTHS.iter().zip(COLUMN_TITLES) {
        cell_box(&mut ops, x, header_top, *width, "B");
        ops.push(Operation::new("g", vec![Object::Integer(0)]));
        left_text(&mut ops, FONT_BOLD, HEADER_SIZE, title, x, *width, header_top);
        ops.push(Operation::new("g", vec![Object::Real(HEADER_SHADE)]));
        x += width;
    }
    ops.push(Operation::new("g", vec![Object::Integer(0)]));

    // Body
    for (index, item) in rows.iter().enumerate() {
        let top = BODY_TOP + index as f32 * ROW_HEIGHT;
        let quantity = item.quantity.to_string();
        let cells = [
            item.item_code.as_str(),
            item.item_name.as_str(),
            item.category.as_str(),
            quantity.as_str(),
        ];

        let mut x = table_left;
        for (column, (width, text)) in COLUMN_WIDTHS.iter().zip(cells).enumerate() {
            cell_box(&mut ops, x, top, *width, "S");
            if column == 3 {
                right_text(&mut ops, FONT_REGULAR, CELL_SIZE, text, x, *width, top);
            } else {
                left_text(&mut ops, FONT_REGULAR, CELL_SIZE, text, x, *width, top);
            }
            x += width;
        }
    }

    // Footer
    centred_text(
        &mut ops,
        FONT_ITALIC,
        FOOTER_SIZE,
        &format!("Page {}", page_number),
        MARGIN,
        content_width,
        PAGE_HEIGHT - FOOTER_ABOVE_BOTTOM,
    );

    Content { operations: ops }
}

// =============================================================================
// Drawing Helpers
// =============================================================================

/// Converts a distance from the page top to a PDF y coordinate.
fn from_top(top: f32) -> f32 {
    PAGE_HEIGHT - top
}

/// Baseline that vertically centres text of `size` in a row starting at `top`.
fn baseline(top: f32, size: i64) -> f32 {
    from_top(top + ROW_HEIGHT / 2.0) - size as f32 * 0.3
}

fn text_width(chars: usize, size: i64) -> f32 {
    chars as f32 * size as f32 * COURIER_ADVANCE
}

/// Draws a row-height rectangle; `paint` is `S` (stroke) or `B` (fill + stroke).
fn cell_box(ops: &mut Vec<Operation>, x: f32, top: f32, width: f32, paint: &str) {
    ops.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(from_top(top + ROW_HEIGHT)),
            Object::Real(width),
            Object::Real(ROW_HEIGHT),
        ],
    ));
    ops.push(Operation::new(paint, vec![]));
}

fn show_text(ops: &mut Vec<Operation>, font: &str, size: i64, text: &[u8], x: f32, y: f32) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), Object::Integer(size)]));
    ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text.to_vec())]));
    ops.push(Operation::new("ET", vec![]));
}

fn left_text(
    ops: &mut Vec<Operation>,
    font: &str,
    size: i64,
    text: &str,
    x: f32,
    width: f32,
    top: f32,
) {
    let fitted = fit_to_width(text, width - 2.0 * CELL_PADDING, size);
    show_text(ops, font, size, &fitted, x + CELL_PADDING, baseline(top, size));
}

fn right_text(
    ops: &mut Vec<Operation>,
    font: &str,
    size: i64,
    text: &str,
    x: f32,
    width: f32,
    top: f32,
) {
    let fitted = fit_to_width(text, width - 2.0 * CELL_PADDING, size);
    let start = x + width - CELL_PADDING - text_width(fitted.len(), size);
    show_text(ops, font, size, &fitted, start, baseline(top, size));
}

fn centred_text(
    ops: &mut Vec<Operation>,
    font: &str,
    size: i64,
    text: &str,
    x: f32,
    width: f32,
    top: f32,
) {
    let fitted = fit_to_width(text, width, size);
    let start = x + (width - text_width(fitted.len(), size)) / 2.0;
    show_text(ops, font, size, &fitted, start, baseline(top, size));
}

/// Encodes `text` for WinAnsiEncoding and truncates it to `width` points.
///
/// Truncated text ends in `..`.
fn fit_to_width(text: &str, width: f32, size: i64) -> Vec<u8> {
    let encoded = to_win_ansi(text);
    let max_chars = (width / (size as f32 * COURIER_ADVANCE)).floor() as usize;

    if encoded.len() <= max_chars {
        return encoded;
    }
    if max_chars <= 2 {
        return encoded[..max_chars].to_vec();
    }

    let mut truncated = encoded[..max_chars - 2].to_vec();
    truncated.extend_from_slice(b"..");
    truncated
}

/// One byte per character: printable ASCII and Latin-1 pass through,
/// control characters become spaces, everything else becomes `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            0x00..=0x1F | 0x7F => b' ',
            _ => b'?',
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<InventoryItem> {
        (1..=n)
            .map(|i| InventoryItem::new(format!("A{:03}", i), format!("Item {i}"), "Other", i as i64))
            .collect()
    }

    fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn test_single_page_report() {
        let bytes = render_pdf(&items(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        assert_eq!(occurrences(&bytes, b"(Inventory Report)"), 1);
        assert_eq!(occurrences(&bytes, b"(Page 1)"), 1);
        assert_eq!(occurrences(&bytes, b"(A003)"), 1);
    }

    #[test]
    fn test_overflow_starts_new_pages() {
        let per_page = rows_per_page();
        let bytes = render_pdf(&items(per_page * 2 + 1)).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        assert_eq!(occurrences(&bytes, b"(Inventory Report)"), 3);
        assert_eq!(occurrences(&bytes, b"(Item Code)"), 3);
        for footer in [&b"(Page 1)"[..], b"(Page 2)", b"(Page 3)"] {
            assert_eq!(occurrences(&bytes, footer), 1);
        }
        assert_eq!(occurrences(&bytes, b"(Page 4)"), 0);
    }

    #[test]
    fn test_exactly_full_page_has_no_blank_second_page() {
        let bytes = render_pdf(&items(rows_per_page())).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_empty_view_renders_one_page() {
        let bytes = render_pdf(&[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(occurrences(&bytes, b"(Page 1)"), 1);
    }

    #[test]
    fn test_rows_fit_between_header_and_break() {
        let per_page = rows_per_page();
        let last_bottom = BODY_TOP + per_page as f32 * ROW_HEIGHT;
        assert!(last_bottom <= PAGE_HEIGHT - PAGE_BREAK_ABOVE_BOTTOM);
        assert!(last_bottom + ROW_HEIGHT > PAGE_HEIGHT - PAGE_BREAK_ABOVE_BOTTOM);
    }

    #[test]
    fn test_text_is_truncated_to_cell() {
        // 50 mm column, 10 pt Courier.
        let fitted = fit_to_width(&"x".repeat(200), COLUMN_WIDTHS[1] - 2.0 * CELL_PADDING, CELL_SIZE);
        assert!(text_width(fitted.len(), CELL_SIZE) <= COLUMN_WIDTHS[1] - 2.0 * CELL_PADDING);
        assert!(fitted.ends_with(b".."));

        let short = fit_to_width("Desk", COLUMN_WIDTHS[1], CELL_SIZE);
        assert_eq!(short, b"Desk");
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi("Café"), b"Caf\xE9".to_vec());
        assert_eq!(to_win_ansi("Ω-meter"), b"?-meter".to_vec());
        assert_eq!(to_win_ansi("tab\there"), b"tab here".to_vec());
    }

    #[test]
    fn test_non_latin_text_still_renders() {
        let view = vec![InventoryItem::new("A001", "日本語の名前", "Other", 1)];
        let bytes = render_pdf(&view).unwrap();
        assert_eq!(occurrences(&bytes, b"(??????)"), 1);
    }
}
