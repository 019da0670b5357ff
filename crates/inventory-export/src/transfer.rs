//! # Bulk Transfer Codec
//!
//! CSV files with the fixed header `item_code,item_name,category,quantity`,
//! UTF-8, standard quoting. Export writes exactly the rows it is given, in
//! order. Parsing only decodes; whether the rows are acceptable for a restore
//! is decided by `inventory_core::validation::validate_import_rows`.

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use inventory_core::InventoryItem;

/// Column order of every file this module reads or writes.
pub const CSV_HEADER: [&str; 4] = ["item_code", "item_name", "category", "quantity"];

/// MIME type of exported files.
pub const CSV_MIME: &str = "text/csv";

/// Serialises a view to CSV bytes.
///
/// The header is written even when the view is empty.
pub fn export_csv(items: &[InventoryItem]) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ExportError::CsvEncode(e.to_string()))?;

    for item in items {
        writer
            .serialize(item)
            .map_err(|e| ExportError::CsvEncode(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvEncode(e.to_string()))?;

    debug!(rows = items.len(), bytes = bytes.len(), "Exported CSV");
    Ok(bytes)
}

/// Decodes CSV bytes into rows, in file order.
///
/// ## Errors
/// - `UnexpectedHeader` if the first record is not [`CSV_HEADER`]
/// - `MalformedCsv { line }` for the first row that cannot be decoded
///   (line numbers count the header as line 1)
pub fn parse_csv(bytes: &[u8]) -> ExportResult<Vec<InventoryItem>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers().map_err(|e| malformed(&e, 1))?;
    if !headers.iter().eq(CSV_HEADER.iter().copied()) {
        return Err(ExportError::UnexpectedHeader {
            expected: CSV_HEADER.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<InventoryItem>().enumerate() {
        let row = record.map_err(|e| malformed(&e, index as u64 + 2))?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "Parsed CSV");
    Ok(rows)
}

/// Maps a reader error to `MalformedCsv`, preferring the reader's own line.
fn malformed(err: &csv::Error, fallback_line: u64) -> ExportError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    let reason = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} fields, found {}", expected_len, len)
        }
        _ => err.to_string(),
    };
    ExportError::MalformedCsv { line, reason }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<InventoryItem> {
        vec![
            InventoryItem::new("A001", "Laptop", "Electronics", 4),
            InventoryItem::new("A002", "Desk, oak \"large\"", "Furniture", 15),
            InventoryItem::new("A003", "Café crème", "Consumable", 0),
        ]
    }

    #[test]
    fn test_export_header_and_rows() {
        let bytes = export_csv(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("item_code,item_name,category,quantity"));
        assert_eq!(lines.next(), Some("A001,Laptop,Electronics,4"));
        assert_eq!(
            lines.next(),
            Some("A002,\"Desk, oak \"\"large\"\"\",Furniture,15")
        );
    }

    #[test]
    fn test_empty_view_still_has_header() {
        let bytes = export_csv(&[]).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["item_code,item_name,category,quantity"]
        );
        assert!(parse_csv(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_export_then_parse_reproduces_rows() {
        let items = sample();
        let parsed = parse_csv(&export_csv(&items).unwrap()).unwrap();
        assert_eq!(parsed, items);
    }

    #[test]
    fn test_parse_reports_line_of_bad_quantity() {
        let data = b"item_code,item_name,category,quantity\nA001,Laptop,Electronics,4\nA002,Desk,Furniture,many\n";
        match parse_csv(data).unwrap_err() {
            ExportError::MalformedCsv { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_column() {
        let data = b"item_code,item_name,category,quantity\nA001,Laptop,4\n";
        assert!(matches!(
            parse_csv(data),
            Err(ExportError::MalformedCsv { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_header() {
        let data = b"code,name,category,qty\nA001,Laptop,Electronics,4\n";
        assert!(matches!(
            parse_csv(data),
            Err(ExportError::UnexpectedHeader { .. })
        ));
    }

    #[test]
    fn test_parse_keeps_negative_quantity_for_validation() {
        let data = b"item_code,item_name,category,quantity\nA001,Laptop,Electronics,-3\n";
        let rows = parse_csv(data).unwrap();
        assert_eq!(rows[0].quantity, -3);
    }
}
