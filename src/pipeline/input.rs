//! Input loading: one spreadsheet column in, an ordered URL list out.
//!
//! The URL list is taken verbatim: empty and whitespace-only cells are
//! dropped, but there is no deduplication and no URL validation here -
//! a malformed cell becomes a per-page failure later, not a fatal error,
//! so one bad row never sinks the run.

use crate::error::Web2DocxError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

/// Read the URL column from a spreadsheet (`.xlsx`, `.xls`, or `.ods`).
///
/// `sheet` of `None` means the workbook's first sheet. The header row is the
/// first row; `column` must match one of its cells exactly.
///
/// # Errors
/// Fatal only: missing file, unreadable workbook, missing sheet or column,
/// or a column with no non-empty cells.
pub fn load_urls(
    path: &Path,
    sheet: Option<&str>,
    column: &str,
) -> Result<Vec<String>, Web2DocxError> {
    if !path.exists() {
        return Err(Web2DocxError::SpreadsheetNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| Web2DocxError::SpreadsheetRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| Web2DocxError::SpreadsheetRead {
                path: path.to_path_buf(),
                detail: "workbook contains no sheets".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|_| Web2DocxError::SheetNotFound {
            sheet: sheet_name.clone(),
            available: sheet_names.join(", "),
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| Web2DocxError::ColumnNotFound {
        column: column.to_string(),
        available: "(sheet is empty)".to_string(),
    })?;

    let col_idx = header
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == column))
        .ok_or_else(|| Web2DocxError::ColumnNotFound {
            column: column.to_string(),
            available: header_names(header),
        })?;

    let urls: Vec<String> = rows
        .filter_map(|row| match row.get(col_idx) {
            Some(Data::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect();

    if urls.is_empty() {
        return Err(Web2DocxError::NoUrls {
            path: path.to_path_buf(),
        });
    }

    debug!("Sheet '{}', column '{}' (index {})", sheet_name, column, col_idx);
    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// Render the header row for the column-not-found error message.
fn header_names(header: &[Data]) -> String {
    let names: Vec<String> = header
        .iter()
        .filter_map(|cell| match cell {
            Data::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect();
    if names.is_empty() {
        "(no text headers)".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_is_fatal() {
        let err = load_urls(&PathBuf::from("/definitely/not/a/real/file.xlsx"), None, "URL")
            .unwrap_err();
        assert!(matches!(err, Web2DocxError::SpreadsheetNotFound { .. }));
    }

    #[test]
    fn non_spreadsheet_file_is_read_error() {
        // The crate manifest exists but is not a workbook.
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let err = load_urls(&manifest, None, "URL").unwrap_err();
        assert!(matches!(err, Web2DocxError::SpreadsheetRead { .. }));
    }

    #[test]
    fn header_names_skips_blank_cells() {
        let header = vec![
            Data::String("Name".into()),
            Data::Empty,
            Data::String("URL".into()),
        ];
        assert_eq!(header_names(&header), "Name, URL");
    }
}
