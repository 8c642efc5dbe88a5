use super::{Cell, ImportError};

/// Rows of cells, header row first.
pub type Grid = Vec<Vec<Cell>>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Accepts a grid decoded by the client. It must hold a header row and at
/// least one data row.
pub fn read_grid(rows: Grid) -> Result<Grid, ImportError> {
    ensure_data_rows(rows)
}

/// Reads a comma separated file into a grid. Every value arrives as text;
/// rows may have differing lengths.
pub fn read_csv(bytes: &[u8]) -> Result<Grid, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    ensure_data_rows(rows)
}

fn ensure_data_rows(rows: Grid) -> Result<Grid, ImportError> {
    if rows.len() < 2 {
        return Err(ImportError::Parse {
            reason: "the sheet must contain a header row and at least one data row".to_owned(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv() {
        let grid = read_csv(b"\xEF\xBB\xBFStaff ID,Role ID,First Name\nSTF-1,2,Asha\nSTF-2,,\"Ravi, Jr\"\nSTF-3\n").unwrap();

        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], Cell::Text("Staff ID".to_owned()));
        assert_eq!(grid[2][1], Cell::Empty);
        assert_eq!(grid[2][2], Cell::Text("Ravi, Jr".to_owned()));
        assert_eq!(grid[3].len(), 1);
    }

    #[test]
    fn test_read_csv_needs_a_data_row() {
        assert!(matches!(read_csv(b""), Err(ImportError::Parse { .. })));
        assert!(matches!(read_csv(b"Staff ID,Role ID,First Name\n"), Err(ImportError::Parse { .. })));
    }

    #[test]
    fn test_read_csv_rejects_invalid_utf8() {
        assert!(matches!(read_csv(b"Staff ID\n\xFF\xFE\n"), Err(ImportError::Parse { .. })));
    }

    #[test]
    fn test_read_grid() {
        assert!(read_grid(vec![vec![Cell::from_text("Staff ID")], vec![Cell::from_text("STF-1")]]).is_ok());
        assert!(matches!(read_grid(vec![vec![Cell::from_text("Staff ID")]]), Err(ImportError::Parse { .. })));
    }
}
