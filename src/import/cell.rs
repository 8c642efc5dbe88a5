use chrono::NaiveDateTime;
use serde::Deserialize;

/// A single spreadsheet cell as produced by the sheet reader.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireCell")]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A date the reader already decoded; read as a local calendar value.
    Date(NaiveDateTime),
}

/// JSON shape of a cell: `null`, a boolean, a number, a string, or
/// `{"date": "2024-01-31T00:00:00"}` for a decoded date.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date { date: NaiveDateTime },
}

impl From<WireCell> for Cell {
    fn from(cell: WireCell) -> Self {
        match cell {
            WireCell::Null => Cell::Empty,
            WireCell::Bool(value) => Cell::Bool(value),
            WireCell::Number(value) => Cell::Number(value),
            WireCell::Text(value) => Cell::Text(value),
            WireCell::Date { date } => Cell::Date(date),
        }
    }
}

impl Cell {
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text.to_owned())
        }
    }

    /// Trimmed string form of the cell, or `None` when it is blank or holds
    /// a stray `null`/`undefined` left behind by the exporting tool.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Cell::Empty => return None,
            Cell::Bool(value) => value.to_string(),
            Cell::Number(value) => format_number(*value),
            Cell::Text(value) => value.trim().to_owned(),
            Cell::Date(value) => value.date().format("%Y-%m-%d").to_string(),
        };

        if text.is_empty() || text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("undefined") {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_none()
    }
}

/// Integral numbers print without a trailing `.0`, so an employee code of
/// `1001` stays `1001`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
