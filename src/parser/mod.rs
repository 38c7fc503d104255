// CSV ingestion: raw text -> typed Dataset

pub mod line;

use crate::data::{Dataset, Row, Value};
use crate::error::ParseError;
use tracing::debug;

/// Parse CSV text into a dataset.
///
/// The first line is the header; every further line is a record. Lines
/// whose values are all empty are dropped.
pub fn parse_csv(content: &str, filename: &str) -> Result<Dataset, ParseError> {
    let content = content.trim_start_matches('\u{feff}').trim();
    let lines: Vec<&str> = content.split('\n').collect();
    if lines.len() < 2 {
        return Err(ParseError::MissingData);
    }

    let columns = parse_header(lines[0]);

    let rows: Vec<Row> = lines[1..]
        .iter()
        .map(|line| parse_record(line, &columns))
        .filter(|row| !row.is_blank())
        .collect();

    debug!(
        filename,
        columns = columns.len(),
        rows = rows.len(),
        dropped = lines.len() - 1 - rows.len(),
        "parsed CSV"
    );

    Ok(Dataset::new(rows, columns, filename))
}

/// Header names: plain comma split, trimmed, outer quotes removed
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(',').map(|h| unquote(h.trim()).to_string()).collect()
}

fn parse_record(line: &str, columns: &[String]) -> Row {
    let values = line::split_fields(line);

    let mut row = Row::new();
    for (i, col) in columns.iter().enumerate() {
        let raw = values.get(i).map(|v| unquote(v.trim())).unwrap_or("");
        row.insert(col, Value::coerce(raw));
    }
    row
}

/// Strip one leading and one trailing double quote
fn unquote(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
