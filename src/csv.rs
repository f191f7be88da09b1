//! Delimited-text (CSV) parsing shared by every CSV-backed page.
//!
//! The parser never fails: unbalanced quotes and ragged rows degrade to a
//! best-effort field split instead of an error.

use indexmap::IndexMap;
use std::mem;

use crate::constants::csv::{FIELD_SEPARATOR, QUOTE, ROW_SEPARATOR};
use crate::types::{AttributeName, Cell};

/// Header-keyed CSV table with every data row aligned to the header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Trimmed header cells, in column order.
    pub header: Vec<AttributeName>,
    /// Data rows; each has exactly `header.len()` trimmed cells.
    pub rows: Vec<Vec<Cell>>,
}

impl CsvTable {
    /// Parse `text` into a header plus aligned, non-empty data rows.
    pub fn parse(text: &str) -> Self {
        let mut raw = parse_rows(text).into_iter();
        let Some(header_row) = raw.next() else {
            return Self::default();
        };
        let header: Vec<AttributeName> = header_row
            .iter()
            .map(|cell| cell.trim().to_string())
            .collect();
        let rows = raw
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| align_to_header(&header, &row))
            .collect();
        Self { header, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows as header-keyed maps (column order preserved).
    ///
    /// A repeated header name keeps its first position and its last value.
    pub fn to_maps(&self) -> Vec<IndexMap<AttributeName, Cell>> {
        self.rows
            .iter()
            .map(|row| {
                self.header
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<IndexMap<_, _>>()
            })
            .collect()
    }

    /// Serialize the table back to CSV text.
    pub fn encode(&self) -> String {
        encode_rows(&self.header, &self.rows)
    }
}

/// Split raw text into rows of untrimmed fields.
///
/// `\r\n` is normalized to `\n` first; a bare `\r` stays part of the cell.
pub fn parse_rows(text: &str) -> Vec<Vec<Cell>> {
    let text = text.replace("\r\n", "\n");
    let mut rows = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE => {
                if in_quotes && chars.peek() == Some(&QUOTE) {
                    cell.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            FIELD_SEPARATOR if !in_quotes => row.push(mem::take(&mut cell)),
            ROW_SEPARATOR if !in_quotes => {
                row.push(mem::take(&mut cell));
                rows.push(mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }

    // An unterminated quote lands here too.
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}

fn align_to_header(header: &[AttributeName], row: &[Cell]) -> Vec<Cell> {
    (0..header.len())
        .map(|idx| {
            row.get(idx)
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Encode a header and rows as CSV text, quoting only where required.
pub fn encode_rows<H, R, C>(header: &[H], rows: &[R]) -> String
where
    H: AsRef<str>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let mut out = encode_row(header.iter().map(AsRef::as_ref));
    for row in rows {
        out.push(ROW_SEPARATOR);
        out.push_str(&encode_row(row.as_ref().iter().map(AsRef::as_ref)));
    }
    out.push(ROW_SEPARATOR);
    out
}

fn encode_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells
        .map(encode_cell)
        .collect::<Vec<_>>()
        .join(&FIELD_SEPARATOR.to_string())
}

fn encode_cell(cell: &str) -> String {
    let needs_quotes = cell
        .chars()
        .any(|ch| matches!(ch, FIELD_SEPARATOR | QUOTE | ROW_SEPARATOR | '\r'));
    if !needs_quotes {
        return cell.to_string();
    }
    let escaped = cell.replace(QUOTE, "\"\"");
    format!("{QUOTE}{escaped}{QUOTE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_span_keeps_embedded_comma() {
        assert_eq!(parse_rows("a,\"b,c\",d"), vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn doubled_quote_decodes_to_single_quote() {
        assert_eq!(parse_rows("a,\"b\"\"c\",d"), vec![vec!["a", "b\"c", "d"]]);
    }

    #[test]
    fn embedded_newline_stays_in_one_row() {
        let rows = parse_rows("a,\"line one\nline two\",c\n");
        assert_eq!(rows, vec![vec!["a", "line one\nline two", "c"]]);
    }

    #[test]
    fn crlf_is_normalized_but_bare_cr_is_kept() {
        let rows = parse_rows("a,b\r\nc\rd,e\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c\rd", "e"]]);
    }

    #[test]
    fn unterminated_quote_flushes_pending_cell() {
        let rows = parse_rows("a,\"open,still open\nmore");
        assert_eq!(rows, vec![vec!["a", "open,still open\nmore"]]);
    }

    #[test]
    fn quote_in_the_middle_of_a_cell_toggles_the_span() {
        let rows = parse_rows("ab\"c,d\",e");
        assert_eq!(rows, vec![vec!["abc,d", "e"]]);
    }

    #[test]
    fn trailing_newline_does_not_add_a_row() {
        assert_eq!(parse_rows("a,b\n").len(), 1);
        assert!(parse_rows("").is_empty());
    }

    #[test]
    fn trailing_separator_yields_empty_last_field() {
        assert_eq!(parse_rows("a,"), vec![vec!["a", ""]]);
    }

    #[test]
    fn short_rows_default_missing_fields_to_empty_string() {
        let table = CsvTable::parse("category,daytime,recommendation\nfamily,morning\n");
        assert_eq!(table.rows, vec![vec!["family", "morning", ""]]);
        let maps = table.to_maps();
        assert_eq!(maps[0].get("recommendation").map(String::as_str), Some(""));
    }

    #[test]
    fn extra_fields_beyond_header_are_dropped() {
        let table = CsvTable::parse("a,b\n1,2,3,4\n");
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn header_and_values_are_trimmed() {
        let table = CsvTable::parse(" category , daytime \n  solo ,\tevening \n");
        assert_eq!(table.header, vec!["category", "daytime"]);
        assert_eq!(table.rows, vec![vec!["solo", "evening"]]);
    }

    #[test]
    fn all_empty_rows_are_filtered() {
        let table = CsvTable::parse("a,b,c\n,,\n  ,\t,\n1,2,3\n\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn header_only_input_has_no_rows() {
        let table = CsvTable::parse("a,b\n");
        assert_eq!(table.header, vec!["a", "b"]);
        assert!(table.is_empty());
    }

    #[test]
    fn encoding_quotes_only_cells_that_need_it() {
        let encoded = encode_rows(&["name", "note"], &[vec!["plain", "has, comma"], vec![
            "say \"hi\"",
            "two\nlines",
        ]]);
        assert_eq!(
            encoded,
            "name,note\nplain,\"has, comma\"\n\"say \"\"hi\"\"\",\"two\nlines\"\n"
        );
    }

    #[test]
    fn encoded_table_parses_back_to_the_same_rows() {
        let text = "category,daytime,recommendation\n\
                    family,morning,\"Visit salt mine, then lunch|See \"\"Rudolf\"\" shaft\"\n\
                    solo , evening,\"Night tour\nPhotography spot\"\n\
                    ,,\n\
                    couple,noon\n";
        let table = CsvTable::parse(text);
        assert_eq!(table.len(), 3);
        let reparsed = CsvTable::parse(&table.encode());
        assert_eq!(reparsed, table);
    }
}
