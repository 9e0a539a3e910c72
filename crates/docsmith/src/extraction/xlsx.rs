//! Spreadsheet extraction.
//!
//! Workbooks are read with `calamine`, which handles both modern Office
//! Open XML formats (.xlsx) and the legacy binary format (.xls). Every
//! sheet becomes a `## {name}` section followed by the sheet's cells as an
//! HTML table (first row as headers, values escaped) pushed through the
//! shared Markdown renderer.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::Result;
use crate::error::DocsmithError;
use crate::extraction::escape_html;
use crate::extraction::html::render_markdown;

/// Read a spreadsheet and render every sheet to Markdown.
pub fn extract_markdown(path: &Path) -> Result<String> {
    // calamine reports an undetectable container as InvalidData io; that is
    // a format problem, not an environment one. Real IO errors stay Io.
    let mut workbook = match open_workbook_auto(path) {
        Ok(wb) => wb,
        Err(calamine::Error::Io(io_err)) => {
            if io_err.kind() == std::io::ErrorKind::InvalidData {
                return Err(DocsmithError::parsing(format!(
                    "Cannot detect spreadsheet format: {}",
                    io_err
                )));
            }
            return Err(io_err.into());
        }
        Err(e) => {
            return Err(DocsmithError::parsing(format!(
                "Failed to parse spreadsheet: {}",
                e
            )));
        }
    };

    let sheet_names = workbook.sheet_names();

    let mut markdown = String::new();
    for name in &sheet_names {
        let range = workbook.worksheet_range(name).map_err(|e| {
            DocsmithError::parsing(format!("Failed to read sheet '{}': {}", name, e))
        })?;
        let table = render_markdown(&range_to_html(&range))?;
        let _ = write!(markdown, "## {}\n{}\n\n", name, table.trim());
    }

    Ok(markdown.trim().to_string())
}

fn range_to_html(range: &Range<Data>) -> String {
    let mut html = String::from("<html><body><table>");
    let mut first_row = true;
    for row in range.rows() {
        let cell_tag = if first_row { "th" } else { "td" };
        html.push_str("<tr>");
        for cell in row {
            html.push('<');
            html.push_str(cell_tag);
            html.push('>');
            html.push_str(&escape_html(&format_cell(cell)));
            html.push_str("</");
            html.push_str(cell_tag);
            html.push('>');
        }
        html.push_str("</tr>");
        first_row = false;
    }
    html.push_str("</table></body></html>");
    html
}

fn format_cell(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Whole floats keep one decimal so identifiers like 3.0 stay distinct from text
            if f.fract() == 0.0 {
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{:?}", dt),
        },
        Data::Error(e) => format!("#ERR: {:?}", e),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => format!("DURATION: {}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_to_html_header_row_and_escaping() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Name".to_string()));
        range.set_value((0, 1), Data::String("A&B".to_string()));
        range.set_value((1, 0), Data::String("first".to_string()));
        range.set_value((1, 1), Data::Int(7));

        let html = range_to_html(&range);
        assert!(html.contains("<th>Name</th><th>A&amp;B</th>"));
        assert!(html.contains("<td>first</td><td>7</td>"));
    }

    #[test]
    fn test_format_cell_variants() {
        assert_eq!(format_cell(&Data::Empty), "");
        assert_eq!(format_cell(&Data::Float(3.0)), "3.0");
        assert_eq!(format_cell(&Data::Float(2.5)), "2.5");
        assert_eq!(format_cell(&Data::Int(-4)), "-4");
        assert_eq!(format_cell(&Data::Bool(true)), "true");
        assert_eq!(
            format_cell(&Data::DateTimeIso("2024-01-02T03:04:05".to_string())),
            "2024-01-02T03:04:05"
        );
    }

    #[test]
    fn test_extract_markdown_rejects_non_spreadsheet() {
        let file = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        std::fs::write(file.path(), b"definitely not a workbook").unwrap();

        let err = extract_markdown(file.path()).unwrap_err();
        assert!(matches!(err, DocsmithError::Parsing { .. }));
    }
}
