use std::io::Write;

use tabled::Table;
use tabled::builder::Builder;
use tabled::settings::Style;
use tidemark_config::GridStyle;

pub fn build_table(headers: &[String], rows: &[Vec<String>], style: GridStyle) -> Table {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    let mut table = builder.build();
    match style {
        GridStyle::Ascii => table.with(Style::ascii()),
        GridStyle::Modern => table.with(Style::modern()),
        GridStyle::Rounded => table.with(Style::rounded()),
        GridStyle::Markdown => table.with(Style::markdown()),
        GridStyle::Psql => table.with(Style::psql()),
        GridStyle::Blank => table.with(Style::blank()),
    };
    table
}

/// Renders the whole table before writing so a failure never leaves partial output.
pub fn write_table(
    headers: &[String],
    rows: &[Vec<String>],
    style: GridStyle,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    let rendered = build_table(headers, rows, style).to_string();
    writeln!(out, "{rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn markdown_table_has_header_and_rows() {
        let headers = strings(&["Revision", "Author"]);
        let rows = vec![strings(&["abc123", "Alice"]), strings(&["def456", "Bob"])];

        let mut out = Vec::new();
        write_table(&headers, &rows, GridStyle::Markdown, &mut out).expect("write table");
        let rendered = String::from_utf8(out).expect("utf8 output");
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Revision"));
        assert!(lines[2].contains("abc123"));
        assert!(lines[3].contains("Bob"));
    }

    #[test]
    fn header_only_table_still_renders() {
        let headers = strings(&["Revision", "Author", "Date", "Lines of Code"]);
        let rendered = build_table(&headers, &[], GridStyle::Ascii).to_string();
        assert!(rendered.contains("Lines of Code"));
    }

    #[test]
    fn escape_codes_do_not_widen_columns() {
        let headers = strings(&["Value"]);
        let colored = vec![strings(&["9 (\x1b[32m-3\x1b[0m)"])];
        let plain = vec![strings(&["9 (-3)"])];

        let colored_table = build_table(&headers, &colored, GridStyle::Ascii).to_string();
        let plain_table = build_table(&headers, &plain, GridStyle::Ascii).to_string();

        let first_line = |table: &str| table.lines().next().map(str::to_owned);
        assert_eq!(first_line(&colored_table), first_line(&plain_table));
    }
}
