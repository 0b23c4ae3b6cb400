//! Comma-separated text codec for collection files.
//!
//! Writing quotes a field only when it holds a comma, quote or line break.
//! Reading accepts quoted fields spanning several lines, CRLF endings and a
//! leading byte-order mark.

/// One logical record read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// 1-based line on which the record starts
    pub line: usize,
    /// Field values with quoting removed
    pub fields: Vec<String>,
    /// False when the input ended inside a quoted field
    pub terminated: bool,
}

/// Escape a single field.
pub fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a header row followed by data rows.
pub fn write_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| escape(c)));
    for row in rows {
        push_line(&mut out, row.iter().map(|v| escape(v)));
    }
    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Split text into records. Blank lines are skipped.
pub fn parse(text: &str) -> Vec<CsvRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();

    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                finish_record(&mut records, &mut fields, record_line, true);
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes || !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        finish_record(&mut records, &mut fields, record_line, !in_quotes);
    }

    records
}

fn finish_record(
    records: &mut Vec<CsvRecord>,
    fields: &mut Vec<String>,
    line: usize,
    terminated: bool,
) {
    let fields = std::mem::take(fields);
    if terminated && fields.len() == 1 && fields[0].trim().is_empty() {
        return;
    }
    records.push(CsvRecord {
        line,
        fields,
        terminated,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_and_special() {
        assert_eq!(escape("Python"), "Python");
        assert_eq!(escape("UI/UX, Figma"), "\"UI/UX, Figma\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_write_table_header_only() {
        let out = write_table(&["Isim", "Rol", "Yetenekler"], &[]);
        assert_eq!(out, "Isim,Rol,Yetenekler\n");
    }

    #[test]
    fn test_parse_simple() {
        let records = parse("a,b,c\n1,2,3\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fields, vec!["1", "2", "3"]);
        assert_eq!(records[1].line, 2);
        assert!(records[1].terminated);
    }

    #[test]
    fn test_parse_quoted_multiline_and_crlf() {
        let records = parse("h1,h2\r\n\"x, y\",\"line1\nline2\"\r\nlast,row");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields, vec!["x, y", "line1\nline2"]);
        assert_eq!(records[2].line, 4);
        assert_eq!(records[2].fields, vec!["last", "row"]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_bom() {
        let records = parse("\u{feff}a,b\n\n1,2\n\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["a", "b"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_parse_keeps_empty_fields() {
        let records = parse("a,,c\n,,\n");
        assert_eq!(records[0].fields, vec!["a", "", "c"]);
        assert_eq!(records[1].fields, vec!["", "", ""]);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let records = parse("a,b\n1,\"open");
        assert_eq!(records.len(), 2);
        assert!(!records[1].terminated);
    }

    #[test]
    fn test_write_then_parse_preserves_awkward_values() {
        let rows = vec![vec!["Zeynep, Kaya".to_string(), "\"Lead\"".to_string()]];
        let text = write_table(&["Isim", "Rol"], &rows);
        let records = parse(&text);
        assert_eq!(records[1].fields, rows[0]);
    }
}
