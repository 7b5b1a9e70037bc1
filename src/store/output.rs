//! Rendering of query results as a grid, JSON or CSV.

use super::QueryResult;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bordered grid for terminals
    #[default]
    Table,
    /// Array of objects keyed by column
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "unknown output format '{}' (expected table, json or csv)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

pub struct QueryResultFormatter;

impl QueryResultFormatter {
    pub fn format(result: &QueryResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => grid(result),
            OutputFormat::Json => json(result),
            OutputFormat::Csv => csv_text(result),
        }
    }

    pub fn write<W: Write>(
        result: &QueryResult,
        format: OutputFormat,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writer.write_all(Self::format(result, format).as_bytes())
    }
}

/// Grid with `=` under the header; numbers and money align right
fn grid(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return String::new();
    }

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            result
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(column.chars().count(), usize::max)
        })
        .collect();

    let rule = |fill: char| -> String {
        let segments: Vec<String> = widths.iter().map(|w| fill.to_string().repeat(w + 2)).collect();
        format!("+{}+\n", segments.join("+"))
    };
    let line = |cells: &[String], align_numbers: bool| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if align_numbers && looks_numeric(cell) {
                    format!(" {:>width$} ", cell)
                } else {
                    format!(" {:<width$} ", cell)
                }
            })
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let mut out = rule('-');
    out.push_str(&line(&result.columns, false));
    out.push_str(&rule('='));
    for row in &result.rows {
        out.push_str(&line(row, true));
        out.push_str(&rule('-'));
    }
    out
}

fn looks_numeric(cell: &str) -> bool {
    let digits: String = cell
        .trim_start_matches('-')
        .trim_start_matches('$')
        .chars()
        .filter(|&c| c != ',')
        .collect();
    !digits.is_empty() && digits.parse::<f64>().is_ok()
}

fn json(result: &QueryResult) -> String {
    let records: Vec<Value> = result
        .rows
        .iter()
        .map(|row| {
            let record: Map<String, Value> = result
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(String::as_str).map(typed))
                .collect();
            Value::Object(record)
        })
        .collect();
    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string()) + "\n"
}

/// Integers and floats become JSON numbers, everything else a string
fn typed(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return Value::Number(n.into());
    }
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

fn csv_text(result: &QueryResult) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let written = std::iter::once(&result.columns)
        .chain(&result.rows)
        .try_for_each(|record| writer.write_record(record));
    match (written, writer.into_inner()) {
        (Ok(()), Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        _ => String::new(),
    }
}

/// Dollars with thousands separators and cents, e.g. `$12,345.67`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spending() -> QueryResult {
        QueryResult {
            columns: vec![
                "customer_name".to_string(),
                "total_orders".to_string(),
                "total_amount_spent".to_string(),
            ],
            rows: vec![
                vec!["Alice Smith".to_string(), "3".to_string(), "1520.4".to_string()],
                vec!["Bob, Jr.".to_string(), "1".to_string(), "99.99".to_string()],
            ],
        }
    }

    #[test]
    fn test_grid() {
        let out = QueryResultFormatter::format(&spending(), OutputFormat::Table);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("+---"));
        assert!(lines[1].contains("| customer_name |"));
        assert!(lines[2].starts_with("+==="));
        assert!(lines[3].contains("| Alice Smith   |"));
        // numeric cells are right-aligned
        assert!(lines[5].contains("|            1 |"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_json_types() {
        let out = QueryResultFormatter::format(&spending(), OutputFormat::Json);
        let parsed: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["customer_name"], "Alice Smith");
        assert_eq!(parsed[0]["total_orders"], 3);
        assert_eq!(parsed[1]["total_amount_spent"], 99.99);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let out = QueryResultFormatter::format(&spending(), OutputFormat::Json);
        let name = out.find("\"customer_name\"").unwrap();
        let orders = out.find("\"total_orders\"").unwrap();
        let spent = out.find("\"total_amount_spent\"").unwrap();
        assert!(name < orders && orders < spent);
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = QueryResultFormatter::format(&spending(), OutputFormat::Csv);
        assert!(out.starts_with("customer_name,total_orders,total_amount_spent\n"));
        assert!(out.contains("\"Bob, Jr.\",1,99.99\n"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_money_in_grid_is_numeric() {
        assert!(looks_numeric("$1,234.50"));
        assert!(looks_numeric("-12"));
        assert!(!looks_numeric("Alice"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(99.5), "$99.50");
        assert_eq!(format_money(1234.567), "$1,234.57");
        assert_eq!(format_money(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_money(-12.3), "-$12.30");
    }
}
