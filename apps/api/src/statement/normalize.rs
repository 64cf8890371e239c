//! Per-cell type coercion for CSV statements.
//!
//! Unparseable dates and amounts become `Cell::Missing`; rows are never dropped.
//! Already-typed and already-missing cells pass through, so `normalize` is idempotent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::statement::models::{Cell, Table, TransactionRow};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

pub fn normalize(table: Table) -> Table {
    Table {
        rows: table.rows.into_iter().map(normalize_row).collect(),
    }
}

fn normalize_row(row: TransactionRow) -> TransactionRow {
    TransactionRow {
        date: coerce(row.date, parse_timestamp),
        description: row.description,
        amount: coerce(row.amount, parse_amount),
    }
}

fn coerce<T>(cell: Cell<T>, parse: fn(&str) -> Option<T>) -> Cell<T> {
    match cell {
        Cell::Raw(raw) => parse(&raw).map_or(Cell::Missing, Cell::Value),
        typed => typed,
    }
}

/// Lenient timestamp parsing. Date-only inputs land on midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Plain numeric parsing; currency symbols and separators are not stripped.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::extract::read_table;

    fn raw_row(date: &str, description: &str, amount: &str) -> TransactionRow {
        TransactionRow {
            date: Cell::Raw(date.into()),
            description: description.into(),
            amount: Cell::Raw(amount.into()),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_rent_and_coffee_scenario() {
        let table = read_table(
            b"Date,Description,Amount\n2024-01-05,Rent,1200\nbad,Coffee,n/a\n",
        )
        .unwrap();
        let normalized = normalize(table);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized.rows[0].date, Cell::Value(ymd(2024, 1, 5)));
        assert_eq!(normalized.rows[0].amount, Cell::Value(1200.0));
        assert_eq!(normalized.rows[1].description, "Coffee");
        assert!(normalized.rows[1].date.is_missing());
        assert!(normalized.rows[1].amount.is_missing());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = Table {
            rows: vec![
                raw_row("2024-03-01", "Salary", "2500.00"),
                raw_row("", "Blank", ""),
                raw_row("03/15/2024", "Groceries", "-82.17"),
                raw_row("yesterday", "Gift", "$20"),
                TransactionRow {
                    date: Cell::Missing,
                    description: "already missing".into(),
                    amount: Cell::Value(7.0),
                },
            ],
        };

        let once = normalize(table);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unparseable_amounts_become_missing_without_dropping_rows() {
        let inputs = ["n/a", "", "$1,200", "1,200", "twelve", "NaN", "12..5"];
        let table = Table {
            rows: inputs.iter().map(|a| raw_row("2024-01-01", "x", a)).collect(),
        };

        let normalized = normalize(table);
        assert_eq!(normalized.len(), inputs.len());
        assert!(normalized.rows.iter().all(|r| r.amount.is_missing()));
        assert!(normalized.rows.iter().all(|r| r.date.value().is_some()));
    }

    #[test]
    fn test_amount_parsing_accepts_plain_numbers() {
        assert_eq!(parse_amount("1200"), Some(1200.0));
        assert_eq!(parse_amount(" -45.60 "), Some(-45.6));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_timestamp("2024/01/05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_timestamp("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_timestamp("05 Jan 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_timestamp("Jan 05, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(
            parse_timestamp("2024-01-05 13:45:00"),
            ymd(2024, 1, 5).date().and_hms_opt(13, 45, 0)
        );
        assert_eq!(
            parse_timestamp("2024-01-05T13:45:00Z"),
            ymd(2024, 1, 5).date().and_hms_opt(13, 45, 0)
        );
        assert_eq!(parse_timestamp("bad"), None);
        assert_eq!(parse_timestamp("2024-02-30"), None);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let table = Table {
            rows: vec![
                raw_row("2024-01-03", "c", "3"),
                raw_row("2024-01-01", "a", "1"),
                raw_row("2024-01-02", "b", "2"),
            ],
        };
        let order: Vec<_> = normalize(table)
            .rows
            .into_iter()
            .map(|r| r.description)
            .collect();
        assert_eq!(order, ["c", "a", "b"]);
    }
}
