//! Row validation for the income and expense input forms
//!
//! Each row is classified independently as blank, valid or invalid. The
//! rules run in a fixed order and the first failing one decides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::NewEntry;
use crate::payer::{PayerRegistry, NO_PAYER};
use crate::types::{EntryKind, PayerCode};

/// One submitted form row, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    /// Absent on the expense form
    pub payer: Option<String>,
    pub detail: String,
    pub price: String,
}

impl RawRow {
    pub fn expense(date: &str, detail: &str, price: &str) -> Self {
        Self {
            date: date.to_string(),
            payer: None,
            detail: detail.to_string(),
            price: price.to_string(),
        }
    }

    pub fn income(date: &str, payer: &str, detail: &str, price: &str) -> Self {
        Self {
            payer: Some(payer.to_string()),
            ..Self::expense(date, detail, price)
        }
    }

    /// Payer field is missing, empty, or the "no payer" code
    fn payer_is_none(&self) -> bool {
        match self.payer.as_deref() {
            None | Some("") => true,
            Some(text) => text.parse::<PayerCode>() == Ok(NO_PAYER),
        }
    }
}

/// Classification of a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Nothing entered; skipped without error
    Blank,
    Valid(NewEntry),
    Invalid,
}

/// Classify one row for `kind`
pub fn validate_row(kind: EntryKind, row: &RawRow, payers: &PayerRegistry) -> RowOutcome {
    let is_income = kind == EntryKind::Income;

    // Presence
    if row.date.is_empty() {
        let rest_empty = row.detail.is_empty() && row.price.is_empty();
        let payer_ok = !is_income || row.payer_is_none();
        return if rest_empty && payer_ok {
            RowOutcome::Blank
        } else {
            RowOutcome::Invalid
        };
    }
    if row.price.is_empty() || (is_income && row.payer_is_none()) {
        return RowOutcome::Invalid;
    }

    let (year, month, day) = match parse_date(&row.date) {
        Some(date) => date,
        None => return RowOutcome::Invalid,
    };

    let payer = if is_income {
        match row.payer.as_deref().and_then(|p| p.parse::<PayerCode>().ok()) {
            Some(code) if payers.contains(code) => code,
            _ => return RowOutcome::Invalid,
        }
    } else {
        NO_PAYER
    };

    let price = match row.price.parse::<i64>() {
        Ok(price) if price >= 0 => price,
        _ => return RowOutcome::Invalid,
    };

    RowOutcome::Valid(NewEntry {
        year,
        month,
        day,
        payer,
        kind,
        price,
        detail: row.detail.clone(),
    })
}

/// Parse `YYYY-MM-DD` into components of an existing calendar date
pub fn parse_date(text: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let widths = [4, 2, 2];
    for (part, width) in parts.iter().zip(widths) {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some((year, month, day))
}

/// Result of validating a whole submission
#[derive(Debug, Clone, PartialEq)]
pub struct BatchValidation {
    /// Valid rows in form order; blank rows are not included
    pub records: Vec<NewEntry>,
    /// One flag per form line
    pub has_error: Vec<bool>,
    pub has_any_error: bool,
}

/// Validate exactly `lines` rows; missing rows count as blank, extra rows are ignored
pub fn validate_batch(
    kind: EntryKind,
    rows: &[RawRow],
    lines: usize,
    payers: &PayerRegistry,
) -> BatchValidation {
    let blank = RawRow::default();
    let mut records = Vec::new();
    let mut has_error = Vec::with_capacity(lines);

    for i in 0..lines {
        let row = rows.get(i).unwrap_or(&blank);
        match validate_row(kind, row, payers) {
            RowOutcome::Valid(record) => {
                records.push(record);
                has_error.push(false);
            }
            RowOutcome::Blank => has_error.push(false),
            RowOutcome::Invalid => has_error.push(true),
        }
    }

    let has_any_error = has_error.iter().any(|e| *e);
    BatchValidation {
        records,
        has_error,
        has_any_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerweb_config::PayerConfig;

    fn payers() -> PayerRegistry {
        PayerRegistry::from_config(&[
            PayerConfig { code: 0, name: String::new(), summary: false },
            PayerConfig { code: 1, name: "Aoki".to_string(), summary: true },
            PayerConfig { code: 99, name: "Other".to_string(), summary: false },
        ])
    }

    fn income(date: &str, payer: &str, detail: &str, price: &str) -> RowOutcome {
        validate_row(EntryKind::Income, &RawRow::income(date, payer, detail, price), &payers())
    }

    fn expense(date: &str, detail: &str, price: &str) -> RowOutcome {
        validate_row(EntryKind::Expense, &RawRow::expense(date, detail, price), &payers())
    }

    #[test]
    fn test_blank_rows() {
        assert_eq!(expense("", "", ""), RowOutcome::Blank);
        assert_eq!(income("", "0", "", ""), RowOutcome::Blank);
        assert_eq!(income("", "", "", ""), RowOutcome::Blank);
        assert_eq!(validate_row(EntryKind::Expense, &RawRow::default(), &payers()), RowOutcome::Blank);
    }

    #[test]
    fn test_empty_date_with_other_fields() {
        assert_eq!(expense("", "lunch", ""), RowOutcome::Invalid);
        assert_eq!(expense("", "", "100"), RowOutcome::Invalid);
        assert_eq!(income("", "1", "", ""), RowOutcome::Invalid);
        assert_eq!(income("", "0", "salary", ""), RowOutcome::Invalid);
    }

    #[test]
    fn test_missing_price_or_payer() {
        assert_eq!(expense("2024-03-01", "lunch", ""), RowOutcome::Invalid);
        assert_eq!(income("2024-03-01", "1", "", ""), RowOutcome::Invalid);
        assert_eq!(income("2024-03-01", "0", "", "100"), RowOutcome::Invalid);
        assert_eq!(income("2024-03-01", "", "", "100"), RowOutcome::Invalid);
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(expense("2021-02-30", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024-04-31", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024-13-01", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024/03/01", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024-03", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024-03-01-02", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("2024-3-1", "", "100"), RowOutcome::Invalid);
        assert_eq!(expense("yyyy-mm-dd", "", "100"), RowOutcome::Invalid);
        assert!(matches!(expense("2024-02-29", "", "100"), RowOutcome::Valid(_)));
    }

    #[test]
    fn test_unknown_payer() {
        assert_eq!(income("2024-03-01", "5", "", "100"), RowOutcome::Invalid);
        assert_eq!(income("2024-03-01", "abc", "", "100"), RowOutcome::Invalid);
        assert!(matches!(income("2024-03-01", "99", "", "100"), RowOutcome::Valid(_)));
    }

    #[test]
    fn test_prices() {
        assert_eq!(expense("2024-03-01", "", "-1"), RowOutcome::Invalid);
        assert_eq!(expense("2024-03-01", "", "12.5"), RowOutcome::Invalid);
        assert_eq!(expense("2024-03-01", "", "ten"), RowOutcome::Invalid);
        match expense("2024-03-01", "", "0") {
            RowOutcome::Valid(record) => assert_eq!(record.price, 0),
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_payer_with_valid_date() {
        assert_eq!(income("2024-02-28", "x1", "", "100"), RowOutcome::Invalid);
        assert_eq!(income("2024-02-30", "1", "", "100"), RowOutcome::Invalid);
    }

    #[test]
    fn test_valid_income_record() {
        let outcome = income("2024-01-10", "1", "<b>salary</b>", "5000");
        assert_eq!(
            outcome,
            RowOutcome::Valid(NewEntry {
                year: 2024,
                month: 1,
                day: 10,
                payer: 1,
                kind: EntryKind::Income,
                price: 5000,
                detail: "<b>salary</b>".to_string(),
            })
        );
    }

    #[test]
    fn test_expense_ignores_payer() {
        let row = RawRow::income("2024-01-15", "7", "food", "2000");
        match validate_row(EntryKind::Expense, &row, &payers()) {
            RowOutcome::Valid(record) => {
                assert_eq!(record.payer, NO_PAYER);
                assert_eq!(record.kind, EntryKind::Expense);
            }
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_rejects_on_any_error() {
        let rows = vec![
            RawRow::income("", "0", "", ""),
            RawRow::income("2024-03-01", "1", "", ""),
            RawRow::income("2024-03-02", "1", "", "100"),
        ];
        let result = validate_batch(EntryKind::Income, &rows, 3, &payers());
        assert!(result.has_any_error);
        assert_eq!(result.has_error, vec![false, true, false]);
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_batch_skips_blank_rows() {
        let rows = vec![
            RawRow::expense("", "", ""),
            RawRow::expense("2024-03-05", "a", "100"),
            RawRow::expense("", "", ""),
            RawRow::expense("2024-03-07", "b", "200"),
        ];
        let result = validate_batch(EntryKind::Expense, &rows, 4, &payers());
        assert!(!result.has_any_error);
        let records = result.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].day, 5);
        assert_eq!(records[1].day, 7);
    }

    #[test]
    fn test_batch_pads_and_truncates_to_lines() {
        let rows = vec![RawRow::expense("2024-03-05", "", "100")];
        let result = validate_batch(EntryKind::Expense, &rows, 3, &payers());
        assert_eq!(result.has_error, vec![false, false, false]);
        assert_eq!(result.records.len(), 1);

        let rows = vec![
            RawRow::expense("", "", ""),
            RawRow::expense("bad", "", "1"),
        ];
        let result = validate_batch(EntryKind::Expense, &rows, 1, &payers());
        assert!(!result.has_any_error);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-09"), Some((2024, 3, 9)));
        assert_eq!(parse_date("2021-02-30"), None);
        assert_eq!(parse_date("+024-03-09"), None);
    }
}
