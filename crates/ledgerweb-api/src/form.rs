//! Urlencoded form bodies with repeated fields
//!
//! The input forms post one `Date`, `Payer`, `Detail` and `Price` value per
//! line, so every field name maps to a list. A trailing `[]` on the name is
//! ignored.

use std::collections::HashMap;

use ledgerweb_core::{EntryKind, RawRow};

#[derive(Debug, Default)]
pub struct FormFields {
    values: HashMap<String, Vec<String>>,
}

impl FormFields {
    pub fn parse(body: &str) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(key);
            let key = key.strip_suffix("[]").unwrap_or(&key).to_string();
            values.entry(key).or_default().push(decode(value));
        }
        Self { values }
    }

    /// Every value posted under `name`, in body order
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.all(name).first().map(String::as_str)
    }

    /// Rows for an input form; the payer column is read for income only
    pub fn rows(&self, kind: EntryKind) -> Vec<RawRow> {
        let dates = self.all("Date");
        let payers = self.all("Payer");
        let details = self.all("Detail");
        let prices = self.all("Price");

        let mut count = dates.len().max(details.len()).max(prices.len());
        if kind == EntryKind::Income {
            count = count.max(payers.len());
        }

        let cell = |column: &[String], i: usize| column.get(i).cloned().unwrap_or_default();
        (0..count)
            .map(|i| RawRow {
                date: cell(dates, i),
                payer: match kind {
                    EntryKind::Income => payers.get(i).cloned(),
                    EntryKind::Expense => None,
                },
                detail: cell(details, i),
                price: cell(prices, i),
            })
            .collect()
    }
}

fn decode(text: &str) -> String {
    let text = text.replace('+', " ");
    match urlencoding::decode(&text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_fields_keep_order() {
        let form = FormFields::parse("Date%5B%5D=2024-03-01&Date%5B%5D=&Price=100&Price=");
        assert_eq!(form.all("Date"), ["2024-03-01", ""]);
        assert_eq!(form.all("Price"), ["100", ""]);
        assert!(form.all("Detail").is_empty());
    }

    #[test]
    fn test_decoding() {
        let form = FormFields::parse("Detail=%E9%A3%9F%E8%B2%BB+lunch&id=7&flag");
        assert_eq!(form.first("Detail"), Some("食費 lunch"));
        assert_eq!(form.first("id"), Some("7"));
        assert_eq!(form.first("flag"), Some(""));
        assert_eq!(form.first("missing"), None);
    }

    #[test]
    fn test_income_rows() {
        let form = FormFields::parse("Date=2024-01-10&Payer=1&Detail=salary&Price=5000&Date=&Payer=0&Detail=&Price=");
        let rows = form.rows(EntryKind::Income);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::income("2024-01-10", "1", "salary", "5000"));
        assert_eq!(rows[1], RawRow::income("", "0", "", ""));
    }

    #[test]
    fn test_expense_rows_ignore_payer() {
        let form = FormFields::parse("Date=2024-01-15&Payer=4&Price=2000");
        let rows = form.rows(EntryKind::Expense);
        assert_eq!(rows, vec![RawRow::expense("2024-01-15", "", "2000")]);
    }

    #[test]
    fn test_ragged_columns_pad_with_empty() {
        let form = FormFields::parse("Date=2024-01-15&Date=2024-01-16&Price=1");
        let rows = form.rows(EntryKind::Income);
        assert_eq!(rows[1].price, "");
        assert_eq!(rows[1].payer, None);
    }
}
