//! View models built on every read, plus the input form echo

use std::collections::BTreeMap;

use ledgerweb_utils::pad2;
use serde::{Deserialize, Serialize};

use super::models::StoredEntry;
use super::payer::{PayerRegistry, NO_PAYER};
use super::time::weekday_label;
use super::types::{EntryKind, PayerCode};
use super::validate::{BatchValidation, RawRow};

/// One row of the monthly listing, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub day_of_week: String,
    pub kind: String,
    pub payer: String,
    pub payer_index: PayerCode,
    pub detail: String,
    pub price: String,
}

impl EntryView {
    pub fn from_stored(stored: &StoredEntry, payers: &PayerRegistry) -> Self {
        let entry = &stored.entry;
        Self {
            id: stored.id.to_string(),
            year: entry.year.to_string(),
            month: pad2(entry.month),
            day: pad2(entry.day),
            day_of_week: weekday_label(entry.day_of_week).to_string(),
            kind: entry.kind.label().to_string(),
            payer: payers.name(entry.payer).to_string(),
            payer_index: entry.payer,
            detail: entry.detail.clone(),
            price: entry.price.to_string(),
        }
    }
}

/// Entries of one (year, month), day descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyListing {
    pub year: String,
    pub month: String,
    pub entries: Vec<EntryView>,
}

/// Income of one summary-eligible payer per month index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerMonthly {
    pub name: String,
    pub months: [i64; 12],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    /// Selectable years, newest first
    pub year_list: Vec<i32>,
    /// Income minus expense over the year
    pub total_budget: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub sum_of_month: [i64; 12],
    pub expense_of_month: [i64; 12],
    pub payer_summary: BTreeMap<PayerCode, PayerMonthly>,
}

impl YearlySummary {
    /// Zeroed summary with one row per summary-eligible payer
    pub fn empty(year: i32, year_list: Vec<i32>, payers: &PayerRegistry) -> Self {
        let payer_summary = payers
            .summary_eligible()
            .map(|(code, payer)| {
                (
                    code,
                    PayerMonthly {
                        name: payer.name.clone(),
                        months: [0; 12],
                    },
                )
            })
            .collect();
        Self {
            year,
            year_list,
            total_budget: 0,
            total_income: 0,
            total_expense: 0,
            sum_of_month: [0; 12],
            expense_of_month: [0; 12],
            payer_summary,
        }
    }
}

/// Selectable payer on the income form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerChoice {
    pub code: PayerCode,
    pub name: String,
}

/// One line of the input form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputLine {
    /// 1-based line number
    pub number: usize,
    pub date: String,
    pub payer: PayerCode,
    pub detail: String,
    pub price: String,
    pub has_error: bool,
}

/// Model for the income and expense input views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputForm {
    pub kind: EntryKind,
    /// Empty on the expense form
    pub payer_list: Vec<PayerChoice>,
    pub lines: Vec<InputLine>,
    pub has_any_error: bool,
}

impl InputForm {
    /// Empty form with `lines` rows
    pub fn blank(kind: EntryKind, lines: usize, payers: &PayerRegistry) -> Self {
        Self {
            kind,
            payer_list: payer_choices(kind, payers),
            lines: (1..=lines)
                .map(|number| InputLine { number, ..InputLine::default() })
                .collect(),
            has_any_error: false,
        }
    }

    /// Re-display submitted rows with the flags of a failed validation
    ///
    /// Payer text that is not an integer is shown as "no payer".
    pub fn echo(
        kind: EntryKind,
        rows: &[RawRow],
        validation: &BatchValidation,
        payers: &PayerRegistry,
    ) -> Self {
        let blank = RawRow::default();
        let lines = validation
            .has_error
            .iter()
            .enumerate()
            .map(|(i, has_error)| {
                let row = rows.get(i).unwrap_or(&blank);
                InputLine {
                    number: i + 1,
                    date: row.date.clone(),
                    payer: row
                        .payer
                        .as_deref()
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(NO_PAYER),
                    detail: row.detail.clone(),
                    price: row.price.clone(),
                    has_error: *has_error,
                }
            })
            .collect();
        Self {
            kind,
            payer_list: payer_choices(kind, payers),
            lines,
            has_any_error: validation.has_any_error,
        }
    }
}

fn payer_choices(kind: EntryKind, payers: &PayerRegistry) -> Vec<PayerChoice> {
    match kind {
        EntryKind::Income => payers
            .iter()
            .map(|(code, payer)| PayerChoice {
                code,
                name: payer.name.clone(),
            })
            .collect(),
        EntryKind::Expense => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entry;
    use crate::types::EntryId;
    use crate::validate::validate_batch;
    use ledgerweb_config::Config;

    fn payers() -> PayerRegistry {
        PayerRegistry::from_config(&Config::default().payers)
    }

    #[test]
    fn test_entry_view_formatting() {
        let stored = StoredEntry {
            id: EntryId(42),
            entry: Entry {
                day: 5,
                month: 3,
                year: 2024,
                day_of_week: 2,
                payer: 1,
                kind: EntryKind::Income,
                price: 5000,
                detail: "salary".to_string(),
            },
        };
        let view = EntryView::from_stored(&stored, &payers());
        assert_eq!(view.id, "42");
        assert_eq!(view.month, "03");
        assert_eq!(view.day, "05");
        assert_eq!(view.day_of_week, "(火)");
        assert_eq!(view.kind, "収入");
        assert_eq!(view.payer, "江添");
        assert_eq!(view.price, "5000");
    }

    #[test]
    fn test_entry_view_unknown_payer_and_weekday() {
        let stored = StoredEntry {
            id: EntryId(1),
            entry: Entry {
                day: 12,
                month: 11,
                year: 2024,
                day_of_week: 9,
                payer: 55,
                kind: EntryKind::Expense,
                price: 0,
                detail: String::new(),
            },
        };
        let view = EntryView::from_stored(&stored, &payers());
        assert_eq!(view.payer, "");
        assert_eq!(view.payer_index, 55);
        assert_eq!(view.day_of_week, "");
        assert_eq!(view.kind, "支出");
    }

    #[test]
    fn test_empty_summary_has_eligible_payers() {
        let summary = YearlySummary::empty(2024, vec![2024], &payers());
        assert_eq!(summary.payer_summary.len(), 10);
        assert!(!summary.payer_summary.contains_key(&0));
        assert!(!summary.payer_summary.contains_key(&99));
        assert_eq!(summary.total_income, 0);
    }

    #[test]
    fn test_blank_forms() {
        let income = InputForm::blank(EntryKind::Income, 15, &payers());
        assert_eq!(income.lines.len(), 15);
        assert_eq!(income.lines[14].number, 15);
        assert_eq!(income.payer_list.len(), 12);
        assert_eq!(income.payer_list[0].code, 0);

        let expense = InputForm::blank(EntryKind::Expense, 3, &payers());
        assert!(expense.payer_list.is_empty());
        assert!(!expense.has_any_error);
    }

    #[test]
    fn test_echo_keeps_input_and_flags() {
        let rows = vec![
            RawRow::income("2024-03-01", "x", "<i>a</i>", "100"),
            RawRow::income("2024-03-02", "1", "b", "200"),
        ];
        let registry = payers();
        let validation = validate_batch(EntryKind::Income, &rows, 3, &registry);
        let form = InputForm::echo(EntryKind::Income, &rows, &validation, &registry);

        assert!(form.has_any_error);
        assert_eq!(form.lines.len(), 3);
        assert_eq!(form.lines[0].payer, NO_PAYER);
        assert_eq!(form.lines[0].detail, "<i>a</i>");
        assert!(form.lines[0].has_error);
        assert_eq!(form.lines[1].payer, 1);
        assert!(!form.lines[1].has_error);
        assert_eq!(form.lines[2], InputLine { number: 3, ..InputLine::default() });
    }
}
