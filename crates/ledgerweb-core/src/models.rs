//! Core data models for the ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{EntryId, EntryKind, PayerCode};

/// A validated row, ready to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Registry code; always 0 for expenses
    pub payer: PayerCode,
    pub kind: EntryKind,
    pub price: i64,
    /// Free text copied verbatim from the form
    pub detail: String,
}

impl NewEntry {
    /// Calendar date of the row, if the components form one
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// One persisted ledger line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub payer: PayerCode,
    pub kind: EntryKind,
    pub price: i64,
    pub detail: String,
}

impl Entry {
    pub fn from_new(entry: NewEntry, day_of_week: u32) -> Self {
        Self {
            day: entry.day,
            month: entry.month,
            year: entry.year,
            day_of_week,
            payer: entry.payer,
            kind: entry.kind,
            price: entry.price,
            detail: entry.detail,
        }
    }

    /// Signed contribution to the yearly balance
    pub fn signed_price(&self) -> i64 {
        match self.kind {
            EntryKind::Income => self.price,
            EntryKind::Expense => -self.price,
        }
    }
}

/// An entry together with the identifier its store assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: EntryId,
    pub entry: Entry,
}
