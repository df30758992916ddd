//! Core ledger processing and business logic

pub mod error;
pub mod key;
pub mod models;
pub mod payer;
pub mod reports;
pub mod store;
pub mod time;
pub mod types;
pub mod validate;

use std::sync::Arc;

use ledgerweb_config::Config;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity, StoreError};
pub use key::{KeyDeriver, KeyPath};
pub use models::{Entry, NewEntry, StoredEntry};
pub use payer::{PayerRegistry, NO_PAYER};
pub use reports::{EntryView, InputForm, InputLine, MonthlyListing, PayerChoice, PayerMonthly, YearlySummary};
pub use store::{EntryOrder, EntryQuery, LedgerStore, MemoryStore, StoreRef};
pub use time::LedgerClock;
pub use types::{EntryId, EntryKind, PayerCode};
pub use validate::{validate_batch, validate_row, RawRow, RowOutcome};

/// Outcome of a form submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Every non-blank row was stored
    Accepted { inserted: Vec<EntryId> },
    /// At least one row failed; nothing was stored
    Rejected(InputForm),
}

/// Ledger service shared by all handlers
pub struct Ledger {
    store: StoreRef,
    keys: KeyDeriver,
    payers: Arc<PayerRegistry>,
    clock: LedgerClock,
    start_year: i32,
    input_lines: usize,
    error_logger: Arc<dyn ErrorLogger>,
}

impl Ledger {
    /// Create a ledger over `store` using the ledger and payer sections of `config`
    pub fn from_config(config: &Config, store: StoreRef) -> Self {
        Self {
            store,
            keys: KeyDeriver::new(config.ledger.name.clone()),
            payers: Arc::new(PayerRegistry::from_config(&config.payers)),
            clock: LedgerClock::new(config.ledger.utc_offset_hours),
            start_year: config.ledger.start_year,
            input_lines: config.ledger.input_lines,
            error_logger: Arc::new(DefaultErrorLogger),
        }
    }

    pub fn with_clock(mut self, clock: LedgerClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.error_logger = logger;
        self
    }

    pub fn payers(&self) -> &PayerRegistry {
        &self.payers
    }

    pub fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    pub fn clock(&self) -> &LedgerClock {
        &self.clock
    }

    pub fn input_lines(&self) -> usize {
        self.input_lines
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Empty input form for `kind`
    pub fn blank_form(&self, kind: EntryKind) -> InputForm {
        InputForm::blank(kind, self.input_lines, &self.payers)
    }

    /// Validate a submitted form and store it when every row passes
    pub async fn submit(&self, kind: EntryKind, rows: &[RawRow]) -> CoreResult<Submission> {
        let validation = validate_batch(kind, rows, self.input_lines, &self.payers);
        if validation.has_any_error {
            log::debug!(
                "Rejected {} submission: {} of {} lines invalid",
                kind,
                validation.has_error.iter().filter(|e| **e).count(),
                validation.has_error.len()
            );
            let form = InputForm::echo(kind, rows, &validation, &self.payers);
            return Ok(Submission::Rejected(form));
        }

        let records = validation.records;
        let inserted = self.insert(records).await?;
        Ok(Submission::Accepted { inserted })
    }

    /// Store validated records in one atomic write
    pub async fn insert(&self, records: Vec<NewEntry>) -> CoreResult<Vec<EntryId>> {
        if records.is_empty() {
            log::debug!("Nothing to insert");
            return Ok(Vec::new());
        }

        let mut batch = Vec::with_capacity(records.len());
        for record in records {
            let date = record.date().ok_or_else(|| CoreError::InternalError {
                message: format!(
                    "Record has no calendar date: {}-{}-{}",
                    record.year, record.month, record.day
                ),
            })?;
            let parent = self.keys.month_key(record.year, record.month);
            let day_of_week = self.clock.day_of_week(date);
            batch.push((parent, Entry::from_new(record, day_of_week)));
        }

        let count = batch.len();
        let ids = self
            .store
            .atomic_put(&batch)
            .await
            .map_err(|e| self.report("insert", e, serde_json::json!({ "records": count })))?;
        log::debug!("Inserted {} entries", ids.len());
        Ok(ids)
    }

    /// Entries of one month, newest day first
    pub async fn list_month(&self, year: i32, month: u32) -> CoreResult<MonthlyListing> {
        let query = EntryQuery::under(self.keys.month_key(year, month)).ordered(EntryOrder::DayDescending);
        let found = self.store.query(&query).await.map_err(|e| {
            self.report("list_month", e, serde_json::json!({ "year": year, "month": month }))
        })?;
        log::debug!("Listing {}-{:02}: {} entries", year, month, found.len());

        Ok(MonthlyListing {
            year: year.to_string(),
            month: ledgerweb_utils::pad2(month),
            entries: found
                .iter()
                .map(|stored| EntryView::from_stored(stored, &self.payers))
                .collect(),
        })
    }

    /// Balance, monthly totals and per-payer income for `year`
    pub async fn summarize(&self, year: i32) -> CoreResult<YearlySummary> {
        let query = EntryQuery::under(self.keys.ledger_key()).with_year(year);
        let found = self
            .store
            .query(&query)
            .await
            .map_err(|e| self.report("summarize", e, serde_json::json!({ "year": year })))?;

        let mut summary = YearlySummary::empty(year, self.clock.year_list(self.start_year), &self.payers);
        for stored in &found {
            let entry = &stored.entry;
            let index = match entry.month {
                1..=12 => (entry.month - 1) as usize,
                month => {
                    log::warn!("Skipping entry {} with month {} in {} summary", stored.id, month, year);
                    continue;
                }
            };
            if tally(&mut summary, index, entry).is_none() {
                let error = CoreError::InternalError {
                    message: format!("Totals for {} exceed the representable range", year),
                };
                let context = ErrorContext::new("summarize")
                    .with_data("request", serde_json::json!({ "year": year, "entry": stored.id.to_string() }));
                self.error_logger.log_error(&error, &context);
                return Err(error);
            }
        }
        log::debug!("Summarized {} entries for {}", found.len(), year);
        Ok(summary)
    }

    /// Remove the entry `id` filed under (year, month)
    pub async fn delete(&self, id: EntryId, year: i32, month: u32) -> CoreResult<()> {
        let key = self.keys.entry_key(id, year, month);
        self.store.delete(&key).await.map_err(|e| {
            self.report("delete", e, serde_json::json!({ "key": key.to_string() }))
        })?;
        log::debug!("Deleted {}", key);
        Ok(())
    }

    fn report(&self, operation: &str, error: StoreError, data: serde_json::Value) -> CoreError {
        let error = CoreError::from(error);
        let context = ErrorContext::new(operation).with_data("request", data);
        self.error_logger.log_error(&error, &context);
        error
    }
}

/// Add one entry to the running totals; `None` on overflow
fn tally(summary: &mut YearlySummary, index: usize, entry: &Entry) -> Option<()> {
    summary.total_budget = summary.total_budget.checked_add(entry.signed_price())?;
    match entry.kind {
        EntryKind::Income => {
            summary.total_income = summary.total_income.checked_add(entry.price)?;
            summary.sum_of_month[index] = summary.sum_of_month[index].checked_add(entry.price)?;
            if let Some(payer) = summary.payer_summary.get_mut(&entry.payer) {
                payer.months[index] = payer.months[index].checked_add(entry.price)?;
            }
        }
        EntryKind::Expense => {
            summary.total_expense = summary.total_expense.checked_add(entry.price)?;
            summary.expense_of_month[index] = summary.expense_of_month[index].checked_add(entry.price)?;
        }
    }
    Some(())
}
