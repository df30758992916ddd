//! Payer registry
//!
//! Built once from configuration and shared read-only through an `Arc`.

use std::collections::BTreeMap;

use ledgerweb_config::PayerConfig;
use serde::{Deserialize, Serialize};

use crate::types::PayerCode;

pub use ledgerweb_config::NO_PAYER;

/// Display name and summary flag of one payer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    pub summary_eligible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayerRegistry {
    payers: BTreeMap<PayerCode, Payer>,
}

impl PayerRegistry {
    /// Build from configuration rows; later duplicates replace earlier ones
    pub fn from_config(rows: &[PayerConfig]) -> Self {
        let payers = rows
            .iter()
            .map(|row| {
                (
                    row.code,
                    Payer {
                        name: row.name.clone(),
                        // "no payer" is never broken out
                        summary_eligible: row.summary && row.code != NO_PAYER,
                    },
                )
            })
            .collect();
        Self { payers }
    }

    pub fn get(&self, code: PayerCode) -> Option<&Payer> {
        self.payers.get(&code)
    }

    pub fn contains(&self, code: PayerCode) -> bool {
        self.payers.contains_key(&code)
    }

    /// Display name, or "" for unknown codes
    pub fn name(&self, code: PayerCode) -> &str {
        self.payers.get(&code).map(|p| p.name.as_str()).unwrap_or("")
    }

    /// All payers in code order
    pub fn iter(&self) -> impl Iterator<Item = (PayerCode, &Payer)> {
        self.payers.iter().map(|(code, payer)| (*code, payer))
    }

    /// Payers whose income is broken out in the yearly summary
    pub fn summary_eligible(&self) -> impl Iterator<Item = (PayerCode, &Payer)> {
        self.iter().filter(|(_, payer)| payer.summary_eligible)
    }

    pub fn len(&self) -> usize {
        self.payers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payers.is_empty()
    }
}
