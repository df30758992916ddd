//! Hierarchical entry keys: ledger → year → month → entry
//!
//! Keys carry no data of their own. They exist so that every entry of a given
//! (year, month) lands under the same parent, which is what the stores scope
//! their queries by.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::EntryId;

pub const LEDGER_KIND: &str = "Ledger";
pub const YEAR_KIND: &str = "LedgerYear";
pub const MONTH_KIND: &str = "LedgerMonth";
pub const ENTRY_KIND: &str = "LedgerEntry";

/// Identifier of one key level
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyId {
    Name(String),
    Int(i64),
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyId::Name(name) => write!(f, "{}", name),
            KeyId::Int(id) => write!(f, "{}", id),
        }
    }
}

/// One level of a key path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeySegment {
    pub kind: String,
    pub id: KeyId,
}

impl KeySegment {
    fn named(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: KeyId::Name(name.to_string()),
        }
    }

    fn int(kind: &str, id: i64) -> Self {
        Self {
            kind: kind.to_string(),
            id: KeyId::Int(id),
        }
    }
}

/// Ordered list of segments from the ledger root down
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPath(Vec<KeySegment>);

impl KeyPath {
    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Append a child segment
    pub fn child(&self, kind: &str, id: KeyId) -> KeyPath {
        let mut segments = self.0.clone();
        segments.push(KeySegment { kind: kind.to_string(), id });
        KeyPath(segments)
    }

    /// Drop the last segment
    pub fn parent(&self) -> Option<KeyPath> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(KeyPath(self.0[..self.0.len() - 1].to_vec()))
    }

    /// True when `self` equals `other` or lies above it
    pub fn is_prefix_of(&self, other: &KeyPath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Integer id of the final segment, as used for entry keys
    pub fn entry_id(&self) -> Option<EntryId> {
        match self.0.last() {
            Some(KeySegment { kind, id: KeyId::Int(id) }) if kind == ENTRY_KIND => Some(EntryId(*id)),
            _ => None,
        }
    }

    /// Parse the textual form produced by `Display`
    pub fn parse(text: &str) -> Result<KeyPath, StoreError> {
        let invalid = || StoreError::InvalidKey { key: text.to_string() };
        let mut segments = Vec::new();
        for part in text.split('/') {
            let (kind, id) = part.split_once(':').ok_or_else(invalid)?;
            if kind.is_empty() {
                return Err(invalid());
            }
            // Only the root carries a name
            let id = if segments.is_empty() {
                KeyId::Name(id.to_string())
            } else {
                KeyId::Int(id.parse().map_err(|_| invalid())?)
            };
            segments.push(KeySegment { kind: kind.to_string(), id });
        }
        if segments.is_empty() {
            return Err(invalid());
        }
        Ok(KeyPath(segments))
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}:{}", segment.kind, segment.id)?;
        }
        Ok(())
    }
}

/// Derives key paths for the single ledger of this deployment
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    ledger: String,
}

impl KeyDeriver {
    pub fn new(ledger: impl Into<String>) -> Self {
        Self { ledger: ledger.into() }
    }

    pub fn ledger_name(&self) -> &str {
        &self.ledger
    }

    pub fn ledger_key(&self) -> KeyPath {
        KeyPath(vec![KeySegment::named(LEDGER_KIND, &self.ledger)])
    }

    pub fn year_key(&self, year: i32) -> KeyPath {
        let mut path = self.ledger_key();
        path.0.push(KeySegment::int(YEAR_KIND, i64::from(year)));
        path
    }

    /// Any integer year/month is accepted; dates are checked by the validator
    pub fn month_key(&self, year: i32, month: u32) -> KeyPath {
        let mut path = self.year_key(year);
        path.0.push(KeySegment::int(MONTH_KIND, i64::from(month)));
        path
    }

    pub fn entry_key(&self, id: EntryId, year: i32, month: u32) -> KeyPath {
        self.month_key(year, month).child(ENTRY_KIND, KeyId::Int(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_is_deterministic() {
        let keys = KeyDeriver::new("household");
        assert_eq!(keys.month_key(2024, 3), keys.month_key(2024, 3));
        assert_ne!(keys.month_key(2024, 3), keys.month_key(2024, 4));
        assert_ne!(keys.month_key(2024, 3), KeyDeriver::new("other").month_key(2024, 3));
    }

    #[test]
    fn test_month_key_accepts_any_month() {
        let keys = KeyDeriver::new("household");
        assert_eq!(keys.month_key(2024, 13).depth(), 3);
        assert_eq!(keys.month_key(-1, 0).to_string(), "Ledger:household/LedgerYear:-1/LedgerMonth:0");
    }

    #[test]
    fn test_hierarchy_prefixes() {
        let keys = KeyDeriver::new("household");
        let entry = keys.entry_key(EntryId(5), 2024, 3);
        assert!(keys.ledger_key().is_prefix_of(&entry));
        assert!(keys.year_key(2024).is_prefix_of(&entry));
        assert!(keys.month_key(2024, 3).is_prefix_of(&entry));
        assert!(!keys.month_key(2024, 4).is_prefix_of(&entry));
        assert!(!keys.year_key(2023).is_prefix_of(&entry));
        assert_eq!(entry.parent(), Some(keys.month_key(2024, 3)));
        assert_eq!(entry.entry_id(), Some(EntryId(5)));
        assert_eq!(keys.month_key(2024, 3).entry_id(), None);
    }

    #[test]
    fn test_display_and_parse() {
        let keys = KeyDeriver::new("household");
        let entry = keys.entry_key(EntryId(12), 2024, 3);
        let text = entry.to_string();
        assert_eq!(text, "Ledger:household/LedgerYear:2024/LedgerMonth:3/LedgerEntry:12");
        assert_eq!(KeyPath::parse(&text).unwrap(), entry);
        assert!(KeyPath::parse("Ledger:household/LedgerYear:abc").is_err());
        assert!(KeyPath::parse("garbage").is_err());
    }
}
