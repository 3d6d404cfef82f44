//! Append-only status ledger
//!
//! One ledger per contract. Entries are never updated or deleted; each new
//! entry is chained to the previous one with a sha-256 link so any later
//! tampering breaks verification. The engine appends only from inside the
//! same critical section that writes the status the entry documents, which
//! keeps the chain head equal to the live status at all times.

use crate::error::LedgerError;
use sha2::{Digest, Sha256};
use vellum_model::{EntryId, StatusHistoryEntry};

#[derive(Debug, Clone, Default)]
pub struct StatusLedger {
    entries: Vec<StatusHistoryEntry>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted entries, verifying the chain.
    pub fn from_entries(entries: Vec<StatusHistoryEntry>) -> Result<Self, LedgerError> {
        let ledger = Self { entries };
        ledger.verify_integrity()?;
        Ok(ledger)
    }

    /// Chain and store an entry. The caller provides everything except the
    /// hash links, which are derived from the current chain head here.
    pub fn append(&mut self, mut entry: StatusHistoryEntry) -> EntryId {
        entry.prev_hash = self.entries.last().map(|e| e.hash).unwrap_or([0u8; 32]);
        entry.hash = compute_entry_hash(&entry);
        let entry_id = entry.entry_id;
        self.entries.push(entry);
        entry_id
    }

    pub fn entries(&self) -> &[StatusHistoryEntry] {
        &self.entries
    }

    pub fn head(&self) -> Option<&StatusHistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk the chain and recompute every link.
    pub fn verify_integrity(&self) -> Result<(), LedgerError> {
        let mut prev = [0u8; 32];
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.prev_hash != prev {
                return Err(LedgerError::IntegrityViolation { index });
            }
            if entry.hash != compute_entry_hash(entry) {
                return Err(LedgerError::IntegrityViolation { index });
            }
            prev = entry.hash;
        }
        Ok(())
    }
}

fn compute_entry_hash(entry: &StatusHistoryEntry) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(entry.entry_id.0.as_bytes());
    hasher.update(entry.contract_id.0.as_bytes());
    match entry.previous_status {
        Some(status) => hasher.update(status.as_str().as_bytes()),
        None => hasher.update(b"-"),
    }
    hasher.update([0]);
    hasher.update(entry.new_status.as_str().as_bytes());
    hasher.update([0]);
    match entry.changed_by {
        Some(user) => hasher.update(user.0.as_bytes()),
        None => hasher.update([0u8; 16]),
    }
    hasher.update(entry.recorded_at.timestamp_micros().to_le_bytes());
    hasher.update(entry.prev_hash);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vellum_model::{ContractId, ContractStatus, UserId};

    fn entry(
        contract_id: ContractId,
        previous: Option<ContractStatus>,
        new_status: ContractStatus,
    ) -> StatusHistoryEntry {
        StatusHistoryEntry {
            entry_id: EntryId::new(),
            contract_id,
            previous_status: previous,
            new_status,
            changed_by: Some(UserId::new()),
            recorded_at: Utc::now(),
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        }
    }

    #[test]
    fn verifies_chained_entries() {
        let contract_id = ContractId::new();
        let mut ledger = StatusLedger::new();
        ledger.append(entry(contract_id, None, ContractStatus::Created));
        ledger.append(entry(
            contract_id,
            Some(ContractStatus::Created),
            ContractStatus::Approved,
        ));

        ledger.verify_integrity().unwrap();
        assert_eq!(ledger.head().unwrap().new_status, ContractStatus::Approved);
    }

    #[test]
    fn detects_tampered_entry() {
        let contract_id = ContractId::new();
        let mut ledger = StatusLedger::new();
        ledger.append(entry(contract_id, None, ContractStatus::Created));
        ledger.append(entry(
            contract_id,
            Some(ContractStatus::Created),
            ContractStatus::Revoked,
        ));

        // Tamper outside the append API to exercise detection.
        let mut tampered: Vec<_> = ledger.entries().to_vec();
        tampered[0].new_status = ContractStatus::Approved;

        let err = StatusLedger::from_entries(tampered).unwrap_err();
        assert_eq!(err, LedgerError::IntegrityViolation { index: 0 });
    }

    #[test]
    fn detects_broken_link() {
        let contract_id = ContractId::new();
        let mut ledger = StatusLedger::new();
        ledger.append(entry(contract_id, None, ContractStatus::Created));
        ledger.append(entry(
            contract_id,
            Some(ContractStatus::Created),
            ContractStatus::Approved,
        ));

        let mut entries: Vec<_> = ledger.entries().to_vec();
        entries[1].prev_hash = [7u8; 32];

        assert!(StatusLedger::from_entries(entries).is_err());
    }
}
