//! Status history entries
//!
//! Append-only audit records. `previous_status` is `None` only for the
//! creation entry; `changed_by` is `None` when the acting user was later
//! removed. Entries are chained with sha-256 links so tampering is
//! detectable; the ledger in the engine crate owns the chain discipline.

use crate::ids::{ContractId, EntryId, UserId};
use crate::status::ContractStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub entry_id: EntryId,
    pub contract_id: ContractId,
    pub previous_status: Option<ContractStatus>,
    pub new_status: ContractStatus,
    pub changed_by: Option<UserId>,
    pub recorded_at: DateTime<Utc>,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}
