//! Contract lifecycle states
//!
//! The status set is closed. Input parsing is case-insensitive; storage,
//! comparison and display use the canonical upper-case form only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Created,
    Approved,
    Sent,
    Signed,
    Locked,
    Revoked,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        ContractStatus::Created,
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
        ContractStatus::Locked,
        ContractStatus::Revoked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Created => "CREATED",
            ContractStatus::Approved => "APPROVED",
            ContractStatus::Sent => "SENT",
            ContractStatus::Signed => "SIGNED",
            ContractStatus::Locked => "LOCKED",
            ContractStatus::Revoked => "REVOKED",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized contract status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for ContractStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATED" => Ok(ContractStatus::Created),
            "APPROVED" => Ok(ContractStatus::Approved),
            "SENT" => Ok(ContractStatus::Sent),
            "SIGNED" => Ok(ContractStatus::Signed),
            "LOCKED" => Ok(ContractStatus::Locked),
            "REVOKED" => Ok(ContractStatus::Revoked),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case_to_canonical_form() {
        assert_eq!("approved".parse::<ContractStatus>().unwrap(), ContractStatus::Approved);
        assert_eq!("Signed".parse::<ContractStatus>().unwrap(), ContractStatus::Signed);
        assert_eq!("REVOKED".parse::<ContractStatus>().unwrap(), ContractStatus::Revoked);
        assert_eq!(ContractStatus::Approved.to_string(), "APPROVED");
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "SHREDDED".parse::<ContractStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("SHREDDED".to_string()));
    }
}
