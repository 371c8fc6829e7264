use super::address::Address;
use super::value::{Timestamp, Wei};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain events emitted by successful ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value")]
pub enum LedgerEvent {
    /// The pool received `amount` wei.
    FundFaucet(Wei),
    /// The owner changed the per-request disbursement.
    UpdateWithdrawValue(Wei),
    /// The requester may ask again at the given chain time.
    NextPossibleRequest(Timestamp),
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::FundFaucet(amount) => write!(f, "FundFaucet({amount})"),
            LedgerEvent::UpdateWithdrawValue(value) => write!(f, "UpdateWithdrawValue({value})"),
            LedgerEvent::NextPossibleRequest(at) => write!(f, "NextPossibleRequest({at})"),
        }
    }
}

/// An emitted event together with the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the ledger's event log, starting at 0.
    pub seq: u64,
    /// Chain time of the emitting call.
    pub at: Timestamp,
    /// Caller of the emitting operation.
    pub caller: Address,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let record = EventRecord {
            seq: 3,
            at: Timestamp::new(1_000),
            caller: Address::ZERO,
            event: LedgerEvent::NextPossibleRequest(Timestamp::new(1_060)),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event"], "NextPossibleRequest");
        assert_eq!(json["value"], 1_060);
        assert_eq!(json["caller"], "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_event_display() {
        assert_eq!(
            LedgerEvent::FundFaucet(Wei::new(1)).to_string(),
            "FundFaucet(1)"
        );
        assert_eq!(
            LedgerEvent::UpdateWithdrawValue(Wei::new(2)).to_string(),
            "UpdateWithdrawValue(2)"
        );
    }
}
