use super::address::Address;
use super::value::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Fund,
    Update,
    Request,
}

/// A single call against the ledger, as replayed from an operations file.
///
/// `amount` is denominated in ether. `at` is the chain time of the call; when
/// absent the chain time is left where the previous call put it.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub r#type: OperationType,
    pub caller: Address,
    pub amount: Option<Decimal>,
    pub at: Option<Timestamp>,
}
