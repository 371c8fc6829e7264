//! Domain layer: value types, the ledger state machine, events, and the ports
//! through which the application reaches storage, transfers, and chain time.

pub mod address;
pub mod event;
pub mod ledger;
pub mod operation;
pub mod ports;
pub mod value;
