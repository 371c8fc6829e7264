//! Input and output formats of the `faucet-ledger` binary.

pub mod csv;
pub mod events;
