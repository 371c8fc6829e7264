//! Application layer containing the faucet's business logic orchestration.
//!
//! This module defines the `FaucetService`, which owns the storage, transfer,
//! and clock ports and serialises every ledger operation through a single
//! critical section.

pub mod faucet;
