use super::address::Address;
use super::event::EventRecord;
use super::ledger::{Ledger, RequestRecord};
use super::value::{Timestamp, Wei};
use crate::error::Result;
use async_trait::async_trait;

/// One change inside a [`LedgerStore::write`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    PutLedger(Ledger),
    PutRequest(RequestRecord),
    DeleteRequest(Address),
    AppendEvent(EventRecord),
    DeleteEvent(u64),
}

/// Persistence of the ledger, its per-requester records, and its event log.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_ledger(&self) -> Result<Option<Ledger>>;
    async fn get_request(&self, requester: &Address) -> Result<Option<RequestRecord>>;
    async fn all_requests(&self) -> Result<Vec<RequestRecord>>;
    async fn events(&self) -> Result<Vec<EventRecord>>;
    /// Number of events in the log, which is also the next sequence number.
    async fn event_count(&self) -> Result<u64>;
    /// Applies every op of `batch` in order as one unit: all become visible
    /// or none do.
    async fn write(&self, batch: Vec<StoreOp>) -> Result<()>;
}

/// Moves value out of the ledger to a recipient.
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Fails with [`crate::error::FaucetError::TransferFailed`] when the
    /// recipient cannot receive value.
    async fn transfer(&self, to: &Address, amount: Wei) -> Result<()>;
}

/// Source of chain time.
pub trait ChainClock: Send + Sync {
    fn now(&self) -> Timestamp;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type ValueTransferBox = Box<dyn ValueTransfer>;
pub type ChainClockBox = Box<dyn ChainClock>;
pub type LedgerStoreFactory = Box<dyn Fn() -> LedgerStoreBox + Send + Sync>;
