use crate::domain::address::Address;
use crate::domain::event::EventRecord;
use crate::domain::ledger::{Ledger, RequestRecord};
use crate::domain::ports::{LedgerStore, StoreOp};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerState {
    ledger: Option<Ledger>,
    requests: HashMap<Address, RequestRecord>,
    events: Vec<EventRecord>,
}

/// A thread-safe in-memory store for the ledger, its request records, and
/// its event log.
///
/// Everything lives behind a single lock, so a `write` batch is applied as one
/// unit.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_ledger(&self) -> Result<Option<Ledger>> {
        let state = self.state.read().await;
        Ok(state.ledger.clone())
    }

    async fn get_request(&self, requester: &Address) -> Result<Option<RequestRecord>> {
        let state = self.state.read().await;
        Ok(state.requests.get(requester).copied())
    }

    async fn all_requests(&self) -> Result<Vec<RequestRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<RequestRecord> = state.requests.values().copied().collect();
        records.sort_by_key(|r| r.requester);
        Ok(records)
    }

    async fn events(&self) -> Result<Vec<EventRecord>> {
        let state = self.state.read().await;
        Ok(state.events.clone())
    }

    async fn event_count(&self) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.events.len() as u64)
    }

    async fn write(&self, batch: Vec<StoreOp>) -> Result<()> {
        let mut state = self.state.write().await;
        for op in batch {
            match op {
                StoreOp::PutLedger(ledger) => state.ledger = Some(ledger),
                StoreOp::PutRequest(record) => {
                    state.requests.insert(record.requester, record);
                }
                StoreOp::DeleteRequest(requester) => {
                    state.requests.remove(&requester);
                }
                StoreOp::AppendEvent(record) => state.events.push(record),
                StoreOp::DeleteEvent(seq) => state.events.retain(|e| e.seq != seq),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::LedgerEvent;
    use crate::domain::value::{Timestamp, Wei};

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[tokio::test]
    async fn test_in_memory_ledger_store() {
        let store = InMemoryLedgerStore::new();
        assert!(store.get_ledger().await.unwrap().is_none());

        let ledger = Ledger::new(addr(1), Wei::new(10), Wei::new(100));
        store
            .write(vec![StoreOp::PutLedger(ledger.clone())])
            .await
            .unwrap();
        assert_eq!(store.get_ledger().await.unwrap(), Some(ledger));
    }

    #[tokio::test]
    async fn test_in_memory_write_batch() {
        let store = InMemoryLedgerStore::new();
        let mut ledger = Ledger::new(addr(1), Wei::new(10), Wei::new(100));
        ledger.pool_balance = Wei::new(90);
        let record = RequestRecord {
            requester: addr(2),
            last_request_at: Timestamp::new(500),
        };
        let event = EventRecord {
            seq: 0,
            at: Timestamp::new(500),
            caller: addr(2),
            event: LedgerEvent::NextPossibleRequest(Timestamp::new(560)),
        };

        store
            .write(vec![
                StoreOp::PutLedger(ledger.clone()),
                StoreOp::PutRequest(record),
                StoreOp::AppendEvent(event.clone()),
            ])
            .await
            .unwrap();

        assert_eq!(store.get_ledger().await.unwrap(), Some(ledger));
        assert_eq!(store.get_request(&addr(2)).await.unwrap(), Some(record));
        assert!(store.get_request(&addr(3)).await.unwrap().is_none());
        assert_eq!(store.all_requests().await.unwrap(), vec![record]);
        assert_eq!(store.event_count().await.unwrap(), 1);
        assert_eq!(store.events().await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn test_in_memory_deletes() {
        let store = InMemoryLedgerStore::new();
        let record = RequestRecord {
            requester: addr(2),
            last_request_at: Timestamp::new(500),
        };
        let event = EventRecord {
            seq: 0,
            at: Timestamp::new(1),
            caller: addr(1),
            event: LedgerEvent::FundFaucet(Wei::new(5)),
        };
        store
            .write(vec![
                StoreOp::PutRequest(record),
                StoreOp::AppendEvent(event),
            ])
            .await
            .unwrap();

        store
            .write(vec![
                StoreOp::DeleteRequest(addr(2)),
                StoreOp::DeleteEvent(0),
            ])
            .await
            .unwrap();
        assert!(store.all_requests().await.unwrap().is_empty());
        assert_eq!(store.event_count().await.unwrap(), 0);
    }
}
