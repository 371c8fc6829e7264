use crate::domain::address::Address;
use crate::domain::event::EventRecord;
use crate::domain::ledger::{Ledger, RequestRecord};
use crate::domain::ports::{LedgerStore, StoreOp};
use crate::error::{FaucetError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family holding the singleton ledger record.
pub const CF_LEDGER: &str = "ledger";
/// Column Family for per-requester records, keyed by address bytes.
pub const CF_REQUESTS: &str = "requests";
/// Column Family for the event log, keyed by big-endian sequence number.
pub const CF_EVENTS: &str = "events";

const LEDGER_KEY: &[u8] = b"ledger";

impl From<rocksdb::Error> for FaucetError {
    fn from(e: rocksdb::Error) -> Self {
        FaucetError::InternalError(Box::new(e))
    }
}

/// A persistent store implementation using RocksDB.
///
/// Keeps the ledger, request records, and emitted events in separate Column
/// Families. Every `write` batch becomes one RocksDB `WriteBatch`.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_LEDGER, CF_REQUESTS, CF_EVENTS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            FaucetError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    /// Decodes every value of a Column Family in key order.
    fn values<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = self.cf(name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(decode(&value)?);
        }
        Ok(values)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        FaucetError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        FaucetError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn get_ledger(&self) -> Result<Option<Ledger>> {
        let cf = self.cf(CF_LEDGER)?;
        match self.db.get_cf(cf, LEDGER_KEY)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_request(&self, requester: &Address) -> Result<Option<RequestRecord>> {
        let cf = self.cf(CF_REQUESTS)?;
        match self.db.get_cf(cf, requester.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all_requests(&self) -> Result<Vec<RequestRecord>> {
        self.values(CF_REQUESTS)
    }

    async fn events(&self) -> Result<Vec<EventRecord>> {
        self.values(CF_EVENTS)
    }

    async fn event_count(&self) -> Result<u64> {
        let cf = self.cf(CF_EVENTS)?;
        // Keys are big-endian sequence numbers, so the last key is the highest.
        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _value) = item?;
                let seq: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                    FaucetError::InternalError(Box::new(std::io::Error::other(
                        "Malformed event key",
                    )))
                })?;
                Ok(u64::from_be_bytes(seq) + 1)
            }
            None => Ok(0),
        }
    }

    async fn write(&self, batch: Vec<StoreOp>) -> Result<()> {
        let ledger_cf = self.cf(CF_LEDGER)?;
        let requests_cf = self.cf(CF_REQUESTS)?;
        let events_cf = self.cf(CF_EVENTS)?;

        let mut wb = WriteBatch::default();
        for op in batch {
            match op {
                StoreOp::PutLedger(ledger) => wb.put_cf(ledger_cf, LEDGER_KEY, encode(&ledger)?),
                StoreOp::PutRequest(record) => {
                    wb.put_cf(requests_cf, record.requester.as_bytes(), encode(&record)?)
                }
                StoreOp::DeleteRequest(requester) => {
                    wb.delete_cf(requests_cf, requester.as_bytes())
                }
                StoreOp::AppendEvent(record) => {
                    wb.put_cf(events_cf, record.seq.to_be_bytes(), encode(&record)?)
                }
                StoreOp::DeleteEvent(seq) => wb.delete_cf(events_cf, seq.to_be_bytes()),
            }
        }
        self.db.write(wb)?;

        Ok(())
    }
}
