use crate::domain::ledger::Ledger;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct LedgerRow {
    owner: String,
    withdrawable_value: String,
    pool_balance: String,
}

/// Writes the final ledger state as CSV, amounts in wei.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        self.writer.serialize(LedgerRow {
            owner: ledger.owner.to_string(),
            withdrawable_value: ledger.withdrawable_value.to_string(),
            pool_balance: ledger.pool_balance.to_string(),
        })?;
        self.writer.flush()?;
        Ok(())
    }
}
