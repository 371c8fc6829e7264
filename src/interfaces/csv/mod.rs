pub mod ledger_writer;
pub mod operation_reader;
