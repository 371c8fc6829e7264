use clap::Parser;
use faucet_ledger::application::faucet::{Deployment, Environment, FaucetService};
use faucet_ledger::domain::address::Address;
use faucet_ledger::domain::operation::Operation;
use faucet_ledger::domain::ports::LedgerStoreBox;
use faucet_ledger::domain::value::{Timestamp, Wei, parse_ether};
use faucet_ledger::error::Result as FaucetResult;
use faucet_ledger::infrastructure::clock::ManualClock;
use faucet_ledger::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use faucet_ledger::infrastructure::rocksdb::RocksDBStore;
use faucet_ledger::infrastructure::wallets::InMemoryWallets;
use faucet_ledger::interfaces::csv::ledger_writer::LedgerWriter;
use faucet_ledger::interfaces::csv::operation_reader::OperationReader;
use faucet_ledger::interfaces::events::EventWriter;
use faucet_ledger::observability;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operations CSV file (columns: type, caller, amount, at)
    input: PathBuf,

    /// Owner of a newly deployed faucet. Not needed when resuming from --db-path.
    #[arg(long)]
    owner: Option<Address>,

    /// Ether disbursed per successful request.
    #[arg(long, default_value = "0.1", value_parser = parse_ether)]
    withdrawable: Wei,

    /// Ether attached to the deployment.
    #[arg(long, default_value = "10", value_parser = parse_ether)]
    initial_funding: Wei,

    /// Chain time before the first operation, in unix seconds.
    #[arg(long, default_value_t = 0)]
    start_time: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Recipient that refuses incoming transfers. May be repeated.
    #[arg(long = "reject", value_name = "ADDRESS")]
    rejecting: Vec<Address>,

    /// Write every emitted event to this file as JSON lines.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    if let Some(db_path) = db_path {
        return Ok(Box::new(RocksDBStore::open(db_path)?));
    }
    Ok(Box::new(InMemoryLedgerStore::new()))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryLedgerStore::new()))
}

async fn apply(service: &FaucetService, clock: &ManualClock, op: Operation) -> FaucetResult<()> {
    if let Some(at) = op.at {
        clock.advance_to(at)?;
    }
    let event = service.process_operation(op).await?;
    info!(%event, "operation applied");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.json_logs);

    let ledger_store = open_store(cli.db_path)?;

    let wallets = InMemoryWallets::new();
    for address in cli.rejecting {
        wallets.reject_transfers(address).await;
    }

    let clock = ManualClock::new(Timestamp::new(cli.start_time));
    let env = Environment {
        ledger_store,
        transfers: Box::new(wallets),
        clock: Box::new(clock.clone()),
    };
    let deployment = cli.owner.map(|owner| Deployment {
        owner,
        withdrawable_value: cli.withdrawable,
        initial_funding: cli.initial_funding,
    });
    let service = FaucetService::deploy_or_open(env, deployment).await?;

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = apply(&service, &clock, op).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    if let Some(path) = cli.events {
        let events = service.events().await?;
        let file = File::create(path).into_diagnostic()?;
        EventWriter::new(io::BufWriter::new(file)).write_events(&events)?;
    }

    // Output final state
    let ledger = service.snapshot().await?;
    let stdout = io::stdout();
    let mut writer = LedgerWriter::new(stdout.lock());
    writer.write_ledger(&ledger)?;

    Ok(())
}
