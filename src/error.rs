use crate::domain::address::Address;
use crate::domain::value::{Timestamp, Wei};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum FaucetError {
    #[error("caller {caller} is not the owner of the faucet")]
    #[diagnostic(code(faucet::unauthorized), help("use the owner identity"))]
    Unauthorized { caller: Address },

    #[error("request at {now} is too early, next possible request at {next_possible}")]
    #[diagnostic(code(faucet::too_early))]
    TooEarly {
        now: Timestamp,
        next_possible: Timestamp,
    },

    #[error("pool balance {pool} wei is below the withdrawable value {required} wei")]
    #[diagnostic(code(faucet::insufficient_pool), help("fund the faucet first"))]
    InsufficientPool { pool: Wei, required: Wei },

    #[error("transfer failed: {0}")]
    #[diagnostic(code(faucet::transfer_failed))]
    TransferFailed(String),

    #[error("no faucet ledger has been deployed")]
    #[diagnostic(code(faucet::not_deployed))]
    NotDeployed,

    #[error("a faucet ledger is already deployed in this store")]
    #[diagnostic(code(faucet::already_deployed), help("resume it with deploy_or_open"))]
    AlreadyDeployed,

    #[error("arithmetic overflow")]
    #[diagnostic(code(faucet::overflow))]
    ArithmeticOverflow,

    #[error("chain time cannot move backwards from {current} to {requested}")]
    #[diagnostic(code(faucet::clock_regression))]
    ClockRegression {
        current: Timestamp,
        requested: Timestamp,
    },

    #[error("Validation error: {0}")]
    #[diagnostic(code(faucet::validation))]
    ValidationError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, FaucetError>;
