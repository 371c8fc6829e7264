use crate::domain::address::Address;
use crate::domain::event::{EventRecord, LedgerEvent};
use crate::domain::ledger::{Ledger, RequestRecord, next_possible_request};
use crate::domain::operation::{Operation, OperationType};
use crate::domain::ports::{ChainClockBox, LedgerStoreBox, StoreOp, ValueTransferBox};
use crate::domain::value::{Timestamp, Wei};
use crate::error::{FaucetError, Result};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Parameters supplied once, when the ledger is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub owner: Address,
    pub withdrawable_value: Wei,
    pub initial_funding: Wei,
}

/// The ports a [`FaucetService`] runs against.
pub struct Environment {
    pub ledger_store: LedgerStoreBox,
    pub transfers: ValueTransferBox,
    pub clock: ChainClockBox,
}

/// The disbursement ledger as a running service.
///
/// Every operation, reads included, runs inside one critical section. A
/// mutating operation persists the ledger, any request record, and the emitted
/// event in a single store write. A request is written before its transfer and
/// the write is undone if the transfer fails, so nobody is paid for a request
/// the store does not hold.
pub struct FaucetService {
    env: Environment,
    lock: Mutex<()>,
}

impl FaucetService {
    /// Creates and persists a new ledger endowed with `deployment.initial_funding`.
    ///
    /// Fails with [`FaucetError::AlreadyDeployed`] if the store already holds a
    /// ledger.
    pub async fn deploy(env: Environment, deployment: Deployment) -> Result<Self> {
        if env.ledger_store.get_ledger().await?.is_some() {
            return Err(FaucetError::AlreadyDeployed);
        }

        let ledger = Ledger::new(
            deployment.owner,
            deployment.withdrawable_value,
            deployment.initial_funding,
        );
        env.ledger_store
            .write(vec![StoreOp::PutLedger(ledger)])
            .await?;
        info!(
            owner = %deployment.owner,
            withdrawable_value = %deployment.withdrawable_value,
            initial_funding = %deployment.initial_funding,
            "faucet deployed"
        );
        Ok(Self::with_environment(env))
    }

    /// Resumes a ledger that was deployed earlier into the same store.
    pub async fn open(env: Environment) -> Result<Self> {
        let ledger = env
            .ledger_store
            .get_ledger()
            .await?
            .ok_or(FaucetError::NotDeployed)?;
        info!(
            owner = %ledger.owner,
            pool_balance = %ledger.pool_balance,
            "faucet resumed"
        );
        Ok(Self::with_environment(env))
    }

    /// Resumes the stored ledger if there is one, deploys otherwise.
    ///
    /// Deployment parameters are ignored when resuming.
    pub async fn deploy_or_open(env: Environment, deployment: Option<Deployment>) -> Result<Self> {
        if env.ledger_store.get_ledger().await?.is_some() {
            if deployment.is_some() {
                warn!("a faucet ledger already exists, ignoring deployment parameters");
            }
            return Self::open(env).await;
        }

        match deployment {
            Some(deployment) => Self::deploy(env, deployment).await,
            None => Err(FaucetError::NotDeployed),
        }
    }

    fn with_environment(env: Environment) -> Self {
        Self {
            env,
            lock: Mutex::new(()),
        }
    }

    async fn ledger(&self) -> Result<Ledger> {
        self.env
            .ledger_store
            .get_ledger()
            .await?
            .ok_or(FaucetError::NotDeployed)
    }

    /// Writes `ops` together with the event they emit. Returns the event's
    /// sequence number.
    async fn emit(
        &self,
        mut ops: Vec<StoreOp>,
        caller: Address,
        at: Timestamp,
        event: LedgerEvent,
    ) -> Result<u64> {
        let seq = self.env.ledger_store.event_count().await?;
        ops.push(StoreOp::AppendEvent(EventRecord {
            seq,
            at,
            caller,
            event,
        }));
        self.env.ledger_store.write(ops).await?;
        debug!(seq, %caller, %event, "event emitted");
        Ok(seq)
    }

    /// Adds `amount` to the pool. Anyone may fund the faucet.
    pub async fn fund_faucet(&self, caller: Address, amount: Wei) -> Result<LedgerEvent> {
        let _guard = self.lock.lock().await;
        let now = self.env.clock.now();

        let mut ledger = self.ledger().await?;
        let event = ledger.fund(amount)?;
        self.emit(vec![StoreOp::PutLedger(ledger)], caller, now, event)
            .await?;

        info!(%caller, %amount, "faucet funded");
        Ok(event)
    }

    /// Sets the amount disbursed per request. Only the owner may call this.
    pub async fn update_withdrawable_value(
        &self,
        caller: Address,
        new_value: Wei,
    ) -> Result<LedgerEvent> {
        let _guard = self.lock.lock().await;
        let now = self.env.clock.now();

        let mut ledger = self.ledger().await?;
        let event = ledger.update_withdrawable_value(&caller, new_value)?;
        self.emit(vec![StoreOp::PutLedger(ledger)], caller, now, event)
            .await?;

        info!(%caller, withdrawable_value = %new_value, "withdrawable value updated");
        Ok(event)
    }

    /// Sends the withdrawable value to `caller`, at most once per cooldown window.
    ///
    /// The debited pool, the caller's cooldown, and the event are persisted
    /// before the transfer. If the store rejects them nothing is sent; if the
    /// transfer fails they are restored to their previous values.
    pub async fn request_ether(&self, caller: Address) -> Result<LedgerEvent> {
        let _guard = self.lock.lock().await;
        let now = self.env.clock.now();

        let mut ledger = self.ledger().await?;
        let previous = ledger.clone();
        let last = self.env.ledger_store.get_request(&caller).await?;
        let disbursement = ledger.stage_request(&caller, last.as_ref(), now)?;
        let event = ledger.commit(&disbursement);

        let ops = vec![
            StoreOp::PutLedger(ledger),
            StoreOp::PutRequest(disbursement.record()),
        ];
        let seq = self.emit(ops, caller, now, event).await?;

        if let Err(e) = self
            .env
            .transfers
            .transfer(&caller, disbursement.amount)
            .await
        {
            warn!(
                %caller,
                amount = %disbursement.amount,
                error = %e,
                "transfer failed, rolling back disbursement"
            );
            let restored_request = match last {
                Some(record) => StoreOp::PutRequest(record),
                None => StoreOp::DeleteRequest(caller),
            };
            let undo = vec![
                StoreOp::PutLedger(previous),
                restored_request,
                StoreOp::DeleteEvent(seq),
            ];
            if let Err(undo_err) = self.env.ledger_store.write(undo).await {
                error!(%caller, seq, error = %undo_err, "rolling back disbursement failed");
                return Err(undo_err);
            }
            return Err(e);
        }

        info!(%caller, amount = %disbursement.amount, %event, "ether disbursed");
        Ok(event)
    }

    /// Applies one replayed call, converting its ether amount to wei.
    pub async fn process_operation(&self, op: Operation) -> Result<LedgerEvent> {
        match op.r#type {
            OperationType::Fund => {
                let amount = required_amount(&op)?;
                self.fund_faucet(op.caller, amount).await
            }
            OperationType::Update => {
                let value = required_amount(&op)?;
                self.update_withdrawable_value(op.caller, value).await
            }
            OperationType::Request => self.request_ether(op.caller).await,
        }
    }

    pub async fn owner(&self) -> Result<Address> {
        let _guard = self.lock.lock().await;
        Ok(self.ledger().await?.owner)
    }

    pub async fn withdrawable_value(&self) -> Result<Wei> {
        let _guard = self.lock.lock().await;
        Ok(self.ledger().await?.withdrawable_value)
    }

    pub async fn pool_balance(&self) -> Result<Wei> {
        let _guard = self.lock.lock().await;
        Ok(self.ledger().await?.pool_balance)
    }

    /// Chain time of the last successful request by `requester`, if any.
    pub async fn last_request_at(&self, requester: &Address) -> Result<Option<Timestamp>> {
        let _guard = self.lock.lock().await;
        let record = self.env.ledger_store.get_request(requester).await?;
        Ok(record.map(|r| r.last_request_at))
    }

    /// Chain time from which `requester` may ask again.
    pub async fn next_possible_request(&self, requester: &Address) -> Result<Timestamp> {
        let _guard = self.lock.lock().await;
        let record = self.env.ledger_store.get_request(requester).await?;
        Ok(next_possible_request(record.as_ref()))
    }

    /// Current ledger state.
    pub async fn snapshot(&self) -> Result<Ledger> {
        let _guard = self.lock.lock().await;
        self.ledger().await
    }

    pub async fn requests(&self) -> Result<Vec<RequestRecord>> {
        let _guard = self.lock.lock().await;
        self.env.ledger_store.all_requests().await
    }

    pub async fn events(&self) -> Result<Vec<EventRecord>> {
        let _guard = self.lock.lock().await;
        self.env.ledger_store.events().await
    }
}

fn required_amount(op: &Operation) -> Result<Wei> {
    let ether = op.amount.ok_or_else(|| {
        FaucetError::ValidationError(format!("{:?} operation requires an amount", op.r#type))
    })?;
    Wei::from_ether(ether)
}
