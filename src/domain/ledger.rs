use super::address::Address;
use super::event::LedgerEvent;
use super::value::{Timestamp, Wei};
use crate::error::{FaucetError, Result};
use serde::{Deserialize, Serialize};

/// Minimum chain-time gap between two successful requests of the same caller.
pub const COOLDOWN_SECONDS: u64 = 60;

/// The disbursement ledger: pooled balance, per-request amount, and owner.
///
/// Per-requester timing lives in [`RequestRecord`]s, which are looked up by the
/// caller of [`Ledger::stage_request`] and handed in explicitly.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Ledger {
    /// The only identity allowed to change `withdrawable_value`. Never changes.
    pub owner: Address,
    /// Amount disbursed per successful request.
    pub withdrawable_value: Wei,
    /// Total value currently held by the ledger.
    pub pool_balance: Wei,
}

/// Last successful request of one requester.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct RequestRecord {
    pub requester: Address,
    pub last_request_at: Timestamp,
}

/// Chain time from which a requester whose previous request is `last` may ask
/// again. A requester who never asked counts as having asked at
/// [`Timestamp::EPOCH`].
pub fn next_possible_request(last: Option<&RequestRecord>) -> Timestamp {
    last.map_or(Timestamp::EPOCH, |r| r.last_request_at)
        .saturating_add(COOLDOWN_SECONDS)
}

/// A validated request whose effects have not been applied yet.
///
/// Produced by [`Ledger::stage_request`] and applied by [`Ledger::commit`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Disbursement {
    pub recipient: Address,
    pub amount: Wei,
    pub requested_at: Timestamp,
    pub pool_after: Wei,
}

impl Disbursement {
    /// The request record to persist on commit.
    pub fn record(&self) -> RequestRecord {
        RequestRecord {
            requester: self.recipient,
            last_request_at: self.requested_at,
        }
    }

    /// The event emitted on commit.
    pub fn event(&self) -> LedgerEvent {
        LedgerEvent::NextPossibleRequest(self.requested_at.saturating_add(COOLDOWN_SECONDS))
    }
}

impl Ledger {
    /// Creates a ledger endowed with `initial_funding`.
    pub fn new(owner: Address, withdrawable_value: Wei, initial_funding: Wei) -> Self {
        Self {
            owner,
            withdrawable_value,
            pool_balance: initial_funding,
        }
    }

    /// Adds `amount` to the pool. Anyone may fund.
    pub fn fund(&mut self, amount: Wei) -> Result<LedgerEvent> {
        self.pool_balance = self.pool_balance.checked_add(amount)?;
        Ok(LedgerEvent::FundFaucet(amount))
    }

    /// Changes the per-request amount. Zero is accepted.
    pub fn update_withdrawable_value(
        &mut self,
        caller: &Address,
        new_value: Wei,
    ) -> Result<LedgerEvent> {
        if *caller != self.owner {
            return Err(FaucetError::Unauthorized { caller: *caller });
        }
        self.withdrawable_value = new_value;
        Ok(LedgerEvent::UpdateWithdrawValue(new_value))
    }

    /// Validates a request by `caller` at chain time `now` without mutating.
    ///
    /// `last` is the caller's previous request, `None` if there never was one;
    /// see [`next_possible_request`].
    pub fn stage_request(
        &self,
        caller: &Address,
        last: Option<&RequestRecord>,
        now: Timestamp,
    ) -> Result<Disbursement> {
        let next_possible = next_possible_request(last);
        if now < next_possible {
            return Err(FaucetError::TooEarly { now, next_possible });
        }

        if !self.is_funded() {
            return Err(FaucetError::InsufficientPool {
                pool: self.pool_balance,
                required: self.withdrawable_value,
            });
        }

        Ok(Disbursement {
            recipient: *caller,
            amount: self.withdrawable_value,
            requested_at: now,
            pool_after: self.pool_balance.checked_sub(self.withdrawable_value)?,
        })
    }

    /// Applies a staged disbursement and returns its event.
    pub fn commit(&mut self, disbursement: &Disbursement) -> LedgerEvent {
        self.pool_balance = disbursement.pool_after;
        disbursement.event()
    }

    /// Whether the pool can serve at least one more request.
    pub fn is_funded(&self) -> bool {
        self.pool_balance >= self.withdrawable_value
    }
}
